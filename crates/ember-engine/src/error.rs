//! Crate-wide error type.
//!
//! Everything here signals a programmer error at construction or lookup time.
//! The simulation itself never fails: collision queries return empty results,
//! not errors, and there is no I/O in the core.

use thiserror::Error;

/// Errors produced by fallible constructors and lookups.
#[derive(Debug, Error)]
pub enum Error {
    /// A constructor argument was out of its documented range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A property animation was started on a target that lacks one of the
    /// declared properties.
    #[error("target has no property named `{0}`")]
    MissingProperty(String),

    /// A strip name was not found in the animator.
    #[error("unknown strip `{0}`")]
    UnknownStrip(String),

    /// A sprite manifest failed to parse.
    #[error("malformed manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
