pub mod pixmap;

pub use pixmap::{Pixmap, Rgba8};
