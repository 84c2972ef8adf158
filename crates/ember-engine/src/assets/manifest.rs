//! Sprite manifests: a JSON description of how a sheet's frames group into
//! named strips, compiled into a ready [`SpriteAnimator`].
//!
//! A manifest keeps frame indices, not pixels; the sheet image arrives
//! separately and is sliced on build. Example:
//!
//! ```json
//! {
//!   "frame_width": 16,
//!   "frame_height": 16,
//!   "strips": {
//!     "default": { "frames": [0, 1, 2, 1] },
//!     "jump": { "frames": [3, 4], "order": "ping_pong", "repeat": 2, "timing": 0.08 }
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::rc::Rc;

use serde::Deserialize;

use crate::assets::sheet::slice_grid;
use crate::components::sprite::{SpriteAnimator, DEFAULT_STRIP};
use crate::components::strip::{FrameOrder, Strip, Timing, REPEAT_FOREVER};
use crate::error::{Error, Result};
use crate::renderer::pixmap::Pixmap;

/// Timing as written in JSON: one number or one number per frame.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TimingSpec {
    Uniform(f32),
    PerFrame(Vec<f32>),
}

impl From<TimingSpec> for Timing {
    fn from(spec: TimingSpec) -> Self {
        match spec {
            TimingSpec::Uniform(t) => Timing::Uniform(t),
            TimingSpec::PerFrame(ts) => Timing::PerFrame(ts),
        }
    }
}

/// One strip's description: which grid frames it uses and how to play them.
#[derive(Debug, Clone, Deserialize)]
pub struct StripManifest {
    /// Indices into the sheet's row-major frame grid.
    pub frames: Vec<usize>,
    #[serde(default)]
    pub order: FrameOrder,
    /// Extra repeats after the first playback; `-1` repeats forever.
    #[serde(default = "repeat_forever")]
    pub repeat: i32,
    #[serde(default)]
    timing: Option<TimingSpec>,
}

fn repeat_forever() -> i32 {
    REPEAT_FOREVER
}

impl StripManifest {
    fn timing(&self) -> Timing {
        self.timing.clone().map(Timing::from).unwrap_or_else(Timing::none)
    }
}

/// A whole sheet's worth of strips.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetManifest {
    pub frame_width: u32,
    pub frame_height: u32,
    pub strips: HashMap<String, StripManifest>,
}

impl SheetManifest {
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: SheetManifest = serde_json::from_str(json)?;
        if !manifest.strips.contains_key(DEFAULT_STRIP) {
            return Err(Error::InvalidArgument(format!(
                "manifest must define a `{}` strip",
                DEFAULT_STRIP
            )));
        }
        if let Some(default) = manifest.strips.get(DEFAULT_STRIP) {
            if default.repeat != REPEAT_FOREVER {
                return Err(Error::InvalidArgument(format!(
                    "`{}` strip must repeat forever",
                    DEFAULT_STRIP
                )));
            }
        }
        Ok(manifest)
    }

    /// Slice `sheet` into the manifest's grid and assemble the animator.
    ///
    /// Fails when a strip references a frame index past the grid, or the
    /// grid does not tile the sheet.
    pub fn build(&self, sheet: &Pixmap) -> Result<SpriteAnimator> {
        let grid = slice_grid(sheet, self.frame_width, self.frame_height)?;

        let mut animator = None;
        let mut rest: Vec<(&String, &StripManifest)> = Vec::new();
        for (name, strip) in &self.strips {
            if name == DEFAULT_STRIP {
                // Checked again here: a manifest can arrive deserialized or
                // built by hand without passing through `from_json`.
                if strip.repeat != REPEAT_FOREVER {
                    return Err(Error::InvalidArgument(format!(
                        "`{}` strip must repeat forever",
                        DEFAULT_STRIP
                    )));
                }
                let frames = self.pick_frames(&grid, strip)?;
                let default = Strip::new(frames, strip.order, strip.repeat, strip.timing())?;
                animator = Some(SpriteAnimator::from_default_strip(default));
            } else {
                rest.push((name, strip));
            }
        }
        // Presence of `default` is checked in `from_json`; a hand-built
        // manifest without one fails here.
        let mut animator = animator.ok_or_else(|| {
            Error::InvalidArgument(format!("manifest must define a `{}` strip", DEFAULT_STRIP))
        })?;

        for (name, strip) in rest {
            let frames = self.pick_frames(&grid, strip)?;
            animator.add_frames(name.clone(), frames, strip.order, strip.repeat, strip.timing())?;
        }
        Ok(animator)
    }

    fn pick_frames(&self, grid: &[Rc<Pixmap>], strip: &StripManifest) -> Result<Vec<Rc<Pixmap>>> {
        strip
            .frames
            .iter()
            .map(|&i| {
                grid.get(i).cloned().ok_or_else(|| {
                    Error::InvalidArgument(format!(
                        "frame index {} out of range (sheet has {} frames)",
                        i,
                        grid.len()
                    ))
                })
            })
            .collect()
    }
}
