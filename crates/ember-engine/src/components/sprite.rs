//! Sprite animator: a map of named [`Strip`]s with one current strip,
//! plus a transition queue ("chain") of strip names to play back to back.
//!
//! A `"default"` strip always exists and repeats forever; finished strips
//! fall back to it when the chain is empty.

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::components::strip::{FrameOrder, Strip, Timing, REPEAT_FOREVER};
use crate::core::rect::Rect;
use crate::error::{Error, Result};
use crate::renderer::pixmap::Pixmap;

/// Name of the always-present fallback strip.
pub const DEFAULT_STRIP: &str = "default";

/// Animated sprite built from named strips.
#[derive(Debug)]
pub struct SpriteAnimator {
    strips: HashMap<String, Strip>,
    current: String,
    chain: VecDeque<String>,
    image: Rc<Pixmap>,
    rect: Rect,
}

impl SpriteAnimator {
    /// Create an animator whose `"default"` strip plays `frames` forever.
    pub fn new(frames: Vec<Rc<Pixmap>>, order: FrameOrder, timing: Timing) -> Result<Self> {
        let strip = Strip::new(frames, order, REPEAT_FOREVER, timing)?;
        Ok(Self::from_default_strip(strip))
    }

    /// Create an animator from a prebuilt default strip. The strip should
    /// repeat forever; a finite default would leave the animator stuck on
    /// its last frame.
    pub fn from_default_strip(strip: Strip) -> Self {
        let image = Rc::clone(strip.current_image());
        let (w, h) = strip.frame_size();
        let mut strips = HashMap::new();
        strips.insert(DEFAULT_STRIP.to_string(), strip);
        Self {
            strips,
            current: DEFAULT_STRIP.to_string(),
            chain: VecDeque::new(),
            image,
            rect: Rect::new(0, 0, w, h),
        }
    }

    /// Add (or replace) a named strip.
    ///
    /// Replacing `"default"` requires an infinite-repeat strip so the
    /// fallback invariant holds.
    pub fn add_strip(&mut self, name: impl Into<String>, strip: Strip) -> Result<()> {
        let name = name.into();
        if name == DEFAULT_STRIP && strip.timer().repeat() != REPEAT_FOREVER {
            return Err(Error::InvalidArgument(
                "default strip must repeat forever".into(),
            ));
        }
        self.strips.insert(name, strip);
        Ok(())
    }

    /// Build and add a strip in one call.
    pub fn add_frames(
        &mut self,
        name: impl Into<String>,
        frames: Vec<Rc<Pixmap>>,
        order: FrameOrder,
        repeat: i32,
        timing: Timing,
    ) -> Result<()> {
        let name = name.into();
        if name == DEFAULT_STRIP && repeat != REPEAT_FOREVER {
            return Err(Error::InvalidArgument(
                "default strip must repeat forever".into(),
            ));
        }
        let strip = Strip::new(frames, order, repeat, timing)?;
        self.strips.insert(name, strip);
        Ok(())
    }

    /// Switch to a named strip, resetting it so playback restarts at frame 0.
    pub fn set_strip(&mut self, name: &str) -> Result<()> {
        let strip = self
            .strips
            .get_mut(name)
            .ok_or_else(|| Error::UnknownStrip(name.to_string()))?;
        strip.reset();
        self.current = name.to_string();
        Ok(())
    }

    /// Queue a strip to play once the current one finishes.
    pub fn queue_chain(&mut self, name: &str) -> Result<()> {
        if !self.strips.contains_key(name) {
            return Err(Error::UnknownStrip(name.to_string()));
        }
        self.chain.push_back(name.to_string());
        Ok(())
    }

    /// Drop all queued chain entries.
    pub fn clear_chain(&mut self) {
        self.chain.clear();
    }

    /// Advance the animation at time `t`.
    ///
    /// A finished non-default strip hands over to the next chain entry, or
    /// back to `"default"`; the newly activated strip is reset and sampled
    /// this same tick. The displayed image and the rect's size are updated;
    /// the rect's position is left alone.
    pub fn advance(&mut self, t: f32) {
        if self.current != DEFAULT_STRIP && self.strips[&self.current].is_done() {
            let next = self
                .chain
                .pop_front()
                .unwrap_or_else(|| DEFAULT_STRIP.to_string());
            // Queued names were validated on insertion.
            if self.set_strip(&next).is_err() {
                log::warn!("chained strip `{}` disappeared, falling back", next);
                self.current = DEFAULT_STRIP.to_string();
            }
        }

        let strip = self
            .strips
            .get_mut(&self.current)
            .expect("current strip always exists");
        self.image = Rc::clone(strip.advance(t));
        let (w, h) = strip.frame_size();
        self.rect.w = w;
        self.rect.h = h;
    }

    /// The frame image currently displayed.
    pub fn image(&self) -> &Rc<Pixmap> {
        &self.image
    }

    /// Sprite bounds: size follows the current frame, position is caller-owned.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn rect_mut(&mut self) -> &mut Rect {
        &mut self.rect
    }

    /// Name of the strip currently playing.
    pub fn current_strip(&self) -> &str {
        &self.current
    }

    /// Whether a strip with this name exists.
    pub fn has_strip(&self, name: &str) -> bool {
        self.strips.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::pixmap::Rgba8;

    fn frames(shade: u8, n: usize) -> Vec<Rc<Pixmap>> {
        (0..n)
            .map(|i| Rc::new(Pixmap::solid(2, 2, Rgba8::opaque(shade, i as u8, 0))))
            .collect()
    }

    fn animator() -> SpriteAnimator {
        SpriteAnimator::new(frames(0, 1), FrameOrder::Forward, Timing::none()).unwrap()
    }

    fn shade(anim: &SpriteAnimator) -> u8 {
        anim.image().pixel(0, 0).unwrap().r
    }

    #[test]
    fn default_strip_always_exists() {
        let anim = animator();
        assert!(anim.has_strip(DEFAULT_STRIP));
        assert_eq!(anim.current_strip(), DEFAULT_STRIP);
    }

    #[test]
    fn set_strip_unknown_name_fails() {
        let mut anim = animator();
        assert!(anim.set_strip("missing").is_err());
    }

    #[test]
    fn finite_default_replacement_rejected() {
        let mut anim = animator();
        let err = anim.add_frames(
            DEFAULT_STRIP,
            frames(1, 2),
            FrameOrder::Forward,
            0,
            Timing::none(),
        );
        assert!(err.is_err());
    }

    #[test]
    fn finite_prebuilt_default_replacement_rejected() {
        let mut anim = animator();
        // A fresh finite strip is not done yet; the repeat budget is what
        // decides whether it may become the fallback.
        let finite = Strip::new(frames(1, 2), FrameOrder::Forward, 0, Timing::none()).unwrap();
        assert!(anim.add_strip(DEFAULT_STRIP, finite).is_err());

        let infinite =
            Strip::new(frames(1, 2), FrameOrder::Forward, REPEAT_FOREVER, Timing::none()).unwrap();
        assert!(anim.add_strip(DEFAULT_STRIP, infinite).is_ok());
    }

    #[test]
    fn finished_strip_falls_back_to_default() {
        let mut anim = animator();
        anim.add_frames("blink", frames(7, 2), FrameOrder::Forward, 0, Timing::none())
            .unwrap();
        anim.set_strip("blink").unwrap();

        anim.advance(0.0);
        assert_eq!(shade(&anim), 7);
        anim.advance(0.0); // blink finishes here
        assert_eq!(shade(&anim), 7);
        anim.advance(0.0); // handover happens on the tick after Done
        assert_eq!(anim.current_strip(), DEFAULT_STRIP);
        assert_eq!(shade(&anim), 0);
    }

    #[test]
    fn chain_plays_in_queue_order() {
        let mut anim = animator();
        anim.add_frames("a", frames(1, 1), FrameOrder::Forward, 0, Timing::none())
            .unwrap();
        anim.add_frames("b", frames(2, 1), FrameOrder::Forward, 0, Timing::none())
            .unwrap();
        anim.set_strip("a").unwrap();
        anim.queue_chain("b").unwrap();

        anim.advance(0.0); // plays (and finishes) a
        assert_eq!(anim.current_strip(), "a");
        anim.advance(0.0); // switches to b
        assert_eq!(anim.current_strip(), "b");
        assert_eq!(shade(&anim), 2);
        anim.advance(0.0); // b finished previous tick? b has 1 frame, done after first advance
        anim.advance(0.0);
        assert_eq!(anim.current_strip(), DEFAULT_STRIP);
    }

    #[test]
    fn chain_rejects_unknown_names() {
        let mut anim = animator();
        assert!(anim.queue_chain("nope").is_err());
    }

    #[test]
    fn switching_restarts_strip() {
        let mut anim = animator();
        anim.add_frames("walk", frames(3, 3), FrameOrder::Forward, REPEAT_FOREVER, Timing::none())
            .unwrap();
        anim.set_strip("walk").unwrap();
        anim.advance(0.0);
        anim.advance(0.0);
        // Re-selecting resets playback to frame 0.
        anim.set_strip("walk").unwrap();
        anim.advance(0.0);
        assert_eq!(anim.image().pixel(0, 0).unwrap().g, 0);
    }

    #[test]
    fn rect_tracks_frame_size_not_position() {
        let mut anim = animator();
        anim.rect_mut().set_top_left(40, 50);
        anim.advance(0.0);
        let r = anim.rect();
        assert_eq!((r.x, r.y), (40, 50));
        assert_eq!((r.w, r.h), (2, 2));
    }
}
