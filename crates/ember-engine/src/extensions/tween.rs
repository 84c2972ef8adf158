//! Property animation: change named numeric values over time.
//!
//! An [`Animation`] interpolates properties on any target implementing the
//! [`Animatable`] capability interface from their value at start time to a
//! declared end value, shaped by an [`Easing`] curve:
//!
//! ```
//! # use std::cell::RefCell;
//! # use std::rc::Rc;
//! # use ember_engine::extensions::tween::{Animatable, Animation, AnimationSet};
//! # struct Widget { x: f64 }
//! # impl Animatable for Widget {
//! #     fn get(&self, p: &str) -> Option<f64> { (p == "x").then_some(self.x) }
//! #     fn set(&mut self, p: &str, v: f64) { if p == "x" { self.x = v; } }
//! # }
//! let widget: Rc<RefCell<dyn Animatable>> = Rc::new(RefCell::new(Widget { x: 0.0 }));
//! let mut ani = Animation::new(1000.0).animate("x", 100.0);
//! ani.start(&widget).unwrap();
//!
//! let mut animations = AnimationSet::new();
//! animations.add(ani);
//! animations.update(500.0); // widget.x == 50.0
//! ```
//!
//! Animations are owned by an [`AnimationSet`]; finished ones are dropped
//! from the set after each tick. Forced early termination goes through
//! [`Animation::finish`].

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::rect::Rect;
use crate::error::{Error, Result};
use crate::extensions::easing::Easing;

/// Capability interface animation targets must implement.
///
/// Property names are resolved at [`Animation::start`] time; `get` returning
/// `None` there fails the start with
/// [`Error::MissingProperty`](crate::error::Error::MissingProperty).
pub trait Animatable {
    /// Current value of a named property, or `None` if the target has no
    /// such property.
    fn get(&self, property: &str) -> Option<f64>;

    /// Overwrite a named property. Unknown names are ignored.
    fn set(&mut self, property: &str, value: f64);
}

/// Shared handle to an animation target.
pub type TargetHandle = Rc<RefCell<dyn Animatable>>;

#[derive(Debug, Clone)]
struct Track {
    name: String,
    start: f64,
    end: f64,
}

/// Time-driven interpolation of named numeric properties.
pub struct Animation {
    /// Declared `(property, end value)` pairs; start values are snapshotted
    /// on `start`.
    declared: Vec<(String, f64)>,
    tracks: Vec<Track>,
    target: Option<TargetHandle>,
    duration: f64,
    delay: f64,
    elapsed: f64,
    transition: Easing,
    round_values: bool,
    started: bool,
    update_callback: Option<Box<dyn FnMut()>>,
    complete_callback: Option<Box<dyn FnOnce()>>,
}

impl Animation {
    /// Create an animation lasting `duration` (same unit as the `dt` later
    /// passed to [`update`](Self::update)).
    pub fn new(duration: f64) -> Self {
        Self {
            declared: Vec::new(),
            tracks: Vec::new(),
            target: None,
            duration,
            delay: 0.0,
            elapsed: 0.0,
            transition: Easing::Linear,
            round_values: false,
            started: false,
            update_callback: None,
            complete_callback: None,
        }
    }

    // -- Builder pattern --

    /// Declare a property to animate and its end value. Repeatable.
    pub fn animate(mut self, property: impl Into<String>, end: f64) -> Self {
        self.declared.push((property.into(), end));
        self
    }

    /// Delay before interpolation begins.
    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    /// Easing curve (default linear).
    pub fn with_transition(mut self, transition: Easing) -> Self {
        self.transition = transition;
        self
    }

    /// Round interpolated values to the nearest integer before applying.
    /// Recommended for integer-backed targets such as [`Rect`] to avoid
    /// truncation jitter.
    pub fn with_round_values(mut self, round: bool) -> Self {
        self.round_values = round;
        self
    }

    /// Callback invoked after every update that touched the target.
    pub fn on_update(mut self, f: impl FnMut() + 'static) -> Self {
        self.update_callback = Some(Box::new(f));
        self
    }

    /// Callback invoked exactly once when the animation finishes.
    pub fn on_complete(mut self, f: impl FnOnce() + 'static) -> Self {
        self.complete_callback = Some(Box::new(f));
        self
    }

    /// Snapshot each declared property's current value on `target` as the
    /// interpolation start and begin tracking it.
    ///
    /// Fails fast with `MissingProperty` if the target lacks any declared
    /// property, leaving the animation unstarted.
    pub fn start(&mut self, target: &TargetHandle) -> Result<()> {
        let mut tracks = Vec::with_capacity(self.declared.len());
        {
            let obj = target.borrow();
            for (name, end) in &self.declared {
                let start = obj
                    .get(name)
                    .ok_or_else(|| Error::MissingProperty(name.clone()))?;
                tracks.push(Track {
                    name: name.clone(),
                    start,
                    end: *end,
                });
            }
        }
        self.tracks = tracks;
        self.target = Some(Rc::clone(target));
        self.elapsed = 0.0;
        self.started = true;
        Ok(())
    }

    /// Advance the animation by `dt`.
    ///
    /// While the delay is unconsumed the target is untouched. Afterwards
    /// every tracked property is set to
    /// `start * (1 - t) + end * t` for `t = easing(progress)`. Reaching full
    /// progress triggers [`finish`](Self::finish). A no-op before `start`
    /// and after finishing.
    pub fn update(&mut self, dt: f64) {
        let Some(target) = self.target.clone() else {
            return;
        };

        self.elapsed += dt;
        if self.delay > 0.0 {
            if self.elapsed < self.delay {
                return;
            }
            self.elapsed -= self.delay;
            self.delay = 0.0;
        }

        let progress = if self.duration > 0.0 {
            (self.elapsed / self.duration).min(1.0)
        } else {
            1.0
        };
        let t = self.transition.apply(progress);

        {
            let mut obj = target.borrow_mut();
            for track in &self.tracks {
                let mut value = track.start * (1.0 - t) + track.end * t;
                if self.round_values {
                    value = value.round();
                }
                obj.set(&track.name, value);
            }
        }

        if let Some(cb) = &mut self.update_callback {
            cb();
        }

        if progress >= 1.0 {
            self.finish();
        }
    }

    /// Force the animation to finish.
    ///
    /// Exact end values are applied (bypassing interpolation and rounding),
    /// the update callback fires once more, internal state is cleared so the
    /// instance becomes inert, and the completion callback fires exactly
    /// once.
    pub fn finish(&mut self) {
        let Some(target) = self.target.take() else {
            return;
        };

        {
            let mut obj = target.borrow_mut();
            for track in &self.tracks {
                obj.set(&track.name, track.end);
            }
        }
        if let Some(cb) = &mut self.update_callback {
            cb();
        }
        self.tracks.clear();
        if let Some(cb) = self.complete_callback.take() {
            cb();
        }
    }

    /// Whether the animation has run and finished (or was forced to).
    pub fn is_finished(&self) -> bool {
        self.started && self.target.is_none()
    }
}

impl std::fmt::Debug for Animation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animation")
            .field("declared", &self.declared)
            .field("duration", &self.duration)
            .field("delay", &self.delay)
            .field("elapsed", &self.elapsed)
            .field("transition", &self.transition)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

/// Owning scheduler for animations.
///
/// Ticks every animation then drops the finished ones, so completion
/// callbacks observe a stable membership during the tick.
#[derive(Debug, Default)]
pub struct AnimationSet {
    animations: Vec<Animation>,
}

impl AnimationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of an animation. It keeps running until finished.
    ///
    /// The animation should already be started: an animation with no target
    /// is inert and gets dropped on the next [`update`](Self::update).
    pub fn add(&mut self, animation: Animation) {
        if animation.target.is_none() {
            log::warn!("animation added to set without a target");
        }
        self.animations.push(animation);
    }

    /// Advance every animation by `dt`, then remove the finished (or never
    /// started) ones.
    pub fn update(&mut self, dt: f64) {
        for animation in &mut self.animations {
            animation.update(dt);
        }
        self.animations.retain(|a| a.target.is_some());
    }

    /// Force-finish and remove every animation.
    pub fn finish_all(&mut self) {
        for animation in &mut self.animations {
            animation.finish();
        }
        self.animations.retain(|a| a.target.is_some());
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn clear(&mut self) {
        self.animations.clear();
    }
}

/// Rect tweening: `x`, `y`, `w`, `h`. Values are truncated toward zero on
/// write; pair with `with_round_values(true)` to avoid jitter.
impl Animatable for Rect {
    fn get(&self, property: &str) -> Option<f64> {
        match property {
            "x" => Some(self.x as f64),
            "y" => Some(self.y as f64),
            "w" => Some(self.w as f64),
            "h" => Some(self.h as f64),
            _ => None,
        }
    }

    fn set(&mut self, property: &str, value: f64) {
        match property {
            "x" => self.x = value as i32,
            "y" => self.y = value as i32,
            "w" => self.w = value.max(0.0) as u32,
            "h" => self.h = value.max(0.0) as u32,
            _ => {}
        }
    }
}
