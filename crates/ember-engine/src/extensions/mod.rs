// extensions/mod.rs
//
// Property animation lives apart from the world: tweens drive any
// Animatable target, engine object or not, so games opt in per target.

pub mod easing;
pub mod tween;

pub use easing::{ease, lerp, Easing};
pub use tween::{Animatable, Animation, AnimationSet, TargetHandle};
