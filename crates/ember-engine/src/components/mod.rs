pub mod body;
pub mod emitter;
pub mod sprite;
pub mod strip;

pub use body::{AnimatedObject, Blocking, Body, Contact, GameObject, SimpleObject};
pub use emitter::Emitter;
pub use sprite::{SpriteAnimator, DEFAULT_STRIP};
pub use strip::{FrameOrder, Strip, StripTimer, Timing, REPEAT_FOREVER};
