//! Ember: a small 2D game engine built around classified game objects.
//!
//! The pieces compose bottom-up: [`Pixmap`] is the software surface
//! everything draws to, [`Strip`]s sequence frame animation, a
//! [`SpriteAnimator`] juggles named strips per sprite, [`Body`] handles
//! gravity kinematics, and [`World`] owns objects by role, runs collision
//! and composites the frame. Property tweens ([`Animation`]) and particles
//! sit alongside as opt-in systems.

pub mod assets;
pub mod components;
pub mod core;
pub mod error;
pub mod extensions;
pub mod input;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use assets::manifest::SheetManifest;
pub use assets::sheet::{slice_grid, slice_row};
pub use components::body::{AnimatedObject, Blocking, Body, Contact, GameObject, SimpleObject};
pub use components::emitter::Emitter;
pub use components::sprite::{SpriteAnimator, DEFAULT_STRIP};
pub use components::strip::{FrameOrder, Strip, StripTimer, Timing, REPEAT_FOREVER};
pub use crate::core::rect::Rect;
pub use crate::core::rng::Rng;
pub use crate::core::time::FixedTimestep;
pub use crate::core::vec::Vec2Ext;
pub use crate::core::world::{CollisionQuery, Role, World};
pub use error::{Error, Result};
pub use extensions::easing::{ease, lerp, Easing};
pub use extensions::tween::{Animatable, Animation, AnimationSet, TargetHandle};
pub use input::queue::{Dispatcher, InputEvent, InputQueue, KeyCode, MouseButton};
pub use renderer::pixmap::{Pixmap, Rgba8};
pub use systems::particles::{Particle, ParticleSystem};
