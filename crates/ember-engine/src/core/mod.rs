pub mod rect;
pub mod rng;
pub mod time;
pub mod vec;
pub mod world;

pub use rect::Rect;
pub use rng::Rng;
pub use time::FixedTimestep;
pub use vec::Vec2Ext;
pub use world::{CollisionQuery, Role, World};
