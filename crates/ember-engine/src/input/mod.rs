pub mod queue;

pub use queue::{Dispatcher, InputEvent, InputQueue, KeyCode, MouseButton};
