//! Input plumbing: a platform-agnostic event queue and a dispatcher that
//! routes events to per-key handlers while tracking held keys.
//!
//! The host shell pushes whatever its windowing layer produces as
//! [`InputEvent`]s; game code registers closures on a [`Dispatcher`] and
//! polls [`is_pressed`](Dispatcher::is_pressed) for continuous movement.

use std::collections::{HashMap, HashSet, VecDeque};

use glam::Vec2;

/// Platform key code. Kept as a bare integer so any backend's scancodes or
/// keysyms map in without translation.
pub type KeyCode = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    MouseDown(MouseButton, Vec2),
    MouseUp(MouseButton, Vec2),
    MouseMove(Vec2),
}

/// FIFO of not-yet-dispatched events.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// Remove and return all queued events in arrival order.
    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

type KeyHandler = Box<dyn FnMut()>;
type MouseHandler = Box<dyn FnMut(MouseButton, Vec2)>;

/// Routes events to registered handlers and tracks the held-key set.
///
/// Handlers are per-dispatcher state, so two scenes can carry independent
/// bindings and swap wholesale.
#[derive(Default)]
pub struct Dispatcher {
    on_key_down: HashMap<KeyCode, KeyHandler>,
    on_key_up: HashMap<KeyCode, KeyHandler>,
    on_mouse_down: Vec<MouseHandler>,
    on_mouse_up: Vec<MouseHandler>,
    pressed: HashSet<KeyCode>,
    mouse_position: Vec2,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a closure to a key press. Replaces any previous binding for the
    /// same key.
    pub fn bind_key_down(&mut self, key: KeyCode, handler: impl FnMut() + 'static) {
        self.on_key_down.insert(key, Box::new(handler));
    }

    pub fn bind_key_up(&mut self, key: KeyCode, handler: impl FnMut() + 'static) {
        self.on_key_up.insert(key, Box::new(handler));
    }

    pub fn bind_mouse_down(&mut self, handler: impl FnMut(MouseButton, Vec2) + 'static) {
        self.on_mouse_down.push(Box::new(handler));
    }

    pub fn bind_mouse_up(&mut self, handler: impl FnMut(MouseButton, Vec2) + 'static) {
        self.on_mouse_up.push(Box::new(handler));
    }

    /// Drain `queue` and route every event.
    ///
    /// Key state updates even for unbound keys, so `is_pressed` works
    /// without any handler registered.
    pub fn dispatch(&mut self, queue: &mut InputQueue) {
        for event in queue.drain() {
            match event {
                InputEvent::KeyDown(key) => {
                    self.pressed.insert(key);
                    if let Some(handler) = self.on_key_down.get_mut(&key) {
                        handler();
                    }
                }
                InputEvent::KeyUp(key) => {
                    self.pressed.remove(&key);
                    if let Some(handler) = self.on_key_up.get_mut(&key) {
                        handler();
                    }
                }
                InputEvent::MouseDown(button, pos) => {
                    self.mouse_position = pos;
                    for handler in &mut self.on_mouse_down {
                        handler(button, pos);
                    }
                }
                InputEvent::MouseUp(button, pos) => {
                    self.mouse_position = pos;
                    for handler in &mut self.on_mouse_up {
                        handler(button, pos);
                    }
                }
                InputEvent::MouseMove(pos) => {
                    self.mouse_position = pos;
                }
            }
        }
    }

    /// Whether `key` is currently held.
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Last seen cursor position.
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Forget held keys, e.g. on focus loss.
    pub fn release_all(&mut self) {
        self.pressed.clear();
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("key_down_bindings", &self.on_key_down.len())
            .field("key_up_bindings", &self.on_key_up.len())
            .field("pressed", &self.pressed)
            .field("mouse_position", &self.mouse_position)
            .finish()
    }
}
