//! Particle emitter: a spawn recipe plus a continuous-emission accumulator.
//!
//! An emitter does not own particles; it describes how to make them. Hand it
//! to a [`ParticleSystem`](crate::systems::particles::ParticleSystem) either
//! continuously (`emit`) or as a one-shot burst.

use std::f32::consts::TAU;
use std::rc::Rc;

use glam::Vec2;

use crate::renderer::pixmap::Pixmap;

/// Spawn recipe for particles, built fluently.
#[derive(Debug, Clone)]
pub struct Emitter {
    pub(crate) position: Vec2,
    pub(crate) speed: (f32, f32),
    pub(crate) direction: (f32, f32),
    pub(crate) gravity: Vec2,
    pub(crate) max_life: f32,
    pub(crate) fixed_life: bool,
    pub(crate) fade: bool,
    pub(crate) image: Rc<Pixmap>,
    rate: f32,
    accumulator: f32,
}

impl Emitter {
    /// A full-circle emitter at the origin: speed 1, one-second lifetime
    /// with per-particle jitter, fading enabled, no continuous rate.
    pub fn new(image: Rc<Pixmap>) -> Self {
        Self {
            position: Vec2::ZERO,
            speed: (1.0, 1.0),
            direction: (0.0, TAU),
            gravity: Vec2::ZERO,
            max_life: 1.0,
            fixed_life: false,
            fade: true,
            image,
            rate: 0.0,
            accumulator: 0.0,
        }
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Per-particle speed is sampled uniformly from `[min, max]`.
    pub fn with_speed(mut self, min: f32, max: f32) -> Self {
        self.speed = (min, max);
        self
    }

    /// Emission cone in radians; defaults to the full circle.
    pub fn with_direction(mut self, min: f32, max: f32) -> Self {
        self.direction = (min, max);
        self
    }

    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Lifetime ceiling in seconds. With `fixed`, every particle lives
    /// exactly `max_life`; otherwise each gets `max_life` scaled by a
    /// uniform random factor.
    pub fn with_lifetime(mut self, max_life: f32, fixed: bool) -> Self {
        self.max_life = max_life;
        self.fixed_life = fixed;
        self
    }

    /// Fade alpha out linearly over each particle's lifetime.
    pub fn with_fade(mut self, fade: bool) -> Self {
        self.fade = fade;
        self
    }

    /// Continuous emission rate in particles per second.
    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Advance the continuous-emission clock; returns how many particles
    /// are due this tick. Fractional spawns carry over.
    pub(crate) fn due(&mut self, dt: f32) -> usize {
        self.accumulator += self.rate * dt;
        let due = self.accumulator.floor();
        self.accumulator -= due;
        due as usize
    }
}
