//! Particle pool: owns live particles spawned from [`Emitter`] recipes,
//! steps them, and draws them with per-particle alpha.

use glam::Vec2;
use std::rc::Rc;

use crate::components::emitter::Emitter;
use crate::core::rng::Rng;
use crate::core::vec::Vec2Ext;
use crate::renderer::pixmap::Pixmap;

/// One live particle. Dead simple on purpose; all policy lives in the
/// emitter that spawned it.
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub gravity: Vec2,
    age: f32,
    lifetime: f32,
    fade: bool,
    image: Rc<Pixmap>,
}

impl Particle {
    /// Integrate one step; returns whether the particle is still alive.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.velocity += self.gravity * dt;
        self.position += self.velocity * dt;
        self.age += dt;
        self.age < self.lifetime
    }

    /// Draw opacity: linear fade-out over the lifetime when fading, full
    /// otherwise.
    pub fn alpha(&self) -> f32 {
        if self.fade {
            (1.0 - self.age / self.lifetime).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    pub fn age(&self) -> f32 {
        self.age
    }
}

/// All live particles plus the RNG their spawns draw from.
#[derive(Debug)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    rng: Rng,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new(0x9e3779b97f4a7c15)
    }
}

impl ParticleSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            rng: Rng::new(seed),
        }
    }

    /// Spawn `count` particles from `emitter` right now.
    pub fn burst(&mut self, emitter: &Emitter, count: usize) {
        for _ in 0..count {
            let p = self.spawn_one(emitter);
            self.particles.push(p);
        }
    }

    /// Advance `emitter`'s continuous-rate clock and spawn whatever is due.
    pub fn emit(&mut self, emitter: &mut Emitter, dt: f32) {
        let due = emitter.due(dt);
        self.burst(emitter, due);
    }

    fn spawn_one(&mut self, emitter: &Emitter) -> Particle {
        let speed = self.rng.range_f32(emitter.speed.0, emitter.speed.1);
        let angle = self.rng.range_f32(emitter.direction.0, emitter.direction.1);
        let lifetime = if emitter.fixed_life {
            emitter.max_life
        } else {
            emitter.max_life * self.rng.next_f32()
        };
        Particle {
            position: emitter.position,
            velocity: Vec2::X.with_magnitude(speed).with_polar_angle(angle),
            gravity: emitter.gravity,
            age: 0.0,
            lifetime,
            fade: emitter.fade,
            image: Rc::clone(&emitter.image),
        }
    }

    /// Step every particle and drop the expired ones.
    pub fn update(&mut self, dt: f32) {
        self.particles.retain_mut(|p| p.tick(dt));
    }

    /// Blend all particles onto `out` at their rounded positions.
    pub fn draw(&self, out: &mut Pixmap) {
        for p in &self.particles {
            out.blit_alpha(
                &p.image,
                p.position.x.round() as i32,
                p.position.y.round() as i32,
                p.alpha(),
            );
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::pixmap::Rgba8;
    use std::f32::consts::TAU;

    fn emitter() -> Emitter {
        Emitter::new(Rc::new(Pixmap::solid(1, 1, Rgba8::WHITE)))
    }

    #[test]
    fn burst_spawns_exact_count() {
        let mut sys = ParticleSystem::new(1);
        sys.burst(&emitter(), 25);
        assert_eq!(sys.len(), 25);
    }

    #[test]
    fn expired_particles_are_dropped() {
        let mut sys = ParticleSystem::new(1);
        sys.burst(&emitter().with_lifetime(0.5, true), 10);
        sys.update(0.25);
        assert_eq!(sys.len(), 10);
        sys.update(0.3);
        assert!(sys.is_empty());
    }

    #[test]
    fn jittered_lifetimes_never_exceed_ceiling() {
        let mut sys = ParticleSystem::new(7);
        sys.burst(&emitter().with_lifetime(2.0, false).with_fade(false), 200);
        sys.update(2.0);
        assert!(sys.is_empty());
    }

    #[test]
    fn speed_range_respected() {
        let mut sys = ParticleSystem::new(3);
        sys.burst(&emitter().with_speed(2.0, 4.0), 100);
        for p in sys.particles() {
            let s = p.velocity.length();
            assert!((2.0 - 1e-3..=4.0 + 1e-3).contains(&s), "speed = {}", s);
        }
    }

    #[test]
    fn direction_cone_respected() {
        let mut sys = ParticleSystem::new(11);
        // Narrow cone pointing right.
        sys.burst(&emitter().with_direction(-0.1, 0.1).with_speed(5.0, 5.0), 100);
        for p in sys.particles() {
            assert!(p.velocity.x > 0.0);
            let a = p.velocity.polar_angle();
            assert!(a.abs() <= 0.1 + 1e-4, "angle = {}", a);
        }
    }

    #[test]
    fn fade_reaches_zero_at_end_of_life() {
        let mut sys = ParticleSystem::new(5);
        sys.burst(&emitter().with_lifetime(1.0, true), 1);
        let p = &mut sys.particles[0];
        assert_eq!(p.alpha(), 1.0);
        p.tick(0.5);
        assert!((p.alpha() - 0.5).abs() < 1e-6);
        p.tick(0.6);
        assert_eq!(p.alpha(), 0.0);
    }

    #[test]
    fn gravity_bends_trajectories() {
        let mut sys = ParticleSystem::new(9);
        let e = emitter()
            .with_direction(0.0, 0.0)
            .with_speed(1.0, 1.0)
            .with_gravity(Vec2::new(0.0, 10.0))
            .with_lifetime(10.0, true);
        sys.burst(&e, 1);
        sys.update(1.0);
        let p = &sys.particles()[0];
        assert!(p.velocity.y > 0.0);
        assert!(p.position.y > 0.0);
    }

    #[test]
    fn full_circle_default_covers_both_halves() {
        let mut sys = ParticleSystem::new(13);
        sys.burst(&emitter().with_speed(1.0, 1.0), 200);
        let left = sys.particles().iter().filter(|p| p.velocity.x < 0.0).count();
        assert!(left > 0 && left < 200);
        // Angles sampled from [0, TAU); sanity that the range constant is sane.
        assert!(TAU > 6.28);
    }
}
