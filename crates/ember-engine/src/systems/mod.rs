pub mod particles;

pub use particles::{Particle, ParticleSystem};
