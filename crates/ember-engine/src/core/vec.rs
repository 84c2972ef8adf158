//! Polar-angle helpers over [`glam::Vec2`].
//!
//! Arithmetic, magnitude and normalization come from glam directly; this
//! trait adds the angle get/set pair game code keeps reaching for.

use glam::Vec2;

/// Polar-coordinate view of a 2D vector.
pub trait Vec2Ext {
    /// Angle of the vector in radians, measured from the positive X axis.
    fn polar_angle(self) -> f32;

    /// The same magnitude pointing at `angle` radians.
    fn with_polar_angle(self, angle: f32) -> Vec2;

    /// The same direction rescaled to `magnitude`. Zero vectors stay zero.
    fn with_magnitude(self, magnitude: f32) -> Vec2;
}

impl Vec2Ext for Vec2 {
    fn polar_angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    fn with_polar_angle(self, angle: f32) -> Vec2 {
        Vec2::from_angle(angle) * self.length()
    }

    fn with_magnitude(self, magnitude: f32) -> Vec2 {
        let len = self.length();
        if len == 0.0 {
            Vec2::ZERO
        } else {
            self * (magnitude / len)
        }
    }
}
