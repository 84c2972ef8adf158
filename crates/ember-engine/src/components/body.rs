//! Gravity-affected body kinematics and the object trait the world drives.
//!
//! A [`Body`] integrates gravity into velocity and velocity into position;
//! its bounds rect mirrors the rounded position after every mutation.
//! [`GameObject`] is the seam for game-specific behavior: movers override
//! [`update`](GameObject::update) to consult the world's look-ahead query
//! before committing moves, and [`collide`](GameObject::collide) to react to
//! permitted-pair overlaps.

use std::rc::Rc;

use glam::Vec2;

use crate::components::sprite::SpriteAnimator;
use crate::core::rect::Rect;
use crate::core::world::{CollisionQuery, Role};
use crate::renderer::pixmap::Pixmap;

/// Which faces of a collideable obstruct movers.
///
/// Horizontal look-ahead moves test the face being approached (moving right
/// tests `left`, etc.), so one-way platforms are just a `Blocking` with a
/// single face set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blocking {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Blocking {
    /// Obstructs from every direction.
    pub const ALL: Blocking = Blocking {
        left: true,
        right: true,
        top: true,
        bottom: true,
    };

    /// A platform that only blocks movers landing from above.
    pub const TOP_ONLY: Blocking = Blocking {
        left: false,
        right: false,
        top: true,
        bottom: false,
    };
}

impl Default for Blocking {
    fn default() -> Self {
        Blocking::ALL
    }
}

/// Position/velocity/gravity kinematics with a pixel-rounded bounds rect.
#[derive(Debug, Clone)]
pub struct Body {
    image: Rc<Pixmap>,
    rect: Rect,
    position: Vec2,
    pub velocity: Vec2,
    pub gravity: Vec2,
    airborne: bool,
    air_time: f32,
    /// Only consulted when the body sits in the collideable role.
    pub blocking: Blocking,
}

impl Body {
    /// Create a grounded body at the origin with a mild downward gravity.
    pub fn new(image: Rc<Pixmap>) -> Self {
        let (w, h) = image.size();
        Self {
            image,
            rect: Rect::new(0, 0, w, h),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            gravity: Vec2::new(0.0, 0.8),
            airborne: false,
            air_time: 0.0,
            blocking: Blocking::ALL,
        }
    }

    pub fn at(image: Rc<Pixmap>, x: f32, y: f32) -> Self {
        let mut body = Self::new(image);
        body.set_position(x, y);
        body
    }

    pub fn image(&self) -> &Rc<Pixmap> {
        &self.image
    }

    /// Swap the displayed image; the rect keeps its position and takes the
    /// new image's size.
    pub fn set_image(&mut self, image: Rc<Pixmap>) {
        let (w, h) = image.size();
        self.image = image;
        self.rect.w = w;
        self.rect.h = h;
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Place the body; the rect's top-left follows the rounded position.
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
        self.sync_rect();
    }

    /// Move the body by a delta, keeping the rect in sync. Movers call this
    /// after a successful look-ahead query.
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
        self.sync_rect();
    }

    pub fn set_velocity(&mut self, x: f32, y: f32) {
        self.velocity = Vec2::new(x, y);
    }

    pub fn set_gravity(&mut self, x: f32, y: f32) {
        self.gravity = Vec2::new(x, y);
    }

    pub fn airborne(&self) -> bool {
        self.airborne
    }

    /// The latched airborne time reference (see [`apply_gravity`](Self::apply_gravity)).
    pub fn air_time(&self) -> f32 {
        self.air_time
    }

    /// Flip or force the airborne flag. Landing clears the airborne time
    /// reference.
    pub fn toggle_airborne(&mut self, force: Option<bool>) {
        self.airborne = force.unwrap_or(!self.airborne);
        if !self.airborne {
            self.air_time = 0.0;
        }
    }

    /// Accumulate gravity into velocity, scaled by `dt - air_time`.
    ///
    /// `air_time` is latched once, to the `dt` of the first airborne tick,
    /// and not advanced while airborne — a one-time offset rather than a
    /// time-since-takeoff term. Inherited behavior, kept verbatim.
    pub fn apply_gravity(&mut self, dt: f32) {
        let t = dt - self.air_time;
        self.velocity += self.gravity * t;
    }

    /// Integrate velocity into position and mirror the rect.
    pub fn step(&mut self) {
        self.position += self.velocity;
        self.sync_rect();
    }

    /// One physics tick: latch the airborne reference and apply gravity if
    /// airborne, then step.
    pub fn update(&mut self, dt: f32) {
        if self.airborne {
            if self.air_time == 0.0 {
                self.air_time = dt;
            }
            self.apply_gravity(dt);
        }
        self.step();
    }

    fn sync_rect(&mut self) {
        self.rect.x = self.position.x.round() as i32;
        self.rect.y = self.position.y.round() as i32;
    }
}

/// Snapshot of the passive party in a collision, taken at overlap time so
/// the handler sees state as it was when the pair was detected.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub role: Role,
    pub rect: Rect,
    pub velocity: Vec2,
}

/// Behavior seam for objects living in a world role set.
///
/// The default `update` is the plain physics tick. A mover that must respect
/// terrain overrides it and asks the query before committing each axis, e.g.
/// a jumper bouncing off a ceiling:
///
/// ```ignore
/// fn update(&mut self, dt: f32, query: &CollisionQuery<'_>) {
///     let vy = self.body().velocity.y;
///     if vy < 0.0 && !query.is_move_valid(self.body().rect(), 0.0, vy, false) {
///         // ceiling hit: bounce back down, dampened
///         self.body_mut().velocity.y = -vy / 2.0;
///     }
///     self.body_mut().update(dt);
/// }
/// ```
pub trait GameObject {
    fn body(&self) -> &Body;

    fn body_mut(&mut self) -> &mut Body;

    /// Per-tick behavior; physics only, drawing happens in the world's
    /// compositing pass.
    fn update(&mut self, dt: f32, query: &CollisionQuery<'_>) {
        let _ = query;
        self.body_mut().update(dt);
    }

    /// Invoked on the active mover for each permitted-pair overlap.
    fn collide(&mut self, contact: &Contact) {
        let _ = contact;
    }

    /// Optional sprite animator; when present the world advances it after
    /// `update` and swaps the body's image to the current frame.
    fn animator_mut(&mut self) -> Option<&mut SpriteAnimator> {
        None
    }
}

/// A body with no behavior of its own: scenery, pickups, static terrain.
#[derive(Debug, Clone)]
pub struct SimpleObject {
    body: Body,
}

impl SimpleObject {
    pub fn new(body: Body) -> Self {
        Self { body }
    }
}

impl GameObject for SimpleObject {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

/// A body paired with a [`SpriteAnimator`] — the composition answer to
/// "an animated game object": physics steps the body, the world's animator
/// hook keeps the displayed frame current.
#[derive(Debug)]
pub struct AnimatedObject {
    body: Body,
    animator: SpriteAnimator,
}

impl AnimatedObject {
    pub fn new(body: Body, animator: SpriteAnimator) -> Self {
        Self { body, animator }
    }

    pub fn animator(&self) -> &SpriteAnimator {
        &self.animator
    }
}

impl GameObject for AnimatedObject {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn animator_mut(&mut self) -> Option<&mut SpriteAnimator> {
        Some(&mut self.animator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::pixmap::Rgba8;

    fn body() -> Body {
        Body::new(Rc::new(Pixmap::solid(10, 10, Rgba8::WHITE)))
    }

    #[test]
    fn rect_mirrors_rounded_position() {
        let mut b = body();
        b.set_position(3.6, -1.4);
        assert_eq!(b.rect().top_left(), (4, -1));
        b.set_velocity(1.0, 0.0);
        b.step();
        assert_eq!(b.rect().top_left(), (5, -1));
    }

    #[test]
    fn grounded_bodies_ignore_gravity() {
        let mut b = body();
        b.update(1.0);
        assert_eq!(b.velocity, Vec2::ZERO);
        assert_eq!(b.position(), Vec2::ZERO);
    }

    #[test]
    fn airborne_latches_air_time_once() {
        let mut b = body();
        b.set_gravity(0.0, 1.0);
        b.toggle_airborne(Some(true));

        // First airborne tick latches air_time = dt, so gravity contributes
        // nothing that tick: dt - air_time == 0.
        b.update(0.5);
        assert_eq!(b.velocity.y, 0.0);
        assert_eq!(b.air_time(), 0.5);

        // Subsequent ticks scale by (dt - latched), not time since takeoff.
        b.update(0.5);
        assert_eq!(b.velocity.y, 0.0);
        b.update(1.0);
        assert!((b.velocity.y - 0.5).abs() < 1e-6);
        assert_eq!(b.air_time(), 0.5);
    }

    #[test]
    fn landing_clears_air_time() {
        let mut b = body();
        b.toggle_airborne(Some(true));
        b.update(0.25);
        assert_eq!(b.air_time(), 0.25);
        b.toggle_airborne(Some(false));
        assert_eq!(b.air_time(), 0.0);
        assert!(!b.airborne());
    }

    #[test]
    fn toggle_without_force_flips() {
        let mut b = body();
        b.toggle_airborne(None);
        assert!(b.airborne());
        b.toggle_airborne(None);
        assert!(!b.airborne());
    }

    #[test]
    fn set_image_resizes_rect_in_place() {
        let mut b = body();
        b.set_position(7.0, 9.0);
        b.set_image(Rc::new(Pixmap::new(4, 6)));
        let r = b.rect();
        assert_eq!((r.x, r.y, r.w, r.h), (7, 9, 4, 6));
    }
}
