//! The world: classified game objects, collision, camera focus, shake and
//! layered compositing onto an offscreen surface.
//!
//! Objects are owned by exactly one role set (backgrounds, collideables,
//! enemies, players, items) which fixes both their collision rules and their
//! draw order. Player/enemy/item overlap is resolved eagerly each tick;
//! terrain is handled reactively through the look-ahead
//! [`CollisionQuery`] movers consult before committing a move, so a body
//! resting against a collideable costs nothing.

use std::rc::Rc;

use glam::Vec2;

use crate::components::body::{Contact, GameObject};
use crate::core::rect::Rect;
use crate::core::rng::Rng;
use crate::error::{Error, Result};
use crate::renderer::pixmap::{Pixmap, Rgba8};

/// Mutually exclusive object classification; decides collision rules and
/// draw order (variants listed back-to-front).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Background,
    Collideable,
    Enemy,
    Player,
    Item,
}

impl Role {
    /// Draw order, back to front.
    pub const DRAW_ORDER: [Role; 5] = [
        Role::Background,
        Role::Collideable,
        Role::Enemy,
        Role::Player,
        Role::Item,
    ];
}

/// Look-ahead collision primitive handed to movers during their update.
///
/// This is the only collision test movers should use before committing a
/// position change; it never fails, it just answers.
pub struct CollisionQuery<'a> {
    colliders: &'a [Box<dyn GameObject>],
    width: u32,
}

impl CollisionQuery<'_> {
    /// Would translating `rect` by `(dx, dy)` be a legal move?
    ///
    /// Deltas are rounded to whole pixels. With `wall_check`, moves crossing
    /// the world's left or right boundary in the direction of travel are
    /// rejected. A move is otherwise rejected when the translated rect
    /// overlaps a collideable whose approached face blocks: the face is
    /// derived from the delta's sign, so horizontal moves only consult
    /// left/right faces and vertical moves only top/bottom faces. Test one
    /// axis at a time to learn which motion causes the collision.
    pub fn is_move_valid(&self, rect: Rect, dx: f32, dy: f32, wall_check: bool) -> bool {
        let moved = rect.translated(dx.round() as i32, dy.round() as i32);

        if wall_check {
            if dx < 0.0 && moved.x < 0 {
                return false;
            }
            if dx > 0.0 && moved.right() > self.width as i32 {
                return false;
            }
        }

        for obj in self.colliders {
            let body = obj.body();
            let blocking = body.blocking;
            let face_blocks = if dx > 0.0 {
                blocking.left
            } else if dx < 0.0 {
                blocking.right
            } else if dy > 0.0 {
                blocking.top
            } else if dy < 0.0 {
                blocking.bottom
            } else {
                // Zero-delta queries are plain overlap tests.
                true
            };
            if face_blocks && moved.overlaps(&body.rect()) {
                return false;
            }
        }
        true
    }
}

/// Camera anchor: either a live object's bounds, re-read every tick, or a
/// detached snapshot.
#[derive(Debug, Clone, Copy)]
enum FocusTarget {
    Object { role: Role, index: usize },
    Fixed(Rect),
}

/// A level: world-sized drawing canvas, role sets, camera focus and shake.
pub struct World {
    width: u32,
    height: u32,
    screen_size: (u32, u32),
    background: Option<Rc<Pixmap>>,
    clear_color: Rgba8,
    canvas: Pixmap,

    backgrounds: Vec<Box<dyn GameObject>>,
    collideables: Vec<Box<dyn GameObject>>,
    enemies: Vec<Box<dyn GameObject>>,
    players: Vec<Box<dyn GameObject>>,
    items: Vec<Box<dyn GameObject>>,

    focus: Option<FocusTarget>,
    focus_axes: (bool, bool),
    focus_offset: Vec2,

    shake_pad: Option<u32>,
    offset: (i32, i32),

    /// Absolute clock fed to strip animators.
    time: f32,
    rng: Rng,
}

impl World {
    /// Create a world `width × height` pixels large, viewed through a screen
    /// of `screen_size`. Horizontal focus is enabled by default, matching
    /// side-scrolling use; call [`set_focus_axes`](Self::set_focus_axes) for
    /// anything else.
    pub fn new(width: u32, height: u32, screen_size: (u32, u32)) -> Self {
        Self {
            width,
            height,
            screen_size,
            background: None,
            clear_color: Rgba8::BLACK,
            canvas: Pixmap::new(width, height),
            backgrounds: Vec::new(),
            collideables: Vec::new(),
            enemies: Vec::new(),
            players: Vec::new(),
            items: Vec::new(),
            focus: None,
            focus_axes: (true, false),
            focus_offset: Vec2::ZERO,
            shake_pad: None,
            offset: (0, 0),
            time: 0.0,
            rng: Rng::new(0x5eed),
        }
    }

    /// Reseed the internal RNG (shake sampling) for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Rng::new(seed);
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn screen_size(&self) -> (u32, u32) {
        self.screen_size
    }

    /// Backdrop image drawn first each tick, panned with the horizontal
    /// focus.
    pub fn set_background(&mut self, image: Rc<Pixmap>) {
        self.background = Some(image);
    }

    pub fn set_clear_color(&mut self, color: Rgba8) {
        self.clear_color = color;
    }

    // -- Role sets ------------------------------------------------------

    /// Add an object under `role`; returns its index within that role set.
    pub fn add(&mut self, role: Role, obj: impl GameObject + 'static) -> usize {
        let set = self.role_set_mut(role);
        set.push(Box::new(obj));
        set.len() - 1
    }

    pub fn add_background(&mut self, obj: impl GameObject + 'static) -> usize {
        self.add(Role::Background, obj)
    }

    pub fn add_collideable(&mut self, obj: impl GameObject + 'static) -> usize {
        self.add(Role::Collideable, obj)
    }

    pub fn add_enemy(&mut self, obj: impl GameObject + 'static) -> usize {
        self.add(Role::Enemy, obj)
    }

    pub fn add_player(&mut self, obj: impl GameObject + 'static) -> usize {
        self.add(Role::Player, obj)
    }

    pub fn add_item(&mut self, obj: impl GameObject + 'static) -> usize {
        self.add(Role::Item, obj)
    }

    /// All objects in a role set, in insertion order.
    pub fn role_set(&self, role: Role) -> &[Box<dyn GameObject>] {
        match role {
            Role::Background => &self.backgrounds,
            Role::Collideable => &self.collideables,
            Role::Enemy => &self.enemies,
            Role::Player => &self.players,
            Role::Item => &self.items,
        }
    }

    fn role_set_mut(&mut self, role: Role) -> &mut Vec<Box<dyn GameObject>> {
        match role {
            Role::Background => &mut self.backgrounds,
            Role::Collideable => &mut self.collideables,
            Role::Enemy => &mut self.enemies,
            Role::Player => &mut self.players,
            Role::Item => &mut self.items,
        }
    }

    pub fn object(&self, role: Role, index: usize) -> Option<&dyn GameObject> {
        self.role_set(role).get(index).map(|b| b.as_ref())
    }

    pub fn object_mut(&mut self, role: Role, index: usize) -> Option<&mut (dyn GameObject + 'static)> {
        self.role_set_mut(role).get_mut(index).map(|b| b.as_mut())
    }

    /// Remove an object, returning it. Later indices in the same role set
    /// shift down; a tracked focus on this set may need re-pointing.
    pub fn remove(&mut self, role: Role, index: usize) -> Option<Box<dyn GameObject>> {
        let set = self.role_set_mut(role);
        if index < set.len() {
            Some(set.remove(index))
        } else {
            None
        }
    }

    /// Total object count across every role set.
    pub fn len(&self) -> usize {
        Role::DRAW_ORDER
            .iter()
            .map(|r| self.role_set(*r).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -- Collision ------------------------------------------------------

    /// Look-ahead query against the current collideable set. See
    /// [`CollisionQuery::is_move_valid`].
    pub fn is_move_valid(&self, rect: Rect, dx: f32, dy: f32, wall_check: bool) -> bool {
        self.query().is_move_valid(rect, dx, dy, wall_check)
    }

    fn query(&self) -> CollisionQuery<'_> {
        CollisionQuery {
            colliders: &self.collideables,
            width: self.width,
        }
    }

    // -- Focus ----------------------------------------------------------

    /// Anchor the camera on an object. With `copy`, the object's current
    /// bounds are snapshotted instead of tracked.
    pub fn set_focus(&mut self, role: Role, index: usize, copy: bool) -> Result<()> {
        let obj = self.object(role, index).ok_or_else(|| {
            Error::InvalidArgument(format!("no object at {:?}[{}]", role, index))
        })?;
        self.focus = Some(if copy {
            FocusTarget::Fixed(obj.body().rect())
        } else {
            FocusTarget::Object { role, index }
        });
        Ok(())
    }

    /// Anchor the camera on a detached rectangle.
    pub fn set_focus_rect(&mut self, rect: Rect) {
        self.focus = Some(FocusTarget::Fixed(rect));
    }

    pub fn remove_focus(&mut self) {
        self.focus = None;
    }

    pub fn has_focus(&self) -> bool {
        self.focus.is_some()
    }

    /// Enable the camera transform per axis.
    pub fn set_focus_axes(&mut self, horizontal: bool, vertical: bool) {
        self.focus_axes = (horizontal, vertical);
    }

    /// Constant offset applied after the camera transform.
    pub fn set_focus_offset(&mut self, offset: Vec2) {
        self.focus_offset = offset;
    }

    fn resolved_focus(&self) -> Option<Rect> {
        match self.focus {
            None => None,
            Some(FocusTarget::Fixed(rect)) => Some(rect),
            Some(FocusTarget::Object { role, index }) => {
                self.object(role, index).map(|o| o.body().rect())
            }
        }
    }

    /// Map a world position to canvas coordinates through the focus
    /// transform.
    ///
    /// Per enabled axis the focus is pinned to the screen center
    /// (`anchor = center - focus_size/2`) and everything else shifts by its
    /// distance from the focus, so the world scrolls opposite the focus's
    /// motion. Disabled axes and the unfocused state draw at the raw
    /// position. The focus offset is added last either way.
    pub fn camera_position(&self, x: i32, y: i32) -> (i32, i32) {
        let ox = self.focus_offset.x.round() as i32;
        let oy = self.focus_offset.y.round() as i32;
        match self.resolved_focus() {
            None => (x + ox, y + oy),
            Some(f) => {
                let cx = if self.focus_axes.0 {
                    let anchor = self.screen_size.0 as i32 / 2 - f.w as i32 / 2;
                    anchor - (f.x - x)
                } else {
                    x
                };
                let cy = if self.focus_axes.1 {
                    let anchor = self.screen_size.1 as i32 / 2 - f.h as i32 / 2;
                    anchor - (f.y - y)
                } else {
                    y
                };
                (cx + ox, cy + oy)
            }
        }
    }

    // -- Shake ----------------------------------------------------------

    /// Jitter the composited world by up to `±pad/2` pixels per axis each
    /// tick.
    pub fn set_shake(&mut self, pad: u32) {
        self.shake_pad = Some(pad);
    }

    pub fn clear_shake(&mut self) {
        self.shake_pad = None;
        self.offset = (0, 0);
    }

    /// The jitter applied on the most recent tick.
    pub fn shake_offset(&self) -> (i32, i32) {
        self.offset
    }

    // -- Tick -----------------------------------------------------------

    /// Advance the world one tick and composite it onto `out`.
    pub fn update(&mut self, dt: f32, out: &mut Pixmap) {
        self.time += dt;

        self.notify_collisions();
        self.drop_stale_focus();
        self.update_objects(dt);
        self.composite();

        if let Some(pad) = self.shake_pad {
            let half = (pad / 2) as i32;
            self.offset = (
                self.rng.range_i32(-half, half),
                self.rng.range_i32(-half, half),
            );
        }
        out.blit(&self.canvas, self.offset.0, self.offset.1);
    }

    /// Brute-force permitted-pair overlap: players against items and
    /// enemies, enemies against items. The active mover's `collide` gets a
    /// snapshot of the passive party. Collideables are excluded on purpose;
    /// they are the look-ahead query's job.
    fn notify_collisions(&mut self) {
        for player in &mut self.players {
            for item in &self.items {
                let body = item.body();
                if player.body().rect().overlaps(&body.rect()) {
                    player.collide(&Contact {
                        role: Role::Item,
                        rect: body.rect(),
                        velocity: body.velocity,
                    });
                }
            }
            for enemy in &self.enemies {
                let body = enemy.body();
                if player.body().rect().overlaps(&body.rect()) {
                    player.collide(&Contact {
                        role: Role::Enemy,
                        rect: body.rect(),
                        velocity: body.velocity,
                    });
                }
            }
        }
        for enemy in &mut self.enemies {
            for item in &self.items {
                let body = item.body();
                if enemy.body().rect().overlaps(&body.rect()) {
                    enemy.collide(&Contact {
                        role: Role::Item,
                        rect: body.rect(),
                        velocity: body.velocity,
                    });
                }
            }
        }
    }

    fn drop_stale_focus(&mut self) {
        if let Some(FocusTarget::Object { role, index }) = self.focus {
            if self.object(role, index).is_none() {
                log::warn!("focused object {:?}[{}] is gone, unfocusing", role, index);
                self.focus = None;
            }
        }
    }

    fn update_objects(&mut self, dt: f32) {
        let time = self.time;

        // Terrain and scenery first, without a query: they are what the
        // query tests against.
        let empty = CollisionQuery {
            colliders: &[],
            width: self.width,
        };
        for obj in self.backgrounds.iter_mut().chain(self.collideables.iter_mut()) {
            obj.update(dt, &empty);
            refresh_animator(obj.as_mut(), time);
        }

        let query = CollisionQuery {
            colliders: &self.collideables,
            width: self.width,
        };
        for obj in self
            .enemies
            .iter_mut()
            .chain(self.players.iter_mut())
            .chain(self.items.iter_mut())
        {
            obj.update(dt, &query);
            refresh_animator(obj.as_mut(), time);
        }
    }

    /// Clear, pan the backdrop, then blit every role set back to front
    /// through the camera transform.
    fn composite(&mut self) {
        self.canvas.fill(self.clear_color);

        if let Some(bg) = self.background.clone() {
            let x = if self.focus_axes.0 {
                self.camera_position(0, 0).0
            } else {
                0
            };
            self.canvas.blit(&bg, x, 0);
        }

        for role in Role::DRAW_ORDER {
            for i in 0..self.role_set(role).len() {
                let body = self.role_set(role)[i].body();
                let rect = body.rect();
                let image = Rc::clone(body.image());
                let (x, y) = self.camera_position(rect.x, rect.y);
                self.canvas.blit(&image, x, y);
            }
        }
    }

    /// The composited world surface from the last tick.
    pub fn canvas(&self) -> &Pixmap {
        &self.canvas
    }
}

/// Advance an object's animator, if any, and mirror the current frame onto
/// its body.
fn refresh_animator(obj: &mut dyn GameObject, time: f32) {
    if let Some(animator) = obj.animator_mut() {
        animator.advance(time);
        let image = Rc::clone(animator.image());
        obj.body_mut().set_image(image);
    }
}
