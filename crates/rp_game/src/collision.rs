//! Collision against the level's static solids.
//!
//! Solids are integer, grid-aligned rectangles kept in the order the level
//! builder emitted them (row-major). Actors move with sub-pixel precision; every
//! test rounds the tentative rectangle to whole pixels first.
//!
//! The core algorithm is **axis-separated, first-hit** resolution: resolve X
//! movement first, then resolve Y from the already-corrected X. On each axis the
//! first solid in list order that overlaps the tentative rectangle wins and the
//! actor is clamped flush against it, even if another solid is closer. That can
//! let a fast actor clip a corner; it is kept because level tuning depends on it.
//!
//! An actor that already overlaps a solid before moving is not pushed out; only
//! movement into new overlaps is resolved.

use glam::Vec2;

/// Integer axis-aligned rectangle. Overlap is strict: touching edges do not
/// overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right() <= other.x
            || self.x >= other.right()
            || self.bottom() <= other.y
            || self.y >= other.bottom())
    }
}

/// Sub-pixel actor box, top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    /// Whole-pixel rectangle used for every overlap test. Each component rounds
    /// independently (half away from zero).
    pub fn to_rect(self) -> Rect {
        Rect::new(
            self.x.round() as i32,
            self.y.round() as i32,
            self.w.round() as i32,
            self.h.round() as i32,
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CollisionMoveResult {
    pub aabb: Aabb,
    pub velocity: Vec2,
    #[allow(dead_code)]
    pub blocked_x: bool,
    #[allow(dead_code)]
    pub blocked_y: bool,
    /// Set only by a downward vertical collision.
    pub on_ground: bool,
}

#[derive(Debug, Clone, Copy)]
struct AxisResolution {
    position: f32,
    velocity: f32,
    blocked: bool,
}

pub fn first_overlap<'a>(solids: &'a [Rect], rect: &Rect) -> Option<&'a Rect> {
    solids.iter().find(|solid| solid.overlaps(rect))
}

pub fn overlaps_any(solids: &[Rect], rect: &Rect) -> bool {
    first_overlap(solids, rect).is_some()
}

pub fn move_and_collide(solids: &[Rect], aabb: Aabb, velocity: Vec2) -> CollisionMoveResult {
    let x = resolve_axis_x(solids, aabb, velocity.x);
    let mut moved = aabb;
    moved.x = x.position;

    let y = resolve_axis_y(solids, moved, velocity.y);
    moved.y = y.position;

    CollisionMoveResult {
        aabb: moved,
        velocity: Vec2::new(x.velocity, y.velocity),
        blocked_x: x.blocked,
        blocked_y: y.blocked,
        on_ground: y.blocked && velocity.y > 0.0,
    }
}

fn resolve_axis_x(solids: &[Rect], aabb: Aabb, vx: f32) -> AxisResolution {
    let mut tentative = aabb;
    tentative.x += vx;

    let Some(solid) = first_overlap(solids, &tentative.to_rect()) else {
        return AxisResolution {
            position: tentative.x,
            velocity: vx,
            blocked: false,
        };
    };

    let position = if vx > 0.0 {
        solid.x as f32 - aabb.w
    } else if vx < 0.0 {
        solid.right() as f32
    } else {
        aabb.x
    };
    AxisResolution {
        position,
        velocity: 0.0,
        blocked: true,
    }
}

fn resolve_axis_y(solids: &[Rect], aabb: Aabb, vy: f32) -> AxisResolution {
    let mut tentative = aabb;
    tentative.y += vy;

    let Some(solid) = first_overlap(solids, &tentative.to_rect()) else {
        return AxisResolution {
            position: tentative.y,
            velocity: vy,
            blocked: false,
        };
    };

    let position = if vy > 0.0 {
        solid.y as f32 - aabb.h
    } else if vy < 0.0 {
        solid.bottom() as f32
    } else {
        aabb.y
    };
    AxisResolution {
        position,
        velocity: 0.0,
        blocked: true,
    }
}
