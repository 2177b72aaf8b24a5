//! Axis-aligned bounds and direction helpers
//!
//! Every collidable is an axis-aligned box described by its center and
//! half extents. Overlap, containment and pursuit directions all work on
//! box centers.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.half_extents.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.half_extents.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y - self.half_extents.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y + self.half_extents.y
    }

    /// Same box shifted by `delta`
    #[inline]
    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.center + delta, self.half_extents)
    }

    /// Strict overlap test (touching edges do not count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// True when no part of the box is left inside the arena
    pub fn fully_outside_arena(&self) -> bool {
        let outside_x = self.right() < 0.0 || self.left() > ARENA_WIDTH;
        let outside_y = self.bottom() < 0.0 || self.top() > ARENA_HEIGHT;
        outside_x || outside_y
    }
}

/// Per-axis containment of a box inside the arena: `(horizontal_ok, vertical_ok)`
pub fn in_bounds(shape: &Aabb) -> (bool, bool) {
    let horizontal = shape.left() >= 0.0 && shape.right() <= ARENA_WIDTH;
    let vertical = shape.top() >= 0.0 && shape.bottom() <= ARENA_HEIGHT;
    (horizontal, vertical)
}

/// True when a point lies inside the arena rectangle
pub fn arena_contains(point: Vec2) -> bool {
    (0.0..=ARENA_WIDTH).contains(&point.x) && (0.0..=ARENA_HEIGHT).contains(&point.y)
}

/// Unit vector from `from` toward `to`
///
/// Returns `None` when the two points coincide; callers pick their own
/// fallback heading.
pub fn direction_to(from: Vec2, to: Vec2) -> Option<Vec2> {
    (to - from).try_normalize()
}

/// `direction_to` with an explicit fallback for coincident points
pub fn direction_or(from: Vec2, to: Vec2, fallback: Vec2) -> Vec2 {
    match direction_to(from, to) {
        Some(dir) => dir,
        None => {
            log::debug!("Coincident centers at {:?}, keeping heading {:?}", from, fallback);
            fallback
        }
    }
}
