//! Axis-aligned hitboxes
//!
//! Collision in the runner is box-vs-box: every collidable exposes a fixed
//! size rectangle centred on its position, independent of sprite size.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, centred on `center`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub center: Vec2,
    pub size: Vec2,
}

impl Hitbox {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            size: size.abs(),
        }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Top-left corner
    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents()
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents()
    }

    /// Strict overlap test; boxes that only share an edge do not intersect
    pub fn intersects(&self, other: &Hitbox) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
    }
}

/// Details handed to a collidable when an obstacle hits it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionHit {
    pub obstacle_id: u32,
    pub obstacle_box: Hitbox,
    /// Score at the moment of impact
    pub score: f32,
}

/// Anything obstacles can run into
pub trait Collidable {
    fn hitbox(&self) -> Hitbox;

    /// Collision handler, called once per obstacle hit
    fn on_collide(&mut self, _hit: &CollisionHit) {}
}

impl Collidable for Hitbox {
    fn hitbox(&self) -> Hitbox {
        *self
    }
}
