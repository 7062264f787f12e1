//! Axis-aligned rectangle overlap tests
//!
//! Every entity in the playfield is a box described by its center and
//! half extents. Boxes that merely share an edge do not collide.

use std::borrow::Borrow;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box in playfield pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Rect {
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Square box of the given side length
    pub fn square(center: Vec2, size: f32) -> Self {
        Self::from_center(center, Vec2::splat(size / 2.0))
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    pub fn width(&self) -> f32 {
        self.half_extents.x * 2.0
    }

    pub fn height(&self) -> f32 {
        self.half_extents.y * 2.0
    }

    /// Strict overlap test (touching edges is a miss)
    pub fn intersects(&self, other: &Rect) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
    }
}

/// Index of the first box in `others` that overlaps `subject`
pub fn first_overlap<I>(subject: &Rect, others: I) -> Option<usize>
where
    I: IntoIterator,
    I::Item: Borrow<Rect>,
{
    others.into_iter().position(|r| subject.intersects(r.borrow()))
}
