//! Axis-aligned bounding boxes on the level grid
//!
//! `pos` is the top-left corner, y grows downward. Intersection uses open
//! intervals so boxes that only share an edge do not collide.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: DVec2,
    pub width: f64,
    pub height: f64,
}

impl Aabb {
    pub fn new(pos: DVec2, width: f64, height: f64) -> Self {
        Self { pos, width, height }
    }

    /// Box covering grid cells `start..=end`
    pub fn from_corners(start: DVec2, end: DVec2) -> Result<Self, ValidationError> {
        let width = end.x - start.x + 1.0;
        let height = end.y - start.y + 1.0;
        if width <= 0.0 || height <= 0.0 {
            return Err(ValidationError::Geometry { width, height });
        }
        Ok(Self::new(start, width, height))
    }

    /// Rejects negative or non-finite dimensions
    pub fn validate(&self) -> Result<(), ValidationError> {
        let finite = self.width.is_finite() && self.height.is_finite() && self.pos.is_finite();
        if !finite || self.width < 0.0 || self.height < 0.0 {
            return Err(ValidationError::Geometry {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.pos.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.pos.y + self.height
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.pos.x + self.width / 2.0, self.pos.y + self.height / 2.0)
    }

    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.pos.x < other.right()
            && self.right() > other.pos.x
            && self.pos.y < other.bottom()
            && self.bottom() > other.pos.y
    }

    /// Closed containment (edges count)
    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.pos.x
            && point.x <= self.right()
            && point.y >= self.pos.y
            && point.y <= self.bottom()
    }

    /// Entirely to the left of `other` on the x axis
    #[inline]
    pub fn left_of(&self, other: &Aabb) -> bool {
        self.right() <= other.pos.x
    }

    #[inline]
    pub fn right_of(&self, other: &Aabb) -> bool {
        self.pos.x >= other.right()
    }

    /// Entirely above `other`
    #[inline]
    pub fn top_of(&self, other: &Aabb) -> bool {
        self.bottom() <= other.pos.y
    }

    #[inline]
    pub fn bottom_of(&self, other: &Aabb) -> bool {
        self.pos.y >= other.bottom()
    }

    /// Our bottom edge sinks into `other`'s top edge by at most `amount`
    pub fn top_overlap_by(&self, other: &Aabb, amount: f64) -> bool {
        let overlap = self.bottom() - other.pos.y;
        (0.0..=amount).contains(&overlap)
    }

    /// Our top edge pokes into `other`'s bottom edge by at most `amount`
    pub fn bottom_overlap_by(&self, other: &Aabb, amount: f64) -> bool {
        let overlap = other.bottom() - self.pos.y;
        (0.0..=amount).contains(&overlap)
    }
}
