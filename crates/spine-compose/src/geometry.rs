//! Geometry primitives
//!
//! Everything upstream of the rasterizer works in millimetres. Conversion to
//! device pixels happens only at render boundaries, through an explicit
//! pixels-per-millimetre factor.

use crate::constants::{MM_PER_CM, POINTS_PER_MM};

/// Saturating clamp.
///
/// `min == max` collapses to that value. An inverted range or a NaN value
/// collapses to `min`, so the result is always finite when the bounds are.
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() || max <= min {
        return min;
    }
    value.max(min).min(max)
}

/// Convert centimetres to millimetres
#[inline]
pub fn cm_to_mm(cm: f32) -> f32 {
    cm * MM_PER_CM
}

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / POINTS_PER_MM
}

/// A point or displacement in millimetres (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointMm {
    pub x: f32,
    pub y: f32,
}

impl PointMm {
    pub const ORIGIN: PointMm = PointMm { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for PointMm {
    type Output = PointMm;

    fn add(self, rhs: PointMm) -> PointMm {
        PointMm::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for PointMm {
    type Output = PointMm;

    fn sub(self, rhs: PointMm) -> PointMm {
        PointMm::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A rectangular area in millimetres, origin at the top-left
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectMm {
    /// X position (left edge)
    pub x: f32,
    /// Y position (top edge)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectMm {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle of the given size centered on a point
    pub fn centered_at(center: PointMm, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    pub fn origin(&self) -> PointMm {
        PointMm::new(self.x, self.y)
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge y coordinate
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> PointMm {
        PointMm::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn translate(&self, by: PointMm) -> Self {
        Self::new(self.x + by.x, self.y + by.y, self.width, self.height)
    }

    /// Grow the rectangle upward, keeping the bottom edge fixed
    pub fn extend_top(&self, by: f32) -> Self {
        Self::new(self.x, self.y - by, self.width, self.height + by)
    }

    /// Overlapping area, or `None` when the rectangles are disjoint
    pub fn intersect(&self, other: &RectMm) -> Option<RectMm> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        (right > left && bottom > top).then(|| RectMm::new(left, top, right - left, bottom - top))
    }

    /// Same rectangle in device pixels
    pub fn scaled(&self, pixels_per_mm: f32) -> RectMm {
        RectMm::new(
            self.x * pixels_per_mm,
            self.y * pixels_per_mm,
            self.width * pixels_per_mm,
            self.height * pixels_per_mm,
        )
    }
}
