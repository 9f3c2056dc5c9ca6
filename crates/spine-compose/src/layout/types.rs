//! Layout data types
//!
//! These types carry the results of the stack and artwork calculations
//! between the layout engine and the page renderer.

use crate::geometry::{PointMm, RectMm};
use crate::types::Rgb;

/// Aggregate measurements of the whole stack
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StackMetrics {
    /// Sum of spine widths plus the gaps between them
    pub total_width_mm: f32,
    /// Height of the tallest book
    pub max_height_mm: f32,
    /// Height of the shortest book
    pub min_height_mm: f32,
    /// Width of the required area, including side clearances
    pub required_width_mm: f32,
    /// Height of the required area, including top and bottom clearances
    pub required_height_mm: f32,
    /// Whether the required area fits the target sheet
    pub fits_sheet: bool,
}

/// One book's spine rectangle within the required area
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRect {
    pub id: u32,
    pub label: String,
    pub color: Rgb,
    /// Position and size, relative to the top-left of the required area
    pub rect: RectMm,
}

/// Output of [`layout_stack`](super::layout_stack)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StackLayout {
    pub metrics: StackMetrics,
    /// Left to right, in input order
    pub rects: Vec<PlacedRect>,
}

impl StackLayout {
    /// Size of the required bounding area
    pub fn required_size(&self) -> (f32, f32) {
        (
            self.metrics.required_width_mm,
            self.metrics.required_height_mm,
        )
    }

    /// Center of the required area in its own coordinates
    pub fn required_center(&self) -> PointMm {
        PointMm::new(
            self.metrics.required_width_mm / 2.0,
            self.metrics.required_height_mm / 2.0,
        )
    }
}

/// The region the artwork must cover at minimum zoom
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArtworkBounds {
    pub safe_width_mm: f32,
    pub safe_height_mm: f32,
    /// Artwork size at zoom 1.0
    pub artwork_width_mm: f32,
    pub artwork_height_mm: f32,
    /// Smallest zoom at which the artwork still covers the safe area
    pub min_zoom: f32,
}

/// Legal offset range for one zoom level, symmetric around center
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OffsetLimits {
    pub max_x_mm: f32,
    pub max_y_mm: f32,
}

impl OffsetLimits {
    /// Whether the offset is pinned to center on both axes
    pub fn is_pinned(&self) -> bool {
        self.max_x_mm == 0.0 && self.max_y_mm == 0.0
    }

    pub fn contains(&self, offset: PointMm) -> bool {
        offset.x.abs() <= self.max_x_mm && offset.y.abs() <= self.max_y_mm
    }
}
