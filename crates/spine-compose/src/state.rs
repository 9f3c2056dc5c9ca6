//! Designer view state: artwork zoom/offset and the large text overlay

use crate::constants::{
    LARGE_TEXT_DEFAULT_PT, LARGE_TEXT_HEIGHT_RATIO, LARGE_TEXT_MIN_PT, POINTS_PER_MM,
};
use crate::geometry::{PointMm, clamp};
use crate::layout::{ArtworkBounds, StackMetrics, natural_size_mm};
use crate::types::FontChoice;

/// Whether a value follows the engine or was set by the user
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Adjust<T> {
    /// Derived from the current bounds on every recompute
    #[default]
    Auto,
    /// Chosen by the user; only clamped, never reset
    Manual(T),
}

impl<T: Copy> Adjust<T> {
    pub fn is_manual(&self) -> bool {
        matches!(self, Adjust::Manual(_))
    }

    /// The manual value, or `auto` when following the engine
    pub fn resolve(&self, auto: T) -> T {
        match *self {
            Adjust::Auto => auto,
            Adjust::Manual(value) => value,
        }
    }
}

/// What happened to a zoom request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomOutcome {
    /// Zoom applied as requested (possibly capped at the maximum)
    Applied(f32),
    /// Request would expose uncovered spine; the previous zoom stays
    Declined { min_zoom: f32, kept: f32 },
}

/// Artwork placement state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArtworkState {
    /// Pixel size of the decoded image, `None` when no artwork is loaded
    pub image_px: Option<(u32, u32)>,
    pub zoom: Adjust<f32>,
    /// Displacement of the artwork center from the stack center
    pub offset: Adjust<PointMm>,
}

impl ArtworkState {
    /// Fresh state for a newly loaded image
    pub fn for_image(width_px: u32, height_px: u32) -> Self {
        Self {
            image_px: Some((width_px, height_px)),
            ..Self::default()
        }
    }

    /// Natural size for the current metrics; falls back to the required area
    pub fn natural_size_mm(&self, metrics: &StackMetrics) -> (f32, f32) {
        natural_size_mm(self.image_px.unwrap_or((0, 0)), metrics)
    }

    /// Zoom in effect for `bounds`
    pub fn effective_zoom(&self, bounds: &ArtworkBounds) -> f32 {
        self.zoom.resolve(bounds.min_zoom)
    }

    /// Offset in effect for `bounds`, always inside the legal range
    pub fn effective_offset(&self, bounds: &ArtworkBounds) -> PointMm {
        let zoom = self.effective_zoom(bounds);
        bounds.clamp_offset(self.offset.resolve(PointMm::ORIGIN), zoom)
    }

    /// Re-apply bounds after the stack or the image changed.
    ///
    /// Auto values keep following the engine. A manual zoom below the new
    /// minimum is raised to it, and a manual offset is clamped into the new
    /// range.
    pub fn reclamp(&mut self, bounds: &ArtworkBounds) {
        if let Adjust::Manual(zoom) = self.zoom {
            self.zoom = Adjust::Manual(bounds.clamp_zoom(zoom));
        }
        let zoom = self.effective_zoom(bounds);
        if let Adjust::Manual(offset) = self.offset {
            self.offset = Adjust::Manual(bounds.clamp_offset(offset, zoom));
        }
    }

    /// User zoom request. Zooming below the minimum is declined.
    pub fn request_zoom(&mut self, requested: f32, bounds: &ArtworkBounds) -> ZoomOutcome {
        let current = self.effective_zoom(bounds);
        if !requested.is_finite() || requested < bounds.min_zoom {
            return ZoomOutcome::Declined {
                min_zoom: bounds.min_zoom,
                kept: current,
            };
        }
        let applied = bounds.clamp_zoom(requested);
        self.zoom = Adjust::Manual(applied);
        self.reclamp(bounds);
        ZoomOutcome::Applied(applied)
    }

    /// User offset request, clamped into the legal range
    pub fn request_offset(&mut self, requested: PointMm, bounds: &ArtworkBounds) -> PointMm {
        let zoom = self.effective_zoom(bounds);
        let clamped = bounds.clamp_offset(requested, zoom);
        self.offset = Adjust::Manual(clamped);
        clamped
    }

    /// Back to centered, minimum zoom
    pub fn reset_view(&mut self) {
        self.zoom = Adjust::Auto;
        self.offset = Adjust::Auto;
    }
}

/// Largest text size (points) the shortest spine can hold
pub fn max_text_size_pt(min_height_mm: f32) -> f32 {
    (min_height_mm * POINTS_PER_MM * LARGE_TEXT_HEIGHT_RATIO)
        .floor()
        .max(LARGE_TEXT_MIN_PT)
}

/// Large text drawn across the whole stack
#[derive(Debug, Clone, PartialEq)]
pub struct LargeTextState {
    pub enabled: bool,
    pub text: String,
    pub font: FontChoice,
    pub size_pt: f32,
    /// Derived from the shortest book; `size_pt` never exceeds it
    pub max_size_pt: f32,
}

impl Default for LargeTextState {
    fn default() -> Self {
        Self {
            enabled: false,
            text: String::new(),
            font: FontChoice::default(),
            size_pt: LARGE_TEXT_DEFAULT_PT,
            max_size_pt: LARGE_TEXT_DEFAULT_PT,
        }
    }
}

impl LargeTextState {
    /// Whether the renderer has anything to draw
    pub fn is_visible(&self) -> bool {
        self.enabled && !self.text.trim().is_empty()
    }

    /// Recompute the maximum from the shortest book and clamp the size
    pub fn reclamp(&mut self, metrics: &StackMetrics) {
        self.max_size_pt = max_text_size_pt(metrics.min_height_mm);
        self.size_pt = clamp(self.size_pt, LARGE_TEXT_MIN_PT, self.max_size_pt);
    }

    /// Set the size, clamped to the current range; returns the applied size
    pub fn request_size(&mut self, size_pt: f32) -> f32 {
        self.size_pt = clamp(size_pt, LARGE_TEXT_MIN_PT, self.max_size_pt);
        self.size_pt
    }
}
