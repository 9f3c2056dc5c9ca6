//! Artwork bounds
//!
//! Given the stack metrics and the artwork's natural size, works out how far
//! the artwork may shrink and how far it may slide before some spine would
//! show an uncovered strip.

use crate::constants::{ARTWORK_SIDE_MARGIN_MM, ARTWORK_VERTICAL_MARGIN_MM, MAX_ZOOM_FACTOR};
use crate::geometry::{PointMm, clamp};

use super::{ArtworkBounds, OffsetLimits, StackMetrics};

/// Natural artwork size in millimetres for an image of the given pixel size.
///
/// The image is scaled to cover the required area at zoom 1.0, keeping its
/// aspect ratio. An image with a zero dimension falls back to the required
/// area itself.
pub fn natural_size_mm(image_px: (u32, u32), metrics: &StackMetrics) -> (f32, f32) {
    let (width_px, height_px) = image_px;
    let (required_w, required_h) = (metrics.required_width_mm, metrics.required_height_mm);
    if width_px == 0 || height_px == 0 {
        return (required_w, required_h);
    }

    let scale = (required_w / width_px as f32).max(required_h / height_px as f32);
    if !scale.is_finite() || scale <= 0.0 {
        return (required_w, required_h);
    }
    (width_px as f32 * scale, height_px as f32 * scale)
}

/// Compute the safe area and minimum zoom for an artwork of `artwork_size_mm`.
///
/// A zero artwork dimension falls back to the required area. When the
/// division degenerates (zero-sized art, empty stack) the minimum zoom is 1.0.
pub fn compute_bounds(metrics: &StackMetrics, artwork_size_mm: (f32, f32)) -> ArtworkBounds {
    let (mut artwork_width_mm, mut artwork_height_mm) = artwork_size_mm;
    if artwork_width_mm <= 0.0 || artwork_height_mm <= 0.0 {
        artwork_width_mm = metrics.required_width_mm;
        artwork_height_mm = metrics.required_height_mm;
    }

    let safe_width_mm = metrics.total_width_mm + 2.0 * ARTWORK_SIDE_MARGIN_MM;
    let safe_height_mm = metrics.max_height_mm + 2.0 * ARTWORK_VERTICAL_MARGIN_MM;

    let min_zoom = (safe_width_mm / artwork_width_mm).max(safe_height_mm / artwork_height_mm);
    let min_zoom = if min_zoom.is_finite() && min_zoom > 0.0 {
        min_zoom
    } else {
        1.0
    };

    ArtworkBounds {
        safe_width_mm,
        safe_height_mm,
        artwork_width_mm,
        artwork_height_mm,
        min_zoom,
    }
}

impl ArtworkBounds {
    /// Largest zoom the designer offers
    pub fn max_zoom(&self) -> f32 {
        self.min_zoom * MAX_ZOOM_FACTOR
    }

    /// Clamp a zoom into `[min_zoom, max_zoom]`
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        clamp(zoom, self.min_zoom, self.max_zoom())
    }

    /// Offset range for `zoom`.
    ///
    /// Slack on each axis is half of what the scaled artwork overhangs the
    /// safe area. At `min_zoom` the binding axis has no slack; the other
    /// axis keeps whatever the artwork's aspect ratio leaves over.
    pub fn offset_limits(&self, zoom: f32) -> OffsetLimits {
        OffsetLimits {
            max_x_mm: ((self.artwork_width_mm * zoom - self.safe_width_mm) / 2.0).max(0.0),
            max_y_mm: ((self.artwork_height_mm * zoom - self.safe_height_mm) / 2.0).max(0.0),
        }
    }

    /// Clamp an offset into the range legal at `zoom`
    pub fn clamp_offset(&self, offset: PointMm, zoom: f32) -> PointMm {
        let limits = self.offset_limits(zoom);
        PointMm::new(
            clamp(offset.x, -limits.max_x_mm, limits.max_x_mm),
            clamp(offset.y, -limits.max_y_mm, limits.max_y_mm),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(total_width_mm: f32, max_height_mm: f32) -> StackMetrics {
        StackMetrics {
            total_width_mm,
            max_height_mm,
            min_height_mm: max_height_mm,
            required_width_mm: total_width_mm + 40.0,
            required_height_mm: max_height_mm + 4.0,
            fits_sheet: true,
        }
    }

    #[test]
    fn test_artwork_equal_to_safe_area() {
        let m = metrics(100.0, 200.0);
        let bounds = compute_bounds(&m, (110.0, 204.0));
        assert_eq!(bounds.min_zoom, 1.0);
        assert!(bounds.offset_limits(1.0).is_pinned());
    }

    #[test]
    fn test_zero_artwork_uses_required_area() {
        let m = metrics(100.0, 200.0);
        let bounds = compute_bounds(&m, (0.0, 0.0));
        assert_eq!(bounds.artwork_width_mm, 140.0);
        assert_eq!(bounds.artwork_height_mm, 204.0);
        assert_eq!(bounds.min_zoom, 1.0);
    }

    #[test]
    fn test_degenerate_metrics_default_zoom() {
        let bounds = compute_bounds(&StackMetrics::default(), (0.0, 0.0));
        assert_eq!(bounds.min_zoom, 1.0);
    }

    #[test]
    fn test_min_zoom_picks_binding_axis() {
        let m = metrics(100.0, 200.0);
        // Wide art: height binds
        let bounds = compute_bounds(&m, (500.0, 102.0));
        assert!((bounds.min_zoom - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_offset_range_grows_with_zoom() {
        let m = metrics(100.0, 200.0);
        let bounds = compute_bounds(&m, (300.0, 300.0));
        let at_min = bounds.offset_limits(bounds.min_zoom);
        // Height binds (204 / 300), so only y is pinned
        assert!(at_min.max_y_mm < 1e-4);
        assert!(at_min.max_x_mm > 0.0);

        let mut previous = at_min;
        for step in 1..5 {
            let zoom = bounds.min_zoom * (1.0 + step as f32 * 0.25);
            let limits = bounds.offset_limits(zoom);
            assert!(limits.max_x_mm > previous.max_x_mm);
            assert!(limits.max_y_mm > previous.max_y_mm);
            previous = limits;
        }
    }

    #[test]
    fn test_slack_on_free_axis() {
        let m = metrics(100.0, 200.0);
        let bounds = compute_bounds(&m, (300.0, 300.0));
        assert!((bounds.min_zoom - 0.68).abs() < 1e-5);

        // (300 - 110) / 2 and (300 - 204) / 2
        let limits = bounds.offset_limits(1.0);
        assert!((limits.max_x_mm - 95.0).abs() < 1e-4);
        assert!((limits.max_y_mm - 48.0).abs() < 1e-4);

        // At the minimum: x still has (204 - 110) / 2
        let limits = bounds.offset_limits(bounds.min_zoom);
        assert!((limits.max_x_mm - 47.0).abs() < 1e-3);
        assert!(limits.max_y_mm < 1e-4);
    }

    #[test]
    fn test_clamp_offset_respects_limits() {
        let m = metrics(100.0, 200.0);
        let bounds = compute_bounds(&m, (110.0, 204.0));
        let clamped = bounds.clamp_offset(PointMm::new(50.0, -50.0), 2.0);
        // art at 2x: 220 x 408, slack (220-110)/2 = 55, (408-204)/2 = 102
        assert_eq!(clamped, PointMm::new(50.0, -50.0));
        let clamped = bounds.clamp_offset(PointMm::new(80.0, -150.0), 2.0);
        assert_eq!(clamped, PointMm::new(55.0, -102.0));
    }

    #[test]
    fn test_natural_size_covers_required_area() {
        let m = metrics(100.0, 200.0);
        let (w, h) = natural_size_mm((1000, 1000), &m);
        assert!(w >= m.required_width_mm - 1e-3);
        assert!(h >= m.required_height_mm - 1e-3);
        assert!((w - h).abs() < 1e-3);

        assert_eq!(natural_size_mm((0, 10), &m), (140.0, 204.0));
    }
}
