//! Stack layout
//!
//! Places the spines left to right with a fixed gap, bottom-aligned on a
//! shared baseline, and measures the area the whole stack needs.

use crate::constants::{BOOK_GAP_MM, BOTTOM_CLEARANCE_MM, SIDE_CLEARANCE_MM, TOP_CLEARANCE_MM};
use crate::geometry::RectMm;
use crate::types::{BookSpec, SheetSize};

use super::{PlacedRect, StackLayout, StackMetrics};

/// Lay out a stack of books on the default target sheet.
///
/// An empty slice yields all-zero metrics and no rectangles; callers are
/// expected to validate the list before rendering.
pub fn layout_stack(books: &[BookSpec]) -> StackLayout {
    layout_stack_on(books, SheetSize::TABLOID_LANDSCAPE)
}

/// Lay out a stack of books, checking fit against `sheet`.
pub fn layout_stack_on(books: &[BookSpec], sheet: SheetSize) -> StackLayout {
    if books.is_empty() {
        return StackLayout::default();
    }

    let gaps = (books.len() - 1) as f32 * BOOK_GAP_MM;
    let total_width_mm = books.iter().map(|b| b.spine_width_mm).sum::<f32>() + gaps;

    let max_height_mm = books
        .iter()
        .map(|b| b.height_mm)
        .fold(f32::NEG_INFINITY, f32::max);
    let min_height_mm = books
        .iter()
        .map(|b| b.height_mm)
        .fold(f32::INFINITY, f32::min);

    let mut rects = Vec::with_capacity(books.len());
    let mut cursor = SIDE_CLEARANCE_MM;
    for (index, book) in books.iter().enumerate() {
        if index > 0 {
            cursor += BOOK_GAP_MM;
        }
        // Shorter books hang from the shared bottom edge
        let top = TOP_CLEARANCE_MM + (max_height_mm - book.height_mm);
        rects.push(PlacedRect {
            id: book.id,
            label: book.label.clone(),
            color: book.color,
            rect: RectMm::new(cursor, top, book.spine_width_mm, book.height_mm),
        });
        cursor += book.spine_width_mm;
    }

    let required_width_mm = total_width_mm + 2.0 * SIDE_CLEARANCE_MM;
    let required_height_mm = max_height_mm + TOP_CLEARANCE_MM + BOTTOM_CLEARANCE_MM;

    let metrics = StackMetrics {
        total_width_mm,
        max_height_mm,
        min_height_mm,
        required_width_mm,
        required_height_mm,
        fits_sheet: required_width_mm <= sheet.width_mm && required_height_mm <= sheet.height_mm,
    };

    log::debug!(
        "Laid out {} books: {:.1} x {:.1} mm required",
        books.len(),
        required_width_mm,
        required_height_mm
    );

    StackLayout { metrics, rects }
}

/// The band every spine covers: full stack width, shortest book height,
/// resting on the shared baseline. Large text is confined to it.
pub fn shared_band(metrics: &StackMetrics) -> RectMm {
    let baseline = TOP_CLEARANCE_MM + metrics.max_height_mm;
    RectMm::new(
        SIDE_CLEARANCE_MM,
        baseline - metrics.min_height_mm,
        metrics.total_width_mm,
        metrics.min_height_mm,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: u32, height_mm: f32, width_mm: f32) -> BookSpec {
        BookSpec::new(id, format!("Book {}", id), height_mm, width_mm)
    }

    #[test]
    fn test_single_book_has_no_gap() {
        let layout = layout_stack(&[book(1, 260.0, 10.0)]);
        assert_eq!(layout.metrics.total_width_mm, 10.0);
        assert_eq!(layout.rects.len(), 1);
        assert_eq!(layout.rects[0].rect.x, SIDE_CLEARANCE_MM);
        assert_eq!(layout.rects[0].rect.y, TOP_CLEARANCE_MM);
    }

    #[test]
    fn test_bottom_alignment() {
        let layout = layout_stack(&[book(1, 200.0, 30.0), book(2, 150.0, 20.0)]);
        let tall = &layout.rects[0].rect;
        let short = &layout.rects[1].rect;
        assert_eq!(tall.bottom(), short.bottom());
        assert_eq!(short.y, TOP_CLEARANCE_MM + 50.0);
    }

    #[test]
    fn test_empty_stack_is_zeroed() {
        let layout = layout_stack(&[]);
        assert_eq!(layout.metrics, StackMetrics::default());
        assert!(layout.rects.is_empty());
    }

    #[test]
    fn test_shared_band_spans_shortest_book() {
        let layout = layout_stack(&[book(1, 200.0, 30.0), book(2, 150.0, 20.0)]);
        let band = shared_band(&layout.metrics);
        assert_eq!(band.height, 150.0);
        assert_eq!(band.width, 52.0);
        assert_eq!(band.bottom(), layout.rects[0].rect.bottom());
    }

    #[test]
    fn test_fit_against_small_sheet() {
        let small = SheetSize {
            width_mm: 100.0,
            height_mm: 100.0,
        };
        let layout = layout_stack_on(&[book(1, 200.0, 30.0)], small);
        assert!(!layout.metrics.fits_sheet);
    }
}
