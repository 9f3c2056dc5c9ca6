use crate::layout::{StackLayout, layout_stack_on};
use crate::types::*;

/// Summary numbers for an already computed layout
pub fn layout_statistics(layout: &StackLayout) -> CompositionStatistics {
    let metrics = &layout.metrics;
    CompositionStatistics {
        book_count: layout.rects.len(),
        output_pages: layout.rects.len(),
        total_width_mm: metrics.total_width_mm,
        required_width_mm: metrics.required_width_mm,
        required_height_mm: metrics.required_height_mm,
        fits_sheet: metrics.fits_sheet,
    }
}

/// Calculate statistics for a book list without composing anything
pub fn calculate_statistics(books: &[BookSpec], sheet: SheetSize) -> Result<CompositionStatistics> {
    validate_books(books)?;
    Ok(layout_statistics(&layout_stack_on(books, sheet)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_page_per_book() {
        let books = vec![
            BookSpec::new(1, "A", 200.0, 30.0),
            BookSpec::new(2, "B", 180.0, 20.0),
            BookSpec::new(3, "C", 150.0, 10.0),
        ];
        let stats = calculate_statistics(&books, SheetSize::default()).unwrap();
        assert_eq!(stats.book_count, 3);
        assert_eq!(stats.output_pages, 3);
        assert_eq!(stats.total_width_mm, 64.0);
        assert_eq!(stats.required_width_mm, 104.0);
        assert!(stats.fits_sheet);
    }

    #[test]
    fn test_empty_list_is_an_error() {
        assert!(matches!(
            calculate_statistics(&[], SheetSize::default()),
            Err(ComposeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_wide_stack_does_not_fit() {
        let books: Vec<BookSpec> = (0..10)
            .map(|id| BookSpec::new(id, "", 200.0, 40.0))
            .collect();
        let stats = calculate_statistics(&books, SheetSize::default()).unwrap();
        assert!(!stats.fits_sheet);
    }
}
