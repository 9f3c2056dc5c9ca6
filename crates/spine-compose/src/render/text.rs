//! Line wrapping for the large text overlay
//!
//! Greedy word wrap, explicit line breaks, no shaping.

use crate::constants::LARGE_TEXT_LINE_HEIGHT;
use crate::geometry::{PointMm, RectMm};

/// Horizontal metrics of a face
pub trait TextMeasure {
    /// Advance width of `text` at `size_mm`
    fn advance_mm(&self, text: &str, size_mm: f32) -> f32;

    /// Distance from the top of a line box to the baseline
    fn ascent_mm(&self, size_mm: f32) -> f32 {
        size_mm * 0.8
    }
}

/// Break `text` into lines no wider than `max_width_mm`.
///
/// Explicit newlines always break, and an empty paragraph stays an empty
/// line. A single word wider than the limit gets a line of its own rather
/// than being split.
pub fn wrap_text(
    text: &str,
    max_width_mm: f32,
    size_mm: f32,
    measure: &dyn TextMeasure,
) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if measure.advance_mm(&candidate, size_mm) <= max_width_mm {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        lines.push(current);
    }

    lines
}

/// A wrapped line positioned inside its box
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    /// Middle of the baseline
    pub baseline_center: PointMm,
}

/// Lay out lines as a block centered both ways inside `bounds`.
pub fn center_block(
    lines: Vec<String>,
    bounds: &RectMm,
    size_mm: f32,
    measure: &dyn TextMeasure,
) -> Vec<PlacedLine> {
    let line_height = size_mm * LARGE_TEXT_LINE_HEIGHT;
    let block_height = line_height * lines.len() as f32;
    let top = bounds.center().y - block_height / 2.0;
    // Half-leading above the glyphs, then the ascent
    let first_baseline = top + (line_height - size_mm) / 2.0 + measure.ascent_mm(size_mm);
    let center_x = bounds.center().x;

    lines
        .into_iter()
        .enumerate()
        .map(|(index, text)| PlacedLine {
            text,
            baseline_center: PointMm::new(center_x, first_baseline + index as f32 * line_height),
        })
        .collect()
}
