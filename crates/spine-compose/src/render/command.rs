//! Drawing commands
//!
//! A page is an ordered list of these, in sheet millimetres with the origin
//! at the top-left. Backends translate them to pixels.

use crate::geometry::{PointMm, RectMm};
use crate::types::Rgb;

/// Which loaded face a text run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontRole {
    /// The customer's chosen face for the large text
    Display,
    /// Neutral sans-serif for the watermark and spine labels
    Ui,
}

/// Horizontal placement of a run relative to its position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// Position is the start of the baseline
    Left,
    /// Position is the middle of the baseline
    Center,
}

/// A single line of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub role: FontRole,
    /// Em size in millimetres
    pub size_mm: f32,
    /// Anchor point on the baseline
    pub position: PointMm,
    pub align: TextAlign,
    /// Clockwise rotation around `position`, in degrees
    pub rotation_deg: f32,
    pub color: Rgb,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill a rectangle with a flat color
    Fill {
        rect: RectMm,
        color: Rgb,
        opacity: f32,
    },
    /// Stroke a rectangle outline, centered on its edges
    StrokeRect {
        rect: RectMm,
        color: Rgb,
        width_mm: f32,
    },
    /// Draw the artwork image stretched over `dest`
    Artwork { dest: RectMm },
    Text(TextRun),
    /// Intersect the clip with a rectangle until the matching `PopClip`
    PushClip(RectMm),
    PopClip,
}
