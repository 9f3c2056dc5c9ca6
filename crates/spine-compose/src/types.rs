use crate::constants::{MAX_BOOK_HEIGHT_MM, SHEET_HEIGHT_MM, SHEET_WIDTH_MM};
use crate::geometry::cm_to_mm;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Artwork unavailable: {0}")]
    ArtworkUnavailable(String),
    #[error("Could not acquire a {width_px}x{height_px} drawing surface")]
    SurfaceAcquisition { width_px: u32, height_px: u32 },
    #[error("Encoding error: {0}")]
    Encode(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Render superseded by a newer request")]
    Superseded,
}

pub type Result<T> = std::result::Result<T, ComposeError>;

/// An sRGB swatch color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Relative luminance in 0..=1 (Rec. 709 weights, no gamma)
    pub fn luminance(self) -> f32 {
        (0.2126 * self.r as f32 + 0.7152 * self.g as f32 + 0.0722 * self.b as f32) / 255.0
    }

    /// Black or white, whichever reads better on top of this color
    pub fn contrasting(self) -> Rgb {
        if self.luminance() > 0.55 {
            Rgb::BLACK
        } else {
            Rgb::WHITE
        }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::new(0x33, 0x33, 0x33)
    }
}

/// One physical book in the stack, as supplied by the caller
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BookSpec {
    pub id: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub label: String,
    /// Book height in millimetres
    pub height_mm: f32,
    /// Spine thickness in millimetres
    pub spine_width_mm: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub color: Rgb,
}

impl BookSpec {
    pub fn new(id: u32, label: impl Into<String>, height_mm: f32, spine_width_mm: f32) -> Self {
        Self {
            id,
            label: label.into(),
            height_mm,
            spine_width_mm,
            color: Rgb::default(),
        }
    }

    /// Build a book from centimetre measurements, the unit customers enter
    pub fn from_cm(id: u32, label: impl Into<String>, height_cm: f32, spine_width_cm: f32) -> Self {
        Self::new(id, label, cm_to_mm(height_cm), cm_to_mm(spine_width_cm))
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }
}

/// Check the caller's contract for a book list before any layout work.
pub fn validate_books(books: &[BookSpec]) -> Result<()> {
    if books.is_empty() {
        return Err(ComposeError::InvalidInput("no books in the stack".to_string()));
    }

    let mut seen = HashSet::new();
    for book in books {
        if !seen.insert(book.id) {
            return Err(ComposeError::InvalidInput(format!(
                "duplicate book id {}",
                book.id
            )));
        }
        if !(book.height_mm.is_finite() && book.height_mm > 0.0) {
            return Err(ComposeError::InvalidInput(format!(
                "book {} has a non-positive height ({} mm)",
                book.id, book.height_mm
            )));
        }
        if book.height_mm > MAX_BOOK_HEIGHT_MM {
            return Err(ComposeError::InvalidInput(format!(
                "book {} is {} mm tall, the limit is {} mm",
                book.id, book.height_mm, MAX_BOOK_HEIGHT_MM
            )));
        }
        if !(book.spine_width_mm.is_finite() && book.spine_width_mm > 0.0) {
            return Err(ComposeError::InvalidInput(format!(
                "book {} has a non-positive spine width ({} mm)",
                book.id, book.spine_width_mm
            )));
        }
    }

    Ok(())
}

/// The fixed physical target sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetSize {
    pub width_mm: f32,
    pub height_mm: f32,
}

impl SheetSize {
    /// Tabloid paper in landscape: 17" × 11"
    pub const TABLOID_LANDSCAPE: SheetSize = SheetSize {
        width_mm: SHEET_WIDTH_MM,
        height_mm: SHEET_HEIGHT_MM,
    };

    /// Sheet size in device pixels, rounded to whole pixels
    pub fn pixels(self, pixels_per_mm: f32) -> (u32, u32) {
        (
            (self.width_mm * pixels_per_mm).round().max(1.0) as u32,
            (self.height_mm * pixels_per_mm).round().max(1.0) as u32,
        )
    }
}

impl Default for SheetSize {
    fn default() -> Self {
        Self::TABLOID_LANDSCAPE
    }
}

/// Typeface family requested for the large text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FontChoice {
    #[default]
    SansSerif,
    Serif,
    Monospace,
    /// A specific installed family, e.g. "Georgia"
    Family(String),
}

/// Summary numbers for a stack, shown before composing
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionStatistics {
    pub book_count: usize,
    /// One output page per book
    pub output_pages: usize,
    pub total_width_mm: f32,
    pub required_width_mm: f32,
    pub required_height_mm: f32,
    pub fits_sheet: bool,
}
