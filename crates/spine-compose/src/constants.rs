//! Shared constants for spine layout and composition
//!
//! Fixed system configuration: none of these are user-settable. Keeping them
//! here makes the geometry tunable in one place.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Millimetres per centimetre
pub const MM_PER_CM: f32 = 10.0;

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4;

// =============================================================================
// Target Sheet
// =============================================================================

/// Sheet width (tabloid, landscape)
pub const SHEET_WIDTH_MM: f32 = 431.8;

/// Sheet height (tabloid, landscape)
pub const SHEET_HEIGHT_MM: f32 = 279.4;

/// Tallest book the form layer accepts
pub const MAX_BOOK_HEIGHT_MM: f32 = 260.0;

// =============================================================================
// Stack Layout
// =============================================================================

/// Space between adjacent spines
pub const BOOK_GAP_MM: f32 = 2.0;

/// Clearance left and right of the stack inside the required area
pub const SIDE_CLEARANCE_MM: f32 = 20.0;

/// Clearance above the tallest book
pub const TOP_CLEARANCE_MM: f32 = 2.0;

/// Clearance below the shared baseline
pub const BOTTOM_CLEARANCE_MM: f32 = 2.0;

// =============================================================================
// Artwork
// =============================================================================

/// Horizontal margin the artwork must cover beyond the outer spines
pub const ARTWORK_SIDE_MARGIN_MM: f32 = 5.0;

/// Vertical margin the artwork must cover above and below the stack
pub const ARTWORK_VERTICAL_MARGIN_MM: f32 = 2.0;

/// How far above a spine's top edge the artwork column is painted
pub const ARTWORK_CLIP_OVERHANG_MM: f32 = 2.0;

/// Upper bound for user zoom, relative to the minimum zoom
pub const MAX_ZOOM_FACTOR: f32 = 8.0;

// =============================================================================
// Large Text
// =============================================================================

/// Share of the text box width a wrapped line may occupy
pub const LARGE_TEXT_WIDTH_RATIO: f32 = 0.92;

/// Share of the shortest book height the text em size may use
pub const LARGE_TEXT_HEIGHT_RATIO: f32 = 0.8;

/// Line advance as a multiple of the font size
pub const LARGE_TEXT_LINE_HEIGHT: f32 = 1.2;

/// Smallest size the text size control allows (points)
pub const LARGE_TEXT_MIN_PT: f32 = 6.0;

/// Size used when text is first enabled (points)
pub const LARGE_TEXT_DEFAULT_PT: f32 = 48.0;

// =============================================================================
// Watermark
// =============================================================================

pub const WATERMARK_TEXT: &str = "SAMPLE";

/// Watermark em size as a share of the sheet height
pub const WATERMARK_SIZE_RATIO: f32 = 0.22;

pub const WATERMARK_OPACITY: f32 = 0.12;

/// Counter-clockwise rotation of the watermark baseline
pub const WATERMARK_ANGLE_DEG: f32 = 30.0;

// =============================================================================
// Spine Outline
// =============================================================================

/// Outline stroke width
pub const OUTLINE_WIDTH_MM: f32 = 0.5;

/// Label chip height
pub const LABEL_CHIP_HEIGHT_MM: f32 = 5.0;

/// Distance between the chip and the spine's bottom edge
pub const LABEL_CHIP_INSET_MM: f32 = 1.5;

/// Label text size inside the chip (points)
pub const LABEL_FONT_PT: f32 = 7.0;

// =============================================================================
// Output
// =============================================================================

/// 150 DPI expressed in pixels per millimetre
pub const DEFAULT_PIXELS_PER_MM: f32 = 150.0 / 25.4;

pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// How long an artwork decode may take before it counts as unavailable
pub const ARTWORK_LOAD_TIMEOUT_SECS: u64 = 20;
