//! Font lookup and glyph outlines
//!
//! Faces come from a `fontdb` database (system fonts and/or caller-supplied
//! font files). When nothing installed matches, the public-domain Tuffy face
//! compiled into the crate is used, so proof marks never depend on the host.
//! Outlines and advances are read with `ttf-parser`; there is no shaping,
//! one glyph per character.

use crate::types::FontChoice;
use fontdb::{Database, Family, Query};
use std::path::Path;
use std::sync::Arc;
use tiny_skia::{Path as SkiaPath, PathBuilder};
use ttf_parser::{Face, OutlineBuilder};

use super::TextMeasure;

const BUNDLED_FACE: &[u8] = include_bytes!("../../assets/fonts/Tuffy.ttf");

/// A searchable collection of font faces
pub struct FontBook {
    db: Database,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.db.len())
            .finish()
    }
}

impl FontBook {
    /// A book with no installed faces; everything resolves to the bundled face
    pub fn empty() -> Self {
        Self { db: Database::new() }
    }

    /// All fonts installed on this machine
    pub fn system() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        log::debug!("Loaded {} system font faces", db.len());
        Self { db }
    }

    pub fn add_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
    }

    pub fn add_font_file(&mut self, path: impl AsRef<Path>) -> std::io::Result<()> {
        self.db.load_font_file(path)
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Find a face for `choice`.
    ///
    /// Falls back to any installed face, then to the bundled one.
    pub fn resolve(&self, choice: &FontChoice) -> Option<LoadedFont> {
        self.resolve_installed(choice).or_else(|| {
            log::debug!("No installed face for {:?}, using the bundled face", choice);
            LoadedFont::bundled()
        })
    }

    fn resolve_installed(&self, choice: &FontChoice) -> Option<LoadedFont> {
        let family = match choice {
            FontChoice::SansSerif => Family::SansSerif,
            FontChoice::Serif => Family::Serif,
            FontChoice::Monospace => Family::Monospace,
            FontChoice::Family(name) => Family::Name(name.as_str()),
        };
        let families = [family, Family::SansSerif];
        let query = Query {
            families: &families,
            ..Query::default()
        };

        let id = self.db.query(&query).or_else(|| {
            let fallback = self.db.faces().next().map(|face| face.id);
            if fallback.is_some() {
                log::warn!("No face matches {:?}, using the first available face", choice);
            }
            fallback
        })?;

        let (data, index) = self
            .db
            .with_face_data(id, |data, index| (data.to_vec(), index))?;
        LoadedFont::new(data, index)
    }
}

/// Raw face data, validated once and parsed on use
#[derive(Clone)]
pub struct LoadedFont {
    data: Arc<Vec<u8>>,
    index: u32,
}

impl std::fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedFont")
            .field("bytes", &self.data.len())
            .field("index", &self.index)
            .finish()
    }
}

impl LoadedFont {
    /// Returns `None` when the data does not parse as a font
    pub fn new(data: Vec<u8>, index: u32) -> Option<Self> {
        Face::parse(&data, index).ok()?;
        Some(Self {
            data: Arc::new(data),
            index,
        })
    }

    /// The face compiled into the crate
    pub fn bundled() -> Option<Self> {
        Self::new(BUNDLED_FACE.to_vec(), 0)
    }

    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.data, self.index).ok()
    }

    /// Advance of `text` in font units
    fn advance_units(face: &Face<'_>, text: &str) -> f32 {
        text.chars()
            .map(|ch| {
                face.glyph_index(ch)
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
                    .unwrap_or(face.units_per_em() / 2) as f32
            })
            .sum()
    }

    /// Outline of `text` in font units, y pointing up, baseline at 0.
    ///
    /// Returns the path (if any glyph has an outline) and the total advance.
    pub fn outline(&self, text: &str) -> Option<(SkiaPath, f32, f32)> {
        let face = self.face()?;
        let mut builder = GlyphPathBuilder::new();
        for ch in text.chars() {
            let advance = match face.glyph_index(ch) {
                Some(glyph) => {
                    builder.origin_x = builder.cursor;
                    face.outline_glyph(glyph, &mut builder);
                    face.glyph_hor_advance(glyph)
                        .unwrap_or(face.units_per_em() / 2)
                }
                None => face.units_per_em() / 2,
            };
            builder.cursor += advance as f32;
        }
        let total = builder.cursor;
        let path = builder.builder.finish()?;
        Some((path, total, face.units_per_em() as f32))
    }

    /// Units per em of the face
    pub fn units_per_em(&self) -> f32 {
        self.face()
            .map(|face| face.units_per_em() as f32)
            .unwrap_or(1000.0)
    }
}

impl TextMeasure for LoadedFont {
    fn advance_mm(&self, text: &str, size_mm: f32) -> f32 {
        match self.face() {
            Some(face) => {
                Self::advance_units(&face, text) * size_mm / face.units_per_em() as f32
            }
            None => text.chars().count() as f32 * size_mm * 0.5,
        }
    }

    fn ascent_mm(&self, size_mm: f32) -> f32 {
        match self.face() {
            Some(face) => face.ascender() as f32 * size_mm / face.units_per_em() as f32,
            None => size_mm * 0.8,
        }
    }
}

/// Collects glyph outlines into one path, offset by the pen position
struct GlyphPathBuilder {
    builder: PathBuilder,
    origin_x: f32,
    cursor: f32,
}

impl GlyphPathBuilder {
    fn new() -> Self {
        Self {
            builder: PathBuilder::new(),
            origin_x: 0.0,
            cursor: 0.0,
        }
    }
}

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(self.origin_x + x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(self.origin_x + x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder
            .quad_to(self.origin_x + x1, y1, self.origin_x + x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            self.origin_x + x1,
            y1,
            self.origin_x + x2,
            y2,
            self.origin_x + x,
            y,
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
