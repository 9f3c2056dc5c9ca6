use crate::constants::{DEFAULT_JPEG_QUALITY, DEFAULT_PIXELS_PER_MM};
use crate::geometry::PointMm;
use crate::session::DesignSession;
use crate::state::{Adjust, ZoomOutcome};
use crate::types::*;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Output settings for one composition
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ComposeOptions {
    /// Raster resolution of every page
    pub pixels_per_mm: f32,

    /// JPEG quality for page images, 1-100
    pub jpeg_quality: u8,

    /// Draw the diagonal proof watermark
    pub watermark: bool,

    /// Written to the document info dictionary when set
    pub title: Option<String>,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            pixels_per_mm: DEFAULT_PIXELS_PER_MM,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            watermark: true,
            title: None,
        }
    }
}

impl ComposeOptions {
    /// Resolution given in dots per inch
    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.pixels_per_mm = dpi / 25.4;
        self
    }

    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| ComposeError::Config(format!("Failed to parse options: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ComposeError::Config(format!("Failed to serialize options: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if !self.pixels_per_mm.is_finite() || self.pixels_per_mm <= 0.0 {
            return Err(ComposeError::Config(format!(
                "Resolution must be positive, got {} px/mm",
                self.pixels_per_mm
            )));
        }

        // 40 px/mm is roughly 1000 DPI; a tabloid sheet at that size is ~750 MB
        if self.pixels_per_mm > 40.0 {
            return Err(ComposeError::Config(format!(
                "Resolution {:.1} px/mm is too high for a full sheet",
                self.pixels_per_mm
            )));
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ComposeError::Config(
                "JPEG quality must be between 1 and 100".to_string(),
            ));
        }

        Ok(())
    }
}

/// Large text settings as stored in a design file
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TextSettings {
    pub enabled: bool,
    pub text: String,
    pub font: FontChoice,
    /// `None` keeps the default size
    pub size_pt: Option<f32>,
}

/// A saved design: the stack, the view and the output settings
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DesignFile {
    pub books: Vec<BookSpec>,

    /// Artwork image, relative paths resolve against the working directory
    #[cfg_attr(feature = "serde", serde(default))]
    pub artwork: Option<PathBuf>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub zoom: Adjust<f32>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub offset: Adjust<PointMm>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub text: TextSettings,

    #[cfg_attr(feature = "serde", serde(default))]
    pub options: ComposeOptions,
}

impl DesignFile {
    /// Load a design from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let design = serde_json::from_slice(&bytes)
            .map_err(|e| ComposeError::Config(format!("Failed to parse design: {}", e)))?;
        Ok(design)
    }

    /// Save a design to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ComposeError::Config(format!("Failed to serialize design: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        validate_books(&self.books)?;
        self.options.validate()
    }

    /// Capture a session. The artwork path is not part of the session and
    /// has to be supplied.
    pub fn from_session(
        session: &DesignSession,
        artwork: Option<PathBuf>,
        options: ComposeOptions,
    ) -> Self {
        Self {
            books: session.books().to_vec(),
            artwork,
            zoom: session.artwork.zoom,
            offset: session.artwork.offset,
            text: TextSettings {
                enabled: session.text.enabled,
                text: session.text.text.clone(),
                font: session.text.font.clone(),
                size_pt: Some(session.text.size_pt),
            },
            options,
        }
    }

    /// Rebuild a session from this design.
    ///
    /// `image_px` is the pixel size of the decoded artwork, if it loaded.
    /// Stored zoom and offset go through the normal clamping, so a design
    /// saved against a different stack still yields a legal view.
    pub fn to_session(&self, image_px: Option<(u32, u32)>) -> Result<DesignSession> {
        let mut session = DesignSession::new(self.books.clone())?;
        if let Some((width, height)) = image_px {
            session.load_artwork(width, height);
        }

        if let Adjust::Manual(zoom) = self.zoom {
            if let ZoomOutcome::Declined { kept, .. } = session.set_zoom(zoom) {
                log::warn!("Saved zoom {zoom:.3} no longer covers the stack, using {kept:.3}");
            }
        }
        if let Adjust::Manual(offset) = self.offset {
            session.set_offset(offset);
        }

        session.set_text(self.text.text.clone());
        session.set_text_font(self.text.font.clone());
        session.set_text_enabled(self.text.enabled);
        if let Some(size) = self.text.size_pt {
            session.set_text_size(size);
        }

        Ok(session)
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::{Deserialize, Serialize};

    // Colors are stored the way customers see them: "#rrggbb"
    impl Serialize for Rgb {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_str(&self.to_hex())
        }
    }

    impl<'de> Deserialize<'de> for Rgb {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            Rgb::from_hex(&s)
                .ok_or_else(|| serde::de::Error::custom(format!("Invalid color: {}", s)))
        }
    }

    impl Serialize for FontChoice {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            let s = match self {
                FontChoice::SansSerif => "sans-serif",
                FontChoice::Serif => "serif",
                FontChoice::Monospace => "monospace",
                FontChoice::Family(name) => name.as_str(),
            };
            serializer.serialize_str(s)
        }
    }

    impl<'de> Deserialize<'de> for FontChoice {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            Ok(match s.as_str() {
                "sans-serif" => FontChoice::SansSerif,
                "serif" => FontChoice::Serif,
                "monospace" => FontChoice::Monospace,
                "" => return Err(serde::de::Error::custom("Empty font family")),
                _ => FontChoice::Family(s),
            })
        }
    }
}
