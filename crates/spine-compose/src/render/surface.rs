//! Raster surface abstraction
//!
//! The page renderer only produces [`DrawCommand`]s. Anything that can
//! execute them against a pixel buffer can act as a backend.

use super::DrawCommand;
use crate::types::{Result, SheetSize};
use image::RgbImage;

/// One rendered sheet
#[derive(Debug, Clone, PartialEq)]
pub struct RasterPage {
    pub image: RgbImage,
}

impl RasterPage {
    pub fn width_px(&self) -> u32 {
        self.image.width()
    }

    pub fn height_px(&self) -> u32 {
        self.image.height()
    }
}

/// A drawing target for a single page
pub trait RasterSurface {
    /// Execute one command. Commands arrive in paint order.
    fn execute(&mut self, command: &DrawCommand) -> Result<()>;

    /// Flatten the surface into an opaque RGB page
    fn finish(self) -> Result<RasterPage>
    where
        Self: Sized;
}

/// Hands out a fresh surface per page.
///
/// Failing to acquire one is fatal for the whole render request.
pub trait SurfaceFactory {
    type Surface: RasterSurface;

    fn acquire(&self, sheet: SheetSize) -> Result<Self::Surface>;
}
