//! tiny-skia raster backend

use crate::artwork::Artwork;
use crate::geometry::RectMm;
use crate::types::{ComposeError, Result, Rgb, SheetSize};
use image::RgbImage;
use std::sync::Arc;
use tiny_skia::{
    FillRule, FilterQuality, Mask, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke,
    Transform,
};

use super::{
    DrawCommand, FontRole, LoadedFont, RasterPage, RasterSurface, SurfaceFactory, TextAlign,
    TextRun,
};

/// Faces used by one render pass
#[derive(Debug, Clone, Default)]
pub struct FontSet {
    pub display: Option<LoadedFont>,
    pub ui: Option<LoadedFont>,
}

impl FontSet {
    fn get(&self, role: FontRole) -> Option<&LoadedFont> {
        match role {
            FontRole::Display => self.display.as_ref(),
            FontRole::Ui => self.ui.as_ref(),
        }
    }
}

/// Creates tiny-skia surfaces at a fixed resolution
#[derive(Debug, Clone)]
pub struct SkiaBackend {
    pixels_per_mm: f32,
    artwork: Option<Arc<Pixmap>>,
    fonts: FontSet,
}

impl SkiaBackend {
    pub fn new(pixels_per_mm: f32, artwork: Option<&Artwork>, fonts: FontSet) -> Result<Self> {
        let artwork = match artwork {
            Some(art) => Some(Arc::new(art.to_pixmap()?)),
            None => None,
        };
        Ok(Self {
            pixels_per_mm,
            artwork,
            fonts,
        })
    }
}

impl SurfaceFactory for SkiaBackend {
    type Surface = SkiaSurface;

    fn acquire(&self, sheet: SheetSize) -> Result<SkiaSurface> {
        let (width_px, height_px) = sheet.pixels(self.pixels_per_mm);
        let mut pixmap = Pixmap::new(width_px, height_px).ok_or(
            ComposeError::SurfaceAcquisition {
                width_px,
                height_px,
            },
        )?;
        pixmap.fill(tiny_skia::Color::WHITE);

        Ok(SkiaSurface {
            pixmap,
            scale: self.pixels_per_mm,
            clips: Vec::new(),
            artwork: self.artwork.clone(),
            fonts: self.fonts.clone(),
        })
    }
}

/// One page being painted
pub struct SkiaSurface {
    pixmap: Pixmap,
    scale: f32,
    /// Clip stack in pixels; the effective clip is their intersection
    clips: Vec<RectMm>,
    artwork: Option<Arc<Pixmap>>,
    fonts: FontSet,
}

/// Result of intersecting the clip stack
enum Clip {
    None,
    Empty,
    Mask(Mask),
}

impl SkiaSurface {
    fn current_clip(&self) -> Clip {
        let Some(first) = self.clips.first() else {
            return Clip::None;
        };
        let mut area = *first;
        for rect in &self.clips[1..] {
            match area.intersect(rect) {
                Some(overlap) => area = overlap,
                None => return Clip::Empty,
            }
        }

        let Some(rect) = Rect::from_xywh(area.x, area.y, area.width, area.height) else {
            return Clip::Empty;
        };
        let Some(mut mask) = Mask::new(self.pixmap.width(), self.pixmap.height()) else {
            return Clip::Empty;
        };
        mask.fill_path(
            &PathBuilder::from_rect(rect),
            FillRule::Winding,
            true,
            Transform::identity(),
        );
        Clip::Mask(mask)
    }

    fn paint(color: Rgb, opacity: f32) -> Paint<'static> {
        let mut paint = Paint::default();
        let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        paint.set_color_rgba8(color.r, color.g, color.b, alpha);
        paint.anti_alias = true;
        paint
    }

    fn fill(&mut self, rect: &RectMm, color: Rgb, opacity: f32, clip: Option<&Mask>) {
        let px = rect.scaled(self.scale);
        if let Some(rect) = Rect::from_xywh(px.x, px.y, px.width, px.height) {
            self.pixmap.fill_rect(
                rect,
                &Self::paint(color, opacity),
                Transform::identity(),
                clip,
            );
        }
    }

    fn stroke(&mut self, rect: &RectMm, color: Rgb, width_mm: f32, clip: Option<&Mask>) {
        let px = rect.scaled(self.scale);
        let Some(rect) = Rect::from_xywh(px.x, px.y, px.width, px.height) else {
            return;
        };
        let path = PathBuilder::from_rect(rect);
        let stroke = Stroke {
            width: (width_mm * self.scale).max(1.0),
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            &path,
            &Self::paint(color, 1.0),
            &stroke,
            Transform::identity(),
            clip,
        );
    }

    fn draw_artwork(&mut self, dest: &RectMm, clip: Option<&Mask>) {
        let Some(art) = self.artwork.as_deref() else {
            return;
        };
        let px = dest.scaled(self.scale);
        if px.width <= 0.0 || px.height <= 0.0 {
            return;
        }
        let transform = Transform::from_row(
            px.width / art.width() as f32,
            0.0,
            0.0,
            px.height / art.height() as f32,
            px.x,
            px.y,
        );
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, art.as_ref(), &paint, transform, clip);
    }

    fn draw_text(&mut self, run: &TextRun, clip: Option<&Mask>) {
        let Some(font) = self.fonts.get(run.role) else {
            log::debug!("No face for {:?} text, skipping {:?}", run.role, run.text);
            return;
        };
        let Some((path, advance, units_per_em)) = font.outline(&run.text) else {
            return;
        };

        let scale = run.size_mm * self.scale / units_per_em;
        let shift = match run.align {
            TextAlign::Left => 0.0,
            TextAlign::Center => -advance / 2.0,
        };
        // Font units are y-up; the sheet is y-down
        let transform = Transform::from_translate(
            run.position.x * self.scale,
            run.position.y * self.scale,
        )
        .pre_concat(Transform::from_rotate(run.rotation_deg))
        .pre_concat(Transform::from_scale(scale, -scale))
        .pre_concat(Transform::from_translate(shift, 0.0));

        self.pixmap.fill_path(
            &path,
            &Self::paint(run.color, run.opacity),
            FillRule::Winding,
            transform,
            clip,
        );
    }
}

impl RasterSurface for SkiaSurface {
    fn execute(&mut self, command: &DrawCommand) -> Result<()> {
        match command {
            DrawCommand::PushClip(rect) => {
                self.clips.push(rect.scaled(self.scale));
                return Ok(());
            }
            DrawCommand::PopClip => {
                self.clips.pop();
                return Ok(());
            }
            _ => {}
        }

        let mask = match self.current_clip() {
            Clip::Empty => return Ok(()),
            Clip::None => None,
            Clip::Mask(mask) => Some(mask),
        };
        let clip = mask.as_ref();

        match command {
            DrawCommand::Fill {
                rect,
                color,
                opacity,
            } => self.fill(rect, *color, *opacity, clip),
            DrawCommand::StrokeRect {
                rect,
                color,
                width_mm,
            } => self.stroke(rect, *color, *width_mm, clip),
            DrawCommand::Artwork { dest } => self.draw_artwork(dest, clip),
            DrawCommand::Text(run) => self.draw_text(run, clip),
            DrawCommand::PushClip(_) | DrawCommand::PopClip => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<RasterPage> {
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
        for pixel in self.pixmap.pixels() {
            let color = pixel.demultiply();
            rgb.extend_from_slice(&[color.red(), color.green(), color.blue()]);
        }
        let image = RgbImage::from_raw(width, height, rgb)
            .ok_or_else(|| ComposeError::Encode("raster buffer size mismatch".to_string()))?;
        Ok(RasterPage { image })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn backend(artwork: Option<&Artwork>) -> SkiaBackend {
        SkiaBackend::new(1.0, artwork, FontSet::default()).unwrap()
    }

    fn small_sheet() -> SheetSize {
        SheetSize {
            width_mm: 40.0,
            height_mm: 20.0,
        }
    }

    #[test]
    fn test_blank_page_is_white() {
        let surface = backend(None).acquire(small_sheet()).unwrap();
        let page = surface.finish().unwrap();
        assert_eq!((page.width_px(), page.height_px()), (40, 20));
        assert_eq!(page.image.get_pixel(5, 5).0, [255, 255, 255]);
    }

    #[test]
    fn test_oversized_sheet_fails_to_acquire() {
        let huge = SheetSize {
            width_mm: 1.0e9,
            height_mm: 1.0e9,
        };
        let result = backend(None).acquire(huge);
        assert!(matches!(
            result,
            Err(ComposeError::SurfaceAcquisition { .. })
        ));
    }

    #[test]
    fn test_clip_limits_fill() {
        let mut surface = backend(None).acquire(small_sheet()).unwrap();
        surface
            .execute(&DrawCommand::PushClip(RectMm::new(0.0, 0.0, 10.0, 20.0)))
            .unwrap();
        surface
            .execute(&DrawCommand::Fill {
                rect: RectMm::new(0.0, 0.0, 40.0, 20.0),
                color: Rgb::BLACK,
                opacity: 1.0,
            })
            .unwrap();
        surface.execute(&DrawCommand::PopClip).unwrap();
        let page = surface.finish().unwrap();
        assert_eq!(page.image.get_pixel(5, 10).0, [0, 0, 0]);
        assert_eq!(page.image.get_pixel(30, 10).0, [255, 255, 255]);
    }

    #[test]
    fn test_disjoint_clips_draw_nothing() {
        let mut surface = backend(None).acquire(small_sheet()).unwrap();
        for rect in [
            RectMm::new(0.0, 0.0, 10.0, 20.0),
            RectMm::new(20.0, 0.0, 10.0, 20.0),
        ] {
            surface.execute(&DrawCommand::PushClip(rect)).unwrap();
        }
        surface
            .execute(&DrawCommand::Fill {
                rect: RectMm::new(0.0, 0.0, 40.0, 20.0),
                color: Rgb::BLACK,
                opacity: 1.0,
            })
            .unwrap();
        let page = surface.finish().unwrap();
        assert!(page.image.pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn test_artwork_is_stretched_into_dest() {
        let art = Artwork::new(RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255])));
        let mut surface = backend(Some(&art)).acquire(small_sheet()).unwrap();
        surface
            .execute(&DrawCommand::Artwork {
                dest: RectMm::new(10.0, 5.0, 20.0, 10.0),
            })
            .unwrap();
        let page = surface.finish().unwrap();
        assert_eq!(page.image.get_pixel(20, 10).0, [255, 0, 0]);
        assert_eq!(page.image.get_pixel(2, 2).0, [255, 255, 255]);
    }

    fn bundled_fonts() -> FontSet {
        let face = LoadedFont::bundled().unwrap();
        FontSet {
            display: Some(face.clone()),
            ui: Some(face),
        }
    }

    fn caption(size_mm: f32, position: crate::geometry::PointMm, opacity: f32) -> DrawCommand {
        DrawCommand::Text(TextRun {
            text: "SAMPLE".to_string(),
            role: FontRole::Ui,
            size_mm,
            position,
            align: TextAlign::Center,
            rotation_deg: 0.0,
            color: Rgb::BLACK,
            opacity,
        })
    }

    /// Pixel coordinates of everything darker than `below`
    fn ink(page: &RasterPage, below: u8) -> Vec<(u32, u32)> {
        page.image
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0.iter().any(|&c| c < below))
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn test_text_is_drawn_above_the_baseline() {
        // 4 px/mm: sheet is 160 x 80 px, baseline at y = 14 mm (56 px)
        let backend = SkiaBackend::new(4.0, None, bundled_fonts()).unwrap();
        let mut surface = backend.acquire(small_sheet()).unwrap();
        surface
            .execute(&caption(8.0, crate::geometry::PointMm::new(20.0, 14.0), 1.0))
            .unwrap();
        let page = surface.finish().unwrap();

        let ink = ink(&page, 128);
        assert!(!ink.is_empty());
        // Capitals stand on the baseline and no glyph hangs a millimetre below it
        assert!(ink.iter().all(|&(_, y)| y < 60));
        assert!(ink.iter().any(|&(_, y)| y < 40));
        // Centered on x = 20 mm; "SAMPLE" is about 28.5 mm wide at 8 mm
        assert!(ink.iter().any(|&(x, _)| x < 70));
        assert!(ink.iter().any(|&(x, _)| x > 90));
        assert!(ink.iter().all(|&(x, _)| x > 16 && x < 144));
    }

    #[test]
    fn test_text_respects_the_clip() {
        let backend = SkiaBackend::new(4.0, None, bundled_fonts()).unwrap();
        let mut surface = backend.acquire(small_sheet()).unwrap();
        surface
            .execute(&DrawCommand::PushClip(RectMm::new(0.0, 0.0, 20.0, 20.0)))
            .unwrap();
        surface
            .execute(&caption(8.0, crate::geometry::PointMm::new(20.0, 14.0), 1.0))
            .unwrap();
        surface.execute(&DrawCommand::PopClip).unwrap();
        let page = surface.finish().unwrap();

        let ink = ink(&page, 250);
        assert!(!ink.is_empty());
        assert!(ink.iter().all(|&(x, _)| x <= 80));
    }

    #[test]
    fn test_faint_text_stays_faint() {
        let backend = SkiaBackend::new(4.0, None, bundled_fonts()).unwrap();
        let mut surface = backend.acquire(small_sheet()).unwrap();
        surface
            .execute(&caption(8.0, crate::geometry::PointMm::new(20.0, 14.0), 0.12))
            .unwrap();
        let page = surface.finish().unwrap();

        // Full coverage at 12 % black is about 224
        assert!(!ink(&page, 250).is_empty());
        assert!(ink(&page, 215).is_empty());
    }

    #[test]
    fn test_text_without_font_is_skipped() {
        let mut surface = backend(None).acquire(small_sheet()).unwrap();
        surface
            .execute(&DrawCommand::Text(TextRun {
                text: "SAMPLE".to_string(),
                role: FontRole::Ui,
                size_mm: 10.0,
                position: crate::geometry::PointMm::new(20.0, 10.0),
                align: TextAlign::Center,
                rotation_deg: -30.0,
                color: Rgb::BLACK,
                opacity: 1.0,
            }))
            .unwrap();
        let page = surface.finish().unwrap();
        assert!(page.image.pixels().all(|p| p.0 == [255, 255, 255]));
    }
}
