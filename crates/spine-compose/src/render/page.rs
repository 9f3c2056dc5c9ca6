//! Per-book page composition
//!
//! Every output page is a full sheet. The book's own rectangle is moved to
//! the sheet center and everything shared across the stack (artwork, large
//! text) moves with it, so neighbouring pages line up when the printed
//! spines are glued side by side.

use crate::constants::*;
use crate::geometry::{PointMm, RectMm, pt_to_mm};
use crate::layout::{PlacedRect, shared_band};
use crate::session::Recomputed;
use crate::state::LargeTextState;
use crate::types::{ComposeError, Result, Rgb, SheetSize};

use super::{
    DrawCommand, FontRole, RasterPage, RasterSurface, SurfaceFactory, TextAlign, TextMeasure,
    TextRun, center_block, wrap_text,
};

/// Inputs shared by every page of one render request
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub derived: &'a Recomputed,
    pub text: &'a LargeTextState,
    /// Whether an artwork layer is drawn at all
    pub has_artwork: bool,
    /// Metrics of the display face, used for wrapping. Without one the
    /// large text is left out.
    pub measure: Option<&'a dyn TextMeasure>,
    pub watermark: bool,
    pub sheet: SheetSize,
}

impl RenderContext<'_> {
    pub fn page_count(&self) -> usize {
        self.derived.layout.rects.len()
    }

    fn sheet_center(&self) -> PointMm {
        PointMm::new(self.sheet.width_mm / 2.0, self.sheet.height_mm / 2.0)
    }

    /// Top-left of the required area when it is centered on the sheet
    fn layout_origin(&self) -> PointMm {
        let (width, height) = self.derived.layout.required_size();
        PointMm::new(
            (self.sheet.width_mm - width) / 2.0,
            (self.sheet.height_mm - height) / 2.0,
        )
    }
}

/// Build the ordered draw commands for one book's page.
pub fn page_commands(ctx: &RenderContext<'_>, book: &PlacedRect) -> Vec<DrawCommand> {
    let mut commands = Vec::new();
    let center = ctx.sheet_center();
    let anchor = RectMm::centered_at(center, book.rect.width, book.rect.height);
    let in_stack = book.rect.translate(ctx.layout_origin());
    let delta = anchor.origin() - in_stack.origin();

    if ctx.has_artwork {
        let derived = ctx.derived;
        let dest = RectMm::centered_at(
            center + derived.offset + delta,
            derived.bounds.artwork_width_mm * derived.zoom,
            derived.bounds.artwork_height_mm * derived.zoom,
        );
        commands.push(DrawCommand::PushClip(
            anchor.extend_top(ARTWORK_CLIP_OVERHANG_MM),
        ));
        commands.push(DrawCommand::Artwork { dest });
        commands.push(DrawCommand::PopClip);
    }

    if ctx.watermark {
        commands.push(watermark(ctx));
    }

    if ctx.text.is_visible() {
        match ctx.measure {
            Some(measure) => {
                let band = shared_band(&ctx.derived.layout.metrics)
                    .translate(ctx.layout_origin() + delta);
                large_text(&mut commands, ctx.text, &band, measure);
            }
            None => log::debug!("No display face, leaving out the large text"),
        }
    }

    commands.push(DrawCommand::StrokeRect {
        rect: anchor,
        color: book.color,
        width_mm: OUTLINE_WIDTH_MM,
    });
    label_chip(&mut commands, book, &anchor);

    commands
}

fn watermark(ctx: &RenderContext<'_>) -> DrawCommand {
    let size_mm = ctx.sheet.height_mm * WATERMARK_SIZE_RATIO;
    let angle = -WATERMARK_ANGLE_DEG;
    // Drop the baseline by half the cap height, along the rotated y axis
    let drop = size_mm * 0.35;
    let (sin, cos) = angle.to_radians().sin_cos();
    let position = ctx.sheet_center() + PointMm::new(-drop * sin, drop * cos);

    DrawCommand::Text(TextRun {
        text: WATERMARK_TEXT.to_string(),
        role: FontRole::Ui,
        size_mm,
        position,
        align: TextAlign::Center,
        rotation_deg: angle,
        color: Rgb::BLACK,
        opacity: WATERMARK_OPACITY,
    })
}

fn large_text(
    commands: &mut Vec<DrawCommand>,
    text: &LargeTextState,
    band: &RectMm,
    measure: &dyn TextMeasure,
) {
    let max_width = band.width * LARGE_TEXT_WIDTH_RATIO;
    let mut size_mm = pt_to_mm(text.size_pt);
    let mut lines = wrap_text(&text.text, max_width, size_mm, measure);

    // A word that cannot be broken sets the size for the whole block
    let widest = lines
        .iter()
        .map(|line| measure.advance_mm(line, size_mm))
        .fold(0.0, f32::max);
    if widest > max_width {
        size_mm *= max_width / widest;
        log::debug!("Large text shrunk to {:.1} mm to fit its longest word", size_mm);
        lines = wrap_text(&text.text, max_width, size_mm, measure);
    }

    commands.push(DrawCommand::PushClip(*band));
    for line in center_block(lines, band, size_mm, measure) {
        if line.text.is_empty() {
            continue;
        }
        commands.push(DrawCommand::Text(TextRun {
            text: line.text,
            role: FontRole::Display,
            size_mm,
            position: line.baseline_center,
            align: TextAlign::Center,
            rotation_deg: 0.0,
            color: Rgb::BLACK,
            opacity: 1.0,
        }));
    }
    commands.push(DrawCommand::PopClip);
}

fn label_chip(commands: &mut Vec<DrawCommand>, book: &PlacedRect, anchor: &RectMm) {
    let chip = RectMm::new(
        anchor.x,
        anchor.bottom() - LABEL_CHIP_INSET_MM - LABEL_CHIP_HEIGHT_MM,
        anchor.width,
        LABEL_CHIP_HEIGHT_MM,
    );
    let size_mm = pt_to_mm(LABEL_FONT_PT);

    commands.push(DrawCommand::PushClip(*anchor));
    commands.push(DrawCommand::Fill {
        rect: chip,
        color: book.color,
        opacity: 1.0,
    });
    if !book.label.is_empty() {
        commands.push(DrawCommand::Text(TextRun {
            text: book.label.clone(),
            role: FontRole::Ui,
            size_mm,
            position: PointMm::new(chip.center().x, chip.center().y + size_mm * 0.35),
            align: TextAlign::Center,
            rotation_deg: 0.0,
            color: book.color.contrasting(),
            opacity: 1.0,
        }));
    }
    commands.push(DrawCommand::PopClip);
}

/// Render the page for the book at `index`.
pub fn render_page<F: SurfaceFactory>(
    ctx: &RenderContext<'_>,
    index: usize,
    factory: &F,
) -> Result<RasterPage> {
    let book = ctx.derived.layout.rects.get(index).ok_or_else(|| {
        ComposeError::InvalidInput(format!(
            "page {} out of range ({} books)",
            index,
            ctx.page_count()
        ))
    })?;

    let mut surface = factory.acquire(ctx.sheet)?;
    for command in page_commands(ctx, book) {
        surface.execute(&command)?;
    }
    surface.finish()
}

/// Render one page per book, in stack order. The first failure aborts the
/// whole batch.
pub fn render_pages<F: SurfaceFactory>(
    ctx: &RenderContext<'_>,
    factory: &F,
) -> Result<Vec<RasterPage>> {
    (0..ctx.page_count())
        .map(|index| render_page(ctx, index, factory))
        .collect()
}
