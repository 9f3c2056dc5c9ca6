use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use spine_compose::{
    BookSpec, DesignFile, DesignSession, FontBook, FontChoice, PointMm, Rgb, ZoomOutcome,
    compose_document_async, extract_previews_async, load_artwork_or_none, save_document,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "spinet", about = "Book spine artwork tools", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the stack layout for a set of books
    Layout {
        #[command(flatten)]
        stack: StackArgs,
    },

    /// Compose the print-ready PDF, one sheet per book
    Compose {
        #[command(flatten)]
        stack: StackArgs,

        /// Output PDF file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Artwork image (PNG or JPEG)
        #[arg(short, long)]
        artwork: Option<PathBuf>,

        /// Zoom relative to the smallest zoom that covers every spine
        #[arg(long)]
        zoom: Option<f32>,

        /// Artwork offset in mm, as X,Y
        #[arg(long, value_parser = parse_offset)]
        offset: Option<PointMm>,

        /// Large text across the stack ("\n" starts a new line)
        #[arg(long)]
        text: Option<String>,

        /// Large text size in points
        #[arg(long)]
        text_size: Option<f32>,

        /// Font family for the large text
        #[arg(long)]
        font: Option<String>,

        /// Extra font files to make available
        #[arg(long, num_args = 1..)]
        font_file: Vec<PathBuf>,

        /// Output resolution
        #[arg(long)]
        dpi: Option<f32>,

        /// JPEG quality for page images (1-100)
        #[arg(long)]
        quality: Option<u8>,

        /// Leave out the SAMPLE watermark
        #[arg(long)]
        no_watermark: bool,

        /// Document title
        #[arg(long)]
        title: Option<String>,

        /// Also write one PNG preview per page into this directory
        #[arg(long)]
        previews: Option<PathBuf>,

        /// Save the resulting design as JSON
        #[arg(long)]
        save_design: Option<PathBuf>,

        /// Show statistics only, don't generate PDF
        #[arg(long)]
        stats_only: bool,
    },
}

#[derive(Args)]
struct StackArgs {
    /// Book as LABEL:HEIGHT_CM:SPINE_CM[:#RRGGBB], left to right
    #[arg(short, long = "book", value_parser = parse_book)]
    books: Vec<BookArg>,

    /// Design file to start from
    #[arg(short, long)]
    design: Option<PathBuf>,
}

#[derive(Clone)]
struct BookArg {
    label: String,
    height_cm: f32,
    spine_cm: f32,
    color: Option<Rgb>,
}

fn parse_book(s: &str) -> std::result::Result<BookArg, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if !(3..=4).contains(&parts.len()) {
        return Err("expected LABEL:HEIGHT_CM:SPINE_CM[:#RRGGBB]".to_string());
    }
    let number = |field: &str, name: &str| {
        field
            .trim()
            .parse::<f32>()
            .map_err(|_| format!("{} '{}' is not a number", name, field))
    };
    let color = match parts.get(3) {
        Some(hex) => Some(Rgb::from_hex(hex).ok_or_else(|| format!("bad color '{}'", hex))?),
        None => None,
    };
    Ok(BookArg {
        label: parts[0].to_string(),
        height_cm: number(parts[1], "height")?,
        spine_cm: number(parts[2], "spine width")?,
        color,
    })
}

fn parse_offset(s: &str) -> std::result::Result<PointMm, String> {
    let (x, y) = s.split_once(',').ok_or("expected X,Y")?;
    let x = x.trim().parse().map_err(|_| format!("bad X '{}'", x))?;
    let y = y.trim().parse().map_err(|_| format!("bad Y '{}'", y))?;
    Ok(PointMm::new(x, y))
}

impl StackArgs {
    /// Books from the command line replace those of the design file
    async fn design(&self) -> Result<DesignFile> {
        let mut design = match &self.design {
            Some(path) => DesignFile::load(path)
                .await
                .with_context(|| format!("loading {}", path.display()))?,
            None => DesignFile::default(),
        };

        if !self.books.is_empty() {
            design.books = self
                .books
                .iter()
                .enumerate()
                .map(|(i, b)| {
                    let book = BookSpec::from_cm(i as u32 + 1, b.label.clone(), b.height_cm, b.spine_cm);
                    match b.color {
                        Some(color) => book.with_color(color),
                        None => book,
                    }
                })
                .collect();
        }

        if design.books.is_empty() {
            bail!("no books given; use --book or --design");
        }
        Ok(design)
    }
}

fn print_statistics(session: &DesignSession) {
    let stats = session.statistics();
    println!("Stack Statistics:");
    println!("  Books: {}", stats.book_count);
    println!("  Output pages: {}", stats.output_pages);
    println!("  Total spine width: {:.1} mm", stats.total_width_mm);
    println!(
        "  Required area: {:.1} x {:.1} mm",
        stats.required_width_mm, stats.required_height_mm
    );
    println!(
        "  Fits sheet: {}",
        if stats.fits_sheet { "yes" } else { "no" }
    );
}

/// Zoom relative to the minimum; a request below it is declined
fn apply_zoom(session: &mut DesignSession, relative: f32) -> ZoomOutcome {
    let min_zoom = session.recompute().bounds.min_zoom;
    let outcome = session.set_zoom(min_zoom * relative);
    if let ZoomOutcome::Declined { kept, .. } = outcome {
        log::warn!(
            "Zoom {} would uncover the spines, keeping {:.2}x the minimum",
            relative,
            kept / min_zoom
        );
    }
    outcome
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Layout { stack } => {
            let design = stack.design().await?;
            let session = design.to_session(None)?;
            print_statistics(&session);

            let derived = session.recompute();
            println!("Spines:");
            for placed in &derived.layout.rects {
                println!(
                    "  #{:<3} {:<20} x {:>6.1}  y {:>6.1}  {:>5.1} x {:>5.1} mm  {}",
                    placed.id,
                    placed.label,
                    placed.rect.x,
                    placed.rect.y,
                    placed.rect.width,
                    placed.rect.height,
                    placed.color.to_hex()
                );
            }
            println!(
                "Large text limit: {} pt",
                session.text.max_size_pt
            );
        }

        Commands::Compose {
            stack,
            output,
            artwork,
            zoom,
            offset,
            text,
            text_size,
            font,
            font_file,
            dpi,
            quality,
            no_watermark,
            title,
            previews,
            save_design,
            stats_only,
        } => {
            let mut design = stack.design().await?;
            if artwork.is_some() {
                design.artwork = artwork;
            }

            let options = &mut design.options;
            if let Some(dpi) = dpi {
                options.pixels_per_mm = dpi / 25.4;
            }
            if let Some(quality) = quality {
                options.jpeg_quality = quality;
            }
            if no_watermark {
                options.watermark = false;
            }
            if title.is_some() {
                options.title = title;
            }
            design.validate()?;

            let art = match &design.artwork {
                Some(path) => load_artwork_or_none(path).await,
                None => None,
            };
            let mut session = design.to_session(art.as_ref().map(|a| a.dimensions()))?;
            print_statistics(&session);
            if stats_only {
                return Ok(());
            }

            if let Some(relative) = zoom {
                apply_zoom(&mut session, relative);
            }
            if let Some(offset) = offset {
                session.set_offset(offset);
            }
            if let Some(text) = text {
                session.set_text(text.replace("\\n", "\n"));
                session.set_text_enabled(true);
            }
            if let Some(family) = font {
                session.set_text_font(match family.as_str() {
                    "sans-serif" => FontChoice::SansSerif,
                    "serif" => FontChoice::Serif,
                    "monospace" => FontChoice::Monospace,
                    _ => FontChoice::Family(family),
                });
            }
            if let Some(size) = text_size {
                let applied = session.set_text_size(size);
                if applied != size {
                    log::warn!("Text size {} pt clamped to {} pt", size, applied);
                }
            }

            if let Some(path) = save_design {
                let snapshot =
                    DesignFile::from_session(&session, design.artwork.clone(), design.options.clone());
                snapshot.save(&path).await?;
                println!("Design → {}", path.display());
            }

            let Some(output) = output else {
                bail!("--output is required unless --stats-only is given");
            };

            let mut fonts = FontBook::system();
            for path in &font_file {
                fonts
                    .add_font_file(path)
                    .with_context(|| format!("loading font {}", path.display()))?;
            }

            let derived = session.recompute();
            let pdf = compose_document_async(session, art, Arc::new(fonts), design.options).await?;
            save_document(&pdf, &output).await?;
            println!(
                "Composed {} pages (zoom {:.3}) → {}",
                derived.layout.rects.len(),
                derived.zoom,
                output.display()
            );

            if let Some(dir) = previews {
                tokio::fs::create_dir_all(&dir).await?;
                for (index, preview) in extract_previews_async(pdf).await?.iter().enumerate() {
                    let path = dir.join(format!("page-{:02}.png", index + 1));
                    preview
                        .save(&path)
                        .with_context(|| format!("writing {}", path.display()))?;
                }
                println!("Previews → {}", dir.display());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> DesignSession {
        let mut session = DesignSession::new(vec![BookSpec::new(1, "A", 200.0, 30.0)]).unwrap();
        session.load_artwork(1000, 800);
        session
    }

    #[test]
    fn test_zoom_below_minimum_is_declined() {
        let mut session = session();
        let min_zoom = session.recompute().bounds.min_zoom;
        assert!(matches!(
            apply_zoom(&mut session, 0.5),
            ZoomOutcome::Declined { .. }
        ));
        assert_eq!(session.recompute().zoom, min_zoom);

        assert!(matches!(
            apply_zoom(&mut session, 2.0),
            ZoomOutcome::Applied(_)
        ));
    }

    #[test]
    fn test_parse_book_and_offset() {
        let book = parse_book("Dune:23.5:4.25:#c0392b").unwrap();
        assert_eq!(book.label, "Dune");
        assert_eq!(book.color, Some(Rgb::new(0xc0, 0x39, 0x2b)));
        assert_eq!(parse_offset("3, -2").unwrap(), PointMm::new(3.0, -2.0));
        assert!(parse_offset("3").is_err());
    }
}
