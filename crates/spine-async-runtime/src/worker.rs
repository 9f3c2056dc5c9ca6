use spine_compose::{
    ComposeError, Composition, DesignFile, calculate_statistics, load_artwork, save_document,
};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::{
    Artwork, ComposeCommand, ComposeOptions, ComposeUpdate, DesignSession, FontBook, Generation,
    RenderScheduler,
};

/// Async worker that processes compose commands and sends updates.
///
/// Queued proof renders collapse to the newest one, and a render that goes
/// stale while running is dropped between pages without publishing.
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<ComposeCommand>,
    update_tx: mpsc::UnboundedSender<ComposeUpdate>,
    fonts: Arc<FontBook>,
    scheduler: RenderScheduler,
) {
    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &fonts, &scheduler, &mut command_rx, &update_tx).await;
    }
    log::debug!("Command channel closed, worker exiting");
}

async fn process_command(
    cmd: ComposeCommand,
    fonts: &Arc<FontBook>,
    scheduler: &RenderScheduler,
    command_rx: &mut mpsc::UnboundedReceiver<ComposeCommand>,
    update_tx: &mpsc::UnboundedSender<ComposeUpdate>,
) {
    match cmd {
        ComposeCommand::LoadArtwork { path } => match load_artwork(&path).await {
            Ok(artwork) => {
                let (width_px, height_px) = artwork.dimensions();
                let _ = update_tx.send(ComposeUpdate::ArtworkLoaded {
                    artwork: Arc::new(artwork),
                    width_px,
                    height_px,
                });
            }
            Err(e) => {
                log::warn!("{}", e);
                let _ = update_tx.send(ComposeUpdate::ArtworkUnavailable {
                    message: e.to_string(),
                });
            }
        },
        ComposeCommand::LoadDesign { path } => {
            let update = match DesignFile::load(&path).await {
                Ok(design) => ComposeUpdate::DesignLoaded { design },
                Err(e) => ComposeUpdate::Error {
                    message: format!("Failed to load design: {}", e),
                },
            };
            let _ = update_tx.send(update);
        }
        ComposeCommand::CalculateStats { books } => {
            let update = match calculate_statistics(&books, Default::default()) {
                Ok(stats) => ComposeUpdate::StatsCalculated { stats },
                Err(e) => ComposeUpdate::Error {
                    message: e.to_string(),
                },
            };
            let _ = update_tx.send(update);
        }
        ComposeCommand::Render {
            mut generation,
            mut session,
            mut artwork,
            mut options,
        } => {
            // Drain any queued renders, keeping only the most recent
            while let Ok(next_cmd) = command_rx.try_recv() {
                if let ComposeCommand::Render {
                    generation: next_generation,
                    session: next_session,
                    artwork: next_artwork,
                    options: next_options,
                } = next_cmd
                {
                    log::debug!("Discarding queued render {:?}, using newer request", generation);
                    generation = next_generation;
                    session = next_session;
                    artwork = next_artwork;
                    options = next_options;
                } else {
                    // Can't put it back; handle it before the render
                    Box::pin(process_command(
                        next_cmd, fonts, scheduler, command_rx, update_tx,
                    ))
                    .await;
                }
            }

            handle_render(generation, session, artwork, options, fonts, scheduler, update_tx).await;
        }
        ComposeCommand::Export {
            session,
            artwork,
            options,
            output_path,
        } => {
            let page_count = session.books().len();
            let fonts = Arc::clone(fonts);
            let result = tokio::task::spawn_blocking(move || {
                spine_compose::compose_document(&session, artwork.as_deref(), &fonts, &options)
            })
            .await
            .map_err(ComposeError::from)
            .and_then(|r| r);

            let update = match result {
                Ok(pdf) => match save_document(&pdf, &output_path).await {
                    Ok(()) => ComposeUpdate::Exported {
                        path: output_path,
                        page_count,
                    },
                    Err(e) => ComposeUpdate::Error {
                        message: format!("Failed to save: {}", e),
                    },
                },
                Err(e) => ComposeUpdate::Error {
                    message: format!("Export failed: {}", e),
                },
            };
            let _ = update_tx.send(update);
        }
    }
}

async fn handle_render(
    generation: Generation,
    session: DesignSession,
    artwork: Option<Arc<Artwork>>,
    options: ComposeOptions,
    fonts: &Arc<FontBook>,
    scheduler: &RenderScheduler,
    update_tx: &mpsc::UnboundedSender<ComposeUpdate>,
) {
    if !scheduler.is_current(generation) {
        log::debug!("Skipping stale render {:?}", generation);
        return;
    }

    let fonts = Arc::clone(fonts);
    let composition = tokio::task::spawn_blocking(move || {
        Composition::new(&session, artwork.as_deref(), &fonts, &options)
    })
    .await
    .map_err(ComposeError::from)
    .and_then(|r| r);

    let composition = match composition {
        Ok(composition) => Arc::new(composition),
        Err(e) => {
            let _ = update_tx.send(ComposeUpdate::Error {
                message: format!("Render failed: {}", e),
            });
            return;
        }
    };

    let page_count = composition.page_count();
    let progress = |current, total| {
        let _ = update_tx.send(ComposeUpdate::Progress {
            generation,
            current,
            total,
        });
    };

    match render_generation(composition, generation, scheduler, progress).await {
        Ok(pdf) => {
            let _ = update_tx.send(ComposeUpdate::Rendered {
                generation,
                pdf: Arc::new(pdf),
                page_count,
            });
        }
        Err(ComposeError::Superseded) => {
            log::debug!("Render {:?} superseded, result dropped", generation);
        }
        Err(e) => {
            let _ = update_tx.send(ComposeUpdate::Error {
                message: format!("Render failed: {}", e),
            });
        }
    }
}

/// Render a composition page by page on the blocking pool.
///
/// Between pages, and once more before returning, the generation is checked
/// against the scheduler; a stale one ends with `Superseded`.
pub async fn render_generation(
    composition: Arc<Composition>,
    generation: Generation,
    scheduler: &RenderScheduler,
    mut progress: impl FnMut(usize, usize),
) -> spine_compose::Result<Vec<u8>> {
    let total = composition.page_count();
    let mut pages = Vec::with_capacity(total);

    for index in 0..total {
        if !scheduler.is_current(generation) {
            return Err(ComposeError::Superseded);
        }
        let job = Arc::clone(&composition);
        pages.push(tokio::task::spawn_blocking(move || job.render_page(index)).await??);
        progress(index + 1, total);
    }

    if !scheduler.is_current(generation) {
        return Err(ComposeError::Superseded);
    }
    let pdf = tokio::task::spawn_blocking(move || composition.finish(&pages)).await??;

    if !scheduler.is_current(generation) {
        return Err(ComposeError::Superseded);
    }
    Ok(pdf)
}
