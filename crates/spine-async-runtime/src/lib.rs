use std::path::PathBuf;
use std::sync::Arc;

mod scheduler;
mod worker;

// Re-export types from the library crate
pub use spine_compose::{
    Artwork, BookSpec, ComposeOptions, CompositionStatistics, DesignFile, DesignSession, FontBook,
};

pub use scheduler::{Generation, RenderScheduler};
pub use worker::{render_generation, worker_task};

/// Commands sent from the designer to the worker
#[derive(Debug)]
pub enum ComposeCommand {
    LoadArtwork {
        path: PathBuf,
    },
    LoadDesign {
        path: PathBuf,
    },
    CalculateStats {
        books: Vec<BookSpec>,
    },
    /// Proof render; superseded by any newer generation
    Render {
        generation: Generation,
        session: DesignSession,
        artwork: Option<Arc<Artwork>>,
        options: ComposeOptions,
    },
    /// Final export; always runs to completion
    Export {
        session: DesignSession,
        artwork: Option<Arc<Artwork>>,
        options: ComposeOptions,
        output_path: PathBuf,
    },
}

/// Updates sent from the worker back to the designer
#[derive(Debug, Clone)]
pub enum ComposeUpdate {
    Progress {
        generation: Generation,
        current: usize,
        total: usize,
    },
    ArtworkLoaded {
        artwork: Arc<Artwork>,
        width_px: u32,
        height_px: u32,
    },
    /// The image could not be used; composing continues without it
    ArtworkUnavailable {
        message: String,
    },
    DesignLoaded {
        design: DesignFile,
    },
    StatsCalculated {
        stats: CompositionStatistics,
    },
    Rendered {
        generation: Generation,
        pdf: Arc<Vec<u8>>,
        page_count: usize,
    },
    Exported {
        path: PathBuf,
        page_count: usize,
    },
    Error {
        message: String,
    },
}
