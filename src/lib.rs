//! Wallpaper browser: scans a folder, caches thumbnails on disk and hands
//! clicks off to external tools (`swww`, `matugen`, `notify-send`).

use std::path::PathBuf;
use std::process::ExitStatus;

pub mod app;
pub mod bridge;
pub mod cache;
pub mod config;
pub mod dispatch;
pub mod logging;
pub mod pregenerate;
pub mod scanner;
pub mod theme;

pub use app::GuhwallApp;
pub use bridge::{Poster, UiBridge};
pub use cache::{Resolution, ThumbnailCache};
pub use config::Args;
pub use dispatch::{
    ActionDispatcher, CommandRunner, ExternalCommand, SystemRunner, ThemeBackend,
};
pub use scanner::{is_image_file, WallpaperEntry, WallpaperScanner};

pub const APP_NAME: &str = "guhwall";

#[derive(Debug, thiserror::Error)]
pub enum GuhwallError {
    #[error("Failed to create thread pool: {0}")]
    ThreadPoolCreation(#[from] rayon::ThreadPoolBuildError),

    #[error("Failed to open image {path}: {source}")]
    ImageOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Skipping {path}: {size} bytes is over the thumbnail source limit")]
    SourceTooLarge { path: PathBuf, size: u64 },

    #[error("Failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to encode thumbnail {path}: {source}")]
    ThumbnailEncode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to move thumbnail into place at {path}: {source}")]
    ThumbnailPersist {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to launch {program}: {source}")]
    CommandLaunch {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    CommandStatus { program: String, status: ExitStatus },
}

pub type Result<T> = std::result::Result<T, GuhwallError>;

const MIN_THREAD_COUNT: usize = 4;

/// Worker pool for scanning, thumbnail generation and dispatch.
pub fn build_thread_pool() -> Result<rayon::ThreadPool> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_cpus::get().max(MIN_THREAD_COUNT))
        .thread_name(|index| format!("{}-worker-{}", APP_NAME, index))
        .build()?;
    Ok(pool)
}
