//! Headless fill of the thumbnail cache (`--pregenerate`).

use rayon::prelude::*;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

use crate::cache::Resolution;
use crate::scanner::WallpaperScanner;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PregenerateSummary {
    pub cached: usize,
    pub generated: usize,
    pub failed: usize,
}

impl PregenerateSummary {
    pub fn total(&self) -> usize {
        self.cached + self.generated + self.failed
    }

    fn record(mut self, resolution: &Resolution) -> Self {
        match resolution {
            Resolution::Hit(_) => self.cached += 1,
            Resolution::Generated(_) => self.generated += 1,
            Resolution::Fallback(_) => self.failed += 1,
        }
        self
    }

    fn merge(self, other: Self) -> Self {
        Self {
            cached: self.cached + other.cached,
            generated: self.generated + other.generated,
            failed: self.failed + other.failed,
        }
    }
}

/// Resolves a thumbnail for every wallpaper in parallel on `pool`.
pub fn run(scanner: &WallpaperScanner, pool: &rayon::ThreadPool) -> PregenerateSummary {
    scanner.prepare();
    let paths: Vec<PathBuf> = scanner.candidates().collect();
    info!("Generating thumbnails for {} images...", paths.len());

    let start_time = Instant::now();
    let cache = scanner.cache();
    let summary = pool.install(|| {
        paths
            .par_iter()
            .map(|path| cache.lookup(path))
            .fold(PregenerateSummary::default, |summary, resolution| summary.record(&resolution))
            .reduce(PregenerateSummary::default, PregenerateSummary::merge)
    });

    log_summary(&summary, start_time.elapsed());
    summary
}

fn log_summary(summary: &PregenerateSummary, elapsed: Duration) {
    info!(
        "Thumbnail generation complete: {} cached, {} generated, {} failed ({:.1}s)",
        summary.cached,
        summary.generated,
        summary.failed,
        elapsed.as_secs_f64()
    );
}
