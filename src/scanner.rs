use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::cache::ThumbnailCache;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// One wallpaper as shown in the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallpaperEntry {
    original_path: PathBuf,
    thumbnail_path: PathBuf,
}

impl WallpaperEntry {
    pub fn new(original_path: PathBuf, thumbnail_path: PathBuf) -> Self {
        Self {
            original_path,
            thumbnail_path,
        }
    }

    pub fn original_path(&self) -> &Path {
        &self.original_path
    }

    pub fn thumbnail_path(&self) -> &Path {
        &self.thumbnail_path
    }

    pub fn file_name(&self) -> String {
        self.original_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.original_path.to_string_lossy().into_owned())
    }
}

#[derive(Debug, Clone)]
pub struct WallpaperScanner {
    wallpaper_dir: PathBuf,
    cache: ThumbnailCache,
}

impl WallpaperScanner {
    pub fn new(wallpaper_dir: impl Into<PathBuf>, cache: ThumbnailCache) -> Self {
        Self {
            wallpaper_dir: wallpaper_dir.into(),
            cache,
        }
    }

    pub fn wallpaper_dir(&self) -> &Path {
        &self.wallpaper_dir
    }

    pub fn cache(&self) -> &ThumbnailCache {
        &self.cache
    }

    /// Creates the wallpaper and cache directories. Failures are logged and
    /// otherwise ignored; an unreadable directory just scans as empty.
    pub fn prepare(&self) {
        if let Err(e) = fs::create_dir_all(&self.wallpaper_dir) {
            warn!(
                "Failed to create wallpaper directory {:?}: {}",
                self.wallpaper_dir, e
            );
        }
        self.cache.ensure_dir();
    }

    /// Image files directly inside the wallpaper directory, in listing order.
    /// Hidden (dot) files are skipped.
    pub fn candidates(&self) -> impl Iterator<Item = PathBuf> {
        let root =
            fs::canonicalize(&self.wallpaper_dir).unwrap_or_else(|_| self.wallpaper_dir.clone());
        debug!("Scanning directory: {:?}", root);

        WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable wallpaper entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && !is_hidden(entry.file_name()))
            .map(walkdir::DirEntry::into_path)
            .filter(|path| is_image_file(path))
    }

    /// Lazily resolves a thumbnail for every candidate. Each step may decode
    /// and resize an image, so this must run off the UI thread.
    pub fn scan(&self) -> impl Iterator<Item = WallpaperEntry> + '_ {
        self.prepare();
        self.candidates().map(move |original| {
            let thumbnail = self.cache.resolve(&original);
            WallpaperEntry::new(original, thumbnail)
        })
    }
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext_str| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|&valid_ext| valid_ext.eq_ignore_ascii_case(ext_str))
        })
        .unwrap_or(false)
}

fn is_hidden(name: &OsStr) -> bool {
    name.as_encoded_bytes().starts_with(b".")
}
