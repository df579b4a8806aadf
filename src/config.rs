use clap::Parser;
use std::path::PathBuf;

use crate::cache::{ThumbnailCache, DEFAULT_THUMBNAIL_WIDTH};
use crate::dispatch::ThemeBackend;
use crate::scanner::WallpaperScanner;
use crate::APP_NAME;

#[derive(Parser, Clone, Debug)]
#[command(name = "guhwall")]
#[command(about = "Pick a wallpaper from a folder of thumbnails")]
pub struct Args {
    /// Wallpaper folder [default: ~/Pictures/Wallpapers]
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Thumbnail cache folder [default: ~/.cache/guhwall/thumbs]
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    #[arg(short, long, default_value_t = DEFAULT_THUMBNAIL_WIDTH)]
    pub thumbnail_width: u32,

    #[arg(long, value_enum, default_value_t = ThemeBackend::Matugen)]
    pub theme_backend: ThemeBackend,

    #[arg(long, help = "Enable debug output")]
    pub debug: bool,

    #[arg(long, help = "Generate all thumbnails and exit (don't show GUI)")]
    pub pregenerate: bool,
}

impl Args {
    pub fn wallpaper_dir(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(default_wallpaper_dir)
    }

    pub fn thumbnail_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(default_cache_dir)
    }

    pub fn scanner(&self) -> WallpaperScanner {
        let cache = ThumbnailCache::new(self.thumbnail_cache_dir(), self.thumbnail_width);
        WallpaperScanner::new(self.wallpaper_dir(), cache)
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

pub fn default_wallpaper_dir() -> PathBuf {
    home_dir().join("Pictures").join("Wallpapers")
}

pub fn default_cache_dir() -> PathBuf {
    let cache_home = dirs::cache_dir().unwrap_or_else(|| home_dir().join(".cache"));
    cache_home.join(APP_NAME).join("thumbs")
}
