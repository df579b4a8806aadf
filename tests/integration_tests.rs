use guhwall::app::{run_scan, ScanEvent};
use guhwall::pregenerate::{self, PregenerateSummary};
use guhwall::{
    ActionDispatcher, CommandRunner, ExternalCommand, ThemeBackend, ThumbnailCache, UiBridge,
    WallpaperEntry, WallpaperScanner,
};
use serial_test::serial;
use sha1::{Digest, Sha1};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[cfg(test)]
mod tests {
    use super::*;

    fn write_jpeg(path: &Path, width: u32, height: u32) {
        image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        })
        .save_with_format(path, image::ImageFormat::Jpeg)
        .unwrap();
    }

    fn create_wallpaper_folder(base_dir: &Path) -> std::io::Result<PathBuf> {
        let walls = base_dir.join("Pictures").join("Wallpapers");
        fs::create_dir_all(walls.join("archive"))?;

        write_jpeg(&walls.join("sunset.jpg"), 800, 450);
        write_jpeg(&walls.join("forest.JPEG"), 640, 480);
        image::RgbaImage::from_pixel(320, 240, image::Rgba([0, 80, 160, 255]))
            .save_with_format(walls.join("ocean.png"), image::ImageFormat::Png)
            .unwrap();
        fs::write(walls.join("broken.webp"), b"RIFF fake webp")?;
        fs::write(walls.join("notes.txt"), b"not an image")?;
        write_jpeg(&walls.join("archive").join("old.jpg"), 64, 64);

        Ok(walls)
    }

    #[derive(Clone, Default)]
    struct RecordingRunner {
        calls: Arc<Mutex<Vec<ExternalCommand>>>,
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, command: &ExternalCommand) -> guhwall::Result<()> {
            self.calls.lock().unwrap().push(command.clone());
            Ok(())
        }
    }

    fn drain_entries(bridge: &UiBridge<ScanEvent>) -> (Vec<(WallpaperEntry, bool)>, Option<usize>) {
        let mut entries = Vec::new();
        let mut finished = None;
        bridge.drain(|event| match event {
            ScanEvent::Found { entry, preview } => entries.push((entry, preview.is_some())),
            ScanEvent::Finished { count } => finished = Some(count),
        });
        (entries, finished)
    }

    #[test]
    #[serial]
    fn test_end_to_end_scan_and_activate() {
        let temp_dir = TempDir::new().unwrap();
        let walls = temp_dir.path().join("walls");
        fs::create_dir_all(&walls).unwrap();
        write_jpeg(&walls.join("sunset.jpg"), 1280, 720);
        fs::write(walls.join("notes.txt"), b"remember to buy milk").unwrap();

        let thumbs = temp_dir.path().join("cache").join("guhwall").join("thumbs");
        let scanner = WallpaperScanner::new(&walls, ThumbnailCache::new(&thumbs, 300));
        let entries: Vec<WallpaperEntry> = scanner.scan().collect();

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        let sunset = fs::canonicalize(walls.join("sunset.jpg")).unwrap();
        assert_eq!(entry.original_path(), sunset);

        let expected_name = format!(
            "{:x}.jpg",
            Sha1::digest(sunset.as_os_str().as_encoded_bytes())
        );
        assert_eq!(entry.thumbnail_path(), thumbs.join(&expected_name));
        assert!(entry.thumbnail_path().is_file());
        assert_eq!(fs::read_dir(&thumbs).unwrap().count(), 1);

        let runner = RecordingRunner::default();
        let dispatcher = ActionDispatcher::with_runner(ThemeBackend::Matugen, runner.clone());
        dispatcher.activate(entry.original_path());

        let calls = runner.calls.lock().unwrap();
        let programs: Vec<&str> = calls.iter().map(|c| c.program()).collect();
        assert_eq!(programs, ["swww", "matugen", "notify-send"]);
        for call in calls.iter() {
            assert!(
                call.arguments().iter().any(|arg| Path::new(arg) == sunset),
                "{} is missing the wallpaper path",
                call
            );
        }
    }

    #[test]
    #[serial]
    fn test_background_scan_delivers_entries_then_finishes() {
        let temp_dir = TempDir::new().unwrap();
        let walls = create_wallpaper_folder(temp_dir.path()).unwrap();
        let thumbs = temp_dir.path().join("thumbs");
        let scanner = WallpaperScanner::new(&walls, ThumbnailCache::new(&thumbs, 300));

        let bridge = UiBridge::new(|| {});
        let poster = bridge.poster();
        let worker = std::thread::spawn(move || run_scan(&scanner, &poster));
        let delivered = worker.join().unwrap();

        let (entries, finished) = drain_entries(&bridge);
        assert_eq!(delivered, 4);
        assert_eq!(finished, Some(4));

        let mut names: Vec<String> = entries.iter().map(|(entry, _)| entry.file_name()).collect();
        names.sort();
        assert_eq!(names, ["broken.webp", "forest.JPEG", "ocean.png", "sunset.jpg"]);

        for (entry, has_preview) in &entries {
            if entry.file_name() == "broken.webp" {
                // No thumbnail possible: the original stands in and shows blank.
                assert_eq!(entry.thumbnail_path(), entry.original_path());
                assert!(!has_preview);
            } else {
                assert!(entry.thumbnail_path().starts_with(&thumbs));
                assert!(has_preview);
            }
        }
        assert_eq!(fs::read_dir(&thumbs).unwrap().count(), 3);
    }

    #[test]
    #[serial]
    fn test_scan_order_matches_delivery_order() {
        let temp_dir = TempDir::new().unwrap();
        let walls = create_wallpaper_folder(temp_dir.path()).unwrap();
        let cache = ThumbnailCache::new(temp_dir.path().join("thumbs"), 300);
        let scanner = WallpaperScanner::new(&walls, cache);

        let listed: Vec<PathBuf> = scanner.candidates().collect();

        let bridge = UiBridge::new(|| {});
        run_scan(&scanner, &bridge.poster());
        let (entries, _) = drain_entries(&bridge);
        let delivered: Vec<PathBuf> = entries
            .iter()
            .map(|(entry, _)| entry.original_path().to_path_buf())
            .collect();

        assert_eq!(delivered, listed);
    }

    #[test]
    #[serial]
    fn test_scan_stops_when_ui_is_gone() {
        let temp_dir = TempDir::new().unwrap();
        let walls = create_wallpaper_folder(temp_dir.path()).unwrap();
        let cache = ThumbnailCache::new(temp_dir.path().join("thumbs"), 300);
        let scanner = WallpaperScanner::new(&walls, cache);

        let bridge: UiBridge<ScanEvent> = UiBridge::new(|| {});
        let poster = bridge.poster();
        drop(bridge);

        assert_eq!(run_scan(&scanner, &poster), 0);
    }

    #[test]
    #[serial]
    fn test_second_scan_reuses_cached_thumbnails() {
        let temp_dir = TempDir::new().unwrap();
        let walls = create_wallpaper_folder(temp_dir.path()).unwrap();
        let thumbs = temp_dir.path().join("thumbs");
        let scanner = WallpaperScanner::new(&walls, ThumbnailCache::new(&thumbs, 300));

        let mut first: Vec<WallpaperEntry> = scanner.scan().collect();
        let modified: Vec<_> = first
            .iter()
            .filter(|entry| entry.thumbnail_path().starts_with(&thumbs))
            .map(|entry| fs::metadata(entry.thumbnail_path()).unwrap().modified().unwrap())
            .collect();

        let mut second: Vec<WallpaperEntry> = scanner.scan().collect();
        let modified_again: Vec<_> = second
            .iter()
            .filter(|entry| entry.thumbnail_path().starts_with(&thumbs))
            .map(|entry| fs::metadata(entry.thumbnail_path()).unwrap().modified().unwrap())
            .collect();

        first.sort_by(|a, b| a.original_path().cmp(b.original_path()));
        second.sort_by(|a, b| a.original_path().cmp(b.original_path()));
        assert_eq!(first, second);
        assert_eq!(modified, modified_again);
    }

    #[test]
    #[serial]
    fn test_pregenerate_counts_outcomes() {
        let temp_dir = TempDir::new().unwrap();
        let walls = create_wallpaper_folder(temp_dir.path()).unwrap();
        let thumbs = temp_dir.path().join("thumbs");
        let scanner = WallpaperScanner::new(&walls, ThumbnailCache::new(&thumbs, 200));
        let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();

        let summary = pregenerate::run(&scanner, &pool);
        assert_eq!(
            summary,
            PregenerateSummary {
                cached: 0,
                generated: 3,
                failed: 1
            }
        );
        assert_eq!(summary.total(), 4);

        let summary = pregenerate::run(&scanner, &pool);
        assert_eq!(
            summary,
            PregenerateSummary {
                cached: 3,
                generated: 0,
                failed: 1
            }
        );

        for entry in fs::read_dir(&thumbs).unwrap() {
            let decoded = image::open(entry.unwrap().path()).unwrap();
            assert_eq!(decoded.width(), 200);
        }
    }

    #[test]
    #[serial]
    fn test_pregenerate_on_missing_folder_creates_it() {
        let temp_dir = TempDir::new().unwrap();
        let walls = temp_dir.path().join("does").join("not").join("exist");
        let cache = ThumbnailCache::new(temp_dir.path().join("thumbs"), 300);
        let scanner = WallpaperScanner::new(&walls, cache);
        let pool = guhwall::build_thread_pool().unwrap();

        assert_eq!(pregenerate::run(&scanner, &pool), PregenerateSummary::default());
        assert!(walls.is_dir());
    }
}
