use eframe::egui;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::bridge::{Poster, UiBridge};
use crate::cache;
use crate::config::Args;
use crate::dispatch::ActionDispatcher;
use crate::scanner::{WallpaperEntry, WallpaperScanner};
use crate::{build_thread_pool, theme, Result, APP_NAME};

pub const CELL_SIZE: egui::Vec2 = egui::vec2(240.0, 135.0);
// Decoded previews are kept at up to twice the cell size for HiDPI screens.
const PREVIEW_MAX_WIDTH: u32 = 480;
const PREVIEW_MAX_HEIGHT: u32 = 270;

/// Messages from the background scan to the UI thread.
pub enum ScanEvent {
    Found {
        entry: WallpaperEntry,
        preview: Option<egui::ColorImage>,
    },
    Finished {
        count: usize,
    },
}

struct GridCell {
    entry: WallpaperEntry,
    texture: Option<egui::TextureHandle>,
}

pub struct GuhwallApp {
    wallpaper_dir: PathBuf,
    cells: Vec<GridCell>,
    bridge: UiBridge<ScanEvent>,
    dispatcher: Arc<ActionDispatcher>,
    thread_pool: rayon::ThreadPool,
    scanning: bool,
    status: Option<String>,
}

impl GuhwallApp {
    pub fn new(cc: &eframe::CreationContext<'_>, args: Args) -> Result<Self> {
        theme::apply(&cc.egui_ctx);

        let thread_pool = build_thread_pool()?;
        let ctx = cc.egui_ctx.clone();
        let bridge = UiBridge::new(move || ctx.request_repaint());

        let scanner = args.scanner();
        let wallpaper_dir = scanner.wallpaper_dir().to_path_buf();
        info!(
            "Wallpapers in {:?}, thumbnails in {:?}",
            wallpaper_dir,
            scanner.cache().dir()
        );

        let poster = bridge.poster();
        thread_pool.spawn(move || {
            run_scan(&scanner, &poster);
        });

        Ok(Self {
            wallpaper_dir,
            cells: Vec::new(),
            bridge,
            dispatcher: Arc::new(ActionDispatcher::new(args.theme_backend)),
            thread_pool,
            scanning: true,
            status: None,
        })
    }

    fn process_scan_events(&mut self, ctx: &egui::Context) {
        self.bridge.drain(|event| match event {
            ScanEvent::Found { entry, preview } => {
                let texture = preview.map(|image| {
                    ctx.load_texture(
                        format!("thumbnail_{}", self.cells.len()),
                        image,
                        egui::TextureOptions::LINEAR,
                    )
                });
                self.cells.push(GridCell { entry, texture });
            }
            ScanEvent::Finished { count } => {
                info!("Scan finished with {} wallpapers", count);
                self.scanning = false;
            }
        });
    }

    /// Runs the dispatcher on the worker pool so slow tools don't stall the UI.
    fn apply_wallpaper(&mut self, path: PathBuf) {
        self.status = Some(format!(
            "Set: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        ));
        let dispatcher = Arc::clone(&self.dispatcher);
        self.thread_pool.spawn(move || dispatcher.activate(&path));
    }

    fn show_header(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(APP_NAME)
                    .color(theme::ACCENT)
                    .strong()
                    .size(16.0),
            );
            ui.label("Wallpaper Manager");
            if let Some(status) = &self.status {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(status.as_str());
                });
            }
        });
    }

    fn show_grid(&self, ui: &mut egui::Ui) -> Option<PathBuf> {
        let mut clicked = None;
        egui::ScrollArea::vertical().auto_shrink(false).show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                for cell in &self.cells {
                    let response = match &cell.texture {
                        Some(texture) => {
                            let image = cell_image(egui::load::SizedTexture::from_handle(texture));
                            ui.add_sized(CELL_SIZE, egui::ImageButton::new(image))
                        }
                        // Thumbnail could not be loaded; still clickable.
                        None => ui.add_sized(CELL_SIZE, egui::Button::new("")),
                    };

                    if response.on_hover_text(cell.entry.file_name()).clicked() {
                        clicked = Some(cell.entry.original_path().to_path_buf());
                    }
                }
            });
        });
        clicked
    }
}

impl eframe::App for GuhwallApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_scan_events(ctx);

        egui::TopBottomPanel::top("header").show(ctx, |ui| self.show_header(ui));

        let mut clicked = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.cells.is_empty() {
                ui.centered_and_justified(|ui| {
                    if self.scanning {
                        ui.label("Scanning for wallpapers...");
                    } else {
                        ui.label(format!(
                            "No wallpapers found in {}",
                            self.wallpaper_dir.display()
                        ));
                    }
                });
                return;
            }
            clicked = self.show_grid(ui);
        });

        if let Some(path) = clicked {
            self.apply_wallpaper(path);
        }
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0, 0.0, 0.0, 0.0]
    }
}

/// Grid image for a thumbnail texture: shrunk to fit inside a cell with its
/// aspect ratio intact, never enlarged.
pub fn cell_image<'a>(texture: egui::load::SizedTexture) -> egui::Image<'a> {
    egui::Image::from_texture(texture)
        .max_size(CELL_SIZE)
        .maintain_aspect_ratio(true)
}

/// Background half of the startup scan: resolves every wallpaper, decodes
/// its preview and posts it to the UI. Stops early once the UI is gone.
/// Returns the number of entries delivered.
pub fn run_scan(scanner: &WallpaperScanner, poster: &Poster<ScanEvent>) -> usize {
    let mut count = 0;
    for entry in scanner.scan() {
        let preview = load_preview(entry.thumbnail_path());
        if !poster.post(ScanEvent::Found { entry, preview }) {
            debug!("UI closed, abandoning scan after {} wallpapers", count);
            return count;
        }
        count += 1;
    }
    poster.post(ScanEvent::Finished { count });
    count
}

/// Decodes an image into pixels ready for texture upload, shrinking large
/// images to preview size.
pub fn load_preview(path: &Path) -> Option<egui::ColorImage> {
    let img = match cache::decode(path) {
        Ok(img) => img,
        Err(e) => {
            debug!("No preview: {}", e);
            return None;
        }
    };

    let img = if img.width() > PREVIEW_MAX_WIDTH || img.height() > PREVIEW_MAX_HEIGHT {
        img.thumbnail(PREVIEW_MAX_WIDTH, PREVIEW_MAX_HEIGHT)
    } else {
        img
    };

    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Some(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}
