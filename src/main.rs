use clap::Parser;
use guhwall::{Args, GuhwallApp};

const DEFAULT_WINDOW_WIDTH: f32 = 960.0;
const DEFAULT_WINDOW_HEIGHT: f32 = 640.0;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    guhwall::logging::init(args.debug);

    if args.pregenerate {
        let pool = guhwall::build_thread_pool()?;
        let summary = guhwall::pregenerate::run(&args.scanner(), &pool);
        println!(
            "{} wallpapers: {} cached, {} generated, {} failed",
            summary.total(),
            summary.cached,
            summary.generated,
            summary.failed
        );
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT])
            .with_title(guhwall::APP_NAME)
            .with_app_id(guhwall::APP_NAME)
            .with_transparent(true),
        ..Default::default()
    };

    let result = eframe::run_native(
        guhwall::APP_NAME,
        options,
        Box::new(|cc| {
            GuhwallApp::new(cc, args)
                .map(|app| Box::new(app) as Box<dyn eframe::App>)
                .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
        }),
    );

    match result {
        Ok(_) => Ok(()),
        Err(e) => Err(anyhow::anyhow!("Failed to run application: {:?}", e)),
    }
}
