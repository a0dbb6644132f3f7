mod app;
mod color;
mod state;
mod ui;

use app::SocialPulseApp;
use eframe::egui;
use social_pulse::config::AppConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::from_env();
    log::info!("Fallback dataset: {}", config.fallback_path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Social Pulse – Social Media Analytics",
        options,
        Box::new(|_cc| Ok(Box::new(SocialPulseApp::new(config)))),
    )
}
