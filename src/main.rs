mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::HrInsightsApp;
use clap::Parser;
use config::Settings;
use eframe::egui;

fn main() -> eframe::Result {
    let settings = Settings::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.log_level.as_str()),
    )
    .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "HR Insights Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(HrInsightsApp::new(&settings)))),
    )
}
