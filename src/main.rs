mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;
mod view;

use app::DashboardApp;
use config::{DashboardConfig, WINDOW_TITLE};
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::from_env();
    log::info!("Using dataset {}", config.data_path.display());

    // Load before the first frame; a failure leaves the window usable via File → Open.
    let mut state = AppState::default();
    state.open(&config.data_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
}
