mod app;
mod cli;
mod color;
mod dashboard;
mod data;
mod state;
mod ui;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use app::PlacementOverviewApp;
use clap::Parser;
use cli::Cli;
use dashboard::DashboardView;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("placement_overview=info"))
        .init();

    let cli = Cli::parse();
    let store = data::store::load(&cli.data, &cli.report_data).inspect_err(|e| {
        log::error!("Failed to load placement data: {e:#}");
    })?;
    let options = cli.dashboard_options();

    if cli.report {
        let selection = cli.selection(&store);
        let view = DashboardView::compute(&store, &selection, &options);
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let state = AppState::new(store, options, read_qr_image(&cli.qr));
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Placement Overview",
        native_options,
        Box::new(|cc| {
            // Install image loaders so egui can decode the QR png.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(PlacementOverviewApp::new(state)))
        }),
    )
    .map_err(|e| anyhow!("window error: {e}"))
}

fn read_qr_image(path: &Path) -> Option<Arc<[u8]>> {
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes.into()),
        Err(e) => {
            log::warn!("QR image {} not shown: {e}", path.display());
            None
        }
    }
}
