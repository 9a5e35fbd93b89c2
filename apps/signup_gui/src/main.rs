mod backend_bridge;
mod controller;
mod ui;

use client_core::load_settings;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::SignupApp;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    tracing::info!(server_url = %settings.server_url, "starting signup window");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(1024);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("BBQ aanmelding")
            .with_inner_size([560.0, 780.0])
            .with_min_inner_size([420.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "BBQ aanmelding",
        options,
        Box::new(|_cc| Ok(Box::new(SignupApp::new(cmd_tx, ui_rx)))),
    )
    .map_err(|err| anyhow::anyhow!("signup window failed: {err}"))
}
