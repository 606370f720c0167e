// src/main.rs
use eframe::egui;
use anyhow::Result;

mod app;
mod data;
mod file;
mod geo;
mod state;
mod ui;

use app::FacetApp;

fn main() -> Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_title("Facet"),
        ..Default::default()
    };

    eframe::run_native(
        "Facet",
        options,
        Box::new(|_cc| Box::new(FacetApp::new())),
    ).map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))
}
