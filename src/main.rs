//! Canopy - Street Tree Explorer
//!
//! Loads a city street-tree inventory, summarises it by genus and shows a
//! linked, brushable dashboard next to a set of static charts.

mod analysis;
mod charts;
mod config;
mod data;
mod export;
mod gui;
mod selection;
mod stats;

use eframe::egui;
use gui::CanopyApp;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1100.0, 650.0])
            .with_title("Canopy"),
        ..Default::default()
    };

    eframe::run_native(
        "Canopy",
        options,
        Box::new(|cc| Ok(Box::new(CanopyApp::new(cc)))),
    )
}
