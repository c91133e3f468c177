#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod ui;

use gantt_engine::{init_logging, EngineConfig};

fn main() -> eframe::Result<()> {
    if let Err(e) = init_logging(None) {
        eprintln!("{}", e);
    }
    let config = EngineConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "using default settings");
        EngineConfig::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Gantt Viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "Gantt Viewer",
        options,
        Box::new(move |cc| Ok(Box::new(app::GanttApp::new(cc, config)))),
    )
}
