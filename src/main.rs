mod app;
mod ui;

use std::path::PathBuf;

use app::RustyFormulaApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional: a CSV/JSON file to open on start-up.
    let initial_file = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Formula – CSV Calculator",
        options,
        Box::new(move |_cc| {
            let mut app = RustyFormulaApp::default();
            if let Some(path) = initial_file {
                ui::panels::open_path(&mut app.state, &path);
            }
            Ok(Box::new(app))
        }),
    )
}
