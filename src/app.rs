use eframe::egui;

use rusty_formula::state::AppState;

use crate::ui::{blocks, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RustyFormulaApp {
    pub state: AppState,
}

impl eframe::App for RustyFormulaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: data, blocks, results ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a CSV file to start  (File → Open…)");
                });
                return;
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    table::data_grid(ui, &self.state);
                    ui.separator();
                    blocks::block_list(ui, &mut self.state);
                    ui.separator();
                    blocks::results(ui, &self.state);
                });
        });
    }
}
