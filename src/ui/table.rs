use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use rusty_formula::state::AppState;

// ---------------------------------------------------------------------------
// Data grid
// ---------------------------------------------------------------------------

const ROW_HEIGHT: f32 = 18.0;
const MAX_GRID_HEIGHT: f32 = 260.0;

/// Render the loaded rows as a scrollable, striped table.
pub fn data_grid(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };

    ui.heading("Data");
    if dataset.is_empty() {
        ui.label("The file has no rows.");
        return;
    }

    let columns = &dataset.column_names;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(MAX_GRID_HEIGHT)
        .columns(Column::auto().at_least(60.0), columns.len())
        .header(ROW_HEIGHT + 4.0, |mut header| {
            for col in columns {
                header.col(|ui| {
                    let ty = state
                        .metadata
                        .column_type(col)
                        .map(|t| t.to_string())
                        .unwrap_or_default();
                    ui.strong(col.as_str()).on_hover_text(ty);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, dataset.len(), |mut row| {
                let index = row.index();
                for col in columns {
                    row.col(|ui| {
                        ui.label(dataset.cell(index, col).unwrap_or(""));
                    });
                }
            });
        });
}
