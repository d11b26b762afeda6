use eframe::egui::{self, Color32, RichText, Ui};

use rusty_formula::data::filter::{ComparisonOp, Condition};
use rusty_formula::data::inspect::{ColumnMetadata, ColumnType};
use rusty_formula::formula::{Aggregation, BlockKind, BlockPatch, CombineOp, ConditionPatch, FormulaBlock};
use rusty_formula::state::AppState;

// ---------------------------------------------------------------------------
// Edits collected while rendering, applied afterwards
// ---------------------------------------------------------------------------

enum Edit {
    Update(usize, BlockPatch),
    Operator(usize, CombineOp),
    Remove(usize),
}

// ---------------------------------------------------------------------------
// Block list
// ---------------------------------------------------------------------------

/// Render one card per formula block plus the add / calculate buttons.
pub fn block_list(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Formula");

    let columns = state
        .dataset
        .as_ref()
        .map(|ds| ds.column_names.clone())
        .unwrap_or_default();
    let block_count = state.formula.len();
    let mut edits = Vec::new();

    for (index, block) in state.formula.blocks().iter().enumerate() {
        egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
            ui.horizontal_wrapped(|ui: &mut Ui| {
                ui.label(RichText::new(format!("#{}", index + 1)).strong());
                kind_selector(ui, index, block, &mut edits);

                match block {
                    FormulaBlock::Constant { value } => {
                        let mut v = *value;
                        if ui.add(egui::DragValue::new(&mut v).speed(0.1)).changed() {
                            edits.push(Edit::Update(index, BlockPatch::value(v)));
                        }
                    }
                    FormulaBlock::ConditionalAggregate {
                        condition,
                        target_column,
                        aggregation,
                    } => {
                        condition_editor(ui, index, condition, &columns, &state.metadata, &mut edits);
                        aggregation_selector(ui, index, aggregation, &mut edits);
                        target_selector(ui, index, target_column, &columns, &state.metadata, &mut edits);
                    }
                }

                if index + 1 < block_count {
                    if let Some(op) = state.formula.operator_after(index) {
                        operator_selector(ui, index, op, &mut edits);
                    }
                }

                if ui.button("✖").on_hover_text("Remove block").clicked() {
                    edits.push(Edit::Remove(index));
                }
            });
        });
    }

    for edit in edits {
        match edit {
            Edit::Update(index, patch) => state.update_block(index, &patch),
            Edit::Operator(index, op) => state.set_operator(index, op),
            Edit::Remove(index) => state.remove_block(index),
        }
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Add Formula Block").clicked() {
            state.add_block();
        }
        if ui.button("Calculate").clicked() {
            state.compute();
        }
    });
}

fn kind_selector(ui: &mut Ui, index: usize, block: &FormulaBlock, edits: &mut Vec<Edit>) {
    let current = block.kind();
    egui::ComboBox::from_id_salt(("block_kind", index))
        .selected_text(current.label())
        .width(110.0)
        .show_ui(ui, |ui: &mut Ui| {
            for kind in [BlockKind::Constant, BlockKind::ConditionalAggregate] {
                if ui.selectable_label(current == kind, kind.label()).clicked() {
                    edits.push(Edit::Update(index, BlockPatch::kind(kind)));
                }
            }
        });
}

fn condition_editor(
    ui: &mut Ui,
    index: usize,
    condition: &Condition,
    columns: &[String],
    metadata: &ColumnMetadata,
    edits: &mut Vec<Edit>,
) {
    let column_text = if condition.column.is_empty() {
        "Condition column"
    } else {
        condition.column.as_str()
    };
    egui::ComboBox::from_id_salt(("cond_column", index))
        .selected_text(column_text)
        .show_ui(ui, |ui: &mut Ui| {
            for col in columns {
                if ui.selectable_label(condition.column == *col, col.as_str()).clicked() {
                    edits.push(Edit::Update(
                        index,
                        BlockPatch::condition(ConditionPatch {
                            column: Some(col.clone()),
                            operator: Some(ComparisonOp::Eq),
                            value: None,
                        }),
                    ));
                }
            }
        });

    if condition.column.is_empty() {
        return;
    }

    let categorical = metadata.column_type(&condition.column) == Some(ColumnType::Categorical);
    let operators = if categorical {
        ComparisonOp::CATEGORICAL.to_vec()
    } else {
        ComparisonOp::NUMERIC.to_vec()
    };
    egui::ComboBox::from_id_salt(("cond_op", index))
        .selected_text(condition.operator.symbol())
        .width(50.0)
        .show_ui(ui, |ui: &mut Ui| {
            for op in &operators {
                if ui.selectable_label(condition.operator == *op, op.symbol()).clicked() {
                    edits.push(Edit::Update(
                        index,
                        BlockPatch::condition(ConditionPatch {
                            operator: Some(op.clone()),
                            ..Default::default()
                        }),
                    ));
                }
            }
        });

    let value_patch = |value: String| {
        Edit::Update(
            index,
            BlockPatch::condition(ConditionPatch {
                value: Some(value),
                ..Default::default()
            }),
        )
    };

    if categorical {
        let value_text = if condition.value.is_empty() {
            "Select value"
        } else {
            condition.value.as_str()
        };
        egui::ComboBox::from_id_salt(("cond_value", index))
            .selected_text(value_text)
            .show_ui(ui, |ui: &mut Ui| {
                for val in metadata.distinct(&condition.column) {
                    if ui.selectable_label(condition.value == *val, val.as_str()).clicked() {
                        edits.push(value_patch(val.clone()));
                    }
                }
            });
    } else {
        let mut text = condition.value.clone();
        let response = ui.add(
            egui::TextEdit::singleline(&mut text)
                .hint_text("Condition value")
                .desired_width(90.0),
        );
        if response.changed() {
            edits.push(value_patch(text));
        }
    }
}

fn aggregation_selector(ui: &mut Ui, index: usize, current: &Aggregation, edits: &mut Vec<Edit>) {
    egui::ComboBox::from_id_salt(("aggregation", index))
        .selected_text(aggregation_label(current))
        .width(80.0)
        .show_ui(ui, |ui: &mut Ui| {
            for agg in Aggregation::ALL {
                if ui.selectable_label(*current == agg, aggregation_label(&agg)).clicked() {
                    edits.push(Edit::Update(index, BlockPatch::aggregation(agg)));
                }
            }
        });
}

fn aggregation_label(agg: &Aggregation) -> &str {
    match agg {
        Aggregation::Sum => "Sum",
        Aggregation::Average => "Average",
        Aggregation::Unsupported(name) => name,
    }
}

fn target_selector(
    ui: &mut Ui,
    index: usize,
    target: &str,
    columns: &[String],
    metadata: &ColumnMetadata,
    edits: &mut Vec<Edit>,
) {
    let text = if target.is_empty() { "Calculate column" } else { target };
    egui::ComboBox::from_id_salt(("target", index))
        .selected_text(text)
        .show_ui(ui, |ui: &mut Ui| {
            for col in columns.iter().filter(|c| metadata.is_numeric(c)) {
                if ui.selectable_label(target == col.as_str(), col.as_str()).clicked() {
                    edits.push(Edit::Update(index, BlockPatch::target_column(col.clone())));
                }
            }
        });
}

fn operator_selector(ui: &mut Ui, index: usize, current: &CombineOp, edits: &mut Vec<Edit>) {
    egui::ComboBox::from_id_salt(("combine_op", index))
        .selected_text(current.symbol())
        .width(40.0)
        .show_ui(ui, |ui: &mut Ui| {
            for op in CombineOp::ALL {
                if ui.selectable_label(*current == op, op.symbol()).clicked() {
                    edits.push(Edit::Operator(index, op));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Render the outcome of the last calculation.
pub fn results(ui: &mut Ui, state: &AppState) {
    let Some(outcome) = &state.outcome else {
        return;
    };
    if outcome.interim_values.is_empty() {
        return;
    }

    ui.heading("Calculation Results");
    ui.strong("Interim Values:");
    for (i, value) in outcome.interim_values.iter().enumerate() {
        ui.label(format!("Block {}: {value}", i + 1));
    }

    if let Some(result) = outcome.final_result {
        ui.add_space(4.0);
        ui.label(RichText::new(format!("Final Result: {result}")).strong().size(18.0));
    }

    if !outcome.diagnostics.is_empty() {
        ui.add_space(4.0);
        ui.collapsing(format!("Warnings ({})", outcome.diagnostics.len()), |ui: &mut Ui| {
            for diag in &outcome.diagnostics {
                ui.label(RichText::new(diag.to_string()).color(Color32::from_rgb(200, 140, 0)));
            }
        });
    }
}
