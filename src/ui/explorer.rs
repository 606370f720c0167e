// src/ui/explorer.rs
use eframe::egui;

use crate::state::{selection, AppState};
use crate::ui::{radar, scatter, table};

pub fn show_explorer_view(ui: &mut egui::Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui| {
            ui.label("Load a CSV dataset to get started (File → Open CSV…)");
        });
        return;
    }

    // Visual-channel menus for the scatterplot.
    ui.horizontal(|ui| {
        let dims = state.dimensions.clone();
        dimension_combo(ui, "scatter_x", "X", &mut state.scatter.x, &dims);
        ui.add_space(8.0);
        dimension_combo(ui, "scatter_y", "Y", &mut state.scatter.y, &dims);
        ui.add_space(8.0);
        dimension_combo(ui, "scatter_size", "Size", &mut state.scatter.size, &dims);
    });

    ui.add_space(4.0);
    ui.separator();

    let available = ui.available_size();
    let chart_height = (available.y * 0.55).max(240.0);

    ui.horizontal(|ui| {
        ui.allocate_ui(egui::vec2(available.x * 0.52, chart_height), |ui| {
            scatter::show_scatterplot(ui, state);
        });

        ui.allocate_ui(egui::vec2(available.x * 0.44, chart_height), |ui| {
            ui.vertical(|ui| {
                radar::show_radar(ui, state);
                show_legend(ui, state);
            });
        });
    });

    ui.separator();

    if let Some(dataset) = &state.dataset {
        table::show_table(ui, dataset);
    }
}

fn dimension_combo(
    ui: &mut egui::Ui,
    id: &str,
    label: &str,
    current: &mut String,
    dimensions: &[String],
) {
    ui.label(label);
    egui::ComboBox::from_id_source(id)
        .selected_text(current.clone())
        .show_ui(ui, |ui| {
            for dim in dimensions {
                ui.selectable_value(current, dim.clone(), dim);
            }
        });
}

/// One entry per selected row, labeled with the row's category value in
/// its positional color. Clicking an entry deselects the row.
fn show_legend(ui: &mut egui::Ui, state: &mut AppState) {
    let Some(dataset) = state.dataset.as_ref() else {
        return;
    };
    let category = state.settings.category_column.clone();

    let mut removed = None;
    for (slot, &row) in state.selection.rows().iter().enumerate() {
        let label = dataset.cell(row, &category);
        let text = egui::RichText::new(label).color(selection::color(slot)).strong();
        if ui.add(egui::Label::new(text).sense(egui::Sense::click())).clicked() {
            removed = Some(row);
        }
    }
    if let Some(row) = removed {
        state.selection.remove(row);
    }
}
