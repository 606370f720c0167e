// src/ui/table.rs
use eframe::egui::{self, Color32, Sense, vec2};

use crate::data::Dataset;

const HOVER_FILL: Color32 = Color32::from_rgba_premultiplied(50, 90, 120, 70);

/// Full materialization of the dataset: a header row plus one row per
/// data row. Fine for the expected few hundred rows; no sorting,
/// filtering, or pagination.
pub fn show_table(ui: &mut egui::Ui, dataset: &Dataset) {
    egui::ScrollArea::both()
        .id_source("data_table_scroll")
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            egui::Grid::new("data_table")
                .striped(true)
                .min_col_width(60.0)
                .show(ui, |ui| {
                    for column in dataset.columns() {
                        ui.strong(column);
                    }
                    ui.end_row();

                    for row in dataset.row_ids() {
                        for column in dataset.columns() {
                            let response = ui.add(
                                egui::Label::new(dataset.cell(row, column)).sense(Sense::hover()),
                            );
                            if response.hovered() {
                                ui.painter().rect_filled(
                                    response.rect.expand2(vec2(4.0, 2.0)),
                                    2.0,
                                    HOVER_FILL,
                                );
                            }
                        }
                        ui.end_row();
                    }
                });
        });
}
