// src/ui/dashboard.rs
use eframe::egui;

use crate::state::AppState;
use crate::ui::{bar, choropleth, donut, line};

/// Dashboard screen: four charts in a 2x2 grid plus the shared year
/// selector. Cross-chart events (bar click driving donut and choropleth)
/// flow through `DashboardState`, written here and read by each chart.
pub fn show_dashboard_view(ui: &mut egui::Ui, state: &mut AppState) {
    let AppState { dataset, dashboard, settings, topology, .. } = state;

    let Some(dataset) = dataset.as_ref() else {
        ui.centered_and_justified(|ui| {
            ui.label("Load a CSV dataset to populate the dashboard");
        });
        return;
    };

    // Year radio buttons; changing the year drops any country filter.
    ui.horizontal(|ui| {
        ui.label("Year:");
        let years = dashboard.years.clone();
        for year in years {
            let checked = dashboard.selected_year.as_deref() == Some(year.as_str());
            if ui.radio(checked, &year).clicked() && !checked {
                dashboard.select_year(year);
            }
        }
    });
    ui.separator();

    let available = ui.available_size();
    let cell = egui::vec2((available.x - 16.0) / 2.0, (available.y - 16.0) / 2.0);

    ui.horizontal(|ui| {
        ui.allocate_ui(cell, |ui| {
            ui.group(|ui| {
                ui.set_min_size(cell - egui::vec2(12.0, 12.0));
                donut::show_donut(ui, dataset, dashboard, settings);
            });
        });
        ui.allocate_ui(cell, |ui| {
            ui.group(|ui| {
                ui.set_min_size(cell - egui::vec2(12.0, 12.0));
                bar::show_bar(ui, dataset, dashboard, settings);
            });
        });
    });

    ui.horizontal(|ui| {
        ui.allocate_ui(cell, |ui| {
            ui.group(|ui| {
                ui.set_min_size(cell - egui::vec2(12.0, 12.0));
                choropleth::show_choropleth(ui, dataset, topology, dashboard, settings);
            });
        });
        ui.allocate_ui(cell, |ui| {
            ui.group(|ui| {
                ui.set_min_size(cell - egui::vec2(12.0, 12.0));
                line::show_line_chart(ui, dataset, dashboard, settings);
            });
        });
    });
}
