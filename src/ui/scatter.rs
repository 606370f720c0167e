// src/ui/scatter.rs
use eframe::egui::{self, Color32};
use egui_plot::{Plot, Points};

use crate::data::{self, RowId};
use crate::state::AppState;

// Unselected points render near-black at 0.7 opacity.
const UNSELECTED: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 178);

const MIN_RADIUS: f32 = 2.0;
const MAX_RADIUS: f32 = 9.0;

// Click tolerance as a fraction of each axis range.
const HIT_FRACTION: f64 = 0.04;

pub fn show_scatterplot(ui: &mut egui::Ui, state: &mut AppState) {
    let x_col = state.scatter.x.clone();
    let y_col = state.scatter.y.clone();
    let size_col = state.scatter.size.clone();

    let mut plotted: Vec<(RowId, f64, f64, f32)> = Vec::new();
    {
        let Some(dataset) = state.dataset.as_ref() else {
            return;
        };
        let size_extent = dataset.column_extent(&size_col);
        for row in dataset.row_ids() {
            let x = dataset.number(row, &x_col);
            let y = dataset.number(row, &y_col);
            if !x.is_finite() || !y.is_finite() {
                continue; // degenerate cells never reach the plot
            }
            let s = dataset.number(row, &size_col);
            let radius = match size_extent {
                Some((lo, hi)) if hi > lo && s.is_finite() => {
                    MIN_RADIUS + ((s - lo) / (hi - lo)) as f32 * (MAX_RADIUS - MIN_RADIUS)
                }
                _ => MIN_RADIUS,
            };
            plotted.push((row, x, y, radius));
        }
    }

    let x_extent = data::extent(plotted.iter().map(|p| p.1));
    let y_extent = data::extent(plotted.iter().map(|p| p.2));

    let mut plot = Plot::new("scatterplot")
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false);
    // Pin the domains to the data extent of the bound attributes.
    if let Some((lo, hi)) = x_extent {
        plot = plot.include_x(lo).include_x(hi);
    }
    if let Some((lo, hi)) = y_extent {
        plot = plot.include_y(lo).include_y(hi);
    }

    let selection = &state.selection;
    let response = plot.show(ui, |plot_ui| {
        for &(row, x, y, radius) in &plotted {
            let color = selection.color_of(row).unwrap_or(UNSELECTED);
            plot_ui.points(Points::new(vec![[x, y]]).radius(radius).color(color));
        }
        plot_ui.pointer_coordinate()
    });

    if response.response.clicked() {
        if let (Some(pointer), Some((x0, x1)), Some((y0, y1))) =
            (response.inner, x_extent, y_extent)
        {
            let tolerance = (
                ((x1 - x0).abs()).max(f64::EPSILON) * HIT_FRACTION,
                ((y1 - y0).abs()).max(f64::EPSILON) * HIT_FRACTION,
            );
            if let Some(row) = nearest_point(&plotted, (pointer.x, pointer.y), tolerance) {
                state.selection.toggle(row);
            }
        }
    }
}

/// Nearest plotted row within an elliptical tolerance around the
/// pointer, in data coordinates.
fn nearest_point(
    points: &[(RowId, f64, f64, f32)],
    pointer: (f64, f64),
    tolerance: (f64, f64),
) -> Option<RowId> {
    let mut best: Option<(RowId, f64)> = None;
    for &(row, x, y, _) in points {
        let dx = (pointer.0 - x) / tolerance.0;
        let dy = (pointer.1 - y) / tolerance.1;
        let d = dx * dx + dy * dy;
        if d <= 1.0 && best.map_or(true, |(_, bd)| d < bd) {
            best = Some((row, d));
        }
    }
    best.map(|(row, _)| row)
}
