// src/ui/donut.rs
use std::time::Instant;

use eframe::egui::{self, Color32, Mesh, Pos2, Sense, Shape, vec2};

use crate::data::{aggregate, Dataset, RowId};
use crate::file::Settings;
use crate::state::dashboard::{DashboardState, DonutSweep};

// d3.schemeBlues[4].
const SLICE_COLORS: [Color32; 4] = [
    Color32::from_rgb(0xef, 0xf3, 0xff),
    Color32::from_rgb(0xbd, 0xd7, 0xe7),
    Color32::from_rgb(0x6b, 0xae, 0xd6),
    Color32::from_rgb(0x21, 0x71, 0xb5),
];

const SWEEP_SECS: f32 = 0.75;
const INNER_FRACTION: f32 = 0.75;

/// Donut of the selected year: per-flow row counts, or per-flow summed
/// values when the bar chart has pushed a country filter. The whole
/// ring sweeps in from angle zero whenever the (year, country) key
/// changes.
pub fn show_donut(
    ui: &mut egui::Ui,
    dataset: &Dataset,
    dash: &mut DashboardState,
    settings: &Settings,
) {
    let Some(year) = dash.selected_year.clone() else {
        ui.label("No year column in dataset");
        return;
    };
    let country = dash.donut_country.clone();

    let rows: Vec<RowId> = dataset
        .row_ids()
        .filter(|&row| {
            dataset.cell(row, &settings.year_column) == year
                && country
                    .as_deref()
                    .map_or(true, |c| dataset.cell(row, &settings.country_column) == c)
        })
        .collect();

    if rows.is_empty() {
        log::error!("No data found for the year {}", year);
        return;
    }

    let slices: Vec<(String, f64)> = if country.is_some() {
        aggregate::group_sum(dataset, &rows, &settings.flow_column, &settings.value_column)
    } else {
        aggregate::group_count(dataset, &rows, &settings.flow_column)
            .into_iter()
            .map(|(k, c)| (k, c as f64))
            .collect()
    };

    let spans = arc_spans(&slices);
    if spans.is_empty() {
        return;
    }

    // Restart the sweep whenever the control key changes.
    let key = (year, country);
    let now = Instant::now();
    let restart = dash.donut_sweep.as_ref().map_or(true, |s| s.key != key);
    if restart {
        dash.donut_sweep = Some(DonutSweep { key, started: now });
    }
    let started = dash.donut_sweep.as_ref().map(|s| s.started).unwrap_or(now);
    let t = (now.saturating_duration_since(started).as_secs_f32() / SWEEP_SECS).min(1.0);
    if t < 1.0 {
        ui.ctx().request_repaint();
    }

    ui.horizontal(|ui| {
        let size = ui.available_size();
        let diameter = size.y.min(size.x * 0.65).max(80.0);
        let (response, painter) = ui.allocate_painter(vec2(diameter, diameter), Sense::hover());
        let center = response.rect.center();
        let outer = diameter / 2.0 - 4.0;
        let inner = outer * INNER_FRACTION;

        for (i, (_, start, end)) in spans.iter().enumerate() {
            let color = SLICE_COLORS[i % SLICE_COLORS.len()];
            painter.add(Shape::mesh(annular_sector(center, inner, outer, start * t, end * t, color)));
        }

        ui.vertical(|ui| {
            for (i, (label, _, _)) in spans.iter().enumerate() {
                let color = SLICE_COLORS[i % SLICE_COLORS.len()];
                ui.horizontal(|ui| {
                    let (swatch, painter) = ui.allocate_painter(vec2(12.0, 12.0), Sense::hover());
                    painter.rect_filled(swatch.rect, 2.0, color);
                    ui.label(label);
                });
            }
        });
    });
}

/// Partition the full circle proportionally to each slice's aggregate,
/// in encounter order, angles measured clockwise from 12 o'clock.
pub(crate) fn arc_spans(slices: &[(String, f64)]) -> Vec<(String, f32, f32)> {
    let total: f64 = slices
        .iter()
        .map(|(_, v)| if v.is_finite() && *v > 0.0 { *v } else { 0.0 })
        .sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut spans = Vec::with_capacity(slices.len());
    let mut start = 0.0_f32;
    for (label, value) in slices {
        let share = if value.is_finite() && *value > 0.0 { value / total } else { 0.0 };
        let end = start + (share as f32) * std::f32::consts::TAU;
        spans.push((label.clone(), start, end));
        start = end;
    }
    // Numerical drift: snap the final edge onto the full circle.
    if let Some(last) = spans.last_mut() {
        last.2 = std::f32::consts::TAU;
    }
    spans
}

/// Triangle-strip mesh for one annular sector. Angles are clockwise
/// from 12 o'clock in screen space.
fn annular_sector(
    center: Pos2,
    inner: f32,
    outer: f32,
    start_angle: f32,
    end_angle: f32,
    color: Color32,
) -> Mesh {
    let sweep = (end_angle - start_angle).max(0.0);
    let steps = ((sweep / 0.1).ceil() as usize).max(1);

    let mut mesh = Mesh::default();
    for k in 0..=steps {
        let a = start_angle + sweep * k as f32 / steps as f32;
        let dir = vec2(a.sin(), -a.cos());
        mesh.colored_vertex(center + dir * inner, color);
        mesh.colored_vertex(center + dir * outer, color);
    }
    for k in 0..steps as u32 {
        let base = 2 * k;
        mesh.add_triangle(base, base + 1, base + 2);
        mesh.add_triangle(base + 1, base + 3, base + 2);
    }
    mesh
}
