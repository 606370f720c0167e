// src/ui/radar.rs
use eframe::egui::{self, Align2, Color32, FontId, Mesh, Pos2, Sense, Shape, Stroke, vec2};

use crate::geo;
use crate::state::{selection, AppState};

const GRID_LEVELS: usize = 5;
const AXIS_FRACTION: f32 = 0.75;
const LABEL_FRACTION: f32 = 0.9;

/// Radar ("spider") chart of the current selection. The radial scale is
/// fixed by the global maximum over all rows and dimensions so the chart
/// does not rescale as the selection changes.
pub fn show_radar(ui: &mut egui::Ui, state: &AppState) {
    let Some(dataset) = state.dataset.as_ref() else {
        return;
    };
    let dims = &state.dimensions;
    if dims.is_empty() {
        ui.label("No numeric dimensions to chart");
        return;
    }

    let mut max_value = 0.0_f64;
    for row in dataset.row_ids() {
        for dim in dims {
            let v = dataset.number(row, dim);
            if v.is_finite() && v > max_value {
                max_value = v;
            }
        }
    }
    if max_value <= 0.0 {
        max_value = 1.0;
    }

    let side = ui.available_width().min(340.0).max(120.0);
    let (response, painter) = ui.allocate_painter(vec2(side, side), Sense::hover());
    let center = response.rect.center();
    let full_radius = side / 2.0;
    let axis_radius = full_radius * AXIS_FRACTION;
    let label_radius = full_radius * LABEL_FRACTION;

    let n = dims.len();
    // Axes start at 12 o'clock and proceed clockwise.
    let angle = |i: usize| std::f32::consts::TAU * i as f32 / n as f32 - std::f32::consts::FRAC_PI_2;
    let vertex = |radius: f32, i: usize| {
        Pos2::new(
            center.x + radius * angle(i).cos(),
            center.y + radius * angle(i).sin(),
        )
    };

    // Concentric N-gon gridlines.
    for level in 1..=GRID_LEVELS {
        let r = axis_radius * level as f32 / GRID_LEVELS as f32;
        let ring: Vec<Pos2> = (0..n).map(|i| vertex(r, i)).collect();
        painter.add(Shape::closed_line(ring, Stroke::new(1.0, Color32::LIGHT_GRAY)));
    }

    // Spokes and axis labels.
    for (i, dim) in dims.iter().enumerate() {
        painter.line_segment([center, vertex(axis_radius, i)], Stroke::new(1.0, Color32::GRAY));
        painter.text(
            vertex(label_radius, i),
            Align2::CENTER_CENTER,
            dim,
            FontId::proportional(10.0),
            ui.visuals().text_color(),
        );
    }

    // One closed profile per selected row, stacked in selection order.
    for (slot, &row) in state.selection.rows().iter().enumerate() {
        let color = selection::color(slot);
        let profile: Vec<Pos2> = (0..n)
            .map(|i| {
                let v = dataset.number(row, &dims[i]);
                let v = if v.is_finite() { v } else { 0.0 };
                vertex(axis_radius * (v / max_value) as f32, i)
            })
            .collect();

        // Profiles go concave whenever one value dips below its
        // neighbors, so the fill needs a proper triangulation.
        painter.add(Shape::mesh(fill_mesh(&profile, color.linear_multiply(0.25))));
        painter.add(Shape::closed_line(profile.clone(), Stroke::new(2.0, color)));
        for point in profile {
            painter.circle_filled(point, 3.0, color);
        }
    }
}

/// Fill mesh for one closed profile, ear-clipped so concave outlines
/// fill exactly.
fn fill_mesh(profile: &[Pos2], color: Color32) -> Mesh {
    let ring: Vec<(f32, f32)> = profile.iter().map(|p| (p.x, p.y)).collect();
    let mut mesh = Mesh::default();
    for &p in profile {
        mesh.colored_vertex(p, color);
    }
    for tri in geo::triangulate(&ring) {
        mesh.add_triangle(tri[0] as u32, tri[1] as u32, tri[2] as u32);
    }
    mesh
}
