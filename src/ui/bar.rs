// src/ui/bar.rs
use std::collections::HashMap;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, vec2};

use crate::data::Dataset;
use crate::file::Settings;
use crate::state::dashboard::{BandZoom, DashboardState};

const BAR_FILL: Color32 = Color32::from_rgb(0x46, 0x82, 0xb4); // steelblue
const BAR_ACTIVE: Color32 = Color32::from_rgb(0x7a, 0xa8, 0xcc);
const AXIS_COLOR: Color32 = Color32::GRAY;

const MARGIN_LEFT: f32 = 44.0;
const MARGIN_BOTTOM: f32 = 26.0;
const MARGIN_TOP: f32 = 8.0;

/// Zoomable bar chart: one bar per data row at its country's band, raw
/// metric values without pre-aggregation. Dragging a bar reorders the
/// band axis; the scroll wheel zooms it; clicking a band pushes the
/// country to the donut and the choropleth highlight.
pub fn show_bar(
    ui: &mut egui::Ui,
    dataset: &Dataset,
    dash: &mut DashboardState,
    settings: &Settings,
) {
    let entries: Vec<(String, f64)> = dataset
        .row_ids()
        .filter_map(|row| {
            let value = dataset.number(row, &settings.value_column);
            value.is_finite().then(|| {
                (dataset.cell(row, &settings.country_column).to_string(), value)
            })
        })
        .collect();

    if entries.is_empty() || dash.bar_order.is_empty() {
        ui.label("No numeric values to chart");
        return;
    }
    let max_value = entries.iter().map(|e| e.1).fold(0.0_f64, f64::max).max(f64::EPSILON);

    let size = ui.available_size();
    let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
    let rect = response.rect;
    let plot = Rect::from_min_max(
        rect.min + vec2(MARGIN_LEFT, MARGIN_TOP),
        rect.max - vec2(4.0, MARGIN_BOTTOM),
    );
    let width = plot.width().max(1.0);
    let n = dash.bar_order.len();
    let step = width / n as f32;

    // Wheel zoom about the pointer.
    if response.hovered() {
        let scroll = ui.input(|i| i.scroll_delta.y);
        if scroll != 0.0 {
            if let Some(pointer) = response.hover_pos() {
                let factor = (scroll * 0.005).exp();
                dash.bar_zoom.zoom_at(factor, pointer.x - plot.left(), width);
            }
        }
    }

    // Drag: a grabbed bar reorders the band axis; empty space pans.
    if response.drag_started() {
        dash.bar_drag = response.interact_pointer_pos().and_then(|p| {
            plot.contains(p).then(|| {
                let idx = band_index(p.x - plot.left(), dash.bar_zoom, step, n);
                dash.bar_order[idx].clone()
            })
        });
    }
    if response.dragged() {
        if let Some(dragged) = dash.bar_drag.clone() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let target = band_index(pointer.x - plot.left(), dash.bar_zoom, step, n);
                if let Some(current) = dash.bar_order.iter().position(|c| *c == dragged) {
                    if current != target {
                        move_category(&mut dash.bar_order, current, target);
                    }
                }
            }
        } else {
            dash.bar_zoom.pan(response.drag_delta().x, width);
        }
    }
    if response.drag_released() {
        dash.bar_drag = None;
    }

    // Click publishes the country to the donut and the choropleth.
    if response.clicked() {
        if let Some(pointer) = response.interact_pointer_pos() {
            if plot.contains(pointer) {
                let idx = band_index(pointer.x - plot.left(), dash.bar_zoom, step, n);
                let country = dash.bar_order[idx].clone();
                dash.donut_country = Some(country.clone());
                dash.highlighted_country = Some(country);
            }
        }
    }

    let zoom = dash.bar_zoom;
    let band_width = step * zoom.scale;
    let band_left = |idx: usize| plot.left() + zoom.apply(idx as f32 * step);
    let index_of: HashMap<&str, usize> = dash
        .bar_order
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();

    let painter = painter.with_clip_rect(rect);

    // Bars: one rect per row, overdrawn at shared bands as in the data join.
    for (country, value) in &entries {
        let Some(&idx) = index_of.get(country.as_str()) else {
            continue;
        };
        let height = (value / max_value) as f32 * plot.height();
        let x = band_left(idx) + band_width * 0.05;
        let bar = Rect::from_min_max(
            Pos2::new(x, plot.bottom() - height),
            Pos2::new(x + band_width * 0.9, plot.bottom()),
        );
        let active = dash.bar_drag.as_deref() == Some(country.as_str());
        painter.rect_filled(bar, 1.0, if active { BAR_ACTIVE } else { BAR_FILL });
    }

    // Axes.
    painter.line_segment(
        [plot.left_bottom(), plot.right_bottom()],
        Stroke::new(1.0, AXIS_COLOR),
    );
    painter.line_segment(
        [plot.left_top(), plot.left_bottom()],
        Stroke::new(1.0, AXIS_COLOR),
    );
    for k in 0..=4 {
        let v = max_value * k as f64 / 4.0;
        let y = plot.bottom() - plot.height() * k as f32 / 4.0;
        painter.text(
            Pos2::new(plot.left() - 4.0, y),
            Align2::RIGHT_CENTER,
            format_value(v),
            FontId::proportional(9.0),
            AXIS_COLOR,
        );
    }

    // Country labels, shown once bands are wide enough to carry text.
    if band_width >= 14.0 {
        let max_chars = (band_width / 6.0) as usize;
        for (idx, country) in dash.bar_order.iter().enumerate() {
            let center_x = band_left(idx) + band_width / 2.0;
            if center_x < plot.left() || center_x > plot.right() {
                continue;
            }
            let label: String = country.chars().take(max_chars.max(1)).collect();
            painter.text(
                Pos2::new(center_x, plot.bottom() + 2.0),
                Align2::CENTER_TOP,
                label,
                FontId::proportional(9.0),
                ui.visuals().text_color(),
            );
        }
    }
}

/// Band index under an axis-relative x position, for the current zoom.
pub(crate) fn band_index(x: f32, zoom: BandZoom, step: f32, n: usize) -> usize {
    let idx = ((x - zoom.offset) / (step * zoom.scale)).floor() as isize;
    idx.clamp(0, n as isize - 1) as usize
}

/// Move the category at `from` so it lands at band `to`.
pub(crate) fn move_category(order: &mut Vec<String>, from: usize, to: usize) {
    let category = order.remove(from);
    let to = to.min(order.len());
    order.insert(to, category);
}

fn format_value(v: f64) -> String {
    if v >= 1e9 {
        format!("{:.1}G", v / 1e9)
    } else if v >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if v >= 1e3 {
        format!("{:.1}k", v / 1e3)
    } else {
        format!("{:.0}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Vec<String> {
        vec!["A".into(), "B".into(), "C".into(), "D".into()]
    }

    #[test]
    fn reorder_moves_a_category_between_bands() {
        let mut o = order();
        move_category(&mut o, 0, 2);
        assert_eq!(o, vec!["B", "C", "A", "D"]);

        let mut o = order();
        move_category(&mut o, 3, 0);
        assert_eq!(o, vec!["D", "A", "B", "C"]);
    }

    #[test]
    fn band_index_without_zoom() {
        let zoom = BandZoom::default();
        assert_eq!(band_index(5.0, zoom, 100.0, 4), 0);
        assert_eq!(band_index(150.0, zoom, 100.0, 4), 1);
        assert_eq!(band_index(399.0, zoom, 100.0, 4), 3);
    }

    #[test]
    fn band_index_respects_zoom_and_clamps() {
        let zoom = BandZoom { scale: 2.0, offset: -100.0 };
        // Screen x 100 maps back to axis x 100 under this transform.
        assert_eq!(band_index(100.0, zoom, 100.0, 4), 1);
        assert_eq!(band_index(-500.0, zoom, 100.0, 4), 0);
        assert_eq!(band_index(5000.0, zoom, 100.0, 4), 3);
    }
}
