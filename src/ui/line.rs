// src/ui/line.rs
use std::time::Instant;

use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::data::{aggregate, Dataset, RowId};
use crate::file::Settings;
use crate::state::dashboard::{DashboardState, SeriesReveal};
use crate::state::selection;

/// Multi-series line chart: one line per product, yearly value totals
/// over the whole dataset. Series are revealed one at a time by the
/// animation loop, each drawn left to right over a second.
pub fn show_line_chart(
    ui: &mut egui::Ui,
    dataset: &Dataset,
    dash: &mut DashboardState,
    settings: &Settings,
) {
    let rows: Vec<RowId> = dataset.row_ids().collect();
    let nested = aggregate::group_sum_by_two(
        dataset,
        &rows,
        &settings.product_column,
        &settings.year_column,
        &settings.value_column,
    );
    let series = build_series(&nested);
    if series.is_empty() {
        ui.label("No numeric values to chart");
        return;
    }

    let frame = dash.line_anim.frame(Instant::now(), series.len());
    if dash.line_anim.is_running() {
        ui.ctx().request_repaint();
    }

    Plot::new("line_chart")
        .legend(Legend::default())
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_y(0.0)
        .show(ui, |plot_ui| {
            for (i, (product, points)) in series.iter().enumerate() {
                let visible: Vec<[f64; 2]> = match frame.reveal(i) {
                    SeriesReveal::Full => points.clone(),
                    SeriesReveal::Partial(t) => partial_points(points, t),
                    SeriesReveal::Hidden => continue,
                };
                if visible.is_empty() {
                    continue;
                }
                plot_ui.line(
                    Line::new(PlotPoints::from(visible))
                        .color(selection::color(i))
                        .width(3.0)
                        .name(product),
                );
            }
        });
}

/// Per-product (year, total) polylines, years parsed to numbers and
/// sorted so each line runs left to right. Years that fail to parse
/// are dropped from that series.
pub(crate) fn build_series(
    nested: &[(String, Vec<(String, f64)>)],
) -> Vec<(String, Vec<[f64; 2]>)> {
    nested
        .iter()
        .filter_map(|(product, by_year)| {
            let mut points: Vec<[f64; 2]> = by_year
                .iter()
                .filter_map(|(year, total)| {
                    let year: f64 = year.trim().parse().ok()?;
                    Some([year, *total])
                })
                .collect();
            if points.is_empty() {
                return None;
            }
            points.sort_by(|a, b| a[0].partial_cmp(&b[0]).unwrap_or(std::cmp::Ordering::Equal));
            Some((product.clone(), points))
        })
        .collect()
}

/// Prefix of a polyline covering fraction `t` of its x-range, with the
/// cut segment interpolated so the draw front moves smoothly.
pub(crate) fn partial_points(points: &[[f64; 2]], t: f32) -> Vec<[f64; 2]> {
    if points.len() < 2 {
        return if t > 0.0 { points.to_vec() } else { Vec::new() };
    }
    let x0 = points[0][0];
    let x1 = points[points.len() - 1][0];
    let front = x0 + (x1 - x0) * t.clamp(0.0, 1.0) as f64;

    let mut out = Vec::new();
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        out.push(a);
        if b[0] >= front {
            if front > a[0] && b[0] > a[0] {
                let s = (front - a[0]) / (b[0] - a[0]);
                out.push([front, a[1] + (b[1] - a[1]) * s]);
            }
            return out;
        }
    }
    out.push(points[points.len() - 1]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_sorted_by_numeric_year() {
        let nested = vec![(
            "oil".to_string(),
            vec![
                ("2022".to_string(), 7.0),
                ("2020".to_string(), 5.0),
                ("2021".to_string(), 6.0),
            ],
        )];
        let series = build_series(&nested);
        assert_eq!(series.len(), 1);
        assert_eq!(
            series[0].1,
            vec![[2020.0, 5.0], [2021.0, 6.0], [2022.0, 7.0]]
        );
    }

    #[test]
    fn unparseable_years_are_dropped() {
        let nested = vec![
            (
                "oil".to_string(),
                vec![("2020".to_string(), 5.0), ("n/a".to_string(), 9.0)],
            ),
            ("gas".to_string(), vec![("??".to_string(), 1.0)]),
        ];
        let series = build_series(&nested);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].1, vec![[2020.0, 5.0]]);
    }

    #[test]
    fn partial_line_interpolates_the_draw_front() {
        let points = vec![[0.0, 0.0], [10.0, 10.0], [20.0, 0.0]];

        let half = partial_points(&points, 0.5);
        assert_eq!(half, vec![[0.0, 0.0], [10.0, 10.0]]);

        let quarter = partial_points(&points, 0.25);
        assert_eq!(quarter, vec![[0.0, 0.0], [5.0, 5.0]]);

        assert_eq!(partial_points(&points, 1.0).len(), 3);
        assert!(partial_points(&points, 0.0).len() <= 1);
    }
}
