// src/ui/choropleth.rs
use std::collections::HashMap;

use eframe::egui::{self, Color32, Mesh, Pos2, Sense, Shape, Stroke};

use crate::data::{aggregate, Dataset, RowId};
use crate::file::Settings;
use crate::geo::{self, WorldMap};
use crate::state::dashboard::DashboardState;
use crate::state::TopologyState;

const WITH_DATA: Color32 = Color32::from_rgb(0x46, 0x82, 0xb4); // steelblue
const HIGHLIGHTED: Color32 = Color32::from_rgb(0x2f, 0x5a, 0x7d);
const NO_DATA: Color32 = Color32::from_rgb(0xf0, 0xf0, 0xf0);
const BORDER: Stroke = Stroke { width: 0.5, color: Color32::BLACK };

/// Per-country totals with the top-3 product shares, derived fresh per
/// frame from the dataset.
pub(crate) struct CountryStats {
    pub total: f64,
    pub top: Vec<(String, f64)>,
}

/// World choropleth joined against the dataset by exact country-name
/// match. Unmatched polygons get the neutral no-data fill; a bar-chart
/// click darkens the matching country.
pub fn show_choropleth(
    ui: &mut egui::Ui,
    dataset: &Dataset,
    topology: &TopologyState,
    dash: &mut DashboardState,
    settings: &Settings,
) {
    let map = match topology {
        TopologyState::Ready(map) => map,
        TopologyState::Pending(_) => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading world topology…");
            });
            return;
        }
        TopologyState::Failed => {
            ui.label("World topology unavailable");
            return;
        }
    };

    let stats = country_stats(dataset, settings);

    let size = ui.available_size();
    let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
    let rect = response.rect;
    let viewport = (rect.width(), rect.height());

    if response.hovered() {
        let scroll = ui.input(|i| i.scroll_delta.y);
        if scroll != 0.0 {
            if let Some(pointer) = response.hover_pos() {
                let factor = (scroll * 0.005).exp();
                dash.map_zoom.zoom_at(
                    factor,
                    (pointer.x - rect.left(), pointer.y - rect.top()),
                    viewport,
                );
            }
        }
    }
    if response.dragged() {
        let delta = response.drag_delta();
        dash.map_zoom.pan_by(delta.x, delta.y, viewport);
    }

    let transform = MapTransform::fit(map, rect, dash.map_zoom.scale, dash.map_zoom.pan);
    let painter = painter.with_clip_rect(rect);

    for country in &map.countries {
        let has_data = stats.contains_key(&country.name);
        let highlighted =
            has_data && dash.highlighted_country.as_deref() == Some(country.name.as_str());
        let fill = country_fill(has_data, highlighted);

        for ring in &country.rings {
            let screen: Vec<Pos2> = ring.points.iter().map(|&p| transform.apply(p)).collect();
            let mut mesh = Mesh::default();
            for &p in &screen {
                mesh.colored_vertex(p, fill);
            }
            for tri in &ring.triangles {
                mesh.add_triangle(tri[0] as u32, tri[1] as u32, tri[2] as u32);
            }
            painter.add(Shape::mesh(mesh));
            painter.add(Shape::closed_line(screen, BORDER));
        }
    }

    // Hover tooltip with the country's totals and top-3 breakdown.
    if let Some(pointer) = response.hover_pos() {
        let projected = transform.invert(pointer);
        let hovered = map.countries.iter().find(|country| {
            country.rings.iter().any(|ring| geo::point_in_ring(projected, &ring.points))
        });
        if let Some(country) = hovered {
            egui::show_tooltip_at_pointer(ui.ctx(), egui::Id::new("choropleth_tooltip"), |ui| {
                ui.strong(&country.name);
                match stats.get(&country.name) {
                    Some(s) => {
                        ui.label(format!("Total production: {:.2}", s.total));
                        if !s.top.is_empty() {
                            ui.label("Top products:");
                            for (product, percent) in &s.top {
                                ui.label(format!("{}: {:.2}%", product, percent));
                            }
                        }
                    }
                    None => {
                        ui.label("No data");
                    }
                }
            });
        }
    }
}

pub(crate) fn country_fill(has_data: bool, highlighted: bool) -> Color32 {
    match (has_data, highlighted) {
        (true, true) => HIGHLIGHTED,
        (true, false) => WITH_DATA,
        (false, _) => NO_DATA,
    }
}

pub(crate) fn country_stats(
    dataset: &Dataset,
    settings: &Settings,
) -> HashMap<String, CountryStats> {
    let mut rows_by_country: HashMap<String, Vec<RowId>> = HashMap::new();
    for row in dataset.row_ids() {
        let country = dataset.cell(row, &settings.country_column);
        if country.is_empty() {
            continue;
        }
        rows_by_country.entry(country.to_string()).or_default().push(row);
    }

    rows_by_country
        .into_iter()
        .map(|(country, rows)| {
            let total: f64 = rows
                .iter()
                .map(|&r| dataset.number(r, &settings.value_column))
                .filter(|v| v.is_finite())
                .sum();
            let products =
                aggregate::group_sum(dataset, &rows, &settings.product_column, &settings.value_column);
            let top = aggregate::top_breakdown(&products, 3);
            (country, CountryStats { total, top })
        })
        .collect()
}

/// Fit of the projected map bounds into the panel, composed with the
/// user's pan/zoom.
struct MapTransform {
    scale: f32,
    origin: Pos2,
    min: (f32, f32),
}

impl MapTransform {
    fn fit(map: &WorldMap, rect: egui::Rect, zoom: f32, pan: (f32, f32)) -> Self {
        let span_x = (map.max.0 - map.min.0).max(f32::EPSILON);
        let span_y = (map.max.1 - map.min.1).max(f32::EPSILON);
        let base = (rect.width() / span_x).min(rect.height() / span_y);
        Self {
            scale: base * zoom,
            origin: Pos2::new(rect.left() + pan.0, rect.top() + pan.1),
            min: map.min,
        }
    }

    fn apply(&self, point: (f32, f32)) -> Pos2 {
        Pos2::new(
            self.origin.x + (point.0 - self.min.0) * self.scale,
            self.origin.y + (point.1 - self.min.1) * self.scale,
        )
    }

    fn invert(&self, screen: Pos2) -> (f32, f32) {
        (
            (screen.x - self.origin.x) / self.scale + self.min.0,
            (screen.y - self.origin.y) / self.scale + self.min.1,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn fill_depends_on_join_and_highlight() {
        assert_eq!(country_fill(true, false), WITH_DATA);
        assert_eq!(country_fill(true, true), HIGHLIGHTED);
        // Only countries with data can highlight; callers never pass
        // (false, true), but the fill still degrades to no-data.
        assert_eq!(country_fill(false, false), NO_DATA);
        assert_eq!(country_fill(false, true), NO_DATA);
    }

    #[test]
    fn stats_join_by_country_name() {
        let dataset = Dataset::from_reader(Cursor::new(
            "country_name,product,value\n\
             Norway,oil,50\n\
             Norway,gas,30\n\
             Norway,coal,15\n\
             Norway,peat,5\n\
             Chad,oil,2\n"
                .to_string(),
        ))
        .unwrap();
        let settings = Settings::default();
        let stats = country_stats(&dataset, &settings);

        let norway = stats.get("Norway").unwrap();
        assert_eq!(norway.total, 100.0);
        assert_eq!(
            norway.top,
            vec![
                ("oil".to_string(), 50.0),
                ("gas".to_string(), 30.0),
                ("coal".to_string(), 15.0),
            ]
        );
        assert!(stats.contains_key("Chad"));
        assert!(!stats.contains_key("Sweden"));
    }
}
