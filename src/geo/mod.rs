// src/geo/mod.rs
//
// World topology support for the choropleth: a minimal GeoJSON model,
// the Equal Earth forward projection, and the plane geometry needed to
// fill and hit-test concave country outlines with an immediate-mode
// painter (ear-clipping triangulation, ray-cast containment).

use anyhow::{Context, Result};
use serde::Deserialize;

// Equal Earth polynomial coefficients (Savric, Patterson & Jenny 2018),
// as used by d3-geo's equalEarthRaw.
const A1: f64 = 1.340264;
const A2: f64 = -0.081106;
const A3: f64 = 0.000893;
const A4: f64 = 0.003796;

/// Forward Equal Earth projection of a lon/lat pair in degrees, in
/// projection units with y growing north.
pub fn equal_earth(lon_deg: f64, lat_deg: f64) -> (f64, f64) {
    let m = 3.0_f64.sqrt() / 2.0;
    let lambda = lon_deg.to_radians();
    let phi = lat_deg.to_radians();

    let theta = (m * phi.sin()).asin();
    let t2 = theta * theta;
    let t6 = t2 * t2 * t2;

    let x = lambda * theta.cos() / (m * (A1 + 3.0 * A2 * t2 + t6 * (7.0 * A3 + 9.0 * A4 * t2)));
    let y = theta * (A1 + A2 * t2 + t6 * (A3 + A4 * t2));
    (x, y)
}

#[derive(Debug, Deserialize)]
struct RawCollection {
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    properties: RawProperties,
    geometry: Option<RawGeometry>,
}

#[derive(Debug, Deserialize)]
struct RawProperties {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum RawGeometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    #[serde(other)]
    Unsupported,
}

/// One outer ring of a country outline, already projected to screen
/// orientation (y down) and triangulated for mesh filling.
#[derive(Debug, Clone)]
pub struct ProjectedRing {
    pub points: Vec<(f32, f32)>,
    pub triangles: Vec<[usize; 3]>,
}

#[derive(Debug, Clone)]
pub struct Country {
    pub name: String,
    pub rings: Vec<ProjectedRing>,
}

/// The loaded world topology with precomputed projection bounds for
/// fitting into a viewport.
#[derive(Debug, Clone)]
pub struct WorldMap {
    pub countries: Vec<Country>,
    pub min: (f32, f32),
    pub max: (f32, f32),
}

impl WorldMap {
    pub fn from_geojson_str(text: &str) -> Result<Self> {
        let raw: RawCollection =
            serde_json::from_str(text).context("Invalid GeoJSON topology")?;

        let mut countries = Vec::new();
        for feature in raw.features {
            let rings = match feature.geometry {
                Some(RawGeometry::Polygon { coordinates }) => {
                    outer_rings(std::iter::once(coordinates))
                }
                Some(RawGeometry::MultiPolygon { coordinates }) => {
                    outer_rings(coordinates.into_iter())
                }
                _ => Vec::new(),
            };
            if !rings.is_empty() {
                countries.push(Country { name: feature.properties.name, rings });
            }
        }

        let mut min = (f32::INFINITY, f32::INFINITY);
        let mut max = (f32::NEG_INFINITY, f32::NEG_INFINITY);
        for country in &countries {
            for ring in &country.rings {
                for &(x, y) in &ring.points {
                    min.0 = min.0.min(x);
                    min.1 = min.1.min(y);
                    max.0 = max.0.max(x);
                    max.1 = max.1.max(y);
                }
            }
        }
        if countries.is_empty() {
            min = (0.0, 0.0);
            max = (1.0, 1.0);
        }

        Ok(Self { countries, min, max })
    }
}

/// Project the outer ring of each polygon, dropping hole rings. Hole
/// geometry is rare in country outlines and enclosed countries are
/// drawn over their neighbor in feature order anyway.
fn outer_rings<I: Iterator<Item = Vec<Vec<Vec<f64>>>>>(polygons: I) -> Vec<ProjectedRing> {
    let mut rings = Vec::new();
    for polygon in polygons {
        let Some(outer) = polygon.into_iter().next() else {
            continue;
        };
        let mut points: Vec<(f32, f32)> = outer
            .iter()
            .filter(|pos| pos.len() >= 2)
            .map(|pos| {
                let (x, y) = equal_earth(pos[0], pos[1]);
                (x as f32, -y as f32) // y down for screen space
            })
            .collect();
        // GeoJSON rings repeat the first position at the end.
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            continue;
        }
        let triangles = triangulate(&points);
        rings.push(ProjectedRing { points, triangles });
    }
    rings
}

/// Ray-cast containment test against a closed ring.
pub fn point_in_ring(point: (f32, f32), ring: &[(f32, f32)]) -> bool {
    let (px, py) = point;
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if (yi > py) != (yj > py) {
            let x_cross = (xj - xi) * (py - yi) / (yj - yi) + xi;
            if px < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn signed_area(points: &[(f32, f32)]) -> f32 {
    let n = points.len();
    let mut sum = 0.0;
    for i in 0..n {
        let (x0, y0) = points[i];
        let (x1, y1) = points[(i + 1) % n];
        sum += x0 * y1 - x1 * y0;
    }
    sum / 2.0
}

fn cross(o: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
}

fn point_in_triangle(p: (f32, f32), a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> bool {
    let d1 = cross(a, b, p);
    let d2 = cross(b, c, p);
    let d3 = cross(c, a, p);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Ear-clipping triangulation of a simple (possibly concave) polygon.
/// Returns indices into `points`; n-2 triangles for a simple ring.
pub fn triangulate(points: &[(f32, f32)]) -> Vec<[usize; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    // Work on a counter-clockwise index loop so convexity tests agree.
    let mut indices: Vec<usize> = if signed_area(points) >= 0.0 {
        (0..n).collect()
    } else {
        (0..n).rev().collect()
    };

    let mut triangles = Vec::with_capacity(n - 2);
    while indices.len() > 3 {
        let m = indices.len();
        let mut clipped = false;
        for i in 0..m {
            let i_prev = indices[(i + m - 1) % m];
            let i_cur = indices[i];
            let i_next = indices[(i + 1) % m];
            let (a, b, c) = (points[i_prev], points[i_cur], points[i_next]);
            if cross(a, b, c) <= 0.0 {
                continue; // reflex vertex, not an ear
            }
            let blocked = indices.iter().any(|&j| {
                j != i_prev && j != i_cur && j != i_next && point_in_triangle(points[j], a, b, c)
            });
            if blocked {
                continue;
            }
            triangles.push([i_prev, i_cur, i_next]);
            indices.remove(i);
            clipped = true;
            break;
        }
        if !clipped {
            // Degenerate ring (self-intersection or collinear run):
            // fall back to a fan rather than looping forever.
            for w in 1..indices.len() - 1 {
                triangles.push([indices[0], indices[w], indices[w + 1]]);
            }
            return triangles;
        }
    }
    triangles.push([indices[0], indices[1], indices[2]]);
    triangles
}
