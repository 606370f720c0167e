// src/state/dashboard.rs
use std::time::{Duration, Instant};

const MIN_ZOOM: f32 = 1.0;
const MAX_ZOOM: f32 = 8.0;

pub const LINE_TICK: Duration = Duration::from_millis(1500);
pub const LINE_DRAW: Duration = Duration::from_millis(1000);

/// Shared dashboard controls plus the cross-chart mediation fields.
/// A bar-chart click writes `donut_country` and `highlighted_country`;
/// the donut and the choropleth only ever read them.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub years: Vec<String>,
    pub selected_year: Option<String>,

    pub donut_country: Option<String>,
    pub highlighted_country: Option<String>,
    pub donut_sweep: Option<DonutSweep>,

    pub bar_order: Vec<String>,
    pub bar_zoom: BandZoom,
    pub bar_drag: Option<String>,

    pub map_zoom: MapZoom,
    pub line_anim: LineAnimation,
}

impl DashboardState {
    /// Rebuild the controls for a freshly loaded dataset: years sorted
    /// for the radio row, countries in encounter order for the band
    /// axis, everything else back to its initial state.
    pub fn reset_for(&mut self, years: Vec<String>, countries: Vec<String>) {
        self.selected_year = years.first().cloned();
        self.years = years;
        self.donut_country = None;
        self.highlighted_country = None;
        self.donut_sweep = None;
        self.bar_order = countries;
        self.bar_zoom = BandZoom::default();
        self.bar_drag = None;
        self.map_zoom = MapZoom::default();
        self.line_anim.start();
    }

    /// Switching years drops the country filter pushed by the bar
    /// chart; the donut falls back to the year-wide counts.
    pub fn select_year(&mut self, year: String) {
        self.selected_year = Some(year);
        self.donut_country = None;
    }
}

/// Key and start time of the donut's entry sweep. A new key restarts
/// the sweep from angle zero.
#[derive(Debug)]
pub struct DonutSweep {
    pub key: (String, Option<String>),
    pub started: Instant,
}

/// One-dimensional zoom/pan over the bar chart's band axis:
/// `screen = x * scale + offset`, clamped so the bands never detach
/// from the plot edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandZoom {
    pub scale: f32,
    pub offset: f32,
}

impl Default for BandZoom {
    fn default() -> Self {
        Self { scale: 1.0, offset: 0.0 }
    }
}

impl BandZoom {
    pub fn apply(&self, x: f32) -> f32 {
        x * self.scale + self.offset
    }

    /// Rescale about an axis-relative pointer position so the band
    /// under the cursor stays put.
    pub fn zoom_at(&mut self, factor: f32, pointer_x: f32, width: f32) {
        let scale = (self.scale * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let applied = scale / self.scale;
        self.offset = pointer_x - (pointer_x - self.offset) * applied;
        self.scale = scale;
        self.clamp_to(width);
    }

    pub fn pan(&mut self, dx: f32, width: f32) {
        self.offset += dx;
        self.clamp_to(width);
    }

    fn clamp_to(&mut self, width: f32) {
        let min_offset = width - width * self.scale;
        self.offset = self.offset.clamp(min_offset.min(0.0), 0.0);
    }
}

/// Two-dimensional equivalent for the choropleth panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapZoom {
    pub scale: f32,
    pub pan: (f32, f32),
}

impl Default for MapZoom {
    fn default() -> Self {
        Self { scale: 1.0, pan: (0.0, 0.0) }
    }
}

impl MapZoom {
    pub fn zoom_at(&mut self, factor: f32, pointer: (f32, f32), viewport: (f32, f32)) {
        let scale = (self.scale * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let applied = scale / self.scale;
        self.pan.0 = pointer.0 - (pointer.0 - self.pan.0) * applied;
        self.pan.1 = pointer.1 - (pointer.1 - self.pan.1) * applied;
        self.scale = scale;
        self.clamp_to(viewport);
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32, viewport: (f32, f32)) {
        self.pan.0 += dx;
        self.pan.1 += dy;
        self.clamp_to(viewport);
    }

    fn clamp_to(&mut self, viewport: (f32, f32)) {
        let min_x = viewport.0 - viewport.0 * self.scale;
        let min_y = viewport.1 - viewport.1 * self.scale;
        self.pan.0 = self.pan.0.clamp(min_x.min(0.0), 0.0);
        self.pan.1 = self.pan.1.clamp(min_y.min(0.0), 0.0);
    }
}

/// How much of one series the line chart should draw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeriesReveal {
    Hidden,
    Partial(f32),
    Full,
}

/// Snapshot of the animation for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFrame {
    pub revealed: usize,
    pub current: Option<(usize, f32)>,
}

impl LineFrame {
    pub fn reveal(&self, index: usize) -> SeriesReveal {
        match self.current {
            Some((i, t)) if i == index => {
                if t >= 1.0 {
                    SeriesReveal::Full
                } else {
                    SeriesReveal::Partial(t)
                }
            }
            _ if index < self.revealed => SeriesReveal::Full,
            _ => SeriesReveal::Hidden,
        }
    }
}

/// Round-robin series animation for the line chart: every tick the
/// next series starts a one-second draw, and the loop keeps cycling
/// over already-revealed series until stopped. Stopped, the chart
/// shows every series in full.
#[derive(Debug, Default)]
pub struct LineAnimation {
    running: bool,
    current: usize,
    revealed: usize,
    phase_start: Option<Instant>,
}

impl LineAnimation {
    pub fn start(&mut self) {
        self.running = true;
        self.current = 0;
        self.revealed = 0;
        self.phase_start = None;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.phase_start = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance the clock to `now` and report what to draw for `n`
    /// series. Catch-up is bounded so a long pause between frames
    /// cannot spin the loop.
    pub fn frame(&mut self, now: Instant, n: usize) -> LineFrame {
        if !self.running || n == 0 {
            return LineFrame { revealed: n, current: None };
        }

        let start = *self.phase_start.get_or_insert(now);
        let mut elapsed = now.saturating_duration_since(start);
        let mut ticks = 0;
        while elapsed >= LINE_TICK && ticks < n {
            self.revealed = (self.revealed + 1).min(n);
            self.current = (self.current + 1) % n;
            elapsed -= LINE_TICK;
            ticks += 1;
        }
        if ticks > 0 {
            self.phase_start = Some(now - elapsed);
        }

        let t = (elapsed.as_secs_f32() / LINE_DRAW.as_secs_f32()).min(1.0);
        LineFrame { revealed: self.revealed, current: Some((self.current, t)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_zoom_is_identity_by_default() {
        let zoom = BandZoom::default();
        assert_eq!(zoom.apply(37.5), 37.5);
    }

    #[test]
    fn band_zoom_keeps_the_pointer_fixed() {
        let mut zoom = BandZoom::default();
        zoom.zoom_at(2.0, 100.0, 400.0);
        assert_eq!(zoom.scale, 2.0);
        // The axis point that sat under the pointer has not moved.
        assert!((zoom.apply(100.0) - 100.0).abs() < 1e-3);
    }

    #[test]
    fn band_zoom_clamps_scale_and_translate() {
        let mut zoom = BandZoom::default();
        zoom.zoom_at(0.1, 50.0, 400.0);
        assert_eq!(zoom.scale, MIN_ZOOM);
        assert_eq!(zoom.offset, 0.0);

        zoom.zoom_at(1e6, 0.0, 400.0);
        assert_eq!(zoom.scale, MAX_ZOOM);

        zoom.pan(-1e9, 400.0);
        assert_eq!(zoom.offset, 400.0 - 400.0 * MAX_ZOOM);
        zoom.pan(1e9, 400.0);
        assert_eq!(zoom.offset, 0.0);
    }

    #[test]
    fn map_zoom_clamps_pan_to_viewport() {
        let mut zoom = MapZoom::default();
        zoom.zoom_at(4.0, (0.0, 0.0), (200.0, 100.0));
        assert_eq!(zoom.scale, 4.0);

        zoom.pan_by(-1e9, -1e9, (200.0, 100.0));
        assert_eq!(zoom.pan, (200.0 - 800.0, 100.0 - 400.0));

        zoom.pan_by(1e9, 1e9, (200.0, 100.0));
        assert_eq!(zoom.pan, (0.0, 0.0));
    }

    #[test]
    fn select_year_drops_the_country_filter() {
        let mut dash = DashboardState::default();
        dash.reset_for(vec!["2020".into(), "2021".into()], vec!["A".into()]);
        dash.donut_country = Some("A".into());
        dash.highlighted_country = Some("A".into());

        dash.select_year("2021".into());
        assert_eq!(dash.selected_year.as_deref(), Some("2021"));
        assert_eq!(dash.donut_country, None);
        // The map highlight survives a year change.
        assert_eq!(dash.highlighted_country.as_deref(), Some("A"));
    }

    #[test]
    fn animation_reveals_series_one_tick_at_a_time() {
        let mut anim = LineAnimation::default();
        anim.start();
        let t0 = Instant::now();

        let frame = anim.frame(t0, 3);
        assert_eq!(frame.revealed, 0);
        assert_eq!(frame.reveal(0), SeriesReveal::Partial(0.0));
        assert_eq!(frame.reveal(1), SeriesReveal::Hidden);

        let frame = anim.frame(t0 + Duration::from_millis(500), 3);
        assert_eq!(frame.reveal(0), SeriesReveal::Partial(0.5));

        let frame = anim.frame(t0 + Duration::from_millis(1600), 3);
        assert_eq!(frame.revealed, 1);
        assert_eq!(frame.reveal(0), SeriesReveal::Full);
        assert!(matches!(frame.reveal(1), SeriesReveal::Partial(_)));
        assert_eq!(frame.reveal(2), SeriesReveal::Hidden);
    }

    #[test]
    fn animation_cycles_after_full_reveal() {
        let mut anim = LineAnimation::default();
        anim.start();
        let t0 = Instant::now();
        anim.frame(t0, 2);

        let frame = anim.frame(t0 + LINE_TICK * 3, 2);
        assert_eq!(frame.revealed, 2);
        // Round-robin: the draw cursor keeps moving over revealed series.
        assert!(frame.current.is_some());
        assert_eq!(frame.reveal(0), SeriesReveal::Full);
    }

    #[test]
    fn stopped_animation_shows_everything() {
        let mut anim = LineAnimation::default();
        anim.start();
        anim.stop();
        let frame = anim.frame(Instant::now(), 4);
        assert_eq!(frame.revealed, 4);
        assert_eq!(frame.current, None);
        assert_eq!(frame.reveal(3), SeriesReveal::Full);
    }
}
