// src/state/mod.rs
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};

use anyhow::Result;

use crate::data::Dataset;
use crate::file::{FileManager, Settings};
use crate::geo::WorldMap;

pub mod dashboard;
pub mod selection;

use dashboard::DashboardState;
use selection::Selection;

// Screen/tab tracking
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen {
    Explorer,
    Dashboard,
}

/// Scatterplot channel bindings, chosen via the dropdown controls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScatterChannels {
    pub x: String,
    pub y: String,
    pub size: String,
}

/// The world topology arrives from a background load with no ordering
/// guarantee relative to the first dataset load; the choropleth renders
/// whenever it shows up. A failed load is logged and the map panel
/// never renders.
#[derive(Debug)]
pub enum TopologyState {
    Pending(Receiver<Result<WorldMap>>),
    Ready(WorldMap),
    Failed,
}

// Core application state
#[derive(Debug)]
pub struct AppState {
    pub settings: Settings,
    pub file_manager: FileManager,

    // Dataset store: replaced wholesale on load, never patched.
    pub dataset: Option<Dataset>,
    pub dataset_path: Option<PathBuf>,
    pub dimensions: Vec<String>,

    pub selection: Selection,
    pub scatter: ScatterChannels,
    pub dashboard: DashboardState,
    pub topology: TopologyState,

    // Minimal UI state
    pub current_screen: Screen,
    pub error_message: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        let file_manager = FileManager::new();
        let settings = file_manager.load_settings();
        let topology =
            TopologyState::Pending(file_manager.spawn_topology_load(settings.topology_path.clone()));

        Self {
            settings,
            file_manager,
            dataset: None,
            dataset_path: None,
            dimensions: Vec::new(),
            selection: Selection::default(),
            scatter: ScatterChannels::default(),
            dashboard: DashboardState::default(),
            topology,
            current_screen: Screen::Explorer,
            error_message: None,
        }
    }

    /// Load a CSV file and swap it in as the shared dataset. Either the
    /// whole file parses or the previous dataset stays untouched.
    pub fn load_dataset(&mut self, path: PathBuf) -> Result<()> {
        let dataset = self.file_manager.load_dataset(&path)?;
        self.replace_dataset(dataset);
        if let Some(dir) = path.parent() {
            self.settings.last_data_dir = Some(dir.to_path_buf());
            if let Err(e) = self.file_manager.save_settings(&self.settings) {
                log::warn!("Could not save settings: {}", e);
            }
        }
        self.dataset_path = Some(path);
        Ok(())
    }

    fn replace_dataset(&mut self, dataset: Dataset) {
        // Stop the line-chart loop before resetting so a reload cannot
        // leave a stale animation running over the new data.
        self.dashboard.line_anim.stop();
        self.selection.clear();

        self.dimensions = dataset.dimensions(&[
            self.settings.id_column.as_str(),
            self.settings.category_column.as_str(),
        ]);

        let pick = |i: usize| -> String {
            self.dimensions
                .get(i)
                .or_else(|| self.dimensions.first())
                .cloned()
                .unwrap_or_default()
        };
        self.scatter = ScatterChannels { x: pick(0), y: pick(1), size: pick(2) };

        self.dashboard.reset_for(
            dataset.distinct_sorted(&self.settings.year_column),
            dataset.distinct_in_order(&self.settings.country_column),
        );

        self.dataset = Some(dataset);
    }

    /// Poll the background topology load. Called once per frame.
    pub fn poll_topology(&mut self) {
        let TopologyState::Pending(rx) = &self.topology else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(map)) => {
                log::info!("World topology loaded: {} countries", map.countries.len());
                self.topology = TopologyState::Ready(map);
            }
            Ok(Err(e)) => {
                log::error!("Error loading world topology: {:#}", e);
                self.topology = TopologyState::Failed;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                log::error!("Topology loader exited without a result");
                self.topology = TopologyState::Failed;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    // Built by hand so tests never touch the user's settings file or
    // spawn the topology loader.
    fn state_with(csv: &str) -> AppState {
        let mut state = AppState {
            settings: Settings::default(),
            file_manager: FileManager::new(),
            dataset: None,
            dataset_path: None,
            dimensions: Vec::new(),
            selection: Selection::default(),
            scatter: ScatterChannels::default(),
            dashboard: DashboardState::default(),
            topology: TopologyState::Failed,
            current_screen: Screen::Explorer,
            error_message: None,
        };
        let dataset = Dataset::from_reader(Cursor::new(csv.to_string())).unwrap();
        state.replace_dataset(dataset);
        state
    }

    #[test]
    fn replace_dataset_resets_dependent_state() {
        let mut state = state_with(
            "Id,a,b,c,species\n1,1.0,2.0,3.0,setosa\n2,4.0,5.0,6.0,virginica\n",
        );
        state.selection.toggle(0);
        assert_eq!(state.selection.len(), 1);

        let next = Dataset::from_reader(Cursor::new(
            "Id,x,y,species\n1,1,2,setosa\n".to_string(),
        ))
        .unwrap();
        state.replace_dataset(next);

        assert!(state.selection.is_empty());
        assert_eq!(state.dimensions, vec!["x".to_string(), "y".to_string()]);
        assert_eq!(state.scatter.x, "x");
        assert_eq!(state.scatter.y, "y");
        // Fewer than three dimensions: size falls back to the first.
        assert_eq!(state.scatter.size, "x");
    }

    #[test]
    fn dashboard_controls_follow_dataset_columns() {
        let state = state_with(
            "country_name,year,product,flow,value\nB,2022,oil,out,5\nA,2021,gas,in,3\n",
        );
        assert_eq!(state.dashboard.years, vec!["2021", "2022"]);
        assert_eq!(state.dashboard.selected_year.as_deref(), Some("2021"));
        assert_eq!(state.dashboard.bar_order, vec!["B", "A"]);
        assert!(state.dashboard.line_anim.is_running());
    }
}
