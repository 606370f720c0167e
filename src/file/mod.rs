// src/file/mod.rs
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::Dataset;
use crate::geo::WorldMap;

/// Persisted application settings: the reserved column names the charts
/// key on, the topology location, and the last browsed data directory.
/// Stored as RON under the user config directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub id_column: String,
    pub category_column: String,
    pub country_column: String,
    pub product_column: String,
    pub flow_column: String,
    pub year_column: String,
    pub value_column: String,
    pub topology_path: PathBuf,
    pub last_data_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            id_column: "Id".to_string(),
            category_column: "species".to_string(),
            country_column: "country_name".to_string(),
            product_column: "product".to_string(),
            flow_column: "flow".to_string(),
            year_column: "year".to_string(),
            value_column: "value".to_string(),
            topology_path: PathBuf::from("countries.geojson"),
            last_data_dir: None,
        }
    }
}

#[derive(Debug)]
pub struct FileManager {
    settings_path: Option<PathBuf>,
}

impl FileManager {
    pub fn new() -> Self {
        Self {
            settings_path: dirs::config_dir().map(|d| d.join("facet").join("settings.ron")),
        }
    }

    /// Load settings, falling back to defaults when the file is absent
    /// or unreadable. A corrupt file is logged, not fatal.
    pub fn load_settings(&self) -> Settings {
        let Some(path) = &self.settings_path else {
            return Settings::default();
        };
        if !path.exists() {
            return Settings::default();
        }
        match fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|content| ron::from_str(&content).context("Failed to parse settings file"))
        {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring settings at {}: {:#}", path.display(), e);
                Settings::default()
            }
        }
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        let path = self
            .settings_path
            .as_ref()
            .context("No config directory available")?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = ron::ser::to_string_pretty(
            settings,
            ron::ser::PrettyConfig::new().new_line("\n".to_string()),
        )?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn load_dataset(&self, path: &Path) -> Result<Dataset> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open dataset: {}", path.display()))?;
        Dataset::from_reader(file)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))
    }

    /// Kick off the topology load on a background thread. The result
    /// arrives over the returned channel; there is deliberately no
    /// ordering guarantee relative to dataset loads.
    pub fn spawn_topology_load(&self, path: PathBuf) -> Receiver<Result<WorldMap>> {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = load_topology(&path);
            // The receiver may be gone if the app shut down already.
            let _ = tx.send(result);
        });
        rx
    }
}

fn load_topology(path: &Path) -> Result<WorldMap> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read topology: {}", path.display()))?;
    WorldMap::from_geojson_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip_through_ron() {
        let settings = Settings {
            last_data_dir: Some(PathBuf::from("/tmp/datasets")),
            ..Settings::default()
        };
        let text = ron::ser::to_string_pretty(&settings, ron::ser::PrettyConfig::new()).unwrap();
        let parsed: Settings = ron::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn missing_settings_fields_fall_back_to_defaults() {
        let parsed: Settings = ron::from_str("(year_column: \"Year\")").unwrap();
        assert_eq!(parsed.year_column, "Year");
        assert_eq!(parsed.value_column, "value");
        assert_eq!(parsed.topology_path, PathBuf::from("countries.geojson"));
    }

    #[test]
    fn topology_load_failure_is_reported_on_the_channel() {
        let manager = FileManager::new();
        let rx = manager.spawn_topology_load(PathBuf::from("/nonexistent/topology.geojson"));
        let result = rx.recv().unwrap();
        assert!(result.is_err());
    }
}
