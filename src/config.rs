//! Application settings, persisted between runs through eframe storage.
//!
//! Only the data source and export options are stored; dashboard selections
//! always start from their defaults.

use crate::data::{DataSource, DEFAULT_TREES_URL};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage key for [`Settings`].
pub const SETTINGS_KEY: &str = "canopy_settings";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// URL or local path of the tree CSV
    pub data_source: String,
    /// Directory the chart PNGs and summaries are written to
    pub output_dir: PathBuf,
    pub export_width: u32,
    pub export_height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_source: DEFAULT_TREES_URL.to_string(),
            output_dir: PathBuf::from("canopy_charts"),
            export_width: 1400,
            export_height: 1000,
        }
    }
}

impl Settings {
    pub fn source(&self) -> DataSource {
        DataSource::parse(&self.data_source)
    }

    pub fn load(storage: Option<&dyn eframe::Storage>) -> Self {
        storage
            .and_then(|s| eframe::get_value(s, SETTINGS_KEY))
            .unwrap_or_default()
    }

    pub fn save(&self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, SETTINGS_KEY, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_source_is_remote() {
        let settings = Settings::default();
        assert_eq!(
            settings.source(),
            DataSource::Url(DEFAULT_TREES_URL.to_string())
        );
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"data_source": "trees.csv"}"#).unwrap();
        assert_eq!(settings.source(), DataSource::File(PathBuf::from("trees.csv")));
        assert_eq!(settings.export_width, 1400);
        assert_eq!(settings.output_dir, PathBuf::from("canopy_charts"));
    }
}
