//! Tracker configuration — default range, key-event markers, dataset source.
//!
//! Configuration is fixed for the life of a session: loaded once (TOML file
//! or built-in defaults) and read everywhere else. The built-in defaults
//! reproduce the published tracker's range and milestone set.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DateRange, KeyEventMarker};

/// Published location of the dataset CSV.
pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/johnmrudolph/dash_covid_load_tracker/master/database_upload_2021_04_07.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Range aggregated when no selection event is active.
    pub default_range: DateRange,

    /// Milestones annotated on the daily error chart when in range.
    #[serde(default)]
    pub markers: Vec<KeyEventMarker>,

    #[serde(default)]
    pub dataset: DatasetConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// URL the `fetch` command downloads from. Absent means fetch requires an
    /// explicit URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date");
        let end = NaiveDate::from_ymd_opt(2020, 5, 1).expect("valid date");
        Self {
            default_range: DateRange::new(start, end).expect("default range is ordered"),
            markers: vec![
                KeyEventMarker {
                    date: NaiveDate::from_ymd_opt(2020, 1, 21).expect("valid date"),
                    vertical_offset: 0.005,
                    arrow_dx: 20.0,
                    arrow_dy: -65.0,
                    label: "First US COVID Case".into(),
                },
                KeyEventMarker {
                    date: NaiveDate::from_ymd_opt(2020, 3, 23).expect("valid date"),
                    vertical_offset: -0.005,
                    arrow_dx: -30.0,
                    arrow_dy: 60.0,
                    label: "Washington Stay at Home Order".into(),
                },
            ],
            dataset: DatasetConfig {
                url: Some(DEFAULT_DATASET_URL.into()),
            },
        }
    }
}

impl TrackerConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
