//! Report configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Looked up in the working directory.
pub const CONFIG_FILE: &str = "chart_report.json";

pub const HISTORICAL_INPUT: &str = "historical_evolution.csv";
pub const HISTORICAL_OUTPUT: &str = "historical_evolution.png";
pub const MASS_INPUT: &str = "mass_distribution.csv";
pub const MASS_OUTPUT: &str = "mass_distribution.png";

/// Accepted resolutions; 1200 DPI already means a 16800 px wide figure.
pub const DPI_RANGE: std::ops::RangeInclusive<u32> = 1..=1200;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid config {}: dpi {dpi} is outside {}..={}", path.display(), DPI_RANGE.start(), DPI_RANGE.end())]
    Dpi { path: PathBuf, dpi: u32 },
}

/// Where tables are read from and images are written to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub dpi: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("assets"),
            dpi: 300,
        }
    }
}

impl ReportConfig {
    /// Read the config file if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if !DPI_RANGE.contains(&config.dpi) {
            return Err(ConfigError::Dpi {
                path: path.to_path_buf(),
                dpi: config.dpi,
            });
        }
        Ok(config)
    }

    pub fn historical_input(&self) -> PathBuf {
        self.data_dir.join(HISTORICAL_INPUT)
    }

    pub fn historical_output(&self) -> PathBuf {
        self.output_dir.join(HISTORICAL_OUTPUT)
    }

    pub fn mass_input(&self) -> PathBuf {
        self.data_dir.join(MASS_INPUT)
    }

    pub fn mass_output(&self) -> PathBuf {
        self.output_dir.join(MASS_OUTPUT)
    }
}
