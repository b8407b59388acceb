//! Configuration Module
//! Dashboard settings read from a JSON file. Every field is optional.

use crate::charts::DEFAULT_HISTOGRAM_BINS;
use crate::data::ColumnSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "HR_DASHBOARD_CONFIG";

/// Config file looked up in the working directory when the variable is unset.
pub const DEFAULT_CONFIG_FILE: &str = "hr_dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub csv_file_name: String,
    pub xlsx_file_name: String,
    pub sheet_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            csv_file_name: "funcionarios.csv".to_string(),
            xlsx_file_name: "funcionarios.xlsx".to_string(),
            sheet_name: "Filtered".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Spreadsheet loaded at startup and prefilled in the path field.
    pub default_excel_path: PathBuf,
    pub columns: ColumnSchema,
    pub export: ExportSettings,
    pub histogram_bins: usize,
    /// Open an exported file with the system default application.
    pub open_after_export: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_excel_path: PathBuf::from("BaseFuncionarios.xlsx"),
            columns: ColumnSchema::default(),
            export: ExportSettings::default(),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            open_after_export: false,
        }
    }
}

impl DashboardConfig {
    /// Read the config named by `HR_DASHBOARD_CONFIG`, else `hr_dashboard.json`
    /// if present, else fall back to defaults.
    pub fn discover() -> Result<Self, ConfigError> {
        match Self::resolve_path(std::env::var(CONFIG_ENV_VAR).ok(), Path::new(".")) {
            Some(path) => Self::load(&path),
            None => {
                tracing::info!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&content)?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(content)?;
        config.histogram_bins = config.histogram_bins.max(1);
        Ok(config)
    }

    /// An explicit path always wins, even when it does not exist.
    fn resolve_path(explicit: Option<String>, working_dir: &Path) -> Option<PathBuf> {
        if let Some(path) = explicit.filter(|p| !p.trim().is_empty()) {
            return Some(PathBuf::from(path));
        }
        let local = working_dir.join(DEFAULT_CONFIG_FILE);
        local.exists().then_some(local)
    }
}
