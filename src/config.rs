//! Configuration management and validation.
//!
//! Settings come from an optional JSON file (`appsettings.json` style, camel
//! case keys) and are then overridden by command line arguments.

use crate::constants::MAX_WORKERS;
use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings for a report run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportConfig {
    /// Root of the directory tree holding calibration logs
    pub data_directory: Option<PathBuf>,

    /// Directory receiving the generated report
    pub report_directory: Option<PathBuf>,

    /// Number of files loaded concurrently
    pub workers: usize,

    /// Show a progress bar while loading files
    pub show_progress: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            data_directory: None,
            report_directory: None,
            workers: num_cpus::get(),
            show_progress: true,
        }
    }
}

impl ReportConfig {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ReportError::configuration(format!(
                "Failed to read settings file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_json(&raw)?;
        debug!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Parse settings from JSON text
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn with_data_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_directory = Some(path.into());
        self
    }

    pub fn with_report_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_directory = Some(path.into());
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Check the settings are usable for a run
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(ReportError::configuration(
                "Number of workers must be greater than 0",
            ));
        }
        if self.workers > MAX_WORKERS {
            return Err(ReportError::configuration(format!(
                "Number of workers cannot exceed {}",
                MAX_WORKERS
            )));
        }

        match &self.data_directory {
            Some(path) if !path.as_os_str().is_empty() => {}
            _ => return Err(ReportError::configuration("Data directory is not set")),
        }

        match &self.report_directory {
            Some(path) if !path.as_os_str().is_empty() => Ok(()),
            Some(path) => Err(ReportError::InvalidReportDirectory { path: path.clone() }),
            None => Err(ReportError::configuration("Report directory is not set")),
        }
    }
}
