//! Report file output
//!
//! Writes rendered report text to a timestamped file, creating the report
//! directory when needed.

use crate::constants::{REPORT_DATE_FORMAT, REPORT_EXTENSION, REPORT_PREFIX};
use crate::error::{ReportError, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Writer for report files in one directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    report_directory: PathBuf,
}

impl ReportWriter {
    pub fn new(report_directory: PathBuf) -> Result<Self> {
        if report_directory.as_os_str().is_empty() {
            return Err(ReportError::InvalidReportDirectory {
                path: report_directory,
            });
        }
        Ok(Self { report_directory })
    }

    pub fn report_directory(&self) -> &Path {
        &self.report_directory
    }

    /// Full path of the report produced at `timestamp`
    pub fn report_path(&self, timestamp: DateTime<Local>) -> PathBuf {
        let name = format!(
            "{}{}.{}",
            REPORT_PREFIX,
            timestamp.format(REPORT_DATE_FORMAT),
            REPORT_EXTENSION
        );
        self.report_directory.join(name)
    }

    /// Write the report named after the current local time
    pub async fn write(&self, report: &str) -> Result<PathBuf> {
        self.write_at(report, Local::now()).await
    }

    /// Write the report named after `timestamp`
    pub async fn write_at(&self, report: &str, timestamp: DateTime<Local>) -> Result<PathBuf> {
        fs::create_dir_all(&self.report_directory).await?;

        let path = self.report_path(timestamp);
        fs::write(&path, report).await?;
        info!("Report written to {}", path.display());

        Ok(path)
    }
}
