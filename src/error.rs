//! Error handling for calibration log processing.
//!
//! Two layers: [`RowError`] describes why a single data line was rejected and
//! never leaves the table parser, while [`ReportError`] covers failures of a
//! whole file or of the run itself.

use crate::models::RowField;
use std::path::PathBuf;
use thiserror::Error;

/// Rejection reasons for a single data line.
///
/// `ColumnCount` and `Format` are syntactic problems; `Range` means the field
/// parsed but its value is not allowed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("Invalid column count: expected {expected}, found {found}")]
    ColumnCount { expected: usize, found: usize },

    #[error("Invalid format for {field}: '{value}'")]
    Format { field: RowField, value: String },

    #[error("Value out of range for {field}: '{value}'")]
    Range { field: RowField, value: String },
}

impl RowError {
    pub fn format(field: RowField, value: impl Into<String>) -> Self {
        Self::Format {
            field,
            value: value.into(),
        }
    }

    pub fn range(field: RowField, value: impl Into<String>) -> Self {
        Self::Range {
            field,
            value: value.into(),
        }
    }

    /// The field the error is tied to, if any
    pub fn field(&self) -> Option<RowField> {
        match self {
            Self::ColumnCount { .. } => None,
            Self::Format { field, .. } | Self::Range { field, .. } => Some(*field),
        }
    }

    /// True for syntactic failures (wrong column count or unparsable number)
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::ColumnCount { .. } | Self::Format { .. })
    }

    /// True for values that parsed but violate a domain constraint
    pub fn is_range_error(&self) -> bool {
        matches!(self, Self::Range { .. })
    }
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data directory {path} does not exist")]
    DataDirectoryNotFound { path: PathBuf },

    #[error("Report directory is not valid: '{path}'")]
    InvalidReportDirectory { path: PathBuf },

    #[error("No row collection was provided to the report aggregator")]
    MissingRows,

    #[error("Failed to load file {path}: {reason}")]
    FileLoadFailed { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Worker task failed: {reason}")]
    TaskFailed { reason: String },
}

impl ReportError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
