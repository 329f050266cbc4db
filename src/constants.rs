//! Application constants for the calibration report tool
//!
//! Table and report layouts, file naming and processing defaults.

// =============================================================================
// Input Table Layout
// =============================================================================

/// Exact header line introducing the TX power table
pub const TABLE_HEADER: &str =
    "Band, PCL, TX Power, Target Power, MIN Power, MAX Power, Check Result";

/// Number of comma separated columns in a data line
pub const COLUMN_COUNT: usize = 7;

/// Column separator in data lines
pub const COLUMN_SEPARATOR: char = ',';

/// Result tokens (compared case-insensitively)
pub const PASS_TOKEN: &str = "PASS";
pub const FAIL_TOKEN: &str = "FAIL";

/// File name pattern of calibration logs (matched case-insensitively)
pub const CSV_FILE_PATTERN: &str = "*.csv";

// =============================================================================
// Report Layout
// =============================================================================

/// First line of every generated report
pub const REPORT_HEADER: &str = "BAND,PCL,Average low TxPower,Average in range TxPower,Average high TxPower,PASS Count,FAIL Count";

/// Separator between values in report data lines
pub const REPORT_SEPARATOR: &str = ", ";

/// Maximum fractional digits printed for averages
pub const AVERAGE_FRACTION_DIGITS: usize = 7;

pub const REPORT_PREFIX: &str = "report-";
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d_%H%M%S";
pub const REPORT_EXTENSION: &str = "csv";

// =============================================================================
// Configuration Defaults
// =============================================================================

/// Settings file looked up in the working directory when none is given
pub const DEFAULT_SETTINGS_FILE: &str = "appsettings.json";

/// Upper bound for the worker count
pub const MAX_WORKERS: usize = 256;
