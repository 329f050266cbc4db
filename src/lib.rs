//! Calibration Report Library
//!
//! Post-processing for RF calibration test logs. Every `*.csv` file below a
//! data directory is scanned for the TX power table, which may sit among any
//! number of unrelated tables, and the measurements are summarised per
//! (band, PCL) group.
//!
//! This library provides tools for:
//! - Parsing and validating single table lines ([`parser::row`])
//! - Extracting the TX power table from mixed content ([`parser::table`])
//! - Loading whole directory trees in parallel with per-file failure isolation
//! - Aggregating low / in-range / high power averages and pass/fail counts
//! - Writing timestamped CSV reports
//!
//! ```no_run
//! # async fn example() -> calibration_report::Result<()> {
//! let summary = calibration_report::generate_report("logs".into(), "reports".into()).await?;
//! println!("{} groups written to {}", summary.groups, summary.report_path.display());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod parser;
pub mod processor;
pub mod report;

pub use config::ReportConfig;
pub use error::{ReportError, Result, RowError};
pub use models::{GroupSummary, LoadStats, Row, RowField, RunSummary};
pub use parser::{RowParse, RowParser, TableParser, TableState};
pub use processor::{ReportProcessor, generate_report};
