//! Core data structures for calibration log processing.
//!
//! Defines the measurement row, the per-group report summary and the
//! statistics collected while loading files and producing a report.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// One validated TX power measurement
///
/// `Default` yields the all-zero row whose measured power stands in for the
/// average of an empty power band in the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Row {
    pub band: String,
    pub pcl: i32,
    pub tx_power: f64,
    pub target_power: f64,
    pub min_power: f64,
    pub max_power: f64,
    pub is_passed: bool,
}

impl Row {
    /// Measured power is below the row's own minimum
    pub fn is_low(&self) -> bool {
        self.tx_power < self.min_power
    }

    /// Measured power lies strictly between minimum and maximum
    pub fn is_in_range(&self) -> bool {
        self.tx_power > self.min_power && self.tx_power < self.max_power
    }

    /// Measured power is above the row's own maximum
    pub fn is_high(&self) -> bool {
        self.tx_power > self.max_power
    }
}

/// Columns of the measurement table, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowField {
    Band,
    Pcl,
    TxPower,
    TargetPower,
    MinPower,
    MaxPower,
    IsPassed,
}

impl RowField {
    pub const ALL: [RowField; 7] = [
        RowField::Band,
        RowField::Pcl,
        RowField::TxPower,
        RowField::TargetPower,
        RowField::MinPower,
        RowField::MaxPower,
        RowField::IsPassed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RowField::Band => "Band",
            RowField::Pcl => "Pcl",
            RowField::TxPower => "TxPower",
            RowField::TargetPower => "TargetPower",
            RowField::MinPower => "MinPower",
            RowField::MaxPower => "MaxPower",
            RowField::IsPassed => "IsPassed",
        }
    }
}

impl fmt::Display for RowField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Aggregated statistics for one (band, PCL) group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub band: String,
    pub pcl: i32,
    pub avg_low_tx_power: f64,
    pub avg_in_range_tx_power: f64,
    pub avg_high_tx_power: f64,
    pub pass_count: usize,
    pub fail_count: usize,
}

/// Statistics for a directory load
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadStats {
    pub files_found: usize,
    pub files_loaded: usize,
    pub files_failed: usize,
    /// Files read successfully that never contained the table header
    pub files_without_table: usize,
    pub rows_loaded: usize,
    pub lines_rejected: usize,
}

/// Outcome of a complete load-aggregate-write run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub report_path: PathBuf,
    pub groups: usize,
    pub load_stats: LoadStats,
    pub processing_time_ms: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(tx: f64, min: f64, max: f64) -> Row {
        Row {
            band: "GSM850".to_string(),
            pcl: 5,
            tx_power: tx,
            target_power: 32.5,
            min_power: min,
            max_power: max,
            is_passed: true,
        }
    }

    #[test]
    fn test_power_bands_are_strict() {
        assert!(row(31.0, 32.0, 33.0).is_low());
        assert!(row(32.5, 32.0, 33.0).is_in_range());
        assert!(row(34.0, 32.0, 33.0).is_high());

        let on_min = row(32.0, 32.0, 33.0);
        assert!(!on_min.is_low() && !on_min.is_in_range() && !on_min.is_high());

        let on_max = row(33.0, 32.0, 33.0);
        assert!(!on_max.is_low() && !on_max.is_in_range() && !on_max.is_high());
    }

    #[test]
    fn test_default_row_is_zeroed() {
        let empty = Row::default();
        assert_eq!(empty.tx_power, 0.0);
        assert!(empty.band.is_empty());
        assert!(!empty.is_passed);
    }

    #[test]
    fn test_row_serializes_with_field_names() {
        let json = serde_json::to_value(row(32.51429, 32.0, 33.0)).unwrap();
        assert_eq!(json["band"], "GSM850");
        assert_eq!(json["pcl"], 5);
        assert_eq!(json["tx_power"], 32.51429);
        assert_eq!(json["is_passed"], true);
    }

    #[test]
    fn test_field_names() {
        assert_eq!(RowField::ALL.len(), 7);
        assert_eq!(RowField::Pcl.to_string(), "Pcl");
        assert_eq!(RowField::IsPassed.to_string(), "IsPassed");
    }
}
