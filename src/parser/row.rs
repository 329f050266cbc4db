//! Single data line parsing
//!
//! Turns one line of the TX power table into a validated [`Row`]. Pure
//! function of its input, no I/O.

use crate::constants::{COLUMN_COUNT, COLUMN_SEPARATOR, FAIL_TOKEN, PASS_TOKEN};
use crate::error::RowError;
use crate::models::{Row, RowField};

/// Parsing of a single table line
///
/// `try_parse` swallows the error and is what the table parser relies on to
/// keep malformed lines from aborting a whole file.
pub trait RowParse {
    fn parse(&self, line: &str) -> Result<Row, RowError>;

    fn try_parse(&self, line: &str) -> Option<Row> {
        self.parse(line).ok()
    }
}

/// Parser for `band, pcl, tx, target, min, max, result` lines
#[derive(Debug, Clone, Copy, Default)]
pub struct RowParser;

impl RowParser {
    pub fn new() -> Self {
        Self
    }
}

impl RowParse for RowParser {
    fn parse(&self, line: &str) -> Result<Row, RowError> {
        let columns: Vec<&str> = line.split(COLUMN_SEPARATOR).map(str::trim).collect();
        if columns.len() != COLUMN_COUNT {
            return Err(RowError::ColumnCount {
                expected: COLUMN_COUNT,
                found: columns.len(),
            });
        }

        Ok(Row {
            band: parse_band(columns[0])?,
            pcl: parse_pcl(columns[1])?,
            tx_power: parse_power(columns[2], RowField::TxPower)?,
            target_power: parse_power(columns[3], RowField::TargetPower)?,
            min_power: parse_power(columns[4], RowField::MinPower)?,
            max_power: parse_power(columns[5], RowField::MaxPower)?,
            is_passed: parse_check_result(columns[6])?,
        })
    }
}

fn parse_band(value: &str) -> Result<String, RowError> {
    if value.is_empty() {
        return Err(RowError::range(RowField::Band, value));
    }
    Ok(value.to_string())
}

fn parse_pcl(value: &str) -> Result<i32, RowError> {
    value
        .parse::<i32>()
        .map_err(|_| RowError::format(RowField::Pcl, value))
}

/// Locale-independent float parsing; `inf` and `NaN` are refused.
fn parse_power(value: &str, field: RowField) -> Result<f64, RowError> {
    match value.parse::<f64>() {
        Ok(power) if power.is_finite() => Ok(power),
        _ => Err(RowError::format(field, value)),
    }
}

fn parse_check_result(value: &str) -> Result<bool, RowError> {
    if value.eq_ignore_ascii_case(PASS_TOKEN) {
        Ok(true)
    } else if value.eq_ignore_ascii_case(FAIL_TOKEN) {
        Ok(false)
    } else {
        Err(RowError::range(RowField::IsPassed, value))
    }
}
