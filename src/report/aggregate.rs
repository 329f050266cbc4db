//! Per (band, PCL) aggregation of measurement rows
//!
//! Rows are grouped by their composite key, each group is split into low,
//! in-range and high power bands using the row's own limits, and pass/fail
//! results are counted. Groups come out ordered by band, then PCL.

use std::collections::BTreeMap;
use tracing::debug;

use super::format::format_average;
use crate::constants::{REPORT_HEADER, REPORT_SEPARATOR};
use crate::error::{ReportError, Result};
use crate::models::{GroupSummary, Row};

/// Running mean over one power band
#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

#[derive(Debug, Default)]
struct GroupAccumulator {
    low: Mean,
    in_range: Mean,
    high: Mean,
    pass_count: usize,
    fail_count: usize,
}

impl GroupAccumulator {
    fn add(&mut self, row: &Row) {
        if row.is_low() {
            self.low.push(row.tx_power);
        } else if row.is_in_range() {
            self.in_range.push(row.tx_power);
        } else if row.is_high() {
            self.high.push(row.tx_power);
        }

        if row.is_passed {
            self.pass_count += 1;
        } else {
            self.fail_count += 1;
        }
    }

    fn into_summary(self, band: &str, pcl: i32) -> GroupSummary {
        // An empty band reports the measured power of an all-zero row.
        let placeholder = Row::default();
        GroupSummary {
            band: band.to_string(),
            pcl,
            avg_low_tx_power: self.low.value().unwrap_or(placeholder.tx_power),
            avg_in_range_tx_power: self.in_range.value().unwrap_or(placeholder.tx_power),
            avg_high_tx_power: self.high.value().unwrap_or(placeholder.tx_power),
            pass_count: self.pass_count,
            fail_count: self.fail_count,
        }
    }
}

/// Group rows and compute their statistics, ordered by band then PCL.
///
/// Bands compare by byte value, so `GSM850` sorts before `gsm850`.
pub fn summarize(rows: &[Row]) -> Vec<GroupSummary> {
    let mut groups: BTreeMap<(&str, i32), GroupAccumulator> = BTreeMap::new();
    for row in rows {
        groups
            .entry((row.band.as_str(), row.pcl))
            .or_default()
            .add(row);
    }

    debug!("Aggregated {} rows into {} groups", rows.len(), groups.len());

    groups
        .into_iter()
        .map(|((band, pcl), group)| group.into_summary(band, pcl))
        .collect()
}

/// Render summaries as report text: header line plus one line per group
pub fn render(summaries: &[GroupSummary]) -> String {
    let mut report = String::with_capacity(REPORT_HEADER.len() + 1 + summaries.len() * 48);
    report.push_str(REPORT_HEADER);
    report.push('\n');

    for summary in summaries {
        let fields = [
            summary.band.clone(),
            summary.pcl.to_string(),
            format_average(summary.avg_low_tx_power),
            format_average(summary.avg_in_range_tx_power),
            format_average(summary.avg_high_tx_power),
            summary.pass_count.to_string(),
            summary.fail_count.to_string(),
        ];
        report.push_str(&fields.join(REPORT_SEPARATOR));
        report.push('\n');
    }

    report
}

/// Aggregate a row collection into report text.
///
/// `None` means no collection was handed over and is an error; an empty
/// collection is valid and renders the header only.
pub fn aggregate(rows: Option<&[Row]>) -> Result<String> {
    let rows = rows.ok_or(ReportError::MissingRows)?;
    Ok(render(&summarize(rows)))
}
