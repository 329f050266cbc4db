//! Integration tests for the processor module
//!
//! Runs the complete load-aggregate-write pipeline against temporary log trees.


use crate::constants::TABLE_HEADER;
use std::fs;
use std::path::Path;

/// Unrelated table that precedes the TX power table in real logs
pub const AGC_PREAMBLE: &str = "[AGC Calibration]
Band: (GSM850)
Arfcn, Gain offset, MAX, MIN, Check Result
140, 3.375, 8.500, -8.500, PASS
150, 3.375, 8.500, -8.500, PASS";

/// Write a calibration log with the AGC preamble, a TX power table holding
/// `rows`, and a trailing unrelated section
pub fn write_log(dir: &Path, name: &str, rows: &[&str]) {
    fs::create_dir_all(dir).unwrap();
    let mut content = format!("{AGC_PREAMBLE}\n\n[TX Power]\n{TABLE_HEADER}\n");
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    content.push_str("\n[RX Level]\nArfcn, Level, Check Result\n62, -60.1, PASS\n");
    fs::write(dir.join(name), content).unwrap();
}
