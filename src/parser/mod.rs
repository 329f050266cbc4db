//! Calibration log parsing.
//!
//! - [`row`] turns one data line into a validated [`Row`](crate::models::Row)
//! - [`table`] locates the TX power table inside a file and collects its rows

pub mod row;
pub mod table;

pub use row::{RowParse, RowParser};
pub use table::{TableParse, TableParser, TableState, TableStats};
