//! Report generation
//!
//! - [`aggregate`] groups rows and renders the report text
//! - [`format`] prints averages without depending on the platform locale

pub mod aggregate;
pub mod format;

pub use aggregate::{aggregate, render, summarize};
pub use format::format_average;
