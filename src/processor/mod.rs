//! Main processing engine.
//!
//! Orchestrates a report run: discover and load calibration logs in
//! parallel, aggregate the rows, and write the report file.

pub mod discovery;
pub mod loader;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::{loader::CsvLoader, writer::ReportWriter};

use crate::config::ReportConfig;
use crate::error::Result;
use crate::models::RunSummary;
use crate::report;

use colored::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Load-aggregate-write pipeline for one data directory
#[derive(Debug)]
pub struct ReportProcessor {
    data_directory: PathBuf,
    loader: CsvLoader,
    writer: ReportWriter,
    quiet: bool,
}

impl ReportProcessor {
    /// Create a processor; fails if the data directory does not exist
    pub fn new(data_directory: PathBuf, report_directory: PathBuf) -> Result<Self> {
        let defaults = ReportConfig::default();
        let loader = CsvLoader::new(data_directory.clone())?
            .with_workers(defaults.workers)
            .with_progress(false);

        Ok(Self {
            data_directory,
            loader,
            writer: ReportWriter::new(report_directory)?,
            quiet: false,
        })
    }

    /// Build a processor from validated settings
    pub fn from_config(config: &ReportConfig) -> Result<Self> {
        config.validate()?;
        let data_directory = config.data_directory.clone().unwrap_or_default();
        let report_directory = config.report_directory.clone().unwrap_or_default();
        Ok(Self::new(data_directory, report_directory)?.with_config(config))
    }

    /// Apply worker and progress settings
    pub fn with_config(mut self, config: &ReportConfig) -> Self {
        self.loader = self
            .loader
            .with_workers(config.workers)
            .with_progress(config.show_progress);
        self
    }

    /// Suppress the console banner and summary
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Run the pipeline. A report is written even if no rows were found.
    pub async fn process(&self) -> Result<RunSummary> {
        let start_time = Instant::now();
        self.print_banner();

        let loaded = self.loader.load().await?;

        let summaries = report::summarize(&loaded.rows);
        let text = report::render(&summaries);
        let report_path = self.writer.write(&text).await?;

        let summary = RunSummary {
            report_path,
            groups: summaries.len(),
            load_stats: loaded.stats,
            processing_time_ms: start_time.elapsed().as_millis(),
        };

        info!(
            "Report with {} groups generated in {}ms",
            summary.groups, summary.processing_time_ms
        );
        self.print_summary(&summary);

        Ok(summary)
    }

    fn print_banner(&self) {
        if self.quiet {
            return;
        }
        println!("{}", "Generating calibration report".bright_green().bold());
        println!(
            "  {} {}",
            "Data:".bright_cyan(),
            self.data_directory.display()
        );
        println!(
            "  {} {}",
            "Reports:".bright_cyan(),
            self.writer.report_directory().display()
        );
    }

    fn print_summary(&self, summary: &RunSummary) {
        if self.quiet {
            return;
        }
        let stats = &summary.load_stats;

        println!("\n{}", "Report Summary".bright_green().bold());
        println!(
            "  {} {}ms",
            "Time elapsed:".bright_cyan(),
            summary.processing_time_ms.to_string().bright_white()
        );
        println!(
            "  {} {} of {}",
            "Files loaded:".bright_cyan(),
            stats.files_loaded.to_string().bright_white(),
            stats.files_found.to_string().bright_white()
        );
        if stats.files_failed > 0 {
            println!(
                "  {} {}",
                "Files failed:".bright_red(),
                stats.files_failed.to_string().bright_red().bold()
            );
        }
        if stats.files_without_table > 0 {
            println!(
                "  {} {}",
                "Files without table:".bright_yellow(),
                stats.files_without_table.to_string().bright_yellow()
            );
        }
        println!(
            "  {} {}",
            "Rows:".bright_cyan(),
            stats.rows_loaded.to_string().bright_white().bold()
        );
        println!(
            "  {} {}",
            "Groups:".bright_cyan(),
            summary.groups.to_string().bright_white().bold()
        );
        println!(
            "  {} {}",
            "Report:".bright_cyan(),
            summary.report_path.display().to_string().bright_white()
        );
    }
}

/// Load `data_directory`, aggregate, and write a report into `report_directory`
pub async fn generate_report(
    data_directory: PathBuf,
    report_directory: PathBuf,
) -> Result<RunSummary> {
    ReportProcessor::new(data_directory, report_directory)?
        .process()
        .await
}
