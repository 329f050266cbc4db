//! Parallel loading of calibration logs
//!
//! Every discovered file is parsed on the blocking pool by its own
//! [`TableParser`]. Each task hands back its rows or its error; failed files
//! are logged and contribute nothing, the rest are merged by the caller.

use crate::error::{ReportError, Result};
use crate::models::{LoadStats, Row};
use crate::parser::{TableParse, TableParser};
use crate::processor::discovery::FileDiscovery;

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task;
use tracing::{debug, error, info, warn};

/// Rows from every successfully loaded file
#[derive(Debug, Default)]
pub struct LoadResult {
    pub rows: Vec<Row>,
    pub stats: LoadStats,
}

/// Result of loading a single file
#[derive(Debug)]
struct FileOutcome {
    path: PathBuf,
    result: Result<TableParse>,
}

/// Loader for a directory tree of calibration logs
#[derive(Debug)]
pub struct CsvLoader {
    data_directory: PathBuf,
    workers: usize,
    show_progress: bool,
}

impl CsvLoader {
    /// Create a loader, failing if the data directory does not exist
    pub fn new(data_directory: PathBuf) -> Result<Self> {
        if !data_directory.is_dir() {
            return Err(ReportError::DataDirectoryNotFound {
                path: data_directory,
            });
        }

        Ok(Self {
            data_directory,
            workers: num_cpus::get(),
            show_progress: false,
        })
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Load rows from every CSV file below the data directory
    pub async fn load(&self) -> Result<LoadResult> {
        let mut discovery = FileDiscovery::new(self.data_directory.clone())?;
        let files = task::spawn_blocking(move || discovery.discover_csv_files())
            .await
            .map_err(|e| ReportError::TaskFailed {
                reason: format!("File discovery task failed: {}", e),
            })??;

        info!(
            "Loading {} files from {} with {} workers",
            files.len(),
            self.data_directory.display(),
            self.workers
        );

        let progress = self.progress_bar(files.len());
        let files_found = files.len();

        let outcomes: Vec<FileOutcome> = stream::iter(files)
            .map(|path| {
                let progress = progress.clone();
                async move {
                    let task_path = path.clone();
                    let result = task::spawn_blocking(move || load_file(&task_path))
                        .await
                        .unwrap_or_else(|e| {
                            Err(ReportError::TaskFailed {
                                reason: e.to_string(),
                            })
                        });
                    if let Some(pb) = &progress {
                        pb.inc(1);
                    }
                    FileOutcome { path, result }
                }
            })
            .buffer_unordered(self.workers)
            .collect()
            .await;

        if let Some(pb) = &progress {
            pb.finish_with_message("All files loaded");
        }

        let result = merge_outcomes(files_found, outcomes);
        info!(
            "Loaded {} rows from {} files ({} failed)",
            result.stats.rows_loaded, result.stats.files_loaded, result.stats.files_failed
        );

        Ok(result)
    }

    fn progress_bar(&self, len: usize) -> Option<ProgressBar> {
        if !self.show_progress || len == 0 {
            return None;
        }

        let pb = ProgressBar::new(len as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb.set_message("Loading calibration logs...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

/// Parse one file with a fresh table parser
pub fn load_file(path: &Path) -> Result<TableParse> {
    let file = File::open(path).map_err(|e| ReportError::FileLoadFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    TableParser::new()
        .parse_reader(BufReader::new(file))
        .map_err(|e| ReportError::FileLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Merge per-file outcomes into one row collection, logging failures
fn merge_outcomes(files_found: usize, outcomes: Vec<FileOutcome>) -> LoadResult {
    let mut result = LoadResult {
        rows: Vec::new(),
        stats: LoadStats {
            files_found,
            ..LoadStats::default()
        },
    };

    for outcome in outcomes {
        match outcome.result {
            Ok(parsed) => {
                let stats = &mut result.stats;
                stats.files_loaded += 1;
                stats.rows_loaded += parsed.rows.len();
                stats.lines_rejected += parsed.stats.lines_rejected;
                if parsed.stats.tables_found == 0 {
                    stats.files_without_table += 1;
                    warn!("No TX power table in {}", outcome.path.display());
                } else {
                    debug!(
                        "Loaded {} rows from {}",
                        parsed.rows.len(),
                        outcome.path.display()
                    );
                }
                result.rows.extend(parsed.rows);
            }
            Err(e) => {
                result.stats.files_failed += 1;
                error!("Failed to load a file {}: {}", outcome.path.display(), e);
            }
        }
    }

    result
}
