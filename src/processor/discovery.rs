//! File discovery for calibration log directories
//!
//! Walks the data directory recursively and collects every file whose name
//! matches `*.csv`, ignoring case.

use crate::constants::CSV_FILE_PATTERN;
use crate::error::{ReportError, Result};
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// File discovery component for calibration log trees
#[derive(Debug)]
pub struct FileDiscovery {
    root: PathBuf,
    pattern: Pattern,
    file_count: usize,
}

impl FileDiscovery {
    /// Create a discovery instance for `root`
    pub fn new(root: PathBuf) -> Result<Self> {
        let pattern = Pattern::new(CSV_FILE_PATTERN).map_err(|e| {
            ReportError::configuration(format!("Invalid file pattern {}: {}", CSV_FILE_PATTERN, e))
        })?;

        Ok(Self {
            root,
            pattern,
            file_count: 0,
        })
    }

    /// Number of files found by the last discovery
    pub fn file_count(&self) -> usize {
        self.file_count
    }

    /// Discover all matching files below the root, sorted by path.
    ///
    /// Entries that cannot be read are logged and skipped.
    pub fn discover_csv_files(&mut self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(ReportError::DataDirectoryNotFound {
                path: self.root.clone(),
            });
        }

        debug!("Searching for CSV files in: {}", self.root.display());

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_file() && self.matches(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        self.file_count = files.len();
        debug!("Found {} CSV files", self.file_count);

        Ok(files)
    }

    fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| {
                self.pattern
                    .matches_with(&name.to_string_lossy(), MATCH_OPTIONS)
            })
    }
}
