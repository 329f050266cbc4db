//! Command-line interface components.

use crate::config::ReportConfig;
use crate::constants::DEFAULT_SETTINGS_FILE;
use crate::error::Result;
use crate::models::RunSummary;
use crate::processor::ReportProcessor;

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "calreport")]
#[command(about = "Aggregate TX power calibration logs into a per band/PCL CSV report")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Directory tree containing the calibration CSV logs (overrides the settings file)
    #[arg(value_name = "DATA_DIRECTORY")]
    pub data_directory: Option<PathBuf>,

    /// Directory receiving the generated report (overrides the settings file)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// JSON settings file (defaults to ./appsettings.json when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of files loaded concurrently
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only report errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Log level implied by the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Resolve settings: file first, then command line overrides
    pub fn resolve_config(&self) -> Result<ReportConfig> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::load(path)?,
            None => {
                let default_path = Path::new(DEFAULT_SETTINGS_FILE);
                if default_path.is_file() {
                    ReportConfig::load(default_path)?
                } else {
                    ReportConfig::default()
                }
            }
        };

        if let Some(data_directory) = &self.data_directory {
            config = config.with_data_directory(data_directory);
        }
        if let Some(output) = &self.output {
            config = config.with_report_directory(output);
        }
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if self.no_progress || self.quiet {
            config = config.with_progress(false);
        }

        config.validate()?;
        debug!("Resolved configuration: {:?}", config);
        Ok(config)
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("calibration_report={}", log_level)));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();

    if result.is_ok() {
        debug!("Logging initialized at level: {}", log_level);
    }
}

/// Run a report from parsed command line arguments
pub async fn run(args: Args) -> Result<RunSummary> {
    let config = args.resolve_config()?;
    ReportProcessor::from_config(&config)?
        .with_quiet(args.quiet)
        .process()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_parse_arguments() {
        let args = Args::parse_from(["calreport", "logs", "-o", "out", "-j", "3", "--no-progress"]);
        assert_eq!(args.data_directory, Some(PathBuf::from("logs")));
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert_eq!(args.workers, Some(3));
        assert!(args.no_progress);
        assert_eq!(args.log_level(), "info");
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Args::try_parse_from(["calreport", "-v", "-q"]).is_err());
        assert_eq!(Args::parse_from(["calreport", "-v"]).log_level(), "debug");
        assert_eq!(Args::parse_from(["calreport", "-q"]).log_level(), "error");
    }

    #[test]
    fn test_command_line_overrides_settings_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{ "dataDirectory": "from-file", "reportDirectory": "reports", "workers": 2 }}"#
        )
        .unwrap();

        let data = temp_dir.path().to_string_lossy().to_string();
        let settings = file.path().to_string_lossy().to_string();
        let args = Args::parse_from(["calreport", data.as_str(), "-c", settings.as_str()]);
        let config = args.resolve_config().unwrap();

        assert_eq!(config.data_directory, Some(temp_dir.path().to_path_buf()));
        assert_eq!(config.report_directory, Some(PathBuf::from("reports")));
        assert_eq!(config.workers, 2);
    }

    #[test]
    fn test_missing_settings_file() {
        let args = Args::parse_from(["calreport", "-c", "/no/such/settings.json"]);
        assert!(matches!(
            args.resolve_config(),
            Err(ReportError::Configuration { .. })
        ));
    }
}
