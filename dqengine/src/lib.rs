//! Library module for the dqengine command-line tool.
//!
//! The binary in `main.rs` is a thin wrapper: argument definitions, file
//! loading, alert persistence and report rendering live here so they can be
//! exercised by the integration tests.

pub mod alerts;
pub mod commands;
pub mod input;
pub mod output;

use clap::{Args, Parser, Subcommand, ValueEnum};
use dqengine_core::Severity;
use dqengine_core::logging::{LogFormat, LogOptions};
use std::path::PathBuf;

/// CLI argument structure
#[derive(Parser, Debug)]
#[command(name = "dqengine")]
#[command(about = "Data-quality validation, statistics and drift detection")]
#[command(version)]
#[command(long_about = "
dqengine - offline data-quality checks for JSON datasets

Datasets are JSON arrays of row objects. Rule files list which validation
strategy to run on which column.

BUILT-IN STRATEGIES:
- completeness     null, absent or empty-string values
- numerical_range  z-score outliers among numeric values
- uniqueness       values repeated across rows

EXAMPLES:
  dqengine validate --data orders.json --rules rules.json
  dqengine validate --data orders.json --rules rules.json --format markdown -o report.md
  dqengine validate --data orders.json --rules rules.json --alert-log alerts.jsonl --fail-on critical
  dqengine stats --data orders.json --column price --bins 20
  dqengine drift --baseline january.json --current february.json --column price
  dqengine logs --alert-log alerts.jsonl --severity warning
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a rule set against a dataset
    Validate(ValidateArgs),
    /// Summary statistics and distribution of a numeric column
    Stats(StatsArgs),
    /// KL divergence of a numeric column between two datasets
    Drift(DriftArgs),
    /// List stored alert records
    Logs(LogsArgs),
    /// List available validation strategies
    List,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Dataset file (JSON array of objects)
    #[arg(long, value_name = "FILE")]
    pub data: PathBuf,

    /// Rule-set file
    #[arg(long, value_name = "FILE")]
    pub rules: PathBuf,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Write the report here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Append an alert record per failed rule to this JSON Lines file
    #[arg(long, value_name = "FILE", env = "DQENGINE_ALERT_LOG")]
    pub alert_log: Option<PathBuf>,

    /// Dataset label, overriding the rule set's `dataset_name`
    #[arg(long, value_name = "NAME")]
    pub dataset_name: Option<String>,

    /// Exit non-zero if any rule fails at or above this severity
    #[arg(long, value_enum, value_name = "SEVERITY")]
    pub fail_on: Option<SeverityArg>,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Dataset file (JSON array of objects)
    #[arg(long, value_name = "FILE")]
    pub data: PathBuf,

    /// Numeric column to summarize
    #[arg(long)]
    pub column: String,

    /// Histogram bins for the distribution
    #[arg(long, default_value_t = dqengine_core::stats::DEFAULT_HISTOGRAM_BINS)]
    pub bins: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = StatsFormat::Text)]
    pub format: StatsFormat,
}

#[derive(Args, Debug)]
pub struct DriftArgs {
    /// Reference dataset file
    #[arg(long, value_name = "FILE")]
    pub baseline: PathBuf,

    /// Dataset file compared against the baseline
    #[arg(long, value_name = "FILE")]
    pub current: PathBuf,

    /// Numeric column to compare
    #[arg(long)]
    pub column: String,

    /// Histogram bins
    #[arg(long, default_value_t = dqengine_core::stats::DEFAULT_HISTOGRAM_BINS)]
    pub bins: usize,

    /// KL divergence above which the column is reported as drifted
    #[arg(long, default_value_t = dqengine_core::config::DEFAULT_DRIFT_ALERT_THRESHOLD)]
    pub alert_threshold: f64,
}

#[derive(Args, Debug)]
pub struct LogsArgs {
    /// Alert log file (JSON Lines)
    #[arg(long, value_name = "FILE", env = "DQENGINE_ALERT_LOG")]
    pub alert_log: PathBuf,

    /// Only show alerts at or above this severity
    #[arg(long, value_enum)]
    pub severity: Option<SeverityArg>,

    /// Only show alerts for this dataset
    #[arg(long, value_name = "NAME")]
    pub dataset: Option<String>,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true, help = "Suppress all log output except errors")]
    pub quiet: bool,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Pretty)]
    pub log_format: LogFormatArg,
}

impl GlobalArgs {
    /// Logging options implied by the global flags.
    pub fn log_options(&self) -> LogOptions {
        LogOptions::new()
            .with_verbose(self.verbose)
            .with_quiet(self.quiet)
            .with_format(self.log_format.into())
    }
}

/// Validation report formats
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    /// Plain text summary
    Text,
    /// Pretty-printed JSON
    Json,
    /// Markdown document
    Markdown,
}

/// Statistics output formats
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatsFormat {
    /// Plain text summary
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Severity as accepted on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeverityArg {
    Info,
    Warning,
    Critical,
}

impl From<SeverityArg> for Severity {
    fn from(value: SeverityArg) -> Self {
        match value {
            SeverityArg::Info => Self::Info,
            SeverityArg::Warning => Self::Warning,
            SeverityArg::Critical => Self::Critical,
        }
    }
}

/// Log format as accepted on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}
