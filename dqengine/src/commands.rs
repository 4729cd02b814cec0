//! Command implementations.
//!
//! Each command returns the process exit code it wants; errors are reserved
//! for failures to run at all (unreadable files, invalid rule sets, unknown
//! strategies).

use anyhow::{Context, Result};
use dqengine_core::{
    BuiltinStrategy, DriftConfig, Severity, ValidationEngine, calculate_stats, detect_drift,
    generate_distribution_data,
};
use std::fmt::Write as _;
use std::process::ExitCode;
use tracing::{info, warn};

use crate::alerts::{self, AlertFilter, AlertRecord};
use crate::input::{dataset_label, load_dataset, load_rules};
use crate::output::{self, ColumnStats, DriftSummary};
use crate::{Cli, Command, DriftArgs, LogsArgs, StatsArgs, StatsFormat, ValidateArgs};

/// Exit code used when `--fail-on` is triggered.
pub const VALIDATION_FAILED_EXIT: u8 = 2;

/// Dispatches the parsed command line.
pub async fn execute(cli: &Cli) -> Result<ExitCode> {
    match &cli.command {
        Command::Validate(args) => validate(args).await,
        Command::Stats(args) => stats(args).await,
        Command::Drift(args) => drift(args).await,
        Command::Logs(args) => logs(args).await,
        Command::List => {
            print!("{}", list_strategies(&ValidationEngine::new()));
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Runs a rule set against a dataset and reports the results.
pub async fn validate(args: &ValidateArgs) -> Result<ExitCode> {
    let dataset = load_dataset(&args.data).await?;
    let mut rules = load_rules(&args.rules).await?;

    let dataset_name = dataset_label(
        args.dataset_name
            .as_deref()
            .or(rules.dataset_name.as_deref()),
        &args.data,
    );
    rules.dataset_name = Some(dataset_name.clone());

    info!(
        "Validating {} ({} rows) against {} rules",
        dataset_name,
        dataset.len(),
        rules.len()
    );

    let engine = ValidationEngine::new();
    let report = engine.run(&dataset, &rules)?;

    let rendered = output::render_report(&report, args.format)?;
    output::emit(&rendered, args.output.as_deref()).await?;

    if let Some(alert_log) = &args.alert_log {
        let records = AlertRecord::from_report(&dataset_name, &report);
        alerts::append_alerts(alert_log, &records).await?;
    }

    if let Some(fail_on) = args.fail_on {
        let threshold = Severity::from(fail_on);
        let triggering = report.failures_at_or_above(threshold).count();
        if triggering > 0 {
            warn!(
                "{} rules failed at or above {} severity",
                triggering, threshold
            );
            return Ok(ExitCode::from(VALIDATION_FAILED_EXIT));
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Builds column statistics for one dataset.
pub fn column_stats(dataset: &dqengine_core::Dataset, column: &str, bins: usize) -> ColumnStats {
    let values = dataset.numeric_values(column);
    if values.is_empty() {
        warn!("Column '{}' has no numeric values", column);
    }

    ColumnStats {
        column: column.to_string(),
        row_count: dataset.len(),
        numeric_count: values.len(),
        summary: calculate_stats(&values),
        distribution: generate_distribution_data(&values, bins),
    }
}

/// Prints summary statistics and a histogram for a numeric column.
pub async fn stats(args: &StatsArgs) -> Result<ExitCode> {
    let config = DriftConfig::new().with_bins(args.bins);
    config.validate().context("Invalid --bins")?;

    let dataset = load_dataset(&args.data).await?;
    let stats = column_stats(&dataset, &args.column, args.bins);

    let rendered = match args.format {
        StatsFormat::Text => output::render_stats_text(&stats),
        StatsFormat::Json => {
            let mut json = serde_json::to_string_pretty(&stats)
                .context("Failed to serialize column statistics")?;
            json.push('\n');
            json
        }
    };
    output::emit(&rendered, None).await?;

    Ok(ExitCode::SUCCESS)
}

/// Scores drift of a column between two datasets.
pub fn drift_summary(
    baseline: &dqengine_core::Dataset,
    current: &dqengine_core::Dataset,
    column: &str,
    config: &DriftConfig,
) -> DriftSummary {
    let baseline_values = baseline.numeric_values(column);
    let current_values = current.numeric_values(column);
    let score = detect_drift(&baseline_values, &current_values, config.bins);

    DriftSummary {
        column: column.to_string(),
        baseline_count: baseline_values.len(),
        current_count: current_values.len(),
        bins: config.bins,
        score,
        alert_threshold: config.alert_threshold,
        drifted: config.is_drifted(score),
    }
}

/// Compares a column between a baseline and a current dataset.
pub async fn drift(args: &DriftArgs) -> Result<ExitCode> {
    let config = DriftConfig::new()
        .with_bins(args.bins)
        .with_alert_threshold(args.alert_threshold);
    config.validate().context("Invalid drift settings")?;

    let baseline = load_dataset(&args.baseline).await?;
    let current = load_dataset(&args.current).await?;
    let summary = drift_summary(&baseline, &current, &args.column, &config);

    if summary.drifted {
        warn!(
            "Column '{}' drifted: KL divergence {:.6} exceeds {}",
            summary.column, summary.score, summary.alert_threshold
        );
    }

    output::emit(&output::render_drift_text(&summary), None).await?;
    Ok(ExitCode::SUCCESS)
}

/// Renders stored alert records matching the filters, oldest first.
pub async fn render_logs(args: &LogsArgs) -> Result<String> {
    let mut filter = AlertFilter::new();
    if let Some(severity) = args.severity {
        filter = filter.with_min_severity(severity.into());
    }
    if let Some(dataset) = &args.dataset {
        filter = filter.with_dataset_name(dataset.clone());
    }

    let records = alerts::read_alerts(&args.alert_log).await?;
    let lines: Vec<String> = records
        .iter()
        .filter(|record| filter.matches(record))
        .map(alerts::format_alert_line)
        .collect();

    info!("{} of {} alerts match", lines.len(), records.len());

    let mut rendered = lines.join("\n");
    if !rendered.is_empty() {
        rendered.push('\n');
    }
    Ok(rendered)
}

/// Prints stored alert records matching the filters.
pub async fn logs(args: &LogsArgs) -> Result<ExitCode> {
    let rendered = render_logs(args).await?;
    output::emit(&rendered, None).await?;

    Ok(ExitCode::SUCCESS)
}

/// Lists registered strategies, marking built-ins.
pub fn list_strategies(engine: &ValidationEngine) -> String {
    let mut out = String::from("Available validation strategies:\n");
    for name in engine.strategy_names() {
        let origin = if BuiltinStrategy::from_name(name).is_some() {
            "built-in"
        } else {
            "custom"
        };
        let _ = writeln!(out, "  {:<16} ({})", name, origin);
    }
    out
}
