//! Rendering reports and writing them out.
//!
//! Validation reports render as plain text, pretty JSON, or a Markdown
//! document produced from `templates/report.md`. Column statistics and
//! drift results have their own small text renderings.

use anyhow::{Context, Result};
use askama::Template;
use dqengine_core::{DistributionBucket, StatisticalSummary, ValidationReport};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;

use crate::ReportFormat;

/// Row indices shown before the list is elided.
const MAX_LISTED_ROWS: usize = 20;

/// Statistics for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    /// Column name
    pub column: String,
    /// Rows in the dataset
    pub row_count: usize,
    /// Rows holding a usable number
    pub numeric_count: usize,
    /// Summary over the numeric values
    pub summary: StatisticalSummary,
    /// Raw-count histogram
    pub distribution: Vec<DistributionBucket>,
}

/// Drift comparison of one column between two datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftSummary {
    /// Column name
    pub column: String,
    /// Numeric values in the baseline
    pub baseline_count: usize,
    /// Numeric values in the current dataset
    pub current_count: usize,
    /// Histogram bins used
    pub bins: usize,
    /// KL divergence of current from baseline
    pub score: f64,
    /// Threshold the score was compared against
    pub alert_threshold: f64,
    /// Whether the score exceeded the threshold
    pub drifted: bool,
}

#[derive(Template)]
#[template(path = "report.md", escape = "none")]
struct MarkdownReport<'a> {
    title: &'a str,
    row_count: usize,
    rule_count: usize,
    passed: usize,
    failed: usize,
    highest_severity: String,
    rows: Vec<MarkdownRow>,
    failures: Vec<MarkdownFailure>,
}

struct MarkdownRow {
    position: usize,
    strategy: String,
    column: String,
    status: &'static str,
    severity: String,
    flagged: usize,
    message: String,
}

struct MarkdownFailure {
    strategy: String,
    column: String,
    message: String,
    rows: String,
}

/// Renders a validation report in the requested format.
pub fn render_report(report: &ValidationReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => render_json(report),
        ReportFormat::Markdown => render_markdown(report),
    }
}

fn report_title(report: &ValidationReport) -> &str {
    report.dataset_name.as_deref().unwrap_or("dataset")
}

fn highest_severity_label(report: &ValidationReport) -> String {
    report
        .highest_severity()
        .map_or_else(|| "none".to_string(), |severity| severity.to_string())
}

/// Comma-separated row list, elided after [`MAX_LISTED_ROWS`] entries.
fn format_rows(rows: &[usize]) -> String {
    let mut listed = rows
        .iter()
        .take(MAX_LISTED_ROWS)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    if rows.len() > MAX_LISTED_ROWS {
        let hidden = rows.len().saturating_sub(MAX_LISTED_ROWS);
        let _ = write!(listed, ", ... (+{} more)", hidden);
    }
    listed
}

/// Plain text report.
pub fn render_text(report: &ValidationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Data quality report: {} ({} rows)",
        report_title(report),
        report.row_count
    );
    let _ = writeln!(out);

    for outcome in &report.outcomes {
        let result = &outcome.result;
        if result.is_valid {
            let _ = writeln!(
                out,
                "[PASS] {} on '{}': {}",
                outcome.rule.strategy_name, outcome.rule.column, result.message
            );
        } else {
            let _ = writeln!(
                out,
                "[FAIL] {} on '{}' ({}): {}",
                outcome.rule.strategy_name, outcome.rule.column, result.severity, result.message
            );
            if !result.failed_row_indices.is_empty() {
                let _ = writeln!(out, "       rows: {}", format_rows(&result.failed_row_indices));
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Summary: {} rules, {} passed, {} failed, highest severity {}",
        report.outcomes.len(),
        report.passed_count(),
        report.failed_count(),
        highest_severity_label(report)
    );
    out
}

/// Pretty-printed JSON report.
pub fn render_json(report: &ValidationReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize validation report")
}

/// Markdown report rendered from the bundled template.
pub fn render_markdown(report: &ValidationReport) -> Result<String> {
    let rows = report
        .outcomes
        .iter()
        .enumerate()
        .map(|(index, outcome)| MarkdownRow {
            position: index.saturating_add(1),
            strategy: escape_cell(&outcome.rule.strategy_name),
            column: escape_cell(&outcome.rule.column),
            status: if outcome.result.is_valid { "pass" } else { "FAIL" },
            severity: outcome.result.severity.to_string(),
            flagged: outcome.result.failure_count(),
            message: escape_cell(&outcome.result.message),
        })
        .collect();

    let failures = report
        .outcomes
        .iter()
        .filter(|outcome| !outcome.result.is_valid)
        .map(|outcome| MarkdownFailure {
            strategy: outcome.rule.strategy_name.clone(),
            column: outcome.rule.column.clone(),
            message: outcome.result.message.clone(),
            rows: if outcome.result.failed_row_indices.is_empty() {
                "none".to_string()
            } else {
                format_rows(&outcome.result.failed_row_indices)
            },
        })
        .collect();

    let template = MarkdownReport {
        title: report_title(report),
        row_count: report.row_count,
        rule_count: report.outcomes.len(),
        passed: report.passed_count(),
        failed: report.failed_count(),
        highest_severity: highest_severity_label(report),
        rows,
        failures,
    };

    template
        .render()
        .context("Failed to render Markdown report")
}

/// Escapes characters that would break a Markdown table cell.
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

/// Plain text column statistics.
pub fn render_stats_text(stats: &ColumnStats) -> String {
    let s = &stats.summary;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Column '{}': {} numeric values of {} rows",
        stats.column, stats.numeric_count, stats.row_count
    );
    let _ = writeln!(out, "  mean    {:.4}", s.mean);
    let _ = writeln!(out, "  std dev {:.4}", s.std_dev);
    let _ = writeln!(out, "  min     {:.4}", s.min);
    let _ = writeln!(out, "  q1      {:.4}", s.q1);
    let _ = writeln!(out, "  median  {:.4}", s.median);
    let _ = writeln!(out, "  q3      {:.4}", s.q3);
    let _ = writeln!(out, "  max     {:.4}", s.max);

    let widest = stats
        .distribution
        .iter()
        .map(|bucket| bucket.count)
        .max()
        .unwrap_or(0);
    let _ = writeln!(out);
    let _ = writeln!(out, "Distribution:");
    for bucket in &stats.distribution {
        let bar_len = bucket
            .count
            .saturating_mul(40)
            .checked_div(widest)
            .unwrap_or(0);
        let _ = writeln!(
            out,
            "  {:>12} | {:<40} {}",
            bucket.range,
            "#".repeat(bar_len),
            bucket.count
        );
    }
    out
}

/// Plain text drift result.
pub fn render_drift_text(drift: &DriftSummary) -> String {
    let verdict = if drift.drifted { "DRIFTED" } else { "stable" };
    format!(
        "Column '{}': KL divergence {:.6} over {} bins (threshold {}) -> {}\n  baseline values: {}\n  current values:  {}\n",
        drift.column,
        drift.score,
        drift.bins,
        drift.alert_threshold,
        verdict,
        drift.baseline_count,
        drift.current_count
    )
}

/// Writes rendered output to a file, or to stdout when no path is given.
pub async fn emit(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            tokio::fs::write(path, content)
                .await
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            tracing::info!("Wrote report to {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}
