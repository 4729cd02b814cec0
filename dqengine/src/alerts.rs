//! Persisted alert records.
//!
//! Every failed rule of a validation run can be recorded as an
//! [`AlertRecord`]. Records are stored one JSON object per line and are only
//! ever appended, so a log file accumulates the history of all runs.

use chrono::{DateTime, Utc};
use dqengine_core::error::DqError;
use dqengine_core::{Result, RuleOutcome, Severity, ValidationReport};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// One stored data-quality alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    /// Unique record identifier
    pub id: Uuid,
    /// Label of the dataset that was validated
    pub dataset_name: String,
    /// Strategy that produced the failure
    pub rule_type: String,
    /// Column the rule ran on
    pub column: String,
    /// Severity reported by the strategy
    pub severity: Severity,
    /// Strategy message
    pub message: String,
    /// Offending row indices
    pub failed_rows: Vec<usize>,
    /// When the record was created
    pub timestamp: DateTime<Utc>,
}

impl AlertRecord {
    /// Builds a record for one rule outcome, stamped with a fresh id and
    /// the current time.
    pub fn from_outcome(dataset_name: &str, outcome: &RuleOutcome) -> Self {
        Self {
            id: Uuid::new_v4(),
            dataset_name: dataset_name.to_string(),
            rule_type: outcome.rule.strategy_name.clone(),
            column: outcome.rule.column.clone(),
            severity: outcome.result.severity,
            message: outcome.result.message.clone(),
            failed_rows: outcome.result.failed_row_indices.clone(),
            timestamp: Utc::now(),
        }
    }

    /// Builds a record for every failed rule of a report, in rule order.
    pub fn from_report(dataset_name: &str, report: &ValidationReport) -> Vec<Self> {
        report
            .outcomes
            .iter()
            .filter(|outcome| !outcome.result.is_valid)
            .map(|outcome| Self::from_outcome(dataset_name, outcome))
            .collect()
    }
}

/// Criteria for listing stored alerts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertFilter {
    /// Minimum severity to include
    pub min_severity: Option<Severity>,
    /// Exact dataset label to include
    pub dataset_name: Option<String>,
}

impl AlertFilter {
    /// Creates a filter that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the minimum severity.
    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = Some(severity);
        self
    }

    /// Builder method to restrict to one dataset.
    pub fn with_dataset_name(mut self, name: impl Into<String>) -> Self {
        self.dataset_name = Some(name.into());
        self
    }

    /// Returns true if the record passes every criterion.
    pub fn matches(&self, record: &AlertRecord) -> bool {
        let severity_ok = self
            .min_severity
            .is_none_or(|minimum| record.severity >= minimum);
        let dataset_ok = self
            .dataset_name
            .as_deref()
            .is_none_or(|name| record.dataset_name == name);
        severity_ok && dataset_ok
    }
}

/// Appends records to a JSON Lines file, creating it if needed.
pub async fn append_alerts(path: &Path, records: &[AlertRecord]) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }

    let mut buffer = String::new();
    for record in records {
        let line = serde_json::to_string(record)
            .map_err(|e| DqError::serialization("Failed to serialize alert record", e))?;
        buffer.push_str(&line);
        buffer.push('\n');
    }

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| DqError::io(format!("Failed to open {}", path.display()), e))?;

    file.write_all(buffer.as_bytes())
        .await
        .map_err(|e| DqError::io(format!("Failed to write to {}", path.display()), e))?;
    file.flush()
        .await
        .map_err(|e| DqError::io(format!("Failed to flush {}", path.display()), e))?;

    tracing::info!("Appended {} alerts to {}", records.len(), path.display());
    Ok(())
}

/// Reads every record from a JSON Lines file, oldest first.
///
/// Blank lines are skipped. A missing file reads as an empty log.
///
/// # Errors
/// Returns `DqError::Serialization` naming the line number of the first
/// record that cannot be parsed.
pub async fn read_alerts(path: &Path) -> Result<Vec<AlertRecord>> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("Alert log {} does not exist yet", path.display());
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(DqError::io(format!("Failed to read {}", path.display()), e));
        }
    };

    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|e| {
                DqError::serialization(
                    format!(
                        "Invalid alert record on line {} of {}",
                        index.saturating_add(1),
                        path.display()
                    ),
                    e,
                )
            })
        })
        .collect()
}

/// Formats one record as a single log line.
pub fn format_alert_line(record: &AlertRecord) -> String {
    format!(
        "{} [{}] {} {}:{} - {} ({} rows)",
        record.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        record.severity,
        record.dataset_name,
        record.rule_type,
        record.column,
        record.message,
        record.failed_rows.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dqengine_core::{ValidationConfig, ValidationResult};

    fn failed_outcome(severity: Severity) -> RuleOutcome {
        RuleOutcome::new(
            ValidationConfig::new("completeness", "email"),
            ValidationResult::failed(vec![2, 7], "2 of 10 rows missing", severity),
        )
    }

    #[test]
    fn test_alert_from_outcome() {
        let record = AlertRecord::from_outcome("orders", &failed_outcome(Severity::Critical));

        assert_eq!(record.dataset_name, "orders");
        assert_eq!(record.rule_type, "completeness");
        assert_eq!(record.column, "email");
        assert_eq!(record.severity, Severity::Critical);
        assert_eq!(record.failed_rows, vec![2, 7]);
        assert_eq!(record.id.get_version_num(), 4);
    }

    #[test]
    fn test_alert_ids_are_unique() {
        let outcome = failed_outcome(Severity::Warning);
        let a = AlertRecord::from_outcome("orders", &outcome);
        let b = AlertRecord::from_outcome("orders", &outcome);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_alerts_from_report_skip_passed_rules() {
        let rules = vec![
            ValidationConfig::new("completeness", "email"),
            ValidationConfig::new("uniqueness", "id"),
        ];
        let results = vec![
            ValidationResult::passed("ok"),
            ValidationResult::failed(vec![0, 1], "dupes", Severity::Critical),
        ];
        let report = ValidationReport::from_parts(None, 2, &rules, results);

        let records = AlertRecord::from_report("orders", &report);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].rule_type, "uniqueness");
    }

    #[test]
    fn test_alert_filter() {
        let record = AlertRecord::from_outcome("orders", &failed_outcome(Severity::Warning));

        assert!(AlertFilter::new().matches(&record));
        assert!(
            AlertFilter::new()
                .with_min_severity(Severity::Warning)
                .matches(&record)
        );
        assert!(
            !AlertFilter::new()
                .with_min_severity(Severity::Critical)
                .matches(&record)
        );
        assert!(
            !AlertFilter::new()
                .with_dataset_name("users")
                .matches(&record)
        );
    }

    #[test]
    fn test_alert_record_serialized_shape() {
        let record = AlertRecord::from_outcome("orders", &failed_outcome(Severity::Critical));
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["severity"], "critical");
        assert_eq!(json["rule_type"], "completeness");
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_format_alert_line() {
        let record = AlertRecord::from_outcome("orders", &failed_outcome(Severity::Critical));
        let line = format_alert_line(&record);

        assert!(line.contains("[critical] orders completeness:email"));
        assert!(line.ends_with("(2 rows)"));
    }
}
