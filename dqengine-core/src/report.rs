//! Aggregated outcome of running a rule set.

use serde::{Deserialize, Serialize};

use crate::models::{Severity, ValidationConfig, ValidationResult};

/// One rule paired with the result it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    /// The rule as configured
    pub rule: ValidationConfig,
    /// What the strategy returned
    pub result: ValidationResult,
}

impl RuleOutcome {
    /// Pairs a rule with its result.
    pub fn new(rule: ValidationConfig, result: ValidationResult) -> Self {
        Self { rule, result }
    }

    /// Returns true if the result is invalid at `severity` or higher.
    pub fn fails_at(&self, severity: Severity) -> bool {
        !self.result.is_valid && self.result.severity >= severity
    }
}

/// Results of a rule set, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Label of the validated dataset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_name: Option<String>,
    /// Number of rows in the validated dataset
    pub row_count: usize,
    /// One entry per rule, in the order the rules were given
    pub outcomes: Vec<RuleOutcome>,
}

impl ValidationReport {
    /// Builds a report by pairing `rules[i]` with `results[i]`.
    ///
    /// Extra entries on either side are dropped.
    pub fn from_parts(
        dataset_name: Option<String>,
        row_count: usize,
        rules: &[ValidationConfig],
        results: Vec<ValidationResult>,
    ) -> Self {
        let outcomes = rules
            .iter()
            .cloned()
            .zip(results)
            .map(|(rule, result)| RuleOutcome::new(rule, result))
            .collect();

        Self {
            dataset_name,
            row_count,
            outcomes,
        }
    }

    /// Number of rules that passed.
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_valid).count()
    }

    /// Number of rules that failed.
    pub fn failed_count(&self) -> usize {
        self.outcomes.len().saturating_sub(self.passed_count())
    }

    /// Returns true if every rule passed.
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_valid)
    }

    /// Highest severity among failed rules, or `None` if all passed.
    pub fn highest_severity(&self) -> Option<Severity> {
        self.outcomes
            .iter()
            .filter(|o| !o.result.is_valid)
            .map(|o| o.result.severity)
            .max()
    }

    /// Failed rules at `severity` or above, in rule order.
    pub fn failures_at_or_above(&self, severity: Severity) -> impl Iterator<Item = &RuleOutcome> {
        self.outcomes.iter().filter(move |o| o.fails_at(severity))
    }

    /// Total flagged rows across all rules (a row may count more than once).
    pub fn total_flagged_rows(&self) -> usize {
        self.outcomes.iter().map(|o| o.result.failure_count()).sum()
    }
}
