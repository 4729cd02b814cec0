//! Numerical range validation using z-score outlier detection.
//!
//! Only numeric, non-NaN values take part: they feed the mean and
//! population standard deviation, and only they can be flagged. Strings,
//! booleans, nulls and NaN are skipped in both passes.

use crate::models::{Dataset, Severity, ValidationResult};
use crate::stats::{calculate_z_score, mean_and_std_dev};

use super::{ValidationStrategy, failure_rate};

pub(super) const NAME: &str = "numerical_range";

/// Z-score threshold used when a rule gives none.
pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;

/// Anomaly rates above this are critical.
const CRITICAL_RATE: f64 = 0.05;
/// Anomaly rates above this are warnings.
const WARNING_RATE: f64 = 0.01;

/// Flags values more than `threshold` standard deviations from the mean.
#[derive(Debug, Clone, Copy)]
pub struct NumericalRangeStrategy {
    default_threshold: f64,
}

impl Default for NumericalRangeStrategy {
    fn default() -> Self {
        Self {
            default_threshold: DEFAULT_Z_THRESHOLD,
        }
    }
}

impl NumericalRangeStrategy {
    /// Creates a strategy with the standard 3.0 threshold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to change the threshold used when a rule gives none.
    pub fn with_default_threshold(mut self, threshold: f64) -> Self {
        self.default_threshold = threshold;
        self
    }

    /// Threshold used when a rule gives none.
    pub fn default_threshold(&self) -> f64 {
        self.default_threshold
    }
}

impl ValidationStrategy for NumericalRangeStrategy {
    fn name(&self) -> &str {
        NAME
    }

    fn validate(
        &self,
        dataset: &Dataset,
        column: &str,
        threshold: Option<f64>,
    ) -> ValidationResult {
        let threshold = threshold.unwrap_or(self.default_threshold);

        let numeric: Vec<(usize, f64)> = dataset
            .column(column)
            .filter_map(|(index, value)| value.as_number().map(|n| (index, n)))
            .collect();

        if numeric.is_empty() {
            return ValidationResult::failed(
                Vec::new(),
                format!("No valid numeric values found in '{}'", column),
                Severity::Warning,
            );
        }

        let values: Vec<f64> = numeric.iter().map(|&(_, n)| n).collect();
        let (mean, std_dev) = mean_and_std_dev(&values);

        let failed: Vec<usize> = numeric
            .iter()
            .filter(|&&(_, value)| calculate_z_score(value, mean, std_dev).abs() > threshold)
            .map(|&(index, _)| index)
            .collect();

        let skipped = dataset.len().saturating_sub(numeric.len());
        tracing::debug!(
            "Numerical range on '{}': {} numeric values, {} skipped, {} outliers beyond z={}",
            column,
            numeric.len(),
            skipped,
            failed.len(),
            threshold
        );

        let skipped_note = if skipped > 0 {
            format!(", {} non-numeric values skipped", skipped)
        } else {
            String::new()
        };

        if failed.is_empty() {
            return ValidationResult::passed(format!(
                "All {} numeric values in '{}' within {} standard deviations{}",
                numeric.len(),
                column,
                threshold,
                skipped_note
            ));
        }

        let rate = failure_rate(failed.len(), dataset.len());
        let message = format!(
            "{} anomalies in '{}' beyond {} standard deviations (mean {:.2}, std dev {:.2}){}",
            failed.len(),
            column,
            threshold,
            mean,
            std_dev,
            skipped_note
        );
        let severity = Severity::from_rate(rate, CRITICAL_RATE, WARNING_RATE);

        ValidationResult::failed(failed, message, severity)
    }
}
