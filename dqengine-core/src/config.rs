//! Rule-set and drift configuration.
//!
//! A [`RuleSet`] is the document a caller hands to the engine: an ordered
//! list of [`ValidationConfig`] entries plus an optional dataset label.
//! [`DriftConfig`] carries the histogram and alerting settings used when
//! comparing two samples of a column.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::Result;
use crate::models::ValidationConfig;
use crate::stats::DEFAULT_HISTOGRAM_BINS;

/// Format version written by [`RuleSet::new`].
pub const CURRENT_FORMAT_VERSION: &str = "1.0";

/// Default KL divergence above which a column counts as drifted.
pub const DEFAULT_DRIFT_ALERT_THRESHOLD: f64 = 0.1;

/// Validation errors for rule-set and drift configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("rule {index}: strategy name must not be empty")]
    EmptyStrategyName { index: usize },
    #[error("rule {index}: column must not be empty")]
    EmptyColumn { index: usize },
    #[error("rule {index}: threshold must be a positive finite number, got {value}")]
    InvalidThreshold { index: usize, value: f64 },
    #[error("bins must be at least 1")]
    InvalidBins,
    #[error("alert_threshold must be a non-negative finite number, got {0}")]
    InvalidDriftThreshold(f64),
}

/// An ordered list of rules to run against one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Document format version
    pub format_version: String,
    /// Label carried into reports and alert records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_name: Option<String>,
    /// Rules, run in this order
    #[serde(default)]
    pub rules: Vec<ValidationConfig>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            format_version: CURRENT_FORMAT_VERSION.to_string(),
            dataset_name: None,
            rules: Vec::new(),
        }
    }
}

impl RuleSet {
    /// Creates an empty rule set at the current format version.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the dataset label.
    pub fn with_dataset_name(mut self, name: impl Into<String>) -> Self {
        self.dataset_name = Some(name.into());
        self
    }

    /// Builder method to append a rule.
    pub fn with_rule(mut self, rule: ValidationConfig) -> Self {
        self.rules.push(rule);
        self
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the rule set holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Validates every rule, reporting the first problem found.
    ///
    /// Strategy names are not resolved here; unknown names surface when the
    /// engine runs the rule.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.strategy_name.trim().is_empty() {
                return Err(ConfigValidationError::EmptyStrategyName { index });
            }
            if rule.column.is_empty() {
                return Err(ConfigValidationError::EmptyColumn { index });
            }
            if let Some(value) = rule.threshold
                && !(value.is_finite() && value > 0.0)
            {
                return Err(ConfigValidationError::InvalidThreshold { index, value });
            }
        }
        Ok(())
    }

    /// Parses a rule-set document, checking it against the embedded JSON
    /// Schema before deserializing and validating it.
    ///
    /// # Errors
    /// Returns `DqError::RuleSchema` for malformed or non-conforming
    /// documents and `DqError::InvalidRule` for rules with invalid values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let rules = crate::schema::validate_and_parse_rules(json)?;
        rules.validate()?;
        Ok(rules)
    }
}

/// Histogram and alerting settings for drift detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftConfig {
    /// Number of histogram bins
    #[serde(default = "default_bins")]
    pub bins: usize,
    /// KL divergence strictly above which drift is reported
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: f64,
}

fn default_bins() -> usize {
    DEFAULT_HISTOGRAM_BINS
}

fn default_alert_threshold() -> f64 {
    DEFAULT_DRIFT_ALERT_THRESHOLD
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            bins: DEFAULT_HISTOGRAM_BINS,
            alert_threshold: DEFAULT_DRIFT_ALERT_THRESHOLD,
        }
    }
}

impl DriftConfig {
    /// Creates a drift config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the bin count.
    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    /// Builder method to set the alert threshold.
    pub fn with_alert_threshold(mut self, threshold: f64) -> Self {
        self.alert_threshold = threshold;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        if self.bins == 0 {
            return Err(ConfigValidationError::InvalidBins);
        }
        if !(self.alert_threshold.is_finite() && self.alert_threshold >= 0.0) {
            return Err(ConfigValidationError::InvalidDriftThreshold(
                self.alert_threshold,
            ));
        }
        Ok(())
    }

    /// Returns true if `score` exceeds the alert threshold.
    pub fn is_drifted(&self, score: f64) -> bool {
        score > self.alert_threshold
    }
}
