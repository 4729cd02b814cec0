//! Validation engine facade.
//!
//! The engine owns a registry of named strategies and dispatches rules to
//! them. It is seeded with the built-ins on construction; callers may add or
//! replace strategies before running rules. Registration needs `&mut self`
//! and dispatch only `&self`, so a configured engine can be shared across
//! threads (for example behind an `Arc`) without locking.

use std::collections::BTreeMap;

use crate::config::RuleSet;
use crate::error::{DqError, Result};
use crate::models::{Dataset, ValidationConfig, ValidationResult};
use crate::report::ValidationReport;
use crate::strategies::{BuiltinStrategy, ValidationStrategy};

/// Registry of validation strategies keyed by name.
///
/// # Example
///
/// ```rust
/// use dqengine_core::{Dataset, Row, ValidationEngine};
///
/// let engine = ValidationEngine::new();
/// let dataset = Dataset::new(vec![
///     Row::new().with("email", "a@x.com"),
///     Row::new().with("email", ""),
/// ]);
///
/// let result = engine.validate("completeness", &dataset, "email", None)?;
/// assert_eq!(result.failed_row_indices, vec![1]);
/// # Ok::<(), dqengine_core::DqError>(())
/// ```
#[derive(Debug)]
pub struct ValidationEngine {
    strategies: BTreeMap<String, Box<dyn ValidationStrategy>>,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        let mut engine = Self::empty();
        for builtin in BuiltinStrategy::ALL {
            engine.register_boxed(builtin.instantiate());
        }
        engine
    }
}

impl ValidationEngine {
    /// Creates an engine seeded with the built-in strategies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with no strategies registered.
    pub fn empty() -> Self {
        Self {
            strategies: BTreeMap::new(),
        }
    }

    /// Registers a strategy under its declared name.
    ///
    /// An existing strategy with the same name is replaced and returned.
    pub fn register_strategy(
        &mut self,
        strategy: impl ValidationStrategy + 'static,
    ) -> Option<Box<dyn ValidationStrategy>> {
        self.register_boxed(Box::new(strategy))
    }

    /// Registers an already boxed strategy under its declared name.
    pub fn register_boxed(
        &mut self,
        strategy: Box<dyn ValidationStrategy>,
    ) -> Option<Box<dyn ValidationStrategy>> {
        let name = strategy.name().to_string();
        let previous = self.strategies.insert(name.clone(), strategy);
        if previous.is_some() {
            tracing::debug!("Replaced validation strategy '{}'", name);
        }
        previous
    }

    /// Registered strategy names in sorted order.
    pub fn strategy_names(&self) -> impl Iterator<Item = &str> {
        self.strategies.keys().map(String::as_str)
    }

    /// Returns true if a strategy is registered under `name`.
    pub fn has_strategy(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    /// Runs one strategy against one column.
    ///
    /// # Errors
    /// Returns `DqError::UnknownStrategy` if no strategy is registered under
    /// `strategy_name`.
    pub fn validate(
        &self,
        strategy_name: &str,
        dataset: &Dataset,
        column: &str,
        threshold: Option<f64>,
    ) -> Result<ValidationResult> {
        let Some(strategy) = self.strategies.get(strategy_name) else {
            tracing::warn!("Unknown validation strategy '{}'", strategy_name);
            return Err(DqError::unknown_strategy(
                strategy_name,
                self.strategy_names(),
            ));
        };

        tracing::debug!(
            "Running '{}' on column '{}' over {} rows",
            strategy_name,
            column,
            dataset.len()
        );
        let result = strategy.validate(dataset, column, threshold);
        tracing::debug!(
            "'{}' on '{}': valid={} severity={} flagged={}",
            strategy_name,
            column,
            result.is_valid,
            result.severity,
            result.failure_count()
        );

        Ok(result)
    }

    /// Runs a single configured rule.
    pub fn validate_config(
        &self,
        dataset: &Dataset,
        config: &ValidationConfig,
    ) -> Result<ValidationResult> {
        self.validate(
            &config.strategy_name,
            dataset,
            &config.column,
            config.threshold,
        )
    }

    /// Runs every rule in order; `results[i]` belongs to `configs[i]`.
    ///
    /// # Errors
    /// Stops at the first rule naming an unknown strategy and returns its
    /// error; no partial results are returned.
    pub fn validate_all(
        &self,
        dataset: &Dataset,
        configs: &[ValidationConfig],
    ) -> Result<Vec<ValidationResult>> {
        configs
            .iter()
            .map(|config| self.validate_config(dataset, config))
            .collect()
    }

    /// Runs a rule set and pairs each rule with its result.
    pub fn run(&self, dataset: &Dataset, rules: &RuleSet) -> Result<ValidationReport> {
        let results = self.validate_all(dataset, &rules.rules)?;
        let report = ValidationReport::from_parts(
            rules.dataset_name.clone(),
            dataset.len(),
            &rules.rules,
            results,
        );

        tracing::info!(
            "Validated {} rules: {} passed, {} failed",
            report.outcomes.len(),
            report.passed_count(),
            report.failed_count()
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Row, Severity};
    use crate::strategies::NumericalRangeStrategy;

    /// Flags every row regardless of content.
    #[derive(Debug)]
    struct RejectAll;

    impl ValidationStrategy for RejectAll {
        fn name(&self) -> &str {
            "reject_all"
        }

        fn validate(
            &self,
            dataset: &Dataset,
            _column: &str,
            _threshold: Option<f64>,
        ) -> ValidationResult {
            ValidationResult::failed(
                (0..dataset.len()).collect(),
                "rejected",
                Severity::Warning,
            )
        }
    }

    fn sample() -> Dataset {
        Dataset::new(vec![
            Row::new().with("id", 1).with("email", "a@x.com"),
            Row::new().with("id", 2),
            Row::new().with("id", 2).with("email", "c@x.com"),
        ])
    }

    #[test]
    fn test_engine_seeds_builtins() {
        let engine = ValidationEngine::new();
        let names: Vec<&str> = engine.strategy_names().collect();

        assert_eq!(names, vec!["completeness", "numerical_range", "uniqueness"]);
        assert!(ValidationEngine::empty().strategy_names().next().is_none());
    }

    #[test]
    fn test_engine_unknown_strategy_is_error() {
        let engine = ValidationEngine::new();
        let err = engine.validate("regex", &sample(), "email", None).unwrap_err();

        assert!(err.is_unknown_strategy());
        match err {
            DqError::UnknownStrategy { name, available } => {
                assert_eq!(name, "regex");
                assert_eq!(available.len(), 3);
            }
            other => panic!("Expected UnknownStrategy, got {:?}", other),
        }
    }

    #[test]
    fn test_engine_register_custom_strategy() {
        let mut engine = ValidationEngine::new();
        assert!(engine.register_strategy(RejectAll).is_none());
        assert!(engine.has_strategy("reject_all"));

        let result = engine.validate("reject_all", &sample(), "id", None).unwrap();
        assert_eq!(result.failed_row_indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_engine_last_registration_wins() {
        let mut engine = ValidationEngine::new();
        let strict = NumericalRangeStrategy::new().with_default_threshold(0.5);

        let previous = engine.register_strategy(strict);
        assert_eq!(previous.map(|s| s.name().to_string()).as_deref(), Some("numerical_range"));

        let dataset = Dataset::new(
            [1.0, 1.0, 1.0, 2.0]
                .into_iter()
                .map(|v| Row::new().with("value", v))
                .collect(),
        );
        // z of the 2.0 row is sqrt(3) > 0.5, ones sit at -0.577
        let result = engine.validate("numerical_range", &dataset, "value", None).unwrap();
        assert_eq!(result.failed_row_indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_validate_all_keeps_order() {
        let engine = ValidationEngine::new();
        let configs = vec![
            ValidationConfig::new("uniqueness", "id"),
            ValidationConfig::new("completeness", "email"),
            ValidationConfig::new("completeness", "id"),
        ];

        let results = engine.validate_all(&sample(), &configs).unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].failed_row_indices, vec![1, 2]);
        assert_eq!(results[1].failed_row_indices, vec![1]);
        assert!(results[2].is_valid);
    }

    #[test]
    fn test_validate_all_aborts_on_unknown() {
        let engine = ValidationEngine::new();
        let configs = vec![
            ValidationConfig::new("completeness", "email"),
            ValidationConfig::new("pattern", "email"),
        ];

        let err = engine.validate_all(&sample(), &configs).unwrap_err();
        assert!(err.is_unknown_strategy());
    }

    #[test]
    fn test_validate_all_empty_configs() {
        let results = ValidationEngine::new().validate_all(&sample(), &[]).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_run_builds_report() {
        let rules = RuleSet::new()
            .with_dataset_name("users")
            .with_rule(ValidationConfig::new("completeness", "email"))
            .with_rule(ValidationConfig::new("uniqueness", "id"));

        let report = ValidationEngine::new().run(&sample(), &rules).unwrap();

        assert_eq!(report.dataset_name.as_deref(), Some("users"));
        assert_eq!(report.row_count, 3);
        assert_eq!(report.failed_count(), 2);
        assert_eq!(report.outcomes[1].rule.column, "id");
    }
}
