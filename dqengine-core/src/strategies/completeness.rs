//! Completeness validation.
//!
//! Flags rows whose value for a column is null, absent, or exactly the empty
//! string. Whitespace-only strings and zero are present values.

use crate::models::{Dataset, Severity, ValidationResult};

use super::{ValidationStrategy, failure_rate};

pub(super) const NAME: &str = "completeness";

/// Failure rates above this are critical.
const CRITICAL_RATE: f64 = 0.10;
/// Failure rates above this are warnings.
const WARNING_RATE: f64 = 0.01;

/// Detects missing values in a column.
///
/// The threshold argument is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletenessStrategy;

impl ValidationStrategy for CompletenessStrategy {
    fn name(&self) -> &str {
        NAME
    }

    fn validate(
        &self,
        dataset: &Dataset,
        column: &str,
        _threshold: Option<f64>,
    ) -> ValidationResult {
        // An empty dataset has nothing missing: vacuously valid.
        if dataset.is_empty() {
            return ValidationResult::passed(format!(
                "Column '{}' is complete (dataset is empty)",
                column
            ));
        }

        let failed: Vec<usize> = dataset
            .column(column)
            .filter(|(_, value)| value.is_missing())
            .map(|(index, _)| index)
            .collect();

        let rate = failure_rate(failed.len(), dataset.len());
        tracing::trace!(
            "Completeness on '{}': {} of {} rows missing",
            column,
            failed.len(),
            dataset.len()
        );

        if failed.is_empty() {
            return ValidationResult::passed(format!("Column '{}' is complete", column));
        }

        let message = format!(
            "{} of {} rows missing a value in '{}' ({:.2}%)",
            failed.len(),
            dataset.len(),
            column,
            rate * 100.0
        );
        let severity = Severity::from_rate(rate, CRITICAL_RATE, WARNING_RATE);

        ValidationResult::failed(failed, message, severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellValue, Row};

    fn dataset_with(values: Vec<CellValue>) -> Dataset {
        Dataset::new(
            values
                .into_iter()
                .map(|value| Row::new().with("id", 1).with("email", value))
                .collect(),
        )
    }

    #[test]
    fn test_completeness_all_present() {
        let dataset = dataset_with(vec!["a@x.com".into(), "b@x.com".into(), "c@x.com".into()]);
        let result = CompletenessStrategy.validate(&dataset, "email", None);

        assert!(result.is_valid);
        assert!(result.failed_row_indices.is_empty());
        assert_eq!(result.severity, Severity::Info);
    }

    #[test]
    fn test_completeness_flags_null_absent_and_empty() {
        let dataset = Dataset::new(vec![
            Row::new().with("email", "a@x.com"),
            Row::new().with("email", CellValue::Null),
            Row::new().with("id", 3),
            Row::new().with("email", ""),
            Row::new().with("email", "e@x.com"),
        ]);

        let result = CompletenessStrategy.validate(&dataset, "email", None);

        assert!(!result.is_valid);
        assert_eq!(result.failed_row_indices, vec![1, 2, 3]);
        assert_eq!(result.severity, Severity::Critical);
        assert!(result.message.contains("3 of 5"));
    }

    #[test]
    fn test_completeness_whitespace_and_zero_not_missing() {
        let dataset = dataset_with(vec!["  ".into(), "\t".into(), 0.into(), false.into()]);
        let result = CompletenessStrategy.validate(&dataset, "email", None);

        assert!(result.is_valid);
    }

    #[test]
    fn test_completeness_empty_dataset_is_valid() {
        let result = CompletenessStrategy.validate(&Dataset::default(), "email", None);

        assert!(result.is_valid);
        assert!(result.failed_row_indices.is_empty());
        assert_eq!(result.severity, Severity::Info);
    }

    #[test]
    fn test_completeness_warning_tier() {
        // 1 missing in 50 rows = 2% -> warning
        let mut values: Vec<CellValue> = (0..49).map(|i| CellValue::from(i)).collect();
        values.push(CellValue::Null);

        let result = CompletenessStrategy.validate(&dataset_with(values), "email", None);

        assert!(!result.is_valid);
        assert_eq!(result.failed_row_indices, vec![49]);
        assert_eq!(result.severity, Severity::Warning);
    }

    #[test]
    fn test_completeness_info_tier_for_low_rate() {
        // 1 missing in 200 rows = 0.5% -> still invalid, but info
        let mut values: Vec<CellValue> = (0..199).map(|i| CellValue::from(i)).collect();
        values.insert(0, CellValue::from(""));

        let result = CompletenessStrategy.validate(&dataset_with(values), "email", None);

        assert!(!result.is_valid);
        assert_eq!(result.failed_row_indices, vec![0]);
        assert_eq!(result.severity, Severity::Info);
    }

    #[test]
    fn test_completeness_missing_column_everywhere() {
        let dataset = dataset_with(vec!["a".into(), "b".into()]);
        let result = CompletenessStrategy.validate(&dataset, "phone", None);

        assert_eq!(result.failed_row_indices, vec![0, 1]);
        assert_eq!(result.severity, Severity::Critical);
    }
}
