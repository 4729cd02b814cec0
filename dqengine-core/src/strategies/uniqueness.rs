//! Uniqueness validation.
//!
//! Rows are scanned in order while tracking where each value has been seen.
//! The second sighting of a value reports both the first and the current
//! row; later sightings report only the current row. Every row taking part
//! in a duplicate group therefore appears exactly once, in the order the
//! duplicates are discovered. Null and absent values are never tracked.

use std::collections::HashMap;

use crate::models::{CellValue, Dataset, Severity, ValidationResult};

use super::ValidationStrategy;

pub(super) const NAME: &str = "uniqueness";

/// Detects values that occur in more than one row.
///
/// The threshold argument is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniquenessStrategy;

/// Hashable identity of a cell value.
///
/// Numbers compare by value with `-0.0 == 0.0` and all NaNs equal; a number
/// never equals a string with the same digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ValueKey<'a> {
    Bool(bool),
    Number(u64),
    Text(&'a str),
    Other(&'a str),
}

impl<'a> ValueKey<'a> {
    fn from_cell(value: &'a CellValue) -> Option<Self> {
        match value {
            CellValue::Absent | CellValue::Null => None,
            CellValue::Bool(b) => Some(Self::Bool(*b)),
            CellValue::Number(n) => Some(Self::Number(number_bits(*n))),
            CellValue::Text(s) => Some(Self::Text(s)),
            CellValue::Other(s) => Some(Self::Other(s)),
        }
    }
}

fn number_bits(n: f64) -> u64 {
    if n.is_nan() {
        f64::NAN.to_bits()
    } else if n == 0.0 {
        0.0f64.to_bits()
    } else {
        n.to_bits()
    }
}

impl ValidationStrategy for UniquenessStrategy {
    fn name(&self) -> &str {
        NAME
    }

    fn validate(
        &self,
        dataset: &Dataset,
        column: &str,
        _threshold: Option<f64>,
    ) -> ValidationResult {
        let mut seen: HashMap<ValueKey<'_>, Vec<usize>> = HashMap::new();
        let mut failed: Vec<usize> = Vec::new();
        let mut duplicate_values: usize = 0;

        for (index, value) in dataset.column(column) {
            let Some(key) = ValueKey::from_cell(value) else {
                continue;
            };

            let positions = seen.entry(key).or_default();
            match positions.len() {
                0 => {}
                1 => {
                    duplicate_values = duplicate_values.saturating_add(1);
                    failed.push(positions[0]);
                    failed.push(index);
                }
                _ => failed.push(index),
            }
            positions.push(index);
        }

        tracing::trace!(
            "Uniqueness on '{}': {} distinct values, {} duplicated",
            column,
            seen.len(),
            duplicate_values
        );

        if failed.is_empty() {
            return ValidationResult::passed(format!("All values in '{}' are unique", column));
        }

        let message = format!(
            "{} duplicated values across {} rows in '{}'",
            duplicate_values,
            failed.len(),
            column
        );

        ValidationResult::failed(failed, message, Severity::Critical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Row;

    fn dataset_with(values: Vec<CellValue>) -> Dataset {
        Dataset::new(
            values
                .into_iter()
                .map(|value| Row::new().with("key", value))
                .collect(),
        )
    }

    #[test]
    fn test_uniqueness_all_unique() {
        let dataset = dataset_with(vec!["A1".into(), "A2".into(), "A3".into()]);
        let result = UniquenessStrategy.validate(&dataset, "key", None);

        assert!(result.is_valid);
        assert_eq!(result.severity, Severity::Info);
    }

    #[test]
    fn test_uniqueness_pair() {
        let dataset = dataset_with(vec!["A1".into(), "A2".into(), "A3".into(), "A2".into()]);
        let result = UniquenessStrategy.validate(&dataset, "key", None);

        assert!(!result.is_valid);
        assert_eq!(result.failed_row_indices, vec![1, 3]);
        assert_eq!(result.severity, Severity::Critical);
    }

    #[test]
    fn test_uniqueness_triple_reports_each_row_once() {
        let dataset = dataset_with(vec![
            "x".into(),
            "dup".into(),
            "y".into(),
            "dup".into(),
            "dup".into(),
        ]);
        let result = UniquenessStrategy.validate(&dataset, "key", None);

        assert_eq!(result.failed_row_indices, vec![1, 3, 4]);
        assert!(result.message.starts_with("1 duplicated values across 3 rows"));
    }

    #[test]
    fn test_uniqueness_discovery_order_across_groups() {
        // b repeats before a does
        let dataset = dataset_with(vec![
            "a".into(),
            "b".into(),
            "b".into(),
            "a".into(),
        ]);
        let result = UniquenessStrategy.validate(&dataset, "key", None);

        assert_eq!(result.failed_row_indices, vec![1, 2, 0, 3]);
    }

    #[test]
    fn test_uniqueness_null_and_absent_exempt() {
        let dataset = Dataset::new(vec![
            Row::new().with("key", CellValue::Null),
            Row::new().with("key", CellValue::Null),
            Row::new(),
            Row::new(),
        ]);
        let result = UniquenessStrategy.validate(&dataset, "key", None);

        assert!(result.is_valid);
    }

    #[test]
    fn test_uniqueness_empty_strings_are_tracked() {
        let dataset = dataset_with(vec!["".into(), "".into()]);
        let result = UniquenessStrategy.validate(&dataset, "key", None);

        assert_eq!(result.failed_row_indices, vec![0, 1]);
    }

    #[test]
    fn test_uniqueness_number_and_string_differ() {
        let dataset = dataset_with(vec![1.into(), "1".into(), true.into()]);
        let result = UniquenessStrategy.validate(&dataset, "key", None);

        assert!(result.is_valid);
    }

    #[test]
    fn test_uniqueness_signed_zero_and_nan() {
        let dataset = dataset_with(vec![
            CellValue::Number(0.0),
            CellValue::Number(-0.0),
            CellValue::Number(f64::NAN),
            CellValue::Number(-f64::NAN),
        ]);
        let result = UniquenessStrategy.validate(&dataset, "key", None);

        assert_eq!(result.failed_row_indices, vec![0, 1, 2, 3]);
    }
}
