//! Dataset and validation result models.
//!
//! Rows are schema-less: each row maps column names to a tagged
//! [`CellValue`], and a column a row does not carry reads back as
//! [`CellValue::Absent`]. A [`Dataset`] is an ordered sequence of rows whose
//! positional index is the only row identity used in failure reporting.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DqError, Result};

static ABSENT: CellValue = CellValue::Absent;

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// The row has no entry for the column
    Absent,
    /// Explicit null
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Numeric scalar (may be NaN when built programmatically)
    Number(f64),
    /// String scalar, including the empty string
    Text(String),
    /// Nested array or object, kept as its JSON text
    Other(String),
}

impl CellValue {
    /// Returns true for null or absent values.
    pub fn is_null_or_absent(&self) -> bool {
        matches!(self, Self::Null | Self::Absent)
    }

    /// Returns true if the value counts as missing: null, absent, or exactly
    /// the empty string. Whitespace and zero are present values.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Absent | Self::Null => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Returns the numeric value if this is a number that is not NaN.
    ///
    /// Strings are never coerced, so `"10"` is not numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if !n.is_nan() => Some(*n),
            _ => None,
        }
    }
}

impl From<Value> for CellValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            Value::String(s) => Self::Text(s),
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A schema-less row: column name to cell value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: BTreeMap<String, CellValue>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set a column value.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(column, value);
        self
    }

    /// Sets a column value, replacing any previous one.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.insert(column.into(), value.into());
    }

    /// Returns the value for a column, or [`CellValue::Absent`] if the row
    /// has no such column.
    pub fn get(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&ABSENT)
    }

    /// Returns true if the row carries an entry for the column.
    pub fn contains(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Row {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// An ordered, finite sequence of rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    /// Creates a dataset from rows, keeping their order.
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Parses a dataset from a JSON document holding an array of objects.
    ///
    /// # Errors
    /// Returns `DqError::Serialization` for malformed JSON and
    /// `DqError::InvalidDataset` when the document is not an array of objects.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| DqError::serialization("Failed to parse dataset document", e))?;
        Self::try_from(value)
    }

    /// Returns the rows in order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over `(row_index, value)` for one column.
    pub fn column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = (usize, &'a CellValue)> {
        self.rows
            .iter()
            .enumerate()
            .map(move |(index, row)| (index, row.get(column)))
    }

    /// Collects the numeric, non-NaN values of a column in row order.
    pub fn numeric_values(&self, column: &str) -> Vec<f64> {
        self.column(column)
            .filter_map(|(_, value)| value.as_number())
            .collect()
    }
}

impl From<Vec<Row>> for Dataset {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}

impl TryFrom<Value> for Dataset {
    type Error = DqError;

    fn try_from(value: Value) -> Result<Self> {
        let Value::Array(items) = value else {
            return Err(DqError::invalid_dataset(
                "expected a JSON array of row objects",
            ));
        };

        let rows = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(map) => Ok(map.into_iter().collect::<Row>()),
                other => Err(DqError::invalid_dataset(format!(
                    "row {} is a JSON {}, expected an object",
                    index,
                    json_kind(&other)
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rows })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Severity of a validation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, no action needed
    Info,
    /// Worth a look
    Warning,
    /// Needs attention
    Critical,
}

impl Severity {
    /// Grades a failure rate: strictly above `critical_above` is critical,
    /// strictly above `warning_above` is a warning, anything else is info.
    pub fn from_rate(rate: f64, critical_above: f64, warning_above: f64) -> Self {
        if rate > critical_above {
            Self::Critical
        } else if rate > warning_above {
            Self::Warning
        } else {
            Self::Info
        }
    }

    /// Lowercase name as used in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one strategy invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the column passed the rule
    pub is_valid: bool,
    /// Positional indices of offending rows, in discovery order
    pub failed_row_indices: Vec<usize>,
    /// Human-readable summary
    pub message: String,
    /// Severity grade
    pub severity: Severity,
}

impl ValidationResult {
    /// Creates a passing result with info severity.
    pub fn passed(message: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            failed_row_indices: Vec::new(),
            message: message.into(),
            severity: Severity::Info,
        }
    }

    /// Creates a failing result.
    pub fn failed(
        failed_row_indices: Vec<usize>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            is_valid: false,
            failed_row_indices,
            message: message.into(),
            severity,
        }
    }

    /// Number of flagged rows.
    pub fn failure_count(&self) -> usize {
        self.failed_row_indices.len()
    }
}

/// One rule to run: which strategy, on which column, with which threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Registered strategy name
    #[serde(alias = "strategy")]
    pub strategy_name: String,
    /// Column to validate
    pub column: String,
    /// Optional strategy-specific threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

impl ValidationConfig {
    /// Creates a rule without a threshold.
    pub fn new(strategy_name: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            strategy_name: strategy_name.into(),
            column: column.into(),
            threshold: None,
        }
    }

    /// Builder method to set the threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }
}
