//! Core validation engine and statistics for dqengine.
//!
//! This crate checks tabular, schema-less datasets against rule sets using
//! pluggable validation strategies, and provides the statistics behind
//! outlier detection, distribution reports and drift scoring. It is the
//! pure half of the workspace: everything here is synchronous, performs no
//! I/O, and leaves persistence and presentation to the `dqengine` binary.
//!
//! # Guarantees
//! - Strategies never panic on unexpected cell types; such cells simply do
//!   not contribute
//! - Degenerate inputs (empty columns, zero spread) produce results, not errors
//! - Only misconfiguration, such as an unknown strategy name, is an error
//!
//! # Architecture
//! - [`strategies`]: the [`ValidationStrategy`] trait and built-ins
//! - [`engine`]: the named registry that dispatches rules
//! - [`stats`]: summary statistics, histograms and KL divergence
//! - [`config`] and [`schema`]: rule-set documents and their JSON Schema

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod models;
pub mod report;
pub mod schema;
pub mod stats;
pub mod strategies;

// Re-export commonly used types
pub use config::{ConfigValidationError, DriftConfig, RuleSet};
pub use engine::ValidationEngine;
pub use error::{DqError, Result};
pub use models::{CellValue, Dataset, Row, Severity, ValidationConfig, ValidationResult};
pub use report::{RuleOutcome, ValidationReport};
pub use schema::{
    RuleSchemaError, initialize_rule_schema, validate_and_parse_rules, validate_rule_document,
};
pub use stats::{
    DistributionBucket, StatisticalSummary, calculate_stats, calculate_z_score, detect_drift,
    generate_distribution_data,
};
pub use strategies::{
    BuiltinStrategy, CompletenessStrategy, NumericalRangeStrategy, UniquenessStrategy,
    ValidationStrategy,
};
