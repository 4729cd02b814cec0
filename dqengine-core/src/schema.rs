//! JSON Schema validation for rule-set documents.
//!
//! Rule files are checked against an embedded schema before they are
//! deserialized, so structural mistakes (a missing `column`, a string
//! threshold, an unexpected top-level key) are reported with the schema's
//! own messages instead of a bare serde error. Value-level checks such as
//! positive thresholds live in [`RuleSet::validate`](crate::config::RuleSet::validate).
//!
//! # Example
//! ```rust
//! use dqengine_core::schema::{initialize_rule_schema, validate_rule_document};
//! use serde_json::json;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! initialize_rule_schema()?;
//!
//! let document = json!({
//!     "format_version": "1.0",
//!     "rules": [{"strategy_name": "completeness", "column": "email"}]
//! });
//! validate_rule_document(&document)?;
//! # Ok(())
//! # }
//! ```

use jsonschema::Validator;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

use crate::config::RuleSet;

/// Rule-set document validation errors
#[derive(Debug, Error)]
pub enum RuleSchemaError {
    /// Schema compilation failed during initialization
    #[error("JSON Schema compilation failed: {message}")]
    SchemaCompilation { message: String },

    /// The document does not conform to the schema
    #[error("Rule document validation failed with {error_count} errors: {errors:?}")]
    ValidationFailed {
        error_count: usize,
        errors: Vec<String>,
    },

    /// Unsupported format version detected
    #[error("Unsupported format version '{version}'. Supported versions: {supported:?}")]
    UnsupportedVersion {
        version: String,
        supported: Vec<String>,
    },

    /// JSON parsing error
    #[error("JSON parsing failed: {source}")]
    JsonParsing {
        #[from]
        source: serde_json::Error,
    },
}

/// Supported rule-set format versions
const SUPPORTED_VERSIONS: &[&str] = &["1.0"];

/// Embedded JSON Schema for v1.0 rule sets
const RULE_SCHEMA_V1_0: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "dqengine Rule Set Format v1.0",
  "type": "object",
  "required": ["format_version", "rules"],
  "additionalProperties": false,
  "properties": {
    "format_version": {
      "type": "string",
      "pattern": "^1\\.0$"
    },
    "dataset_name": { "type": ["string", "null"] },
    "rules": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["column"],
        "additionalProperties": false,
        "oneOf": [
          { "required": ["strategy_name"] },
          { "required": ["strategy"] }
        ],
        "properties": {
          "strategy_name": { "type": "string" },
          "strategy": { "type": "string" },
          "column": { "type": "string" },
          "threshold": { "type": ["number", "null"] }
        }
      }
    }
  }
}"#;

/// Compiled rule-set schema (initialized once)
static COMPILED_RULE_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Compiles the embedded rule-set schema and caches it for reuse.
///
/// Calling this more than once is harmless.
///
/// # Errors
/// Returns `RuleSchemaError::SchemaCompilation` if the embedded schema is invalid.
pub fn initialize_rule_schema() -> Result<(), RuleSchemaError> {
    compiled_schema().map(|_| ())
}

fn compiled_schema() -> Result<&'static Validator, RuleSchemaError> {
    if let Some(validator) = COMPILED_RULE_SCHEMA.get() {
        return Ok(validator);
    }

    let schema_json = get_rule_schema_definition()?;
    let compiled =
        jsonschema::validator_for(&schema_json).map_err(|e| RuleSchemaError::SchemaCompilation {
            message: format!("Schema compilation error: {}", e),
        })?;

    // A concurrent initializer may have won; either instance is equivalent
    Ok(COMPILED_RULE_SCHEMA.get_or_init(|| compiled))
}

/// Validates a rule-set document against the embedded schema.
///
/// The format version is checked first so a document from a newer release
/// reports `UnsupportedVersion` rather than a pattern mismatch. Every schema
/// violation is collected into a single `ValidationFailed`.
///
/// # Errors
/// Returns `UnsupportedVersion`, `ValidationFailed`, or `SchemaCompilation`.
pub fn validate_rule_document(document: &Value) -> Result<(), RuleSchemaError> {
    let schema = compiled_schema()?;

    validate_format_version(document)?;

    let errors: Vec<String> = schema
        .iter_errors(document)
        .map(|error| error.to_string())
        .collect();

    if !errors.is_empty() {
        tracing::debug!("Rule document failed {} schema checks", errors.len());
        return Err(RuleSchemaError::ValidationFailed {
            error_count: errors.len(),
            errors,
        });
    }

    Ok(())
}

fn validate_format_version(document: &Value) -> Result<(), RuleSchemaError> {
    let version = document
        .get("format_version")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RuleSchemaError::ValidationFailed {
            error_count: 1,
            errors: vec!["Missing required field 'format_version'".to_string()],
        })?;

    if !SUPPORTED_VERSIONS.contains(&version) {
        return Err(RuleSchemaError::UnsupportedVersion {
            version: version.to_string(),
            supported: SUPPORTED_VERSIONS.iter().map(|s| s.to_string()).collect(),
        });
    }

    Ok(())
}

/// Parses, schema-checks and deserializes a rule-set document.
///
/// Value-level checks are not run; see [`RuleSet::from_json_str`].
///
/// # Errors
/// Returns `JsonParsing` for malformed JSON and the errors of
/// [`validate_rule_document`] for non-conforming documents.
pub fn validate_and_parse_rules(json_str: &str) -> Result<RuleSet, RuleSchemaError> {
    let document: Value = serde_json::from_str(json_str)?;

    validate_rule_document(&document)?;

    let rules: RuleSet = serde_json::from_value(document)?;
    Ok(rules)
}

/// Returns the embedded rule-set schema as a parsed value.
pub fn get_rule_schema_definition() -> Result<Value, RuleSchemaError> {
    serde_json::from_str(RULE_SCHEMA_V1_0).map_err(|e| RuleSchemaError::SchemaCompilation {
        message: format!("Failed to parse embedded schema: {}", e),
    })
}
