//! Error types for the validation engine.
//!
//! Only genuine misconfiguration is an error here. Degenerate inputs (an
//! empty column, a zero standard deviation, an empty dataset) resolve to a
//! normal [`ValidationResult`](crate::models::ValidationResult) with a
//! severity and message describing the case.

use thiserror::Error;

use crate::config::ConfigValidationError;
use crate::schema::RuleSchemaError;

/// Main error type for dqengine operations.
#[derive(Debug, Error)]
pub enum DqError {
    /// A rule referenced a strategy name that is not registered
    #[error("Unknown validation strategy '{name}' (registered: {})", .available.join(", "))]
    UnknownStrategy {
        name: String,
        available: Vec<String>,
    },

    /// Configuration or setup error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A dataset document could not be turned into rows
    #[error("Invalid dataset: {context}")]
    InvalidDataset { context: String },

    /// A rule-set document failed JSON Schema validation
    #[error(transparent)]
    RuleSchema(#[from] RuleSchemaError),

    /// A rule-set parsed but carries invalid values
    #[error("Invalid rule: {0}")]
    InvalidRule(#[from] ConfigValidationError),

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with DqError
pub type Result<T> = std::result::Result<T, DqError>;

impl DqError {
    /// Creates an unknown strategy error listing the registered names
    pub fn unknown_strategy<I, S>(name: impl Into<String>, available: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::UnknownStrategy {
            name: name.into(),
            available: available.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an invalid dataset error
    pub fn invalid_dataset(context: impl Into<String>) -> Self {
        Self::InvalidDataset {
            context: context.into(),
        }
    }

    /// Creates a serialization error with context
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Returns true if this error is an unknown strategy lookup failure.
    pub fn is_unknown_strategy(&self) -> bool {
        matches!(self, Self::UnknownStrategy { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_strategy_message_names_strategy() {
        let error = DqError::unknown_strategy("regex", ["completeness", "uniqueness"]);
        let message = error.to_string();

        assert!(message.contains("'regex'"));
        assert!(message.contains("completeness, uniqueness"));
        assert!(error.is_unknown_strategy());
    }

    #[test]
    fn test_error_creation() {
        let error = DqError::configuration("bins must be at least 1");
        assert!(error.to_string().contains("bins must be at least 1"));
        assert!(!error.is_unknown_strategy());

        let error = DqError::invalid_dataset("row 3 is not an object");
        assert!(error.to_string().contains("row 3"));
    }

    #[test]
    fn test_serialization_error_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = DqError::serialization("dataset document", source);

        assert!(error.to_string().contains("dataset document"));
        assert!(std::error::Error::source(&error).is_some());
    }
}
