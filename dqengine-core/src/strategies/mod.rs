//! Validation strategies.
//!
//! Each strategy is a pure function from `(dataset, column, threshold)` to a
//! fresh [`ValidationResult`]. Strategies are interchangeable behind the
//! [`ValidationStrategy`] trait and are looked up by their declared name in
//! the [`ValidationEngine`](crate::engine::ValidationEngine) registry.
//!
//! - **Completeness**: null, absent, or empty-string values
//! - **Numerical range**: z-score outliers among numeric values
//! - **Uniqueness**: values appearing in more than one row

mod completeness;
mod numerical_range;
mod uniqueness;

use std::fmt;

use crate::models::{Dataset, ValidationResult};

pub use completeness::CompletenessStrategy;
pub use numerical_range::{DEFAULT_Z_THRESHOLD, NumericalRangeStrategy};
pub use uniqueness::UniquenessStrategy;

/// Common contract for a validation rule implementation.
///
/// Implementations must not panic on unexpected cell types: values a
/// strategy cannot interpret simply do not contribute.
pub trait ValidationStrategy: fmt::Debug + Send + Sync {
    /// Name the strategy is registered under.
    fn name(&self) -> &str;

    /// Validates one column of the dataset.
    fn validate(&self, dataset: &Dataset, column: &str, threshold: Option<f64>)
    -> ValidationResult;
}

/// The strategies every engine starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinStrategy {
    /// [`CompletenessStrategy`]
    Completeness,
    /// [`NumericalRangeStrategy`]
    NumericalRange,
    /// [`UniquenessStrategy`]
    Uniqueness,
}

impl BuiltinStrategy {
    /// Every built-in, in registration order.
    pub const ALL: [Self; 3] = [Self::Completeness, Self::NumericalRange, Self::Uniqueness];

    /// Registry name of the built-in.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Completeness => completeness::NAME,
            Self::NumericalRange => numerical_range::NAME,
            Self::Uniqueness => uniqueness::NAME,
        }
    }

    /// Builds a boxed instance with default settings.
    pub fn instantiate(&self) -> Box<dyn ValidationStrategy> {
        match self {
            Self::Completeness => Box::new(CompletenessStrategy),
            Self::NumericalRange => Box::new(NumericalRangeStrategy::default()),
            Self::Uniqueness => Box::new(UniquenessStrategy),
        }
    }

    /// Looks up a built-in by registry name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|builtin| builtin.name() == name)
    }
}

impl fmt::Display for BuiltinStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Share of `failed` over `total`, 0 when `total` is 0.
fn failure_rate(failed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        failed as f64 / total as f64
    }
}
