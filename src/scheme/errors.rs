//! scheme::errors — typed error surface for cross-calculus comparisons.
use crate::operators::errors::OperatorError;
use crate::scheme::calculi::CalculusScheme;

/// Result alias for scheme-layer operations.
pub type SchemeResult<T> = Result<T, SchemeError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SchemeError {
    /// A robustness check needs at least two schemes to compare.
    TooFewSchemes {
        n: usize,
    },

    /// An observable produced NaN/infinity under one scheme.
    NonFiniteValue {
        scheme: CalculusScheme,
        value: f64,
    },

    /// Wrapper for operator-layer failures under a named scheme.
    Operator {
        source: OperatorError,
    },
}

impl std::error::Error for SchemeError {}

impl std::fmt::Display for SchemeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemeError::TooFewSchemes { n } => {
                write!(f, "Robustness check needs at least 2 schemes, got {n}")
            }
            SchemeError::NonFiniteValue { scheme, value } => {
                write!(f, "Observable is non-finite ({value}) under the {scheme:?} scheme")
            }
            SchemeError::Operator { source } => {
                write!(f, "Operator error: {source}")
            }
        }
    }
}

impl From<OperatorError> for SchemeError {
    fn from(source: OperatorError) -> Self {
        SchemeError::Operator { source }
    }
}
