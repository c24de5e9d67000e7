//! calculus::errors — typed error surface for generator construction.
//!
//! Purpose
//! -------
//! Collect the constructor-time validation failures of the calculus layer
//! into a single enum with a shared result alias. Runtime evaluation of a
//! generator never errors (the never-throw substitution contract); only
//! constructing a generator with an unusable parameter does.
//!
//! Conventions
//! -----------
//! - Variants carry the offending value and a static reason string, in the
//!   style used across the crate's error enums.
//! - `Display` is implemented by exhaustive match; no error derive macros.

/// Result alias for calculus-layer operations.
pub type CalcResult<T> = Result<T, CalcError>;

#[derive(Debug, Clone, PartialEq)]
pub enum CalcError {
    /// Power generator exponent must be non-zero (zero is not invertible).
    ZeroExponent,

    /// Power generator exponent must be finite.
    InvalidExponent {
        value: f64,
    },

    /// ScaleDependent generator scale must be finite and > 0.
    InvalidScale {
        value: f64,
        reason: &'static str,
    },

    /// Generator name not recognized by `AnyGenerator::from_name`.
    UnknownGenerator {
        name: String,
    },

    /// Named generator requires a numeric parameter that was not supplied.
    MissingParameter {
        name: &'static str,
    },
}

impl std::error::Error for CalcError {}

impl std::fmt::Display for CalcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalcError::ZeroExponent => {
                write!(f, "Power generator exponent must be non-zero")
            }
            CalcError::InvalidExponent { value } => {
                write!(f, "Invalid Power generator exponent {value}: must be finite")
            }
            CalcError::InvalidScale { value, reason } => {
                write!(f, "Invalid ScaleDependent scale {value}: {reason}")
            }
            CalcError::UnknownGenerator { name } => {
                write!(
                    f,
                    "Unknown generator {name:?} (expected 'identity', 'exponential', 'log', \
                     'power', 'reciprocal', 'sqrt', or 'scale_dependent')"
                )
            }
            CalcError::MissingParameter { name } => {
                write!(f, "Generator '{name}' requires a numeric parameter")
            }
        }
    }
}
