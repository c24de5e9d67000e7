//! operators::errors — unified error surface for the operator layer.
//!
//! Purpose
//! -------
//! Collect input-validation failures and non-finite-result diagnostics of
//! the derivative, integral, and linearization operators into one enum
//! with a shared result alias, so callers match on a single type.
//!
//! Conventions
//! -----------
//! - Variants carry the offending value(s); `Display` is implemented by
//!   exhaustive match, in the style of the other error enums in the
//!   crate.

/// Result alias for operator-layer computations.
pub type OperatorResult<T> = Result<T, OperatorError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OperatorError {
    // ---- Evaluation points ----
    /// At least one evaluation point is required.
    EmptyPoints,

    /// Evaluation points must be finite.
    NonFinitePoint {
        index: usize,
        value: f64,
    },

    // ---- Configuration ----
    /// Integration bounds must be finite with a < b.
    InvalidBounds {
        a: f64,
        b: f64,
        reason: &'static str,
    },

    /// Finite-difference step must be positive and finite.
    InvalidStep {
        value: f64,
        reason: &'static str,
    },

    /// Fixed-grid quadrature needs at least three sample points.
    InvalidNPoints {
        n: usize,
        reason: &'static str,
    },

    /// Method name not recognized by `FromStr`.
    UnknownMethod {
        name: String,
    },

    // ---- Results ----
    /// A derivative component came out NaN or infinite.
    NonFiniteDerivative {
        index: usize,
        value: f64,
    },

    /// The quadrature value came out NaN or infinite.
    NonFiniteIntegral {
        value: f64,
    },

    /// The normalizing measure mass vanished, so a mean is undefined.
    ZeroMeasureMass,

    // ---- Linearization ----
    /// The straight-line test needs at least this many samples.
    InsufficientSamples {
        n: usize,
        required: usize,
    },

    /// The regressor axis is degenerate (zero variance after transform).
    DegenerateRegressor,
}

impl std::error::Error for OperatorError {}

impl std::fmt::Display for OperatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperatorError::EmptyPoints => {
                write!(f, "At least one evaluation point is required")
            }
            OperatorError::NonFinitePoint { index, value } => {
                write!(f, "Non-finite evaluation point at index {index}: {value}")
            }
            OperatorError::InvalidBounds { a, b, reason } => {
                write!(f, "Invalid integration bounds [{a}, {b}]: {reason}")
            }
            OperatorError::InvalidStep { value, reason } => {
                write!(f, "Invalid finite-difference step {value}: {reason}")
            }
            OperatorError::InvalidNPoints { n, reason } => {
                write!(f, "Invalid sample count {n}: {reason}")
            }
            OperatorError::UnknownMethod { name } => {
                write!(f, "Unknown method {name:?}")
            }
            OperatorError::NonFiniteDerivative { index, value } => {
                write!(f, "Non-finite derivative at index {index}: {value}")
            }
            OperatorError::NonFiniteIntegral { value } => {
                write!(f, "Non-finite integral value: {value}")
            }
            OperatorError::ZeroMeasureMass => {
                write!(f, "Normalizing measure mass is zero; mean value undefined")
            }
            OperatorError::InsufficientSamples { n, required } => {
                write!(f, "Insufficient samples: {n} provided, {required} required")
            }
            OperatorError::DegenerateRegressor => {
                write!(f, "Degenerate regressor: transformed x-axis has zero variance")
            }
        }
    }
}
