//! applications::errors — typed error surface for the physics layer.
//!
//! Purpose
//! -------
//! Collect constructor validation failures of the application parameter
//! bundles and funnel operator/solver errors from below into a single
//! enum, so application callers match on one type.
//!
//! Conventions
//! -----------
//! - Constructor errors (bad masses, scales, unit-system names) carry the
//!   offending value; lower-layer failures pass through the `From`
//!   conversions with their original payloads stringified.
use crate::operators::errors::OperatorError;
use crate::solvers::errors::SolverError;

/// Result alias for application-layer operations.
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Unit-system name not recognized.
    InvalidUnitSystem {
        name: String,
    },

    /// Initial mass must be finite and > 0.
    InvalidMass {
        value: f64,
    },

    /// Scale pair must satisfy 0 < ir < uv, both finite.
    InvalidScales {
        uv: f64,
        ir: f64,
        reason: &'static str,
    },

    /// Oscillator frequency must be finite and > 0.
    InvalidFrequency {
        value: f64,
    },

    /// Effective ħ must be finite and > 0.
    InvalidHbar {
        value: f64,
    },

    /// Decoherence time must be finite and > 0.
    InvalidDecoherenceTime {
        value: f64,
    },

    /// Evolution horizon must be finite and > 0.
    InvalidEvolutionSpan {
        value: f64,
    },

    /// Wrapper for operator-layer failures.
    Operator {
        source: OperatorError,
    },

    /// Wrapper for solver-layer failures.
    Solver {
        source: SolverError,
    },
}

impl std::error::Error for AppError {}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::InvalidUnitSystem { name } => {
                write!(
                    f,
                    "Invalid unit system {name:?} (expected 'planck', 'geometric', or 'si')"
                )
            }
            AppError::InvalidMass { value } => {
                write!(f, "Invalid mass {value}: must be finite and > 0")
            }
            AppError::InvalidScales { uv, ir, reason } => {
                write!(f, "Invalid scale pair (uv = {uv}, ir = {ir}): {reason}")
            }
            AppError::InvalidFrequency { value } => {
                write!(f, "Invalid frequency {value}: must be finite and > 0")
            }
            AppError::InvalidHbar { value } => {
                write!(f, "Invalid effective hbar {value}: must be finite and > 0")
            }
            AppError::InvalidDecoherenceTime { value } => {
                write!(f, "Invalid decoherence time {value}: must be finite and > 0")
            }
            AppError::InvalidEvolutionSpan { value } => {
                write!(f, "Invalid evolution span {value}: must be finite and > 0")
            }
            AppError::Operator { source } => {
                write!(f, "Operator error: {source}")
            }
            AppError::Solver { source } => {
                write!(f, "Solver error: {source}")
            }
        }
    }
}

impl From<OperatorError> for AppError {
    fn from(source: OperatorError) -> Self {
        AppError::Operator { source }
    }
}

impl From<SolverError> for AppError {
    fn from(source: SolverError) -> Self {
        AppError::Solver { source }
    }
}
