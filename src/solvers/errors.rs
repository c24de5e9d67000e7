//! solvers::errors — unified error surface for root finding and ODE
//! integration.
//!
//! Purpose
//! -------
//! Normalize bracketing problems, option validation failures, step-size
//! pathologies, and backend (`argmin`) errors into a single enum with a
//! shared result alias, so callers never see raw backend error types.
//!
//! Conventions
//! -----------
//! - `Display` is implemented by exhaustive match; no derive macros.
//! - `argmin::core::Error` is converted at the boundary via downcast, in
//!   the same shape the optimization layer of the reference stack uses.
use argmin::core::{ArgminError, Error};

/// Result alias for solver operations.
pub type SolverResult<T> = Result<T, SolverError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    // ---- Root finding ----
    /// The function does not change sign over [lo, hi].
    NotBracketed {
        lo: f64,
        hi: f64,
    },

    /// Bracket endpoints must be finite with lo < hi.
    InvalidBracket {
        lo: f64,
        hi: f64,
        reason: &'static str,
    },

    /// Root tolerance must be positive and finite.
    InvalidTolerance {
        tol: f64,
        reason: &'static str,
    },

    /// Backend finished without producing a parameter.
    RootMissing,

    // ---- Initial-value problems ----
    /// Integration span must be finite with t0 < t1.
    InvalidSpan {
        t0: f64,
        t1: f64,
        reason: &'static str,
    },

    /// Initial state must be non-empty with finite components.
    InvalidInitialState {
        index: usize,
        value: f64,
    },

    /// rtol/atol must be positive and finite; max_steps must be positive.
    InvalidIvpOptions {
        reason: &'static str,
    },

    /// The right-hand side produced a non-finite component.
    NonFiniteRightHandSide {
        step: usize,
        index: usize,
        value: f64,
    },

    /// Adaptive step control shrank the step below resolvable size.
    StepSizeUnderflow {
        t: f64,
    },

    // ---- Argmin ----
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },
}

impl std::error::Error for SolverError {}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::NotBracketed { lo, hi } => {
                write!(f, "Root not bracketed on [{lo}, {hi}]: no sign change")
            }
            SolverError::InvalidBracket { lo, hi, reason } => {
                write!(f, "Invalid bracket [{lo}, {hi}]: {reason}")
            }
            SolverError::InvalidTolerance { tol, reason } => {
                write!(f, "Invalid root tolerance {tol}: {reason}")
            }
            SolverError::RootMissing => {
                write!(f, "Root solver finished without a best parameter")
            }
            SolverError::InvalidSpan { t0, t1, reason } => {
                write!(f, "Invalid integration span [{t0}, {t1}]: {reason}")
            }
            SolverError::InvalidInitialState { index, value } => {
                write!(f, "Invalid initial state at index {index}: {value}, must be finite")
            }
            SolverError::InvalidIvpOptions { reason } => {
                write!(f, "Invalid IVP options: {reason}")
            }
            SolverError::NonFiniteRightHandSide { step, index, value } => {
                write!(
                    f,
                    "Non-finite right-hand side at step {step}, component {index}: {value}"
                )
            }
            SolverError::StepSizeUnderflow { t } => {
                write!(f, "Step size underflow at t = {t}")
            }
            SolverError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            SolverError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            SolverError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }
        }
    }
}

impl From<Error> for SolverError {
    fn from(original_err: Error) -> Self {
        match original_err.downcast() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => SolverError::InvalidParameter { text },
                ArgminError::ConditionViolated { text } => SolverError::ConditionViolated { text },
                other => SolverError::BackendError { text: other.to_string() },
            },
            Err(err) => SolverError::BackendError { text: err.to_string() },
        }
    }
}
