//! scheme — named calculi and cross-scheme robustness checks.
//!
//! Purpose
//! -------
//! Give the four standard generator pairings stable names (`calculi`)
//! and check whether an observable's value survives swapping the
//! calculus out from under it (`robustness`). Errors report through
//! [`errors::SchemeError`].
//!
//! Downstream usage
//! ----------------
//! - Application results are passed through [`robustness`] before being
//!   interpreted physically; front-ends import via `scheme::prelude`.

pub mod calculi;
pub mod errors;
pub mod robustness;

pub mod prelude {
    pub use super::calculi::CalculusScheme;
    pub use super::errors::{SchemeError, SchemeResult};
    pub use super::robustness::{
        derivative_across_schemes, scheme_robustness, RobustnessOutcome,
        ROBUSTNESS_SPREAD_THRESHOLD,
    };
}
