//! operators — meta-derivatives, meta-integrals, and the straight-line
//! test.
//!
//! Purpose
//! -------
//! Provide the operator layer that combines generators and weights from
//! `calculus` into non-Newtonian derivative and integral operators, plus
//! the ordinary-least-squares linearization test used to validate scheme
//! choices. Callers supply plain `Fn(f64) -> f64` targets; operators hold
//! only configuration and re-evaluate everything per call.
//!
//! Key behaviors
//! -------------
//! - Finite-difference derivative family with weight-ratio and
//!   generator-chain rescaling, adaptive step refinement, and the
//!   bigeometric form (`derivatives`).
//! - Fixed-grid and adaptive quadrature with explicit, typed fallback
//!   provenance, derived moments, and a method-selecting solver
//!   (`integration`).
//! - OLS linearization with a Student-t slope test (`linearization`).
//! - Shared aliases/constants (`types`) and input checks (`validation`),
//!   all reporting through [`errors::OperatorError`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Operators never panic on caller input; invalid configurations and
//!   non-finite results surface as `OperatorError`.
//! - No operator retains state between calls or shares mutable data; all
//!   are cheap to clone and safe to use from independent call sites.
//!
//! Downstream usage
//! ----------------
//! - The application layer builds its physics quantities from these
//!   operators; the scheme layer compares them across calculi.
//! - Front-ends can import the curated surface via `operators::prelude`.

pub mod derivatives;
pub mod errors;
pub mod integration;
pub mod linearization;
pub mod types;
pub mod validation;

pub mod prelude {
    pub use super::derivatives::{
        auto_step, bigeometric_derivative, finite_difference, AdaptiveMetaDerivative, FdMethod,
        MetaDerivative, StarDerivative, UnifiedDerivative,
    };
    pub use super::errors::{OperatorError, OperatorResult};
    pub use super::integration::{
        IntegralOutcome, MetaIntegral, MetaIntegralSolver, QuadratureMethod, SolverOutcome,
    };
    pub use super::linearization::{straight_line_test, LinearizationOutcome};
    pub use super::types::{Points, Values};
}
