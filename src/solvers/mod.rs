//! solvers — root finding and initial-value integration.
//!
//! Purpose
//! -------
//! Provide the two numerical backends the rest of the crate composes:
//! Brent root finding over a validated bracket (`root`) and an adaptive
//! Dormand–Prince RK45 integrator (`ivp`). Both expose typed errors via
//! [`errors::SolverError`] and never panic on bad input.
//!
//! Downstream usage
//! ----------------
//! - `calculus::generators` uses `root::brent` for the `ScaleDependent`
//!   inverse (with a closed-form fallback on bracketing failure).
//! - `applications::blackhole` drives `ivp::solve_ivp` for the coupled
//!   mass/entropy evolution.

pub mod errors;
pub mod ivp;
pub mod root;

pub mod prelude {
    pub use super::errors::{SolverError, SolverResult};
    pub use super::ivp::{solve_ivp, IvpOptions, IvpSolution, IvpStatus};
    pub use super::root::brent;
}
