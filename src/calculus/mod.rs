//! calculus — generators, weights, and the numeric safety layer.
//!
//! Purpose
//! -------
//! House the stateless mathematical building blocks of the crate: the
//! invertible generator transforms that define a calculus, the closed-form
//! weight functions that bias operators, and the guarded arithmetic
//! primitives both rely on.
//!
//! Key behaviors
//! -------------
//! - Expose the [`generators::Generator`] trait and its variants, with
//!   name-based runtime construction via [`generators::AnyGenerator`].
//! - Provide physics weight functions (`weights`) sharing one closure
//!   alias, [`weights::WeightFn`], with user-defined weights.
//! - Centralize substitution constants and guarded `div`/`exp`/`ln`
//!   (`safety`) so the never-throw evaluation contract is enforced in one
//!   place.
//!
//! Invariants & assumptions
//! ------------------------
//! - Evaluation of any generator or weight returns a finite value for
//!   finite input; only construction can fail, via
//!   [`errors::CalcError`].
//! - Everything in this module is an immutable value object; no state is
//!   shared or retained between calls.
//!
//! Downstream usage
//! ----------------
//! - The operator layer (`operators`) combines generator pairs and
//!   optional weights into meta-derivatives and meta-integrals.
//! - The scheme layer maps named calculi onto generator pairs.
//! - Front-ends can import the curated surface via `calculus::prelude`.

pub mod errors;
pub mod generators;
pub mod safety;
pub mod weights;

pub mod prelude {
    pub use super::errors::{CalcError, CalcResult};
    pub use super::generators::{
        AnyGenerator, Custom, Exponential, Generator, Identity, Log, Power, Reciprocal,
        ScaleDependent, Sqrt,
    };
    pub use super::safety::EPSILON;
    pub use super::weights::{
        decoherence_weight, horizon_weight, information_weight_qubit, path_integral_weight,
        sensor_confidence_weight, weight_fn, WeightFn,
    };
}
