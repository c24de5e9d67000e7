//! applications — physics built on the operator layer.
//!
//! Purpose
//! -------
//! Package the speculative-physics workloads the operator layer exists
//! for: Hawking evaporation with entropy factors (`blackhole`),
//! vacuum-energy suppression across scale hierarchies (`cosmology`), and
//! the decoherence-driven quantum-to-classical spectrum transition
//! (`quantum`). Unit systems live in `units`; every parameter bundle is
//! validated at construction and reports through [`errors::AppError`].
//!
//! Key behaviors
//! -------------
//! - Constructors are the only fallible surface; evaluation methods
//!   either return closed-form scalars or degrade with explicit
//!   `fallback_taken` provenance instead of erroring mid-trajectory.
//! - All formulas take ħ, c, G, k_B from the configured unit system, so
//!   Planck-unit tests and SI workflows share one code path.
//!
//! Downstream usage
//! ----------------
//! - The scheme layer evaluates these observables across calculi to
//!   check robustness; front-ends import via `applications::prelude`.

pub mod blackhole;
pub mod cosmology;
pub mod errors;
pub mod quantum;
pub mod units;

pub mod prelude {
    pub use super::blackhole::{BlackHoleEvolution, EvolutionOutcome, MASS_FLOOR_FRACTION};
    pub use super::cosmology::CosmologicalSuppression;
    pub use super::errors::{AppError, AppResult};
    pub use super::quantum::QuantumClassicalTransition;
    pub use super::units::UnitSystem;
}
