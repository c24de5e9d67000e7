//! calculus::generators — invertible transform objects for meta-calculus.
//!
//! Purpose
//! -------
//! Provide the stateless generator abstraction at the heart of the crate:
//! a pure mathematical function object exposing a forward transform
//! `g(x)`, its derivative `g'(x)`, and its inverse `g⁻¹(y)`. Generators
//! linearize nonlinear relationships before differentiation/integration;
//! derivative and integral operators combine a pair of them (an alpha
//! generator for the argument axis and a beta generator for the value
//! axis) into non-Newtonian calculi.
//!
//! Key behaviors
//! -------------
//! - Define the [`Generator`] trait with scalar `transform` / `derivative`
//!   / `inverse` plus vectorized array helpers.
//! - Implement the closed-form variants: [`Identity`], [`Exponential`],
//!   [`Log`], [`Power`], [`Reciprocal`], [`Sqrt`], [`ScaleDependent`],
//!   and the closure-backed [`Custom`].
//! - Provide [`AnyGenerator`], a runtime-dispatch enum with name-based
//!   construction for bindings and scheme selection.
//!
//! Invariants & assumptions
//! ------------------------
//! - Evaluation never panics and never returns NaN/infinity for finite
//!   input: out-of-domain arguments are substituted with finite
//!   surrogates (`EPSILON` flooring, sign-preserving logs, exponent
//!   clipping). Callers depend on this availability-over-signaling
//!   contract.
//! - Construction is the only fallible step: a zero [`Power`] exponent or
//!   a non-positive [`ScaleDependent`] scale is rejected with a
//!   [`CalcError`] instead of being silently repaired.
//! - Generators are immutable value objects; cloning is cheap and no
//!   state is retained between evaluations.
//!
//! Conventions
//! -----------
//! - `transform`/`derivative`/`inverse` operate on scalars; `*_array`
//!   helpers map them over `ndarray::Array1<f64>`.
//! - Variants with a domain restriction (Log, Sqrt, Power with fractional
//!   exponents, Reciprocal) extend to negative arguments odd-symmetrically
//!   so that each is a bijection on its sign branch.
//!
//! Downstream usage
//! ----------------
//! - `operators::derivatives` and `operators::integration` hold generator
//!   pairs and call `derivative`/`transform` per evaluation point.
//! - `scheme` maps each named calculus scheme to an `(alpha, beta)` pair
//!   of [`AnyGenerator`] values.
//! - The Python bindings construct generators by name via
//!   [`AnyGenerator::from_name`].
//!
//! Testing notes
//! -------------
//! - Unit tests pin the Identity contract (`g = g' = g⁻¹ = id` up to the
//!   constant derivative), mutual inversion of Exponential/Log within
//!   1e-10, substitution behavior on zero/negative input, and the
//!   root-finding inverse of ScaleDependent against its closed form.
use std::sync::Arc;

use ndarray::Array1;

use crate::calculus::errors::{CalcError, CalcResult};
use crate::calculus::safety::{safe_div, safe_exp, safe_ln, EPSILON};
use crate::solvers::root::brent;

/// Generator — a stateless invertible transform with a derivative.
///
/// Purpose
/// -------
/// Capture the `{transform, derivative, inverse}` capability set that
/// meta-derivative and meta-integral operators require from both the
/// alpha (argument) and beta (value) positions. One trait covers both
/// roles; a concrete generator can serve either position.
///
/// Key behaviors
/// -------------
/// - `transform(x)` evaluates `g(x)`.
/// - `derivative(x)` evaluates `g'(x)`.
/// - `inverse(y)` evaluates `g⁻¹(y)`.
/// - Provided `*_array` methods vectorize each operation over an
///   `Array1<f64>`.
///
/// Invariants
/// ----------
/// - All three operations return finite values for finite input (the
///   never-throw substitution contract).
/// - `inverse(transform(x)) ≈ x` on the generator's principal branch,
///   up to the substitution floor.
pub trait Generator {
    /// Forward transform `g(x)`.
    fn transform(&self, x: f64) -> f64;

    /// Derivative `g'(x)`.
    fn derivative(&self, x: f64) -> f64;

    /// Inverse transform `g⁻¹(y)`.
    fn inverse(&self, y: f64) -> f64;

    /// Vectorized forward transform.
    fn transform_array(&self, x: &Array1<f64>) -> Array1<f64> {
        x.mapv(|v| self.transform(v))
    }

    /// Vectorized derivative.
    fn derivative_array(&self, x: &Array1<f64>) -> Array1<f64> {
        x.mapv(|v| self.derivative(v))
    }

    /// Vectorized inverse transform.
    fn inverse_array(&self, y: &Array1<f64>) -> Array1<f64> {
        y.mapv(|v| self.inverse(v))
    }
}

/// Identity generator: `g(x) = x`.
///
/// The classical-calculus generator; using it in both positions reduces
/// every meta-operator to its Newtonian counterpart.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Identity;

impl Generator for Identity {
    fn transform(&self, x: f64) -> f64 {
        x
    }

    fn derivative(&self, _x: f64) -> f64 {
        1.0
    }

    fn inverse(&self, y: f64) -> f64 {
        y
    }
}

/// Exponential generator: `g(x) = e^x`, clipped against `f64` overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Exponential;

impl Generator for Exponential {
    fn transform(&self, x: f64) -> f64 {
        safe_exp(x)
    }

    fn derivative(&self, x: f64) -> f64 {
        safe_exp(x)
    }

    fn inverse(&self, y: f64) -> f64 {
        safe_ln(y)
    }
}

/// Log generator: odd-symmetric guarded `ln`.
///
/// Non-positive input is substituted (`0 → ln(EPSILON)`, negative input
/// carries its sign) rather than rejected; see `calculus::safety::safe_ln`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Log;

impl Generator for Log {
    fn transform(&self, x: f64) -> f64 {
        safe_ln(x)
    }

    fn derivative(&self, x: f64) -> f64 {
        // d/dx sign(x)·ln|x| = 1/|x| away from 0; guarded at the origin.
        safe_div(1.0, x.abs())
    }

    fn inverse(&self, y: f64) -> f64 {
        safe_exp(y)
    }
}

/// Power generator: `g(x) = sign(x)·|x|^p` with a validated non-zero
/// exponent.
///
/// The odd-symmetric form keeps fractional exponents real-valued on
/// negative input and makes the generator a bijection on all of ℝ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Power {
    exponent: f64,
}

impl Power {
    /// Construct a Power generator, rejecting zero or non-finite
    /// exponents.
    ///
    /// Returns
    /// -------
    /// `CalcResult<Power>`
    ///   - `Ok(Power)` for a finite, non-zero exponent.
    ///   - `Err(CalcError::ZeroExponent)` when `exponent == 0.0` (the map
    ///     would collapse to a constant and lose invertibility).
    ///   - `Err(CalcError::InvalidExponent { .. })` for NaN/infinite
    ///     exponents.
    pub fn new(exponent: f64) -> CalcResult<Self> {
        if !exponent.is_finite() {
            return Err(CalcError::InvalidExponent { value: exponent });
        }
        if exponent == 0.0 {
            return Err(CalcError::ZeroExponent);
        }
        Ok(Power { exponent })
    }

    /// The validated exponent `p`.
    pub fn exponent(&self) -> f64 {
        self.exponent
    }
}

impl Generator for Power {
    fn transform(&self, x: f64) -> f64 {
        x.signum() * x.abs().max(EPSILON).powf(self.exponent)
    }

    fn derivative(&self, x: f64) -> f64 {
        self.exponent * x.abs().max(EPSILON).powf(self.exponent - 1.0)
    }

    fn inverse(&self, y: f64) -> f64 {
        y.signum() * y.abs().max(EPSILON).powf(1.0 / self.exponent)
    }
}

/// Reciprocal generator: `g(x) = 1/x`, guarded at the origin.
///
/// Self-inverse; used for harmonic-mean style calculi.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Reciprocal;

impl Generator for Reciprocal {
    fn transform(&self, x: f64) -> f64 {
        safe_div(1.0, x)
    }

    fn derivative(&self, x: f64) -> f64 {
        let d = clampsq(x);
        -1.0 / d
    }

    fn inverse(&self, y: f64) -> f64 {
        safe_div(1.0, y)
    }
}

// x² floored at EPSILON² without overflowing the floor itself.
#[inline]
fn clampsq(x: f64) -> f64 {
    let a = x.abs().max(EPSILON);
    a * a
}

/// Sqrt generator: odd-symmetric `g(x) = sign(x)·√|x|`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sqrt;

impl Generator for Sqrt {
    fn transform(&self, x: f64) -> f64 {
        x.signum() * x.abs().sqrt()
    }

    fn derivative(&self, x: f64) -> f64 {
        safe_div(0.5, x.abs().sqrt())
    }

    fn inverse(&self, y: f64) -> f64 {
        y.signum() * y * y
    }
}

/// ScaleDependent — a generator interpolating identity and quadratic
/// growth around a characteristic scale.
///
/// Purpose
/// -------
/// Model scale-dependent calculi where measurements below a scale `ℓ`
/// behave classically and measurements above it are progressively
/// stretched:
///
/// ```text
/// g(x) = x + x·|x| / (2ℓ)
/// ```
///
/// For `|x| ≪ ℓ` the map is approximately the identity; for `|x| ≫ ℓ` it
/// grows quadratically. The map is odd and strictly increasing, hence a
/// bijection on ℝ.
///
/// Key behaviors
/// -------------
/// - `derivative(x) = 1 + |x|/ℓ`, strictly positive everywhere.
/// - `inverse(y)` runs Brent root-finding on `g(x) − y` over a bracket
///   derived from `|y|` and `ℓ`, falling back to the closed-form branch
///   inverse when the root search fails. This is the only non-trivial
///   control flow in the generator layer.
///
/// Invariants
/// ----------
/// - `scale` is finite and strictly positive (validated at
///   construction).
/// - `inverse` returns a finite value for any finite `y`, regardless of
///   which path produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleDependent {
    scale: f64,
}

impl ScaleDependent {
    /// Construct a ScaleDependent generator with a validated scale.
    ///
    /// Errors
    /// ------
    /// - `CalcError::InvalidScale` when `scale` is non-finite or `<= 0`.
    pub fn new(scale: f64) -> CalcResult<Self> {
        if !scale.is_finite() {
            return Err(CalcError::InvalidScale {
                value: scale,
                reason: "scale must be finite",
            });
        }
        if scale <= 0.0 {
            return Err(CalcError::InvalidScale {
                value: scale,
                reason: "scale must be strictly positive",
            });
        }
        Ok(ScaleDependent { scale })
    }

    /// The characteristic scale `ℓ`.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    // Closed-form inverse on the non-negative branch, extended oddly:
    // solve x²/(2ℓ) + x − |y| = 0 for x ≥ 0.
    fn closed_form_inverse(&self, y: f64) -> f64 {
        let l = self.scale;
        let root = l * ((1.0 + 2.0 * y.abs() / l).sqrt() - 1.0);
        y.signum() * root
    }
}

impl Generator for ScaleDependent {
    fn transform(&self, x: f64) -> f64 {
        x + x * x.abs() / (2.0 * self.scale)
    }

    fn derivative(&self, x: f64) -> f64 {
        1.0 + x.abs() / self.scale
    }

    fn inverse(&self, y: f64) -> f64 {
        if !y.is_finite() {
            // Substitute rather than propagate: saturate at the clipped
            // closed form of a large surrogate.
            return self.closed_form_inverse(y.signum() * 1e300);
        }
        // Bracket: |g(x)| >= |x|, so the root lies within |y| + ℓ + 1.
        let hi = y.abs() + self.scale + 1.0;
        match brent(|x| self.transform(x) - y, -hi, hi, 1e-12) {
            Ok(root) if root.is_finite() => root,
            _ => self.closed_form_inverse(y),
        }
    }
}

/// Custom — a generator assembled from a user-supplied closure triple.
///
/// The caller promises that the closures satisfy the generator contract
/// (mutual inversion, finite outputs); this type performs no repair
/// beyond what the closures themselves do.
#[derive(Clone)]
pub struct Custom {
    transform: Arc<dyn Fn(f64) -> f64 + Send + Sync>,
    derivative: Arc<dyn Fn(f64) -> f64 + Send + Sync>,
    inverse: Arc<dyn Fn(f64) -> f64 + Send + Sync>,
}

impl Custom {
    /// Assemble a generator from `(g, g', g⁻¹)` closures.
    pub fn new<F, D, I>(transform: F, derivative: D, inverse: I) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
        D: Fn(f64) -> f64 + Send + Sync + 'static,
        I: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Custom {
            transform: Arc::new(transform),
            derivative: Arc::new(derivative),
            inverse: Arc::new(inverse),
        }
    }
}

impl std::fmt::Debug for Custom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Custom")
    }
}

impl Generator for Custom {
    fn transform(&self, x: f64) -> f64 {
        (self.transform)(x)
    }

    fn derivative(&self, x: f64) -> f64 {
        (self.derivative)(x)
    }

    fn inverse(&self, y: f64) -> f64 {
        (self.inverse)(y)
    }
}

/// AnyGenerator — runtime-dispatch wrapper over every generator variant.
///
/// Purpose
/// -------
/// Give callers that select generators dynamically (scheme tables, the
/// Python bindings) a single concrete type, while statically-typed code
/// keeps using the variant structs directly through generics.
///
/// Key behaviors
/// -------------
/// - Implements [`Generator`] by delegation.
/// - [`AnyGenerator::from_name`] parses a lowercase name plus an optional
///   numeric parameter (required for `power` and `scale_dependent`).
#[derive(Debug, Clone)]
pub enum AnyGenerator {
    Identity(Identity),
    Exponential(Exponential),
    Log(Log),
    Power(Power),
    Reciprocal(Reciprocal),
    Sqrt(Sqrt),
    ScaleDependent(ScaleDependent),
    Custom(Custom),
}

impl AnyGenerator {
    /// Construct a generator from its lowercase name.
    ///
    /// Parameters
    /// ----------
    /// - `name`: one of `"identity"`/`"id"`, `"exponential"`/`"exp"`,
    ///   `"log"`/`"ln"`, `"power"`/`"pow"`, `"reciprocal"`, `"sqrt"`,
    ///   `"scale_dependent"`/`"scale"`.
    /// - `param`: numeric parameter; required for `power` (the exponent)
    ///   and `scale_dependent` (the scale), ignored otherwise.
    ///
    /// Errors
    /// ------
    /// - `CalcError::UnknownGenerator` for an unrecognized name.
    /// - `CalcError::MissingParameter` when `power`/`scale_dependent` is
    ///   requested without `param`.
    /// - Constructor errors of the underlying variant (zero exponent,
    ///   non-positive scale).
    pub fn from_name(name: &str, param: Option<f64>) -> CalcResult<Self> {
        match name.to_lowercase().as_str() {
            "identity" | "id" => Ok(AnyGenerator::Identity(Identity)),
            "exponential" | "exp" => Ok(AnyGenerator::Exponential(Exponential)),
            "log" | "ln" => Ok(AnyGenerator::Log(Log)),
            "power" | "pow" => {
                let p = param.ok_or(CalcError::MissingParameter { name: "power" })?;
                Ok(AnyGenerator::Power(Power::new(p)?))
            }
            "reciprocal" => Ok(AnyGenerator::Reciprocal(Reciprocal)),
            "sqrt" => Ok(AnyGenerator::Sqrt(Sqrt)),
            "scale_dependent" | "scale" => {
                let s =
                    param.ok_or(CalcError::MissingParameter { name: "scale_dependent" })?;
                Ok(AnyGenerator::ScaleDependent(ScaleDependent::new(s)?))
            }
            other => Err(CalcError::UnknownGenerator { name: other.to_string() }),
        }
    }
}

impl Generator for AnyGenerator {
    fn transform(&self, x: f64) -> f64 {
        match self {
            AnyGenerator::Identity(g) => g.transform(x),
            AnyGenerator::Exponential(g) => g.transform(x),
            AnyGenerator::Log(g) => g.transform(x),
            AnyGenerator::Power(g) => g.transform(x),
            AnyGenerator::Reciprocal(g) => g.transform(x),
            AnyGenerator::Sqrt(g) => g.transform(x),
            AnyGenerator::ScaleDependent(g) => g.transform(x),
            AnyGenerator::Custom(g) => g.transform(x),
        }
    }

    fn derivative(&self, x: f64) -> f64 {
        match self {
            AnyGenerator::Identity(g) => g.derivative(x),
            AnyGenerator::Exponential(g) => g.derivative(x),
            AnyGenerator::Log(g) => g.derivative(x),
            AnyGenerator::Power(g) => g.derivative(x),
            AnyGenerator::Reciprocal(g) => g.derivative(x),
            AnyGenerator::Sqrt(g) => g.derivative(x),
            AnyGenerator::ScaleDependent(g) => g.derivative(x),
            AnyGenerator::Custom(g) => g.derivative(x),
        }
    }

    fn inverse(&self, y: f64) -> f64 {
        match self {
            AnyGenerator::Identity(g) => g.inverse(y),
            AnyGenerator::Exponential(g) => g.inverse(y),
            AnyGenerator::Log(g) => g.inverse(y),
            AnyGenerator::Power(g) => g.inverse(y),
            AnyGenerator::Reciprocal(g) => g.inverse(y),
            AnyGenerator::Sqrt(g) => g.inverse(y),
            AnyGenerator::ScaleDependent(g) => g.inverse(y),
            AnyGenerator::Custom(g) => g.inverse(y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The Identity contract (transform, derivative, inverse all trivial).
    // - Mutual inversion of Exponential and Log within 1e-10.
    // - Substitution behavior of Log on non-positive input.
    // - Power/ScaleDependent constructor validation and inverses.
    // - Name-based construction via AnyGenerator::from_name.
    //
    // They intentionally DO NOT cover:
    // - Operator-level behavior (meta-derivatives/integrals have their own
    //   tests in the operators modules).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Pin the Identity generator contract: g(x) = x, g'(x) = 1, g⁻¹(y) = y.
    fn identity_is_trivial_in_all_three_operations() {
        let g = Identity;
        for &x in &[-1e6, -1.0, 0.0, 0.5, 42.0, 1e12] {
            assert_eq!(g.transform(x), x);
            assert_eq!(g.derivative(x), 1.0);
            assert_eq!(g.inverse(x), x);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that Log ∘ Exponential recovers the argument within 1e-10 on a
    // moderate range that avoids exp overflow.
    fn log_of_exponential_recovers_argument() {
        let e = Exponential;
        let l = Log;
        let mut x = -20.0;
        while x <= 20.0 {
            assert!((l.transform(e.transform(x)) - x).abs() < 1e-10, "x = {x}");
            x += 0.5;
        }
    }

    #[test]
    // Purpose
    // -------
    // Confirm the Log substitution contract: finite output on zero and
    // negative input, with the input's sign carried through.
    fn log_substitutes_finite_values_on_non_positive_input() {
        let l = Log;
        assert!(l.transform(0.0).is_finite());
        assert!(l.transform(-3.0).is_finite());
        assert!(l.transform(-3.0) < 0.0);
        assert!(l.derivative(0.0).is_finite());
    }

    #[test]
    // Purpose
    // -------
    // Power::new must reject a zero exponent (the documented propagating
    // constructor error) and non-finite exponents.
    fn power_constructor_rejects_zero_and_non_finite_exponents() {
        assert_eq!(Power::new(0.0).unwrap_err(), CalcError::ZeroExponent);
        assert!(matches!(
            Power::new(f64::NAN).unwrap_err(),
            CalcError::InvalidExponent { .. }
        ));
        assert!(Power::new(2.0).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Power round-trips through its inverse, including on the negative
    // branch of the odd-symmetric extension.
    fn power_inverse_round_trips_both_branches() {
        let g = Power::new(3.0).unwrap();
        for &x in &[-4.0, -0.5, 0.25, 2.0] {
            assert!((g.inverse(g.transform(x)) - x).abs() < 1e-10, "x = {x}");
        }
    }

    #[test]
    // Purpose
    // -------
    // ScaleDependent constructor validation plus agreement between the
    // root-finding inverse and the closed-form branch inverse.
    fn scale_dependent_inverse_matches_closed_form() {
        assert!(matches!(
            ScaleDependent::new(-1.0).unwrap_err(),
            CalcError::InvalidScale { .. }
        ));
        let g = ScaleDependent::new(2.0).unwrap();
        for &x in &[-10.0, -1.0, 0.0, 0.1, 5.0, 50.0] {
            let y = g.transform(x);
            let back = g.inverse(y);
            assert!((back - x).abs() < 1e-8, "x = {x}, back = {back}");
            let cf = g.closed_form_inverse(y);
            assert!((cf - x).abs() < 1e-8, "closed form x = {x}, cf = {cf}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Reciprocal is self-inverse away from the origin and finite at it.
    fn reciprocal_is_self_inverse_and_guarded() {
        let g = Reciprocal;
        assert!((g.inverse(g.transform(4.0)) - 4.0).abs() < 1e-12);
        assert!(g.transform(0.0).is_finite());
        assert!(g.derivative(0.0).is_finite());
    }

    #[test]
    // Purpose
    // -------
    // AnyGenerator::from_name resolves known names, demands parameters where
    // required, and rejects unknown names.
    fn from_name_parses_known_names_and_rejects_unknown() {
        assert!(AnyGenerator::from_name("identity", None).is_ok());
        assert!(AnyGenerator::from_name("EXP", None).is_ok());
        assert!(AnyGenerator::from_name("power", Some(2.0)).is_ok());
        assert!(matches!(
            AnyGenerator::from_name("power", None).unwrap_err(),
            CalcError::MissingParameter { .. }
        ));
        assert!(matches!(
            AnyGenerator::from_name("fourier", None).unwrap_err(),
            CalcError::UnknownGenerator { .. }
        ));
    }

    #[test]
    // Purpose
    // -------
    // Custom generators delegate straight to the supplied closures.
    fn custom_delegates_to_closures() {
        let g = Custom::new(|x| 2.0 * x, |_| 2.0, |y| y / 2.0);
        assert_eq!(g.transform(3.0), 6.0);
        assert_eq!(g.derivative(3.0), 2.0);
        assert_eq!(g.inverse(6.0), 3.0);
    }
}
