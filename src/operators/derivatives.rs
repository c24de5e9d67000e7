//! operators::derivatives — the meta-derivative operator family.
//!
//! Purpose
//! -------
//! Generalize the classical derivative by rescaling a finite-difference
//! derivative of a user-supplied function with weight ratios and/or
//! generator chain-rule factors. Four operators share one finite-difference
//! core:
//!
//! - [`MetaDerivative`]: weight-ratio rescaling `(v(x)/u(x)) · f'(x)`.
//! - [`StarDerivative`]: generator chain rule `β'(f(x)) · f'(x) / α'(x)`.
//! - [`UnifiedDerivative`]: both, `(v(f(x))/u(x)) · β'(f(x)) · f'(x) / α'(x)`.
//! - [`AdaptiveMetaDerivative`]: the unified form with a shrinking-step
//!   sequence and Richardson extrapolation.
//!
//! Key behaviors
//! -------------
//! - Finite differences come in central, forward, and backward flavors
//!   ([`FdMethod`]); the step is auto-selected as ~1% of the minimum point
//!   spacing, or a `1e-8` relative step for a single point.
//! - Every denominator (weights, generator derivatives, the step itself)
//!   is clamped away from zero with the shared substitution floor before
//!   division.
//! - The adaptive operator tries shrinking steps, Richardson-extrapolates
//!   the two smallest successful results, falls back to the best single
//!   finite value, and finally to the non-adaptive path when every step
//!   fails.
//!
//! Invariants & assumptions
//! ------------------------
//! - Operators hold only generator/weight references plus configuration;
//!   no state survives between calls and nothing is cached, so every
//!   invocation re-evaluates the target function from scratch.
//! - Input validation (finite points, positive step) happens before any
//!   function evaluation; validation failures surface as
//!   [`OperatorError`], never panics.
//! - A non-finite rescaled derivative is reported with its index rather
//!   than silently stored.
//!
//! Conventions
//! -----------
//! - Weight slots default to the constant 1 when absent, so an operator
//!   with no weights degenerates to its purely generator-driven form.
//! - `differentiate` takes `dx: Option<f64>`; `None` selects the
//!   automatic step.
//!
//! Downstream usage
//! ----------------
//! - The scheme layer instantiates [`UnifiedDerivative`] per named
//!   calculus.
//! - The quantum application reads its coherence decay rate off a
//!   [`StarDerivative`] under `(Identity, Log)`.
//! - [`bigeometric_derivative`] backs the black-hole Hawking-temperature
//!   regularization check.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the classical limit (identity weights on `x²` within
//!   1% of `2x`), the geometric star derivative of `e^x` (constant 1),
//!   Richardson improvement over a deliberately coarse step, and the
//!   bigeometric `e^{-1}` value on `1/x`-type laws.
use std::str::FromStr;

use crate::calculus::generators::Generator;
use crate::calculus::safety::{safe_div, safe_exp};
use crate::calculus::weights::WeightFn;
use crate::operators::errors::{OperatorError, OperatorResult};
use crate::operators::types::{
    Points, Values, ADAPTIVE_STEP_FACTORS, DEFAULT_STEP_FRACTION, SINGLE_POINT_RELATIVE_STEP,
};
use crate::operators::validation::{validate_points, validate_step};

/// Finite-difference stencil flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FdMethod {
    /// Two-sided stencil, second-order accurate. The default.
    #[default]
    Central,
    /// One-sided forward stencil, first-order accurate.
    Forward,
    /// One-sided backward stencil, first-order accurate.
    Backward,
}

impl FromStr for FdMethod {
    type Err = OperatorError;

    fn from_str(s: &str) -> OperatorResult<Self> {
        match s.to_lowercase().as_str() {
            "central" => Ok(FdMethod::Central),
            "forward" => Ok(FdMethod::Forward),
            "backward" => Ok(FdMethod::Backward),
            other => Err(OperatorError::UnknownMethod { name: other.to_string() }),
        }
    }
}

/// Automatic step selection for a point set.
///
/// Multiple points: 1% of the minimum absolute spacing between
/// consecutive points (ignoring zero spacings from duplicates). A single
/// point: `1e-8 · max(|x|, 1)`.
pub fn auto_step(points: &Points) -> f64 {
    if points.len() < 2 {
        return SINGLE_POINT_RELATIVE_STEP * points[0].abs().max(1.0);
    }
    let mut min_spacing = f64::MAX;
    for i in 1..points.len() {
        let d = (points[i] - points[i - 1]).abs();
        if d > 0.0 && d < min_spacing {
            min_spacing = d;
        }
    }
    if min_spacing == f64::MAX {
        // All points coincide; degrade to the single-point rule.
        return SINGLE_POINT_RELATIVE_STEP * points[0].abs().max(1.0);
    }
    DEFAULT_STEP_FRACTION * min_spacing
}

// One finite-difference evaluation at a scalar point.
#[inline]
fn fd_scalar<F: Fn(f64) -> f64>(f: &F, x: f64, dx: f64, method: FdMethod) -> f64 {
    match method {
        FdMethod::Central => (f(x + dx) - f(x - dx)) / (2.0 * dx),
        FdMethod::Forward => (f(x + dx) - f(x)) / dx,
        FdMethod::Backward => (f(x) - f(x - dx)) / dx,
    }
}

/// Plain finite-difference derivative of `f` at `points`.
///
/// The unrescaled core shared by every operator in this module. `dx` of
/// `None` selects [`auto_step`]. The result is validated for finiteness;
/// the first offending index is reported.
pub fn finite_difference<F: Fn(f64) -> f64>(
    f: &F, points: &Points, dx: Option<f64>, method: FdMethod,
) -> OperatorResult<Values> {
    validate_points(points)?;
    let dx = match dx {
        Some(v) => {
            validate_step(v)?;
            v
        }
        None => auto_step(points),
    };
    let out = points.mapv(|x| fd_scalar(f, x, dx, method));
    for (index, &value) in out.iter().enumerate() {
        if !value.is_finite() {
            return Err(OperatorError::NonFiniteDerivative { index, value });
        }
    }
    Ok(out)
}

// Evaluate an optional weight, defaulting to 1.
#[inline]
fn eval_weight(w: &Option<WeightFn>, x: f64) -> f64 {
    match w {
        Some(f) => f(x),
        None => 1.0,
    }
}

/// MetaDerivative — weight-ratio rescaled finite-difference derivative.
///
/// Purpose
/// -------
/// Compute `D f(x) = (v(x)/u(x)) · f'(x)`, biasing the classical
/// derivative by a ratio of weight functions. With both weight slots
/// empty this is exactly the classical finite-difference derivative.
///
/// Invariants
/// ----------
/// - Stateless apart from configuration; every call recomputes from
///   scratch.
/// - `u(x)` is clamped away from zero before division.
#[derive(Clone, Default)]
pub struct MetaDerivative {
    u: Option<WeightFn>,
    v: Option<WeightFn>,
    method: FdMethod,
}

impl MetaDerivative {
    /// Unweighted operator with the given stencil.
    pub fn new(method: FdMethod) -> Self {
        MetaDerivative { u: None, v: None, method }
    }

    /// Operator with denominator weight `u` and numerator weight `v`.
    pub fn with_weights(u: Option<WeightFn>, v: Option<WeightFn>, method: FdMethod) -> Self {
        MetaDerivative { u, v, method }
    }

    /// Differentiate `f` at `points` with step `dx` (`None` = automatic).
    pub fn differentiate<F: Fn(f64) -> f64>(
        &self, f: F, points: &Points, dx: Option<f64>,
    ) -> OperatorResult<Values> {
        let fd = finite_difference(&f, points, dx, self.method)?;
        let mut out = Values::zeros(points.len());
        for (i, (&x, &d)) in points.iter().zip(fd.iter()).enumerate() {
            let scale = safe_div(eval_weight(&self.v, x), eval_weight(&self.u, x));
            let value = scale * d;
            if !value.is_finite() {
                return Err(OperatorError::NonFiniteDerivative { index: i, value });
            }
            out[i] = value;
        }
        Ok(out)
    }
}

/// StarDerivative — generator chain-rule derivative.
///
/// Purpose
/// -------
/// Compute the non-Newtonian star derivative in β-space slope form,
///
/// ```text
/// D* f(x) = β'(f(x)) · f'(x) / α'(x)
/// ```
///
/// which is the rate of change of `β(f)` with respect to `α(x)`. With
/// Identity generators in both positions this reduces to the classical
/// derivative; with `(Identity, Log)` it is the logarithmic (geometric)
/// rate `f'/f`.
#[derive(Debug, Clone)]
pub struct StarDerivative<A: Generator, B: Generator> {
    alpha: A,
    beta: B,
    method: FdMethod,
}

impl<A: Generator, B: Generator> StarDerivative<A, B> {
    pub fn new(alpha: A, beta: B, method: FdMethod) -> Self {
        StarDerivative { alpha, beta, method }
    }

    /// Differentiate `f` at `points` with step `dx` (`None` = automatic).
    pub fn differentiate<F: Fn(f64) -> f64>(
        &self, f: F, points: &Points, dx: Option<f64>,
    ) -> OperatorResult<Values> {
        let fd = finite_difference(&f, points, dx, self.method)?;
        let mut out = Values::zeros(points.len());
        for (i, (&x, &d)) in points.iter().zip(fd.iter()).enumerate() {
            let fx = f(x);
            let value = safe_div(self.beta.derivative(fx) * d, self.alpha.derivative(x));
            if !value.is_finite() {
                return Err(OperatorError::NonFiniteDerivative { index: i, value });
            }
            out[i] = value;
        }
        Ok(out)
    }
}

/// UnifiedDerivative — generator chain rule plus weight ratio.
///
/// Purpose
/// -------
/// The most general operator of the family:
///
/// ```text
/// D f(x) = (v(f(x)) / u(x)) · β'(f(x)) · f'(x) / α'(x)
/// ```
///
/// Note the numerator weight is evaluated at the function value `f(x)`
/// (value-space bias), while the denominator weight is evaluated at the
/// argument `x` (coordinate-space bias). Empty weight slots default to 1,
/// reducing to [`StarDerivative`].
#[derive(Clone)]
pub struct UnifiedDerivative<A: Generator, B: Generator> {
    alpha: A,
    beta: B,
    u: Option<WeightFn>,
    v: Option<WeightFn>,
    method: FdMethod,
}

impl<A: Generator, B: Generator> UnifiedDerivative<A, B> {
    pub fn new(
        alpha: A, beta: B, u: Option<WeightFn>, v: Option<WeightFn>, method: FdMethod,
    ) -> Self {
        UnifiedDerivative { alpha, beta, u, v, method }
    }

    // Rescaled finite difference at one point with an explicit step.
    fn rescaled_at<F: Fn(f64) -> f64>(&self, f: &F, x: f64, dx: f64) -> f64 {
        let d = fd_scalar(f, x, dx, self.method);
        let fx = f(x);
        let weight = safe_div(eval_weight(&self.v, fx), eval_weight(&self.u, x));
        weight * safe_div(self.beta.derivative(fx) * d, self.alpha.derivative(x))
    }

    /// Differentiate `f` at `points` with step `dx` (`None` = automatic).
    pub fn differentiate<F: Fn(f64) -> f64>(
        &self, f: F, points: &Points, dx: Option<f64>,
    ) -> OperatorResult<Values> {
        validate_points(points)?;
        let dx = match dx {
            Some(v) => {
                validate_step(v)?;
                v
            }
            None => auto_step(points),
        };
        let mut out = Values::zeros(points.len());
        for (i, &x) in points.iter().enumerate() {
            let value = self.rescaled_at(&f, x, dx);
            if !value.is_finite() {
                return Err(OperatorError::NonFiniteDerivative { index: i, value });
            }
            out[i] = value;
        }
        Ok(out)
    }
}

/// AdaptiveMetaDerivative — shrinking steps with Richardson extrapolation.
///
/// Purpose
/// -------
/// Wrap a [`UnifiedDerivative`] with per-point step refinement: a fixed
/// sequence of shrinking step multipliers is tried, and the two smallest
/// steps that produced finite values are Richardson-extrapolated. When
/// extrapolation is impossible the best single finite value (smallest
/// successful step) is used; when every step fails the non-adaptive
/// operator is invoked as the final fallback.
///
/// Notes
/// -----
/// - For a central stencil the leading error is O(dx²), so extrapolating
///   steps with ratio `r` uses `(r²·d_small − d_large)/(r² − 1)`.
/// - Nothing is cached between calls; each point re-evaluates the target
///   function for every step in the sequence.
#[derive(Clone)]
pub struct AdaptiveMetaDerivative<A: Generator, B: Generator> {
    inner: UnifiedDerivative<A, B>,
}

impl<A: Generator, B: Generator> AdaptiveMetaDerivative<A, B> {
    pub fn new(inner: UnifiedDerivative<A, B>) -> Self {
        AdaptiveMetaDerivative { inner }
    }

    /// Differentiate `f` at `points`, refining the step per point.
    pub fn differentiate<F: Fn(f64) -> f64>(
        &self, f: F, points: &Points, dx: Option<f64>,
    ) -> OperatorResult<Values> {
        validate_points(points)?;
        let base_dx = match dx {
            Some(v) => {
                validate_step(v)?;
                v
            }
            None => auto_step(points),
        };

        let mut out = Values::zeros(points.len());
        for (i, &x) in points.iter().enumerate() {
            out[i] = match self.adaptive_at(&f, x, base_dx) {
                Some(value) => value,
                // Every step failed: fall back to the non-adaptive path
                // for the whole point set, as the last resort.
                None => {
                    return self.inner.differentiate(f, points, Some(base_dx));
                }
            };
        }
        Ok(out)
    }

    // Try the shrinking step sequence at one point. Returns None when no
    // step produced a finite value.
    fn adaptive_at<F: Fn(f64) -> f64>(&self, f: &F, x: f64, base_dx: f64) -> Option<f64> {
        // (step, value) pairs for finite results, in shrinking-step order.
        let mut successes: Vec<(f64, f64)> = Vec::with_capacity(ADAPTIVE_STEP_FACTORS.len());
        for &factor in ADAPTIVE_STEP_FACTORS.iter() {
            let dx = base_dx * factor;
            let value = self.inner.rescaled_at(f, x, dx);
            if value.is_finite() {
                successes.push((dx, value));
            }
        }
        match successes.len() {
            0 => None,
            1 => Some(successes[0].1),
            n => {
                let (h_small, d_small) = successes[n - 1];
                let (h_large, d_large) = successes[n - 2];
                let r = h_large / h_small;
                let r2 = r * r;
                let extrapolated = (r2 * d_small - d_large) / (r2 - 1.0);
                if extrapolated.is_finite() {
                    Some(extrapolated)
                } else {
                    Some(d_small)
                }
            }
        }
    }
}

/// Bigeometric derivative `exp(x · f'(x) / f(x))` at a scalar point.
///
/// The classic Grossman–Katz multiplicative form. For any power law
/// `f(x) = c·xᵏ` the value is the constant `eᵏ`; in particular the
/// Hawking temperature `T_H ∝ 1/M` has bigeometric derivative `e⁻¹`
/// everywhere, which is how the black-hole application regularizes the
/// classical `dT/dM` divergence at small mass.
pub fn bigeometric_derivative<F: Fn(f64) -> f64>(f: &F, x: f64, dx: Option<f64>) -> f64 {
    let dx = dx.unwrap_or(SINGLE_POINT_RELATIVE_STEP * x.abs().max(1.0));
    let d = fd_scalar(f, x, dx, FdMethod::Central);
    safe_exp(x * safe_div(d, f(x)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculus::generators::{Identity, Log};
    use crate::calculus::weights::weight_fn;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The classical limit of MetaDerivative on f(x) = x² (within 1%).
    // - Weight-ratio rescaling of MetaDerivative.
    // - The geometric star derivative of e^x (constant 1).
    // - Adaptive refinement beating a deliberately coarse base step.
    // - The bigeometric e⁻¹ constant on a 1/x law.
    // - FdMethod parsing and the non-finite-derivative error path.
    //
    // They intentionally DO NOT cover:
    // - Scheme-level comparisons across calculi (see the scheme module).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // With no weights, MetaDerivative on f(x) = x² at [1, 2, 3, 4, 5] must
    // match the analytic 2x within 1% relative tolerance.
    fn meta_derivative_matches_classical_on_quadratic() {
        // Arrange
        let op = MetaDerivative::new(FdMethod::Central);
        let points = array![1.0, 2.0, 3.0, 4.0, 5.0];

        // Act
        let d = op.differentiate(|x| x * x, &points, None).unwrap();

        // Assert
        for (i, &x) in points.iter().enumerate() {
            let exact = 2.0 * x;
            assert!(((d[i] - exact) / exact).abs() < 0.01, "point {x}");
        }
    }

    #[test]
    // Purpose
    // -------
    // The weight ratio v/u multiplies the classical derivative pointwise.
    fn meta_derivative_applies_weight_ratio() {
        // Arrange: v(x) = x², u(x) = x, so the ratio is x.
        let op = MetaDerivative::with_weights(
            Some(weight_fn(|x| x)),
            Some(weight_fn(|x| x * x)),
            FdMethod::Central,
        );
        let points = array![1.0, 2.0, 4.0];

        // Act
        let d = op.differentiate(|x| x * x, &points, None).unwrap();

        // Assert: expected 2x · x = 2x².
        for (i, &x) in points.iter().enumerate() {
            let exact = 2.0 * x * x;
            assert!(((d[i] - exact) / exact).abs() < 0.01, "point {x}");
        }
    }

    #[test]
    // Purpose
    // -------
    // The (Identity, Log) star derivative of e^x is the logarithmic rate
    // f'/f = 1, constant across points.
    fn star_derivative_of_exponential_is_constant_one() {
        let op = StarDerivative::new(Identity, Log, FdMethod::Central);
        let points = array![0.5, 1.0, 2.0, 3.0];
        let d = op.differentiate(|x: f64| x.exp(), &points, None).unwrap();
        for &v in d.iter() {
            assert!((v - 1.0).abs() < 1e-4, "value {v}");
        }
    }

    #[test]
    // Purpose
    // -------
    // With identity generators and a unit weight pair, UnifiedDerivative
    // agrees with the classical derivative.
    fn unified_derivative_reduces_to_classical() {
        let op = UnifiedDerivative::new(Identity, Identity, None, None, FdMethod::Central);
        let points = array![1.0, 2.0, 3.0];
        let d = op.differentiate(|x| x * x * x, &points, None).unwrap();
        for (i, &x) in points.iter().enumerate() {
            let exact = 3.0 * x * x;
            assert!(((d[i] - exact) / exact).abs() < 0.01, "point {x}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Richardson extrapolation over the shrinking-step sequence beats the
    // non-adaptive result at the same (deliberately coarse) base step.
    fn adaptive_derivative_improves_on_coarse_step() {
        // Arrange
        let inner = UnifiedDerivative::new(Identity, Identity, None, None, FdMethod::Central);
        let adaptive = AdaptiveMetaDerivative::new(inner.clone());
        let points = array![1.0];
        let coarse = 0.5;
        let exact = 3.0; // d/dx x³ at 1

        // Act
        let plain = inner.differentiate(|x| x * x * x, &points, Some(coarse)).unwrap();
        let refined = adaptive.differentiate(|x| x * x * x, &points, Some(coarse)).unwrap();

        // Assert
        assert!((refined[0] - exact).abs() < (plain[0] - exact).abs());
        assert!((refined[0] - exact).abs() < 1e-3);
    }

    #[test]
    // Purpose
    // -------
    // The bigeometric derivative of T(x) = c/x is e⁻¹ independent of the
    // point and the constant.
    fn bigeometric_derivative_of_reciprocal_law_is_e_inverse() {
        let f = |x: f64| 7.3 / x;
        for &x in &[0.1, 1.0, 10.0, 1e4] {
            let v = bigeometric_derivative(&f, x, None);
            assert!((v - (-1.0_f64).exp()).abs() < 1e-5, "x = {x}, v = {v}");
        }
    }

    #[test]
    // Purpose
    // -------
    // FdMethod parses its three names case-insensitively and rejects
    // anything else.
    fn fd_method_from_str_parses_and_rejects() {
        assert_eq!(FdMethod::from_str("central").unwrap(), FdMethod::Central);
        assert_eq!(FdMethod::from_str("Forward").unwrap(), FdMethod::Forward);
        assert_eq!(FdMethod::from_str("BACKWARD").unwrap(), FdMethod::Backward);
        assert!(matches!(
            FdMethod::from_str("simpson").unwrap_err(),
            OperatorError::UnknownMethod { .. }
        ));
    }

    #[test]
    // Purpose
    // -------
    // A target function that returns NaN produces a typed error carrying the
    // offending index rather than a silent NaN in the output.
    fn non_finite_target_yields_typed_error() {
        let op = MetaDerivative::new(FdMethod::Central);
        let err = op
            .differentiate(|_| f64::NAN, &array![1.0, 2.0], None)
            .unwrap_err();
        assert!(matches!(err, OperatorError::NonFiniteDerivative { index: 0, .. }));
    }
}
