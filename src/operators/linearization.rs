//! operators::linearization — the straight-line test for generator pairs.
//!
//! Purpose
//! -------
//! Decide whether a generator pair linearizes a functional relationship:
//! sample `f` over an x-range, regress `β(f(x))` on `α(x)` by ordinary
//! least squares, and report slope, intercept, `R²`, a slope p-value, and
//! a linearity verdict. A power law becomes a straight line under
//! `(Log, Log)`, an exponential under `(Identity, Log)`, and so on; the
//! test is how scheme choices are validated empirically.
//!
//! Key behaviors
//! -------------
//! - Uniform sampling of `n_points` over `[x_lo, x_hi]`, transformed
//!   through the generator pair before the fit.
//! - Closed-form simple OLS (two parameters, no matrix factorization).
//! - Slope p-value from the Student-t distribution with `n − 2` degrees
//!   of freedom, testing `slope = 0`.
//! - `is_linear` is `R² > 0.999` ([`LINEARITY_R2_THRESHOLD`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - At least three samples are required (two regression parameters plus
//!   one residual degree of freedom).
//! - Transformed samples must be finite; the generator layer's
//!   substitution contract normally guarantees this, and any residual
//!   non-finite pair is reported by index.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the exponential linearization `3·e^{2x}` under
//!   `(Identity, Log)` (slope 2, intercept ln 3, R² > 0.999), a power law
//!   under `(Log, Log)`, and a non-linearizable case that must fail the
//!   verdict.
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::calculus::generators::Generator;
use crate::operators::errors::{OperatorError, OperatorResult};
use crate::operators::types::LINEARITY_R2_THRESHOLD;
use crate::operators::validation::validate_bounds;

/// LinearizationOutcome — result of one straight-line test.
///
/// Fields
/// ------
/// - `slope`, `intercept`: OLS fit of `β(f(x)) = slope·α(x) + intercept`.
/// - `r_squared`: coefficient of determination of the fit, in `[0, 1]`.
/// - `p_value`: two-sided Student-t p-value for `slope = 0`, in `[0, 1]`.
/// - `is_linear`: whether `r_squared` clears the 0.999 threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearizationOutcome {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub p_value: f64,
    pub is_linear: bool,
}

/// Run the straight-line test for `f` under the generator pair
/// `(alpha, beta)` over `x_range` with `n_points` uniform samples.
///
/// Parameters
/// ----------
/// - `f`: target function, evaluated at each sample point.
/// - `alpha`: generator applied to the argument axis.
/// - `beta`: generator applied to the value axis.
/// - `x_range`: `(lo, hi)` with `lo < hi`, both finite.
/// - `n_points`: number of uniform samples; at least 3.
///
/// Returns
/// -------
/// `OperatorResult<LinearizationOutcome>`
///   - `Ok` with the fitted line and verdict.
///   - `Err(OperatorError::InsufficientSamples { .. })` for `n_points < 3`.
///   - `Err(OperatorError::DegenerateRegressor)` when `α(x)` has zero
///     variance over the range.
///   - `Err(OperatorError::NonFinitePoint { .. })` when a transformed
///     sample is NaN/infinite.
pub fn straight_line_test<F, A, B>(
    f: F, alpha: &A, beta: &B, x_range: (f64, f64), n_points: usize,
) -> OperatorResult<LinearizationOutcome>
where
    F: Fn(f64) -> f64,
    A: Generator,
    B: Generator,
{
    let (lo, hi) = x_range;
    validate_bounds(lo, hi)?;
    if n_points < 3 {
        return Err(OperatorError::InsufficientSamples { n: n_points, required: 3 });
    }

    let h = (hi - lo) / (n_points - 1) as f64;
    let mut xs = Vec::with_capacity(n_points);
    let mut ys = Vec::with_capacity(n_points);
    for i in 0..n_points {
        let t = lo + h * i as f64;
        let x = alpha.transform(t);
        let y = beta.transform(f(t));
        if !x.is_finite() {
            return Err(OperatorError::NonFinitePoint { index: i, value: x });
        }
        if !y.is_finite() {
            return Err(OperatorError::NonFinitePoint { index: i, value: y });
        }
        xs.push(x);
        ys.push(y);
    }

    let n = n_points as f64;
    let x_mean = xs.iter().sum::<f64>() / n;
    let y_mean = ys.iter().sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for i in 0..n_points {
        let dx = xs[i] - x_mean;
        let dy = ys[i] - y_mean;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    if sxx == 0.0 {
        return Err(OperatorError::DegenerateRegressor);
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    // Residual sum of squares and R².
    let ss_res = (syy - slope * sxy).max(0.0);
    let r_squared = if syy == 0.0 { 1.0 } else { 1.0 - ss_res / syy };

    // Two-sided t-test for slope = 0 with n − 2 residual degrees of
    // freedom. A numerically exact fit drives the statistic to infinity,
    // which the CDF maps to p = 0.
    let df = n - 2.0;
    let se_slope = (ss_res / (df * sxx)).sqrt();
    let p_value = if se_slope == 0.0 {
        0.0
    } else {
        let t_stat = (slope / se_slope).abs();
        let dist = StudentsT::new(0.0, 1.0, df).expect("freedom >= 1");
        2.0 * (1.0 - dist.cdf(t_stat))
    };

    Ok(LinearizationOutcome {
        slope,
        intercept,
        r_squared,
        p_value,
        is_linear: r_squared > LINEARITY_R2_THRESHOLD,
    })
}
