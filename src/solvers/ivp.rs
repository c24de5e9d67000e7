//! solvers::ivp — adaptive Dormand–Prince RK45 initial-value integrator.
//!
//! Purpose
//! -------
//! Integrate first-order ODE systems `y' = f(t, y)` with the embedded
//! Dormand–Prince 5(4) pair and proportional step-size control, covering
//! the evolution workloads of the application layer (black-hole mass and
//! entropy-factor trajectories, decoherence envelopes).
//!
//! Key behaviors
//! -------------
//! - Validate span, initial state, and options up front; report problems
//!   as [`SolverError`] values, never panics.
//! - Accept a step when the mixed absolute/relative error norm is at most
//!   one; otherwise shrink and retry, with growth/shrink factors clamped
//!   to `[0.2, 5.0]` and a 0.9 safety factor.
//! - Stop with [`IvpStatus::StepBudgetExhausted`] when `max_steps` runs
//!   out; the partial trajectory is still returned, so callers can apply
//!   their own fallback policy.
//! - Reject non-finite right-hand sides with a typed error identifying
//!   the step and component.
//!
//! Invariants & assumptions
//! ------------------------
//! - The right-hand side is deterministic and side-effect free; every
//!   call is independent and nothing is cached between steps.
//! - Accepted states are finite; a non-finite trial state forces a step
//!   rejection before it can enter the trajectory.
//!
//! Conventions
//! -----------
//! - States are `ndarray::Array1<f64>`; the trajectory is returned as
//!   parallel `Vec`s of times and states, first entry `(t0, y0)`.
//! - Tolerances default to `rtol = 1e-6`, `atol = 1e-9`, matching the
//!   RK45 accuracy regime the reference validation suites pin.
//!
//! Testing notes
//! -------------
//! - Unit tests integrate exponential decay and the harmonic oscillator
//!   against closed forms, exercise the step-budget status, and check the
//!   non-finite right-hand-side error path.
use ndarray::Array1;

use crate::solvers::errors::{SolverError, SolverResult};

/// Default relative tolerance for step acceptance.
pub const DEFAULT_RTOL: f64 = 1e-6;

/// Default absolute tolerance for step acceptance.
pub const DEFAULT_ATOL: f64 = 1e-9;

/// Default cap on accepted + rejected steps.
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// IvpOptions — validated tolerances and budgets for [`solve_ivp`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IvpOptions {
    /// Relative tolerance (> 0, finite).
    pub rtol: f64,
    /// Absolute tolerance (> 0, finite).
    pub atol: f64,
    /// Initial step size; `None` selects 1% of the span.
    pub h_initial: Option<f64>,
    /// Maximum number of step attempts before giving up.
    pub max_steps: usize,
}

impl Default for IvpOptions {
    fn default() -> Self {
        IvpOptions {
            rtol: DEFAULT_RTOL,
            atol: DEFAULT_ATOL,
            h_initial: None,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl IvpOptions {
    /// Construct validated options.
    ///
    /// Errors
    /// ------
    /// - `SolverError::InvalidIvpOptions` when a tolerance is non-positive
    ///   or non-finite, `h_initial` is non-positive, or `max_steps` is 0.
    pub fn new(
        rtol: f64, atol: f64, h_initial: Option<f64>, max_steps: usize,
    ) -> SolverResult<Self> {
        if !rtol.is_finite() || rtol <= 0.0 {
            return Err(SolverError::InvalidIvpOptions {
                reason: "rtol must be positive and finite",
            });
        }
        if !atol.is_finite() || atol <= 0.0 {
            return Err(SolverError::InvalidIvpOptions {
                reason: "atol must be positive and finite",
            });
        }
        if let Some(h) = h_initial {
            if !h.is_finite() || h <= 0.0 {
                return Err(SolverError::InvalidIvpOptions {
                    reason: "h_initial must be positive and finite",
                });
            }
        }
        if max_steps == 0 {
            return Err(SolverError::InvalidIvpOptions {
                reason: "max_steps must be at least 1",
            });
        }
        Ok(IvpOptions { rtol, atol, h_initial, max_steps })
    }
}

/// Terminal status of an integration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IvpStatus {
    /// Reached the end of the span within tolerance.
    Completed,
    /// Ran out of step budget; the trajectory is truncated.
    StepBudgetExhausted,
}

/// IvpSolution — trajectory and terminal status from [`solve_ivp`].
///
/// `t[i]` and `y[i]` are parallel; `t[0] == t0` and `y[0] == y0` always
/// hold, even for a budget-exhausted run.
#[derive(Debug, Clone, PartialEq)]
pub struct IvpSolution {
    pub t: Vec<f64>,
    pub y: Vec<Array1<f64>>,
    pub status: IvpStatus,
}

// Dormand–Prince 5(4) tableau.
const C: [f64; 6] = [1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];
const A2: [f64; 1] = [1.0 / 5.0];
const A3: [f64; 2] = [3.0 / 40.0, 9.0 / 40.0];
const A4: [f64; 3] = [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0];
const A5: [f64; 4] = [19372.0 / 6561.0, -25360.0 / 2187.0, 64448.0 / 6561.0, -212.0 / 729.0];
const A6: [f64; 5] = [
    9017.0 / 3168.0,
    -355.0 / 33.0,
    46732.0 / 5247.0,
    49.0 / 176.0,
    -5103.0 / 18656.0,
];
const B5: [f64; 7] =
    [35.0 / 384.0, 0.0, 500.0 / 1113.0, 125.0 / 192.0, -2187.0 / 6784.0, 11.0 / 84.0, 0.0];
const B4: [f64; 7] = [
    5179.0 / 57600.0,
    0.0,
    7571.0 / 16695.0,
    393.0 / 640.0,
    -92097.0 / 339200.0,
    187.0 / 2100.0,
    1.0 / 40.0,
];

/// Integrate `y' = f(t, y)` over `t_span` from `y0`.
///
/// Parameters
/// ----------
/// - `f`: right-hand side; evaluated at trial points inside the span.
/// - `t_span`: `(t0, t1)` with `t0 < t1`, both finite.
/// - `y0`: initial state, non-empty with finite components.
/// - `opts`: validated [`IvpOptions`].
///
/// Returns
/// -------
/// `SolverResult<IvpSolution>`
///   - `Ok` with status [`IvpStatus::Completed`] on a full integration,
///     or [`IvpStatus::StepBudgetExhausted`] with the partial trajectory.
///   - `Err(SolverError::NonFiniteRightHandSide { .. })` when `f`
///     produces NaN/infinity even at the smallest admissible step.
///   - `Err(SolverError::StepSizeUnderflow { .. })` when error control
///     cannot make progress.
pub fn solve_ivp<F>(
    f: F, t_span: (f64, f64), y0: &Array1<f64>, opts: &IvpOptions,
) -> SolverResult<IvpSolution>
where
    F: Fn(f64, &Array1<f64>) -> Array1<f64>,
{
    let (t0, t1) = t_span;
    if !t0.is_finite() || !t1.is_finite() {
        return Err(SolverError::InvalidSpan { t0, t1, reason: "span must be finite" });
    }
    if t0 >= t1 {
        return Err(SolverError::InvalidSpan { t0, t1, reason: "span must satisfy t0 < t1" });
    }
    if y0.is_empty() {
        return Err(SolverError::InvalidInitialState { index: 0, value: f64::NAN });
    }
    for (i, &v) in y0.iter().enumerate() {
        if !v.is_finite() {
            return Err(SolverError::InvalidInitialState { index: i, value: v });
        }
    }

    let span = t1 - t0;
    let h_min = span * 1e-14;
    let mut h = opts.h_initial.unwrap_or(span * 0.01).min(span);
    let mut t = t0;
    let mut y = y0.clone();

    let mut ts = vec![t0];
    let mut ys = vec![y0.clone()];

    let mut steps = 0usize;
    while t < t1 {
        if steps >= opts.max_steps {
            return Ok(IvpSolution { t: ts, y: ys, status: IvpStatus::StepBudgetExhausted });
        }
        steps += 1;

        if h < h_min {
            return Err(SolverError::StepSizeUnderflow { t });
        }
        h = h.min(t1 - t);

        let (y5, err_norm) = dopri_step(&f, t, &y, h, opts, steps)?;
        if err_norm <= 1.0 {
            t += h;
            y = y5;
            ts.push(t);
            ys.push(y.clone());
        }

        // Proportional controller with safety factor and clamped growth.
        let factor = if err_norm > 0.0 {
            (0.9 * err_norm.powf(-0.2)).clamp(0.2, 5.0)
        } else {
            5.0
        };
        h *= factor;
    }

    Ok(IvpSolution { t: ts, y: ys, status: IvpStatus::Completed })
}

// One embedded 5(4) step: returns the 5th-order state and the scaled
// error norm of the 5th/4th-order difference.
fn dopri_step<F>(
    f: &F, t: f64, y: &Array1<f64>, h: f64, opts: &IvpOptions, step: usize,
) -> SolverResult<(Array1<f64>, f64)>
where
    F: Fn(f64, &Array1<f64>) -> Array1<f64>,
{
    let check = |k: &Array1<f64>| -> SolverResult<()> {
        for (i, &v) in k.iter().enumerate() {
            if !v.is_finite() {
                return Err(SolverError::NonFiniteRightHandSide { step, index: i, value: v });
            }
        }
        Ok(())
    };

    let k1 = f(t, y);
    check(&k1)?;
    let k2 = f(t + C[0] * h, &(y + &(&k1 * (A2[0] * h))));
    check(&k2)?;
    let k3 = f(t + C[1] * h, &(y + &(&k1 * (A3[0] * h)) + &(&k2 * (A3[1] * h))));
    check(&k3)?;
    let k4 = f(
        t + C[2] * h,
        &(y + &(&k1 * (A4[0] * h)) + &(&k2 * (A4[1] * h)) + &(&k3 * (A4[2] * h))),
    );
    check(&k4)?;
    let k5 = f(
        t + C[3] * h,
        &(y + &(&k1 * (A5[0] * h))
            + &(&k2 * (A5[1] * h))
            + &(&k3 * (A5[2] * h))
            + &(&k4 * (A5[3] * h))),
    );
    check(&k5)?;
    let k6 = f(
        t + C[4] * h,
        &(y + &(&k1 * (A6[0] * h))
            + &(&k2 * (A6[1] * h))
            + &(&k3 * (A6[2] * h))
            + &(&k4 * (A6[3] * h))
            + &(&k5 * (A6[4] * h))),
    );
    check(&k6)?;

    let y5 = y
        + &(&k1 * (B5[0] * h))
        + &(&k3 * (B5[2] * h))
        + &(&k4 * (B5[3] * h))
        + &(&k5 * (B5[4] * h))
        + &(&k6 * (B5[5] * h));
    let k7 = f(t + C[5] * h, &y5);
    check(&k7)?;

    let y4 = y
        + &(&k1 * (B4[0] * h))
        + &(&k3 * (B4[2] * h))
        + &(&k4 * (B4[3] * h))
        + &(&k5 * (B4[4] * h))
        + &(&k6 * (B4[5] * h))
        + &(&k7 * (B4[6] * h));

    let mut acc = 0.0;
    for i in 0..y.len() {
        let scale = opts.atol + opts.rtol * y[i].abs().max(y5[i].abs());
        let e = (y5[i] - y4[i]) / scale;
        acc += e * e;
    }
    let err_norm = (acc / y.len() as f64).sqrt();
    // A non-finite trial state must force a rejection, not enter the
    // trajectory.
    if !err_norm.is_finite() || y5.iter().any(|v| !v.is_finite()) {
        return Ok((y5, f64::MAX));
    }
    Ok((y5, err_norm))
}
