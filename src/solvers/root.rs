//! solvers::root — Brent root finding over a validated bracket.
//!
//! Purpose
//! -------
//! Wrap `argmin`'s Brent root solver behind a plain-function API with
//! typed errors, so the rest of the crate can solve `f(x) = 0` on a
//! bracket without touching executor or backend error plumbing.
//!
//! Key behaviors
//! -------------
//! - Validate the bracket and tolerance up front, returning
//!   [`SolverError`] values instead of panicking or surfacing raw
//!   `argmin` errors.
//! - Short-circuit when an endpoint is already a root.
//! - Require a sign change over the bracket; report
//!   [`SolverError::NotBracketed`] otherwise so callers can fall back to
//!   closed forms (the `ScaleDependent` inverse does exactly that).
//!
//! Conventions
//! -----------
//! - The objective is a plain `Fn(f64) -> f64`; it is assumed total over
//!   the bracket. Backend failures are converted through
//!   `From<argmin::core::Error>`.
//!
//! Testing notes
//! -------------
//! - Unit tests exercise a transcendental root, endpoint short-circuits,
//!   and the not-bracketed / invalid-bracket error paths.
use argmin::core::{CostFunction, Error, Executor, State};
use argmin::solver::brent::BrentRoot;

use crate::solvers::errors::{SolverError, SolverResult};

const MAX_BRENT_ITERS: u64 = 100;

struct RootProblem<F: Fn(f64) -> f64> {
    f: F,
}

impl<F: Fn(f64) -> f64> CostFunction for RootProblem<F> {
    type Param = f64;
    type Output = f64;

    fn cost(&self, x: &f64) -> Result<f64, Error> {
        Ok((self.f)(*x))
    }
}

/// Find a root of `f` on the bracket `[lo, hi]` with Brent's method.
///
/// Parameters
/// ----------
/// - `f`: objective; must be evaluable over the whole bracket.
/// - `lo`, `hi`: bracket endpoints, finite with `lo < hi`.
/// - `tol`: absolute tolerance on the root location; positive, finite.
///
/// Returns
/// -------
/// `SolverResult<f64>`
///   - `Ok(root)` with `f(root) ≈ 0` within the backend's convergence
///     criterion.
///   - `Err(SolverError::NotBracketed { .. })` when `f(lo)` and `f(hi)`
///     share a sign.
///   - `Err(SolverError::InvalidBracket { .. })` /
///     `Err(SolverError::InvalidTolerance { .. })` on bad arguments.
///   - Converted backend errors otherwise.
///
/// Notes
/// -----
/// - Endpoints that are exact roots are returned without invoking the
///   backend.
pub fn brent<F: Fn(f64) -> f64>(f: F, lo: f64, hi: f64, tol: f64) -> SolverResult<f64> {
    if !lo.is_finite() || !hi.is_finite() {
        return Err(SolverError::InvalidBracket {
            lo,
            hi,
            reason: "bracket endpoints must be finite",
        });
    }
    if lo >= hi {
        return Err(SolverError::InvalidBracket {
            lo,
            hi,
            reason: "bracket must satisfy lo < hi",
        });
    }
    if !tol.is_finite() || tol <= 0.0 {
        return Err(SolverError::InvalidTolerance {
            tol,
            reason: "tolerance must be positive and finite",
        });
    }

    let f_lo = f(lo);
    let f_hi = f(hi);
    if f_lo == 0.0 {
        return Ok(lo);
    }
    if f_hi == 0.0 {
        return Ok(hi);
    }
    if f_lo * f_hi > 0.0 {
        return Err(SolverError::NotBracketed { lo, hi });
    }

    let solver = BrentRoot::new(lo, hi, tol);
    let res = Executor::new(RootProblem { f }, solver)
        .configure(|state| state.max_iters(MAX_BRENT_ITERS))
        .run()?;

    res.state().get_best_param().copied().ok_or(SolverError::RootMissing)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Convergence on a transcendental root with a valid bracket.
    // - Endpoint short-circuit behavior.
    // - NotBracketed and InvalidBracket error paths.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Brent converges to the root of cos(x) − x (≈ 0.739085) on [0, 1].
    fn brent_finds_transcendental_root() {
        let root = brent(|x| x.cos() - x, 0.0, 1.0, 1e-12).unwrap();
        assert!((root - 0.739_085_133_215_160_6).abs() < 1e-8);
    }

    #[test]
    // Purpose
    // -------
    // An endpoint that is already a root is returned without iteration.
    fn brent_short_circuits_on_endpoint_root() {
        let root = brent(|x| x, 0.0, 1.0, 1e-12).unwrap();
        assert_eq!(root, 0.0);
    }

    #[test]
    // Purpose
    // -------
    // A bracket with no sign change yields NotBracketed; a degenerate
    // bracket yields InvalidBracket.
    fn brent_reports_bracketing_errors() {
        assert!(matches!(
            brent(|x| x * x + 1.0, -1.0, 1.0, 1e-12).unwrap_err(),
            SolverError::NotBracketed { .. }
        ));
        assert!(matches!(
            brent(|x| x, 1.0, 1.0, 1e-12).unwrap_err(),
            SolverError::InvalidBracket { .. }
        ));
        assert!(matches!(
            brent(|x| x, -1.0, 1.0, 0.0).unwrap_err(),
            SolverError::InvalidTolerance { .. }
        ));
    }
}
