//! operators::validation — shared input checks for the operator layer.
//!
//! Purpose
//! -------
//! Centralize the argument validation that every derivative and integral
//! entry point performs: finite evaluation points, ordered finite bounds,
//! positive steps, and adequate sample counts. Validation failures are
//! reported as [`OperatorError`] values, never panics, so the operators
//! keep the crate-wide no-panic contract.
//!
//! Conventions
//! -----------
//! - Validators return `OperatorResult<()>` and report only the first
//!   offending element, matching the style of the rest of the crate.
use crate::operators::errors::{OperatorError, OperatorResult};
use crate::operators::types::Points;

/// Require a non-empty, all-finite point set.
pub fn validate_points(points: &Points) -> OperatorResult<()> {
    if points.is_empty() {
        return Err(OperatorError::EmptyPoints);
    }
    for (index, &value) in points.iter().enumerate() {
        if !value.is_finite() {
            return Err(OperatorError::NonFinitePoint { index, value });
        }
    }
    Ok(())
}

/// Require finite bounds with `a < b`.
pub fn validate_bounds(a: f64, b: f64) -> OperatorResult<()> {
    if !a.is_finite() || !b.is_finite() {
        return Err(OperatorError::InvalidBounds { a, b, reason: "bounds must be finite" });
    }
    if a >= b {
        return Err(OperatorError::InvalidBounds { a, b, reason: "bounds must satisfy a < b" });
    }
    Ok(())
}

/// Require a positive, finite finite-difference step.
pub fn validate_step(dx: f64) -> OperatorResult<()> {
    if !dx.is_finite() {
        return Err(OperatorError::InvalidStep { value: dx, reason: "step must be finite" });
    }
    if dx <= 0.0 {
        return Err(OperatorError::InvalidStep {
            value: dx,
            reason: "step must be strictly positive",
        });
    }
    Ok(())
}

/// Require at least three quadrature samples.
pub fn validate_n_points(n: usize) -> OperatorResult<()> {
    if n < 3 {
        return Err(OperatorError::InvalidNPoints {
            n,
            reason: "fixed-grid quadrature needs at least 3 samples",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover the accept/reject behavior of each validator on
    // representative good and bad inputs.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Point validation rejects empty arrays and reports the first non-finite
    // element by index.
    fn validate_points_rejects_empty_and_non_finite() {
        assert_eq!(
            validate_points(&Points::zeros(0)).unwrap_err(),
            OperatorError::EmptyPoints
        );
        let err = validate_points(&array![1.0, f64::NAN, f64::INFINITY]).unwrap_err();
        assert!(matches!(err, OperatorError::NonFinitePoint { index: 1, .. }));
        assert!(validate_points(&array![0.0, -1.0, 2.5]).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Bounds must be finite and strictly ordered.
    fn validate_bounds_requires_finite_ordered_pair() {
        assert!(validate_bounds(0.0, 2.0).is_ok());
        assert!(validate_bounds(2.0, 2.0).is_err());
        assert!(validate_bounds(3.0, 1.0).is_err());
        assert!(validate_bounds(f64::NEG_INFINITY, 1.0).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Steps must be positive and finite; sample counts at least three.
    fn validate_step_and_n_points_enforce_minimums() {
        assert!(validate_step(1e-6).is_ok());
        assert!(validate_step(0.0).is_err());
        assert!(validate_step(-1.0).is_err());
        assert!(validate_step(f64::NAN).is_err());
        assert!(validate_n_points(3).is_ok());
        assert!(validate_n_points(2).is_err());
    }
}
