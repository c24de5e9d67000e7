//! applications::cosmology — vacuum-energy suppression across scales.
//!
//! Purpose
//! -------
//! Accumulate a multiplicative suppression factor between an infrared
//! and an ultraviolet scale by integrating a constant density against
//! the logarithmic measure, the meta-calculus reading of the cosmological
//! constant problem: the naive `(uv/ir)⁴` mismatch collapses to a
//! per-decade product that lands near the observed `10⁻¹²²` for the
//! Planck/Hubble hierarchy.
//!
//! Key behaviors
//! -------------
//! - The exponent is `∫ 2 dln s` over `[ir, uv]`. The quadrature runs in
//!   the logarithmic coordinate, where the `dln s` measure is flat; a
//!   fixed grid in the raw coordinate cannot resolve a 61-decade
//!   hierarchy. The closed form `2·ln(uv/ir)` is exposed for validation.
//! - The factor is `exp(−exponent)`, evaluated through the clipped
//!   exponential so extreme hierarchies underflow to the smallest normal
//!   surrogate instead of producing 0/NaN downstream.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the `(ir/uv)²` closed form, the `≈ 10⁻¹²²` value for
//!   a 61-decade hierarchy, profile monotonicity, and scale validation.
use crate::applications::errors::{AppError, AppResult};
use crate::calculus::generators::Identity;
use crate::calculus::safety::safe_exp;
use crate::operators::integration::{MetaIntegral, QuadratureMethod};
use crate::operators::types::{Points, Values};

// Each decade of scale suppresses by two powers, one per conjugate mode
// pair.
const MODES_PER_LOG_SCALE: f64 = 2.0;

/// CosmologicalSuppression — validated scale hierarchy.
#[derive(Debug, Clone, Copy)]
pub struct CosmologicalSuppression {
    uv: f64,
    ir: f64,
}

impl CosmologicalSuppression {
    /// Construct a validated hierarchy with `0 < ir < uv`, both finite.
    ///
    /// Errors
    /// ------
    /// - `AppError::InvalidScales` naming the violated constraint.
    pub fn new(uv: f64, ir: f64) -> AppResult<Self> {
        if !uv.is_finite() || !ir.is_finite() {
            return Err(AppError::InvalidScales { uv, ir, reason: "scales must be finite" });
        }
        if ir <= 0.0 {
            return Err(AppError::InvalidScales { uv, ir, reason: "ir scale must be > 0" });
        }
        if uv <= ir {
            return Err(AppError::InvalidScales { uv, ir, reason: "uv scale must exceed ir" });
        }
        Ok(CosmologicalSuppression { uv, ir })
    }

    /// Suppression exponent `∫ 2 dln s` over `[ir, uv]`, evaluated by the
    /// adaptive meta-integral in the logarithmic coordinate.
    pub fn suppression_exponent(&self) -> AppResult<f64> {
        log_measure_exponent(self.ir, self.uv)
    }

    /// Closed-form exponent `2·ln(uv/ir)`, for validating the quadrature.
    pub fn closed_form_exponent(&self) -> f64 {
        MODES_PER_LOG_SCALE * (self.uv / self.ir).ln()
    }

    /// Suppression factor `exp(−exponent)`; `(ir/uv)²` in closed form.
    pub fn suppression_factor(&self) -> AppResult<f64> {
        Ok(safe_exp(-self.suppression_exponent()?))
    }

    /// Suppression accumulated from each of `n` log-spaced scales up to
    /// the ultraviolet cutoff.
    ///
    /// Returns
    /// -------
    /// `(scales, factors)` with `scales[0] = ir`, `scales[n−1] = uv`, and
    /// `factors[i] = (scales[i]/uv)²` up to quadrature error; the factor
    /// at `uv` itself is 1.
    pub fn suppression_profile(&self, n: usize) -> AppResult<(Points, Values)> {
        if n < 2 {
            return Err(AppError::InvalidScales {
                uv: self.uv,
                ir: self.ir,
                reason: "profile needs at least 2 scales",
            });
        }
        let log_lo = self.ir.ln();
        let log_hi = self.uv.ln();
        let step = (log_hi - log_lo) / (n - 1) as f64;

        let mut scales = Points::zeros(n);
        let mut factors = Values::zeros(n);
        for i in 0..n {
            let s = (log_lo + step * i as f64).exp();
            scales[i] = s;
            factors[i] = if i == n - 1 {
                1.0
            } else {
                safe_exp(-log_measure_exponent(s, self.uv)?)
            };
        }
        Ok((scales, factors))
    }
}

// ∫ 2 dln s over [lo, hi], as a flat-measure integral in t = ln s.
fn log_measure_exponent(lo: f64, hi: f64) -> AppResult<f64> {
    let integral = MetaIntegral::new(Identity, Identity);
    let out = integral.integrate(
        |_| MODES_PER_LOG_SCALE,
        lo.ln(),
        hi.ln(),
        QuadratureMethod::Adaptive,
    )?;
    Ok(out.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Quadrature agreement with the closed-form exponent.
    // - The ≈ 10⁻¹²² factor for the 61-decade Planck/Hubble hierarchy.
    // - Profile monotonicity and endpoints.
    // - Scale validation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The adaptive exponent matches 2·ln(uv/ir) on a modest hierarchy.
    fn exponent_matches_closed_form() {
        let c = CosmologicalSuppression::new(1e3, 1.0).unwrap();
        let exact = c.closed_form_exponent();
        let got = c.suppression_exponent().unwrap();
        assert!((got - exact).abs() / exact < 1e-6, "got {got}, exact {exact}");
    }

    #[test]
    // Purpose
    // -------
    // The Planck/Hubble hierarchy of 61 decades suppresses by ≈ 10⁻¹²².
    //
    // Given
    // -----
    // - uv/ir = 1e61, the Planck-to-Hubble scale ratio.
    //
    // Expect
    // ------
    // - Exponent ≈ 122·ln 10; factor within a decade of 1e-122.
    fn planck_hubble_hierarchy_suppresses_122_orders() {
        // Arrange
        let c = CosmologicalSuppression::new(1e61, 1.0).unwrap();

        // Act
        let exponent = c.suppression_exponent().unwrap();
        let factor = c.suppression_factor().unwrap();

        // Assert
        let exact = 122.0 * 10.0_f64.ln();
        assert!((exponent - exact).abs() / exact < 1e-6);
        assert!(factor > 1e-123 && factor < 1e-121, "factor {factor}");
    }

    #[test]
    // Purpose
    // -------
    // The profile runs from the deepest suppression at the ir scale up to
    // exactly 1 at the uv cutoff, strictly increasing in between.
    fn profile_is_monotone_with_unit_uv_endpoint() {
        let c = CosmologicalSuppression::new(1e4, 1.0).unwrap();
        let (scales, factors) = c.suppression_profile(9).unwrap();
        assert_eq!(scales.len(), 9);
        assert!((scales[0] - 1.0).abs() < 1e-9);
        assert!((scales[8] - 1e4).abs() / 1e4 < 1e-9);
        assert_eq!(factors[8], 1.0);
        for i in 1..9 {
            assert!(factors[i] > factors[i - 1], "not increasing at {i}");
        }
        // Closed form at the ir end: (1/1e4)² = 1e-8.
        assert!((factors[0] - 1e-8).abs() / 1e-8 < 1e-4);
    }

    #[test]
    // Purpose
    // -------
    // Degenerate hierarchies are rejected with the reason spelled out.
    fn validation_rejects_degenerate_hierarchies() {
        assert!(matches!(
            CosmologicalSuppression::new(1.0, 1.0).unwrap_err(),
            AppError::InvalidScales { .. }
        ));
        assert!(CosmologicalSuppression::new(1e3, 0.0).is_err());
        assert!(CosmologicalSuppression::new(1e3, -1.0).is_err());
        assert!(CosmologicalSuppression::new(f64::INFINITY, 1.0).is_err());
        assert!(matches!(
            CosmologicalSuppression::new(1e3, 1.0).unwrap().suppression_profile(1).unwrap_err(),
            AppError::InvalidScales { .. }
        ));
    }
}
