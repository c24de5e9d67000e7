//! calculus::weights — closed-form weight functions for biased operators.
//!
//! Purpose
//! -------
//! Provide the weight functions used to bias meta-derivatives and
//! meta-integrals toward physically meaningful regions: qubit information
//! content, horizon cutoffs, sensor confidence, decoherence envelopes,
//! and Euclidean path-integral damping.
//!
//! Key behaviors
//! -------------
//! - Every weight maps a coordinate to a finite, non-negative scalar.
//! - Out-of-domain parameters are clamped (never rejected), matching the
//!   generator layer's availability contract: a weight is a multiplier,
//!   and a finite surrogate is always preferable to a panic mid-quadrature.
//!
//! Conventions
//! -----------
//! - Weights are plain free functions; operators accept them through the
//!   [`WeightFn`] alias, a shared closure handle, so user-defined weights
//!   plug in the same way.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the qubit endpoints (`w(1) = 1`, `w(0) = 0.5`) and
//!   monotonicity, the horizon boundary values, and finiteness of every
//!   weight on adversarial input.
use std::sync::Arc;

use crate::calculus::safety::{safe_exp, EPSILON};

/// Shared handle for a weight function usable by the operator layer.
pub type WeightFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Wrap a closure as a [`WeightFn`].
pub fn weight_fn<F: Fn(f64) -> f64 + Send + Sync + 'static>(f: F) -> WeightFn {
    Arc::new(f)
}

/// Qubit information weight: `w(r) = exp(−S(r))` for Bloch radius `r`.
///
/// `S(r)` is the von Neumann entropy (in nats) of the single-qubit state
/// with eigenvalues `(1 ± r)/2`. A pure state (`r = 1`) carries full
/// information, `w = 1`; the maximally mixed state (`r = 0`) carries
/// `S = ln 2`, giving `w = exp(−ln 2) = 0.5`. Strictly increasing on
/// `[0, 1]`; the input is clamped to that interval.
pub fn information_weight_qubit(r: f64) -> f64 {
    let r = if r.is_finite() { r.clamp(0.0, 1.0) } else { 1.0 };
    let up = (1.0 + r) / 2.0;
    let down = (1.0 - r) / 2.0;
    let entropy = -(xlnx(up) + xlnx(down));
    safe_exp(-entropy)
}

// x·ln(x) with the 0·ln(0) = 0 convention.
#[inline]
fn xlnx(x: f64) -> f64 {
    if x <= 0.0 { 0.0 } else { x * x.ln() }
}

/// Horizon cutoff weight: `w(r) = 1 − r_h/r` outside the horizon radius
/// `r_h`, exactly `0` at and inside it.
///
/// This is the Schwarzschild lapse profile; it vanishes on the horizon
/// and approaches `1` far from it.
pub fn horizon_weight(r: f64, r_h: f64) -> f64 {
    let r_h = if r_h.is_finite() { r_h.max(0.0) } else { 0.0 };
    if !r.is_finite() {
        return 1.0;
    }
    if r <= r_h { 0.0 } else { 1.0 - r_h / r }
}

/// Sensor confidence weight: Gaussian falloff `exp(−x²/(2σ²))`.
///
/// `sigma` magnitudes below the substitution floor are clamped, so a
/// degenerate zero-width sensor yields a spike weight rather than NaN.
pub fn sensor_confidence_weight(x: f64, sigma: f64) -> f64 {
    let s = sigma.abs().max(EPSILON);
    safe_exp(-(x * x) / (2.0 * s * s))
}

/// Decoherence weight: `exp(−t/t_d)` for elapsed time `t` and
/// decoherence time `t_d`.
///
/// Negative elapsed times are treated as zero (no decoherence before the
/// clock starts).
pub fn decoherence_weight(t: f64, t_d: f64) -> f64 {
    let t = t.max(0.0);
    let t_d = t_d.abs().max(EPSILON);
    safe_exp(-t / t_d)
}

/// Euclidean path-integral weight: `exp(−S/ħ)` for action `S`.
pub fn path_integral_weight(action: f64, hbar: f64) -> f64 {
    let h = hbar.abs().max(EPSILON);
    safe_exp(-action / h)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Qubit information weight endpoints and monotonicity on [0, 1].
    // - Horizon weight boundary values (0 on the horizon, → 1 at infinity).
    // - Finiteness and non-negativity of all weights on edge input.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A pure state carries weight 1; the maximally mixed state carries
    // exp(−ln 2) = 0.5.
    fn qubit_weight_matches_pure_and_mixed_endpoints() {
        assert!((information_weight_qubit(1.0) - 1.0).abs() < 1e-12);
        assert!((information_weight_qubit(0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // The qubit weight is strictly increasing in the Bloch radius on [0, 1].
    fn qubit_weight_is_monotone_on_unit_interval() {
        let mut prev = information_weight_qubit(0.0);
        let mut r = 0.05;
        while r <= 1.0 {
            let w = information_weight_qubit(r);
            assert!(w > prev, "not increasing at r = {r}");
            prev = w;
            r += 0.05;
        }
    }

    #[test]
    // Purpose
    // -------
    // Horizon weight vanishes exactly on (and inside) the horizon and tends
    // to 1 far away.
    fn horizon_weight_boundary_values() {
        let r_h = 2.0;
        assert_eq!(horizon_weight(r_h, r_h), 0.0);
        assert_eq!(horizon_weight(0.5 * r_h, r_h), 0.0);
        assert!(horizon_weight(1e9 * r_h, r_h) > 1.0 - 1e-8);
        assert_eq!(horizon_weight(f64::INFINITY, r_h), 1.0);
    }

    #[test]
    // Purpose
    // -------
    // All weights stay finite and non-negative on adversarial parameters
    // (zero widths, negative times, huge actions).
    fn weights_are_finite_and_non_negative_on_edge_input() {
        let samples = [
            sensor_confidence_weight(3.0, 0.0),
            sensor_confidence_weight(0.0, 1.0),
            decoherence_weight(-5.0, 1.0),
            decoherence_weight(1e12, 1e-12),
            path_integral_weight(1e6, 1.0),
            path_integral_weight(-1e6, 1.0),
            information_weight_qubit(f64::NAN),
        ];
        for (i, w) in samples.iter().enumerate() {
            assert!(w.is_finite(), "sample {i} not finite");
            assert!(*w >= 0.0, "sample {i} negative");
        }
        assert_eq!(decoherence_weight(-5.0, 1.0), 1.0);
        assert_eq!(sensor_confidence_weight(0.0, 1.0), 1.0);
    }
}
