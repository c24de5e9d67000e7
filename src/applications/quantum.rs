//! applications::quantum — the quantum-to-classical transition.
//!
//! Purpose
//! -------
//! Model a decohering oscillator whose energy ladder interpolates
//! between the multiplicative (geometric) spectrum and the familiar
//! additive one, driven by a decoherence clock. The geometric ladder
//! `(ħω/2)·3ⁿ` is the constant-ratio analogue of the constant-gap
//! classical ladder `ħω(n + ½)`; the two coincide on the ground state
//! and the first excited level.
//!
//! Key behaviors
//! -------------
//! - `transition_parameter(t) = 1 − exp(−t/t_d)` runs from 0 (fully
//!   geometric) to 1 (fully classical).
//! - The effective spectrum interpolates multiplicatively between the
//!   two ladders, staying positive for every level and every time.
//! - The coherence envelope is a Gaussian of width `t_d`; its star
//!   derivative under `(Identity, Log)` is the logarithmic decay rate
//!   `−t/t_d²`.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the transition endpoints and monotonicity, the
//!   ladder coincidence at `n = 0, 1`, the interpolation limits, the
//!   envelope rate against its closed form, and constructor validation.
use ndarray::array;

use crate::applications::errors::{AppError, AppResult};
use crate::calculus::generators::{Identity, Log};
use crate::calculus::safety::safe_exp;
use crate::calculus::weights::decoherence_weight;
use crate::operators::derivatives::{FdMethod, StarDerivative};

/// QuantumClassicalTransition — validated decohering oscillator.
#[derive(Debug, Clone, Copy)]
pub struct QuantumClassicalTransition {
    frequency: f64,
    hbar_eff: f64,
    decoherence_time: f64,
}

impl QuantumClassicalTransition {
    /// Construct a validated oscillator.
    ///
    /// Parameters
    /// ----------
    /// - `frequency`: angular frequency ω, finite and > 0.
    /// - `hbar_eff`: effective ħ, finite and > 0.
    /// - `decoherence_time`: t_d, finite and > 0.
    ///
    /// Errors
    /// ------
    /// - `AppError::InvalidFrequency` / `InvalidHbar` /
    ///   `InvalidDecoherenceTime` naming the offending value.
    pub fn new(frequency: f64, hbar_eff: f64, decoherence_time: f64) -> AppResult<Self> {
        if !frequency.is_finite() || frequency <= 0.0 {
            return Err(AppError::InvalidFrequency { value: frequency });
        }
        if !hbar_eff.is_finite() || hbar_eff <= 0.0 {
            return Err(AppError::InvalidHbar { value: hbar_eff });
        }
        if !decoherence_time.is_finite() || decoherence_time <= 0.0 {
            return Err(AppError::InvalidDecoherenceTime { value: decoherence_time });
        }
        Ok(QuantumClassicalTransition { frequency, hbar_eff, decoherence_time })
    }

    /// Transition parameter `λ(t) = 1 − exp(−t/t_d)`, in `[0, 1)`.
    ///
    /// `λ = 0` at `t = 0` (coherent, geometric regime), `λ → 1` for
    /// `t ≫ t_d` (decohered, classical regime). Negative times clamp
    /// to 0.
    pub fn transition_parameter(&self, t: f64) -> f64 {
        1.0 - decoherence_weight(t, self.decoherence_time)
    }

    /// Classical oscillator ladder `E_n = ħω(n + ½)`.
    pub fn classical_spectrum(&self, n: u32) -> f64 {
        self.hbar_eff * self.frequency * (n as f64 + 0.5)
    }

    /// Geometric ladder `E_n = (ħω/2)·3ⁿ`: constant level ratio 3
    /// instead of constant gap ħω. Matches the classical ladder at
    /// `n = 0` and `n = 1`.
    pub fn geometric_spectrum(&self, n: u32) -> f64 {
        0.5 * self.hbar_eff * self.frequency * 3.0_f64.powi(n as i32)
    }

    /// Effective level at time `t`: the multiplicative interpolation
    /// `G_n^{1−λ} · C_n^{λ}` between the geometric and classical
    /// ladders. Multiplicative rather than linear so the spectrum stays
    /// a positive ladder throughout the transition.
    pub fn effective_spectrum(&self, n: u32, t: f64) -> f64 {
        let lambda = self.transition_parameter(t);
        let g = self.geometric_spectrum(n);
        let c = self.classical_spectrum(n);
        safe_exp((1.0 - lambda) * g.ln() + lambda * c.ln())
    }

    /// Coherence envelope `exp(−t²/(2t_d²))`.
    pub fn coherence_envelope(&self, t: f64) -> f64 {
        let z = t / self.decoherence_time;
        safe_exp(-0.5 * z * z)
    }

    /// Logarithmic decay rate of the coherence envelope at time `t`: the
    /// star derivative of the envelope under `(Identity, Log)`, equal to
    /// `−t/t_d²` in closed form.
    pub fn coherence_envelope_rate(&self, t: f64) -> AppResult<f64> {
        let star = StarDerivative::new(Identity, Log, FdMethod::Central);
        let out = star.differentiate(|x| self.coherence_envelope(x), &array![t], None)?;
        Ok(out[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Transition-parameter endpoints and monotonicity.
    // - Ladder coincidence at n = 0, 1 and divergence above.
    // - Effective-spectrum limits at t = 0 and t ≫ t_d.
    // - The envelope rate against its −t/t_d² closed form.
    // - Constructor validation.
    // -------------------------------------------------------------------------

    fn oscillator() -> QuantumClassicalTransition {
        QuantumClassicalTransition::new(2.0, 1.0, 0.5).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // λ starts at 0, increases with time, and saturates below 1.
    fn transition_parameter_runs_from_zero_toward_one() {
        let q = oscillator();
        assert_eq!(q.transition_parameter(0.0), 0.0);
        assert_eq!(q.transition_parameter(-1.0), 0.0);
        let mut prev = 0.0;
        for t in [0.1, 0.3, 1.0, 3.0, 10.0] {
            let l = q.transition_parameter(t);
            assert!(l > prev && l < 1.0, "λ({t}) = {l}");
            prev = l;
        }
        assert!(q.transition_parameter(100.0) > 1.0 - 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // The geometric and classical ladders share the ground state and the
    // first excited level, then diverge geometrically.
    fn ladders_coincide_on_the_first_two_levels() {
        let q = oscillator();
        assert!((q.geometric_spectrum(0) - q.classical_spectrum(0)).abs() < 1e-12);
        assert!((q.geometric_spectrum(1) - q.classical_spectrum(1)).abs() < 1e-12);
        // n = 4: (ħω/2)·81 = 81 vs ħω·4.5 = 9 for ħω = 2.
        assert!((q.geometric_spectrum(4) - 81.0).abs() < 1e-12);
        assert!((q.classical_spectrum(4) - 9.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // The effective spectrum is geometric at t = 0 and classical for
    // t ≫ t_d, positive throughout.
    fn effective_spectrum_interpolates_between_ladders() {
        let q = oscillator();
        for n in 0..6 {
            let g = q.geometric_spectrum(n);
            let c = q.classical_spectrum(n);
            assert!((q.effective_spectrum(n, 0.0) - g).abs() / g < 1e-12);
            assert!((q.effective_spectrum(n, 50.0) - c).abs() / c < 1e-10);
            let mid = q.effective_spectrum(n, 0.5);
            assert!(mid > 0.0);
            assert!(mid <= g.max(c) * (1.0 + 1e-12) && mid >= g.min(c) * (1.0 - 1e-12));
        }
    }

    #[test]
    // Purpose
    // -------
    // The star derivative of the Gaussian envelope matches the
    // closed-form logarithmic rate −t/t_d².
    fn envelope_rate_matches_closed_form() {
        let q = oscillator();
        let t_d = 0.5;
        for t in [0.1, 0.25, 0.5, 1.0] {
            let rate = q.coherence_envelope_rate(t).unwrap();
            let exact = -t / (t_d * t_d);
            assert!((rate - exact).abs() < 1e-5, "t = {t}: {rate} vs {exact}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Non-positive parameters are rejected with their dedicated errors.
    fn validation_names_the_offending_parameter() {
        assert!(matches!(
            QuantumClassicalTransition::new(0.0, 1.0, 1.0).unwrap_err(),
            AppError::InvalidFrequency { .. }
        ));
        assert!(matches!(
            QuantumClassicalTransition::new(1.0, -1.0, 1.0).unwrap_err(),
            AppError::InvalidHbar { .. }
        ));
        assert!(matches!(
            QuantumClassicalTransition::new(1.0, 1.0, f64::NAN).unwrap_err(),
            AppError::InvalidDecoherenceTime { .. }
        ));
    }
}
