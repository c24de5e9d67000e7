//! Numeric safety utilities for generator and operator arithmetic.
//!
//! Provides the guarded primitives that keep meta-calculus arithmetic
//! inside a well-conditioned `f64` regime: a tiny substitution epsilon,
//! signed denominator clamping, guarded division, and exponent clipping.
//! The strategies mirror the explicit-cutoff approach used by mainstream
//! numeric libraries rather than relying on IEEE saturation behavior.
//!
//! # Provided items
//! - [`EPSILON`]: the substitution floor (`1e-100`) used wherever a value
//!   must be kept away from zero.
//! - [`EXP_CLIP`]: the exponent magnitude (`700.0`) beyond which `exp`
//!   would overflow/underflow `f64`.
//! - [`clamp_denominator(d)`]: push `|d|` up to [`EPSILON`] preserving sign.
//! - [`safe_div(n, d)`]: division with a clamped denominator.
//! - [`safe_exp(x)`]: `exp` with the argument clipped to `±`[`EXP_CLIP`].
//! - [`safe_ln(x)`]: odd-symmetric guarded logarithm.
//!
//! # Rationale
//! Generators promise a never-throw contract: out-of-domain inputs are
//! substituted with finite surrogates instead of raising. Centralizing
//! the substitutions here keeps that contract auditable in one place.

/// Substitution floor for denominators and logarithm arguments.
///
/// Any magnitude below this value is treated as "numerically zero" and
/// replaced by `EPSILON` (with the original sign) before division or
/// `ln`. Chosen small enough that legitimate physics scales (down to
/// Planck-suppressed ratios around `1e-122`) pass through unclamped.
pub const EPSILON: f64 = 1e-100;

/// Exponent clip: `exp(x)` overflows `f64` near `x ≈ 709.8`.
pub const EXP_CLIP: f64 = 700.0;

/// Clamp a denominator away from zero, preserving its sign.
///
/// Zero maps to `+EPSILON`; values with `|d| < EPSILON` map to
/// `±EPSILON`. Finite inputs always produce finite outputs.
#[inline]
pub fn clamp_denominator(d: f64) -> f64 {
    if d.abs() >= EPSILON {
        d
    } else if d.is_sign_negative() {
        -EPSILON
    } else {
        EPSILON
    }
}

/// Division with the denominator clamped via [`clamp_denominator`].
#[inline]
pub fn safe_div(n: f64, d: f64) -> f64 {
    n / clamp_denominator(d)
}

/// `exp` with the argument clipped to `[-EXP_CLIP, EXP_CLIP]`.
///
/// Keeps the result strictly positive and finite for any finite input.
#[inline]
pub fn safe_exp(x: f64) -> f64 {
    x.clamp(-EXP_CLIP, EXP_CLIP).exp()
}

/// Odd-symmetric guarded logarithm: `sign(x) · ln(max(|x|, EPSILON))`.
///
/// Non-positive inputs are substituted rather than rejected: `0` maps to
/// `ln(EPSILON)` and negative inputs carry their sign through. This is
/// the substitution behavior callers of the `Log` generator rely on.
#[inline]
pub fn safe_ln(x: f64) -> f64 {
    let mag = x.abs().max(EPSILON);
    if x < 0.0 { -mag.ln() } else { mag.ln() }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Sign preservation and flooring behavior of the denominator clamp.
    // - Finiteness of guarded division, exponent, and logarithm on edge inputs.
    //
    // They intentionally DO NOT cover:
    // - Generator-level substitution semantics (covered in calculus::generators).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that the denominator clamp floors tiny magnitudes at EPSILON and
    // preserves the sign of negative inputs.
    fn clamp_denominator_floors_and_preserves_sign() {
        assert_eq!(clamp_denominator(0.0), EPSILON);
        assert_eq!(clamp_denominator(1e-200), EPSILON);
        assert_eq!(clamp_denominator(-1e-200), -EPSILON);
        assert_eq!(clamp_denominator(2.5), 2.5);
        assert_eq!(clamp_denominator(-2.5), -2.5);
    }

    #[test]
    // Purpose
    // -------
    // Confirm that safe_div never produces NaN or infinity for finite inputs,
    // even with a zero denominator.
    fn safe_div_is_finite_for_zero_denominator() {
        let out = safe_div(1.0, 0.0);
        assert!(out.is_finite());
        assert!(out > 0.0); // zero denominator clamps to +EPSILON
        assert!(safe_div(-1.0, 0.0) < 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Ensure safe_exp saturates instead of overflowing for huge arguments.
    fn safe_exp_saturates_on_large_magnitudes() {
        assert!(safe_exp(1e6).is_finite());
        assert!(safe_exp(-1e6) > 0.0);
        assert!((safe_exp(1.0) - 1.0_f64.exp()).abs() < 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Check the odd-symmetric substitution behavior of safe_ln on zero and
    // negative inputs.
    fn safe_ln_substitutes_on_non_positive_inputs() {
        assert_eq!(safe_ln(0.0), EPSILON.ln());
        assert_eq!(safe_ln(-2.0), -(2.0_f64.ln()));
        assert!((safe_ln(2.0) - 2.0_f64.ln()).abs() < 1e-15);
    }
}
