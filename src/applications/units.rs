//! applications::units — unit-system selection for the physics layer.
//!
//! Purpose
//! -------
//! Let application parameter bundles carry a unit system and pull the
//! fundamental constants from it, so the same formulas serve Planck,
//! geometrized, and SI workflows. Unknown unit-system names are a
//! propagating typed error, unlike the never-throw numeric layer.
use std::str::FromStr;

use crate::applications::errors::{AppError, AppResult};

/// Unit system for application formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitSystem {
    /// ħ = c = G = k_B = 1. The default for speculative-physics work.
    #[default]
    Planck,
    /// c = G = 1; ħ and k_B keep their SI values.
    Geometric,
    /// Full SI values.
    SI,
}

impl UnitSystem {
    /// Reduced Planck constant.
    pub fn hbar(&self) -> f64 {
        match self {
            UnitSystem::Planck => 1.0,
            UnitSystem::Geometric | UnitSystem::SI => 1.054_571_817e-34,
        }
    }

    /// Speed of light.
    pub fn c(&self) -> f64 {
        match self {
            UnitSystem::Planck | UnitSystem::Geometric => 1.0,
            UnitSystem::SI => 2.997_924_58e8,
        }
    }

    /// Newton's gravitational constant.
    pub fn g_newton(&self) -> f64 {
        match self {
            UnitSystem::Planck | UnitSystem::Geometric => 1.0,
            UnitSystem::SI => 6.674_30e-11,
        }
    }

    /// Boltzmann constant.
    pub fn k_b(&self) -> f64 {
        match self {
            UnitSystem::Planck => 1.0,
            UnitSystem::Geometric | UnitSystem::SI => 1.380_649e-23,
        }
    }
}

impl FromStr for UnitSystem {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.to_lowercase().as_str() {
            "planck" => Ok(UnitSystem::Planck),
            "geometric" | "geometrized" => Ok(UnitSystem::Geometric),
            "si" => Ok(UnitSystem::SI),
            other => Err(AppError::InvalidUnitSystem { name: other.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Name parsing (including the propagating error for unknown names) and
    // the Planck normalization.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Known names parse case-insensitively; an unknown name is the
    // documented propagating constructor error.
    fn unit_system_parsing() {
        assert_eq!(UnitSystem::from_str("Planck").unwrap(), UnitSystem::Planck);
        assert_eq!(UnitSystem::from_str("geometrized").unwrap(), UnitSystem::Geometric);
        assert_eq!(UnitSystem::from_str("SI").unwrap(), UnitSystem::SI);
        assert!(matches!(
            UnitSystem::from_str("natural").unwrap_err(),
            AppError::InvalidUnitSystem { .. }
        ));
    }

    #[test]
    // Purpose
    // -------
    // Planck units normalize all four constants to 1.
    fn planck_units_are_normalized() {
        let u = UnitSystem::Planck;
        assert_eq!(u.hbar(), 1.0);
        assert_eq!(u.c(), 1.0);
        assert_eq!(u.g_newton(), 1.0);
        assert_eq!(u.k_b(), 1.0);
    }
}
