//! scheme::calculi — the named calculus schemes.
//!
//! Purpose
//! -------
//! Name the four standard generator pairings so observables can be
//! evaluated "under a scheme" without assembling generator pairs by
//! hand: classical (both axes linear), geometric (multiplicative value
//! axis), bigeometric (both axes multiplicative), and anageometric
//! (multiplicative argument axis).
use std::str::FromStr;

use crate::calculus::errors::{CalcError, CalcResult};
use crate::calculus::generators::{AnyGenerator, Identity, Log};

/// A named generator pairing `(α, β)` for the argument and value axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalculusScheme {
    /// `(Identity, Identity)` — ordinary calculus.
    #[default]
    Classical,
    /// `(Identity, Log)` — multiplicative value axis.
    Geometric,
    /// `(Log, Log)` — multiplicative both axes.
    Bigeometric,
    /// `(Log, Identity)` — multiplicative argument axis.
    Anageometric,
}

impl CalculusScheme {
    /// All four schemes, in comparison order.
    pub const ALL: [CalculusScheme; 4] = [
        CalculusScheme::Classical,
        CalculusScheme::Geometric,
        CalculusScheme::Bigeometric,
        CalculusScheme::Anageometric,
    ];

    /// The `(α, β)` generator pair of the scheme.
    pub fn generators(&self) -> (AnyGenerator, AnyGenerator) {
        match self {
            CalculusScheme::Classical => {
                (AnyGenerator::Identity(Identity), AnyGenerator::Identity(Identity))
            }
            CalculusScheme::Geometric => {
                (AnyGenerator::Identity(Identity), AnyGenerator::Log(Log))
            }
            CalculusScheme::Bigeometric => (AnyGenerator::Log(Log), AnyGenerator::Log(Log)),
            CalculusScheme::Anageometric => {
                (AnyGenerator::Log(Log), AnyGenerator::Identity(Identity))
            }
        }
    }

    /// Lowercase display name.
    pub fn name(&self) -> &'static str {
        match self {
            CalculusScheme::Classical => "classical",
            CalculusScheme::Geometric => "geometric",
            CalculusScheme::Bigeometric => "bigeometric",
            CalculusScheme::Anageometric => "anageometric",
        }
    }
}

impl FromStr for CalculusScheme {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        match s.to_lowercase().as_str() {
            "classical" => Ok(CalculusScheme::Classical),
            "geometric" => Ok(CalculusScheme::Geometric),
            "bigeometric" => Ok(CalculusScheme::Bigeometric),
            "anageometric" => Ok(CalculusScheme::Anageometric),
            other => Err(CalcError::UnknownGenerator { name: other.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculus::generators::Generator;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Scheme-to-generator wiring and name parsing.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Each scheme hands back the documented axis transforms.
    fn schemes_wire_the_documented_generator_pairs() {
        let (a, b) = CalculusScheme::Classical.generators();
        assert_eq!(a.transform(3.0), 3.0);
        assert_eq!(b.transform(3.0), 3.0);

        let (a, b) = CalculusScheme::Bigeometric.generators();
        assert!((a.transform(std::f64::consts::E) - 1.0).abs() < 1e-12);
        assert!((b.transform(1.0)).abs() < 1e-12);

        let (a, b) = CalculusScheme::Geometric.generators();
        assert_eq!(a.transform(2.0), 2.0);
        assert!((b.transform(std::f64::consts::E) - 1.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Known names parse; an unknown name is a typed error.
    fn scheme_names_round_trip() {
        for s in CalculusScheme::ALL {
            assert_eq!(CalculusScheme::from_str(s.name()).unwrap(), s);
        }
        assert!(matches!(
            CalculusScheme::from_str("quantum").unwrap_err(),
            CalcError::UnknownGenerator { .. }
        ));
    }
}
