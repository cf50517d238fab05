//! Catalogue of classic physical laws recovered by dimensional analysis.
//!
//! Each [`Law`] names a target quantity and the candidates it may depend on.
//! Running the catalogue through [`FormulaFinder`] reproduces:
//! - Newton's second law and universal gravitation
//! - Ohm's law and the ideal gas law
//! - Stefan–Boltzmann radiation and aerodynamic drag
//! - the Poynting vector, black-body radiation pressure and Hertz dipole power

use serde::Serialize;

use crate::dimension::BaseDimension;
use crate::error::UnitsResult;
use crate::solver::{Derivation, FormulaFinder};
use crate::unit::Unit;

/// A target quantity with the candidates it is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Law {
    /// Human-readable name.
    pub name: &'static str,
    /// Symbol of the target quantity.
    pub target_symbol: &'static str,
    /// Unit of the target quantity.
    pub target: Unit,
    /// Candidate names and units, in order.
    pub candidates: Vec<(&'static str, Unit)>,
}

impl Law {
    /// A finder loaded with this law's target and candidates.
    #[must_use]
    pub fn finder(&self) -> FormulaFinder {
        self.candidates.iter().fold(
            FormulaFinder::new(self.target_symbol, self.target),
            |finder, (name, unit)| finder.candidate_unit(*name, *unit),
        )
    }

    /// Solve this law.
    ///
    /// # Errors
    ///
    /// Propagates [`FormulaFinder::solve`] failures.
    pub fn solve(&self) -> UnitsResult<Derivation> {
        self.finder().solve()
    }
}

/// The built-in catalogue, in presentation order.
#[must_use]
pub fn classic_laws() -> Vec<Law> {
    use BaseDimension::{
        Amount as N, Current as I, Length as L, Mass as M, Temperature as K, Time as T,
    };

    let force = Unit::derived(&[(M, 1), (L, 1), (T, -2)]);
    let pressure = Unit::derived(&[(M, 1), (L, -1), (T, -2)]);
    let power = Unit::derived(&[(M, 1), (L, 2), (T, -3)]);
    let velocity = Unit::derived(&[(L, 1), (T, -1)]);

    vec![
        Law {
            name: "Newton's second law",
            target_symbol: "F",
            target: force,
            candidates: vec![
                ("m", Unit::kilogram()),
                ("a", Unit::derived(&[(L, 1), (T, -2)])),
            ],
        },
        Law {
            name: "Newton's law of universal gravitation",
            target_symbol: "F",
            target: force,
            candidates: vec![
                ("m", Unit::kilogram()),
                ("G", Unit::derived(&[(L, 3), (M, -1), (T, -2)])),
                ("r", Unit::meter()),
            ],
        },
        Law {
            name: "Ohm's law",
            target_symbol: "U",
            target: Unit::derived(&[(M, 1), (L, 2), (T, -3), (I, -1)]),
            candidates: vec![
                ("I", Unit::ampere()),
                ("R", Unit::derived(&[(M, 1), (L, 2), (T, -3), (I, -2)])),
            ],
        },
        Law {
            name: "Ideal gas law",
            target_symbol: "P",
            target: pressure,
            candidates: vec![
                ("V", Unit::derived(&[(L, 3)])),
                ("v", Unit::mole()),
                ("R", Unit::derived(&[(M, 1), (L, 2), (T, -2), (K, -1), (N, -1)])),
                ("T", Unit::kelvin()),
            ],
        },
        Law {
            name: "Stefan–Boltzmann law",
            target_symbol: "P",
            target: power,
            candidates: vec![
                ("σ", Unit::derived(&[(M, 1), (T, -3), (K, -4)])),
                ("A", Unit::derived(&[(L, 2)])),
                ("T", Unit::kelvin()),
            ],
        },
        Law {
            name: "Aerodynamic drag",
            target_symbol: "F",
            target: force,
            candidates: vec![
                ("C", Unit::DIMENSIONLESS),
                ("p", Unit::derived(&[(M, 1), (L, -3)])),
                ("S", Unit::derived(&[(L, 2)])),
                ("v", velocity),
            ],
        },
        Law {
            name: "Poynting vector of an electromagnetic wave",
            target_symbol: "S",
            target: Unit::derived(&[(M, 1), (T, -3)]),
            candidates: vec![
                ("E", Unit::derived(&[(M, 1), (L, 1), (T, -3), (I, -1)])),
                ("H", Unit::derived(&[(I, 1), (L, -1)])),
            ],
        },
        Law {
            name: "Black-body radiation pressure",
            target_symbol: "P_rad",
            target: pressure,
            candidates: vec![
                ("h", Unit::derived(&[(M, 1), (L, 2), (T, -1)])),
                ("c", velocity),
                ("k_B", Unit::derived(&[(M, 1), (L, 2), (T, -2), (K, -1)])),
                ("T", Unit::kelvin()),
            ],
        },
        Law {
            name: "Hertz dipole radiated power",
            target_symbol: "P",
            target: power,
            candidates: vec![
                ("μ0", Unit::derived(&[(M, 1), (L, 1), (T, -2), (I, -2)])),
                ("ω", Unit::derived(&[(T, -1)])),
                ("p0", Unit::derived(&[(I, 1), (T, 1), (L, 1)])),
                ("c", velocity),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_size_and_names() {
        let laws = classic_laws();
        assert_eq!(laws.len(), 9);
        assert_eq!(laws[0].name, "Newton's second law");
        assert!(laws.iter().all(|law| !law.candidates.is_empty()));
    }

    #[test]
    fn test_every_law_is_determined() {
        for law in classic_laws() {
            let derivation = law.solve().unwrap();
            assert!(derivation.is_determined(), "{} underdetermined", law.name);
        }
    }

    #[test]
    fn test_finder_preserves_candidate_order() {
        let law = &classic_laws()[1];
        let finder = law.finder();
        let names: Vec<&str> = finder.candidate_names().collect();
        assert_eq!(names, vec!["m", "G", "r"]);
    }
}
