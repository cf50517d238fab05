//! Power-law discovery by dimensional analysis.
//!
//! Every candidate `c` gets an unknown exponent `x_c`. For each base
//! dimension at least one candidate carries, the target's exponent must
//! equal `Σ component_c · x_c`. The resulting system is solved exactly and
//! reported as `target = k · Π c^(x_c)` with `k` a dimensionless constant.

use std::collections::HashSet;
use std::fmt;

use num_traits::Zero;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::linear::{LinearExpr, LinearSolution, LinearSystem};
use crate::dimension::{superscript, BaseDimension, Exponent};
use crate::error::{UnitsError, UnitsResult};
use crate::quantity::Quantity;
use crate::unit::Unit;

/// Symbol of the `index`-th unknown exponent: `a`, `b`, …, `z`, then `x27`, …
#[must_use]
pub fn unknown_symbol(index: usize) -> String {
    const LETTERS: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";
    LETTERS
        .get(index)
        .map_or_else(|| format!("x{}", index + 1), |&b| char::from(b).to_string())
}

/// Symbol of the `index`-th free parameter: `α`, `β`, …, `θ`, then `α9`, …
#[must_use]
pub fn parameter_symbol(index: usize) -> String {
    const GREEK: [char; 8] = ['α', 'β', 'γ', 'δ', 'ε', 'ζ', 'η', 'θ'];
    GREEK
        .get(index)
        .map_or_else(|| format!("α{}", index + 1), char::to_string)
}

// =============================================================================
// Equations
// =============================================================================

/// `coefficient · symbol` inside an [`Equation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Term {
    pub symbol: String,
    pub coefficient: Exponent,
}

/// Balance of one base dimension: `target = Σ coefficient · symbol`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Equation {
    pub dimension: BaseDimension,
    pub target: Exponent,
    pub terms: Vec<Term>,
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rhs = LinearExpr::from_parts(
            Exponent::zero(),
            self.terms
                .iter()
                .map(|t| (t.symbol.as_str(), t.coefficient))
                .collect(),
        );
        write!(f, "{}: {} = {rhs}", self.dimension, self.target)
    }
}

// =============================================================================
// Results
// =============================================================================

/// Solved exponent of one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateExponent {
    pub name: String,
    pub symbol: String,
    /// Exponent over the free candidates' exponents (names as variables).
    pub exponent: LinearExpr<String>,
}

impl CandidateExponent {
    /// The exponent if it does not depend on any free candidate.
    #[must_use]
    pub fn value(&self) -> Option<Exponent> {
        self.exponent.as_constant()
    }

    /// Check if the exponent is fixed at zero.
    #[must_use]
    pub fn is_non_participating(&self) -> bool {
        self.value().is_some_and(|v| v.is_zero())
    }

    /// `name^exponent` factor, or `None` when the candidate drops out.
    ///
    /// Free candidates in the exponent are written as their parameter
    /// symbols from `parameters`.
    fn factor(&self, parameters: &[(&str, String)]) -> Option<String> {
        match self.value() {
            Some(v) if v.is_zero() => None,
            Some(v) => Some(match superscript(v) {
                Some(sup) => format!("{}{sup}", self.name),
                None => format!("{}^({v})", self.name),
            }),
            None => {
                let exponent = self.exponent.clone().map(|name| {
                    parameters
                        .iter()
                        .find(|(free, _)| *free == name)
                        .map_or(name, |(_, symbol)| symbol.clone())
                });
                Some(format!("{}^({exponent})", self.name))
            }
        }
    }
}

/// A derived power law `target = k · Π name^exponent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Formula {
    target_symbol: String,
    exponents: Vec<CandidateExponent>,
    absorbed: Vec<String>,
    free: Vec<String>,
    equations: Vec<Equation>,
}

impl Formula {
    /// Symbol of the quantity the formula expresses.
    #[must_use]
    pub fn target_symbol(&self) -> &str {
        &self.target_symbol
    }

    /// Exponents of the dimensioned candidates, in insertion order.
    #[must_use]
    pub fn exponents(&self) -> &[CandidateExponent] {
        &self.exponents
    }

    /// Exponent of candidate `name`.
    #[must_use]
    pub fn exponent(&self, name: &str) -> Option<&LinearExpr<String>> {
        self.exponents
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.exponent)
    }

    /// Fixed exponent of candidate `name`, if it has one.
    #[must_use]
    pub fn exponent_value(&self, name: &str) -> Option<Exponent> {
        self.exponent(name).and_then(LinearExpr::as_constant)
    }

    /// Candidates whose exponent is fixed at zero.
    #[must_use]
    pub fn non_participating(&self) -> Vec<&str> {
        self.exponents
            .iter()
            .filter(|c| c.is_non_participating())
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Dimensionless candidates, folded into `k`.
    #[must_use]
    pub fn absorbed(&self) -> &[String] {
        &self.absorbed
    }

    /// Candidates whose exponent is a free parameter.
    #[must_use]
    pub fn free(&self) -> &[String] {
        &self.free
    }

    /// No exponent is a free parameter.
    #[must_use]
    pub fn is_determined(&self) -> bool {
        self.free.is_empty()
    }

    /// Free candidates paired with the parameter symbols their exponents
    /// take in [`Formula::expression`].
    #[must_use]
    pub fn parameters(&self) -> Vec<(&str, String)> {
        self.free
            .iter()
            .enumerate()
            .map(|(index, name)| (name.as_str(), parameter_symbol(index)))
            .collect()
    }

    /// The per-dimension equations the solution satisfies.
    #[must_use]
    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    /// Relations `name = expression` for exponents that depend on free ones.
    #[must_use]
    pub fn relations(&self) -> Vec<String> {
        self.exponents
            .iter()
            .filter(|c| c.value().is_none() && !self.free.contains(&c.name))
            .map(|c| format!("{} = {}", c.name, c.exponent))
            .collect()
    }

    /// The formula line, e.g. `F = k · m¹ · a¹`.
    ///
    /// Free exponents appear as parameters: `F = k · m1^(1 - α) · m2^(α) · a¹`.
    #[must_use]
    pub fn expression(&self) -> String {
        let parameters = self.parameters();
        let factors: Vec<String> = self
            .exponents
            .iter()
            .filter_map(|c| c.factor(&parameters))
            .collect();
        if factors.is_empty() {
            format!("{} = k", self.target_symbol)
        } else {
            format!("{} = k · {}", self.target_symbol, factors.join(" · "))
        }
    }
}

/// Full report: one line per exponent, then the formula.
impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parameters = self.parameters();
        for candidate in &self.exponents {
            if let Some((_, symbol)) = parameters.iter().find(|(n, _)| *n == candidate.name) {
                writeln!(f, "{} is a free parameter, exponent {symbol}", candidate.name)?;
                continue;
            }
            writeln!(f, "{} = {}", candidate.name, candidate.exponent)?;
            if candidate.is_non_participating() {
                writeln!(f, "'{}' does not participate", candidate.name)?;
            }
        }
        for name in &self.absorbed {
            writeln!(f, "'{name}' is dimensionless and absorbed into k")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.expression())?;
        write!(f, "where k is an unspecified dimensionless constant")
    }
}

/// Outcome of [`FormulaFinder::solve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "formula", rename_all = "snake_case")]
pub enum Derivation {
    /// Every exponent is fixed.
    Determined(Formula),
    /// Some exponents are free parameters.
    Underdetermined(Formula),
}

impl Derivation {
    /// The formula, determined or not.
    #[must_use]
    pub const fn formula(&self) -> &Formula {
        match self {
            Self::Determined(f) | Self::Underdetermined(f) => f,
        }
    }

    /// Consume into the formula.
    #[must_use]
    pub fn into_formula(self) -> Formula {
        match self {
            Self::Determined(f) | Self::Underdetermined(f) => f,
        }
    }

    /// Every exponent is fixed.
    #[must_use]
    pub const fn is_determined(&self) -> bool {
        matches!(self, Self::Determined(_))
    }
}

impl fmt::Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.formula(), f)
    }
}

// =============================================================================
// Finder
// =============================================================================

/// Derives the exponents relating a target unit to named candidates.
///
/// ```
/// use dimsolve::prelude::*;
/// use dimsolve::dimension::BaseDimension::{Length, Mass, Time};
///
/// let force = Unit::derived(&[(Mass, 1), (Length, 1), (Time, -2)]);
/// let formula = FormulaFinder::new("F", force)
///     .candidate_unit("m", Unit::kilogram())
///     .candidate_unit("a", Unit::derived(&[(Length, 1), (Time, -2)]))
///     .find_formula()
///     .unwrap();
/// assert_eq!(formula.expression(), "F = k · m¹ · a¹");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaFinder {
    target_symbol: String,
    target: Unit,
    candidates: Vec<(String, Unit)>,
}

impl FormulaFinder {
    /// A finder for `target_symbol` with no candidates yet.
    #[must_use]
    pub fn new(target_symbol: impl Into<String>, target: Unit) -> Self {
        Self {
            target_symbol: target_symbol.into(),
            target,
            candidates: Vec::new(),
        }
    }

    /// Add a candidate quantity; only its unit is used.
    #[must_use]
    pub fn candidate(self, name: impl Into<String>, quantity: &Quantity) -> Self {
        self.candidate_unit(name, quantity.unit())
    }

    /// Add a candidate unit.
    #[must_use]
    pub fn candidate_unit(mut self, name: impl Into<String>, unit: Unit) -> Self {
        self.candidates.push((name.into(), unit));
        self
    }

    /// Symbol of the target quantity.
    #[must_use]
    pub fn target_symbol(&self) -> &str {
        &self.target_symbol
    }

    /// Unit the candidates must combine into.
    #[must_use]
    pub const fn target(&self) -> Unit {
        self.target
    }

    /// Candidate names in insertion order.
    pub fn candidate_names(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(|(name, _)| name.as_str())
    }

    /// One equation per base dimension carried by at least one candidate.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::NoSolution`] if the target carries a dimension
    /// no candidate has.
    pub fn equations(&self) -> UnitsResult<Vec<Equation>> {
        let mut equations = Vec::new();
        for dimension in BaseDimension::ALL {
            let target = self.target.dimensions().component(dimension);
            let terms: Vec<Term> = self
                .candidates
                .iter()
                .enumerate()
                .filter_map(|(index, (_, unit))| {
                    let coefficient = unit.dimensions().component(dimension);
                    (!coefficient.is_zero()).then(|| Term {
                        symbol: unknown_symbol(index),
                        coefficient,
                    })
                })
                .collect();

            if terms.is_empty() {
                if !target.is_zero() {
                    warn!(symbol = %self.target_symbol, %dimension, "target dimension carried by no candidate");
                    return Err(UnitsError::no_solution(format!(
                        "no candidate carries {dimension}, but {} needs exponent {target}",
                        self.target_symbol
                    )));
                }
                continue;
            }

            let equation = Equation {
                dimension,
                target,
                terms,
            };
            debug!(%equation, "dimension equation");
            equations.push(equation);
        }
        Ok(equations)
    }

    /// Solve for the exponents.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::DuplicateCandidate`] for a repeated name and
    /// [`UnitsError::NoSolution`] for an inconsistent system.
    pub fn solve(&self) -> UnitsResult<Derivation> {
        self.check_names()?;
        let equations = self.equations()?;

        // Dimensionless candidates appear in no equation.
        let (dimensioned, absorbed): (Vec<usize>, Vec<usize>) = (0..self.candidates.len())
            .partition(|&i| !self.candidates[i].1.is_dimensionless());
        let column_of = |candidate: usize| dimensioned.iter().position(|&c| c == candidate);

        let mut system = LinearSystem::new(dimensioned.len());
        for equation in &equations {
            let terms = self
                .candidates
                .iter()
                .enumerate()
                .filter_map(|(index, (_, unit))| {
                    let coefficient = unit.dimensions().component(equation.dimension);
                    column_of(index).map(|column| (column, coefficient))
                });
            system.push_equation(terms, equation.target)?;
        }

        let name_of = |column: usize| self.candidates[dimensioned[column]].0.clone();
        let (expressions, free): (Vec<LinearExpr<String>>, Vec<String>) = match system.solve()? {
            LinearSolution::Unique(values) => (
                values.into_iter().map(LinearExpr::constant).collect(),
                Vec::new(),
            ),
            LinearSolution::Parametric { expressions, free } => (
                expressions.into_iter().map(|e| e.map(name_of)).collect(),
                free.into_iter().map(name_of).collect(),
            ),
            LinearSolution::Inconsistent { equation } => {
                let dimension = equations
                    .get(equation)
                    .map_or_else(|| "unknown".to_string(), |e| e.dimension.to_string());
                warn!(symbol = %self.target_symbol, %dimension, "no exponents balance the dimensions");
                return Err(UnitsError::no_solution(format!(
                    "the {dimension} balance of {} cannot be satisfied",
                    self.target_symbol
                )));
            }
        };

        let exponents = dimensioned
            .iter()
            .zip(expressions)
            .map(|(&index, exponent)| CandidateExponent {
                name: self.candidates[index].0.clone(),
                symbol: unknown_symbol(index),
                exponent,
            })
            .collect();
        let formula = Formula {
            target_symbol: self.target_symbol.clone(),
            exponents,
            absorbed: absorbed
                .into_iter()
                .map(|i| self.candidates[i].0.clone())
                .collect(),
            free,
            equations,
        };

        if formula.is_determined() {
            info!(formula = %formula.expression(), "formula determined");
            Ok(Derivation::Determined(formula))
        } else {
            warn!(
                formula = %formula.expression(),
                free = ?formula.free(),
                "formula underdetermined"
            );
            Ok(Derivation::Underdetermined(formula))
        }
    }

    /// Solve and require every exponent to be fixed.
    ///
    /// # Errors
    ///
    /// As [`FormulaFinder::solve`], plus [`UnitsError::Underdetermined`]
    /// when free parameters remain.
    pub fn find_formula(&self) -> UnitsResult<Formula> {
        match self.solve()? {
            Derivation::Determined(formula) => Ok(formula),
            Derivation::Underdetermined(formula) => Err(UnitsError::Underdetermined {
                relations: formula.relations(),
                free: formula.free,
            }),
        }
    }

    fn check_names(&self) -> UnitsResult<()> {
        let mut seen = HashSet::new();
        for (name, _) in &self.candidates {
            if !seen.insert(name.as_str()) {
                return Err(UnitsError::DuplicateCandidate(name.clone()));
            }
        }
        Ok(())
    }
}
