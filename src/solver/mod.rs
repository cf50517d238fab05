//! Dimensional-analysis formula finder.
//!
//! - [`linear`]: exact Gauss–Jordan elimination over rational exponents
//! - [`finder`]: equation construction, solution classification and reports

pub mod finder;
pub mod linear;

pub use finder::{
    unknown_symbol, CandidateExponent, Derivation, Equation, Formula, FormulaFinder, Term,
};
pub use linear::{LinearExpr, LinearSolution, LinearSystem};
