//! Exact linear systems over the rationals.
//!
//! Gauss–Jordan elimination on the augmented matrix classifies a system as
//! having one solution, a family parametrised by free unknowns, or none.

use std::fmt;

use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub, One, Signed, Zero};
use serde::Serialize;
use tracing::debug;

use crate::dimension::Exponent;
use crate::error::{UnitsError, UnitsResult};

/// `constant + Σ coefficient·variable`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinearExpr<V> {
    constant: Exponent,
    terms: Vec<(V, Exponent)>,
}

impl<V> LinearExpr<V> {
    /// A constant with no variable terms.
    #[must_use]
    pub fn constant(value: Exponent) -> Self {
        Self {
            constant: value,
            terms: Vec::new(),
        }
    }

    pub(crate) fn from_parts(constant: Exponent, terms: Vec<(V, Exponent)>) -> Self {
        Self { constant, terms }
    }

    /// The single variable `var` with coefficient 1.
    #[must_use]
    pub fn variable(var: V) -> Self {
        Self {
            constant: Exponent::zero(),
            terms: vec![(var, Exponent::one())],
        }
    }

    /// The value if the expression has no variable terms.
    #[must_use]
    pub fn as_constant(&self) -> Option<Exponent> {
        self.terms.is_empty().then_some(self.constant)
    }

    /// The constant part, ignoring variable terms.
    #[must_use]
    pub const fn constant_term(&self) -> Exponent {
        self.constant
    }

    /// Variables with their non-zero coefficients.
    #[must_use]
    pub fn terms(&self) -> &[(V, Exponent)] {
        &self.terms
    }

    /// Relabel the variables.
    pub fn map<W>(self, mut f: impl FnMut(V) -> W) -> LinearExpr<W> {
        LinearExpr {
            constant: self.constant,
            terms: self.terms.into_iter().map(|(v, c)| (f(v), c)).collect(),
        }
    }
}

/// Renders like `1 - b` or `2·b + 1/2`.
impl<V: fmt::Display> fmt::Display for LinearExpr<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        if !self.constant.is_zero() || self.terms.is_empty() {
            out.push_str(&self.constant.to_string());
        }
        for (var, coef) in &self.terms {
            let magnitude = coef.abs();
            let body = if magnitude.is_one() {
                var.to_string()
            } else if magnitude.is_integer() {
                format!("{magnitude}·{var}")
            } else {
                format!("({magnitude})·{var}")
            };
            if out.is_empty() {
                if coef.is_negative() {
                    out.push('-');
                }
            } else {
                out.push_str(if coef.is_negative() { " - " } else { " + " });
            }
            out.push_str(&body);
        }
        f.write_str(&out)
    }
}

/// Outcome of solving a [`LinearSystem`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinearSolution {
    /// Exactly one solution.
    Unique(Vec<Exponent>),
    /// Infinitely many solutions. Every unknown is expressed over `free`.
    Parametric {
        expressions: Vec<LinearExpr<usize>>,
        free: Vec<usize>,
    },
    /// No solution; `equation` is the index of an equation that reduced to
    /// `0 = c` with `c ≠ 0`.
    Inconsistent { equation: usize },
}

/// `A·x = b` with rational coefficients, built one equation at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearSystem {
    unknowns: usize,
    rows: Vec<Vec<Exponent>>,
    constants: Vec<Exponent>,
}

impl LinearSystem {
    /// An empty system over `unknowns` variables.
    #[must_use]
    pub const fn new(unknowns: usize) -> Self {
        Self {
            unknowns,
            rows: Vec::new(),
            constants: Vec::new(),
        }
    }

    /// Number of unknowns.
    #[must_use]
    pub const fn unknowns(&self) -> usize {
        self.unknowns
    }

    /// Number of equations pushed so far.
    #[must_use]
    pub fn equations(&self) -> usize {
        self.rows.len()
    }

    /// Append `Σ coefficient·x[index] = constant`.
    ///
    /// Repeated indices accumulate.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::Arithmetic`] if an index is out of range or
    /// accumulating a coefficient overflows.
    pub fn push_equation(
        &mut self,
        terms: impl IntoIterator<Item = (usize, Exponent)>,
        constant: Exponent,
    ) -> UnitsResult<()> {
        let mut row = vec![Exponent::zero(); self.unknowns];
        for (index, coefficient) in terms {
            let slot = row.get_mut(index).ok_or_else(|| {
                UnitsError::arithmetic(format!(
                    "unknown x{index} out of range for a system of {} unknowns",
                    self.unknowns
                ))
            })?;
            *slot = slot
                .checked_add(&coefficient)
                .ok_or_else(|| overflow("accumulation"))?;
        }
        self.rows.push(row);
        self.constants.push(constant);
        Ok(())
    }

    /// Solve by Gauss–Jordan elimination.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::Arithmetic`] if an elimination step leaves the
    /// 64-bit rational range.
    pub fn solve(&self) -> UnitsResult<LinearSolution> {
        // (coefficients, constant, original equation index)
        let mut rows: Vec<(Vec<Exponent>, Exponent, usize)> = self
            .rows
            .iter()
            .cloned()
            .zip(self.constants.iter().copied())
            .enumerate()
            .map(|(origin, (coefficients, constant))| (coefficients, constant, origin))
            .collect();

        let mut pivot_columns = Vec::new();
        let mut rank = 0;
        for column in 0..self.unknowns {
            if rank == rows.len() {
                break;
            }
            let Some(found) = (rank..rows.len()).find(|&r| !rows[r].0[column].is_zero()) else {
                continue;
            };
            rows.swap(rank, found);

            let pivot = rows[rank].0[column];
            debug!(column, row = rows[rank].2, %pivot, "pivot");
            for value in &mut rows[rank].0 {
                *value = value
                    .checked_div(&pivot)
                    .ok_or_else(|| overflow("normalisation"))?;
            }
            rows[rank].1 = rows[rank]
                .1
                .checked_div(&pivot)
                .ok_or_else(|| overflow("normalisation"))?;

            let (pivot_coefficients, pivot_constant) = (rows[rank].0.clone(), rows[rank].1);
            for (index, row) in rows.iter_mut().enumerate() {
                let factor = row.0[column];
                if index == rank || factor.is_zero() {
                    continue;
                }
                for (value, p) in row.0.iter_mut().zip(&pivot_coefficients) {
                    *value = eliminate(*value, factor, *p)?;
                }
                row.1 = eliminate(row.1, factor, pivot_constant)?;
            }

            pivot_columns.push(column);
            rank += 1;
        }

        if let Some((_, _, origin)) = rows[rank..].iter().find(|(_, c, _)| !c.is_zero()) {
            debug!(equation = origin, "inconsistent equation");
            return Ok(LinearSolution::Inconsistent { equation: *origin });
        }

        let free: Vec<usize> = (0..self.unknowns)
            .filter(|c| !pivot_columns.contains(c))
            .collect();

        if free.is_empty() {
            let mut values = vec![Exponent::zero(); self.unknowns];
            for (row, &column) in pivot_columns.iter().enumerate() {
                values[column] = rows[row].1;
            }
            return Ok(LinearSolution::Unique(values));
        }

        let mut expressions: Vec<LinearExpr<usize>> =
            (0..self.unknowns).map(LinearExpr::variable).collect();
        for (row, &column) in pivot_columns.iter().enumerate() {
            let (coefficients, constant, _) = &rows[row];
            let mut terms = Vec::new();
            for &f in free.iter().filter(|&&f| !coefficients[f].is_zero()) {
                let negated = Exponent::zero()
                    .checked_sub(&coefficients[f])
                    .ok_or_else(|| overflow("back substitution"))?;
                terms.push((f, negated));
            }
            expressions[column] = LinearExpr {
                constant: *constant,
                terms,
            };
        }
        Ok(LinearSolution::Parametric { expressions, free })
    }
}

/// `value - factor·pivot`.
fn eliminate(value: Exponent, factor: Exponent, pivot: Exponent) -> UnitsResult<Exponent> {
    factor
        .checked_mul(&pivot)
        .and_then(|product| value.checked_sub(&product))
        .ok_or_else(|| overflow("elimination"))
}

fn overflow(step: &str) -> UnitsError {
    UnitsError::arithmetic(format!(
        "coefficient overflows 64-bit rational range during {step}"
    ))
}
