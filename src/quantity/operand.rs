//! Operand dispatch for the arithmetic operators.
//!
//! Each operator is one `match` over the pair of operand kinds. Scalars are
//! plain decimals: dimensionless and exact.

use std::ops::{Add, Div, Mul, Sub};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{propagation, Quantity};
use crate::config::{self, UnitsConfig};
use crate::error::{UnitsError, UnitsResult};

/// Either side of a binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    /// A bare number.
    Scalar(Decimal),
    /// A quantity with unit and uncertainty.
    Quantity(Quantity),
}

impl Operand {
    /// The value regardless of kind.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        match self {
            Self::Scalar(v) => *v,
            Self::Quantity(q) => q.value(),
        }
    }

    /// The quantity, or `None` for a scalar.
    #[must_use]
    pub const fn as_quantity(&self) -> Option<&Quantity> {
        match self {
            Self::Scalar(_) => None,
            Self::Quantity(q) => Some(q),
        }
    }
}

impl From<Decimal> for Operand {
    fn from(value: Decimal) -> Self {
        Self::Scalar(value)
    }
}

impl From<i64> for Operand {
    fn from(value: i64) -> Self {
        Self::Scalar(Decimal::from(value))
    }
}

impl From<i32> for Operand {
    fn from(value: i32) -> Self {
        Self::Scalar(Decimal::from(value))
    }
}

impl From<Quantity> for Operand {
    fn from(value: Quantity) -> Self {
        Self::Quantity(value)
    }
}

impl From<&Quantity> for Operand {
    fn from(value: &Quantity) -> Self {
        Self::Quantity(*value)
    }
}

impl TryFrom<f64> for Operand {
    type Error = UnitsError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Quantity::try_from(value).map(|q| Self::Scalar(q.value()))
    }
}

/// `lhs + rhs`.
///
/// # Errors
///
/// Propagates unit and arithmetic failures of the chosen kernel.
pub fn add(lhs: Operand, rhs: Operand, config: &UnitsConfig) -> UnitsResult<Operand> {
    match (lhs, rhs) {
        (Operand::Scalar(a), Operand::Scalar(b)) => {
            Ok(scalar(propagation::checked_add(a, b)?, config))
        }
        (Operand::Quantity(q), other) => q.add_with(other, config).map(Operand::Quantity),
        (Operand::Scalar(s), Operand::Quantity(q)) => {
            q.radd_with(s, config).map(Operand::Quantity)
        }
    }
}

/// `lhs - rhs`.
///
/// # Errors
///
/// Propagates unit and arithmetic failures of the chosen kernel.
pub fn sub(lhs: Operand, rhs: Operand, config: &UnitsConfig) -> UnitsResult<Operand> {
    match (lhs, rhs) {
        (Operand::Scalar(a), Operand::Scalar(b)) => {
            Ok(scalar(propagation::checked_sub(a, b)?, config))
        }
        (Operand::Quantity(q), other) => q.sub_with(other, config).map(Operand::Quantity),
        (Operand::Scalar(s), Operand::Quantity(q)) => {
            q.rsub_with(s, config).map(Operand::Quantity)
        }
    }
}

/// `lhs * rhs`.
///
/// # Errors
///
/// Propagates arithmetic failures of the chosen kernel.
pub fn mul(lhs: Operand, rhs: Operand, config: &UnitsConfig) -> UnitsResult<Operand> {
    match (lhs, rhs) {
        (Operand::Scalar(a), Operand::Scalar(b)) => {
            Ok(scalar(propagation::checked_mul(a, b)?, config))
        }
        (Operand::Quantity(q), other) => q.mul_with(other, config).map(Operand::Quantity),
        (Operand::Scalar(s), Operand::Quantity(q)) => {
            q.rmul_with(s, config).map(Operand::Quantity)
        }
    }
}

/// `lhs / rhs`.
///
/// # Errors
///
/// Propagates arithmetic failures of the chosen kernel.
pub fn div(lhs: Operand, rhs: Operand, config: &UnitsConfig) -> UnitsResult<Operand> {
    match (lhs, rhs) {
        (Operand::Scalar(a), Operand::Scalar(b)) => {
            Ok(scalar(propagation::checked_div(a, b)?, config))
        }
        (Operand::Quantity(q), other) => q.div_with(other, config).map(Operand::Quantity),
        (Operand::Scalar(s), Operand::Quantity(q)) => {
            q.rdiv_with(s, config).map(Operand::Quantity)
        }
    }
}

/// `lhs ^ rhs`.
///
/// # Errors
///
/// Propagates unit and arithmetic failures of the chosen kernel.
pub fn pow(lhs: Operand, rhs: Operand, config: &UnitsConfig) -> UnitsResult<Operand> {
    match (lhs, rhs) {
        (Operand::Scalar(a), Operand::Scalar(b)) => {
            Ok(scalar(propagation::checked_pow(a, b)?, config))
        }
        (Operand::Quantity(q), other) => q.pow_with(other, config).map(Operand::Quantity),
        (Operand::Scalar(s), Operand::Quantity(q)) => {
            q.rpow_with(s, config).map(Operand::Quantity)
        }
    }
}

fn scalar(value: Decimal, config: &UnitsConfig) -> Operand {
    Operand::Scalar(config.round(value))
}

// ===== Operator traits =====

macro_rules! fallible_operator {
    ($trait:ident, $method:ident, $forward:ident, $reverse:ident) => {
        impl $trait for Quantity {
            type Output = UnitsResult<Quantity>;

            fn $method(self, rhs: Self) -> Self::Output {
                self.$forward(rhs, config::global())
            }
        }

        impl $trait<&Quantity> for &Quantity {
            type Output = UnitsResult<Quantity>;

            fn $method(self, rhs: &Quantity) -> Self::Output {
                self.$forward(rhs, config::global())
            }
        }

        impl $trait<Decimal> for Quantity {
            type Output = UnitsResult<Quantity>;

            fn $method(self, rhs: Decimal) -> Self::Output {
                self.$forward(rhs, config::global())
            }
        }

        impl $trait<Quantity> for Decimal {
            type Output = UnitsResult<Quantity>;

            fn $method(self, rhs: Quantity) -> Self::Output {
                rhs.$reverse(self, config::global())
            }
        }
    };
}

fallible_operator!(Add, add, add_with, radd_with);
fallible_operator!(Sub, sub, sub_with, rsub_with);
fallible_operator!(Mul, mul, mul_with, rmul_with);
fallible_operator!(Div, div, div_with, rdiv_with);
