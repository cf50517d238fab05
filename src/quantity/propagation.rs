//! First-order uncertainty propagation rules.
//!
//! Absolute uncertainties combine for sums and differences; relative
//! uncertainties combine for products, quotients and powers. Each rule comes
//! in a worst-case ([`UncertaintyMode::MaxDeviation`]) and a quadrature
//! ([`UncertaintyMode::RootSumSquare`]) flavour. All results are
//! non-negative.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};

use super::{PowerPropagation, UncertaintyMode};
use crate::error::{UnitsError, UnitsResult};

pub(crate) fn checked_add(a: Decimal, b: Decimal) -> UnitsResult<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| UnitsError::arithmetic(format!("overflow in {a} + {b}")))
}

pub(crate) fn checked_sub(a: Decimal, b: Decimal) -> UnitsResult<Decimal> {
    a.checked_sub(b)
        .ok_or_else(|| UnitsError::arithmetic(format!("overflow in {a} - {b}")))
}

pub(crate) fn checked_mul(a: Decimal, b: Decimal) -> UnitsResult<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| UnitsError::arithmetic(format!("overflow in {a} * {b}")))
}

pub(crate) fn checked_div(a: Decimal, b: Decimal) -> UnitsResult<Decimal> {
    if b.is_zero() {
        return Err(UnitsError::arithmetic(format!("division of {a} by zero")));
    }
    a.checked_div(b)
        .ok_or_else(|| UnitsError::arithmetic(format!("overflow in {a} / {b}")))
}

fn checked_sqrt(a: Decimal) -> UnitsResult<Decimal> {
    a.sqrt()
        .ok_or_else(|| UnitsError::arithmetic(format!("square root of {a}")))
}

fn checked_ln(a: Decimal) -> UnitsResult<Decimal> {
    a.checked_ln()
        .ok_or_else(|| UnitsError::arithmetic(format!("logarithm of non-positive value {a}")))
}

/// `base ^ exponent` for decimal operands.
///
/// Integer exponents use repeated multiplication and accept any base;
/// fractional exponents need a non-negative base.
pub(crate) fn checked_pow(base: Decimal, exponent: Decimal) -> UnitsResult<Decimal> {
    if exponent.is_zero() {
        return Ok(Decimal::ONE);
    }
    if exponent.fract().is_zero() {
        if let Some(n) = exponent.to_i64() {
            return base.checked_powi(n).ok_or_else(|| {
                UnitsError::arithmetic(format!("{base} ^ {exponent} is not representable"))
            });
        }
    }
    if base.is_zero() {
        return if exponent.is_sign_positive() {
            Ok(Decimal::ZERO)
        } else {
            Err(UnitsError::arithmetic(format!("0 ^ {exponent} is undefined")))
        };
    }
    if base.is_sign_negative() {
        return Err(UnitsError::arithmetic(format!(
            "negative base {base} with fractional exponent {exponent}"
        )));
    }
    base.checked_powd(exponent)
        .ok_or_else(|| UnitsError::arithmetic(format!("{base} ^ {exponent} is not representable")))
}

/// `|uncertainty / value|`, zero when there is no uncertainty.
///
/// # Errors
///
/// Fails for a zero value carrying a nonzero uncertainty.
pub(crate) fn relative(uncertainty: Decimal, value: Decimal) -> UnitsResult<Decimal> {
    if uncertainty.is_zero() {
        return Ok(Decimal::ZERO);
    }
    if value.is_zero() {
        return Err(UnitsError::arithmetic(format!(
            "relative uncertainty of a zero value with uncertainty {uncertainty}"
        )));
    }
    Ok(checked_div(uncertainty, value)?.abs())
}

/// Combine two non-negative terms linearly or in quadrature.
fn combine(mode: UncertaintyMode, a: Decimal, b: Decimal) -> UnitsResult<Decimal> {
    match mode {
        UncertaintyMode::MaxDeviation => checked_add(a, b),
        UncertaintyMode::RootSumSquare => {
            checked_sqrt(checked_add(checked_mul(a, a)?, checked_mul(b, b)?)?)
        }
    }
}

/// Sum or difference: `e1 + e2` or `sqrt(e1² + e2²)`.
pub(crate) fn add_sub(mode: UncertaintyMode, e1: Decimal, e2: Decimal) -> UnitsResult<Decimal> {
    combine(mode, e1.abs(), e2.abs())
}

/// Product or quotient with result `v3`:
/// `|v3|·(r1 + r2)` or `|v3|·sqrt(r1² + r2²)` where `r = e/v`.
pub(crate) fn mul_div(
    mode: UncertaintyMode,
    v3: Decimal,
    (v1, e1): (Decimal, Decimal),
    (v2, e2): (Decimal, Decimal),
) -> UnitsResult<Decimal> {
    let r1 = relative(e1, v1)?;
    let r2 = relative(e2, v2)?;
    checked_mul(v3.abs(), combine(mode, r1, r2)?)
}

/// Power with a plain numeric exponent `p`: `|v3|·|p|·(e1/v1)` in both modes.
pub(crate) fn pow_numeric(
    v3: Decimal,
    exponent: Decimal,
    (v1, e1): (Decimal, Decimal),
) -> UnitsResult<Decimal> {
    let r1 = relative(e1, v1)?;
    checked_mul(v3.abs(), checked_mul(exponent.abs(), r1)?)
}

/// Power whose exponent `(p, ep)` is itself uncertain.
///
/// Log-derivative terms are `p·e1/v1` and `ln(v1)·ep`. Under
/// [`PowerPropagation::LogDerivative`] they always combine in quadrature,
/// whatever the mode; [`PowerPropagation::ModeAware`] follows `mode`.
pub(crate) fn pow_quantity(
    rule: PowerPropagation,
    mode: UncertaintyMode,
    v3: Decimal,
    (v1, e1): (Decimal, Decimal),
    (p, ep): (Decimal, Decimal),
) -> UnitsResult<Decimal> {
    let base_term = checked_mul(p.abs(), relative(e1, v1)?)?;
    let exponent_term = if ep.is_zero() {
        Decimal::ZERO
    } else {
        checked_mul(checked_ln(v1)?, ep)?.abs()
    };
    let combined = match rule {
        PowerPropagation::LogDerivative => {
            combine(UncertaintyMode::RootSumSquare, base_term, exponent_term)?
        }
        PowerPropagation::ModeAware => combine(mode, base_term, exponent_term)?,
    };
    checked_mul(v3.abs(), combined)
}

/// Numeric base raised to an uncertain exponent: `|base^p · ln(base) · ep|`,
/// where `v3 = base^p`.
pub(crate) fn rpow(v3: Decimal, base: Decimal, ep: Decimal) -> UnitsResult<Decimal> {
    if ep.is_zero() {
        return Ok(Decimal::ZERO);
    }
    Ok(checked_mul(checked_mul(v3, checked_ln(base)?)?, ep)?.abs())
}

/// Scalar over an uncertain quantity: `|v3|·(e/v)`.
pub(crate) fn reciprocal(v3: Decimal, (v, e): (Decimal, Decimal)) -> UnitsResult<Decimal> {
    checked_mul(v3.abs(), relative(e, v)?)
}

/// Uncertainty scaled by an exact factor: `|factor|·e`.
pub(crate) fn scaled(factor: Decimal, e: Decimal) -> UnitsResult<Decimal> {
    checked_mul(factor.abs(), e)
}
