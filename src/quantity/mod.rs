//! Measured quantities: a decimal value with a unit and an uncertainty.
//!
//! Arithmetic never mutates its operands. Each operator checks units first,
//! then computes the value and propagates the uncertainty according to the
//! left operand's [`UncertaintyMode`]. Results are rounded to the configured
//! number of significant digits.
//!
//! ```
//! use dimsolve::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let a = Quantity::with_uncertainty(dec!(2), Unit::meter(), dec!(0.1));
//! let b = Quantity::with_uncertainty(dec!(3), Unit::meter(), dec!(0.2));
//! let sum = (a + b).unwrap();
//! assert_eq!(sum.value(), dec!(5));
//! assert_eq!(sum.uncertainty(), dec!(0.3));
//! ```

mod operand;
mod propagation;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Neg;
use std::str::FromStr;

use num_rational::Ratio;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{self, UnitsConfig};
use crate::dimension::Exponent;
use crate::error::{UnitsError, UnitsResult};
use crate::unit::Unit;

pub use operand::{add, div, mul, pow, sub, Operand};

/// How independent uncertainties combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UncertaintyMode {
    /// Worst case: errors add linearly.
    #[default]
    MaxDeviation,
    /// Independent errors add in quadrature.
    #[serde(alias = "AVG_SQRT_DEVIATION")]
    RootSumSquare,
}

impl UncertaintyMode {
    /// Canonical configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MaxDeviation => "MAX_DEVIATION",
            Self::RootSumSquare => "ROOT_SUM_SQUARE",
        }
    }
}

impl fmt::Display for UncertaintyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UncertaintyMode {
    type Err = UnitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "MAX_DEVIATION" => Ok(Self::MaxDeviation),
            "ROOT_SUM_SQUARE" | "AVG_SQRT_DEVIATION" => Ok(Self::RootSumSquare),
            other => Err(UnitsError::UnknownUncertaintyMode(other.to_string())),
        }
    }
}

/// Propagation rule for `Quantity ^ Quantity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PowerPropagation {
    /// Quadrature of the log-derivative terms regardless of mode.
    #[default]
    LogDerivative,
    /// Log-derivative terms combined according to the base's mode.
    ModeAware,
}

/// A value with a unit and a non-negative absolute uncertainty.
///
/// Equality and hashing consider `(value, unit)` only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Quantity {
    value: Decimal,
    unit: Unit,
    uncertainty: Decimal,
    mode: UncertaintyMode,
}

impl Quantity {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Dimensionless, exact quantity.
    #[must_use]
    pub fn new(value: impl Into<Decimal>) -> Self {
        Self::with_uncertainty(value, Unit::DIMENSIONLESS, Decimal::ZERO)
    }

    /// Exact quantity in `unit`.
    #[must_use]
    pub fn with_unit(value: impl Into<Decimal>, unit: Unit) -> Self {
        Self::with_uncertainty(value, unit, Decimal::ZERO)
    }

    /// Quantity in `unit` with absolute uncertainty.
    ///
    /// A negative uncertainty is stored as its magnitude.
    #[must_use]
    pub fn with_uncertainty(
        value: impl Into<Decimal>,
        unit: Unit,
        uncertainty: impl Into<Decimal>,
    ) -> Self {
        Self {
            value: value.into(),
            unit,
            uncertainty: uncertainty.into().abs(),
            mode: config::global().default_uncertainty_mode,
        }
    }

    /// Parse a dimensionless quantity from decimal literals.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::TypeMismatch`] if either literal is not a number.
    pub fn parse(value: &str, uncertainty: Option<&str>) -> UnitsResult<Self> {
        let value = parse_decimal(value)?;
        let uncertainty = uncertainty.map(parse_decimal).transpose()?;
        Ok(Self::with_uncertainty(
            value,
            Unit::DIMENSIONLESS,
            uncertainty.unwrap_or(Decimal::ZERO),
        ))
    }

    /// Replace the uncertainty.
    #[must_use]
    pub fn plus_minus(mut self, uncertainty: impl Into<Decimal>) -> Self {
        self.uncertainty = uncertainty.into().abs();
        self
    }

    /// Replace the uncertainty mode.
    #[must_use]
    pub const fn in_mode(mut self, mode: UncertaintyMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replace the unit.
    #[must_use]
    pub const fn in_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Measured value.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.value
    }

    /// Unit of the value.
    #[must_use]
    pub const fn unit(&self) -> Unit {
        self.unit
    }

    /// Absolute uncertainty, never negative.
    #[must_use]
    pub const fn uncertainty(&self) -> Decimal {
        self.uncertainty
    }

    /// How this quantity combines uncertainties in arithmetic.
    #[must_use]
    pub const fn mode(&self) -> UncertaintyMode {
        self.mode
    }

    /// Check if the unit is dimensionless.
    #[must_use]
    pub fn is_dimensionless(&self) -> bool {
        self.unit.is_dimensionless()
    }

    /// `|uncertainty / value|`, or `None` for a zero value.
    #[must_use]
    pub fn relative_uncertainty(&self) -> Option<Decimal> {
        if self.value.is_zero() {
            return None;
        }
        propagation::relative(self.uncertainty, self.value).ok()
    }

    // =========================================================================
    // Arithmetic with explicit configuration
    // =========================================================================

    /// `self + rhs`.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::DimensionMismatch`] for unequal units, or when
    /// `rhs` is a number and `self` is not dimensionless.
    pub fn add_with(&self, rhs: impl Into<Operand>, config: &UnitsConfig) -> UnitsResult<Self> {
        match rhs.into() {
            Operand::Scalar(s) => {
                let unit = self.unit.add_scalar()?;
                let value = propagation::checked_add(self.value, s)?;
                Ok(self.derive(value, unit, self.uncertainty, config))
            }
            Operand::Quantity(q) => {
                let unit = self.unit.add_like(&q.unit)?;
                let value = propagation::checked_add(self.value, q.value)?;
                let e = propagation::add_sub(self.mode, self.uncertainty, q.uncertainty)?;
                Ok(self.derive(value, unit, e, config))
            }
        }
    }

    /// `self - rhs`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Quantity::add_with`].
    pub fn sub_with(&self, rhs: impl Into<Operand>, config: &UnitsConfig) -> UnitsResult<Self> {
        match rhs.into() {
            Operand::Scalar(s) => {
                let unit = self.unit.add_scalar()?;
                let value = propagation::checked_sub(self.value, s)?;
                Ok(self.derive(value, unit, self.uncertainty, config))
            }
            Operand::Quantity(q) => {
                let unit = self.unit.sub_like(&q.unit)?;
                let value = propagation::checked_sub(self.value, q.value)?;
                let e = propagation::add_sub(self.mode, self.uncertainty, q.uncertainty)?;
                Ok(self.derive(value, unit, e, config))
            }
        }
    }

    /// `self * rhs`.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::Arithmetic`] on overflow, or when a zero-valued
    /// operand carries uncertainty.
    pub fn mul_with(&self, rhs: impl Into<Operand>, config: &UnitsConfig) -> UnitsResult<Self> {
        match rhs.into() {
            Operand::Scalar(s) => {
                let value = propagation::checked_mul(self.value, s)?;
                let e = propagation::scaled(s, self.uncertainty)?;
                Ok(self.derive(value, self.unit, e, config))
            }
            Operand::Quantity(q) => {
                let unit = self.unit.compose(&q.unit)?;
                let value = propagation::checked_mul(self.value, q.value)?;
                let e = propagation::mul_div(
                    self.mode,
                    value,
                    (self.value, self.uncertainty),
                    (q.value, q.uncertainty),
                )?;
                Ok(self.derive(value, unit, e, config))
            }
        }
    }

    /// `self / rhs`.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::Arithmetic`] on division by zero or overflow.
    pub fn div_with(&self, rhs: impl Into<Operand>, config: &UnitsConfig) -> UnitsResult<Self> {
        match rhs.into() {
            Operand::Scalar(s) => {
                let value = propagation::checked_div(self.value, s)?;
                let e = propagation::checked_div(self.uncertainty, s.abs())?;
                Ok(self.derive(value, self.unit, e, config))
            }
            Operand::Quantity(q) => {
                let unit = self.unit.divide(&q.unit)?;
                let value = propagation::checked_div(self.value, q.value)?;
                let e = propagation::mul_div(
                    self.mode,
                    value,
                    (self.value, self.uncertainty),
                    (q.value, q.uncertainty),
                )?;
                Ok(self.derive(value, unit, e, config))
            }
        }
    }

    /// `self ^ rhs`.
    ///
    /// A numeric exponent scales the unit by its rational form (see
    /// [`exponent_from_decimal`]); a dimensionless base stays dimensionless
    /// for any exponent. A quantity exponent must be dimensionless; its
    /// uncertainty contributes through `ln(self)`.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::DimensionMismatch`] for a dimensioned exponent
    /// and [`UnitsError::Arithmetic`] for powers outside the real domain, or
    /// when the scaled unit exponents overflow.
    pub fn pow_with(&self, rhs: impl Into<Operand>, config: &UnitsConfig) -> UnitsResult<Self> {
        match rhs.into() {
            Operand::Scalar(p) => {
                let unit = self.powered_unit(p)?;
                let value = propagation::checked_pow(self.value, p)?;
                let e = propagation::pow_numeric(value, p, (self.value, self.uncertainty))?;
                Ok(self.derive(value, unit, e, config))
            }
            Operand::Quantity(q) => {
                q.require_dimensionless("power exponent")?;
                let unit = self.powered_unit(q.value)?;
                let value = propagation::checked_pow(self.value, q.value)?;
                let e = propagation::pow_quantity(
                    config.power_propagation,
                    self.mode,
                    value,
                    (self.value, self.uncertainty),
                    (q.value, q.uncertainty),
                )?;
                Ok(self.derive(value, unit, e, config))
            }
        }
    }

    /// `lhs + self` for a number `lhs`.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::DimensionMismatch`] unless `self` is dimensionless.
    pub fn radd_with(&self, lhs: Decimal, config: &UnitsConfig) -> UnitsResult<Self> {
        self.add_with(lhs, config)
    }

    /// `lhs - self` for a number `lhs`.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::DimensionMismatch`] unless `self` is dimensionless.
    pub fn rsub_with(&self, lhs: Decimal, config: &UnitsConfig) -> UnitsResult<Self> {
        let unit = self.unit.add_scalar()?;
        let value = propagation::checked_sub(lhs, self.value)?;
        Ok(self.derive(value, unit, self.uncertainty, config))
    }

    /// `lhs * self` for a number `lhs`.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::Arithmetic`] on overflow.
    pub fn rmul_with(&self, lhs: Decimal, config: &UnitsConfig) -> UnitsResult<Self> {
        self.mul_with(lhs, config)
    }

    /// `lhs / self` for a number `lhs`; the unit is inverted.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::Arithmetic`] if `self` is zero.
    pub fn rdiv_with(&self, lhs: Decimal, config: &UnitsConfig) -> UnitsResult<Self> {
        let unit = self.unit.invert()?;
        let value = propagation::checked_div(lhs, self.value)?;
        let e = propagation::reciprocal(value, (self.value, self.uncertainty))?;
        Ok(self.derive(value, unit, e, config))
    }

    /// `base ^ self` for a number `base`; the result is dimensionless.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::DimensionMismatch`] unless `self` is
    /// dimensionless, and [`UnitsError::Arithmetic`] when `ln(base)` is
    /// needed but undefined.
    pub fn rpow_with(&self, base: Decimal, config: &UnitsConfig) -> UnitsResult<Self> {
        self.require_dimensionless("power exponent")?;
        let value = propagation::checked_pow(base, self.value)?;
        let e = propagation::rpow(value, base, self.uncertainty)?;
        Ok(self.derive(value, Unit::DIMENSIONLESS, e, config))
    }

    /// `self ^ power` for an exact rational power.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::Arithmetic`] for powers outside the real domain
    /// or when the scaled unit exponents overflow.
    pub fn pow_exact_with(&self, power: Exponent, config: &UnitsConfig) -> UnitsResult<Self> {
        let unit = self.unit.scale(power)?;
        let p = propagation::checked_div(
            Decimal::from(*power.numer()),
            Decimal::from(*power.denom()),
        )?;
        let value = propagation::checked_pow(self.value, p)?;
        let e = propagation::pow_numeric(value, p, (self.value, self.uncertainty))?;
        Ok(self.derive(value, unit, e, config))
    }

    // =========================================================================
    // Arithmetic with the global configuration
    // =========================================================================

    /// `self + rhs` under [`config::global`].
    ///
    /// # Errors
    ///
    /// See [`Quantity::add_with`].
    pub fn try_add(&self, rhs: impl Into<Operand>) -> UnitsResult<Self> {
        self.add_with(rhs, config::global())
    }

    /// `self - rhs` under [`config::global`].
    ///
    /// # Errors
    ///
    /// See [`Quantity::sub_with`].
    pub fn try_sub(&self, rhs: impl Into<Operand>) -> UnitsResult<Self> {
        self.sub_with(rhs, config::global())
    }

    /// `self * rhs` under [`config::global`].
    ///
    /// # Errors
    ///
    /// See [`Quantity::mul_with`].
    pub fn try_mul(&self, rhs: impl Into<Operand>) -> UnitsResult<Self> {
        self.mul_with(rhs, config::global())
    }

    /// `self / rhs` under [`config::global`].
    ///
    /// # Errors
    ///
    /// See [`Quantity::div_with`].
    pub fn try_div(&self, rhs: impl Into<Operand>) -> UnitsResult<Self> {
        self.div_with(rhs, config::global())
    }

    /// `self ^ rhs` under [`config::global`].
    ///
    /// # Errors
    ///
    /// See [`Quantity::pow_with`].
    pub fn pow(&self, rhs: impl Into<Operand>) -> UnitsResult<Self> {
        self.pow_with(rhs, config::global())
    }

    /// # Errors
    ///
    /// See [`Quantity::radd_with`].
    pub fn radd(&self, lhs: impl Into<Decimal>) -> UnitsResult<Self> {
        self.radd_with(lhs.into(), config::global())
    }

    /// # Errors
    ///
    /// See [`Quantity::rsub_with`].
    pub fn rsub(&self, lhs: impl Into<Decimal>) -> UnitsResult<Self> {
        self.rsub_with(lhs.into(), config::global())
    }

    /// # Errors
    ///
    /// See [`Quantity::rmul_with`].
    pub fn rmul(&self, lhs: impl Into<Decimal>) -> UnitsResult<Self> {
        self.rmul_with(lhs.into(), config::global())
    }

    /// # Errors
    ///
    /// See [`Quantity::rdiv_with`].
    pub fn rdiv(&self, lhs: impl Into<Decimal>) -> UnitsResult<Self> {
        self.rdiv_with(lhs.into(), config::global())
    }

    /// `1 / self`.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::Arithmetic`] if `self` is zero.
    pub fn reciprocal(&self) -> UnitsResult<Self> {
        self.rdiv_with(Decimal::ONE, config::global())
    }

    /// # Errors
    ///
    /// See [`Quantity::rpow_with`].
    pub fn rpow(&self, base: impl Into<Decimal>) -> UnitsResult<Self> {
        self.rpow_with(base.into(), config::global())
    }

    /// # Errors
    ///
    /// See [`Quantity::pow_exact_with`].
    pub fn pow_exact(&self, power: Exponent) -> UnitsResult<Self> {
        self.pow_exact_with(power, config::global())
    }

    /// `n`-th root, with the unit scaled by exactly `1/n`.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::Arithmetic`] for `n == 0` or a negative radicand.
    pub fn root(&self, n: i64) -> UnitsResult<Self> {
        if n == 0 {
            return Err(UnitsError::arithmetic("zeroth root"));
        }
        self.pow_exact(Exponent::new(1, n))
    }

    // =========================================================================
    // Display
    // =========================================================================

    /// Render as `value[ ± uncertainty][ unit]` with an explicit configuration.
    #[must_use]
    pub fn display_with(&self, config: &UnitsConfig) -> String {
        let mut out = self.value.to_string();
        if !self.uncertainty.is_zero() {
            out.push_str(&format!(" ± {}", self.uncertainty));
        }
        if !self.unit.is_dimensionless() {
            out.push(' ');
            out.push_str(&self.unit.display_with(config));
        }
        out
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn derive(&self, value: Decimal, unit: Unit, uncertainty: Decimal, config: &UnitsConfig) -> Self {
        Self {
            value: config.round(value),
            unit,
            uncertainty: config.round(uncertainty.abs()),
            mode: self.mode,
        }
    }

    fn powered_unit(&self, exponent: Decimal) -> UnitsResult<Unit> {
        if self.unit.is_dimensionless() {
            return Ok(Unit::DIMENSIONLESS);
        }
        self.unit.scale(exponent_from_decimal(exponent)?)
    }

    fn require_dimensionless(&self, role: &str) -> UnitsResult<()> {
        if self.unit.is_dimensionless() {
            Ok(())
        } else {
            Err(UnitsError::dimension_mismatch(
                role,
                self.unit.to_string(),
                Unit::DIMENSIONLESS.to_string(),
            ))
        }
    }
}

/// Largest denominator tried when a decimal is read back as a fraction.
const MAX_RECOVERED_DENOMINATOR: i128 = 1_000_000;

/// Rational form of a decimal exponent (`0.5` → `1/2`).
///
/// The exact fraction is used when it fits 64-bit integers. Otherwise the
/// decimal is taken as a rounded fraction: the simplest `p/q` with
/// `q ≤ 10⁶` that rounds back to it at its own scale
/// (`0.3333333333333333333333333333` → `1/3`).
///
/// # Errors
///
/// Returns [`UnitsError::Arithmetic`] if neither form exists.
pub fn exponent_from_decimal(value: Decimal) -> UnitsResult<Exponent> {
    let denom = 10_i128
        .checked_pow(value.scale())
        .ok_or_else(|| UnitsError::arithmetic(format!("exponent {value} out of range")))?;
    let exact = Ratio::<i128>::new(value.mantissa(), denom);
    narrow(&exact)
        .or_else(|| recover_fraction(value, &exact))
        .ok_or_else(|| {
            UnitsError::arithmetic(format!("exponent {value} has no 64-bit rational form"))
        })
}

fn narrow(ratio: &Ratio<i128>) -> Option<Exponent> {
    let numer = i64::try_from(*ratio.numer()).ok()?;
    let denom = i64::try_from(*ratio.denom()).ok()?;
    Some(Exponent::new(numer, denom))
}

/// Walk the continued-fraction convergents of `exact`, simplest first.
fn recover_fraction(value: Decimal, exact: &Ratio<i128>) -> Option<Exponent> {
    let (mut numer, mut denom) = (*exact.numer(), *exact.denom());
    let (mut h_prev, mut h) = (0_i128, 1_i128);
    let (mut k_prev, mut k) = (1_i128, 0_i128);
    while denom != 0 {
        let term = numer.div_euclid(denom);
        let rest = numer.rem_euclid(denom);
        let h_next = term.checked_mul(h)?.checked_add(h_prev)?;
        let k_next = term.checked_mul(k)?.checked_add(k_prev)?;
        if k_next > MAX_RECOVERED_DENOMINATOR {
            return None;
        }
        (h_prev, h, k_prev, k) = (h, h_next, k, k_next);
        let candidate = narrow(&Ratio::new(h, k))?;
        if rounds_to(candidate, value) {
            return Some(candidate);
        }
        (numer, denom) = (denom, rest);
    }
    None
}

fn rounds_to(candidate: Exponent, value: Decimal) -> bool {
    Decimal::from(*candidate.numer())
        .checked_div(Decimal::from(*candidate.denom()))
        .is_some_and(|d| d.round_dp(value.scale()) == value)
}

fn parse_decimal(literal: &str) -> UnitsResult<Decimal> {
    let trimmed = literal.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| UnitsError::type_mismatch(format!("'{literal}' is not a decimal number")))
}

impl TryFrom<f64> for Quantity {
    type Error = UnitsError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(UnitsError::type_mismatch(format!(
                "{value} is not a finite number"
            )));
        }
        Decimal::try_from(value)
            .map(Self::new)
            .map_err(|_| UnitsError::type_mismatch(format!("{value} is outside the decimal range")))
    }
}

impl From<Decimal> for Quantity {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.unit == other.unit
    }
}

impl Eq for Quantity {}

impl Hash for Quantity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
        self.unit.hash(state);
    }
}

impl Neg for Quantity {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            value: -self.value,
            ..self
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_with(config::global()))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn decimal(range: std::ops::Range<i64>) -> impl Strategy<Value = Decimal> {
        (range, 0u32..4).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
    }

    fn nonzero() -> impl Strategy<Value = Decimal> {
        decimal(-100_000..100_000).prop_filter("nonzero", |d| !d.is_zero())
    }

    fn uncertainty() -> impl Strategy<Value = Decimal> {
        decimal(0..1_000)
    }

    fn unit() -> impl Strategy<Value = Unit> {
        proptest::array::uniform9(-3i64..=3)
            .prop_map(|e| Unit::from(crate::dimension::DimensionVector::from_integers(e)))
    }

    proptest! {
        #[test]
        fn prop_max_bounds_rss_for_sums(
            v1 in nonzero(), v2 in nonzero(),
            e1 in uncertainty(), e2 in uncertainty(),
        ) {
            let a = Quantity::with_uncertainty(v1, Unit::meter(), e1);
            let b = Quantity::with_uncertainty(v2, Unit::meter(), e2);
            let max = a.try_add(b).unwrap();
            let rss = a.in_mode(UncertaintyMode::RootSumSquare).try_add(b).unwrap();
            prop_assert!(max.uncertainty() >= rss.uncertainty());
            let max = a.try_sub(b).unwrap();
            let rss = a.in_mode(UncertaintyMode::RootSumSquare).try_sub(b).unwrap();
            prop_assert!(max.uncertainty() >= rss.uncertainty());
        }

        #[test]
        fn prop_max_bounds_rss_for_products(
            v1 in nonzero(), v2 in nonzero(),
            e1 in uncertainty(), e2 in uncertainty(),
        ) {
            let a = Quantity::with_uncertainty(v1, Unit::meter(), e1);
            let b = Quantity::with_uncertainty(v2, Unit::second(), e2);
            let rss_a = a.in_mode(UncertaintyMode::RootSumSquare);
            prop_assert!(a.try_mul(b).unwrap().uncertainty() >= rss_a.try_mul(b).unwrap().uncertainty());
            prop_assert!(a.try_div(b).unwrap().uncertainty() >= rss_a.try_div(b).unwrap().uncertainty());
        }

        #[test]
        fn prop_mul_div_round_trip(
            v in nonzero(), w in nonzero(),
            e in uncertainty(),
            u1 in unit(), u2 in unit(),
        ) {
            let q = Quantity::with_uncertainty(v, u1, e);
            let r = Quantity::with_unit(w, u2);
            let back = q.try_mul(r).unwrap().try_div(r).unwrap();
            prop_assert_eq!(back.unit(), q.unit());
            let tolerance = back.uncertainty() + Decimal::new(1, 15);
            prop_assert!((back.value() - q.value()).abs() <= tolerance);
        }

        #[test]
        fn prop_adding_zero_needs_dimensionless(v in nonzero(), u in unit()) {
            let q = Quantity::with_unit(v, u);
            match q.try_add(Decimal::ZERO) {
                Ok(sum) => {
                    prop_assert!(u.is_dimensionless());
                    prop_assert_eq!(sum, q);
                }
                Err(err) => {
                    prop_assert!(!u.is_dimensionless());
                    let is_mismatch = matches!(err, UnitsError::DimensionMismatch { .. });
                    prop_assert!(is_mismatch);
                }
            }
        }

        #[test]
        fn prop_uncertainty_never_negative(
            v1 in nonzero(), v2 in nonzero(),
            e1 in uncertainty(), e2 in uncertainty(),
        ) {
            let a = Quantity::with_uncertainty(v1, Unit::meter(), e1);
            let b = Quantity::with_uncertainty(v2, Unit::meter(), e2);
            for result in [a.try_add(b), a.try_sub(b), a.try_mul(b), a.try_div(b), a.try_mul(v2)] {
                prop_assert!(result.unwrap().uncertainty() >= Decimal::ZERO);
            }
        }
    }
}
