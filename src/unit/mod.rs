//! Units as elements of the multiplicative group of dimension vectors.
//!
//! A [`Unit`] wraps one [`DimensionVector`]. Multiplying units adds their
//! exponents, dividing subtracts them, and raising to a power scales them.
//! Only units with equal vectors may be added or subtracted
//! ([`Unit::add_like`]); a bare number counts as dimensionless.
//!
//! Exponents are exact rationals, so products and powers are checked and
//! return [`UnitsResult`]. [`Unit::derived`] builds integer-power units
//! directly.
//!
//! ```
//! use dimsolve::dimension::BaseDimension::{Length, Mass, Time};
//! use dimsolve::unit::Unit;
//!
//! let newton = Unit::derived(&[(Mass, 1), (Length, 1), (Time, -2)]);
//! assert_eq!(newton.to_string(), "m·kg·s^(-2)");
//! assert_eq!((Unit::kilogram() * Unit::meter())?.divide(&Unit::second().powi(2)?)?, newton);
//! assert!(newton.add_like(&Unit::kilogram()).is_err());
//! # Ok::<(), dimsolve::UnitsError>(())
//! ```

pub mod table;

use std::fmt;
use std::ops::{Div, Mul};

use num_traits::{One, Signed};
use serde::{Deserialize, Serialize};

use crate::config::{self, UnitsConfig};
use crate::dimension::{superscript, BaseDimension, DimensionVector, Exponent, DIMENSION_COUNT};
use crate::error::{UnitsError, UnitsResult};

pub use table::{ConversionInfo, MetricPrefix, SiUnitTable, UnitTable};

/// A physical unit, identified solely by its dimension vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Unit {
    dimensions: DimensionVector,
}

impl Unit {
    /// The unit of a pure number.
    pub const DIMENSIONLESS: Self = Self {
        dimensions: DimensionVector::DIMENSIONLESS,
    };

    /// Wrap a dimension vector.
    #[must_use]
    pub const fn from_dimensions(dimensions: DimensionVector) -> Self {
        Self { dimensions }
    }

    /// Coherent base unit of `dimension`.
    #[must_use]
    pub fn base(dimension: BaseDimension) -> Self {
        Self::from_dimensions(DimensionVector::basis(dimension))
    }

    /// Product of integer powers of base dimensions.
    ///
    /// A dimension listed twice keeps its last power.
    #[must_use]
    pub fn derived(powers: &[(BaseDimension, i64)]) -> Self {
        let mut exponents = [0; DIMENSION_COUNT];
        for (dimension, power) in powers {
            exponents[dimension.index()] = *power;
        }
        Self::from_dimensions(DimensionVector::from_integers(exponents))
    }

    /// Look up `symbol` in the default SI table (metric prefixes allowed).
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::UnresolvedUnit`] if the symbol is unknown.
    pub fn parse_symbol(symbol: &str) -> UnitsResult<Self> {
        SiUnitTable::shared()
            .resolve_prefixed(symbol)
            .map(Self::from_dimensions)
    }

    // =========================================================================
    // Named base units
    // =========================================================================

    /// Meter (length).
    #[must_use]
    pub fn meter() -> Self {
        Self::base(BaseDimension::Length)
    }

    /// Kilogram (mass).
    #[must_use]
    pub fn kilogram() -> Self {
        Self::base(BaseDimension::Mass)
    }

    /// Second (time).
    #[must_use]
    pub fn second() -> Self {
        Self::base(BaseDimension::Time)
    }

    /// Ampere (electric current).
    #[must_use]
    pub fn ampere() -> Self {
        Self::base(BaseDimension::Current)
    }

    /// Kelvin (temperature).
    #[must_use]
    pub fn kelvin() -> Self {
        Self::base(BaseDimension::Temperature)
    }

    /// Mole (amount of substance).
    #[must_use]
    pub fn mole() -> Self {
        Self::base(BaseDimension::Amount)
    }

    /// Candela (luminous intensity).
    #[must_use]
    pub fn candela() -> Self {
        Self::base(BaseDimension::LuminousIntensity)
    }

    /// Radian (plane angle).
    #[must_use]
    pub fn radian() -> Self {
        Self::base(BaseDimension::Angle)
    }

    /// Bit (information).
    #[must_use]
    pub fn bit() -> Self {
        Self::base(BaseDimension::Information)
    }

    /// The dimensionless unit.
    #[must_use]
    pub const fn dimensionless() -> Self {
        Self::DIMENSIONLESS
    }

    // =========================================================================
    // Group operations
    // =========================================================================

    /// The underlying dimension vector.
    #[must_use]
    pub const fn dimensions(&self) -> &DimensionVector {
        &self.dimensions
    }

    /// Product of two units (exponents add).
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::Arithmetic`] if an exponent overflows.
    pub fn compose(&self, other: &Self) -> UnitsResult<Self> {
        self.dimensions
            .checked_add(&other.dimensions)
            .map(Self::from_dimensions)
    }

    /// Quotient of two units (exponents subtract).
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::Arithmetic`] if an exponent overflows.
    pub fn divide(&self, other: &Self) -> UnitsResult<Self> {
        self.dimensions
            .checked_sub(&other.dimensions)
            .map(Self::from_dimensions)
    }

    /// Reciprocal unit (exponents negate).
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::Arithmetic`] if an exponent overflows.
    pub fn invert(&self) -> UnitsResult<Self> {
        self.dimensions.checked_neg().map(Self::from_dimensions)
    }

    /// Raise to a rational power (exponents scale).
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::Arithmetic`] if an exponent overflows.
    pub fn scale(&self, power: Exponent) -> UnitsResult<Self> {
        self.dimensions.scaled(power).map(Self::from_dimensions)
    }

    /// Raise to an integer power.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::Arithmetic`] if an exponent overflows.
    pub fn powi(&self, power: i64) -> UnitsResult<Self> {
        self.scale(Exponent::from_integer(power))
    }

    /// Elementwise equality of the dimension vectors.
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        self.dimensions == other.dimensions
    }

    /// Check if every exponent is zero.
    #[must_use]
    pub fn is_dimensionless(&self) -> bool {
        self.dimensions.is_dimensionless()
    }

    /// Unit of a sum: `self` if both units are equal.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::DimensionMismatch`] if the units differ.
    pub fn add_like(&self, other: &Self) -> UnitsResult<Self> {
        self.require_like(other, "addition")
    }

    /// Unit of a difference: `self` if both units are equal.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::DimensionMismatch`] if the units differ.
    pub fn sub_like(&self, other: &Self) -> UnitsResult<Self> {
        self.require_like(other, "subtraction")
    }

    /// Unit of `self ± number`: a bare number is dimensionless, so `self`
    /// must be as well.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::DimensionMismatch`] if `self` carries dimensions.
    pub fn add_scalar(&self) -> UnitsResult<Self> {
        self.require_like(&Self::DIMENSIONLESS, "addition with a number")
    }

    fn require_like(&self, other: &Self, operation: &str) -> UnitsResult<Self> {
        if self.equals(other) {
            Ok(*self)
        } else {
            Err(UnitsError::dimension_mismatch(
                operation,
                self.to_string(),
                other.to_string(),
            ))
        }
    }

    // =========================================================================
    // Display
    // =========================================================================

    /// Render with an explicit configuration.
    #[must_use]
    pub fn display_with(&self, config: &UnitsConfig) -> String {
        let mut entries = self.dimensions.nonzero();
        if entries.is_empty() {
            return config.dimensionless_token.clone();
        }
        if config.sort_by_power {
            // stable: equal exponents keep slot order
            entries.sort_by(|a, b| b.1.cmp(&a.1));
        }
        entries
            .into_iter()
            .map(|(dimension, exponent)| render_factor(dimension.unit_symbol(), exponent, config))
            .collect::<Vec<_>>()
            .join(&config.multiply_glyph)
    }
}

/// Render one `symbol^exponent` factor.
pub(crate) fn render_factor(symbol: &str, exponent: Exponent, config: &UnitsConfig) -> String {
    if exponent.is_one() {
        return symbol.to_string();
    }
    if config.superscript_powers {
        if let Some(sup) = superscript(exponent) {
            return format!("{symbol}{sup}");
        }
    }
    let glyph = &config.power_glyph;
    if exponent.is_negative() || !exponent.is_integer() {
        format!("{symbol}{glyph}({exponent})")
    } else {
        format!("{symbol}{glyph}{exponent}")
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_with(config::global()))
    }
}

impl Mul for Unit {
    type Output = UnitsResult<Self>;

    fn mul(self, rhs: Self) -> UnitsResult<Self> {
        self.compose(&rhs)
    }
}

impl Div for Unit {
    type Output = UnitsResult<Self>;

    fn div(self, rhs: Self) -> UnitsResult<Self> {
        self.divide(&rhs)
    }
}

impl From<DimensionVector> for Unit {
    fn from(dimensions: DimensionVector) -> Self {
        Self::from_dimensions(dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BaseDimension::{Current, Length, Mass, Time};

    fn newton() -> Unit {
        Unit::derived(&[(Mass, 1), (Length, 1), (Time, -2)])
    }

    #[test]
    fn test_compose_and_divide() {
        let velocity = (Unit::meter() / Unit::second()).unwrap();
        assert_eq!(
            velocity.dimensions().component(Time),
            Exponent::from_integer(-1)
        );
        assert_eq!(velocity.compose(&Unit::second()).unwrap(), Unit::meter());
        let chained = (Unit::kilogram() * Unit::meter())
            .and_then(|u| u.divide(&Unit::second().powi(2)?))
            .unwrap();
        assert_eq!(chained, newton());
    }

    #[test]
    fn test_derived_last_power_wins() {
        assert_eq!(Unit::derived(&[(Length, 3), (Length, 1)]), Unit::meter());
        assert_eq!(Unit::derived(&[]), Unit::DIMENSIONLESS);
    }

    #[test]
    fn test_invert() {
        let hertz = Unit::second().invert().unwrap();
        assert_eq!(hertz, (Unit::DIMENSIONLESS / Unit::second()).unwrap());
        assert!(hertz.compose(&Unit::second()).unwrap().is_dimensionless());
    }

    #[test]
    fn test_scale_root() {
        let area = Unit::meter().powi(2).unwrap();
        assert_eq!(area.scale(Exponent::new(1, 2)).unwrap(), Unit::meter());
    }

    #[test]
    fn test_scale_overflow_is_error() {
        let p = Exponent::new(123_456_789_012_345_679, 1_000_000_000_000_000_000);
        let once = Unit::meter().scale(p).unwrap();
        assert!(matches!(once.scale(p), Err(UnitsError::Arithmetic(_))));
        assert!(once.compose(&once).is_ok());
        let tiny = Unit::meter().scale(Exponent::new(1, i64::MAX)).unwrap();
        let other = Unit::meter().scale(Exponent::new(1, i64::MAX - 1)).unwrap();
        assert!(matches!(tiny * other, Err(UnitsError::Arithmetic(_))));
        assert!(matches!(tiny / other, Err(UnitsError::Arithmetic(_))));
    }

    #[test]
    fn test_add_like() {
        assert_eq!(newton().add_like(&newton()).unwrap(), newton());
        let err = newton().add_like(&Unit::kilogram()).unwrap_err();
        assert!(matches!(err, UnitsError::DimensionMismatch { .. }));
        assert!(newton().sub_like(&Unit::meter()).is_err());
    }

    #[test]
    fn test_add_scalar() {
        assert!(Unit::DIMENSIONLESS.add_scalar().is_ok());
        assert!((Unit::meter() / Unit::meter()).unwrap().add_scalar().is_ok());
        assert!(Unit::meter().add_scalar().is_err());
    }

    #[test]
    fn test_display_default() {
        assert_eq!(newton().display_with(&UnitsConfig::default()), "m·kg·s^(-2)");
        assert_eq!(
            Unit::DIMENSIONLESS.display_with(&UnitsConfig::default()),
            "dimensionless"
        );
        assert_eq!(
            Unit::derived(&[(Length, 3)]).display_with(&UnitsConfig::default()),
            "m^3"
        );
    }

    #[test]
    fn test_display_sorted_by_power() {
        let config = UnitsConfig::builder().sort_by_power(true).build();
        let unit = Unit::derived(&[(Time, -3), (Length, 2), (Mass, 1)]);
        assert_eq!(unit.display_with(&config), "m^2·kg·s^(-3)");

        let config = UnitsConfig::builder().sort_by_power(false).build();
        let unit = Unit::derived(&[(Mass, 1), (Length, -1), (Current, 2)]);
        assert_eq!(unit.display_with(&config), "m^(-1)·kg·A^2");
        let sorted = UnitsConfig::builder().sort_by_power(true).build();
        assert_eq!(unit.display_with(&sorted), "A^2·kg·m^(-1)");
    }

    #[test]
    fn test_display_superscript() {
        let config = UnitsConfig::builder().superscript_powers(true).build();
        assert_eq!(newton().display_with(&config), "m·kg·s⁻²");
        let root = Unit::meter().scale(Exponent::new(1, 2)).unwrap();
        assert_eq!(root.display_with(&config), "m^(1/2)");
    }

    #[test]
    fn test_display_custom_glyphs() {
        let config = UnitsConfig::builder()
            .power_glyph("**")
            .multiply_glyph("*")
            .dimensionless_token("1")
            .build();
        assert_eq!(newton().display_with(&config), "m*kg*s**(-2)");
        assert_eq!(Unit::DIMENSIONLESS.display_with(&config), "1");
    }

    #[test]
    fn test_parse_symbol() {
        assert_eq!(Unit::parse_symbol("N").unwrap(), newton());
        assert_eq!(Unit::parse_symbol("km").unwrap(), Unit::meter());
        assert!(matches!(
            Unit::parse_symbol("furlong"),
            Err(UnitsError::UnresolvedUnit(_))
        ));
    }
}
