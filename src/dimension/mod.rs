//! Dimension vectors over the base physical dimensions.
//!
//! Every unit is a product of powers of nine base dimensions. A
//! [`DimensionVector`] stores the rational exponent of each one, in a fixed
//! slot order:
//!
//! | slot | dimension | base unit |
//! |---|---|---|
//! | 0 | length [L] | m |
//! | 1 | mass [M] | kg |
//! | 2 | time [T] | s |
//! | 3 | electric current [I] | A |
//! | 4 | temperature [Θ] | K |
//! | 5 | amount of substance [N] | mol |
//! | 6 | luminous intensity [J] | cd |
//! | 7 | plane angle [A] | rad |
//! | 8 | information [B] | bit |
//!
//! Vectors are `Copy` values; every operation returns a new vector.
//! Exponent arithmetic is checked: a result that does not fit a 64-bit
//! rational is reported as [`UnitsError::Arithmetic`].

use std::fmt;

use num_rational::Rational64;
use num_traits::{CheckedAdd, CheckedMul, CheckedSub, One, Signed, Zero};
use serde::{Deserialize, Serialize};

use crate::error::{UnitsError, UnitsResult};

/// Exponent of a base dimension. Fractional exponents arise from roots.
pub type Exponent = Rational64;

/// Number of base dimensions (length of every dimension vector).
pub const DIMENSION_COUNT: usize = 9;

const ZERO: Exponent = Rational64::new_raw(0, 1);

/// The recognised base physical dimensions, in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BaseDimension {
    /// Length [L]
    Length,
    /// Mass [M]
    Mass,
    /// Time [T]
    Time,
    /// Electric current [I]
    Current,
    /// Thermodynamic temperature [Θ]
    Temperature,
    /// Amount of substance [N]
    Amount,
    /// Luminous intensity [J]
    LuminousIntensity,
    /// Plane angle [A]
    Angle,
    /// Information [B]
    Information,
}

impl BaseDimension {
    /// All base dimensions in slot order.
    pub const ALL: [Self; DIMENSION_COUNT] = [
        Self::Length,
        Self::Mass,
        Self::Time,
        Self::Current,
        Self::Temperature,
        Self::Amount,
        Self::LuminousIntensity,
        Self::Angle,
        Self::Information,
    ];

    /// Slot of this dimension inside a [`DimensionVector`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Dimension stored at `index`, if any.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Symbol of the coherent base unit for this dimension.
    #[must_use]
    pub const fn unit_symbol(self) -> &'static str {
        match self {
            Self::Length => "m",
            Self::Mass => "kg",
            Self::Time => "s",
            Self::Current => "A",
            Self::Temperature => "K",
            Self::Amount => "mol",
            Self::LuminousIntensity => "cd",
            Self::Angle => "rad",
            Self::Information => "bit",
        }
    }

    /// Conventional dimension letter.
    #[must_use]
    pub const fn letter(self) -> &'static str {
        match self {
            Self::Length => "L",
            Self::Mass => "M",
            Self::Time => "T",
            Self::Current => "I",
            Self::Temperature => "Θ",
            Self::Amount => "N",
            Self::LuminousIntensity => "J",
            Self::Angle => "A",
            Self::Information => "B",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::Mass => "mass",
            Self::Time => "time",
            Self::Current => "electric current",
            Self::Temperature => "temperature",
            Self::Amount => "amount of substance",
            Self::LuminousIntensity => "luminous intensity",
            Self::Angle => "plane angle",
            Self::Information => "information",
        }
    }
}

impl fmt::Display for BaseDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Exponents of the base dimensions, one per [`BaseDimension`] slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DimensionVector {
    components: [Exponent; DIMENSION_COUNT],
}

impl DimensionVector {
    /// The all-zero vector of a pure number.
    pub const DIMENSIONLESS: Self = Self {
        components: [ZERO; DIMENSION_COUNT],
    };

    /// Create a vector from rational exponents.
    #[must_use]
    pub const fn new(components: [Exponent; DIMENSION_COUNT]) -> Self {
        Self { components }
    }

    /// Create a vector from integer exponents.
    #[must_use]
    pub fn from_integers(exponents: [i64; DIMENSION_COUNT]) -> Self {
        Self {
            components: exponents.map(Exponent::from_integer),
        }
    }

    /// Unit vector for a single base dimension.
    #[must_use]
    pub fn basis(dimension: BaseDimension) -> Self {
        let mut components = [ZERO; DIMENSION_COUNT];
        components[dimension.index()] = Exponent::one();
        Self { components }
    }

    /// Exponent of `dimension`.
    #[must_use]
    pub fn component(&self, dimension: BaseDimension) -> Exponent {
        self.components[dimension.index()]
    }

    /// All exponents in slot order.
    #[must_use]
    pub const fn components(&self) -> &[Exponent; DIMENSION_COUNT] {
        &self.components
    }

    /// Iterate `(dimension, exponent)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (BaseDimension, Exponent)> + '_ {
        BaseDimension::ALL
            .iter()
            .zip(self.components.iter())
            .map(|(d, e)| (*d, *e))
    }

    /// Check if every exponent is zero.
    #[must_use]
    pub fn is_dimensionless(&self) -> bool {
        self.components.iter().all(Zero::is_zero)
    }

    /// Check if `dimension` has a nonzero exponent.
    #[must_use]
    pub fn involves(&self, dimension: BaseDimension) -> bool {
        !self.component(dimension).is_zero()
    }

    /// Multiply every exponent by `power`.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::Arithmetic`] if an exponent overflows.
    pub fn scaled(&self, power: Exponent) -> UnitsResult<Self> {
        self.try_map(|dimension, e| {
            e.checked_mul(&power)
                .ok_or_else(|| overflow(dimension, "scaling"))
        })
    }

    /// Elementwise sum (product of the units).
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::Arithmetic`] if an exponent overflows.
    pub fn checked_add(&self, other: &Self) -> UnitsResult<Self> {
        self.try_map(|dimension, e| {
            e.checked_add(&other.component(dimension))
                .ok_or_else(|| overflow(dimension, "addition"))
        })
    }

    /// Elementwise difference (quotient of the units).
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::Arithmetic`] if an exponent overflows.
    pub fn checked_sub(&self, other: &Self) -> UnitsResult<Self> {
        self.try_map(|dimension, e| {
            e.checked_sub(&other.component(dimension))
                .ok_or_else(|| overflow(dimension, "subtraction"))
        })
    }

    /// Elementwise negation (reciprocal unit).
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::Arithmetic`] if an exponent overflows.
    pub fn checked_neg(&self) -> UnitsResult<Self> {
        Self::DIMENSIONLESS.checked_sub(self)
    }

    /// Exponents with a nonzero value, in slot order.
    #[must_use]
    pub fn nonzero(&self) -> Vec<(BaseDimension, Exponent)> {
        self.iter().filter(|(_, e)| !e.is_zero()).collect()
    }

    fn try_map(
        &self,
        mut op: impl FnMut(BaseDimension, Exponent) -> UnitsResult<Exponent>,
    ) -> UnitsResult<Self> {
        let mut components = [ZERO; DIMENSION_COUNT];
        for (slot, (dimension, e)) in components.iter_mut().zip(self.iter()) {
            *slot = op(dimension, e)?;
        }
        Ok(Self { components })
    }
}

fn overflow(dimension: BaseDimension, operation: &str) -> UnitsError {
    UnitsError::arithmetic(format!(
        "{dimension} exponent overflows 64-bit rational range in {operation}"
    ))
}

impl Default for DimensionVector {
    fn default() -> Self {
        Self::DIMENSIONLESS
    }
}

/// Dimension formula such as `L·M·T⁻²`, or `1` for a pure number.
impl fmt::Display for DimensionVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return f.write_str("1");
        }
        let parts: Vec<String> = self
            .nonzero()
            .into_iter()
            .map(|(d, e)| {
                if e.is_one() {
                    d.letter().to_string()
                } else {
                    match superscript(e) {
                        Some(sup) => format!("{}{sup}", d.letter()),
                        None => format!("{}^({e})", d.letter()),
                    }
                }
            })
            .collect();
        f.write_str(&parts.join("·"))
    }
}

/// Render an integer exponent with Unicode superscript digits.
///
/// Returns `None` for non-integer exponents, which have no superscript form.
#[must_use]
pub fn superscript(exponent: Exponent) -> Option<String> {
    if !exponent.is_integer() {
        return None;
    }
    let n = exponent.to_integer();
    let digits: String = n
        .abs()
        .to_string()
        .chars()
        .map(|d| match d {
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            '9' => '⁹',
            other => other,
        })
        .collect();
    if exponent.is_negative() {
        Some(format!("⁻{digits}"))
    } else {
        Some(digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn force() -> DimensionVector {
        DimensionVector::from_integers([1, 1, -2, 0, 0, 0, 0, 0, 0])
    }

    #[test]
    fn test_dimensionless() {
        assert!(DimensionVector::DIMENSIONLESS.is_dimensionless());
        assert!(DimensionVector::default().is_dimensionless());
        assert!(!force().is_dimensionless());
    }

    #[test]
    fn test_basis_slots() {
        for dim in BaseDimension::ALL {
            let v = DimensionVector::basis(dim);
            assert_eq!(v.component(dim), Exponent::one());
            assert_eq!(v.nonzero().len(), 1);
            assert_eq!(BaseDimension::from_index(dim.index()), Some(dim));
        }
        assert_eq!(BaseDimension::from_index(DIMENSION_COUNT), None);
    }

    #[test]
    fn test_add_sub() {
        // Force = Mass × Acceleration
        let mass = DimensionVector::basis(BaseDimension::Mass);
        let acceleration = DimensionVector::from_integers([1, 0, -2, 0, 0, 0, 0, 0, 0]);
        assert_eq!(mass.checked_add(&acceleration).unwrap(), force());
        assert_eq!(force().checked_sub(&mass).unwrap(), acceleration);
    }

    #[test]
    fn test_neg() {
        let freq = DimensionVector::basis(BaseDimension::Time).checked_neg().unwrap();
        assert_eq!(freq.component(BaseDimension::Time), Exponent::from_integer(-1));
    }

    #[test]
    fn test_scaled_fractional() {
        let area = DimensionVector::from_integers([2, 0, 0, 0, 0, 0, 0, 0, 0]);
        let root = area.scaled(Exponent::new(1, 2)).unwrap();
        assert_eq!(root, DimensionVector::basis(BaseDimension::Length));

        let volume = DimensionVector::from_integers([3, 0, 0, 0, 0, 0, 0, 0, 0]);
        let half = volume.scaled(Exponent::new(1, 2)).unwrap();
        assert_eq!(half.component(BaseDimension::Length), Exponent::new(3, 2));
    }

    #[test]
    fn test_scaled_overflow_is_error() {
        // 18-digit decimal exponent, applied twice
        let p = Exponent::new(123_456_789_012_345_679, 1_000_000_000_000_000_000);
        let once = DimensionVector::basis(BaseDimension::Length).scaled(p).unwrap();
        assert_eq!(once.component(BaseDimension::Length), p);
        let err = once.scaled(p).unwrap_err();
        assert!(matches!(err, UnitsError::Arithmetic(ref m) if m.contains("length")));
    }

    #[test]
    fn test_add_overflow_is_error() {
        let a = DimensionVector::basis(BaseDimension::Mass)
            .scaled(Exponent::new(1, i64::MAX))
            .unwrap();
        let b = DimensionVector::basis(BaseDimension::Mass)
            .scaled(Exponent::new(1, i64::MAX - 1))
            .unwrap();
        assert!(matches!(a.checked_add(&b), Err(UnitsError::Arithmetic(_))));
        assert!(matches!(a.checked_sub(&b), Err(UnitsError::Arithmetic(_))));
        assert!(a.checked_neg().is_ok());
    }

    #[test]
    fn test_involves() {
        let f = force();
        assert!(f.involves(BaseDimension::Mass));
        assert!(!f.involves(BaseDimension::Current));
    }

    #[test]
    fn test_display() {
        assert_eq!(force().to_string(), "L·M·T⁻²");
        assert_eq!(DimensionVector::DIMENSIONLESS.to_string(), "1");
        let half = DimensionVector::basis(BaseDimension::Length)
            .scaled(Exponent::new(1, 2))
            .unwrap();
        assert_eq!(half.to_string(), "L^(1/2)");
    }

    #[test]
    fn test_superscript() {
        assert_eq!(superscript(Exponent::from_integer(-12)).as_deref(), Some("⁻¹²"));
        assert_eq!(superscript(Exponent::from_integer(3)).as_deref(), Some("³"));
        assert_eq!(superscript(Exponent::new(1, 2)), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(BaseDimension::Temperature.to_string(), "temperature");
        assert_eq!(BaseDimension::Information.unit_symbol(), "bit");
    }
}
