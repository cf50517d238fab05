//! Unit table: symbol lookups for base, composite and special units.
//!
//! The core only needs [`UnitTable::resolve`], which tries the base,
//! composite and special tables in that order. [`SiUnitTable`] is the
//! built-in SI table; other tables plug in by implementing the trait.

use std::collections::HashMap;
use std::sync::OnceLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::debug;

use crate::dimension::{BaseDimension, DimensionVector};
use crate::error::{UnitsError, UnitsResult};

/// How a special unit maps onto its coherent SI unit:
/// `si_value = value * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConversionInfo {
    /// Multiplicative factor to the coherent unit.
    pub scale: Decimal,
    /// Additive offset applied after scaling (temperatures).
    pub offset: Decimal,
}

impl ConversionInfo {
    /// A purely multiplicative conversion.
    #[must_use]
    pub const fn scaled(scale: Decimal) -> Self {
        Self {
            scale,
            offset: Decimal::ZERO,
        }
    }

    /// An affine conversion.
    #[must_use]
    pub const fn affine(scale: Decimal, offset: Decimal) -> Self {
        Self { scale, offset }
    }
}

/// A metric prefix with every symbol spelling it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricPrefix {
    /// Prefix name (`kilo`).
    pub name: &'static str,
    /// Accepted symbols (`k`; micro has several).
    pub symbols: &'static [&'static str],
    /// Power of ten.
    pub power: i32,
}

/// Metric prefixes, largest first.
pub const SI_PREFIXES: &[MetricPrefix] = &[
    MetricPrefix { name: "yotta", symbols: &["Y"], power: 24 },
    MetricPrefix { name: "zetta", symbols: &["Z"], power: 21 },
    MetricPrefix { name: "exa", symbols: &["E"], power: 18 },
    MetricPrefix { name: "peta", symbols: &["P"], power: 15 },
    MetricPrefix { name: "tera", symbols: &["T"], power: 12 },
    MetricPrefix { name: "giga", symbols: &["G"], power: 9 },
    MetricPrefix { name: "mega", symbols: &["M"], power: 6 },
    MetricPrefix { name: "kilo", symbols: &["k"], power: 3 },
    MetricPrefix { name: "hecto", symbols: &["h"], power: 2 },
    MetricPrefix { name: "deca", symbols: &["da"], power: 1 },
    MetricPrefix { name: "deci", symbols: &["d"], power: -1 },
    MetricPrefix { name: "centi", symbols: &["c"], power: -2 },
    MetricPrefix { name: "milli", symbols: &["m"], power: -3 },
    MetricPrefix { name: "micro", symbols: &["μ", "µ", "u"], power: -6 },
    MetricPrefix { name: "nano", symbols: &["n"], power: -9 },
    MetricPrefix { name: "pico", symbols: &["p"], power: -12 },
    MetricPrefix { name: "femto", symbols: &["f"], power: -15 },
    MetricPrefix { name: "atto", symbols: &["a"], power: -18 },
    MetricPrefix { name: "zepto", symbols: &["z"], power: -21 },
    MetricPrefix { name: "yocto", symbols: &["y"], power: -24 },
];

/// Prefixed spellings that are known to coincide with a unit symbol and are
/// resolved to that unit (`k` + `g` is the base unit `kg`).
pub const IGNORED_PREFIX_CONFLICTS: &[&str] = &["kg"];

/// Read-only symbol lookups.
pub trait UnitTable {
    /// Base units (one per base dimension).
    fn base(&self, symbol: &str) -> Option<DimensionVector>;

    /// Coherent derived units.
    fn composite(&self, symbol: &str) -> Option<DimensionVector>;

    /// Units that need a conversion to their coherent SI unit.
    fn special(&self, symbol: &str) -> Option<(DimensionVector, ConversionInfo)>;

    /// Metric prefixes accepted in front of unit symbols.
    fn prefixes(&self) -> &[MetricPrefix];

    /// Every unprefixed symbol the table knows.
    fn symbols(&self) -> Vec<&str>;

    /// Dimension vector of an unprefixed symbol.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::UnresolvedUnit`] if no table contains `symbol`.
    fn resolve(&self, symbol: &str) -> UnitsResult<DimensionVector> {
        self.base(symbol)
            .or_else(|| self.composite(symbol))
            .or_else(|| self.special(symbol).map(|(dims, _)| dims))
            .ok_or_else(|| UnitsError::UnresolvedUnit(symbol.to_string()))
    }

    /// Dimension vector of a symbol that may carry one metric prefix.
    ///
    /// Only the dimension is returned; the prefix scale is not applied.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::UnresolvedUnit`] if neither the symbol nor any
    /// prefix split of it resolves.
    fn resolve_prefixed(&self, symbol: &str) -> UnitsResult<DimensionVector> {
        if let Ok(dims) = self.resolve(symbol) {
            return Ok(dims);
        }
        for prefix in self.prefixes() {
            for spelling in prefix.symbols {
                if let Some(rest) = symbol.strip_prefix(spelling) {
                    if let Ok(dims) = self.resolve(rest) {
                        debug!(symbol, prefix = prefix.name, unit = rest, "resolved prefixed unit");
                        return Ok(dims);
                    }
                }
            }
        }
        Err(UnitsError::UnresolvedUnit(symbol.to_string()))
    }
}

/// The built-in SI unit table.
#[derive(Debug, Clone)]
pub struct SiUnitTable {
    base: HashMap<&'static str, DimensionVector>,
    composite: HashMap<&'static str, DimensionVector>,
    special: HashMap<&'static str, (DimensionVector, ConversionInfo)>,
}

impl SiUnitTable {
    /// Build the table.
    #[must_use]
    pub fn new() -> Self {
        let base = BaseDimension::ALL
            .iter()
            .map(|d| (d.unit_symbol(), DimensionVector::basis(*d)))
            .collect();

        // exponents in slot order: L, M, T, I, Θ, N, J, angle, information
        let composite = [
            ("N", [1, 1, -2, 0, 0, 0, 0, 0, 0]),
            ("J", [2, 1, -2, 0, 0, 0, 0, 0, 0]),
            ("W", [2, 1, -3, 0, 0, 0, 0, 0, 0]),
            ("Pa", [-1, 1, -2, 0, 0, 0, 0, 0, 0]),
            ("Hz", [0, 0, -1, 0, 0, 0, 0, 0, 0]),
            ("C", [0, 0, 1, 1, 0, 0, 0, 0, 0]),
            ("V", [2, 1, -3, -1, 0, 0, 0, 0, 0]),
            ("Ω", [2, 1, -3, -2, 0, 0, 0, 0, 0]),
            ("Ohm", [2, 1, -3, -2, 0, 0, 0, 0, 0]),
            ("F", [-2, -1, 4, 2, 0, 0, 0, 0, 0]),
            ("S", [-2, -1, 3, 2, 0, 0, 0, 0, 0]),
            ("Wb", [2, 1, -2, -1, 0, 0, 0, 0, 0]),
            ("T", [0, 1, -2, -1, 0, 0, 0, 0, 0]),
            ("H", [2, 1, -2, -2, 0, 0, 0, 0, 0]),
            ("sr", [0, 0, 0, 0, 0, 0, 0, 2, 0]),
            ("lm", [0, 0, 0, 0, 0, 0, 1, 2, 0]),
            ("lx", [-2, 0, 0, 0, 0, 0, 1, 2, 0]),
            ("Gy", [2, 0, -2, 0, 0, 0, 0, 0, 0]),
            ("Sv", [2, 0, -2, 0, 0, 0, 0, 0, 0]),
            ("kat", [0, 0, -1, 0, 0, 1, 0, 0, 0]),
        ]
        .into_iter()
        .map(|(symbol, exps)| (symbol, DimensionVector::from_integers(exps)))
        .collect();

        let special = [
            ("g", [0, 1, 0, 0, 0, 0, 0, 0, 0], ConversionInfo::scaled(dec!(0.001))),
            ("t", [0, 1, 0, 0, 0, 0, 0, 0, 0], ConversionInfo::scaled(dec!(1000))),
            ("min", [0, 0, 1, 0, 0, 0, 0, 0, 0], ConversionInfo::scaled(dec!(60))),
            ("h", [0, 0, 1, 0, 0, 0, 0, 0, 0], ConversionInfo::scaled(dec!(3600))),
            ("L", [3, 0, 0, 0, 0, 0, 0, 0, 0], ConversionInfo::scaled(dec!(0.001))),
            (
                "°C",
                [0, 0, 0, 0, 1, 0, 0, 0, 0],
                ConversionInfo::affine(dec!(1), dec!(273.15)),
            ),
            (
                "eV",
                [2, 1, -2, 0, 0, 0, 0, 0, 0],
                ConversionInfo::scaled(dec!(0.0000000000000000001602176634)),
            ),
            (
                "°",
                [0, 0, 0, 0, 0, 0, 0, 1, 0],
                ConversionInfo::scaled(dec!(0.0174532925199432957692369077)),
            ),
            ("B", [0, 0, 0, 0, 0, 0, 0, 0, 1], ConversionInfo::scaled(dec!(8))),
        ]
        .into_iter()
        .map(|(symbol, exps, conversion)| {
            (symbol, (DimensionVector::from_integers(exps), conversion))
        })
        .collect();

        Self {
            base,
            composite,
            special,
        }
    }

    /// Process-wide shared instance.
    pub fn shared() -> &'static Self {
        static TABLE: OnceLock<SiUnitTable> = OnceLock::new();
        TABLE.get_or_init(Self::new)
    }

    /// Conversion info of a special unit.
    #[must_use]
    pub fn conversion(&self, symbol: &str) -> Option<ConversionInfo> {
        self.special.get(symbol).map(|(_, conversion)| *conversion)
    }
}

impl Default for SiUnitTable {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitTable for SiUnitTable {
    fn base(&self, symbol: &str) -> Option<DimensionVector> {
        self.base.get(symbol).copied()
    }

    fn composite(&self, symbol: &str) -> Option<DimensionVector> {
        self.composite.get(symbol).copied()
    }

    fn special(&self, symbol: &str) -> Option<(DimensionVector, ConversionInfo)> {
        self.special.get(symbol).copied()
    }

    fn prefixes(&self) -> &[MetricPrefix] {
        SI_PREFIXES
    }

    fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self
            .base
            .keys()
            .chain(self.composite.keys())
            .chain(self.special.keys())
            .copied()
            .collect();
        symbols.sort_unstable();
        symbols
    }
}
