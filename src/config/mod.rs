//! Configuration for formatting and decimal arithmetic.
//!
//! A [`UnitsConfig`] is either threaded explicitly into the `*_with` variants
//! of display and arithmetic, or installed once at process start with
//! [`install`] and read everywhere else through [`global`]. The installed
//! value never changes afterwards.
//!
//! Configuration files are YAML:
//!
//! ```yaml
//! sort_by_power: true
//! power_glyph: "**"
//! multiply_glyph: "*"
//! decimal_precision: 20
//! default_uncertainty_mode: ROOT_SUM_SQUARE
//! ```

use std::path::Path;
use std::sync::OnceLock;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::error::{UnitsError, UnitsResult};
use crate::quantity::{PowerPropagation, UncertaintyMode};

/// Maximum significant digits representable by the decimal backend.
pub const MAX_DECIMAL_PRECISION: u32 = 28;

static GLOBAL: OnceLock<UnitsConfig> = OnceLock::new();

/// Formatting and precision options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UnitsConfig {
    /// Order unit symbols by descending exponent instead of slot order.
    #[serde(default)]
    pub sort_by_power: bool,

    /// Glyph placed between a symbol and its exponent.
    #[validate(length(min = 1))]
    #[serde(default = "default_power_glyph")]
    pub power_glyph: String,

    /// Glyph joining unit symbols.
    #[validate(length(min = 1))]
    #[serde(default = "default_multiply_glyph")]
    pub multiply_glyph: String,

    /// Rendering of a unit with no dimensions.
    #[validate(length(min = 1))]
    #[serde(default = "default_dimensionless_token")]
    pub dimensionless_token: String,

    /// Render integer exponents as Unicode superscripts (`s⁻²`).
    #[serde(default)]
    pub superscript_powers: bool,

    /// Significant digits kept by every decimal operation.
    #[validate(range(min = 1, max = 28))]
    #[serde(default = "default_decimal_precision")]
    pub decimal_precision: u32,

    /// Uncertainty mode given to quantities built without an explicit one.
    #[serde(default)]
    pub default_uncertainty_mode: UncertaintyMode,

    /// Propagation rule for a power whose exponent is itself a quantity.
    #[serde(default)]
    pub power_propagation: PowerPropagation,
}

fn default_power_glyph() -> String {
    "^".to_string()
}

fn default_multiply_glyph() -> String {
    "·".to_string()
}

fn default_dimensionless_token() -> String {
    "dimensionless".to_string()
}

const fn default_decimal_precision() -> u32 {
    MAX_DECIMAL_PRECISION
}

impl Default for UnitsConfig {
    fn default() -> Self {
        Self {
            sort_by_power: false,
            power_glyph: default_power_glyph(),
            multiply_glyph: default_multiply_glyph(),
            dimensionless_token: default_dimensionless_token(),
            superscript_powers: false,
            decimal_precision: default_decimal_precision(),
            default_uncertainty_mode: UncertaintyMode::default(),
            power_propagation: PowerPropagation::default(),
        }
    }
}

impl UnitsConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> UnitsResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::UnknownUncertaintyMode`] for an unrecognised
    /// `default_uncertainty_mode`, otherwise an error if parsing or
    /// validation fails.
    pub fn from_yaml(yaml: &str) -> UnitsResult<Self> {
        let document: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        if let Some(mode) = document
            .get("default_uncertainty_mode")
            .and_then(serde_yaml::Value::as_str)
        {
            mode.parse::<UncertaintyMode>()?;
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> UnitsResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> UnitsConfigBuilder {
        UnitsConfigBuilder::default()
    }

    /// Run schema validation followed by semantic checks.
    ///
    /// # Errors
    ///
    /// Returns error if any constraint is violated.
    pub fn check(&self) -> UnitsResult<()> {
        self.validate()?;
        self.validate_semantic()
    }

    /// Validate semantic constraints beyond schema.
    fn validate_semantic(&self) -> UnitsResult<()> {
        if self.power_glyph.trim().is_empty() {
            return Err(UnitsError::config("power_glyph must not be blank"));
        }
        if self.multiply_glyph.trim().is_empty() {
            return Err(UnitsError::config("multiply_glyph must not be blank"));
        }
        if self.power_glyph == self.multiply_glyph {
            return Err(UnitsError::config(format!(
                "power_glyph and multiply_glyph must differ, both are '{}'",
                self.power_glyph
            )));
        }
        Ok(())
    }

    /// Round `value` to the configured number of significant digits.
    #[must_use]
    pub fn round(&self, value: Decimal) -> Decimal {
        if self.decimal_precision == 0 {
            return value;
        }
        value
            .round_sf(self.decimal_precision)
            .map_or(value, |d| d.normalize())
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct UnitsConfigBuilder {
    sort_by_power: Option<bool>,
    power_glyph: Option<String>,
    multiply_glyph: Option<String>,
    dimensionless_token: Option<String>,
    superscript_powers: Option<bool>,
    decimal_precision: Option<u32>,
    default_uncertainty_mode: Option<UncertaintyMode>,
    power_propagation: Option<PowerPropagation>,
}

impl UnitsConfigBuilder {
    /// Order symbols by descending exponent.
    #[must_use]
    pub const fn sort_by_power(mut self, sort: bool) -> Self {
        self.sort_by_power = Some(sort);
        self
    }

    /// Set the power glyph.
    #[must_use]
    pub fn power_glyph(mut self, glyph: impl Into<String>) -> Self {
        self.power_glyph = Some(glyph.into());
        self
    }

    /// Set the multiplication glyph.
    #[must_use]
    pub fn multiply_glyph(mut self, glyph: impl Into<String>) -> Self {
        self.multiply_glyph = Some(glyph.into());
        self
    }

    /// Set the dimensionless token.
    #[must_use]
    pub fn dimensionless_token(mut self, token: impl Into<String>) -> Self {
        self.dimensionless_token = Some(token.into());
        self
    }

    /// Render integer exponents as superscripts.
    #[must_use]
    pub const fn superscript_powers(mut self, enabled: bool) -> Self {
        self.superscript_powers = Some(enabled);
        self
    }

    /// Set the working precision in significant digits.
    #[must_use]
    pub const fn decimal_precision(mut self, digits: u32) -> Self {
        self.decimal_precision = Some(digits);
        self
    }

    /// Set the default uncertainty mode.
    #[must_use]
    pub const fn default_uncertainty_mode(mut self, mode: UncertaintyMode) -> Self {
        self.default_uncertainty_mode = Some(mode);
        self
    }

    /// Set the power propagation rule.
    #[must_use]
    pub const fn power_propagation(mut self, rule: PowerPropagation) -> Self {
        self.power_propagation = Some(rule);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> UnitsConfig {
        let defaults = UnitsConfig::default();
        UnitsConfig {
            sort_by_power: self.sort_by_power.unwrap_or(defaults.sort_by_power),
            power_glyph: self.power_glyph.unwrap_or(defaults.power_glyph),
            multiply_glyph: self.multiply_glyph.unwrap_or(defaults.multiply_glyph),
            dimensionless_token: self
                .dimensionless_token
                .unwrap_or(defaults.dimensionless_token),
            superscript_powers: self
                .superscript_powers
                .unwrap_or(defaults.superscript_powers),
            decimal_precision: self.decimal_precision.unwrap_or(defaults.decimal_precision),
            default_uncertainty_mode: self
                .default_uncertainty_mode
                .unwrap_or(defaults.default_uncertainty_mode),
            power_propagation: self
                .power_propagation
                .unwrap_or(defaults.power_propagation),
        }
    }
}

/// Install the process-wide configuration.
///
/// Must run before anything reads [`global`]; the first read freezes the
/// defaults in place.
///
/// # Errors
///
/// Returns error if the configuration is invalid or one is already installed.
pub fn install(config: UnitsConfig) -> UnitsResult<()> {
    config.check()?;
    debug!(?config, "installing global units configuration");
    GLOBAL
        .set(config)
        .map_err(|_| UnitsError::config("global configuration already installed"))
}

/// The process-wide configuration (defaults if none was installed).
pub fn global() -> &'static UnitsConfig {
    GLOBAL.get_or_init(UnitsConfig::default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config_is_valid() {
        let config = UnitsConfig::default();
        assert!(config.check().is_ok());
        assert_eq!(config.decimal_precision, 28);
        assert_eq!(config.default_uncertainty_mode, UncertaintyMode::MaxDeviation);
    }

    #[test]
    fn test_from_yaml_minimal() {
        let config = UnitsConfig::from_yaml("sort_by_power: true\n").unwrap();
        assert!(config.sort_by_power);
        assert_eq!(config.power_glyph, "^");
    }

    #[test]
    fn test_from_yaml_full() {
        let yaml = r#"
sort_by_power: true
power_glyph: "**"
multiply_glyph: "*"
dimensionless_token: "1"
superscript_powers: false
decimal_precision: 12
default_uncertainty_mode: ROOT_SUM_SQUARE
power_propagation: MODE_AWARE
"#;
        let config = UnitsConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.power_glyph, "**");
        assert_eq!(config.multiply_glyph, "*");
        assert_eq!(config.dimensionless_token, "1");
        assert_eq!(config.decimal_precision, 12);
        assert_eq!(
            config.default_uncertainty_mode,
            UncertaintyMode::RootSumSquare
        );
        assert_eq!(config.power_propagation, PowerPropagation::ModeAware);
    }

    #[test]
    fn test_legacy_mode_alias() {
        let config =
            UnitsConfig::from_yaml("default_uncertainty_mode: AVG_SQRT_DEVIATION\n").unwrap();
        assert_eq!(
            config.default_uncertainty_mode,
            UncertaintyMode::RootSumSquare
        );
    }

    #[test]
    fn test_unknown_mode_rejected_by_name() {
        let result = UnitsConfig::from_yaml("default_uncertainty_mode: AVERAGE\n");
        assert!(matches!(result, Err(UnitsError::UnknownUncertaintyMode(ref m)) if m == "AVERAGE"));
    }

    #[test]
    fn test_non_string_mode_is_parse_error() {
        let result = UnitsConfig::from_yaml("default_uncertainty_mode: 3\n");
        assert!(matches!(result, Err(UnitsError::YamlParse(_))));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = UnitsConfig::from_yaml("colour: red\n");
        assert!(matches!(result, Err(UnitsError::YamlParse(_))));
    }

    #[test]
    fn test_precision_out_of_range() {
        let result = UnitsConfig::from_yaml("decimal_precision: 40\n");
        assert!(matches!(result, Err(UnitsError::Validation(_))));

        let result = UnitsConfig::from_yaml("decimal_precision: 0\n");
        assert!(matches!(result, Err(UnitsError::Validation(_))));
    }

    #[test]
    fn test_empty_glyph_rejected() {
        let result = UnitsConfig::from_yaml("power_glyph: \"\"\n");
        assert!(matches!(result, Err(UnitsError::Validation(_))));
    }

    #[test]
    fn test_blank_glyph_rejected() {
        let result = UnitsConfig::from_yaml("multiply_glyph: \"  \"\n");
        assert!(matches!(result, Err(UnitsError::Config { .. })));
    }

    #[test]
    fn test_identical_glyphs_rejected() {
        let config = UnitsConfig::builder()
            .power_glyph("*")
            .multiply_glyph("*")
            .build();
        assert!(config.check().is_err());
    }

    #[test]
    fn test_builder() {
        let config = UnitsConfig::builder()
            .sort_by_power(true)
            .superscript_powers(true)
            .decimal_precision(10)
            .default_uncertainty_mode(UncertaintyMode::RootSumSquare)
            .dimensionless_token("1")
            .build();
        assert!(config.sort_by_power);
        assert!(config.superscript_powers);
        assert_eq!(config.decimal_precision, 10);
        assert_eq!(config.dimensionless_token, "1");
        assert_eq!(config.multiply_glyph, "·");
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = UnitsConfig::builder().sort_by_power(true).build();
        let yaml = config.to_yaml().unwrap();
        let parsed = UnitsConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_round_significant_digits() {
        let config = UnitsConfig::builder().decimal_precision(3).build();
        assert_eq!(config.round(dec!(3.14159)), dec!(3.14));
        assert_eq!(config.round(dec!(12345)), dec!(12300));
    }

    #[test]
    fn test_load_missing_file() {
        let result = UnitsConfig::load("/nonexistent/dimsolve.yaml");
        assert!(matches!(result, Err(UnitsError::Io(_))));
    }
}
