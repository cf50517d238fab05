//! Error types for dimsolve.
//!
//! Every fallible operation returns `Result<T, UnitsError>` instead of
//! panicking. Errors are raised where they are detected and propagated to
//! the caller unchanged; nothing in the crate retries or recovers locally.

use thiserror::Error;

/// Result type alias for dimsolve operations.
pub type UnitsResult<T> = Result<T, UnitsError>;

/// Unified error type for all dimsolve operations.
#[derive(Debug, Error)]
pub enum UnitsError {
    // ===== Operand Errors =====
    /// An operand or initializer is not one of the accepted kinds.
    #[error("Type mismatch: {message}")]
    TypeMismatch {
        /// What was supplied and what was expected.
        message: String,
    },

    /// Operands with unequal dimension vectors were combined where like
    /// dimensions are required, or a dimensioned operand was given where a
    /// dimensionless one is required.
    #[error("Dimension mismatch in {operation}: {left} vs {right}")]
    DimensionMismatch {
        /// Operation that rejected the operands.
        operation: String,
        /// Rendered unit of the left operand.
        left: String,
        /// Rendered unit of the right operand (or the required unit).
        right: String,
    },

    /// An uncertainty-combination mode outside the recognised set.
    #[error("Unknown uncertainty mode '{0}' (expected MAX_DEVIATION or ROOT_SUM_SQUARE)")]
    UnknownUncertaintyMode(String),

    /// Decimal arithmetic left its domain (overflow, division by zero,
    /// logarithm of a non-positive value, ...).
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    // ===== Unit Table Errors =====
    /// A unit symbol is not present in the unit table.
    #[error("Unresolved unit '{0}'")]
    UnresolvedUnit(String),

    // ===== Formula Finder Errors =====
    /// The per-dimension equations admit no exponent assignment.
    #[error("No solution found: {reason}")]
    NoSolution {
        /// Which constraint could not be satisfied.
        reason: String,
    },

    /// The per-dimension equations leave some exponents free.
    #[error("Underdetermined: free exponents [{}]; {}", free.join(", "), relations.join("; "))]
    Underdetermined {
        /// Candidates whose exponents are free parameters.
        free: Vec<String>,
        /// Remaining exponents expressed through the free ones.
        relations: Vec<String>,
    },

    /// The same candidate name was registered twice.
    #[error("Duplicate candidate '{0}'")]
    DuplicateCandidate(String),

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl UnitsError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an arithmetic error.
    #[must_use]
    pub fn arithmetic(message: impl Into<String>) -> Self {
        Self::Arithmetic(message.into())
    }

    /// Create a type mismatch error.
    #[must_use]
    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::TypeMismatch {
            message: message.into(),
        }
    }

    /// Create a dimension mismatch error for `operation`.
    #[must_use]
    pub fn dimension_mismatch(
        operation: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        Self::DimensionMismatch {
            operation: operation.into(),
            left: left.into(),
            right: right.into(),
        }
    }

    /// Create a no-solution error.
    #[must_use]
    pub fn no_solution(reason: impl Into<String>) -> Self {
        Self::NoSolution {
            reason: reason.into(),
        }
    }

    /// Check if this error reports a dimensional inconsistency, as opposed to
    /// a malformed operand or configuration.
    #[must_use]
    pub const fn is_dimensional(&self) -> bool {
        matches!(
            self,
            Self::DimensionMismatch { .. } | Self::NoSolution { .. } | Self::Underdetermined { .. }
        )
    }
}

impl From<rust_decimal::Error> for UnitsError {
    fn from(err: rust_decimal::Error) -> Self {
        Self::Arithmetic(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensional_detection() {
        let mismatch = UnitsError::dimension_mismatch("add", "m", "s");
        assert!(mismatch.is_dimensional());

        let none = UnitsError::no_solution("length cannot be balanced");
        assert!(none.is_dimensional());

        let under = UnitsError::Underdetermined {
            free: vec!["b".to_string()],
            relations: vec!["a = 1 - b".to_string()],
        };
        assert!(under.is_dimensional());

        let config = UnitsError::config("invalid");
        assert!(!config.is_dimensional());
    }

    #[test]
    fn test_error_display_dimension_mismatch() {
        let err = UnitsError::dimension_mismatch("add", "m", "s");
        let msg = err.to_string();
        assert!(msg.contains("Dimension mismatch in add"));
        assert!(msg.contains("m vs s"));
    }

    #[test]
    fn test_error_display_underdetermined() {
        let err = UnitsError::Underdetermined {
            free: vec!["b".to_string(), "c".to_string()],
            relations: vec!["a = 1 - b".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("free exponents [b, c]"));
        assert!(msg.contains("a = 1 - b"));
    }

    #[test]
    fn test_error_config() {
        let err = UnitsError::config("invalid parameter");
        let msg = err.to_string();
        assert!(msg.contains("Configuration error"));
        assert!(msg.contains("invalid parameter"));
    }

    #[test]
    fn test_error_unknown_mode() {
        let err = UnitsError::UnknownUncertaintyMode("AVERAGE".to_string());
        assert!(err.to_string().contains("AVERAGE"));
        assert!(!err.is_dimensional());
    }

    #[test]
    fn test_error_unresolved_unit() {
        let err = UnitsError::UnresolvedUnit("furlong".to_string());
        assert_eq!(err.to_string(), "Unresolved unit 'furlong'");
    }

    #[test]
    fn test_error_from_decimal() {
        let err: UnitsError = rust_decimal::Error::ExceedsMaximumPossibleValue.into();
        assert!(matches!(err, UnitsError::Arithmetic(_)));
    }

    #[test]
    fn test_error_type_mismatch() {
        let err = UnitsError::type_mismatch("expected a number, got 'abc'");
        assert!(err.to_string().starts_with("Type mismatch"));
    }

    #[test]
    fn test_error_debug() {
        let err = UnitsError::DuplicateCandidate("m".to_string());
        let debug = format!("{err:?}");
        assert!(debug.contains("DuplicateCandidate"));
    }
}
