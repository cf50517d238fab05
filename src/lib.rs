//! # dimsolve
//!
//! Dimensional analysis with exact exponents and uncertainty-aware quantities.
//!
//! - Dimension vectors over nine base dimensions with rational exponents
//! - A unit algebra with configurable display and an SI unit table
//! - Decimal quantities that propagate measurement uncertainty
//! - A Buckingham-Pi style solver that recovers power laws from units
//!
//! ## Example
//!
//! ```rust
//! use dimsolve::prelude::*;
//! use dimsolve::dimension::BaseDimension::{Current, Length, Mass, Time};
//!
//! let voltage = Unit::derived(&[(Mass, 1), (Length, 2), (Time, -3), (Current, -1)]);
//! let resistance = (voltage / Unit::ampere()).unwrap();
//!
//! let formula = FormulaFinder::new("U", voltage)
//!     .candidate_unit("I", Unit::ampere())
//!     .candidate_unit("R", resistance)
//!     .find_formula()
//!     .unwrap();
//! assert_eq!(formula.expression(), "U = k · I¹ · R¹");
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::missing_const_for_fn, // Many functions can't be const in stable Rust
    clippy::must_use_candidate,
    clippy::missing_panics_doc,
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod config;
pub mod dimension;
pub mod error;
pub mod quantity;
pub mod scenarios;
pub mod solver;
pub mod unit;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{UnitsConfig, UnitsConfigBuilder};
    pub use crate::dimension::{BaseDimension, DimensionVector, Exponent};
    pub use crate::error::{UnitsError, UnitsResult};
    pub use crate::quantity::{Operand, PowerPropagation, Quantity, UncertaintyMode};
    pub use crate::solver::{Derivation, Formula, FormulaFinder};
    pub use crate::unit::{SiUnitTable, Unit, UnitTable};
}

/// Re-export for public API
pub use error::{UnitsError, UnitsResult};
