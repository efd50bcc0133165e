//! Canadian personal (T1) and corporate (CCPC) income tax engine.
//!
//! Rules for each tax year live in a [`TaxRules`] registry that is built once
//! and passed by reference to the calculators in [`calculations`] or to the
//! string-keyed [`TaxEngine`] facade.
//!
//! ```
//! use rust_decimal_macros::dec;
//! use canadian_tax_core::{TaxEngine, TaxRules};
//!
//! let rules = TaxRules::canada().unwrap();
//! let engine = TaxEngine::new(&rules);
//!
//! let result = engine.calculate_personal_tax(dec!(75000), "ON", 2025).unwrap();
//! assert_eq!(result.total_tax, result.federal_tax + result.provincial_tax);
//! ```

pub mod calculations;
pub mod engine;
mod error;
pub mod models;
pub mod rules;

pub use engine::TaxEngine;
pub use error::TaxError;
pub use models::*;
pub use rules::{TaxRules, TaxYearRules};
