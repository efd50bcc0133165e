//! Rule data for the tax engine: bracket schedules from CSV and per-year
//! parameters from TOML, assembled into a validated
//! [`canadian_tax_core::TaxRules`] registry.

mod loader;

pub use loader::{BRACKETS_FILE, BracketRecord, RulesLoader, RulesLoaderError, YearConfigFile};

/// Directory holding the shipped rule files.
pub const SHIPPED_DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data");
