//! Versioned rule tables.
//!
//! A [`TaxRules`] registry is built once at startup (from the built-in
//! literal, from data files, or from test fixtures) and passed by reference
//! into every calculation. Nothing in the engine reads rules from global
//! state.

pub mod canada_2025;

use std::collections::BTreeMap;

use tracing::debug;

use crate::{JurisdictionTaxTable, TaxError, TaxYearConfig};

/// The complete rule set for one tax year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxYearRules {
    table: JurisdictionTaxTable,
    config: TaxYearConfig,
}

impl TaxYearRules {
    /// Pairs a bracket table with its parameters.
    ///
    /// # Errors
    ///
    /// - [`TaxError::InvalidConfiguration`] if the config fails
    ///   [`TaxYearConfig::validate`] or the two tax years differ.
    pub fn new(
        table: JurisdictionTaxTable,
        config: TaxYearConfig,
    ) -> Result<Self, TaxError> {
        if table.tax_year() != config.tax_year {
            return Err(TaxError::invalid_config(
                "tax_year",
                format!(
                    "bracket table is for {} but parameters are for {}",
                    table.tax_year(),
                    config.tax_year
                ),
            ));
        }
        config.validate()?;

        Ok(Self { table, config })
    }

    pub fn tax_year(&self) -> i32 {
        self.table.tax_year()
    }

    pub fn table(&self) -> &JurisdictionTaxTable {
        &self.table
    }

    pub fn config(&self) -> &TaxYearConfig {
        &self.config
    }
}

/// Registry of [`TaxYearRules`], keyed by tax year.
///
/// Typical lifetime:
/// 1. Create with [`TaxRules::new`] (or [`TaxRules::canada`]).
/// 2. Call `register` once per supported year.
/// 3. Share `&TaxRules` with every calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxRules {
    years: BTreeMap<i32, TaxYearRules>,
}

impl TaxRules {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in rule years.
    ///
    /// # Errors
    ///
    /// Propagates a [`TaxError`] if a built-in year fails validation.
    ///
    /// # Example
    ///
    /// ```
    /// use canadian_tax_core::TaxRules;
    ///
    /// let rules = TaxRules::canada().unwrap();
    /// assert_eq!(rules.available_years(), vec![2025]);
    /// ```
    pub fn canada() -> Result<Self, TaxError> {
        let mut rules = Self::new();
        rules.register(canada_2025::rules()?);
        Ok(rules)
    }

    /// Register a year's rules, returning the rules it replaced, if any.
    pub fn register(
        &mut self,
        rules: TaxYearRules,
    ) -> Option<TaxYearRules> {
        debug!(tax_year = rules.tax_year(), "registering tax year rules");
        self.years.insert(rules.tax_year(), rules)
    }

    /// Registered years in ascending order.
    pub fn available_years(&self) -> Vec<i32> {
        self.years.keys().copied().collect()
    }

    /// # Errors
    ///
    /// [`TaxError::UnsupportedTaxYear`] when no rules are registered for
    /// `tax_year`.
    pub fn year(
        &self,
        tax_year: i32,
    ) -> Result<&TaxYearRules, TaxError> {
        self.years
            .get(&tax_year)
            .ok_or(TaxError::UnsupportedTaxYear(tax_year))
    }
}
