use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{BracketSchedule, Jurisdiction, Province, TaxError};

/// Bracket schedules and basic personal amounts for one tax year.
///
/// Immutable once built. Lookups for a province without a schedule fail
/// with [`TaxError::UnsupportedJurisdiction`]; they never fall back to
/// another province.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JurisdictionTaxTable {
    tax_year: i32,
    federal: BracketSchedule,
    provincial: BTreeMap<Province, BracketSchedule>,
    basic_personal_amounts: BTreeMap<Jurisdiction, Decimal>,
}

impl JurisdictionTaxTable {
    /// # Errors
    ///
    /// - [`TaxError::InvalidBracketSchedule`] if a schedule is registered
    ///   under a different jurisdiction than the one it was built for.
    /// - [`TaxError::InvalidConfiguration`] if the federal basic personal
    ///   amount is missing or any basic personal amount is negative.
    pub fn new(
        tax_year: i32,
        federal: BracketSchedule,
        provincial: BTreeMap<Province, BracketSchedule>,
        basic_personal_amounts: BTreeMap<Jurisdiction, Decimal>,
    ) -> Result<Self, TaxError> {
        if federal.jurisdiction() != Jurisdiction::Federal {
            return Err(TaxError::InvalidBracketSchedule {
                jurisdiction: federal.jurisdiction().to_string(),
                reason: "registered as the federal schedule".to_string(),
            });
        }

        for (province, schedule) in &provincial {
            if schedule.jurisdiction() != Jurisdiction::Provincial(*province) {
                return Err(TaxError::InvalidBracketSchedule {
                    jurisdiction: schedule.jurisdiction().to_string(),
                    reason: format!("registered under {province}"),
                });
            }
        }

        if !basic_personal_amounts.contains_key(&Jurisdiction::Federal) {
            return Err(TaxError::invalid_config(
                "basic_personal_amounts.federal",
                format!("missing for tax year {tax_year}"),
            ));
        }

        if let Some((jurisdiction, amount)) = basic_personal_amounts
            .iter()
            .find(|(_, amount)| **amount < Decimal::ZERO)
        {
            return Err(TaxError::invalid_config(
                &format!("basic_personal_amounts.{jurisdiction}"),
                format!("must be non-negative, got {amount}"),
            ));
        }

        Ok(Self {
            tax_year,
            federal,
            provincial,
            basic_personal_amounts,
        })
    }

    pub fn tax_year(&self) -> i32 {
        self.tax_year
    }

    pub fn federal(&self) -> &BracketSchedule {
        &self.federal
    }

    /// # Errors
    ///
    /// [`TaxError::UnsupportedJurisdiction`] when no schedule is registered
    /// for `province`.
    pub fn provincial(
        &self,
        province: Province,
    ) -> Result<&BracketSchedule, TaxError> {
        self.provincial
            .get(&province)
            .ok_or_else(|| TaxError::UnsupportedJurisdiction {
                jurisdiction: province.to_string(),
                tax_year: self.tax_year,
            })
    }

    /// Provinces with a registered schedule, in code order.
    pub fn provinces(&self) -> impl Iterator<Item = Province> + '_ {
        self.provincial.keys().copied()
    }

    pub fn federal_basic_personal_amount(&self) -> Decimal {
        self.basic_personal_amounts
            .get(&Jurisdiction::Federal)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Provincial basic personal amount; zero when none is registered.
    pub fn provincial_basic_personal_amount(
        &self,
        province: Province,
    ) -> Decimal {
        self.basic_personal_amounts
            .get(&Jurisdiction::Provincial(province))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn basic_personal_amounts(&self) -> &BTreeMap<Jurisdiction, Decimal> {
        &self.basic_personal_amounts
    }
}
