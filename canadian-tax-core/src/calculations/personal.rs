//! Personal (T1) tax: gross federal and provincial tax, basic personal amount
//! credits, effective and marginal rates.
//!
//! # Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Gross federal tax on taxable income |
//! | 2    | Gross provincial tax on taxable income |
//! | 3    | Federal credit: federal BPA × lowest federal rate |
//! | 4    | Provincial credit: provincial BPA × lowest provincial rate |
//! | 5    | Net tax per jurisdiction (gross − credit, minimum 0) |
//! | 6    | Total tax, effective rate, marginal rate |

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{clamp_input, max, rate_of};
use crate::calculations::progressive::{bracket_rate, progressive_tax};
use crate::{BracketSchedule, JurisdictionTaxTable, Province, TaxError, TaxResult};

/// Calculator for personal income tax under one year's bracket table.
#[derive(Debug, Clone, Copy)]
pub struct PersonalTaxCalculator<'a> {
    table: &'a JurisdictionTaxTable,
}

impl<'a> PersonalTaxCalculator<'a> {
    pub fn new(table: &'a JurisdictionTaxTable) -> Self {
        Self { table }
    }

    /// Gross federal tax before credits.
    pub fn federal_tax(
        &self,
        income: Decimal,
    ) -> Decimal {
        progressive_tax(income, self.table.federal())
    }

    /// Gross provincial tax before credits.
    ///
    /// # Errors
    ///
    /// [`TaxError::UnsupportedJurisdiction`] when the table has no schedule
    /// for `province`. Another province's rates are never substituted.
    pub fn provincial_tax(
        &self,
        income: Decimal,
        province: Province,
    ) -> Result<Decimal, TaxError> {
        let schedule = self.table.provincial(province)?;
        Ok(progressive_tax(income, schedule))
    }

    /// Combined federal and provincial rate on the next dollar of income.
    ///
    /// # Errors
    ///
    /// [`TaxError::UnsupportedJurisdiction`] for an unregistered province.
    pub fn marginal_rate(
        &self,
        income: Decimal,
        province: Province,
    ) -> Result<Decimal, TaxError> {
        let schedule = self.table.provincial(province)?;
        Ok(bracket_rate(income, self.table.federal()) + bracket_rate(income, schedule))
    }

    /// Calculates the complete personal tax result.
    ///
    /// Negative income is treated as zero.
    ///
    /// # Errors
    ///
    /// [`TaxError::UnsupportedJurisdiction`] for an unregistered province,
    /// even when income is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use canadian_tax_core::calculations::PersonalTaxCalculator;
    /// use canadian_tax_core::{Province, TaxRules};
    ///
    /// let rules = TaxRules::canada().unwrap();
    /// let table = rules.year(2025).unwrap().table();
    /// let result = PersonalTaxCalculator::new(table)
    ///     .calculate(dec!(75000), Province::Ontario)
    ///     .unwrap();
    ///
    /// assert_eq!(result.federal_tax, dec!(9946.57));
    /// assert_eq!(result.marginal_rate, dec!(0.2965));
    /// ```
    pub fn calculate(
        &self,
        taxable_income: Decimal,
        province: Province,
    ) -> Result<TaxResult, TaxError> {
        let provincial_schedule = self.table.provincial(province)?;
        let income = clamp_input("taxable_income", taxable_income);

        let gross_federal = progressive_tax(income, self.table.federal());
        let gross_provincial = progressive_tax(income, provincial_schedule);

        let federal_credit = self.federal_credit();
        let provincial_credit = self.provincial_credit(province, provincial_schedule);

        let federal_tax = self.net_tax(gross_federal, federal_credit);
        let provincial_tax = self.net_tax(gross_provincial, provincial_credit);
        let total_tax = federal_tax + provincial_tax;

        debug!(
            income = %income,
            province = %province,
            gross_federal = %gross_federal,
            gross_provincial = %gross_provincial,
            total_tax = %total_tax,
            "calculated personal tax"
        );

        Ok(TaxResult {
            federal_tax,
            provincial_tax,
            total_tax,
            effective_rate: rate_of(total_tax, income),
            marginal_rate: bracket_rate(income, self.table.federal())
                + bracket_rate(income, provincial_schedule),
        })
    }

    /// Federal basic personal amount credit.
    fn federal_credit(&self) -> Decimal {
        self.table.federal_basic_personal_amount() * self.table.federal().first_rate()
    }

    /// Provincial basic personal amount credit.
    fn provincial_credit(
        &self,
        province: Province,
        schedule: &BracketSchedule,
    ) -> Decimal {
        self.table.provincial_basic_personal_amount(province) * schedule.first_rate()
    }

    /// Gross tax less a non-refundable credit, never below zero.
    fn net_tax(
        &self,
        gross: Decimal,
        credit: Decimal,
    ) -> Decimal {
        max(gross - credit, Decimal::ZERO)
    }
}
