use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Province, TaxError};

/// Per-year scalar parameters used by the credit, corporate, payroll and
/// CCA formulas.
///
/// Bracket schedules and basic personal amounts live in
/// [`crate::JurisdictionTaxTable`]; everything else that changes from year
/// to year lives here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    pub tax_year: i32,
    pub personal_credits: PersonalCreditConfig,
    pub dividends: DividendConfig,
    pub corporate: CorporateConfig,
    pub payroll: PayrollConfig,
    pub cca: CcaConfig,
}

/// Non-refundable credit parameters (federal).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalCreditConfig {
    /// Lowest federal rate, applied to medical expenses and the first
    /// donation tier.
    pub federal_credit_rate: Decimal,

    /// Fraction of net income below which medical expenses are not claimable.
    pub medical_expense_income_rate: Decimal,

    /// Dollar cap on the medical expense threshold (2,635 for 2025).
    pub medical_expense_threshold: Decimal,

    /// Donations up to this amount earn `donation_low_rate`.
    pub donation_low_tier_limit: Decimal,
    pub donation_low_rate: Decimal,
    pub donation_high_rate: Decimal,

    /// Additional first-time donor rate, applied to donations up to
    /// `first_time_donor_limit`.
    pub first_time_donor_rate: Decimal,
    pub first_time_donor_limit: Decimal,
}

/// Dividend gross-up and credit rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividendConfig {
    pub eligible_gross_up: Decimal,
    pub eligible_federal_credit_rate: Decimal,
    pub non_eligible_gross_up: Decimal,
    pub non_eligible_federal_credit_rate: Decimal,

    /// Provincial credit rates, applied to the grossed-up amount.
    #[serde(default)]
    pub provincial_credit_rates: BTreeMap<Province, ProvincialDividendCreditRates>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvincialDividendCreditRates {
    pub eligible: Decimal,
    pub non_eligible: Decimal,
}

/// CCPC parameters: small business deduction, passive income grind,
/// investment income and RDTOH.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorporateConfig {
    pub sbd_business_limit: Decimal,
    pub sbd_rate: Decimal,

    /// Federal rate on active business income above the SBD limit.
    pub general_rate: Decimal,

    pub passive_income_threshold: Decimal,

    /// Dollars of SBD limit removed per dollar of passive income above the
    /// threshold.
    pub passive_income_grind_factor: Decimal,

    /// Combined federal and provincial rate on investment income.
    pub investment_income_rate: Decimal,

    pub rdtoh_addition_rate: Decimal,
    pub rdtoh_refund_rate: Decimal,

    /// Province whose corporate rate applies when the requested province has
    /// none registered.
    pub fallback_province: Province,

    /// Flat provincial small-business rates, charged on all active business
    /// income.
    #[serde(default)]
    pub provincial_rates: BTreeMap<Province, Decimal>,
}

/// CPP and RRSP parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollConfig {
    /// Year's maximum pensionable earnings (68,500 for 2025).
    pub cpp_max_pensionable_earnings: Decimal,
    pub cpp_basic_exemption: Decimal,

    /// Contribution rate paid by each of the employee and the employer.
    pub cpp_contribution_rate: Decimal,

    pub rrsp_earned_income_rate: Decimal,
    pub rrsp_dollar_limit: Decimal,
}

/// Capital cost allowance first-year factors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CcaConfig {
    pub half_year_factor: Decimal,
    pub accelerated_investment_factor: Decimal,
}

impl TaxYearConfig {
    /// Checks every parameter against its valid range.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::InvalidConfiguration`] naming the first offending
    /// field when:
    /// - a rate is outside `[0, 1]`
    /// - a dollar amount is negative
    /// - a factor is not positive
    /// - the corporate fallback province has no provincial rate
    pub fn validate(&self) -> Result<(), TaxError> {
        let credits = &self.personal_credits;
        check_rate("personal_credits.federal_credit_rate", credits.federal_credit_rate)?;
        check_rate(
            "personal_credits.medical_expense_income_rate",
            credits.medical_expense_income_rate,
        )?;
        check_amount(
            "personal_credits.medical_expense_threshold",
            credits.medical_expense_threshold,
        )?;
        check_amount(
            "personal_credits.donation_low_tier_limit",
            credits.donation_low_tier_limit,
        )?;
        check_rate("personal_credits.donation_low_rate", credits.donation_low_rate)?;
        check_rate("personal_credits.donation_high_rate", credits.donation_high_rate)?;
        check_rate("personal_credits.first_time_donor_rate", credits.first_time_donor_rate)?;
        check_amount(
            "personal_credits.first_time_donor_limit",
            credits.first_time_donor_limit,
        )?;

        let dividends = &self.dividends;
        check_rate("dividends.eligible_gross_up", dividends.eligible_gross_up)?;
        check_rate(
            "dividends.eligible_federal_credit_rate",
            dividends.eligible_federal_credit_rate,
        )?;
        check_rate("dividends.non_eligible_gross_up", dividends.non_eligible_gross_up)?;
        check_rate(
            "dividends.non_eligible_federal_credit_rate",
            dividends.non_eligible_federal_credit_rate,
        )?;
        for (province, rates) in &dividends.provincial_credit_rates {
            check_rate(
                &format!("dividends.provincial_credit_rates.{province}.eligible"),
                rates.eligible,
            )?;
            check_rate(
                &format!("dividends.provincial_credit_rates.{province}.non_eligible"),
                rates.non_eligible,
            )?;
        }

        let corporate = &self.corporate;
        check_amount("corporate.sbd_business_limit", corporate.sbd_business_limit)?;
        check_rate("corporate.sbd_rate", corporate.sbd_rate)?;
        check_rate("corporate.general_rate", corporate.general_rate)?;
        check_amount(
            "corporate.passive_income_threshold",
            corporate.passive_income_threshold,
        )?;
        check_positive(
            "corporate.passive_income_grind_factor",
            corporate.passive_income_grind_factor,
        )?;
        check_rate("corporate.investment_income_rate", corporate.investment_income_rate)?;
        check_rate("corporate.rdtoh_addition_rate", corporate.rdtoh_addition_rate)?;
        check_rate("corporate.rdtoh_refund_rate", corporate.rdtoh_refund_rate)?;
        for (province, rate) in &corporate.provincial_rates {
            check_rate(&format!("corporate.provincial_rates.{province}"), *rate)?;
        }
        if !corporate
            .provincial_rates
            .contains_key(&corporate.fallback_province)
        {
            return Err(TaxError::invalid_config(
                "corporate.fallback_province",
                format!(
                    "{} has no entry in corporate.provincial_rates",
                    corporate.fallback_province
                ),
            ));
        }

        let payroll = &self.payroll;
        check_positive(
            "payroll.cpp_max_pensionable_earnings",
            payroll.cpp_max_pensionable_earnings,
        )?;
        check_amount("payroll.cpp_basic_exemption", payroll.cpp_basic_exemption)?;
        check_rate("payroll.cpp_contribution_rate", payroll.cpp_contribution_rate)?;
        check_rate("payroll.rrsp_earned_income_rate", payroll.rrsp_earned_income_rate)?;
        check_amount("payroll.rrsp_dollar_limit", payroll.rrsp_dollar_limit)?;

        check_positive("cca.half_year_factor", self.cca.half_year_factor)?;
        check_positive(
            "cca.accelerated_investment_factor",
            self.cca.accelerated_investment_factor,
        )?;

        Ok(())
    }
}

fn check_rate(
    field: &str,
    value: Decimal,
) -> Result<(), TaxError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(TaxError::invalid_config(
            field,
            format!("rate must be between 0 and 1, got {value}"),
        ));
    }
    Ok(())
}

fn check_amount(
    field: &str,
    value: Decimal,
) -> Result<(), TaxError> {
    if value < Decimal::ZERO {
        return Err(TaxError::invalid_config(
            field,
            format!("amount must be non-negative, got {value}"),
        ));
    }
    Ok(())
}

fn check_positive(
    field: &str,
    value: Decimal,
) -> Result<(), TaxError> {
    if value <= Decimal::ZERO {
        return Err(TaxError::invalid_config(
            field,
            format!("must be positive, got {value}"),
        ));
    }
    Ok(())
}
