//! Built-in 2025 rules: federal and Ontario schedules plus the CRA
//! parameters the engine uses.
//!
//! Other provinces are registered by loading rule files; see the
//! `canadian-tax-data` crate.

use std::collections::BTreeMap;

use rust_decimal_macros::dec;

use super::TaxYearRules;
use crate::{
    BracketSchedule, CcaConfig, CorporateConfig, DividendConfig, Jurisdiction,
    JurisdictionTaxTable, PayrollConfig, PersonalCreditConfig, Province,
    ProvincialDividendCreditRates, TaxBracket, TaxError, TaxYearConfig,
};

pub const TAX_YEAR: i32 = 2025;

pub fn federal_brackets() -> Vec<TaxBracket> {
    vec![
        TaxBracket::bounded(dec!(55867), dec!(0.15)),
        TaxBracket::bounded(dec!(111733), dec!(0.205)),
        TaxBracket::bounded(dec!(173205), dec!(0.26)),
        TaxBracket::bounded(dec!(246752), dec!(0.29)),
        TaxBracket::unbounded(dec!(0.33)),
    ]
}

pub fn ontario_brackets() -> Vec<TaxBracket> {
    vec![
        TaxBracket::bounded(dec!(51446), dec!(0.0505)),
        TaxBracket::bounded(dec!(102894), dec!(0.0915)),
        TaxBracket::bounded(dec!(150000), dec!(0.1116)),
        TaxBracket::bounded(dec!(220000), dec!(0.1216)),
        TaxBracket::unbounded(dec!(0.1316)),
    ]
}

/// The 2025 bracket table.
///
/// # Errors
///
/// A [`TaxError`] from schedule or table validation. The module tests
/// check that the literal schedules pass.
pub fn table() -> Result<JurisdictionTaxTable, TaxError> {
    let federal = BracketSchedule::new(Jurisdiction::Federal, federal_brackets())?;
    let ontario = BracketSchedule::new(Province::Ontario.into(), ontario_brackets())?;

    let basic_personal_amounts = BTreeMap::from([
        (Jurisdiction::Federal, dec!(15705)),
        (Jurisdiction::Provincial(Province::Ontario), dec!(11865)),
    ]);

    JurisdictionTaxTable::new(
        TAX_YEAR,
        federal,
        BTreeMap::from([(Province::Ontario, ontario)]),
        basic_personal_amounts,
    )
}

pub fn config() -> TaxYearConfig {
    TaxYearConfig {
        tax_year: TAX_YEAR,
        personal_credits: PersonalCreditConfig {
            federal_credit_rate: dec!(0.15),
            medical_expense_income_rate: dec!(0.03),
            medical_expense_threshold: dec!(2635),
            donation_low_tier_limit: dec!(200),
            donation_low_rate: dec!(0.15),
            donation_high_rate: dec!(0.29),
            first_time_donor_rate: dec!(0.25),
            first_time_donor_limit: dec!(1000),
        },
        dividends: DividendConfig {
            eligible_gross_up: dec!(0.38),
            eligible_federal_credit_rate: dec!(0.2502),
            non_eligible_gross_up: dec!(0.15),
            non_eligible_federal_credit_rate: dec!(0.0903),
            provincial_credit_rates: BTreeMap::from([(
                Province::Ontario,
                ProvincialDividendCreditRates {
                    eligible: dec!(0.10),
                    non_eligible: dec!(0.0295),
                },
            )]),
        },
        corporate: CorporateConfig {
            sbd_business_limit: dec!(500000),
            sbd_rate: dec!(0.09),
            general_rate: dec!(0.15),
            passive_income_threshold: dec!(50000),
            passive_income_grind_factor: dec!(5),
            investment_income_rate: dec!(0.3867),
            rdtoh_addition_rate: dec!(0.3067),
            rdtoh_refund_rate: dec!(0.3833),
            fallback_province: Province::Ontario,
            provincial_rates: BTreeMap::from([
                (Province::Ontario, dec!(0.035)),
                (Province::BritishColumbia, dec!(0.02)),
                (Province::Alberta, dec!(0.02)),
            ]),
        },
        payroll: PayrollConfig {
            cpp_max_pensionable_earnings: dec!(68500),
            cpp_basic_exemption: dec!(3500),
            cpp_contribution_rate: dec!(0.0595),
            rrsp_earned_income_rate: dec!(0.18),
            rrsp_dollar_limit: dec!(31560),
        },
        cca: CcaConfig {
            half_year_factor: dec!(0.5),
            accelerated_investment_factor: dec!(1.5),
        },
    }
}

/// # Errors
///
/// See [`table`] and [`TaxYearRules::new`].
pub fn rules() -> Result<TaxYearRules, TaxError> {
    TaxYearRules::new(table()?, config())
}
