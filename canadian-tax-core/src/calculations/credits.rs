//! Non-refundable personal credits: basic personal amount, medical expenses,
//! charitable donations and dividend tax credits.
//!
//! Credit amounts are not rounded; only progressive tax is rounded to cents.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{clamp_input, max, min};
use crate::{Province, TaxError, TaxYearRules};

/// Whether a dividend was paid from income taxed at the general corporate
/// rate (eligible) or at the small business rate (non-eligible).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DividendType {
    Eligible,
    NonEligible,
}

/// Gross-up and credit breakdown for one dividend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividendTaxCredit {
    pub dividend_type: DividendType,

    /// Amount included in taxable income.
    pub grossed_up_amount: Decimal,
    pub federal_credit: Decimal,
    pub provincial_credit: Decimal,
    pub total_credit: Decimal,
}

/// Calculator for the personal credits of one tax year.
#[derive(Debug, Clone, Copy)]
pub struct CreditCalculator<'a> {
    rules: &'a TaxYearRules,
}

impl<'a> CreditCalculator<'a> {
    pub fn new(rules: &'a TaxYearRules) -> Self {
        Self { rules }
    }

    /// Federal plus provincial basic personal amount credits, each at its
    /// jurisdiction's lowest bracket rate.
    ///
    /// # Errors
    ///
    /// [`TaxError::UnsupportedJurisdiction`] for an unregistered province.
    pub fn basic_personal_credit(
        &self,
        province: Province,
    ) -> Result<Decimal, TaxError> {
        let table = self.rules.table();
        let provincial = table.provincial(province)?;

        Ok(table.federal_basic_personal_amount() * table.federal().first_rate()
            + table.provincial_basic_personal_amount(province) * provincial.first_rate())
    }

    /// Medical expenses above the lesser of 3% of net income and the yearly
    /// dollar threshold.
    pub fn medical_expense_claimable(
        &self,
        expenses: Decimal,
        net_income: Decimal,
    ) -> Decimal {
        let credits = &self.rules.config().personal_credits;
        let expenses = clamp_input("medical_expenses", expenses);
        let net_income = clamp_input("net_income", net_income);

        let threshold = min(
            net_income * credits.medical_expense_income_rate,
            credits.medical_expense_threshold,
        );
        max(expenses - threshold, Decimal::ZERO)
    }

    /// Federal medical expense credit.
    pub fn medical_expense_credit(
        &self,
        expenses: Decimal,
        net_income: Decimal,
    ) -> Decimal {
        self.medical_expense_claimable(expenses, net_income)
            * self.rules.config().personal_credits.federal_credit_rate
    }

    /// Federal charitable donation credit.
    ///
    /// The first tier earns the low rate, the rest the high rate. A
    /// first-time donor also earns the super credit on donations up to its
    /// limit, on top of the base tiers.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use canadian_tax_core::calculations::CreditCalculator;
    /// use canadian_tax_core::TaxRules;
    ///
    /// let rules = TaxRules::canada().unwrap();
    /// let credits = CreditCalculator::new(rules.year(2025).unwrap());
    ///
    /// assert_eq!(credits.charitable_donation_credit(dec!(500), false), dec!(117));
    /// assert_eq!(credits.charitable_donation_credit(dec!(500), true), dec!(242));
    /// ```
    pub fn charitable_donation_credit(
        &self,
        donations: Decimal,
        first_time_donor: bool,
    ) -> Decimal {
        let credits = &self.rules.config().personal_credits;
        let donations = clamp_input("donations", donations);

        let low_tier = min(donations, credits.donation_low_tier_limit);
        let high_tier = max(donations - credits.donation_low_tier_limit, Decimal::ZERO);
        let mut credit =
            low_tier * credits.donation_low_rate + high_tier * credits.donation_high_rate;

        if first_time_donor {
            credit += min(donations, credits.first_time_donor_limit) * credits.first_time_donor_rate;
        }

        credit
    }

    /// Donations that can be claimed this year: current donations plus any
    /// unclaimed donations carried forward from earlier years.
    pub fn total_donations_available(
        &self,
        current_year: Decimal,
        carried_forward: Decimal,
    ) -> Decimal {
        clamp_input("donations", current_year) + clamp_input("carried_forward", carried_forward)
    }

    /// Grosses up a dividend and computes its federal and provincial credits.
    ///
    /// # Errors
    ///
    /// [`TaxError::UnsupportedJurisdiction`] when no dividend credit rates
    /// are configured for `province`.
    pub fn dividend_tax_credit(
        &self,
        amount: Decimal,
        dividend_type: DividendType,
        province: Province,
    ) -> Result<DividendTaxCredit, TaxError> {
        let dividends = &self.rules.config().dividends;
        let provincial_rates = dividends
            .provincial_credit_rates
            .get(&province)
            .ok_or_else(|| TaxError::UnsupportedJurisdiction {
                jurisdiction: province.to_string(),
                tax_year: self.rules.tax_year(),
            })?;
        let amount = clamp_input("dividend", amount);

        let (gross_up, federal_rate, provincial_rate) = match dividend_type {
            DividendType::Eligible => (
                dividends.eligible_gross_up,
                dividends.eligible_federal_credit_rate,
                provincial_rates.eligible,
            ),
            DividendType::NonEligible => (
                dividends.non_eligible_gross_up,
                dividends.non_eligible_federal_credit_rate,
                provincial_rates.non_eligible,
            ),
        };

        let grossed_up_amount = amount * (Decimal::ONE + gross_up);
        let federal_credit = grossed_up_amount * federal_rate;
        let provincial_credit = grossed_up_amount * provincial_rate;

        debug!(
            amount = %amount,
            ?dividend_type,
            province = %province,
            grossed_up = %grossed_up_amount,
            "calculated dividend tax credit"
        );

        Ok(DividendTaxCredit {
            dividend_type,
            grossed_up_amount,
            federal_credit,
            provincial_credit,
            total_credit: federal_credit + provincial_credit,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::rules::canada_2025;

    // =========================================================================
    // basic_personal_credit tests
    // =========================================================================

    #[test]
    fn basic_personal_credit_ontario() {
        let rules = canada_2025::rules().unwrap();

        // 15705 × 0.15 + 11865 × 0.0505
        assert_eq!(
            CreditCalculator::new(&rules).basic_personal_credit(Province::Ontario),
            Ok(dec!(2954.9325))
        );
    }

    #[test]
    fn basic_personal_credit_unsupported_province() {
        let rules = canada_2025::rules().unwrap();

        assert!(matches!(
            CreditCalculator::new(&rules).basic_personal_credit(Province::Nunavut),
            Err(TaxError::UnsupportedJurisdiction { .. })
        ));
    }

    // =========================================================================
    // medical expense tests
    // =========================================================================

    #[test]
    fn medical_threshold_uses_income_percentage_when_lower() {
        let rules = canada_2025::rules().unwrap();
        let credits = CreditCalculator::new(&rules);

        // threshold 50000 × 0.03 = 1500
        assert_eq!(credits.medical_expense_claimable(dec!(5000), dec!(50000)), dec!(3500));
        assert_eq!(credits.medical_expense_credit(dec!(5000), dec!(50000)), dec!(525));
    }

    #[test]
    fn medical_threshold_is_capped() {
        let rules = canada_2025::rules().unwrap();

        // threshold min(3000, 2635)
        assert_eq!(
            CreditCalculator::new(&rules).medical_expense_credit(dec!(4000), dec!(100000)),
            dec!(204.75)
        );
    }

    #[test]
    fn medical_expenses_below_threshold_earn_nothing() {
        let rules = canada_2025::rules().unwrap();

        assert_eq!(
            CreditCalculator::new(&rules).medical_expense_credit(dec!(1000), dec!(50000)),
            dec!(0)
        );
    }

    #[test]
    fn medical_expenses_with_zero_income_are_fully_claimable() {
        let rules = canada_2025::rules().unwrap();

        assert_eq!(
            CreditCalculator::new(&rules).medical_expense_claimable(dec!(800), dec!(0)),
            dec!(800)
        );
    }

    // =========================================================================
    // charitable donation tests
    // =========================================================================

    #[test]
    fn donation_within_low_tier() {
        let rules = canada_2025::rules().unwrap();

        assert_eq!(
            CreditCalculator::new(&rules).charitable_donation_credit(dec!(100), false),
            dec!(15)
        );
    }

    #[test]
    fn donation_spanning_both_tiers() {
        let rules = canada_2025::rules().unwrap();

        // 200 × 0.15 + 300 × 0.29
        assert_eq!(
            CreditCalculator::new(&rules).charitable_donation_credit(dec!(500), false),
            dec!(117)
        );
    }

    #[test]
    fn first_time_donor_super_credit() {
        let rules = canada_2025::rules().unwrap();

        // 117 + 500 × 0.25
        assert_eq!(
            CreditCalculator::new(&rules).charitable_donation_credit(dec!(500), true),
            dec!(242)
        );
    }

    #[test]
    fn first_time_donor_super_credit_is_capped() {
        let rules = canada_2025::rules().unwrap();

        // 30 + 1800 × 0.29 + 1000 × 0.25
        assert_eq!(
            CreditCalculator::new(&rules).charitable_donation_credit(dec!(2000), true),
            dec!(802)
        );
    }

    #[test]
    fn negative_donation_earns_nothing() {
        let rules = canada_2025::rules().unwrap();

        assert_eq!(
            CreditCalculator::new(&rules).charitable_donation_credit(dec!(-100), true),
            dec!(0)
        );
    }

    #[test]
    fn donations_available_include_carry_forward() {
        let rules = canada_2025::rules().unwrap();

        assert_eq!(
            CreditCalculator::new(&rules).total_donations_available(dec!(500), dec!(1200)),
            dec!(1700)
        );
    }

    // =========================================================================
    // dividend tax credit tests
    // =========================================================================

    #[test]
    fn eligible_dividend_credit_ontario() {
        let rules = canada_2025::rules().unwrap();

        let credit = CreditCalculator::new(&rules)
            .dividend_tax_credit(dec!(10000), DividendType::Eligible, Province::Ontario)
            .unwrap();

        assert_eq!(
            credit,
            DividendTaxCredit {
                dividend_type: DividendType::Eligible,
                grossed_up_amount: dec!(13800),
                federal_credit: dec!(3452.76),
                provincial_credit: dec!(1380),
                total_credit: dec!(4832.76),
            }
        );
    }

    #[test]
    fn non_eligible_dividend_credit_ontario() {
        let rules = canada_2025::rules().unwrap();

        let credit = CreditCalculator::new(&rules)
            .dividend_tax_credit(dec!(10000), DividendType::NonEligible, Province::Ontario)
            .unwrap();

        assert_eq!(credit.grossed_up_amount, dec!(11500));
        assert_eq!(credit.federal_credit, dec!(1038.45));
        assert_eq!(credit.provincial_credit, dec!(339.25));
        assert_eq!(credit.total_credit, dec!(1377.70));
    }

    #[test]
    fn dividend_credit_on_huge_amount_is_clamped() {
        let rules = canada_2025::rules().unwrap();

        let credit = CreditCalculator::new(&rules)
            .dividend_tax_credit(Decimal::MAX, DividendType::Eligible, Province::Ontario)
            .unwrap();

        // MAX_INPUT_AMOUNT × 1.38
        assert_eq!(credit.grossed_up_amount, dec!(1380000000000000));
    }

    #[test]
    fn dividend_credit_unsupported_province() {
        let rules = canada_2025::rules().unwrap();

        let result = CreditCalculator::new(&rules).dividend_tax_credit(
            dec!(10000),
            DividendType::Eligible,
            Province::Quebec,
        );

        assert_eq!(
            result,
            Err(TaxError::UnsupportedJurisdiction {
                jurisdiction: "QC".to_string(),
                tax_year: 2025,
            })
        );
    }
}
