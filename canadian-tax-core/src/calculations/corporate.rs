//! CCPC corporate tax: small business deduction with the passive income
//! grind, general-rate tax on the excess, flat provincial tax and tax on
//! investment income.
//!
//! # Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Business limit, ground down by passive income above the threshold |
//! | 2    | SBD tax on active income up to the limit |
//! | 3    | General-rate tax on active income above the limit |
//! | 4    | Provincial tax on all active income |
//! | 5    | Investment income tax |
//! | 6    | Total and effective rate |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{clamp_input, max, min, rate_of};
use crate::{CcpcTaxResult, CorporateConfig, Province};

/// Small business deduction split of active business income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmallBusinessDeduction {
    pub sbd_limit: Decimal,
    pub sbd_income: Decimal,
    pub sbd_tax: Decimal,
}

/// Calculator for CCPC corporate tax under one year's corporate parameters.
#[derive(Debug, Clone, Copy)]
pub struct CcpcTaxCalculator<'a> {
    config: &'a CorporateConfig,
}

impl<'a> CcpcTaxCalculator<'a> {
    pub fn new(config: &'a CorporateConfig) -> Self {
        Self { config }
    }

    /// Business limit after the passive income grind.
    ///
    /// Each dollar of passive income above the threshold removes
    /// `passive_income_grind_factor` dollars of limit, down to zero.
    pub fn sbd_limit(
        &self,
        passive_income: Decimal,
    ) -> Decimal {
        let passive_income = clamp_input("passive_income", passive_income);
        let excess = max(passive_income - self.config.passive_income_threshold, Decimal::ZERO);
        let reduction = excess * self.config.passive_income_grind_factor;

        max(self.config.sbd_business_limit - reduction, Decimal::ZERO)
    }

    /// Small business deduction with the full business limit.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use canadian_tax_core::calculations::CcpcTaxCalculator;
    /// use canadian_tax_core::TaxRules;
    ///
    /// let rules = TaxRules::canada().unwrap();
    /// let corporate = &rules.year(2025).unwrap().config().corporate;
    /// let sbd = CcpcTaxCalculator::new(corporate).small_business_deduction(dec!(600000));
    ///
    /// assert_eq!(sbd.sbd_income, dec!(500000));
    /// assert_eq!(sbd.sbd_tax, dec!(45000));
    /// ```
    pub fn small_business_deduction(
        &self,
        active_business_income: Decimal,
    ) -> SmallBusinessDeduction {
        self.small_business_deduction_with_passive(active_business_income, Decimal::ZERO)
    }

    /// Small business deduction with the limit ground down by
    /// `passive_income`.
    pub fn small_business_deduction_with_passive(
        &self,
        active_business_income: Decimal,
        passive_income: Decimal,
    ) -> SmallBusinessDeduction {
        let active_business_income = clamp_input("active_business_income", active_business_income);
        let sbd_limit = self.sbd_limit(passive_income);
        let sbd_income = min(active_business_income, sbd_limit);

        SmallBusinessDeduction {
            sbd_limit,
            sbd_income,
            sbd_tax: sbd_income * self.config.sbd_rate,
        }
    }

    /// Flat provincial corporate rate.
    ///
    /// An unrecognized code, or a province with no configured rate, takes
    /// the fallback province's rate.
    pub fn provincial_corporate_rate(
        &self,
        province: &str,
    ) -> Decimal {
        if let Some(rate) = Province::parse(province)
            .and_then(|province| self.config.provincial_rates.get(&province))
        {
            return *rate;
        }

        let fallback = self.config.fallback_province;
        warn!(
            province = %province,
            fallback = %fallback,
            "no corporate rate for province, using fallback"
        );
        self.config
            .provincial_rates
            .get(&fallback)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Calculates CCPC tax, grinding the business limit with investment
    /// income.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use canadian_tax_core::calculations::CcpcTaxCalculator;
    /// use canadian_tax_core::TaxRules;
    ///
    /// let rules = TaxRules::canada().unwrap();
    /// let corporate = &rules.year(2025).unwrap().config().corporate;
    /// let result = CcpcTaxCalculator::new(corporate).calculate(dec!(300000), dec!(0), "ON");
    ///
    /// assert_eq!(result.total_tax, dec!(37500));
    /// assert_eq!(result.effective_rate, dec!(0.125));
    /// ```
    pub fn calculate(
        &self,
        active_business_income: Decimal,
        investment_income: Decimal,
        province: &str,
    ) -> CcpcTaxResult {
        self.calculate_with_passive(
            active_business_income,
            investment_income,
            investment_income,
            province,
        )
    }

    /// Calculates CCPC tax with a passive income figure for the grind that
    /// differs from the investment income being taxed.
    pub fn calculate_with_passive(
        &self,
        active_business_income: Decimal,
        investment_income: Decimal,
        passive_income: Decimal,
        province: &str,
    ) -> CcpcTaxResult {
        let active_business_income = clamp_input("active_business_income", active_business_income);
        let investment_income = clamp_input("investment_income", investment_income);

        let sbd = self.small_business_deduction_with_passive(active_business_income, passive_income);

        let general_rate_income = max(active_business_income - sbd.sbd_limit, Decimal::ZERO);
        let general_rate_tax = general_rate_income * self.config.general_rate;
        let provincial_tax = active_business_income * self.provincial_corporate_rate(province);
        let investment_tax = investment_income * self.config.investment_income_rate;

        let total_tax = sbd.sbd_tax + general_rate_tax + provincial_tax + investment_tax;

        debug!(
            active_business_income = %active_business_income,
            investment_income = %investment_income,
            sbd_limit = %sbd.sbd_limit,
            total_tax = %total_tax,
            "calculated CCPC tax"
        );

        CcpcTaxResult {
            active_business_income,
            investment_income,
            sbd_limit: sbd.sbd_limit,
            sbd_income: sbd.sbd_income,
            sbd_tax: sbd.sbd_tax,
            general_rate_income,
            general_rate_tax,
            provincial_tax,
            investment_tax,
            total_tax,
            effective_rate: rate_of(total_tax, active_business_income + investment_income),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::rules::canada_2025;

    fn config_fixture() -> CorporateConfig {
        canada_2025::config().corporate
    }

    // =========================================================================
    // sbd_limit tests
    // =========================================================================

    #[test]
    fn sbd_limit_without_passive_income() {
        let config = config_fixture();

        assert_eq!(CcpcTaxCalculator::new(&config).sbd_limit(dec!(0)), dec!(500000));
    }

    #[test]
    fn sbd_limit_at_threshold_is_not_ground() {
        let config = config_fixture();

        assert_eq!(CcpcTaxCalculator::new(&config).sbd_limit(dec!(50000)), dec!(500000));
    }

    #[test]
    fn sbd_limit_ground_by_passive_income() {
        let config = config_fixture();

        // 500000 - 5 × 10000
        assert_eq!(CcpcTaxCalculator::new(&config).sbd_limit(dec!(60000)), dec!(450000));
    }

    #[test]
    fn sbd_limit_fully_ground() {
        let config = config_fixture();

        assert_eq!(CcpcTaxCalculator::new(&config).sbd_limit(dec!(150000)), dec!(0));
        assert_eq!(CcpcTaxCalculator::new(&config).sbd_limit(dec!(400000)), dec!(0));
    }

    #[test]
    fn sbd_limit_with_huge_passive_income_is_zero() {
        let config = config_fixture();

        assert_eq!(CcpcTaxCalculator::new(&config).sbd_limit(Decimal::MAX), dec!(0));
    }

    // =========================================================================
    // small_business_deduction tests
    // =========================================================================

    #[test]
    fn sbd_below_limit() {
        let config = config_fixture();

        assert_eq!(
            CcpcTaxCalculator::new(&config).small_business_deduction(dec!(300000)),
            SmallBusinessDeduction {
                sbd_limit: dec!(500000),
                sbd_income: dec!(300000),
                sbd_tax: dec!(27000),
            }
        );
    }

    #[test]
    fn sbd_capped_at_limit() {
        let config = config_fixture();

        let sbd = CcpcTaxCalculator::new(&config).small_business_deduction(dec!(600000));

        assert_eq!(sbd.sbd_income, dec!(500000));
        assert_eq!(sbd.sbd_tax, dec!(45000));
    }

    #[test]
    fn sbd_with_passive_income_uses_ground_limit() {
        let config = config_fixture();

        let sbd = CcpcTaxCalculator::new(&config)
            .small_business_deduction_with_passive(dec!(600000), dec!(60000));

        assert_eq!(sbd.sbd_limit, dec!(450000));
        assert_eq!(sbd.sbd_tax, dec!(40500));
    }

    // =========================================================================
    // provincial_corporate_rate tests
    // =========================================================================

    #[test]
    fn provincial_rate_for_configured_provinces() {
        let config = config_fixture();
        let calculator = CcpcTaxCalculator::new(&config);

        assert_eq!(calculator.provincial_corporate_rate("ON"), dec!(0.035));
        assert_eq!(calculator.provincial_corporate_rate("bc"), dec!(0.02));
        assert_eq!(calculator.provincial_corporate_rate("AB"), dec!(0.02));
    }

    #[test]
    fn provincial_rate_falls_back_for_unconfigured_province() {
        let config = config_fixture();

        assert_eq!(
            CcpcTaxCalculator::new(&config).provincial_corporate_rate("MB"),
            dec!(0.035)
        );
    }

    #[test]
    fn provincial_rate_falls_back_for_unknown_code() {
        let config = config_fixture();

        assert_eq!(
            CcpcTaxCalculator::new(&config).provincial_corporate_rate("XX"),
            dec!(0.035)
        );
    }

    // =========================================================================
    // calculate tests
    // =========================================================================

    #[test]
    fn calculate_within_small_business_limit() {
        let config = config_fixture();

        let result = CcpcTaxCalculator::new(&config).calculate(dec!(300000), dec!(0), "ON");

        assert_eq!(result.sbd_tax, dec!(27000));
        assert_eq!(result.general_rate_tax, dec!(0));
        assert_eq!(result.provincial_tax, dec!(10500));
        assert_eq!(result.total_tax, dec!(37500));
        assert_eq!(result.effective_rate, dec!(0.125));
    }

    #[test]
    fn calculate_above_small_business_limit() {
        let config = config_fixture();

        let result = CcpcTaxCalculator::new(&config).calculate(dec!(600000), dec!(0), "ON");

        assert_eq!(result.sbd_tax, dec!(45000));
        assert_eq!(result.general_rate_income, dec!(100000));
        assert_eq!(result.general_rate_tax, dec!(15000));
        assert_eq!(result.provincial_tax, dec!(21000));
        assert_eq!(result.total_tax, dec!(81000));
    }

    #[test]
    fn calculate_with_investment_income() {
        let config = config_fixture();

        let result = CcpcTaxCalculator::new(&config).calculate(dec!(300000), dec!(50000), "ON");

        assert_eq!(result.sbd_limit, dec!(500000));
        assert_eq!(result.investment_tax, dec!(19335));
        assert_eq!(result.total_tax, dec!(56835));
        assert_eq!(result.effective_rate, dec!(56835) / dec!(350000));
    }

    #[test]
    fn calculate_grinds_limit_with_investment_income() {
        let config = config_fixture();

        let result = CcpcTaxCalculator::new(&config).calculate(dec!(500000), dec!(100000), "ON");

        // 500000 - 5 × 50000
        assert_eq!(result.sbd_limit, dec!(250000));
        assert_eq!(result.sbd_tax, dec!(22500));
        assert_eq!(result.general_rate_income, dec!(250000));
        assert_eq!(result.general_rate_tax, dec!(37500));
    }

    #[test]
    fn calculate_with_separate_passive_income() {
        let config = config_fixture();

        let result = CcpcTaxCalculator::new(&config).calculate_with_passive(
            dec!(500000),
            dec!(10000),
            dec!(150000),
            "ON",
        );

        assert_eq!(result.sbd_limit, dec!(0));
        assert_eq!(result.sbd_tax, dec!(0));
        assert_eq!(result.general_rate_tax, dec!(75000));
        assert_eq!(result.investment_tax, dec!(3867));
    }

    #[test]
    fn calculate_total_is_sum_of_parts() {
        let config = config_fixture();

        let result = CcpcTaxCalculator::new(&config).calculate(dec!(612345), dec!(73456), "BC");

        assert_eq!(
            result.total_tax,
            result.sbd_tax + result.general_rate_tax + result.provincial_tax + result.investment_tax
        );
    }

    #[test]
    fn calculate_zero_income() {
        let config = config_fixture();

        let result = CcpcTaxCalculator::new(&config).calculate(dec!(0), dec!(0), "ON");

        assert_eq!(result.total_tax, dec!(0));
        assert_eq!(result.effective_rate, dec!(0));
    }

    #[test]
    fn calculate_negative_income_is_treated_as_zero() {
        let config = config_fixture();
        let calculator = CcpcTaxCalculator::new(&config);

        assert_eq!(
            calculator.calculate(dec!(-1000), dec!(-500), "ON"),
            calculator.calculate(dec!(0), dec!(0), "ON")
        );
    }
}
