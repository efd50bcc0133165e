//! Refundable dividend tax on hand.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{clamp_input, min};
use crate::{CorporateConfig, RdtohAccount};

/// Activity for one year of a multi-year RDTOH ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RdtohActivity {
    pub investment_income: Decimal,
    pub dividends_paid: Decimal,
}

/// RDTOH additions and refunds under one year's corporate parameters.
#[derive(Debug, Clone, Copy)]
pub struct RdtohLedger<'a> {
    config: &'a CorporateConfig,
}

impl<'a> RdtohLedger<'a> {
    pub fn new(config: &'a CorporateConfig) -> Self {
        Self { config }
    }

    /// Refundable portion of the tax on investment income.
    pub fn addition(
        &self,
        investment_income: Decimal,
    ) -> Decimal {
        clamp_input("investment_income", investment_income) * self.config.rdtoh_addition_rate
    }

    /// Dividend refund, capped at the opening balance.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use canadian_tax_core::calculations::RdtohLedger;
    /// use canadian_tax_core::TaxRules;
    ///
    /// let rules = TaxRules::canada().unwrap();
    /// let ledger = RdtohLedger::new(&rules.year(2025).unwrap().config().corporate);
    ///
    /// assert_eq!(ledger.refund(dec!(10000), dec!(20000)), dec!(7666));
    /// assert_eq!(ledger.refund(dec!(5000), dec!(50000)), dec!(5000));
    /// ```
    pub fn refund(
        &self,
        opening_balance: Decimal,
        dividends_paid: Decimal,
    ) -> Decimal {
        let opening_balance = clamp_input("opening_balance", opening_balance);
        let dividends_paid = clamp_input("dividends_paid", dividends_paid);

        min(opening_balance, dividends_paid * self.config.rdtoh_refund_rate)
    }

    /// One year of the account: the addition from this year's investment
    /// income and the refund triggered by this year's dividends.
    pub fn roll_forward(
        &self,
        opening_balance: Decimal,
        investment_income: Decimal,
        dividends_paid: Decimal,
    ) -> RdtohAccount {
        let opening_balance = clamp_input("opening_balance", opening_balance);
        let addition = self.addition(investment_income);
        let refund = self.refund(opening_balance, dividends_paid);

        RdtohAccount {
            opening_balance,
            addition,
            refund,
            closing_balance: opening_balance + addition - refund,
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
    // addition / refund tests
    // =========================================================================

    #[test]
    fn addition_on_investment_income() {
        let config = config_fixture();

        assert_eq!(RdtohLedger::new(&config).addition(dec!(10000)), dec!(3067));
    }

    #[test]
    fn refund_below_balance() {
        let config = config_fixture();

        assert_eq!(RdtohLedger::new(&config).refund(dec!(10000), dec!(20000)), dec!(7666));
    }

    #[test]
    fn refund_capped_at_balance() {
        let config = config_fixture();

        assert_eq!(RdtohLedger::new(&config).refund(dec!(5000), dec!(50000)), dec!(5000));
    }

    #[test]
    fn refund_with_empty_balance_is_zero() {
        let config = config_fixture();

        assert_eq!(RdtohLedger::new(&config).refund(dec!(0), dec!(50000)), dec!(0));
    }

    // =========================================================================
    // roll_forward tests
    // =========================================================================

    #[test]
    fn roll_forward_single_year() {
        let config = config_fixture();

        let account = RdtohLedger::new(&config).roll_forward(dec!(10000), dec!(10000), dec!(20000));

        assert_eq!(
            account,
            RdtohAccount {
                opening_balance: dec!(10000),
                addition: dec!(3067),
                refund: dec!(7666),
                closing_balance: dec!(5401),
            }
        );
    }
}
