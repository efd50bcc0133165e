//! CPP contributions and RRSP room, both driven by salary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::PayrollConfig;
use crate::calculations::common::{clamp_input, max, min};

/// CPP contributions on one salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CppContribution {
    /// Salary up to the YMPE, less the basic exemption.
    pub pensionable_earnings: Decimal,
    pub employee: Decimal,
    pub employer: Decimal,
}

impl CppContribution {
    pub fn total(&self) -> Decimal {
        self.employee + self.employer
    }
}

/// Calculator for payroll-linked amounts under one year's parameters.
#[derive(Debug, Clone, Copy)]
pub struct PayrollCalculator<'a> {
    config: &'a PayrollConfig,
}

impl<'a> PayrollCalculator<'a> {
    pub fn new(config: &'a PayrollConfig) -> Self {
        Self { config }
    }

    /// Employee and employer CPP contributions on `salary`.
    pub fn cpp_contribution(
        &self,
        salary: Decimal,
    ) -> CppContribution {
        let salary = clamp_input("salary", salary);
        let pensionable_earnings = max(
            min(salary, self.config.cpp_max_pensionable_earnings) - self.config.cpp_basic_exemption,
            Decimal::ZERO,
        );
        let contribution = pensionable_earnings * self.config.cpp_contribution_rate;

        CppContribution {
            pensionable_earnings,
            employee: contribution,
            employer: contribution,
        }
    }

    /// New RRSP room generated by earned income, up to the dollar limit.
    pub fn rrsp_room_earned(
        &self,
        earned_income: Decimal,
    ) -> Decimal {
        let earned_income = clamp_input("earned_income", earned_income);

        min(
            earned_income * self.config.rrsp_earned_income_rate,
            self.config.rrsp_dollar_limit,
        )
    }

    /// RRSP deduction limit: new room plus unused room carried in, less the
    /// pension adjustment, never below zero.
    pub fn rrsp_deduction_limit(
        &self,
        earned_income: Decimal,
        unused_room: Decimal,
        pension_adjustment: Decimal,
    ) -> Decimal {
        let unused_room = clamp_input("unused_room", unused_room);
        let pension_adjustment = clamp_input("pension_adjustment", pension_adjustment);

        max(
            self.rrsp_room_earned(earned_income) + unused_room - pension_adjustment,
            Decimal::ZERO,
        )
    }
}

/// Room left to carry forward after a contribution.
pub fn rrsp_carryforward(
    room: Decimal,
    contribution: Decimal,
) -> Decimal {
    max(room - clamp_input("contribution", contribution), Decimal::ZERO)
}

/// Taxable income after an RRSP deduction, never below zero.
pub fn taxable_income_after_rrsp(
    income: Decimal,
    deduction: Decimal,
) -> Decimal {
    max(income - clamp_input("deduction", deduction), Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::rules::canada_2025;

    fn config_fixture() -> PayrollConfig {
        canada_2025::config().payroll
    }

    // =========================================================================
    // cpp_contribution tests
    // =========================================================================

    #[test]
    fn cpp_capped_at_maximum_pensionable_earnings() {
        let config = config_fixture();

        let cpp = PayrollCalculator::new(&config).cpp_contribution(dec!(100000));

        // (68500 - 3500) × 0.0595
        assert_eq!(cpp.pensionable_earnings, dec!(65000));
        assert_eq!(cpp.employee, dec!(3867.5));
        assert_eq!(cpp.employer, dec!(3867.5));
        assert_eq!(cpp.total(), dec!(7735));
    }

    #[test]
    fn cpp_below_maximum() {
        let config = config_fixture();

        let cpp = PayrollCalculator::new(&config).cpp_contribution(dec!(43500));

        assert_eq!(cpp.employee, dec!(2380));
    }

    #[test]
    fn cpp_below_basic_exemption_is_zero() {
        let config = config_fixture();

        let cpp = PayrollCalculator::new(&config).cpp_contribution(dec!(3000));

        assert_eq!(cpp.total(), dec!(0));
    }

    // =========================================================================
    // RRSP tests
    // =========================================================================

    #[test]
    fn rrsp_room_is_percentage_of_earned_income() {
        let config = config_fixture();

        assert_eq!(PayrollCalculator::new(&config).rrsp_room_earned(dec!(50000)), dec!(9000));
    }

    #[test]
    fn rrsp_room_is_capped() {
        let config = config_fixture();

        assert_eq!(PayrollCalculator::new(&config).rrsp_room_earned(dec!(200000)), dec!(31560));
    }

    #[test]
    fn rrsp_deduction_limit_adds_unused_room() {
        let config = config_fixture();

        assert_eq!(
            PayrollCalculator::new(&config).rrsp_deduction_limit(dec!(50000), dec!(5000), dec!(0)),
            dec!(14000)
        );
    }

    #[test]
    fn rrsp_deduction_limit_subtracts_pension_adjustment() {
        let config = config_fixture();
        let payroll = PayrollCalculator::new(&config);

        assert_eq!(payroll.rrsp_deduction_limit(dec!(50000), dec!(0), dec!(3000)), dec!(6000));
        assert_eq!(payroll.rrsp_deduction_limit(dec!(50000), dec!(0), dec!(15000)), dec!(0));
    }

    #[test]
    fn rrsp_carryforward_of_unused_room() {
        assert_eq!(rrsp_carryforward(dec!(14000), dec!(10000)), dec!(4000));
        assert_eq!(rrsp_carryforward(dec!(14000), dec!(20000)), dec!(0));
    }

    #[test]
    fn taxable_income_after_rrsp_deduction() {
        assert_eq!(taxable_income_after_rrsp(dec!(75000), dec!(9000)), dec!(66000));
        assert_eq!(taxable_income_after_rrsp(dec!(5000), dec!(9000)), dec!(0));
    }
}
