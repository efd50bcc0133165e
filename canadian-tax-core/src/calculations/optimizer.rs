//! Salary versus dividend compensation from a CCPC.
//!
//! Each scenario splits a total compensation amount into salary and a
//! non-eligible dividend, then adds up:
//!
//! | Component | Source |
//! |-----------|--------|
//! | Corporate tax | CCPC tax on the dividend portion (salary is deductible) |
//! | Personal tax | Tax on salary plus the grossed-up net dividend, less the dividend credit |
//! | CPP | Employee contribution on salary |
//!
//! Salary also earns RRSP room; dividends earn none.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{clamp_input, max, min, rate_of};
use crate::calculations::{
    CcpcTaxCalculator, CreditCalculator, DividendType, PayrollCalculator, PersonalTaxCalculator,
};
use crate::{Province, TaxError, TaxYearRules};

/// How total compensation is split between salary and dividends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CompensationStrategy {
    AllSalary,
    AllDividend,
    /// Salary up to the CPP maximum pensionable earnings, dividends above.
    BalancedToCppMax,
}

impl CompensationStrategy {
    pub const ALL: [CompensationStrategy; 3] =
        [Self::AllSalary, Self::AllDividend, Self::BalancedToCppMax];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllSalary => "all-salary",
            Self::AllDividend => "all-dividend",
            Self::BalancedToCppMax => "balanced-to-cpp-max",
        }
    }
}

impl fmt::Display for CompensationStrategy {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompensationStrategy {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| TaxError::UnknownStrategy(s.to_string()))
    }
}

impl TryFrom<String> for CompensationStrategy {
    type Error = TaxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CompensationStrategy> for String {
    fn from(strategy: CompensationStrategy) -> Self {
        strategy.as_str().to_string()
    }
}

/// Tax outcome of one compensation split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationScenario {
    pub strategy: CompensationStrategy,
    pub salary: Decimal,
    pub dividend: Decimal,
    pub corporate_tax: Decimal,
    pub personal_tax: Decimal,

    /// Employee CPP contribution on the salary.
    pub cpp_contributions: Decimal,
    pub total_tax: Decimal,
    pub effective_rate: Decimal,
    pub rrsp_room: Decimal,
}

/// Compares compensation strategies under one year's rules.
#[derive(Debug, Clone, Copy)]
pub struct CompensationOptimizer<'a> {
    rules: &'a TaxYearRules,
}

impl<'a> CompensationOptimizer<'a> {
    pub fn new(rules: &'a TaxYearRules) -> Self {
        Self { rules }
    }

    /// Splits `total` into `(salary, dividend)` for a strategy.
    pub fn split(
        &self,
        total: Decimal,
        strategy: CompensationStrategy,
    ) -> (Decimal, Decimal) {
        let total = clamp_input("total_compensation", total);

        match strategy {
            CompensationStrategy::AllSalary => (total, Decimal::ZERO),
            CompensationStrategy::AllDividend => (Decimal::ZERO, total),
            CompensationStrategy::BalancedToCppMax => {
                let salary = min(total, self.rules.config().payroll.cpp_max_pensionable_earnings);
                (salary, total - salary)
            }
        }
    }

    /// Evaluates the scenario for the requested strategy.
    ///
    /// # Errors
    ///
    /// [`TaxError::UnsupportedJurisdiction`] when the province has no
    /// personal bracket schedule or dividend credit rates.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use canadian_tax_core::calculations::{CompensationOptimizer, CompensationStrategy};
    /// use canadian_tax_core::{Province, TaxRules};
    ///
    /// let rules = TaxRules::canada().unwrap();
    /// let optimizer = CompensationOptimizer::new(rules.year(2025).unwrap());
    /// let scenario = optimizer
    ///     .optimize(dec!(100000), CompensationStrategy::BalancedToCppMax, Province::Ontario)
    ///     .unwrap();
    ///
    /// assert_eq!(scenario.salary, dec!(68500));
    /// assert_eq!(scenario.dividend, dec!(31500));
    /// assert_eq!(scenario.rrsp_room, dec!(12330));
    /// ```
    pub fn optimize(
        &self,
        total: Decimal,
        strategy: CompensationStrategy,
        province: Province,
    ) -> Result<CompensationScenario, TaxError> {
        let (salary, dividend) = self.split(total, strategy);
        self.evaluate(strategy, salary, dividend, province)
    }

    /// Evaluates every strategy, in [`CompensationStrategy::ALL`] order.
    ///
    /// # Errors
    ///
    /// See [`CompensationOptimizer::optimize`].
    pub fn compare(
        &self,
        total: Decimal,
        province: Province,
    ) -> Result<Vec<CompensationScenario>, TaxError> {
        CompensationStrategy::ALL
            .into_iter()
            .map(|strategy| self.optimize(total, strategy, province))
            .collect()
    }

    /// The strategy with the lowest total tax. Ties go to the earlier
    /// strategy in [`CompensationStrategy::ALL`].
    ///
    /// # Errors
    ///
    /// See [`CompensationOptimizer::optimize`].
    pub fn recommend(
        &self,
        total: Decimal,
        province: Province,
    ) -> Result<CompensationScenario, TaxError> {
        let mut best = self.optimize(total, CompensationStrategy::ALL[0], province)?;
        for strategy in &CompensationStrategy::ALL[1..] {
            let scenario = self.optimize(total, *strategy, province)?;
            if scenario.total_tax < best.total_tax {
                best = scenario;
            }
        }

        Ok(best)
    }

    fn evaluate(
        &self,
        strategy: CompensationStrategy,
        salary: Decimal,
        dividend: Decimal,
        province: Province,
    ) -> Result<CompensationScenario, TaxError> {
        let config = self.rules.config();
        let payroll = PayrollCalculator::new(&config.payroll);

        let corporate_tax = CcpcTaxCalculator::new(&config.corporate)
            .calculate(dividend, Decimal::ZERO, province.as_str())
            .total_tax;
        let net_dividend = max(dividend - corporate_tax, Decimal::ZERO);

        let credit = CreditCalculator::new(self.rules).dividend_tax_credit(
            net_dividend,
            DividendType::NonEligible,
            province,
        )?;
        let personal = PersonalTaxCalculator::new(self.rules.table())
            .calculate(salary + credit.grossed_up_amount, province)?;
        let personal_tax = max(personal.total_tax - credit.total_credit, Decimal::ZERO);

        let cpp_contributions = payroll.cpp_contribution(salary).employee;
        let total_tax = corporate_tax + personal_tax + cpp_contributions;

        debug!(
            %strategy,
            salary = %salary,
            dividend = %dividend,
            total_tax = %total_tax,
            "evaluated compensation scenario"
        );

        Ok(CompensationScenario {
            strategy,
            salary,
            dividend,
            corporate_tax,
            personal_tax,
            cpp_contributions,
            total_tax,
            effective_rate: rate_of(total_tax, salary + dividend),
            rrsp_room: payroll.rrsp_room_earned(salary),
        })
    }
}
