//! String-keyed facade over the calculators.
//!
//! Callers outside the crate hold province codes and tax years as plain
//! values. [`TaxEngine`] resolves them against a [`TaxRules`] registry and
//! dispatches to the matching calculator.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::{
    CcaTreatment, CcpcTaxCalculator, CompensationOptimizer, CompensationScenario,
    CompensationStrategy, CppContribution, CreditCalculator, DividendTaxCredit, DividendType,
    PayrollCalculator, PersonalTaxCalculator, RdtohActivity, RdtohLedger, SmallBusinessDeduction,
    capital_cost_allowance,
};
use crate::{CcpcTaxResult, Province, RdtohAccount, TaxError, TaxResult, TaxRules, TaxYearRules};

/// Entry point for every tax calculation, keyed by tax year.
#[derive(Debug, Clone, Copy)]
pub struct TaxEngine<'a> {
    rules: &'a TaxRules,
}

impl<'a> TaxEngine<'a> {
    pub fn new(rules: &'a TaxRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'a TaxRules {
        self.rules
    }

    // ---------------------------------------------------------------------
    // Personal
    // ---------------------------------------------------------------------

    /// # Errors
    ///
    /// [`TaxError::UnsupportedTaxYear`] for an unregistered year.
    pub fn federal_tax(
        &self,
        income: Decimal,
        tax_year: i32,
    ) -> Result<Decimal, TaxError> {
        let rules = self.year(tax_year)?;
        Ok(PersonalTaxCalculator::new(rules.table()).federal_tax(income))
    }

    /// # Errors
    ///
    /// - [`TaxError::UnsupportedTaxYear`] for an unregistered year.
    /// - [`TaxError::UnsupportedJurisdiction`] for a province code with no
    ///   schedule that year, including codes that are not provinces at all.
    pub fn provincial_tax(
        &self,
        income: Decimal,
        province: &str,
        tax_year: i32,
    ) -> Result<Decimal, TaxError> {
        let rules = self.year(tax_year)?;
        let province = resolve_province(province, tax_year)?;
        PersonalTaxCalculator::new(rules.table()).provincial_tax(income, province)
    }

    /// # Errors
    ///
    /// As for [`TaxEngine::provincial_tax`].
    pub fn marginal_rate(
        &self,
        income: Decimal,
        province: &str,
        tax_year: i32,
    ) -> Result<Decimal, TaxError> {
        let rules = self.year(tax_year)?;
        let province = resolve_province(province, tax_year)?;
        PersonalTaxCalculator::new(rules.table()).marginal_rate(income, province)
    }

    /// # Errors
    ///
    /// As for [`TaxEngine::provincial_tax`].
    pub fn calculate_personal_tax(
        &self,
        taxable_income: Decimal,
        province: &str,
        tax_year: i32,
    ) -> Result<TaxResult, TaxError> {
        let rules = self.year(tax_year)?;
        let province = resolve_province(province, tax_year)?;
        PersonalTaxCalculator::new(rules.table()).calculate(taxable_income, province)
    }

    // ---------------------------------------------------------------------
    // Credits
    // ---------------------------------------------------------------------

    /// # Errors
    ///
    /// As for [`TaxEngine::provincial_tax`].
    pub fn basic_personal_credit(
        &self,
        province: &str,
        tax_year: i32,
    ) -> Result<Decimal, TaxError> {
        let rules = self.year(tax_year)?;
        let province = resolve_province(province, tax_year)?;
        CreditCalculator::new(rules).basic_personal_credit(province)
    }

    /// # Errors
    ///
    /// [`TaxError::UnsupportedTaxYear`] for an unregistered year.
    pub fn medical_expense_credit(
        &self,
        expenses: Decimal,
        net_income: Decimal,
        tax_year: i32,
    ) -> Result<Decimal, TaxError> {
        let rules = self.year(tax_year)?;
        Ok(CreditCalculator::new(rules).medical_expense_credit(expenses, net_income))
    }

    /// # Errors
    ///
    /// [`TaxError::UnsupportedTaxYear`] for an unregistered year.
    pub fn charitable_donation_credit(
        &self,
        donations: Decimal,
        first_time_donor: bool,
        tax_year: i32,
    ) -> Result<Decimal, TaxError> {
        let rules = self.year(tax_year)?;
        Ok(CreditCalculator::new(rules).charitable_donation_credit(donations, first_time_donor))
    }

    /// # Errors
    ///
    /// As for [`TaxEngine::provincial_tax`], where "schedule" means dividend
    /// credit rates.
    pub fn dividend_tax_credit(
        &self,
        amount: Decimal,
        dividend_type: DividendType,
        province: &str,
        tax_year: i32,
    ) -> Result<DividendTaxCredit, TaxError> {
        let rules = self.year(tax_year)?;
        let province = resolve_province(province, tax_year)?;
        CreditCalculator::new(rules).dividend_tax_credit(amount, dividend_type, province)
    }

    // ---------------------------------------------------------------------
    // Corporate
    // ---------------------------------------------------------------------

    /// # Errors
    ///
    /// [`TaxError::UnsupportedTaxYear`] for an unregistered year.
    pub fn small_business_deduction(
        &self,
        active_business_income: Decimal,
        tax_year: i32,
    ) -> Result<SmallBusinessDeduction, TaxError> {
        let rules = self.year(tax_year)?;
        Ok(CcpcTaxCalculator::new(&rules.config().corporate)
            .small_business_deduction(active_business_income))
    }

    /// CCPC tax. An unknown province takes the fallback corporate rate
    /// rather than failing.
    ///
    /// # Errors
    ///
    /// [`TaxError::UnsupportedTaxYear`] for an unregistered year.
    pub fn calculate_ccpc_tax(
        &self,
        active_business_income: Decimal,
        investment_income: Decimal,
        province: &str,
        tax_year: i32,
    ) -> Result<CcpcTaxResult, TaxError> {
        let rules = self.year(tax_year)?;
        Ok(CcpcTaxCalculator::new(&rules.config().corporate).calculate(
            active_business_income,
            investment_income,
            province,
        ))
    }

    /// # Errors
    ///
    /// [`TaxError::UnsupportedTaxYear`] for an unregistered year.
    pub fn rdtoh_addition(
        &self,
        investment_income: Decimal,
        tax_year: i32,
    ) -> Result<Decimal, TaxError> {
        let rules = self.year(tax_year)?;
        Ok(RdtohLedger::new(&rules.config().corporate).addition(investment_income))
    }

    /// # Errors
    ///
    /// [`TaxError::UnsupportedTaxYear`] for an unregistered year.
    pub fn rdtoh_refund(
        &self,
        opening_balance: Decimal,
        dividends_paid: Decimal,
        tax_year: i32,
    ) -> Result<Decimal, TaxError> {
        let rules = self.year(tax_year)?;
        Ok(RdtohLedger::new(&rules.config().corporate).refund(opening_balance, dividends_paid))
    }

    /// Rolls RDTOH forward across consecutive years starting at
    /// `first_year`, using each year's own rates.
    ///
    /// # Errors
    ///
    /// [`TaxError::UnsupportedTaxYear`] if any year in the range is
    /// unregistered.
    pub fn rdtoh_ledger(
        &self,
        opening_balance: Decimal,
        first_year: i32,
        years: &[RdtohActivity],
    ) -> Result<Vec<RdtohAccount>, TaxError> {
        let mut balance = opening_balance;
        let mut accounts = Vec::with_capacity(years.len());

        for (tax_year, activity) in (first_year..).zip(years) {
            let rules = self.year(tax_year)?;
            let account = RdtohLedger::new(&rules.config().corporate).roll_forward(
                balance,
                activity.investment_income,
                activity.dividends_paid,
            );
            balance = account.closing_balance;
            accounts.push(account);
        }

        debug!(
            first_year,
            years = accounts.len(),
            closing_balance = %balance,
            "rolled RDTOH forward"
        );
        Ok(accounts)
    }

    /// # Errors
    ///
    /// [`TaxError::UnsupportedTaxYear`] for an unregistered year.
    pub fn capital_cost_allowance(
        &self,
        amount: Decimal,
        rate: Decimal,
        treatment: CcaTreatment,
        tax_year: i32,
    ) -> Result<Decimal, TaxError> {
        let rules = self.year(tax_year)?;
        Ok(capital_cost_allowance(&rules.config().cca, amount, rate, treatment))
    }

    // ---------------------------------------------------------------------
    // Payroll
    // ---------------------------------------------------------------------

    /// # Errors
    ///
    /// [`TaxError::UnsupportedTaxYear`] for an unregistered year.
    pub fn cpp_contribution(
        &self,
        salary: Decimal,
        tax_year: i32,
    ) -> Result<CppContribution, TaxError> {
        let rules = self.year(tax_year)?;
        Ok(PayrollCalculator::new(&rules.config().payroll).cpp_contribution(salary))
    }

    /// # Errors
    ///
    /// [`TaxError::UnsupportedTaxYear`] for an unregistered year.
    pub fn rrsp_deduction_limit(
        &self,
        earned_income: Decimal,
        unused_room: Decimal,
        pension_adjustment: Decimal,
        tax_year: i32,
    ) -> Result<Decimal, TaxError> {
        let rules = self.year(tax_year)?;
        Ok(PayrollCalculator::new(&rules.config().payroll).rrsp_deduction_limit(
            earned_income,
            unused_room,
            pension_adjustment,
        ))
    }

    // ---------------------------------------------------------------------
    // Compensation
    // ---------------------------------------------------------------------

    /// Evaluates one compensation strategy, given by its tag.
    ///
    /// # Errors
    ///
    /// - [`TaxError::UnknownStrategy`] for an unrecognized tag.
    /// - As for [`TaxEngine::provincial_tax`] otherwise.
    pub fn optimize_compensation(
        &self,
        total_compensation: Decimal,
        strategy: &str,
        province: &str,
        tax_year: i32,
    ) -> Result<CompensationScenario, TaxError> {
        let strategy: CompensationStrategy = strategy.parse()?;
        let rules = self.year(tax_year)?;
        let province = resolve_province(province, tax_year)?;
        CompensationOptimizer::new(rules).optimize(total_compensation, strategy, province)
    }

    /// Evaluates every compensation strategy.
    ///
    /// # Errors
    ///
    /// As for [`TaxEngine::provincial_tax`].
    pub fn compare_compensation(
        &self,
        total_compensation: Decimal,
        province: &str,
        tax_year: i32,
    ) -> Result<Vec<CompensationScenario>, TaxError> {
        let rules = self.year(tax_year)?;
        let province = resolve_province(province, tax_year)?;
        CompensationOptimizer::new(rules).compare(total_compensation, province)
    }

    /// The compensation strategy with the lowest total tax.
    ///
    /// # Errors
    ///
    /// As for [`TaxEngine::provincial_tax`].
    pub fn recommend_compensation(
        &self,
        total_compensation: Decimal,
        province: &str,
        tax_year: i32,
    ) -> Result<CompensationScenario, TaxError> {
        let rules = self.year(tax_year)?;
        let province = resolve_province(province, tax_year)?;
        CompensationOptimizer::new(rules).recommend(total_compensation, province)
    }

    fn year(
        &self,
        tax_year: i32,
    ) -> Result<&'a TaxYearRules, TaxError> {
        self.rules.year(tax_year)
    }
}

/// Parses a province code, reporting a code that is not a province the
/// same way as a province without rules.
fn resolve_province(
    code: &str,
    tax_year: i32,
) -> Result<Province, TaxError> {
    Province::parse(code).ok_or_else(|| TaxError::UnsupportedJurisdiction {
        jurisdiction: code.to_string(),
        tax_year,
    })
}
