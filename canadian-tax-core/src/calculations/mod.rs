//! Tax calculators.
//!
//! Each calculator borrows the part of a year's rules it needs and exposes
//! the individual formulas as well as a combined `calculate`. Data flows one
//! way: bracket schedules feed [`progressive_tax`], which feeds the personal
//! and corporate calculators, which feed the [`CompensationOptimizer`].

mod cca;
pub mod common;
mod corporate;
mod credits;
mod optimizer;
mod payroll;
mod personal;
mod progressive;
mod rdtoh;

pub use cca::{CcaTreatment, capital_cost_allowance};
pub use corporate::{CcpcTaxCalculator, SmallBusinessDeduction};
pub use credits::{CreditCalculator, DividendTaxCredit, DividendType};
pub use optimizer::{CompensationOptimizer, CompensationScenario, CompensationStrategy};
pub use payroll::{CppContribution, PayrollCalculator, rrsp_carryforward, taxable_income_after_rrsp};
pub use personal::PersonalTaxCalculator;
pub use progressive::{bracket_rate, progressive_tax};
pub use rdtoh::{RdtohActivity, RdtohLedger};
