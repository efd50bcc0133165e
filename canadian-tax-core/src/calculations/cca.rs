//! Capital cost allowance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::CcaConfig;
use crate::calculations::common::{clamp_input, min};

/// Which first-year adjustment applies to a CCA claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CcaTreatment {
    /// First year, half-year rule.
    HalfYear,
    /// First year, accelerated investment incentive.
    AcceleratedInvestment,
    /// Any later year.
    FullYear,
}

/// CCA claim on `amount` of undepreciated capital cost at the class `rate`.
///
/// A rate above 100% is treated as 100%.
///
/// ```
/// use rust_decimal_macros::dec;
/// use canadian_tax_core::calculations::{capital_cost_allowance, CcaTreatment};
/// use canadian_tax_core::rules::canada_2025;
///
/// let cca = canada_2025::config().cca;
/// let claim = capital_cost_allowance(&cca, dec!(50000), dec!(0.30), CcaTreatment::HalfYear);
///
/// assert_eq!(claim, dec!(7500));
/// ```
pub fn capital_cost_allowance(
    config: &CcaConfig,
    amount: Decimal,
    rate: Decimal,
    treatment: CcaTreatment,
) -> Decimal {
    let factor = match treatment {
        CcaTreatment::HalfYear => config.half_year_factor,
        CcaTreatment::AcceleratedInvestment => config.accelerated_investment_factor,
        CcaTreatment::FullYear => Decimal::ONE,
    };

    clamp_input("capital_cost", amount) * min(clamp_input("cca_rate", rate), Decimal::ONE) * factor
}
