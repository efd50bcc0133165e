use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Personal (T1) tax for one taxpayer, after basic personal amount credits.
///
/// All amounts are non-negative and `total_tax == federal_tax + provincial_tax`.
/// `effective_rate` is zero when taxable income is not positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub federal_tax: Decimal,
    pub provincial_tax: Decimal,
    pub total_tax: Decimal,
    pub effective_rate: Decimal,
    pub marginal_rate: Decimal,
}
