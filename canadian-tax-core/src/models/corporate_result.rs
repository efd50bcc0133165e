use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Corporate (T2) tax for a Canadian-controlled private corporation.
///
/// `sbd_tax` is charged only on `min(active_business_income, sbd_limit)` and
/// `general_rate_tax` only on the remainder;
/// `total_tax = sbd_tax + general_rate_tax + provincial_tax + investment_tax`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CcpcTaxResult {
    pub active_business_income: Decimal,
    pub investment_income: Decimal,

    /// Business limit after the passive income grind.
    pub sbd_limit: Decimal,
    pub sbd_income: Decimal,
    pub sbd_tax: Decimal,
    pub general_rate_income: Decimal,
    pub general_rate_tax: Decimal,
    pub provincial_tax: Decimal,
    pub investment_tax: Decimal,
    pub total_tax: Decimal,
    pub effective_rate: Decimal,
}

/// One year of a corporation's refundable dividend tax on hand.
///
/// `closing_balance = opening_balance + addition - refund` and the refund
/// never exceeds the opening balance, so the closing balance is never
/// negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RdtohAccount {
    pub opening_balance: Decimal,
    pub addition: Decimal,
    pub refund: Decimal,
    pub closing_balance: Decimal,
}
