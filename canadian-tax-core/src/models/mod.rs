mod corporate_result;
mod jurisdiction;
mod tax_bracket;
mod tax_result;
mod tax_table;
mod tax_year_config;

pub use corporate_result::{CcpcTaxResult, RdtohAccount};
pub use jurisdiction::{Jurisdiction, Province};
pub use tax_bracket::{BracketSchedule, TaxBracket};
pub use tax_result::TaxResult;
pub use tax_table::JurisdictionTaxTable;
pub use tax_year_config::{
    CcaConfig, CorporateConfig, DividendConfig, PayrollConfig, PersonalCreditConfig,
    ProvincialDividendCreditRates, TaxYearConfig,
};
