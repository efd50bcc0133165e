use thiserror::Error;

/// Errors raised by rule-table construction and tax calculations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxError {
    /// No bracket schedule (or rate table) is registered for the jurisdiction
    /// in the requested tax year.
    #[error("jurisdiction '{jurisdiction}' is not supported for tax year {tax_year}")]
    UnsupportedJurisdiction { jurisdiction: String, tax_year: i32 },

    /// No rules are registered for the requested tax year.
    #[error("tax year {0} is not supported")]
    UnsupportedTaxYear(i32),

    /// The string is not a Canadian jurisdiction code at all.
    #[error("unknown jurisdiction code '{0}'")]
    UnknownJurisdictionCode(String),

    /// A bracket schedule failed validation while the rules were being built.
    #[error("invalid bracket schedule for {jurisdiction}: {reason}")]
    InvalidBracketSchedule { jurisdiction: String, reason: String },

    /// A per-year parameter is outside its valid range.
    #[error("invalid configuration for {field}: {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// The compensation strategy tag is not recognized.
    #[error("unknown compensation strategy '{0}'")]
    UnknownStrategy(String),
}

impl TaxError {
    pub(crate) fn invalid_config(
        field: &str,
        reason: impl Into<String>,
    ) -> Self {
        TaxError::InvalidConfiguration {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
