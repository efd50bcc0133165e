use std::ops::Deref;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Jurisdiction, TaxError};

/// One slice of a progressive schedule.
///
/// `upper_limit` is the exclusive ceiling of the slice; `None` marks the
/// unbounded top bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub upper_limit: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn bounded(
        upper_limit: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            upper_limit: Some(upper_limit),
            rate,
        }
    }

    pub fn unbounded(rate: Decimal) -> Self {
        Self {
            upper_limit: None,
            rate,
        }
    }
}

/// A validated progressive schedule for one jurisdiction.
///
/// Construction enforces the schedule invariants, so every
/// `BracketSchedule` in a rule table is safe to feed to
/// [`crate::calculations::progressive_tax`]:
///
/// - at least one bracket
/// - finite limits positive and strictly ascending
/// - exactly the last bracket unbounded
/// - rates non-negative
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketSchedule {
    jurisdiction: Jurisdiction,
    brackets: Vec<TaxBracket>,
}

impl BracketSchedule {
    /// # Errors
    ///
    /// Returns [`TaxError::InvalidBracketSchedule`] when any invariant fails.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use canadian_tax_core::{BracketSchedule, Jurisdiction, TaxBracket};
    ///
    /// let schedule = BracketSchedule::new(
    ///     Jurisdiction::Federal,
    ///     vec![
    ///         TaxBracket::bounded(dec!(50000), dec!(0.15)),
    ///         TaxBracket::unbounded(dec!(0.20)),
    ///     ],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(schedule.first_rate(), dec!(0.15));
    /// assert_eq!(schedule.len(), 2);
    /// ```
    pub fn new(
        jurisdiction: Jurisdiction,
        brackets: Vec<TaxBracket>,
    ) -> Result<Self, TaxError> {
        let invalid = |reason: String| TaxError::InvalidBracketSchedule {
            jurisdiction: jurisdiction.to_string(),
            reason,
        };

        if brackets.is_empty() {
            return Err(invalid("schedule has no brackets".to_string()));
        }

        let last = brackets.len() - 1;
        let mut previous_limit = Decimal::ZERO;

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO {
                return Err(invalid(format!(
                    "bracket {index} has negative rate {}",
                    bracket.rate
                )));
            }

            match bracket.upper_limit {
                None if index != last => {
                    return Err(invalid(format!(
                        "bracket {index} is unbounded but is not the top bracket"
                    )));
                }
                None => {}
                Some(_) if index == last => {
                    return Err(invalid("top bracket must be unbounded".to_string()));
                }
                Some(limit) if limit <= previous_limit => {
                    return Err(invalid(format!(
                        "bracket {index} limit {limit} does not exceed previous limit {previous_limit}"
                    )));
                }
                Some(limit) => previous_limit = limit,
            }
        }

        Ok(Self {
            jurisdiction,
            brackets,
        })
    }

    pub fn jurisdiction(&self) -> Jurisdiction {
        self.jurisdiction
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Rate of the lowest bracket, used for non-refundable credits.
    pub fn first_rate(&self) -> Decimal {
        self.brackets[0].rate
    }
}

impl Deref for BracketSchedule {
    type Target = [TaxBracket];

    fn deref(&self) -> &Self::Target {
        &self.brackets
    }
}
