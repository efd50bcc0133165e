//! Progressive bracket tax.

use rust_decimal::Decimal;

use crate::TaxBracket;
use crate::calculations::common::{min, round_half_up};

/// Tax owing on `income` under a progressive schedule, rounded to cents.
///
/// Each bracket taxes the slice of income between the previous limit and its
/// own limit. Income at or below zero owes nothing.
///
/// `brackets` must already satisfy the [`crate::BracketSchedule`]
/// invariants; they are not checked here.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use canadian_tax_core::calculations::progressive_tax;
/// use canadian_tax_core::rules::canada_2025;
///
/// let tax = progressive_tax(dec!(75000), &canada_2025::federal_brackets());
/// assert_eq!(tax, dec!(12302.32));
/// ```
pub fn progressive_tax(
    income: Decimal,
    brackets: &[TaxBracket],
) -> Decimal {
    if income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut tax = Decimal::ZERO;
    let mut previous_limit = Decimal::ZERO;

    for bracket in brackets {
        let ceiling = match bracket.upper_limit {
            Some(limit) => min(income, limit),
            None => income,
        };
        let slice = ceiling - previous_limit;
        if slice > Decimal::ZERO {
            tax += slice * bracket.rate;
        }

        match bracket.upper_limit {
            Some(limit) if income > limit => previous_limit = limit,
            _ => break,
        }
    }

    round_half_up(tax)
}

/// Rate of the bracket containing `income`: the first bracket whose limit is
/// at or above it, or the unbounded top bracket.
///
/// Returns zero for an empty slice.
pub fn bracket_rate(
    income: Decimal,
    brackets: &[TaxBracket],
) -> Decimal {
    brackets
        .iter()
        .find(|bracket| bracket.upper_limit.is_none_or(|limit| income <= limit))
        .map(|bracket| bracket.rate)
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::rules::canada_2025::{federal_brackets, ontario_brackets};

    // =========================================================================
    // progressive_tax tests
    // =========================================================================

    #[test]
    fn zero_income_owes_nothing() {
        assert_eq!(progressive_tax(dec!(0), &federal_brackets()), dec!(0));
    }

    #[test]
    fn negative_income_owes_nothing() {
        assert_eq!(progressive_tax(dec!(-5000), &federal_brackets()), dec!(0));
    }

    #[test]
    fn first_bracket_only() {
        assert_eq!(progressive_tax(dec!(50000), &federal_brackets()), dec!(7500));
    }

    #[test]
    fn federal_tax_at_75000() {
        // 55867 × 0.15 = 8380.05, 19133 × 0.205 = 3922.265
        assert_eq!(progressive_tax(dec!(75000), &federal_brackets()), dec!(12302.32));
    }

    #[test]
    fn federal_tax_at_100000_rounds_half_up() {
        assert_eq!(progressive_tax(dec!(100000), &federal_brackets()), dec!(17427.32));
    }

    #[test]
    fn federal_tax_in_fourth_bracket() {
        // 8380.05 + 11452.53 + 15982.72 + 7770.55
        assert_eq!(progressive_tax(dec!(200000), &federal_brackets()), dec!(43585.85));
    }

    #[test]
    fn federal_tax_in_top_bracket() {
        // 8380.05 + 11452.53 + 15982.72 + 21328.63 + 53248 × 0.33
        assert_eq!(progressive_tax(dec!(300000), &federal_brackets()), dec!(74715.77));
    }

    #[test]
    fn ontario_tax_at_75000() {
        // 51446 × 0.0505 = 2598.023, 23554 × 0.0915 = 2155.191
        assert_eq!(progressive_tax(dec!(75000), &ontario_brackets()), dec!(4753.21));
    }

    #[test]
    fn ontario_tax_at_upper_limit_of_third_bracket() {
        // 2598.023 + 4707.492 + 5257.0368
        assert_eq!(progressive_tax(dec!(150000), &ontario_brackets()), dec!(12562.54));
    }

    #[test]
    fn tax_at_exact_limit_uses_only_lower_brackets() {
        assert_eq!(progressive_tax(dec!(55867), &federal_brackets()), dec!(8380.05));
    }

    #[test]
    fn single_unbounded_bracket_is_flat() {
        let brackets = [TaxBracket::unbounded(dec!(0.10))];

        assert_eq!(progressive_tax(dec!(12345.67), &brackets), dec!(1234.57));
    }

    // =========================================================================
    // bracket_rate tests
    // =========================================================================

    #[test]
    fn bracket_rate_in_first_bracket() {
        assert_eq!(bracket_rate(dec!(30000), &federal_brackets()), dec!(0.15));
    }

    #[test]
    fn bracket_rate_at_limit_uses_lower_bracket() {
        assert_eq!(bracket_rate(dec!(55867), &federal_brackets()), dec!(0.15));
    }

    #[test]
    fn bracket_rate_above_limit_uses_next_bracket() {
        assert_eq!(bracket_rate(dec!(55868), &federal_brackets()), dec!(0.205));
    }

    #[test]
    fn bracket_rate_above_all_limits_uses_top_bracket() {
        assert_eq!(bracket_rate(dec!(1000000), &ontario_brackets()), dec!(0.1316));
    }

    #[test]
    fn bracket_rate_of_empty_schedule_is_zero() {
        assert_eq!(bracket_rate(dec!(1000), &[]), dec!(0));
    }
}
