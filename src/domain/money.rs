use rust_decimal::{Decimal, RoundingStrategy};

/// Quantizes a monetary amount to 2 decimal places, rounding half up.
///
/// All amounts stored on payments, payouts and ledger entries go through
/// this helper so that fee arithmetic never drifts at the cent level.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Quantizes a fee rate to 4 decimal places, rounding half up.
pub fn round_rate(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(dec!(1.005)), dec!(1.01));
        assert_eq!(round_money(dec!(1.004)), dec!(1.00));
        assert_eq!(round_money(dec!(111.111)), dec!(111.11));
        assert_eq!(round_money(dec!(111.115)), dec!(111.12));
    }

    #[test]
    fn test_round_money_preserves_whole_amounts() {
        assert_eq!(round_money(dec!(15000)), dec!(15000));
        assert_eq!(round_money(dec!(13500.00)), dec!(13500));
    }

    #[test]
    fn test_round_rate_half_up() {
        assert_eq!(round_rate(dec!(0.12345)), dec!(0.1235));
        assert_eq!(round_rate(dec!(0.12344)), dec!(0.1234));
        assert_eq!(round_rate(dec!(0.1)), dec!(0.1));
    }
}
