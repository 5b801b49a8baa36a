//! Money rounding.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a peso amount to centavos, with halves rounded away from zero.
///
/// # Examples
///
/// ```
/// use motorph_payroll::calculation::round_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_money(Decimal::new(83335, 3)), Decimal::new(8334, 2)); // 83.335
/// assert_eq!(round_money(Decimal::new(-83335, 3)), Decimal::new(-8334, 2));
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
