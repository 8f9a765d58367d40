//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for monetary values that give
//! more meaningful error messages than standard assertions.

use core_kernel::Money;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: Money, expected: Money, tolerance: Decimal) {
    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual,
        expected,
        diff,
        tolerance
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: Money) {
    assert!(money.is_zero(), "Expected zero money, got {}", money);
}

/// Asserts that a charged amount obeys the rounding policy: a non-negative
/// multiple of 10, never less than the final amount it was rounded from
pub fn assert_charged_amount(charged: Money, final_amount: Money) {
    assert!(
        !charged.is_negative(),
        "Charged amount must be non-negative, got {}",
        charged
    );
    assert!(
        charged >= final_amount,
        "Charged amount {} is below final amount {}",
        charged,
        final_amount
    );
    assert_eq!(
        charged.amount() % dec!(10),
        Decimal::ZERO,
        "Charged amount {} is not a multiple of 10",
        charged
    );
}

/// Asserts that money values sum to a total
pub fn assert_money_sums_to(parts: &[Money], total: Money) {
    let sum: Money = parts.iter().copied().sum();
    assert_eq!(
        sum, total,
        "Parts sum to {} but expected {}",
        sum, total
    );
}
