//! Money with precise decimal arithmetic
//!
//! Amounts are plain decimal values in the building's single billing currency.
//! The charging rule of the house is carried here: what a unit is actually
//! asked to pay is the computed amount rounded *up* to the nearest 10.
//!
//! Monetary inputs arrive from forms and imports as numbers or strings with
//! thousands separators; [`Money::parse_lenient`] and the [`lenient`] serde
//! helper turn anything non-parseable into zero. That permissiveness is
//! deliberate policy, not an error path.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use thiserror::Error;

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Division by zero")]
    DivisionByZero,
}

/// A monetary amount
///
/// Money wraps `rust_decimal::Decimal` for precise arithmetic without
/// floating-point errors. Intermediate allocation shares keep their full
/// precision; rounding happens only at the charging boundary.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Creates Money from a whole number of currency units
    pub fn from_i64(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// Creates a zero amount
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Parses a monetary amount leniently
    ///
    /// Thousands separators are stripped; blank or unparseable input yields
    /// zero rather than an error.
    pub fn parse_lenient(input: &str) -> Self {
        let cleaned = input.trim().replace(',', "");
        if cleaned.is_empty() {
            return Self::zero();
        }
        cleaned.parse::<Decimal>().map(Self).unwrap_or_default()
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Clamps a negative amount to zero
    ///
    /// Applied to final per-unit amounts: discounts may not push a charge
    /// below zero.
    pub fn floor_at_zero(&self) -> Self {
        if self.is_negative() {
            Self::zero()
        } else {
            *self
        }
    }

    /// Rounds up to the nearest increment of 10
    ///
    /// This is the charged amount a unit is actually asked to pay.
    pub fn round_up_to_ten(&self) -> Self {
        Self((self.0 / dec!(10)).ceil() * dec!(10))
    }

    /// Multiplies by a scalar
    pub fn multiply(&self, factor: Decimal) -> Self {
        Self(self.0 * factor)
    }

    /// Divides by a scalar
    pub fn divide(&self, divisor: Decimal) -> Result<Self, MoneyError> {
        if divisor.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        Ok(Self(self.0 / divisor))
    }

    /// Returns this amount scaled by `numerator / denominator`
    ///
    /// The proportional-share primitive used by the allocation engines.
    pub fn prorate(&self, numerator: Decimal, denominator: Decimal) -> Result<Self, MoneyError> {
        if denominator.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        Ok(Self(self.0 * numerator / denominator))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let normalized = self.0.normalize();
        let raw = normalized.to_string();
        let (sign, rest) = match raw.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", raw.as_str()),
        };
        let (int_part, frac_part) = match rest.split_once('.') {
            Some((i, fr)) => (i, Some(fr)),
            None => (rest, None),
        };

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, c) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }

        match frac_part {
            Some(fr) => write!(f, "{}{}.{}", sign, grouped, fr),
            None => write!(f, "{}{}", sign, grouped),
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, factor: Decimal) -> Self {
        self.multiply(factor)
    }
}

impl Div<Decimal> for Money {
    type Output = Self;

    fn div(self, divisor: Decimal) -> Self {
        self.divide(divisor).expect("Division by zero in Money::div")
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// Serde helper for lenient monetary fields
///
/// Use with `#[serde(default, with = "core_kernel::money::lenient")]` on
/// request fields that accept numeric or string forms.
pub mod lenient {
    use super::Money;
    use rust_decimal::prelude::FromPrimitive;
    use rust_decimal::Decimal;
    use serde::de::{self, Deserializer, Visitor};
    use serde::{Serialize, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        money.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        struct LenientVisitor;

        impl<'de> Visitor<'de> for LenientVisitor {
            type Value = Money;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a number or a numeric string")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Money, E> {
                Ok(Money::parse_lenient(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Money, E> {
                Ok(Money::new(Decimal::from(value)))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Money, E> {
                Ok(Money::new(Decimal::from(value)))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Money, E> {
                Ok(Decimal::from_f64(value).map(Money::new).unwrap_or_default())
            }

            fn visit_unit<E: de::Error>(self) -> Result<Money, E> {
                Ok(Money::zero())
            }

            fn visit_none<E: de::Error>(self) -> Result<Money, E> {
                Ok(Money::zero())
            }
        }

        deserializer.deserialize_any(LenientVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_creation() {
        let m = Money::new(dec!(12500));
        assert_eq!(m.amount(), dec!(12500));
    }

    #[test]
    fn test_parse_lenient_with_separators() {
        assert_eq!(Money::parse_lenient("1,234,500"), Money::from_i64(1_234_500));
        assert_eq!(Money::parse_lenient(" 2500 "), Money::from_i64(2500));
        assert_eq!(Money::parse_lenient("1234.56"), Money::new(dec!(1234.56)));
    }

    #[test]
    fn test_parse_lenient_garbage_defaults_to_zero() {
        assert_eq!(Money::parse_lenient(""), Money::zero());
        assert_eq!(Money::parse_lenient("   "), Money::zero());
        assert_eq!(Money::parse_lenient("abc"), Money::zero());
        assert_eq!(Money::parse_lenient("12a4"), Money::zero());
    }

    #[test]
    fn test_round_up_to_ten() {
        assert_eq!(Money::from_i64(11750).round_up_to_ten(), Money::from_i64(11750));
        assert_eq!(Money::new(dec!(11751)).round_up_to_ten(), Money::from_i64(11760));
        assert_eq!(Money::new(dec!(11750.01)).round_up_to_ten(), Money::from_i64(11760));
        assert_eq!(Money::zero().round_up_to_ten(), Money::zero());
    }

    #[test]
    fn test_floor_at_zero() {
        assert_eq!(Money::from_i64(-500).floor_at_zero(), Money::zero());
        assert_eq!(Money::from_i64(500).floor_at_zero(), Money::from_i64(500));
    }

    #[test]
    fn test_prorate() {
        let total = Money::from_i64(100_000);
        let share = total.prorate(dec!(1), dec!(4)).unwrap();
        assert_eq!(share, Money::from_i64(25_000));
    }

    #[test]
    fn test_prorate_zero_denominator() {
        let total = Money::from_i64(100_000);
        assert_eq!(
            total.prorate(dec!(1), Decimal::ZERO),
            Err(MoneyError::DivisionByZero)
        );
    }

    #[test]
    fn test_display_grouping() {
        assert_eq!(Money::from_i64(1_234_500).to_string(), "1,234,500");
        assert_eq!(Money::from_i64(-46760).to_string(), "-46,760");
        assert_eq!(Money::new(dec!(950.5)).to_string(), "950.5");
    }

    #[test]
    fn test_lenient_deserialization() {
        #[derive(serde::Deserialize)]
        struct Row {
            #[serde(default, with = "lenient")]
            amount: Money,
        }

        let row: Row = serde_json::from_str(r#"{"amount": "1,234"}"#).unwrap();
        assert_eq!(row.amount, Money::from_i64(1234));

        let row: Row = serde_json::from_str(r#"{"amount": 50000}"#).unwrap();
        assert_eq!(row.amount, Money::from_i64(50000));

        let row: Row = serde_json::from_str(r#"{"amount": "n/a"}"#).unwrap();
        assert_eq!(row.amount, Money::zero());

        let row: Row = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(row.amount, Money::zero());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn charged_is_multiple_of_ten_and_covers_amount(amount in 0i64..1_000_000_000i64, cents in 0u32..100u32) {
            let m = Money::new(Decimal::from(amount) + Decimal::new(cents as i64, 2));
            let charged = m.round_up_to_ten();

            prop_assert!(charged >= m);
            prop_assert_eq!(charged.amount() % dec!(10), Decimal::ZERO);
            // Never more than a full increment above the exact amount
            prop_assert!(charged.amount() - m.amount() < dec!(10));
        }

        #[test]
        fn grouped_display_reparses(amount in -1_000_000_000i64..1_000_000_000i64) {
            let m = Money::from_i64(amount);
            prop_assert_eq!(Money::parse_lenient(&m.to_string()), m);
        }
    }
}
