//! Discount distribution policy
//!
//! Electric welfare, electric voucher and water welfare all follow the same
//! rule: an explicit non-zero total from the utility notice wins and is split
//! equally among eligible units; otherwise the per-unit default applies to
//! each eligible unit. The total *actually* applied is recorded on the bill
//! aggregate.

use core_kernel::Money;
use rust_decimal::Decimal;

use crate::error::AllocationError;

/// A resolved discount: the per-unit amount and the total applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDiscount {
    pub per_unit: Money,
    pub total_applied: Money,
}

impl ResolvedDiscount {
    pub fn none() -> Self {
        Self {
            per_unit: Money::zero(),
            total_applied: Money::zero(),
        }
    }
}

/// Resolves the discount for one type over a pool of eligible units
///
/// * explicit non-zero input and eligible units: split equally, input is the
///   total applied
/// * no input but eligible units: the per-unit default applies to each
/// * no eligible units: zero either way
pub fn resolve(
    explicit_total: Money,
    eligible_count: usize,
    default_per_unit: Money,
) -> Result<ResolvedDiscount, AllocationError> {
    if eligible_count == 0 {
        return Ok(ResolvedDiscount::none());
    }

    if explicit_total.is_positive() {
        let per_unit = explicit_total.divide(Decimal::from(eligible_count))?;
        Ok(ResolvedDiscount {
            per_unit,
            total_applied: explicit_total,
        })
    } else {
        Ok(ResolvedDiscount {
            per_unit: default_per_unit,
            total_applied: default_per_unit.multiply(Decimal::from(eligible_count)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_input_wins_and_splits_equally() {
        let resolved = resolve(Money::from_i64(3000), 2, Money::from_i64(9999)).unwrap();
        assert_eq!(resolved.per_unit, Money::from_i64(1500));
        assert_eq!(resolved.total_applied, Money::from_i64(3000));
    }

    #[test]
    fn test_default_applies_per_eligible_unit() {
        let resolved = resolve(Money::zero(), 3, Money::from_i64(8000)).unwrap();
        assert_eq!(resolved.per_unit, Money::from_i64(8000));
        assert_eq!(resolved.total_applied, Money::from_i64(24000));
    }

    #[test]
    fn test_no_eligible_units_means_no_discount() {
        let resolved = resolve(Money::from_i64(3000), 0, Money::from_i64(8000)).unwrap();
        assert_eq!(resolved, ResolvedDiscount::none());
    }
}
