//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use core_kernel::{BillingMonth, FloorId, Money};
use domain_allocation::Unit;
use proptest::prelude::*;

/// Strategy for positive whole-currency amounts
pub fn positive_amount_strategy() -> impl Strategy<Value = i64> {
    1i64..100_000_000i64
}

/// Strategy for amounts that may be zero
pub fn amount_strategy() -> impl Strategy<Value = i64> {
    0i64..100_000_000i64
}

/// Strategy for positive Money values
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    positive_amount_strategy().prop_map(Money::from_i64)
}

/// Strategy for valid billing months
pub fn billing_month_strategy() -> impl Strategy<Value = BillingMonth> {
    (2000i32..2100i32, 1u32..=12u32)
        .prop_map(|(year, month)| BillingMonth::new(year, month).unwrap())
}

/// Strategy for a floor of occupied units with random flags and resident
/// counts
pub fn floor_units_strategy(max_units: usize) -> impl Strategy<Value = (FloorId, Vec<Unit>)> {
    let unit = (any::<bool>(), any::<bool>(), any::<bool>(), 0u32..6u32);
    prop::collection::vec(unit, 1..=max_units).prop_map(|specs| {
        let floor = FloorId::new();
        let units = specs
            .into_iter()
            .enumerate()
            .map(|(i, (welfare, voucher, tv, residents))| {
                let mut unit = Unit::new(floor, format!("{}", 101 + i))
                    .with_residents(residents)
                    .with_tv(tv);
                if welfare {
                    unit = unit.with_electric_welfare().with_water_welfare();
                }
                if voucher {
                    unit = unit.with_electric_voucher();
                }
                unit
            })
            .collect();
        (floor, units)
    })
}
