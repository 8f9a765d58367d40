//! Pre-built Test Fixtures
//!
//! Small, recognisable buildings used across the test suite so individual
//! tests do not reconstruct the same registry by hand.

use core_kernel::{BillingMonth, FloorId};
use domain_allocation::{ChargeDefaults, Unit};

/// A period used throughout the fixtures
pub fn march_2025() -> BillingMonth {
    BillingMonth::new(2025, 3).unwrap()
}

/// One floor of four occupied units with a mix of flags:
///
/// - 201: electric welfare, TV
/// - 202: electric voucher, TV
/// - 203: two residents, no TV
/// - 204: water welfare, TV
pub fn standard_floor() -> (FloorId, Vec<Unit>) {
    let floor = FloorId::new();
    let units = vec![
        Unit::new(floor, "201").with_electric_welfare(),
        Unit::new(floor, "202").with_electric_voucher(),
        Unit::new(floor, "203").with_residents(2).with_tv(false),
        Unit::new(floor, "204").with_water_welfare(),
    ];
    (floor, units)
}

/// Two floors plus one vacant unit, for building-wide calculations
pub fn standard_building() -> Vec<Unit> {
    let (_, mut units) = standard_floor();
    let second = FloorId::new();
    units.push(Unit::new(second, "301").with_residents(3));
    units.push(Unit::new(second, "302").vacant());
    units
}

/// Charge defaults matching a freshly configured building
pub fn standard_defaults() -> ChargeDefaults {
    ChargeDefaults::default()
}
