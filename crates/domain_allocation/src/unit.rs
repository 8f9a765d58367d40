//! Unit registry value types
//!
//! The registry itself (floor/unit CRUD) lives outside this crate; engines
//! receive the unit list as a plain slice. What matters here is the
//! [`UnitSnapshot`]: every allocation detail stores a frozen value copy of
//! the unit's attributes taken at calculation time, so later edits to the
//! live record never rewrite billing history.

use core_kernel::{FloorId, UnitId};
use serde::{Deserialize, Serialize};

/// A live unit record as supplied by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique identifier
    pub id: UnitId,
    /// Floor the unit belongs to
    pub floor_id: FloorId,
    /// Display name (e.g. "201")
    pub name: String,
    /// Free-form note kept on the registry record
    pub memo: Option<String>,
    /// Eligible for the electric welfare discount
    pub electric_welfare: bool,
    /// Eligible for the electric voucher discount
    pub electric_voucher: bool,
    /// Subscribed to the TV service
    pub has_tv: bool,
    /// Eligible for the water welfare discount
    pub water_welfare: bool,
    /// Number of residents
    pub residents_count: u32,
    /// Vacant units never participate in allocation
    pub is_vacant: bool,
}

impl Unit {
    /// Creates a unit with registry defaults: occupied, one resident,
    /// TV-subscribed, no discount eligibility.
    pub fn new(floor_id: FloorId, name: impl Into<String>) -> Self {
        Self {
            id: UnitId::new(),
            floor_id,
            name: name.into(),
            memo: None,
            electric_welfare: false,
            electric_voucher: false,
            has_tv: true,
            water_welfare: false,
            residents_count: 1,
            is_vacant: false,
        }
    }

    /// Sets the resident count
    pub fn with_residents(mut self, count: u32) -> Self {
        self.residents_count = count;
        self
    }

    /// Marks the unit eligible for the electric welfare discount
    pub fn with_electric_welfare(mut self) -> Self {
        self.electric_welfare = true;
        self
    }

    /// Marks the unit eligible for the electric voucher discount
    pub fn with_electric_voucher(mut self) -> Self {
        self.electric_voucher = true;
        self
    }

    /// Marks the unit eligible for the water welfare discount
    pub fn with_water_welfare(mut self) -> Self {
        self.water_welfare = true;
        self
    }

    /// Sets the TV subscription flag
    pub fn with_tv(mut self, has_tv: bool) -> Self {
        self.has_tv = has_tv;
        self
    }

    /// Marks the unit vacant
    pub fn vacant(mut self) -> Self {
        self.is_vacant = true;
        self
    }
}

/// Frozen copy of a unit's attributes at calculation time
///
/// Written into every allocation detail and never mutated afterwards, even
/// if the live unit record changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub unit_name: String,
    pub electric_welfare: bool,
    pub electric_voucher: bool,
    pub has_tv: bool,
    pub water_welfare: bool,
    pub residents_count: u32,
    pub is_vacant: bool,
}

impl UnitSnapshot {
    /// Captures a value copy of the unit's current attributes
    pub fn capture(unit: &Unit) -> Self {
        Self {
            unit_name: unit.name.clone(),
            electric_welfare: unit.electric_welfare,
            electric_voucher: unit.electric_voucher,
            has_tv: unit.has_tv,
            water_welfare: unit.water_welfare,
            residents_count: unit.residents_count,
            is_vacant: unit.is_vacant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_a_value_copy() {
        let mut unit = Unit::new(FloorId::new(), "201").with_residents(3).with_water_welfare();
        let snapshot = UnitSnapshot::capture(&unit);

        // Mutating the live record after capture must not affect the snapshot.
        unit.residents_count = 5;
        unit.water_welfare = false;

        assert_eq!(snapshot.residents_count, 3);
        assert!(snapshot.water_welfare);
        assert_eq!(snapshot.unit_name, "201");
    }

    #[test]
    fn test_unit_defaults() {
        let unit = Unit::new(FloorId::new(), "101");
        assert!(unit.has_tv);
        assert!(!unit.is_vacant);
        assert_eq!(unit.residents_count, 1);
        assert!(!unit.electric_welfare);
    }
}
