//! In-memory bill store
//!
//! Bill aggregates are computed in full before they reach the store, so
//! recording one is a single atomic step: either the whole bill with its
//! details lands, or nothing changes. The period uniqueness invariant
//! (floor + period for electric, period alone for water) is enforced here by
//! the keyed index, not merely pre-checked by callers.

use core_kernel::{BillingMonth, CommonBillId, ElectricBillId, FloorId, UnitId, WaterBillId};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::info;

use crate::common::CommonBill;
use crate::electric::ElectricBill;
use crate::error::AllocationError;
use crate::water::WaterBill;

/// Holds recorded bill aggregates and enforces period uniqueness
#[derive(Debug, Default)]
pub struct BillStore {
    electric: HashMap<ElectricBillId, ElectricBill>,
    electric_by_period: HashMap<(FloorId, BillingMonth), ElectricBillId>,
    water: HashMap<WaterBillId, WaterBill>,
    water_by_period: HashMap<BillingMonth, WaterBillId>,
    common: HashMap<CommonBillId, CommonBill>,
}

impl BillStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an electric bill, replacing an existing (floor, period) bill
    /// only when overwrite is requested
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::DuplicatePeriod`] carrying the existing
    /// bill's identity when the slot is taken and overwrite is not set.
    pub fn record_electric(
        &mut self,
        bill: ElectricBill,
        overwrite: bool,
    ) -> Result<ElectricBillId, AllocationError> {
        let key = (bill.floor_id, bill.period);
        if let Some(&existing) = self.electric_by_period.get(&key) {
            if !overwrite {
                return Err(AllocationError::DuplicatePeriod {
                    existing: existing.to_string(),
                    period: bill.period,
                });
            }
            // Replacing removes the old aggregate and its details together.
            self.electric.remove(&existing);
            info!(%existing, period = %bill.period, "Replacing electric bill");
        }

        let id = bill.id;
        self.electric_by_period.insert(key, id);
        self.electric.insert(id, bill);
        info!(%id, "Electric bill recorded");
        Ok(id)
    }

    /// Records a water bill, replacing an existing period bill only when
    /// overwrite is requested
    pub fn record_water(
        &mut self,
        bill: WaterBill,
        overwrite: bool,
    ) -> Result<WaterBillId, AllocationError> {
        if let Some(&existing) = self.water_by_period.get(&bill.period) {
            if !overwrite {
                return Err(AllocationError::DuplicatePeriod {
                    existing: existing.to_string(),
                    period: bill.period,
                });
            }
            self.water.remove(&existing);
            info!(%existing, period = %bill.period, "Replacing water bill");
        }

        let id = bill.id;
        self.water_by_period.insert(bill.period, id);
        self.water.insert(id, bill);
        info!(%id, "Water bill recorded");
        Ok(id)
    }

    /// Records a common bill; several may share a period
    pub fn record_common(&mut self, bill: CommonBill) -> CommonBillId {
        let id = bill.id;
        self.common.insert(id, bill);
        info!(%id, "Common bill recorded");
        id
    }

    pub fn electric_bill(&self, id: ElectricBillId) -> Option<&ElectricBill> {
        self.electric.get(&id)
    }

    pub fn water_bill(&self, id: WaterBillId) -> Option<&WaterBill> {
        self.water.get(&id)
    }

    pub fn common_bill(&self, id: CommonBillId) -> Option<&CommonBill> {
        self.common.get(&id)
    }

    pub fn electric_bills(&self) -> impl Iterator<Item = &ElectricBill> {
        self.electric.values()
    }

    pub fn water_bills(&self) -> impl Iterator<Item = &WaterBill> {
        self.water.values()
    }

    pub fn common_bills(&self) -> impl Iterator<Item = &CommonBill> {
        self.common.values()
    }

    /// Deletes an electric bill and, implicitly, its owned details
    pub fn delete_electric(&mut self, id: ElectricBillId) -> Result<(), AllocationError> {
        let bill = self
            .electric
            .remove(&id)
            .ok_or_else(|| AllocationError::BillNotFound(id.to_string()))?;
        self.electric_by_period.remove(&(bill.floor_id, bill.period));
        info!(%id, "Electric bill deleted");
        Ok(())
    }

    pub fn delete_water(&mut self, id: WaterBillId) -> Result<(), AllocationError> {
        let bill = self
            .water
            .remove(&id)
            .ok_or_else(|| AllocationError::BillNotFound(id.to_string()))?;
        self.water_by_period.remove(&bill.period);
        info!(%id, "Water bill deleted");
        Ok(())
    }

    pub fn delete_common(&mut self, id: CommonBillId) -> Result<(), AllocationError> {
        self.common
            .remove(&id)
            .map(|_| info!(%id, "Common bill deleted"))
            .ok_or_else(|| AllocationError::BillNotFound(id.to_string()))
    }

    /// Current meter readings from the latest electric bill for a floor
    /// strictly before the given period
    ///
    /// Used to prefill the next period's previous readings.
    pub fn previous_readings(
        &self,
        floor_id: FloorId,
        before: BillingMonth,
    ) -> Option<HashMap<UnitId, Decimal>> {
        self.electric
            .values()
            .filter(|b| b.floor_id == floor_id && b.period < before)
            .max_by_key(|b| b.period)
            .map(|bill| {
                bill.readings
                    .iter()
                    .map(|(unit_id, reading)| (*unit_id, reading.current))
                    .collect()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::electric::{ElectricAllocationEngine, ElectricBillRequest, MeterReading, MonthlyCostEntry, TvDistributionMode};
    use crate::settings::ChargeDefaults;
    use crate::unit::Unit;
    use core_kernel::Money;
    use rust_decimal_macros::dec;

    fn sample_bill(units: &[Unit], floor: FloorId, period: &str) -> ElectricBill {
        let request = ElectricBillRequest {
            period: period.parse().unwrap(),
            floor_id: floor,
            tv_distribution_mode: TvDistributionMode::Individual,
            overwrite: false,
            entries: vec![MonthlyCostEntry {
                month: period.parse().unwrap(),
                amount: Money::from_i64(50_000),
                welfare: Money::zero(),
                voucher: Money::zero(),
                tv_fee: Money::zero(),
            }],
            readings: units
                .iter()
                .map(|u| (u.id, MeterReading::new(dec!(0), dec!(10))))
                .collect(),
        };
        let defaults = ChargeDefaults::default();
        ElectricAllocationEngine::new(&defaults)
            .calculate(units, &request)
            .unwrap()
    }

    #[test]
    fn test_duplicate_period_is_rejected_without_overwrite() {
        let floor = FloorId::new();
        let units = vec![Unit::new(floor, "201")];
        let mut store = BillStore::new();

        let first = store
            .record_electric(sample_bill(&units, floor, "2025-03"), false)
            .unwrap();
        let err = store
            .record_electric(sample_bill(&units, floor, "2025-03"), false)
            .unwrap_err();

        match err {
            AllocationError::DuplicatePeriod { existing, period } => {
                assert_eq!(existing, first.to_string());
                assert_eq!(period, "2025-03".parse().unwrap());
            }
            other => panic!("expected DuplicatePeriod, got {other:?}"),
        }
    }

    #[test]
    fn test_overwrite_replaces_atomically() {
        let floor = FloorId::new();
        let units = vec![Unit::new(floor, "201")];
        let mut store = BillStore::new();

        let first = store
            .record_electric(sample_bill(&units, floor, "2025-03"), false)
            .unwrap();
        let second = store
            .record_electric(sample_bill(&units, floor, "2025-03"), true)
            .unwrap();

        assert!(store.electric_bill(first).is_none());
        assert!(store.electric_bill(second).is_some());
        assert_eq!(store.electric_bills().count(), 1);
    }

    #[test]
    fn test_same_period_different_floor_is_allowed() {
        let floor_a = FloorId::new();
        let floor_b = FloorId::new();
        let units = vec![Unit::new(floor_a, "201"), Unit::new(floor_b, "301")];
        let mut store = BillStore::new();

        store
            .record_electric(sample_bill(&units, floor_a, "2025-03"), false)
            .unwrap();
        store
            .record_electric(sample_bill(&units, floor_b, "2025-03"), false)
            .unwrap();

        assert_eq!(store.electric_bills().count(), 2);
    }

    #[test]
    fn test_previous_readings_picks_latest_prior_bill() {
        let floor = FloorId::new();
        let units = vec![Unit::new(floor, "201")];
        let mut store = BillStore::new();

        store
            .record_electric(sample_bill(&units, floor, "2025-01"), false)
            .unwrap();
        store
            .record_electric(sample_bill(&units, floor, "2025-02"), false)
            .unwrap();

        let readings = store
            .previous_readings(floor, "2025-03".parse().unwrap())
            .unwrap();
        assert_eq!(readings.get(&units[0].id), Some(&dec!(10)));

        assert!(store
            .previous_readings(floor, "2025-01".parse().unwrap())
            .is_none());
    }

    #[test]
    fn test_delete_removes_period_slot() {
        let floor = FloorId::new();
        let units = vec![Unit::new(floor, "201")];
        let mut store = BillStore::new();

        let id = store
            .record_electric(sample_bill(&units, floor, "2025-03"), false)
            .unwrap();
        store.delete_electric(id).unwrap();

        // Slot is free again after deletion.
        assert!(store
            .record_electric(sample_bill(&units, floor, "2025-03"), false)
            .is_ok());
    }
}
