//! Water cost allocation
//!
//! A water bill covers the whole building for one period and is prorated by
//! resident count rather than metered usage. Units billed separately for a
//! period can be excluded: they still get a zeroed detail so the per-unit
//! history stays complete, but they contribute nothing to the resident-count
//! denominator or the welfare eligibility pool.

use chrono::{DateTime, Utc};
use core_kernel::{BillingMonth, Money, UnitId, WaterBillId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::discount;
use crate::error::AllocationError;
use crate::settings::ChargeDefaults;
use crate::unit::{Unit, UnitSnapshot};

/// Calculation request for one period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterBillRequest {
    pub period: BillingMonth,
    /// Declared total, net of the welfare discount
    #[serde(default, with = "core_kernel::money::lenient")]
    pub total_amount: Money,
    /// Explicit welfare discount total from the notice; zero means "use the
    /// per-unit default"
    #[serde(default, with = "core_kernel::money::lenient")]
    pub welfare_discount_total: Money,
    /// Units billed separately this period
    #[serde(default)]
    pub excluded_unit_ids: HashSet<UnitId>,
    #[serde(default)]
    pub overwrite: bool,
}

/// Per-unit allocation record, owned by its bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterBillDetail {
    pub unit_id: UnitId,
    pub snapshot: UnitSnapshot,
    /// Excluded units keep a zeroed record for the historical ledger
    pub excluded: bool,
    pub base_amount: Money,
    pub welfare_discount: Money,
    pub final_amount: Money,
    pub charged_amount: Money,
}

/// A water bill aggregate for one period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterBill {
    pub id: WaterBillId,
    pub period: BillingMonth,
    /// Declared total, net of the welfare discount
    pub total_amount: Money,
    /// Welfare discount total actually applied
    pub welfare_discount_total: Money,
    pub details: Vec<WaterBillDetail>,
    pub created_at: DateTime<Utc>,
}

impl WaterBill {
    /// Reconstructed pre-discount total
    pub fn original_amount(&self) -> Money {
        self.total_amount + self.welfare_discount_total
    }

    /// Finds the detail for a unit, if it was recorded
    pub fn detail_for(&self, unit_id: UnitId) -> Option<&WaterBillDetail> {
        self.details.iter().find(|d| d.unit_id == unit_id)
    }
}

/// Water allocation engine
pub struct WaterAllocationEngine<'a> {
    defaults: &'a ChargeDefaults,
}

impl<'a> WaterAllocationEngine<'a> {
    pub fn new(defaults: &'a ChargeDefaults) -> Self {
        Self { defaults }
    }

    /// Computes the building-wide bill aggregate for a period
    pub fn calculate(
        &self,
        units: &[Unit],
        request: &WaterBillRequest,
    ) -> Result<WaterBill, AllocationError> {
        let occupied: Vec<&Unit> = units.iter().filter(|u| !u.is_vacant).collect();
        let included: Vec<&Unit> = occupied
            .iter()
            .copied()
            .filter(|u| !request.excluded_unit_ids.contains(&u.id))
            .collect();

        let welfare_count = included.iter().filter(|u| u.water_welfare).count();
        let welfare = discount::resolve(
            request.welfare_discount_total,
            welfare_count,
            self.defaults.water_welfare_amount,
        )?;

        let original_amount = request.total_amount + welfare.total_applied;
        let included_count = Decimal::from(included.len());
        let total_residents: Decimal = included
            .iter()
            .map(|u| Decimal::from(u.residents_count))
            .sum();

        debug!(
            period = %request.period,
            units = occupied.len(),
            excluded = request.excluded_unit_ids.len(),
            %total_residents,
            total = %request.total_amount,
            original = %original_amount,
            "Calculating water allocation"
        );

        let mut details = Vec::with_capacity(occupied.len());
        for unit in &occupied {
            if request.excluded_unit_ids.contains(&unit.id) {
                details.push(WaterBillDetail {
                    unit_id: unit.id,
                    snapshot: UnitSnapshot::capture(unit),
                    excluded: true,
                    base_amount: Money::zero(),
                    welfare_discount: Money::zero(),
                    final_amount: Money::zero(),
                    charged_amount: Money::zero(),
                });
                continue;
            }

            let base_amount = if total_residents > Decimal::ZERO {
                original_amount.prorate(Decimal::from(unit.residents_count), total_residents)?
            } else {
                // A building of zero recorded residents still gets billed:
                // split equally across included units.
                original_amount.divide(included_count)?
            };

            let welfare_discount = if unit.water_welfare {
                welfare.per_unit
            } else {
                Money::zero()
            };

            let final_amount = (base_amount - welfare_discount).floor_at_zero();
            let charged_amount = final_amount.round_up_to_ten();

            details.push(WaterBillDetail {
                unit_id: unit.id,
                snapshot: UnitSnapshot::capture(unit),
                excluded: false,
                base_amount,
                welfare_discount,
                final_amount,
                charged_amount,
            });
        }

        Ok(WaterBill {
            id: WaterBillId::new_v7(),
            period: request.period,
            total_amount: request.total_amount,
            welfare_discount_total: welfare.total_applied,
            details,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::FloorId;

    fn building() -> Vec<Unit> {
        let floor = FloorId::new();
        vec![
            Unit::new(floor, "101").with_residents(1).with_water_welfare(),
            Unit::new(floor, "102").with_residents(1).with_water_welfare(),
            Unit::new(floor, "103").with_residents(1),
            Unit::new(floor, "104").with_residents(1),
        ]
    }

    fn request(total: i64, welfare: i64) -> WaterBillRequest {
        WaterBillRequest {
            period: "2025-03".parse().unwrap(),
            total_amount: Money::from_i64(total),
            welfare_discount_total: Money::from_i64(welfare),
            excluded_unit_ids: HashSet::new(),
            overwrite: false,
        }
    }

    #[test]
    fn test_welfare_split_reconstructs_original_and_rounds() {
        // Total 50000 net of a 3000 welfare discount over 2 eligible units:
        // original 53000, four units of one resident each -> base 13250,
        // welfare units final 11750 (already a multiple of 10).
        let units = building();
        let defaults = ChargeDefaults::default();
        let bill = WaterAllocationEngine::new(&defaults)
            .calculate(&units, &request(50_000, 3000))
            .unwrap();

        assert_eq!(bill.original_amount(), Money::from_i64(53_000));
        assert_eq!(bill.welfare_discount_total, Money::from_i64(3000));

        for detail in &bill.details {
            assert_eq!(detail.base_amount, Money::from_i64(13_250));
            if detail.snapshot.water_welfare {
                assert_eq!(detail.welfare_discount, Money::from_i64(1500));
                assert_eq!(detail.final_amount, Money::from_i64(11_750));
                assert_eq!(detail.charged_amount, Money::from_i64(11_750));
            } else {
                assert_eq!(detail.charged_amount, Money::from_i64(13_250));
            }
        }
    }

    #[test]
    fn test_excluded_unit_is_zeroed_and_out_of_denominator() {
        let units = building();
        let excluded_id = units[3].id;
        let mut req = request(30_000, 0);
        req.excluded_unit_ids.insert(excluded_id);
        let defaults = ChargeDefaults::default();

        let bill = WaterAllocationEngine::new(&defaults)
            .calculate(&units, &req)
            .unwrap();

        let excluded = bill.detail_for(excluded_id).unwrap();
        assert!(excluded.excluded);
        assert!(excluded.base_amount.is_zero());
        assert!(excluded.charged_amount.is_zero());

        // 30000 over the 3 remaining single-resident units.
        for detail in bill.details.iter().filter(|d| !d.excluded) {
            assert_eq!(detail.base_amount, Money::from_i64(10_000));
        }
    }

    #[test]
    fn test_excluded_welfare_unit_leaves_eligibility_pool() {
        let units = building();
        let excluded_welfare = units[0].id;
        let mut req = request(40_000, 3000);
        req.excluded_unit_ids.insert(excluded_welfare);
        let defaults = ChargeDefaults::default();

        let bill = WaterAllocationEngine::new(&defaults)
            .calculate(&units, &req)
            .unwrap();

        // Only one eligible unit remains, so it takes the whole 3000.
        let remaining = bill
            .details
            .iter()
            .find(|d| !d.excluded && d.snapshot.water_welfare)
            .unwrap();
        assert_eq!(remaining.welfare_discount, Money::from_i64(3000));
        assert_eq!(bill.welfare_discount_total, Money::from_i64(3000));
    }

    #[test]
    fn test_zero_residents_splits_equally() {
        let floor = FloorId::new();
        let units = vec![
            Unit::new(floor, "101").with_residents(0),
            Unit::new(floor, "102").with_residents(0),
        ];
        let defaults = ChargeDefaults::default();

        let bill = WaterAllocationEngine::new(&defaults)
            .calculate(&units, &request(20_000, 0))
            .unwrap();

        for detail in &bill.details {
            assert_eq!(detail.base_amount, Money::from_i64(10_000));
        }
    }

    #[test]
    fn test_default_welfare_amount_applies_without_input() {
        let units = building();
        let defaults = ChargeDefaults {
            water_welfare_amount: Money::from_i64(1200),
            ..ChargeDefaults::default()
        };

        let bill = WaterAllocationEngine::new(&defaults)
            .calculate(&units, &request(50_000, 0))
            .unwrap();

        // 1200 x 2 eligible units.
        assert_eq!(bill.welfare_discount_total, Money::from_i64(2400));
        assert_eq!(bill.original_amount(), Money::from_i64(52_400));
    }
}
