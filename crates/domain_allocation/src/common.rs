//! Common cost allocation
//!
//! Common charges (cleaning, lighting, maintenance) carry no discount logic.
//! A period may hold several common bills, distinguished by description, so
//! there is no duplicate-period constraint here.

use chrono::{DateTime, Utc};
use core_kernel::{BillingMonth, CommonBillId, Money, UnitId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AllocationError;
use crate::unit::{Unit, UnitSnapshot};

/// How a common cost is spread across units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistributionMethod {
    /// Proportional to resident count
    #[default]
    ByResidents,
    /// Equal split across occupied units
    ByUnits,
}

/// Calculation request for one common charge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommonBillRequest {
    pub period: BillingMonth,
    pub description: String,
    #[serde(default, with = "core_kernel::money::lenient")]
    pub total_amount: Money,
    #[serde(default)]
    pub distribution_method: DistributionMethod,
}

/// Per-unit allocation record, owned by its bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonBillDetail {
    pub unit_id: UnitId,
    pub snapshot: UnitSnapshot,
    pub amount: Money,
    pub charged_amount: Money,
}

/// A common bill aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommonBill {
    pub id: CommonBillId,
    pub period: BillingMonth,
    pub description: String,
    pub total_amount: Money,
    pub distribution_method: DistributionMethod,
    pub details: Vec<CommonBillDetail>,
    pub created_at: DateTime<Utc>,
}

impl CommonBill {
    /// Finds the detail for a unit, if it was allocated
    pub fn detail_for(&self, unit_id: UnitId) -> Option<&CommonBillDetail> {
        self.details.iter().find(|d| d.unit_id == unit_id)
    }
}

/// Common cost allocation engine
#[derive(Debug, Default)]
pub struct CommonCostAllocationEngine;

impl CommonCostAllocationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Computes the building-wide allocation for one common charge
    pub fn calculate(
        &self,
        units: &[Unit],
        request: &CommonBillRequest,
    ) -> Result<CommonBill, AllocationError> {
        let occupied: Vec<&Unit> = units.iter().filter(|u| !u.is_vacant).collect();
        let unit_count = Decimal::from(occupied.len());
        let total_residents: Decimal = occupied
            .iter()
            .map(|u| Decimal::from(u.residents_count))
            .sum();

        debug!(
            period = %request.period,
            description = %request.description,
            method = ?request.distribution_method,
            units = occupied.len(),
            total = %request.total_amount,
            "Calculating common allocation"
        );

        let mut details = Vec::with_capacity(occupied.len());
        for unit in &occupied {
            let amount = match request.distribution_method {
                DistributionMethod::ByResidents if total_residents > Decimal::ZERO => request
                    .total_amount
                    .prorate(Decimal::from(unit.residents_count), total_residents)?,
                // ByResidents with no recorded residents degrades to an
                // equal split, same as ByUnits.
                _ => request.total_amount.divide(unit_count)?,
            };

            details.push(CommonBillDetail {
                unit_id: unit.id,
                snapshot: UnitSnapshot::capture(unit),
                amount,
                charged_amount: amount.round_up_to_ten(),
            });
        }

        Ok(CommonBill {
            id: CommonBillId::new_v7(),
            period: request.period,
            description: request.description.clone(),
            total_amount: request.total_amount,
            distribution_method: request.distribution_method,
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
            Unit::new(floor, "101").with_residents(1),
            Unit::new(floor, "102").with_residents(3),
        ]
    }

    fn request(total: i64, method: DistributionMethod) -> CommonBillRequest {
        CommonBillRequest {
            period: "2025-03".parse().unwrap(),
            description: "Stairwell cleaning".to_string(),
            total_amount: Money::from_i64(total),
            distribution_method: method,
        }
    }

    #[test]
    fn test_by_residents_is_proportional() {
        let units = building();
        let bill = CommonCostAllocationEngine::new()
            .calculate(&units, &request(40_000, DistributionMethod::ByResidents))
            .unwrap();

        assert_eq!(bill.details[0].amount, Money::from_i64(10_000));
        assert_eq!(bill.details[1].amount, Money::from_i64(30_000));
    }

    #[test]
    fn test_by_units_splits_equally() {
        let units = building();
        let bill = CommonCostAllocationEngine::new()
            .calculate(&units, &request(40_000, DistributionMethod::ByUnits))
            .unwrap();

        for detail in &bill.details {
            assert_eq!(detail.amount, Money::from_i64(20_000));
        }
    }

    #[test]
    fn test_charged_amount_rounds_up() {
        let units = building();
        // 10001 / 2 units = 5000.5, charged rounds up to 5010.
        let bill = CommonCostAllocationEngine::new()
            .calculate(&units, &request(10_001, DistributionMethod::ByUnits))
            .unwrap();

        for detail in &bill.details {
            assert_eq!(detail.charged_amount, Money::from_i64(5010));
            assert!(detail.charged_amount >= detail.amount);
        }
    }

    #[test]
    fn test_vacant_units_excluded() {
        let floor = FloorId::new();
        let units = vec![Unit::new(floor, "101"), Unit::new(floor, "102").vacant()];
        let bill = CommonCostAllocationEngine::new()
            .calculate(&units, &request(15_000, DistributionMethod::ByUnits))
            .unwrap();

        assert_eq!(bill.details.len(), 1);
        assert_eq!(bill.details[0].amount, Money::from_i64(15_000));
    }
}
