//! Test Data Builders
//!
//! Fluent builders for calculation requests, so tests state only the fields
//! they care about.

use core_kernel::{BillingMonth, FloorId, Money, UnitId};
use domain_allocation::{
    CommonBillRequest, DistributionMethod, ElectricBillRequest, MeterReading, MonthlyCostEntry,
    TvDistributionMode, Unit, WaterBillRequest,
};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

/// Builder for [`ElectricBillRequest`]
pub struct ElectricRequestBuilder {
    period: BillingMonth,
    floor_id: FloorId,
    tv_distribution_mode: TvDistributionMode,
    overwrite: bool,
    entries: Vec<MonthlyCostEntry>,
    readings: HashMap<UnitId, MeterReading>,
}

impl ElectricRequestBuilder {
    pub fn new(floor_id: FloorId, period: BillingMonth) -> Self {
        Self {
            period,
            floor_id,
            tv_distribution_mode: TvDistributionMode::Individual,
            overwrite: false,
            entries: Vec::new(),
            readings: HashMap::new(),
        }
    }

    /// Adds a cost entry for the request period itself
    pub fn entry(self, amount: i64) -> Self {
        let month = self.period;
        self.entry_full(month, amount, 0, 0, 0)
    }

    pub fn entry_full(
        mut self,
        month: BillingMonth,
        amount: i64,
        welfare: i64,
        voucher: i64,
        tv_fee: i64,
    ) -> Self {
        self.entries.push(MonthlyCostEntry {
            month,
            amount: Money::from_i64(amount),
            welfare: Money::from_i64(welfare),
            voucher: Money::from_i64(voucher),
            tv_fee: Money::from_i64(tv_fee),
        });
        self
    }

    pub fn reading(mut self, unit: &Unit, previous: i64, current: i64) -> Self {
        self.readings.insert(
            unit.id,
            MeterReading::new(Decimal::from(previous), Decimal::from(current)),
        );
        self
    }

    /// Gives every unit the same usage
    pub fn equal_readings(mut self, units: &[Unit], usage: i64) -> Self {
        for unit in units {
            self.readings
                .insert(unit.id, MeterReading::new(Decimal::ZERO, Decimal::from(usage)));
        }
        self
    }

    pub fn tv_mode(mut self, mode: TvDistributionMode) -> Self {
        self.tv_distribution_mode = mode;
        self
    }

    pub fn overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }

    pub fn build(self) -> ElectricBillRequest {
        ElectricBillRequest {
            period: self.period,
            floor_id: self.floor_id,
            tv_distribution_mode: self.tv_distribution_mode,
            overwrite: self.overwrite,
            entries: self.entries,
            readings: self.readings,
        }
    }
}

/// Builder for [`WaterBillRequest`]
pub struct WaterRequestBuilder {
    period: BillingMonth,
    total_amount: Money,
    welfare_discount_total: Money,
    excluded_unit_ids: HashSet<UnitId>,
    overwrite: bool,
}

impl WaterRequestBuilder {
    pub fn new(period: BillingMonth, total_amount: i64) -> Self {
        Self {
            period,
            total_amount: Money::from_i64(total_amount),
            welfare_discount_total: Money::zero(),
            excluded_unit_ids: HashSet::new(),
            overwrite: false,
        }
    }

    pub fn welfare_total(mut self, amount: i64) -> Self {
        self.welfare_discount_total = Money::from_i64(amount);
        self
    }

    pub fn exclude(mut self, unit: &Unit) -> Self {
        self.excluded_unit_ids.insert(unit.id);
        self
    }

    pub fn overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }

    pub fn build(self) -> WaterBillRequest {
        WaterBillRequest {
            period: self.period,
            total_amount: self.total_amount,
            welfare_discount_total: self.welfare_discount_total,
            excluded_unit_ids: self.excluded_unit_ids,
            overwrite: self.overwrite,
        }
    }
}

/// Shorthand for a [`CommonBillRequest`]
pub fn common_request(
    period: BillingMonth,
    description: &str,
    total_amount: i64,
    method: DistributionMethod,
) -> CommonBillRequest {
    CommonBillRequest {
        period,
        description: description.to_string(),
        total_amount: Money::from_i64(total_amount),
        distribution_method: method,
    }
}
