//! Electric cost allocation
//!
//! An electric bill covers one floor and one billing period, possibly built
//! from several monthly notice entries (when two months are billed together).
//! The declared totals are *net of discounts*: the engine first resolves the
//! welfare/voucher amounts actually applied, reconstructs the pre-discount
//! original amount, prorates it by metered usage, then reapplies the
//! discounts per eligible unit and adds the TV-service fee.

use chrono::{DateTime, Utc};
use core_kernel::{BillingMonth, ElectricBillId, FloorId, Money, UnitId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::discount;
use crate::error::AllocationError;
use crate::settings::ChargeDefaults;
use crate::unit::{Unit, UnitSnapshot};

/// Policy for spreading the fixed TV-service fee across a floor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TvDistributionMode {
    /// Only TV-subscribed units pay the fee
    #[default]
    Individual,
    /// The total fee is split equally across all occupied units
    Equal,
}

/// One monthly notice entry contributing to the bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCostEntry {
    /// The notice month this entry came from
    pub month: BillingMonth,
    /// Declared cost, net of discounts
    #[serde(default, with = "core_kernel::money::lenient")]
    pub amount: Money,
    /// Welfare discount total printed on the notice
    #[serde(default, with = "core_kernel::money::lenient")]
    pub welfare: Money,
    /// Voucher discount total printed on the notice
    #[serde(default, with = "core_kernel::money::lenient")]
    pub voucher: Money,
    /// TV-service fee for the month
    #[serde(default, with = "core_kernel::money::lenient")]
    pub tv_fee: Money,
}

/// Previous/current meter reading pair for a unit
///
/// Usage is simply `current - previous`; a negative value can only come from
/// bad input and is passed through, not validated against meter rollover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterReading {
    #[serde(default)]
    pub previous: Decimal,
    #[serde(default)]
    pub current: Decimal,
}

impl MeterReading {
    pub fn new(previous: Decimal, current: Decimal) -> Self {
        Self { previous, current }
    }

    pub fn usage(&self) -> Decimal {
        self.current - self.previous
    }
}

/// Calculation request for one floor and period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectricBillRequest {
    pub period: BillingMonth,
    pub floor_id: FloorId,
    #[serde(default)]
    pub tv_distribution_mode: TvDistributionMode,
    #[serde(default)]
    pub overwrite: bool,
    pub entries: Vec<MonthlyCostEntry>,
    #[serde(default)]
    pub readings: HashMap<UnitId, MeterReading>,
}

/// Per-unit allocation record, owned by its bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectricBillDetail {
    pub unit_id: UnitId,
    pub snapshot: UnitSnapshot,
    pub usage: Decimal,
    pub base_amount: Money,
    pub welfare_discount: Money,
    pub voucher_discount: Money,
    pub tv_fee: Money,
    pub final_amount: Money,
    pub charged_amount: Money,
}

/// An electric bill aggregate for one (floor, period)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectricBill {
    pub id: ElectricBillId,
    pub period: BillingMonth,
    pub floor_id: FloorId,
    /// Declared total, net of discounts
    pub total_amount: Money,
    /// Welfare discount total actually applied
    pub welfare_discount: Money,
    /// Voucher discount total actually applied
    pub voucher_discount: Money,
    pub tv_fee_total: Money,
    pub tv_distribution_mode: TvDistributionMode,
    pub tv_units_count: u32,
    pub months_count: u32,
    /// The raw notice entries, kept so the period can be re-displayed and
    /// re-run
    pub entries: Vec<MonthlyCostEntry>,
    /// The meter readings the bill was computed from
    pub readings: HashMap<UnitId, MeterReading>,
    pub details: Vec<ElectricBillDetail>,
    pub created_at: DateTime<Utc>,
}

impl ElectricBill {
    /// Reconstructed pre-discount total
    pub fn original_amount(&self) -> Money {
        self.total_amount + self.welfare_discount + self.voucher_discount
    }

    /// Finds the detail for a unit, if it was allocated
    pub fn detail_for(&self, unit_id: UnitId) -> Option<&ElectricBillDetail> {
        self.details.iter().find(|d| d.unit_id == unit_id)
    }
}

/// Electric allocation engine
///
/// Stateless apart from the charge defaults it resolves discounts against.
pub struct ElectricAllocationEngine<'a> {
    defaults: &'a ChargeDefaults,
}

impl<'a> ElectricAllocationEngine<'a> {
    pub fn new(defaults: &'a ChargeDefaults) -> Self {
        Self { defaults }
    }

    /// Computes the full bill aggregate for a floor and period
    ///
    /// # Errors
    ///
    /// Returns a validation error when the floor has no units in the
    /// supplied registry slice. Duplicate-period handling belongs to the
    /// store, not the engine.
    pub fn calculate(
        &self,
        units: &[Unit],
        request: &ElectricBillRequest,
    ) -> Result<ElectricBill, AllocationError> {
        let floor_units: Vec<&Unit> = units
            .iter()
            .filter(|u| u.floor_id == request.floor_id)
            .collect();
        if floor_units.is_empty() {
            return Err(AllocationError::validation(format!(
                "unknown floor: {}",
                request.floor_id
            )));
        }
        let occupied: Vec<&Unit> = floor_units.into_iter().filter(|u| !u.is_vacant).collect();

        let months_count = request.entries.len().max(1) as u32;
        let months = Decimal::from(months_count);

        let total_amount: Money = request.entries.iter().map(|e| e.amount).sum();
        let welfare_input: Money = request.entries.iter().map(|e| e.welfare).sum();
        let voucher_input: Money = request.entries.iter().map(|e| e.voucher).sum();
        let tv_fee_total: Money = request.entries.iter().map(|e| e.tv_fee).sum();

        let welfare_count = occupied.iter().filter(|u| u.electric_welfare).count();
        let voucher_count = occupied.iter().filter(|u| u.electric_voucher).count();
        let tv_units_count = occupied.iter().filter(|u| u.has_tv).count() as u32;

        let welfare = discount::resolve(
            welfare_input,
            welfare_count,
            self.defaults.electric_welfare_amount.multiply(months),
        )?;
        let voucher = discount::resolve(
            voucher_input,
            voucher_count,
            self.defaults.electric_voucher_amount.multiply(months),
        )?;

        // The declared total is net of discounts; undo them to get the
        // amount that is actually prorated.
        let original_amount = total_amount + welfare.total_applied + voucher.total_applied;

        let unit_count = Decimal::from(occupied.len());
        let total_usage: Decimal = occupied
            .iter()
            .map(|u| request.readings.get(&u.id).copied().unwrap_or_default().usage())
            .sum();

        // Per-unit TV fee under each mode. Individual mode charges each
        // subscribed unit the summed per-entry fee, falling back to the
        // default monthly fee when the notice carried none.
        let equal_tv_share = if occupied.is_empty() {
            Money::zero()
        } else {
            tv_fee_total.divide(unit_count)?
        };
        let individual_tv_fee = if tv_fee_total.is_positive() {
            tv_fee_total
        } else {
            self.defaults.tv_fee.multiply(months)
        };

        debug!(
            floor = %request.floor_id,
            period = %request.period,
            months = months_count,
            units = occupied.len(),
            %total_amount,
            %original_amount,
            %total_usage,
            "Calculating electric allocation"
        );

        let mut details = Vec::with_capacity(occupied.len());
        for unit in &occupied {
            let usage = request
                .readings
                .get(&unit.id)
                .copied()
                .unwrap_or_default()
                .usage();

            let base_amount = if total_usage > Decimal::ZERO {
                original_amount.prorate(usage, total_usage)?
            } else {
                // All-zero (or degenerate) usage period: equal split.
                original_amount.divide(unit_count)?
            };

            let welfare_discount = if unit.electric_welfare {
                welfare.per_unit
            } else {
                Money::zero()
            };
            let voucher_discount = if unit.electric_voucher {
                voucher.per_unit
            } else {
                Money::zero()
            };

            let tv_fee = match request.tv_distribution_mode {
                TvDistributionMode::Equal => equal_tv_share,
                TvDistributionMode::Individual if unit.has_tv => individual_tv_fee,
                TvDistributionMode::Individual => Money::zero(),
            };

            let final_amount =
                (base_amount - welfare_discount - voucher_discount + tv_fee).floor_at_zero();
            let charged_amount = final_amount.round_up_to_ten();

            details.push(ElectricBillDetail {
                unit_id: unit.id,
                snapshot: UnitSnapshot::capture(unit),
                usage,
                base_amount,
                welfare_discount,
                voucher_discount,
                tv_fee,
                final_amount,
                charged_amount,
            });
        }

        Ok(ElectricBill {
            id: ElectricBillId::new_v7(),
            period: request.period,
            floor_id: request.floor_id,
            total_amount,
            welfare_discount: welfare.total_applied,
            voucher_discount: voucher.total_applied,
            tv_fee_total,
            tv_distribution_mode: request.tv_distribution_mode,
            tv_units_count,
            months_count,
            entries: request.entries.clone(),
            readings: request.readings.clone(),
            details,
            created_at: Utc::now(),
        })
    }
}
