//! Allocation Domain - Shared Utility Cost Proration
//!
//! This crate implements the calculation core that splits a building's shared
//! utility costs among its units for a billing period:
//!
//! - **Electric**: per floor, prorated by metered usage, with welfare and
//!   voucher discounts and a TV-service surcharge
//! - **Water**: building-wide, prorated by resident count, with a welfare
//!   discount and per-period unit exclusions
//! - **Common**: building-wide, split by residents or equally per unit
//!
//! All three engines share the same shape: resolve the discounts actually
//! applied, reconstruct the pre-discount total (declared totals are net of
//! discounts), prorate it, then round each unit's final amount up to the
//! nearest 10 to get the charged amount.
//!
//! Engines are pure: unit attributes and charge defaults are passed in, and a
//! fully-computed bill aggregate comes out. Recording the aggregate - with
//! the duplicate-period uniqueness invariant and atomic replace - is the
//! [`BillStore`]'s job.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_allocation::{BillStore, ChargeDefaults, ElectricAllocationEngine};
//!
//! let engine = ElectricAllocationEngine::new(&defaults);
//! let bill = engine.calculate(&units, &request)?;
//! store.record_electric(bill, request.overwrite)?;
//! ```

pub mod common;
pub mod discount;
pub mod electric;
pub mod error;
pub mod settings;
pub mod store;
pub mod unit;
pub mod water;

pub use common::{CommonBill, CommonBillDetail, CommonBillRequest, CommonCostAllocationEngine, DistributionMethod};
pub use electric::{
    ElectricAllocationEngine, ElectricBill, ElectricBillDetail, ElectricBillRequest, MeterReading,
    MonthlyCostEntry, TvDistributionMode,
};
pub use error::AllocationError;
pub use settings::ChargeDefaults;
pub use store::BillStore;
pub use unit::{Unit, UnitSnapshot};
pub use water::{WaterAllocationEngine, WaterBill, WaterBillDetail, WaterBillRequest};
