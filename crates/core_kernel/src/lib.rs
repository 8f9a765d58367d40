//! Core Kernel - Foundational types for the shared utility billing engine
//!
//! This crate provides the building blocks used across the allocation and
//! invoicing domains:
//! - Money with precise decimal arithmetic and the round-up-to-10 charging rule
//! - Billing period (year-month) handling
//! - Strongly-typed identifiers

pub mod error;
pub mod identifiers;
pub mod money;
pub mod period;

pub use error::CoreError;
pub use identifiers::{
    CombinationId, CommonBillId, ElectricBillId, FloorId, InvoiceId, PaymentId, UnitId,
    WaterBillId,
};
pub use money::{Money, MoneyError};
pub use period::{BillingMonth, PeriodError};
