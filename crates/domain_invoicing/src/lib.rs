//! Invoice combination and payment reconciliation
//!
//! This crate turns recorded bill aggregates into per-unit invoices and
//! tracks payments against them:
//!
//! - [`InvoiceCombiner`] merges selected electric/water/common bills into one
//!   [`FinalInvoice`] per occupied unit, with ad hoc additional charges and
//!   combined memos.
//! - [`PaymentLedger`] records payments and computes per-unit balances, with
//!   carryover line items kept out of the cumulative billed tally.

pub mod combination;
pub mod error;
pub mod invoice;
pub mod ledger;
pub mod payment;

pub use combination::{
    BillRef, CombinationItem, CombineRequest, InvoiceCombination, InvoiceCombiner,
    UnitAdditionalData,
};
pub use error::InvoicingError;
pub use invoice::{AdditionalCharge, ChargeKind, CommonLineItem, FinalInvoice};
pub use ledger::{BalanceReportRow, PaymentLedger, UnitBalance};
pub use payment::{Payment, PaymentMethod, PaymentRequest};
