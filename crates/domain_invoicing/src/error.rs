//! Invoicing error types

use thiserror::Error;

/// Errors raised while combining invoices or mutating the payment ledger
#[derive(Debug, Error)]
pub enum InvoicingError {
    /// Request failed validation before any mutation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A selected bill reference does not resolve to a recorded bill
    #[error("Bill not found: {0}")]
    BillNotFound(String),

    /// The referenced combination does not exist
    #[error("Combination not found: {0}")]
    CombinationNotFound(String),

    /// The combination exists but holds no invoice for the unit
    #[error("No invoice for unit {unit_id} in combination {combination_id}")]
    InvoiceNotFound {
        combination_id: String,
        unit_id: String,
    },

    /// The referenced payment does not exist
    #[error("Payment not found: {0}")]
    PaymentNotFound(String),

    /// Monetary arithmetic error
    #[error("Money error: {0}")]
    Money(#[from] core_kernel::MoneyError),

    /// Error propagated from the allocation layer
    #[error("Allocation error: {0}")]
    Allocation(#[from] domain_allocation::AllocationError),
}

impl InvoicingError {
    /// Convenience constructor for validation failures
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
