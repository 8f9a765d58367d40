//! Allocation domain errors

use core_kernel::{BillingMonth, MoneyError, PeriodError};
use thiserror::Error;

/// Errors that can occur in the allocation domain
#[derive(Debug, Error)]
pub enum AllocationError {
    /// Missing or invalid required input, rejected before any mutation
    #[error("Validation error: {0}")]
    Validation(String),

    /// A bill for the period already exists and overwrite was not requested
    ///
    /// Carries the existing record's identity so a caller can prompt for
    /// confirmation and retry with overwrite set.
    #[error("A bill for {period} already exists: {existing}")]
    DuplicatePeriod {
        existing: String,
        period: BillingMonth,
    },

    /// Referenced bill does not exist
    #[error("Bill not found: {0}")]
    BillNotFound(String),

    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    #[error("Period error: {0}")]
    Period(#[from] PeriodError),
}

impl AllocationError {
    pub fn validation(message: impl Into<String>) -> Self {
        AllocationError::Validation(message.into())
    }
}
