//! Payment records
//!
//! A payment is tied to a (combination, unit) pair rather than to a specific
//! invoice id, matching how deposits arrive: a resident pays against the
//! latest combined notice. Payments have an independent lifecycle and are
//! never cascaded away by invoice recomputation.

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{CombinationId, Money, PaymentId, UnitId};
use serde::{Deserialize, Serialize};

/// How a payment was made
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    BankTransfer,
    Cash,
    Card,
    Other,
}

/// Request contract for recording or updating a payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub combination_id: CombinationId,
    pub unit_id: UnitId,
    pub payment_date: NaiveDate,
    #[serde(default, with = "core_kernel::money::lenient")]
    pub payment_amount: Money,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub memo: Option<String>,
}

/// A recorded payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub combination_id: CombinationId,
    pub unit_id: UnitId,
    pub payment_date: NaiveDate,
    pub amount: Money,
    pub method: PaymentMethod,
    pub memo: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn from_request(request: &PaymentRequest) -> Self {
        Self {
            id: PaymentId::new_v7(),
            combination_id: request.combination_id,
            unit_id: request.unit_id,
            payment_date: request.payment_date,
            amount: request.payment_amount,
            method: request.payment_method,
            memo: request.memo.clone(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_parses_lenient_amount_and_default_method() {
        // Ids travel as bare UUIDs on the wire; the display prefix is
        // presentation only.
        let json = format!(
            r#"{{
                "combination_id": "{}",
                "unit_id": "{}",
                "payment_date": "2025-04-25",
                "payment_amount": "46,750"
            }}"#,
            CombinationId::new_v7().as_uuid(),
            UnitId::new().as_uuid(),
        );
        let request: PaymentRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request.payment_amount, Money::from_i64(46_750));
        assert_eq!(request.payment_method, PaymentMethod::BankTransfer);
    }
}
