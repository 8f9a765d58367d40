//! Payment ledger and balance calculation
//!
//! The ledger holds registered invoice combinations and the payments made
//! against them. Balance arithmetic spans every invoice a unit has ever
//! received, not just one combination, so a resident's standing reflects the
//! full history.
//!
//! # Invariants
//!
//! - A payment always references an existing (combination, unit) invoice at
//!   the time it is recorded.
//! - Deleting a combination removes its owned invoices but never its
//!   payments; already-received money does not disappear with a paperwork
//!   redo.
//! - Carryover charges never enter the cumulative billed tally.

use core_kernel::{CombinationId, Money, PaymentId, UnitId};
use std::collections::HashMap;
use tracing::info;

use crate::combination::InvoiceCombination;
use crate::error::InvoicingError;
use crate::payment::{Payment, PaymentRequest};

/// Billed/paid standing for one unit across all its invoices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitBalance {
    /// Cumulative billed amount, carryover lines excluded
    pub billed: Money,
    /// Sum of recorded payments
    pub paid: Money,
    /// billed − paid
    pub balance: Money,
    /// Net carryover recorded on the unit's invoices, for audit
    pub carryover_total: Money,
}

/// One row of the building-wide validation report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceReportRow {
    pub unit_id: UnitId,
    pub unit_name: String,
    pub billed: Money,
    pub paid: Money,
    pub balance: Money,
    pub carryover_total: Money,
}

/// Registered combinations and the payments applied against them
#[derive(Debug, Default)]
pub struct PaymentLedger {
    combinations: HashMap<CombinationId, InvoiceCombination>,
    payments: HashMap<PaymentId, Payment>,
}

impl PaymentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a combination together with its invoices
    pub fn register_combination(&mut self, combination: InvoiceCombination) -> CombinationId {
        let id = combination.id;
        info!(%id, name = %combination.name, invoices = combination.invoices.len(),
            "Combination registered");
        self.combinations.insert(id, combination);
        id
    }

    pub fn combination(&self, id: CombinationId) -> Option<&InvoiceCombination> {
        self.combinations.get(&id)
    }

    pub fn combinations(&self) -> impl Iterator<Item = &InvoiceCombination> {
        self.combinations.values()
    }

    /// Deletes a combination and its owned invoices; payments survive
    pub fn delete_combination(&mut self, id: CombinationId) -> Result<(), InvoicingError> {
        self.combinations
            .remove(&id)
            .map(|_| info!(%id, "Combination deleted"))
            .ok_or_else(|| InvoicingError::CombinationNotFound(id.to_string()))
    }

    /// Records a payment after checking the referenced invoice exists
    ///
    /// # Errors
    ///
    /// Returns [`InvoicingError::CombinationNotFound`] or
    /// [`InvoicingError::InvoiceNotFound`] when the reference does not
    /// resolve.
    pub fn add_payment(&mut self, request: &PaymentRequest) -> Result<PaymentId, InvoicingError> {
        self.require_invoice(request.combination_id, request.unit_id)?;

        let payment = Payment::from_request(request);
        let id = payment.id;
        info!(%id, unit = %payment.unit_id, amount = %payment.amount, "Payment recorded");
        self.payments.insert(id, payment);
        Ok(id)
    }

    /// Replaces an existing payment's details from a fresh request
    pub fn update_payment(
        &mut self,
        id: PaymentId,
        request: &PaymentRequest,
    ) -> Result<(), InvoicingError> {
        if !self.payments.contains_key(&id) {
            return Err(InvoicingError::PaymentNotFound(id.to_string()));
        }
        self.require_invoice(request.combination_id, request.unit_id)?;

        let payment = self.payments.get_mut(&id).ok_or_else(|| {
            InvoicingError::PaymentNotFound(id.to_string())
        })?;
        payment.combination_id = request.combination_id;
        payment.unit_id = request.unit_id;
        payment.payment_date = request.payment_date;
        payment.amount = request.payment_amount;
        payment.method = request.payment_method;
        payment.memo = request.memo.clone();
        info!(%id, "Payment updated");
        Ok(())
    }

    pub fn delete_payment(&mut self, id: PaymentId) -> Result<(), InvoicingError> {
        self.payments
            .remove(&id)
            .map(|_| info!(%id, "Payment deleted"))
            .ok_or_else(|| InvoicingError::PaymentNotFound(id.to_string()))
    }

    pub fn payment(&self, id: PaymentId) -> Option<&Payment> {
        self.payments.get(&id)
    }

    pub fn payments_for_unit(&self, unit_id: UnitId) -> impl Iterator<Item = &Payment> {
        self.payments.values().filter(move |p| p.unit_id == unit_id)
    }

    /// Computes a unit's standing across all registered invoices
    pub fn unit_balance(&self, unit_id: UnitId) -> UnitBalance {
        let mut billed = Money::zero();
        let mut carryover_total = Money::zero();
        for combination in self.combinations.values() {
            if let Some(invoice) = combination.invoice_for(unit_id) {
                billed = billed + invoice.billed_amount();
                carryover_total = carryover_total + invoice.carryover_total();
            }
        }
        let paid: Money = self.payments_for_unit(unit_id).map(|p| p.amount).sum();

        UnitBalance {
            billed,
            paid,
            balance: billed - paid,
            carryover_total,
        }
    }

    /// Building-wide audit report, one row per billed unit, sorted by unit
    /// name
    pub fn validation_report(&self) -> Vec<BalanceReportRow> {
        let mut names: HashMap<UnitId, String> = HashMap::new();
        for combination in self.combinations.values() {
            for invoice in &combination.invoices {
                names
                    .entry(invoice.unit_id)
                    .or_insert_with(|| invoice.snapshot.unit_name.clone());
            }
        }

        let mut rows: Vec<BalanceReportRow> = names
            .into_iter()
            .map(|(unit_id, unit_name)| {
                let balance = self.unit_balance(unit_id);
                BalanceReportRow {
                    unit_id,
                    unit_name,
                    billed: balance.billed,
                    paid: balance.paid,
                    balance: balance.balance,
                    carryover_total: balance.carryover_total,
                }
            })
            .collect();
        rows.sort_by(|a, b| a.unit_name.cmp(&b.unit_name));
        rows
    }

    fn require_invoice(
        &self,
        combination_id: CombinationId,
        unit_id: UnitId,
    ) -> Result<(), InvoicingError> {
        let combination = self
            .combinations
            .get(&combination_id)
            .ok_or_else(|| InvoicingError::CombinationNotFound(combination_id.to_string()))?;
        if combination.invoice_for(unit_id).is_none() {
            return Err(InvoicingError::InvoiceNotFound {
                combination_id: combination_id.to_string(),
                unit_id: unit_id.to_string(),
            });
        }
        Ok(())
    }
}
