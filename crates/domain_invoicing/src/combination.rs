//! Invoice combination
//!
//! The combiner takes a selection of recorded bills, possibly spanning
//! several periods and types, and produces one [`FinalInvoice`] per occupied
//! unit. It only reads recorded bill aggregates; all allocation arithmetic
//! happened when the bills were calculated.

use chrono::{DateTime, Utc};
use core_kernel::{
    BillingMonth, CombinationId, CommonBillId, ElectricBillId, InvoiceId, Money, UnitId,
    WaterBillId,
};
use domain_allocation::{BillStore, Unit, UnitSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::error::InvoicingError;
use crate::invoice::{AdditionalCharge, CommonLineItem, FinalInvoice};

/// A typed reference to one recorded bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillRef {
    Electric(ElectricBillId),
    Water(WaterBillId),
    Common(CommonBillId),
}

/// One selected bill within a combination request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinationItem {
    #[serde(flatten)]
    pub bill: BillRef,
    pub period: BillingMonth,
    /// Display label override; common bills fall back to their own
    /// description when absent
    #[serde(default)]
    pub description: Option<String>,
}

/// Ad hoc charges and memo supplied for a single unit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitAdditionalData {
    #[serde(default)]
    pub charges: Vec<AdditionalCharge>,
    #[serde(default)]
    pub memo: Option<String>,
}

/// Request to combine selected bills into per-unit invoices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombineRequest {
    pub name: String,
    #[serde(default)]
    pub memo: Option<String>,
    pub items: Vec<CombinationItem>,
    #[serde(default)]
    pub unit_additional_data: HashMap<UnitId, UnitAdditionalData>,
}

/// A named grouping of selected bills and the invoices produced from them
///
/// The combination owns its invoices; deleting it removes them. Payments
/// recorded against the invoices have an independent lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceCombination {
    pub id: CombinationId,
    pub name: String,
    pub memo: Option<String>,
    pub items: Vec<CombinationItem>,
    pub invoices: Vec<FinalInvoice>,
    pub created_at: DateTime<Utc>,
}

impl InvoiceCombination {
    /// Finds the invoice for a unit, if one was produced
    pub fn invoice_for(&self, unit_id: UnitId) -> Option<&FinalInvoice> {
        self.invoices.iter().find(|i| i.unit_id == unit_id)
    }
}

/// Builds per-unit invoices from recorded bills
pub struct InvoiceCombiner<'a> {
    store: &'a BillStore,
}

impl<'a> InvoiceCombiner<'a> {
    pub fn new(store: &'a BillStore) -> Self {
        Self { store }
    }

    /// Combines the selected bills into one invoice per occupied unit
    ///
    /// `default_memo` is the building-wide memo from settings; when the
    /// request carries its own memo the two are joined, default first,
    /// separated by a blank line.
    ///
    /// # Errors
    ///
    /// Returns [`InvoicingError::Validation`] when the name is blank and
    /// [`InvoicingError::BillNotFound`] when a selected bill does not
    /// resolve, before any invoice is produced.
    pub fn combine(
        &self,
        units: &[Unit],
        default_memo: Option<&str>,
        request: &CombineRequest,
    ) -> Result<InvoiceCombination, InvoicingError> {
        if request.name.trim().is_empty() {
            return Err(InvoicingError::validation("combination name is required"));
        }
        // Resolve every reference up front so a bad selection fails before
        // any invoice exists.
        for item in &request.items {
            self.resolve(item)?;
        }

        let combination_id = CombinationId::new_v7();
        let memo = combine_memos(default_memo, request.memo.as_deref());
        let occupied: Vec<&Unit> = units.iter().filter(|u| !u.is_vacant).collect();

        debug!(
            %combination_id,
            name = %request.name,
            items = request.items.len(),
            units = occupied.len(),
            "Combining invoices"
        );

        let mut invoices = Vec::with_capacity(occupied.len());
        for unit in occupied {
            let mut electric_amount = Money::zero();
            let mut water_amount = Money::zero();
            let mut common_amount = Money::zero();
            let mut common_details = Vec::new();

            for item in &request.items {
                match item.bill {
                    BillRef::Electric(id) => {
                        let bill = self.store.electric_bill(id).ok_or_else(|| {
                            InvoicingError::BillNotFound(id.to_string())
                        })?;
                        if let Some(detail) = bill.detail_for(unit.id) {
                            electric_amount = electric_amount + detail.charged_amount;
                        }
                    }
                    BillRef::Water(id) => {
                        let bill = self.store.water_bill(id).ok_or_else(|| {
                            InvoicingError::BillNotFound(id.to_string())
                        })?;
                        if let Some(detail) = bill.detail_for(unit.id) {
                            water_amount = water_amount + detail.charged_amount;
                        }
                    }
                    BillRef::Common(id) => {
                        let bill = self.store.common_bill(id).ok_or_else(|| {
                            InvoicingError::BillNotFound(id.to_string())
                        })?;
                        if let Some(detail) = bill.detail_for(unit.id) {
                            common_amount = common_amount + detail.charged_amount;
                            common_details.push(CommonLineItem {
                                description: item
                                    .description
                                    .clone()
                                    .unwrap_or_else(|| bill.description.clone()),
                                amount: detail.charged_amount,
                            });
                        }
                    }
                }
            }

            let extra = request.unit_additional_data.get(&unit.id);
            let additional_charges: Vec<AdditionalCharge> =
                extra.map(|d| d.charges.clone()).unwrap_or_default();
            let additional_total: Money =
                additional_charges.iter().map(|c| c.amount).sum();
            let unit_memo = extra.and_then(|d| d.memo.clone());

            invoices.push(FinalInvoice {
                id: InvoiceId::new_v7(),
                combination_id,
                unit_id: unit.id,
                snapshot: UnitSnapshot::capture(unit),
                electric_amount,
                water_amount,
                common_amount,
                common_details,
                additional_charges,
                memo: memo.clone(),
                unit_memo,
                total_amount: electric_amount + water_amount + common_amount + additional_total,
            });
        }

        Ok(InvoiceCombination {
            id: combination_id,
            name: request.name.clone(),
            memo,
            items: request.items.clone(),
            invoices,
            created_at: Utc::now(),
        })
    }

    fn resolve(&self, item: &CombinationItem) -> Result<(), InvoicingError> {
        let found = match item.bill {
            BillRef::Electric(id) => self.store.electric_bill(id).is_some(),
            BillRef::Water(id) => self.store.water_bill(id).is_some(),
            BillRef::Common(id) => self.store.common_bill(id).is_some(),
        };
        if found {
            Ok(())
        } else {
            let id = match item.bill {
                BillRef::Electric(id) => id.to_string(),
                BillRef::Water(id) => id.to_string(),
                BillRef::Common(id) => id.to_string(),
            };
            Err(InvoicingError::BillNotFound(id))
        }
    }
}

/// Joins the settings default memo with the request memo, default first,
/// blank-line separated when both are present
fn combine_memos(default_memo: Option<&str>, user_memo: Option<&str>) -> Option<String> {
    let default_memo = default_memo.filter(|m| !m.trim().is_empty());
    let user_memo = user_memo.filter(|m| !m.trim().is_empty());
    match (default_memo, user_memo) {
        (Some(d), Some(u)) => Some(format!("{d}\n\n{u}")),
        (Some(d), None) => Some(d.to_string()),
        (None, Some(u)) => Some(u.to_string()),
        (None, None) => None,
    }
}
