//! Final per-unit invoices
//!
//! A [`FinalInvoice`] rolls the charged amounts of the selected bills up into
//! one document per unit, together with ad hoc additional charges and memos.
//! Carryover charges are tagged with an explicit [`ChargeKind`] instead of
//! being recognised by description text, so the balance calculator can
//! dispatch on a closed enumeration.

use core_kernel::{CombinationId, InvoiceId, Money, UnitId};
use domain_allocation::UnitSnapshot;
use serde::{Deserialize, Serialize};

/// Classification of an additional invoice charge
///
/// Carryover variants fold a prior cycle's balance into this invoice. They
/// count toward the invoice total the unit is asked to pay, but not toward
/// the cumulative "billed" tally, which would otherwise double count the
/// same debt every reconciliation cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargeKind {
    /// A genuinely new charge
    #[default]
    Ordinary,
    /// Unpaid balance carried forward from a prior cycle
    CarryoverDebit,
    /// Overpayment carried forward from a prior cycle
    CarryoverCredit,
}

impl ChargeKind {
    pub fn is_carryover(self) -> bool {
        matches!(self, Self::CarryoverDebit | Self::CarryoverCredit)
    }
}

/// An ad hoc per-unit charge attached to an invoice
///
/// A carryover credit carries a negative amount; ordinary charges and
/// carryover debits are positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalCharge {
    #[serde(default)]
    pub kind: ChargeKind,
    pub description: String,
    #[serde(default, with = "core_kernel::money::lenient")]
    pub amount: Money,
}

/// One common charge shown as its own invoice line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonLineItem {
    pub description: String,
    pub amount: Money,
}

/// The combined invoice for one unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalInvoice {
    pub id: InvoiceId,
    /// Owning combination
    pub combination_id: CombinationId,
    pub unit_id: UnitId,
    pub snapshot: UnitSnapshot,
    /// Sum of electric charged amounts across the selected bills
    pub electric_amount: Money,
    /// Sum of water charged amounts across the selected bills
    pub water_amount: Money,
    /// Sum of common charged amounts across the selected bills
    pub common_amount: Money,
    /// Common charges broken out per selected bill for display
    pub common_details: Vec<CommonLineItem>,
    pub additional_charges: Vec<AdditionalCharge>,
    /// Combination-level memo (default memo merged with the user memo)
    pub memo: Option<String>,
    /// Memo specific to this unit
    pub unit_memo: Option<String>,
    /// What the unit is asked to pay for this invoice
    pub total_amount: Money,
}

impl FinalInvoice {
    /// Sum of all additional charges, carryover included
    pub fn additional_total(&self) -> Money {
        self.additional_charges.iter().map(|c| c.amount).sum()
    }

    /// Sum of carryover charges only
    pub fn carryover_total(&self) -> Money {
        self.additional_charges
            .iter()
            .filter(|c| c.kind.is_carryover())
            .map(|c| c.amount)
            .sum()
    }

    /// Contribution to the cumulative billed tally: utility charges plus
    /// ordinary additional charges, with carryover lines left out
    pub fn billed_amount(&self) -> Money {
        let ordinary: Money = self
            .additional_charges
            .iter()
            .filter(|c| !c.kind.is_carryover())
            .map(|c| c.amount)
            .sum();
        self.electric_amount + self.water_amount + self.common_amount + ordinary
    }
}
