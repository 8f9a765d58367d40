//! Default charge amounts
//!
//! Engines never reach into ambient settings storage; the recognized
//! defaults are carried in a [`ChargeDefaults`] value passed into each
//! calculation call.

use core_kernel::Money;
use serde::{Deserialize, Serialize};

/// Per-unit default amounts used when a period supplies no explicit input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeDefaults {
    /// Monthly TV-service fee per subscribed unit
    #[serde(default, with = "core_kernel::money::lenient")]
    pub tv_fee: Money,
    /// Per-unit electric welfare discount, per billed month
    #[serde(default, with = "core_kernel::money::lenient")]
    pub electric_welfare_amount: Money,
    /// Per-unit electric voucher discount, per billed month
    #[serde(default, with = "core_kernel::money::lenient")]
    pub electric_voucher_amount: Money,
    /// Per-unit water welfare discount, per period
    #[serde(default, with = "core_kernel::money::lenient")]
    pub water_welfare_amount: Money,
}

impl Default for ChargeDefaults {
    fn default() -> Self {
        Self {
            tv_fee: Money::from_i64(2500),
            electric_welfare_amount: Money::zero(),
            electric_voucher_amount: Money::zero(),
            water_welfare_amount: Money::zero(),
        }
    }
}
