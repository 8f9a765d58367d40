//! Strongly-typed identifiers for billing entities
//!
//! Newtype wrappers around UUIDs prevent a unit id from being handed to an
//! API expecting a bill id, which matters in the invoice combiner where four
//! kinds of record are cross-referenced.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates a new time-ordered identifier (v7)
            pub fn new_v7() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid_str = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Ok(Self(Uuid::parse_str(uuid_str)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

// Registry identifiers
define_id!(FloorId, "FLR");
define_id!(UnitId, "UNT");

// Bill aggregate identifiers
define_id!(ElectricBillId, "EBL");
define_id!(WaterBillId, "WBL");
define_id!(CommonBillId, "CBL");

// Invoicing identifiers
define_id!(CombinationId, "CMB");
define_id!(InvoiceId, "INV");
define_id!(PaymentId, "PAY");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_id_display_prefix() {
        let id = UnitId::new();
        assert!(id.to_string().starts_with("UNT-"));
    }

    #[test]
    fn test_id_parsing_with_and_without_prefix() {
        let original = ElectricBillId::new();
        let parsed: ElectricBillId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);

        let bare: ElectricBillId = original.as_uuid().to_string().parse().unwrap();
        assert_eq!(original, bare);
    }

    #[test]
    fn test_uuid_conversion() {
        let uuid = Uuid::new_v4();
        let id = PaymentId::from(uuid);
        let back: Uuid = id.into();
        assert_eq!(uuid, back);
    }
}
