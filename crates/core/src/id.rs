//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Stock-keeping unit: the unique, immutable identity of a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sku(String);

/// Identifier of a customer order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderId(String);

/// Production lot (batch) number, used to stop recalled or expired stock.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LotId(String);

macro_rules! impl_string_newtype {
    ($t:ident, $name:literal) => {
        impl $t {
            /// Parse and validate an identifier (trimmed, non-empty).
            pub fn parse(raw: impl AsRef<str>) -> Result<Self, DomainError> {
                let trimmed = raw.as_ref().trim();
                if trimmed.is_empty() {
                    return Err(DomainError::invalid(concat!($name, " cannot be empty")));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $t {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

impl_string_newtype!(Sku, "sku");
impl_string_newtype!(OrderId, "order_id");
impl_string_newtype!(LotId, "lot_id");

impl OrderId {
    /// Generate a fresh order id.
    ///
    /// Uses UUIDv7 (time-ordered) so generated ids sort by creation time. Prefer
    /// passing ids explicitly in tests for determinism.
    pub fn generate() -> Self {
        Self(format!("ORD-{}", Uuid::now_v7().simple()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sku_is_trimmed() {
        let sku: Sku = "  SKU001 ".parse().unwrap();
        assert_eq!(sku.as_str(), "SKU001");
    }

    #[test]
    fn blank_ids_are_rejected() {
        assert!(matches!(Sku::parse("   "), Err(DomainError::InvalidValue(_))));
        assert!(matches!(OrderId::parse(""), Err(DomainError::InvalidValue(_))));
    }

    #[test]
    fn generated_order_ids_are_unique_and_prefixed() {
        let a = OrderId::generate();
        let b = OrderId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("ORD-"));
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let ok: Sku = serde_json::from_str("\"A1\"").unwrap();
        assert_eq!(ok.as_str(), "A1");
        assert!(serde_json::from_str::<Sku>("\"  \"").is_err());
    }
}
