//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every user-facing failure of the engine is one of these variants. An empty
/// heap or ring is *not* an error; those queries return `Option`/empty results.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Unknown SKU or order id, or an order that is already terminal.
    #[error("not found: {0}")]
    NotFound(String),

    /// A SKU or order id that already exists on create.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// A value failed validation (negative stock, non-positive quantity, ...).
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Dispatch asked for more units than are on hand.
    #[error("insufficient stock for {sku}: requested {requested}, available {available}")]
    InsufficientStock {
        sku: String,
        requested: i64,
        available: i64,
    },

    /// The derived indices disagree with the product store.
    ///
    /// This is a bug class, not a user error: the mutation gateway guarantees it
    /// cannot happen, so seeing it means an invariant was broken.
    #[error("index consistency check failed: {0}")]
    Inconsistency(String),
}

impl DomainError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn duplicate(key: impl Into<String>) -> Self {
        Self::DuplicateKey(key.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }

    pub fn insufficient(sku: impl Into<String>, requested: i64, available: i64) -> Self {
        Self::InsufficientStock {
            sku: sku.into(),
            requested,
            available,
        }
    }

    pub fn inconsistency(msg: impl Into<String>) -> Self {
        Self::Inconsistency(msg.into())
    }

    /// Stable machine-readable code (used by the HTTP layer).
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::NotFound(_) => "not_found",
            DomainError::DuplicateKey(_) => "duplicate_key",
            DomainError::InvalidValue(_) => "invalid_value",
            DomainError::InsufficientStock { .. } => "insufficient_stock",
            DomainError::Inconsistency(_) => "inconsistency",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_stock_message_names_quantities() {
        let err = DomainError::insufficient("A1", 5, 2);
        assert_eq!(
            err.to_string(),
            "insufficient stock for A1: requested 5, available 2"
        );
        assert_eq!(err.code(), "insufficient_stock");
    }
}
