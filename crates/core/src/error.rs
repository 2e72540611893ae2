//! Domain error model.

use thiserror::Error;

use crate::id::{ItemId, LoanId, PatronId};

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every operation reports failures through this type and performs all of its
/// checks before mutating anything, so an `Err` always means "nothing changed".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. blank title, zero-day loan period).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Unknown patron, item, loan or reservation id.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    /// The operation clashes with current lending state (item on loan,
    /// reservation pending, active loan blocking removal, ...).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The loan is closed; returned loans are frozen history.
    #[error("loan {0} has already been returned")]
    AlreadyReturned(LoanId),

    /// The patron already waits for this item.
    #[error("patron {patron_id} already holds an active reservation for item {item_id}")]
    DuplicateReservation { patron_id: PatronId, item_id: ItemId },

    /// Reserve was called on an item that can simply be borrowed.
    #[error("item {0} is available; borrow it directly instead of reserving")]
    DirectlyAvailable(ItemId),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(entity: &'static str, id: u64) -> Self {
        Self::NotFound { entity, id }
    }
}
