//! Strongly-typed identifiers used across the domain.
//!
//! Every identifier wraps a positive integer handed out by an [`IdSequence`]
//! (see `sequence.rs`). Identifiers are never reused within one running instance.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a catalog entry (book, article, thesis, digital file).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

/// Identifier of a registered patron.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatronId(u64);

/// Identifier of a loan (permanent lending history record).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(u64);

/// Identifier of a reservation (waitlist entry).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(u64);

macro_rules! impl_sequence_newtype {
    ($t:ty, $entity:literal) => {
        impl $t {
            /// Human-readable entity name used in error messages.
            pub const ENTITY: &'static str = $entity;

            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> u64 {
                self.0
            }

            /// `NotFound` error naming this identifier.
            pub fn not_found(self) -> DomainError {
                DomainError::not_found(Self::ENTITY, self.0)
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u64> for $t {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for u64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| DomainError::invalid_id(format!("{} id: {}", $entity, e)))?;
                if value == 0 {
                    return Err(DomainError::invalid_id(format!("{} id must be positive", $entity)));
                }
                Ok(Self(value))
            }
        }
    };
}

impl_sequence_newtype!(ItemId, "item");
impl_sequence_newtype!(PatronId, "patron");
impl_sequence_newtype!(LoanId, "loan");
impl_sequence_newtype!(ReservationId, "reservation");
