//! `libris-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the catalog,
//! patron, and lending crates (no IO).

pub mod aggregate;
pub mod calendar;
pub mod entity;
pub mod error;
pub mod id;
pub mod sequence;
pub mod value_object;

pub use aggregate::Aggregate;
pub use calendar::{CalendarDate, Clock, FixedClock, SystemClock};
pub use entity::{Entity, Record, flag};
pub use error::{DomainError, DomainResult};
pub use id::{ItemId, LoanId, PatronId, ReservationId};
pub use sequence::IdSequence;
pub use value_object::ValueObject;
