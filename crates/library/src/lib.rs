//! `libris-library`: the lending facade.
//!
//! Composes the catalog, patron registry, lending ledger and notification log
//! behind the operations an interactive front end calls with already-parsed
//! identifiers. Every operation returns a typed `DomainResult`.

pub mod config;
pub mod library;
pub mod snapshot;

pub use config::LibraryConfig;
pub use library::{Library, ReturnReceipt};
pub use snapshot::LibrarySnapshot;

pub use libris_catalog::{CatalogEntry, ItemDetails, ItemEdit, ItemKind, NewItem};
pub use libris_core::{
    CalendarDate, Clock, DomainError, DomainResult, FixedClock, ItemId, LoanId, PatronId,
    ReservationId, SystemClock,
};
pub use libris_events::{Notification, NotificationCategory};
pub use libris_lending::{FulfillmentPolicy, LendingPolicy, Loan, Reservation};
pub use libris_patrons::{NewPatron, Patron};
