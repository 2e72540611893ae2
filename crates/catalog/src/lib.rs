//! Catalog domain module.
//!
//! Bibliographic records for everything the library circulates, plus the
//! read-only search helpers over them. Availability is owned by the lending
//! ledger; catalog edits never touch it.

pub mod catalog;
pub mod entry;

pub use catalog::Catalog;
pub use entry::{CatalogEntry, ItemDetails, ItemEdit, ItemKind, NewItem};
