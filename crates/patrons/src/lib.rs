//! Patron registry.
//!
//! Patrons are immutable once registered and never removed; the registry is a
//! plain id lookup used by the lending facade.

pub mod patron;
pub mod registry;

pub use patron::{NewPatron, Patron};
pub use registry::PatronRegistry;
