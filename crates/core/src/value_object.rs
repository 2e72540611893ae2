//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values; to
/// "modify" one, build a new one (see `CalendarDate::add_days`).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
