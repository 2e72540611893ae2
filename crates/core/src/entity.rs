//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

/// Flat, tabular serialization contract.
///
/// The first field is always the entity id. Consumers (CSV export, table
/// rendering) rely on field order being stable per entity type.
pub trait Record {
    fn to_record(&self) -> Vec<String>;
}

/// Encode a boolean flag the way tabular records do (`1` / `0`).
pub fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}
