//! Process-wide logging setup shared by the libris binaries.

/// Tracing subscriber configuration.
pub mod tracing;

/// Install the global subscriber. Later calls are no-ops.
pub fn init() {
    tracing::init();
}
