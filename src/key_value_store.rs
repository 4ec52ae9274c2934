use serde_json::Value;
use tokio::sync::broadcast;

use crate::store_change::StoreChange;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("value not representable in the store: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Process-wide key-value namespace with per-key change notification.
///
/// Injected into [`crate::PersistedFlag`] rather than reached through a global,
/// so callers can swap in [`crate::MemoryStore`] for tests. Entries are raw
/// [`Value`]s; typing lives in the flag wrapper.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Snapshots the current entry and registers for subsequent changes of
    /// `key` in one step, so no write can fall between snapshot and
    /// registration.
    fn observe(&self, key: &str) -> (Option<Value>, broadcast::Receiver<StoreChange>);
}
