use serde_json::Value;

/// Notification delivered to observers of a store key when its entry changes.
#[derive(Debug, Clone)]
pub enum StoreChange {
    Set(Value),
    Removed,
}
