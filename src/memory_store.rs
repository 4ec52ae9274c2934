use std::collections::HashMap;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::key_value_store::KeyValueStore;
use crate::key_value_store::StoreError;
use crate::store_change::StoreChange;

// Observers that fall further behind than this skip ahead to the oldest
// retained change; there is no catch-up log.
const CHANGE_BUFFER: usize = 64;

/// In-process [`KeyValueStore`] with keyed change notification. Never returns
/// [`StoreError`]; the error surface exists for fallible backends.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, Value>,
    watchers: HashMap<String, broadcast::Sender<StoreChange>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Inner {
    fn notify(&mut self, key: &str, change: StoreChange) {
        if let Some(sender) = self.watchers.get(key) {
            if sender.send(change).is_err() {
                // Every receiver for this key is gone.
                self.watchers.remove(key);
            }
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.inner.lock().entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if inner.entries.get(key) == Some(&value) {
            return Ok(());
        }
        log::debug!("store set {}", key);
        inner.entries.insert(key.to_owned(), value.clone());
        inner.notify(key, StoreChange::Set(value));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if inner.entries.remove(key).is_some() {
            log::debug!("store remove {}", key);
            inner.notify(key, StoreChange::Removed);
        }
        Ok(())
    }

    fn observe(&self, key: &str) -> (Option<Value>, broadcast::Receiver<StoreChange>) {
        let mut inner = self.inner.lock();
        let current = inner.entries.get(key).cloned();
        let receiver = match inner.watchers.get(key) {
            Some(sender) => sender.subscribe(),
            None => {
                let (sender, receiver) = broadcast::channel(CHANGE_BUFFER);
                inner.watchers.insert(key.to_owned(), sender);
                receiver
            }
        };
        (current, receiver)
    }
}
