use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::key_value_store::KeyValueStore;
use crate::key_value_store::StoreError;
use crate::store_change::StoreChange;

/// Typed accessor over one key of a shared [`KeyValueStore`]. Owns no data;
/// the default-value policy lives here so every reader agrees on the value of
/// a key that has never been set.
pub struct PersistedFlag<V> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    default: V,
}

impl<V> PersistedFlag<V>
where
    V: Serialize + DeserializeOwned + Clone + Send + 'static,
{
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, default: V) -> Self {
        Self {
            store,
            key: key.into(),
            default,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored value if present and decodable as `V`, otherwise the default.
    /// Never fails.
    pub fn get(&self) -> V {
        match self.store.get(&self.key) {
            Some(raw) => decode_or(raw, &self.key, &self.default),
            None => self.default.clone(),
        }
    }

    pub fn set(&self, value: V) -> Result<(), StoreError> {
        let raw = serde_json::to_value(value)?;
        self.store.set(&self.key, raw)
    }

    /// Removes the stored entry; subsequent [`get`](Self::get) calls return
    /// the default again.
    pub fn reset(&self) -> Result<(), StoreError> {
        self.store.remove(&self.key)
    }

    /// Stream of effective values for this flag: the value at subscription
    /// time first, then one element per change of the underlying entry. A
    /// removal emits the default. Never emits errors; ends only when the
    /// store is torn down.
    pub fn changes(&self) -> FlagChanges<V> {
        let (current, receiver) = self.store.observe(&self.key);
        let seed = match current {
            Some(raw) => decode_or(raw, &self.key, &self.default),
            None => self.default.clone(),
        };
        FlagChanges {
            seed: Some(seed),
            key: self.key.clone(),
            default: self.default.clone(),
            receiver,
        }
    }
}

fn decode_or<V>(raw: serde_json::Value, key: &str, default: &V) -> V
where
    V: DeserializeOwned + Clone,
{
    match serde_json::from_value(raw) {
        Ok(value) => value,
        Err(err) => {
            log::debug!("stored value for {} has wrong shape, using default: {}", key, err);
            default.clone()
        }
    }
}

/// Change stream handed out by [`PersistedFlag::changes`]. Dropping it
/// unsubscribes.
pub struct FlagChanges<V> {
    seed: Option<V>,
    key: String,
    default: V,
    receiver: broadcast::Receiver<StoreChange>,
}

impl<V> FlagChanges<V>
where
    V: DeserializeOwned + Clone + Send + 'static,
{
    pub async fn recv(&mut self) -> Option<V> {
        if let Some(seed) = self.seed.take() {
            return Some(seed);
        }
        loop {
            match self.receiver.recv().await {
                Ok(StoreChange::Set(raw)) => {
                    return Some(decode_or(raw, &self.key, &self.default))
                }
                Ok(StoreChange::Removed) => return Some(self.default.clone()),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::warn!("flag stream for {} lagged, skipped {} changes", self.key, skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub fn into_stream(self) -> impl futures::Stream<Item = V> + Send {
        futures::stream::unfold(self, |mut changes| async move {
            changes.recv().await.map(|value| (value, changes))
        })
    }
}
