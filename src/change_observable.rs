use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::subscription::Subscription;

// Subscribers lagging further than this skip ahead; the relay keeps no
// catch-up log of missed values.
const RELAY_BUFFER: usize = 64;

/// Single-slot broadcast relay for an externally driven value: one producer
/// calls [`publish`](Self::publish), any number of consumers hold
/// [`Subscription`]s. Clones share the same slot and subscriber set.
#[derive(Clone)]
pub struct ChangeObservable<V>
where
    V: Clone + Send + 'static,
{
    relay: Arc<Mutex<Relay<V>>>,
}

struct Relay<V> {
    recent: V,
    sender: broadcast::Sender<V>,
}

impl<V> ChangeObservable<V>
where
    V: Clone + Send + 'static,
{
    pub fn new(initial: V) -> Self {
        let (sender, _) = broadcast::channel(RELAY_BUFFER);
        Self {
            relay: Arc::new(Mutex::new(Relay {
                recent: initial,
                sender,
            })),
        }
    }

    /// Snapshot of the most recently published value. Always defined.
    pub fn recent_value(&self) -> V {
        self.relay.lock().recent.clone()
    }

    /// Updates the slot and fans `value` out to live subscribers. Infallible;
    /// with no subscribers it only updates the slot. Never blocks on slow
    /// consumers.
    pub fn publish(&self, value: V) {
        let mut relay = self.relay.lock();
        relay.recent = value.clone();
        let _ = relay.sender.send(value);
        log::trace!("published to {} subscribers", relay.sender.receiver_count());
    }

    /// New, independent subscription, seeded with the then-current value
    /// before any later publish (replay-most-recent). The seed is captured
    /// under the same lock that registers the receiver, so a concurrent
    /// publish is observed either in the seed or as a later element, never
    /// lost between the two.
    pub fn subscribe(&self) -> Subscription<V> {
        let relay = self.relay.lock();
        Subscription::new(relay.recent.clone(), relay.sender.subscribe())
    }

    pub fn subscriber_count(&self) -> usize {
        self.relay.lock().sender.receiver_count()
    }
}
