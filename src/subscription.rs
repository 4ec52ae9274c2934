use tokio::sync::broadcast;

/// Live subscription handed out by [`crate::ChangeObservable::subscribe`].
/// Yields the seeded current value first, then every value published while it
/// stays alive. Dropping it cancels delivery with no further side effects.
pub struct Subscription<V> {
    seed: Option<V>,
    receiver: broadcast::Receiver<V>,
}

impl<V> Subscription<V>
where
    V: Clone + Send + 'static,
{
    pub(crate) fn new(seed: V, receiver: broadcast::Receiver<V>) -> Self {
        Self {
            seed: Some(seed),
            receiver,
        }
    }

    /// Next value, or `None` once the relay has been dropped.
    pub async fn recv(&mut self) -> Option<V> {
        if let Some(seed) = self.seed.take() {
            return Some(seed);
        }
        loop {
            match self.receiver.recv().await {
                Ok(value) => return Some(value),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::warn!("subscriber lagged, skipped {} values", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub fn into_stream(self) -> impl futures::Stream<Item = V> + Send {
        futures::stream::unfold(self, |mut subscription| async move {
            subscription.recv().await.map(|value| (value, subscription))
        })
    }
}
