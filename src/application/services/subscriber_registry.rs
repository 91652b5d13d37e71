//! Change notifications for the hosting UI.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::entities::CycleKind;

const DEFAULT_CAPACITY: usize = 16;

/// Published after a sync cycle persisted a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreUpdated {
    /// Cycle that produced the change.
    pub cycle: CycleKind,
}

/// Broadcast channel of [`StoreUpdated`] events.
///
/// Events are only published once the change is persisted, so subscribers can
/// re-read the store on receipt.
#[derive(Debug, Clone)]
pub struct SubscriberRegistry {
    tx: broadcast::Sender<StoreUpdated>,
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl SubscriberRegistry {
    /// Creates a registry buffering up to `capacity` events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribes to updates. Dropping the receiver unsubscribes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreUpdated> {
        self.tx.subscribe()
    }

    /// Invokes `callback` after every update until the returned handle is
    /// dropped or [`Subscription::unsubscribe`] is called.
    ///
    /// Must be called within a tokio runtime.
    pub fn subscribe_fn<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + 'static,
    {
        let mut rx = self.tx.subscribe();
        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(_) => callback(),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Subscriber lagged behind updates");
                        callback();
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Subscription { handle }
    }

    /// Publishes an update, returning how many subscribers received it.
    pub fn publish(&self, cycle: CycleKind) -> usize {
        match self.tx.send(StoreUpdated { cycle }) {
            Ok(receivers) => receivers,
            Err(_) => {
                debug!(%cycle, "No subscribers for store update");
                0
            }
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Handle of a callback subscription.
#[derive(Debug)]
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    /// Stops invoking the callback.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_receiver_gets_published_update() {
        let registry = SubscriberRegistry::default();
        let mut rx = registry.subscribe();

        assert_eq!(registry.publish(CycleKind::Posts), 1);

        let update = rx.recv().await.unwrap();
        assert_eq!(update.cycle, CycleKind::Posts);
    }

    #[test]
    fn test_dropping_receiver_unsubscribes() {
        let registry = SubscriberRegistry::default();
        let mut rx = registry.subscribe();

        registry.publish(CycleKind::Comments);
        let update = tokio_test::assert_ok!(rx.try_recv());
        assert_eq!(update.cycle, CycleKind::Comments);
        tokio_test::assert_err!(rx.try_recv());

        drop(rx);
        assert_eq!(registry.subscriber_count(), 0);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let registry = SubscriberRegistry::default();
        assert_eq!(registry.publish(CycleKind::Comments), 0);
    }

    #[tokio::test]
    async fn test_callback_invoked_until_unsubscribed() {
        let registry = SubscriberRegistry::default();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = hits.clone();
        let subscription = registry.subscribe_fn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        registry.publish(CycleKind::Posts);
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        subscription.unsubscribe();
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(registry.subscriber_count(), 0);

        registry.publish(CycleKind::Posts);
        tokio::task::yield_now().await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
