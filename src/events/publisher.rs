//! Event fan-out hub with an ordered middleware chain.

use super::types::FeedsEvent;
use crate::error::{FeedsError, Result};
use crate::types::EventSource;
use async_trait::async_trait;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use futures_util::future::join_all;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{trace, warn};

/// A rewrite step applied to every event before fan-out.
#[async_trait]
pub trait EventMiddleware: Send + Sync {
    /// Return the event to hand to the next middleware (or to subscribers).
    async fn process(&self, event: FeedsEvent, source: EventSource) -> FeedsEvent;
}

/// Receives fully processed events.
#[async_trait]
pub trait EventSubscriber: Send + Sync {
    async fn on_event(&self, event: &FeedsEvent);
}

struct FnSubscriber<F>(F);

#[async_trait]
impl<F> EventSubscriber for FnSubscriber<F>
where
    F: Fn(&FeedsEvent) + Send + Sync,
{
    async fn on_event(&self, event: &FeedsEvent) {
        (self.0)(event)
    }
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

struct PublisherInner {
    subscribers: RwLock<Vec<(SubscriptionId, Arc<dyn EventSubscriber>)>>,
    middlewares: RwLock<Vec<Arc<dyn EventMiddleware>>>,
    next_id: AtomicU64,
}

impl PublisherInner {
    fn remove(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subscribers.write();
        let before = subs.len();
        subs.retain(|(sub_id, _)| *sub_id != id);
        subs.len() != before
    }
}

/// Runs events through the middleware chain, then delivers them to every
/// subscriber concurrently.
///
/// Both lists are snapshotted under their lock and used outside it, so a
/// subscribe or unsubscribe racing a publish sees either the old or the new
/// list, never a partial one. No event history is kept.
#[derive(Clone)]
pub struct EventPublisher {
    inner: Arc<PublisherInner>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(PublisherInner {
                subscribers: RwLock::new(Vec::new()),
                middlewares: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Append a middleware; it runs after every middleware added before it.
    pub fn add_middleware<M>(&self, middleware: M)
    where
        M: EventMiddleware + 'static,
    {
        self.inner.middlewares.write().push(Arc::new(middleware));
    }

    pub fn middleware_count(&self) -> usize {
        self.inner.middlewares.read().len()
    }

    /// Register a subscriber. It stays registered until the token is dropped.
    pub fn subscribe<S>(&self, subscriber: S) -> SubscriptionToken
    where
        S: EventSubscriber + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::SeqCst));
        self.inner
            .subscribers
            .write()
            .push((id, Arc::new(subscriber)));

        SubscriptionToken {
            id,
            publisher: Arc::downgrade(&self.inner),
        }
    }

    /// Register a synchronous callback.
    pub fn subscribe_fn<F>(&self, handler: F) -> SubscriptionToken
    where
        F: Fn(&FeedsEvent) + Send + Sync + 'static,
    {
        self.subscribe(FnSubscriber(handler))
    }

    /// Register a bounded channel. A full buffer drops events for this stream
    /// only; the publisher never waits on it.
    pub fn subscribe_channel(&self, buffer_size: usize) -> EventStream {
        let (sender, receiver) = bounded(buffer_size.max(1));
        let dropped = Arc::new(AtomicU64::new(0));
        let token = self.subscribe(ChannelSubscriber {
            sender,
            dropped: Arc::clone(&dropped),
        });

        EventStream {
            receiver,
            dropped,
            token,
        }
    }

    /// Unsubscribe by id. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.remove(id)
    }

    pub fn subscription_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }

    /// A handle that does not keep the publisher alive.
    pub fn downgrade(&self) -> WeakEventPublisher {
        WeakEventPublisher {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Publish one event.
    ///
    /// Every middleware finishes before any subscriber sees the event, and the
    /// call returns once all subscribers have handled it.
    pub async fn publish(&self, event: FeedsEvent, source: EventSource) {
        let middlewares = self.inner.middlewares.read().clone();
        let mut event = event;
        for middleware in middlewares {
            event = middleware.process(event, source).await;
        }

        let subscribers: Vec<Arc<dyn EventSubscriber>> = self
            .inner
            .subscribers
            .read()
            .iter()
            .map(|(_, subscriber)| Arc::clone(subscriber))
            .collect();

        trace!(
            kind = event.kind(),
            ?source,
            subscribers = subscribers.len(),
            "publishing event"
        );

        join_all(
            subscribers
                .iter()
                .map(|subscriber| subscriber.on_event(&event)),
        )
        .await;
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-owning publisher handle, for middlewares and detached tasks.
#[derive(Clone)]
pub struct WeakEventPublisher {
    inner: Weak<PublisherInner>,
}

impl WeakEventPublisher {
    pub fn upgrade(&self) -> Option<EventPublisher> {
        self.inner.upgrade().map(|inner| EventPublisher { inner })
    }

    /// Publish if the publisher is still alive.
    pub async fn publish(&self, event: FeedsEvent, source: EventSource) -> Result<()> {
        let publisher = self.upgrade().ok_or(FeedsError::PublisherClosed)?;
        publisher.publish(event, source).await;
        Ok(())
    }
}

/// Keeps a subscription alive. Dropping it unsubscribes.
#[must_use = "dropping the token unsubscribes immediately"]
pub struct SubscriptionToken {
    id: SubscriptionId,
    publisher: Weak<PublisherInner>,
}

impl SubscriptionToken {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Unsubscribe now.
    pub fn cancel(self) {}
}

impl Drop for SubscriptionToken {
    fn drop(&mut self) {
        if let Some(inner) = self.publisher.upgrade() {
            inner.remove(self.id);
        }
    }
}

struct ChannelSubscriber {
    sender: Sender<FeedsEvent>,
    dropped: Arc<AtomicU64>,
}

#[async_trait]
impl EventSubscriber for ChannelSubscriber {
    async fn on_event(&self, event: &FeedsEvent) {
        match self.sender.try_send(event.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(kind = event.kind(), "event stream buffer full, dropping event");
            }
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

/// Channel-backed subscription.
pub struct EventStream {
    receiver: Receiver<FeedsEvent>,
    dropped: Arc<AtomicU64>,
    token: SubscriptionToken,
}

impl EventStream {
    pub fn id(&self) -> SubscriptionId {
        self.token.id()
    }

    /// Receive the next event (blocking).
    pub fn recv(&self) -> std::result::Result<FeedsEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> std::result::Result<FeedsEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> std::result::Result<FeedsEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain everything currently buffered.
    pub fn drain(&self) -> Vec<FeedsEvent> {
        self.receiver.try_iter().collect()
    }

    /// Events discarded because the buffer was full.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FeedId;
    use parking_lot::Mutex;
    use std::time::Duration;

    fn deleted(id: &str) -> FeedsEvent {
        FeedsEvent::ActivityDeleted {
            activity_id: id.to_string(),
            fid: FeedId::new("user", "alice"),
        }
    }

    struct Rename(&'static str);

    #[async_trait]
    impl EventMiddleware for Rename {
        async fn process(&self, event: FeedsEvent, _source: EventSource) -> FeedsEvent {
            match event {
                FeedsEvent::ActivityDeleted { activity_id, fid } => FeedsEvent::ActivityDeleted {
                    activity_id: format!("{activity_id}{}", self.0),
                    fid,
                },
                other => other,
            }
        }
    }

    #[tokio::test]
    async fn test_subscribe_unsubscribe() {
        let publisher = EventPublisher::new();

        let token = publisher.subscribe_fn(|_| {});
        assert_eq!(publisher.subscription_count(), 1);

        assert!(publisher.unsubscribe(token.id()));
        assert_eq!(publisher.subscription_count(), 0);
        drop(token);
        assert_eq!(publisher.subscription_count(), 0);
    }

    #[tokio::test]
    async fn test_dropping_token_unsubscribes() {
        let publisher = EventPublisher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let token = publisher.subscribe_fn(move |e| sink.lock().push(e.clone()));
        publisher.publish(deleted("1"), EventSource::Remote).await;
        token.cancel();
        publisher.publish(deleted("2"), EventSource::Remote).await;

        assert_eq!(*seen.lock(), vec![deleted("1")]);
        assert_eq!(publisher.subscription_count(), 0);
    }

    #[tokio::test]
    async fn test_middlewares_run_in_registration_order() {
        let publisher = EventPublisher::new();
        publisher.add_middleware(Rename("-a"));
        publisher.add_middleware(Rename("-b"));
        assert_eq!(publisher.middleware_count(), 2);

        let stream = publisher.subscribe_channel(8);
        publisher.publish(deleted("x"), EventSource::Local).await;

        assert_eq!(stream.try_recv().unwrap(), deleted("x-a-b"));
    }

    #[tokio::test]
    async fn test_full_stream_drops_events() {
        let publisher = EventPublisher::new();
        let stream = publisher.subscribe_channel(2);

        for i in 0..5 {
            publisher.publish(deleted(&i.to_string()), EventSource::Remote).await;
        }

        assert_eq!(stream.drain().len(), 2);
        assert_eq!(stream.dropped_count(), 3);
        // The stream stays subscribed.
        publisher.publish(deleted("late"), EventSource::Remote).await;
        assert_eq!(
            stream.recv_timeout(Duration::from_millis(100)).unwrap(),
            deleted("late")
        );
    }

    #[tokio::test]
    async fn test_weak_publisher_reports_release() {
        let publisher = EventPublisher::new();
        let weak = publisher.downgrade();
        assert!(weak.publish(deleted("1"), EventSource::Local).await.is_ok());

        drop(publisher);
        assert!(matches!(
            weak.publish(deleted("2"), EventSource::Local).await,
            Err(FeedsError::PublisherClosed)
        ));
    }

    #[tokio::test]
    async fn test_token_outliving_publisher_is_harmless() {
        let publisher = EventPublisher::new();
        let token = publisher.subscribe_fn(|_| {});
        drop(publisher);
        drop(token);
    }
}
