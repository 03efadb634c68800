//! Capability enrichment middleware.

use super::cache::CapabilityCache;
use super::carrier::CapabilityCarrier;
use super::fetcher::CapabilityFetcher;
use crate::error::{FeedsError, Result};
use crate::events::{EventMiddleware, FeedsEvent, WeakEventPublisher};
use crate::types::{CapabilityMap, EventSource, FeedId};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::{Arc, Weak};
use tokio::runtime::Handle;
use tracing::{debug, warn};

/// Keeps feed capabilities consistent across local and remote events.
///
/// - Local events: capability sets found in the payload are saved, and a
///   `FeedOwnCapabilitiesUpdated` event is published for whatever changed.
/// - Remote events: payloads arrive without capabilities, so cached sets are
///   spliced in when every referenced feed is known. Otherwise the event is
///   forwarded as is and the missing feeds are fetched in the background; the
///   result comes back through the publisher as a capabilities-updated event.
///   A feed already being fetched is not requested again until that fetch ends.
pub struct CapabilityEnrichment {
    cache: Arc<CapabilityCache>,
    publisher: WeakEventPublisher,
    fetcher: Option<Arc<dyn CapabilityFetcher>>,
    in_flight: Arc<Mutex<HashSet<FeedId>>>,
}

impl CapabilityEnrichment {
    /// Enrichment without fetch-on-miss.
    pub fn new(cache: Arc<CapabilityCache>, publisher: WeakEventPublisher) -> Self {
        Self {
            cache,
            publisher,
            fetcher: None,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Fetch feeds missing from the cache when a remote event references them.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn CapabilityFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    async fn extract(&self, event: &FeedsEvent) {
        let capabilities = event.own_capabilities();
        if capabilities.is_empty() {
            return;
        }

        let changed = self.cache.save(capabilities);
        if changed.is_empty() {
            return;
        }

        let update = FeedsEvent::FeedOwnCapabilitiesUpdated {
            capabilities: changed,
        };
        if let Err(err) = self.publisher.publish(update, EventSource::Local).await {
            debug!(error = %err, "capability update not published");
        }
    }

    fn enrich(&self, event: FeedsEvent) -> FeedsEvent {
        let feeds = event.referenced_feeds();
        if feeds.is_empty() {
            return event;
        }

        if let Some(capabilities) = self.cache.get_all(&feeds) {
            return event.with_capabilities(&capabilities);
        }

        let missing = self.cache.missing(&feeds);
        if let Err(err) = self.schedule_fetch(missing) {
            warn!(error = %err, kind = event.kind(), "capability fetch not scheduled");
        }
        event
    }

    fn schedule_fetch(&self, feeds: Vec<FeedId>) -> Result<()> {
        let Some(fetcher) = self.fetcher.clone() else {
            return Ok(());
        };
        let handle = Handle::try_current().map_err(|_| FeedsError::NoRuntime)?;

        let feeds: Vec<FeedId> = {
            let mut in_flight = self.in_flight.lock();
            feeds
                .into_iter()
                .filter(|fid| in_flight.insert(fid.clone()))
                .collect()
        };
        if feeds.is_empty() {
            return Ok(());
        }

        debug!(feeds = ?feeds, "fetching missing capabilities");
        let fetch = PendingFetch {
            cache: Arc::downgrade(&self.cache),
            publisher: self.publisher.clone(),
            in_flight: Arc::clone(&self.in_flight),
            feeds,
        };
        handle.spawn(fetch.run(fetcher));
        Ok(())
    }
}

#[async_trait]
impl EventMiddleware for CapabilityEnrichment {
    async fn process(&self, event: FeedsEvent, source: EventSource) -> FeedsEvent {
        match source {
            EventSource::Local => {
                self.extract(&event).await;
                event
            }
            EventSource::Remote => self.enrich(event),
        }
    }
}

/// A detached fetch for feeds missing from the cache. If the session is
/// released meanwhile, the result is discarded.
struct PendingFetch {
    cache: Weak<CapabilityCache>,
    publisher: WeakEventPublisher,
    in_flight: Arc<Mutex<HashSet<FeedId>>>,
    feeds: Vec<FeedId>,
}

impl PendingFetch {
    async fn run(self, fetcher: Arc<dyn CapabilityFetcher>) {
        let result = fetcher.fetch_capabilities(self.feeds.clone()).await;

        // Saved before the feeds leave the in-flight set, so a concurrent
        // event either finds them cached or finds the fetch still pending.
        let changed = match (&result, self.cache.upgrade()) {
            (Ok(capabilities), Some(cache)) => cache.save(capabilities.clone()),
            _ => CapabilityMap::new(),
        };
        {
            let mut in_flight = self.in_flight.lock();
            for fid in &self.feeds {
                in_flight.remove(fid);
            }
        }

        if let Err(err) = result {
            warn!(error = %err, feeds = ?self.feeds, "failed to fetch missing capabilities");
            return;
        }
        if changed.is_empty() {
            return;
        }

        let update = FeedsEvent::FeedOwnCapabilitiesUpdated {
            capabilities: changed,
        };
        if let Err(err) = self.publisher.publish(update, EventSource::Local).await {
            debug!(error = %err, "fetched capabilities discarded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventPublisher;
    use crate::models::{ActivityData, FeedData, FollowData};
    use crate::types::{Capability, CapabilityMap, CapabilitySet, Timestamp};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    struct FailingFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CapabilityFetcher for FailingFetcher {
        async fn fetch_capabilities(&self, _feeds: Vec<FeedId>) -> Result<CapabilityMap> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(FeedsError::CapabilityFetch("service unavailable".into()))
        }
    }

    /// Holds every fetch until released, then grants read access.
    struct GatedFetcher {
        calls: AtomicUsize,
        release: Notify,
    }

    #[async_trait]
    impl CapabilityFetcher for GatedFetcher {
        async fn fetch_capabilities(&self, feeds: Vec<FeedId>) -> Result<CapabilityMap> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.release.notified().await;
            Ok(feeds
                .into_iter()
                .map(|fid| (fid, caps(&[Capability::ReadFeed])))
                .collect())
        }
    }

    fn caps(list: &[Capability]) -> CapabilitySet {
        list.iter().cloned().collect()
    }

    fn feed(id: &str, list: &[Capability]) -> FeedData {
        let mut feed = FeedData::new(FeedId::new("user", id));
        feed.own_capabilities = caps(list);
        feed
    }

    fn activity_in(feed: FeedData) -> FeedsEvent {
        let fid = feed.fid.clone();
        let mut activity = ActivityData::new("a1", "alice", Timestamp(1));
        activity.current_feed = Some(feed);
        FeedsEvent::ActivityAdded { activity, fid }
    }

    fn setup() -> (EventPublisher, Arc<CapabilityCache>) {
        let publisher = EventPublisher::new();
        let cache = Arc::new(CapabilityCache::new());
        publisher.add_middleware(CapabilityEnrichment::new(
            Arc::clone(&cache),
            publisher.downgrade(),
        ));
        (publisher, cache)
    }

    #[tokio::test]
    async fn test_local_event_saves_and_announces_once() {
        let (publisher, cache) = setup();
        let stream = publisher.subscribe_channel(16);

        let event = activity_in(feed("alice", &[Capability::ReadFeed]));
        publisher.publish(event.clone(), EventSource::Local).await;

        assert_eq!(
            cache.get(&FeedId::new("user", "alice")),
            Some(caps(&[Capability::ReadFeed]))
        );
        let received = stream.drain();
        assert_eq!(received.len(), 2);
        assert!(matches!(
            &received[0],
            FeedsEvent::FeedOwnCapabilitiesUpdated { capabilities } if capabilities.len() == 1
        ));
        assert_eq!(received[1], event);

        // Same capabilities again: nothing changed, no extra event.
        publisher.publish(event.clone(), EventSource::Local).await;
        assert_eq!(stream.drain(), vec![event]);
    }

    #[tokio::test]
    async fn test_remote_event_enriched_from_cache() {
        let (publisher, cache) = setup();
        cache.save(CapabilityMap::from([
            (FeedId::new("user", "alice"), caps(&[Capability::Follow])),
            (FeedId::new("user", "bob"), caps(&[Capability::ReadFeed])),
        ]));
        let stream = publisher.subscribe_channel(16);

        let follow = FollowData::new(feed("alice", &[]), feed("bob", &[]));
        publisher
            .publish(FeedsEvent::FollowAdded { follow }, EventSource::Remote)
            .await;

        match stream.recv_timeout(Duration::from_millis(100)).unwrap() {
            FeedsEvent::FollowAdded { follow } => {
                assert_eq!(follow.source_feed.own_capabilities, caps(&[Capability::Follow]));
                assert_eq!(follow.target_feed.own_capabilities, caps(&[Capability::ReadFeed]));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(stream.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_partial_cache_forwards_unmodified() {
        let (publisher, cache) = setup();
        cache.save(CapabilityMap::from([(
            FeedId::new("user", "alice"),
            caps(&[Capability::Follow]),
        )]));
        let stream = publisher.subscribe_channel(16);

        let follow = FollowData::new(feed("alice", &[]), feed("bob", &[]));
        let event = FeedsEvent::FollowAdded { follow };
        publisher.publish(event.clone(), EventSource::Remote).await;

        assert_eq!(stream.drain(), vec![event]);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_swallowed() {
        let publisher = EventPublisher::new();
        let cache = Arc::new(CapabilityCache::new());
        let fetcher = Arc::new(FailingFetcher {
            calls: AtomicUsize::new(0),
        });
        publisher.add_middleware(
            CapabilityEnrichment::new(Arc::clone(&cache), publisher.downgrade())
                .with_fetcher(fetcher.clone()),
        );
        let stream = publisher.subscribe_channel(16);

        let event = activity_in(feed("alice", &[]));
        publisher.publish(event.clone(), EventSource::Remote).await;
        assert_eq!(stream.drain(), vec![event]);

        for _ in 0..50 {
            if fetcher.calls.load(Ordering::SeqCst) > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert!(cache.is_empty());
        assert!(stream.try_recv().is_err());

        // The failed feed is no longer in flight, so the next miss retries.
        publisher.publish(activity_in(feed("alice", &[])), EventSource::Remote).await;
        for _ in 0..50 {
            if fetcher.calls.load(Ordering::SeqCst) > 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_burst_of_misses_fetches_once() {
        let publisher = EventPublisher::new();
        let cache = Arc::new(CapabilityCache::new());
        let fetcher = Arc::new(GatedFetcher {
            calls: AtomicUsize::new(0),
            release: Notify::new(),
        });
        publisher.add_middleware(
            CapabilityEnrichment::new(Arc::clone(&cache), publisher.downgrade())
                .with_fetcher(fetcher.clone()),
        );
        let stream = publisher.subscribe_channel(16);

        for _ in 0..3 {
            publisher
                .publish(activity_in(feed("alice", &[])), EventSource::Remote)
                .await;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(stream.drain().len(), 3);

        fetcher.release.notify_one();
        let alice = FeedId::new("user", "alice");
        for _ in 0..50 {
            if cache.get(&alice).is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(cache.get(&alice), Some(caps(&[Capability::ReadFeed])));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);

        // Cached now: the next event is enriched without another fetch.
        publisher
            .publish(activity_in(feed("alice", &[])), EventSource::Remote)
            .await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }
}
