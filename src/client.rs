//! Client session: one publisher and one capability cache per user session.

use crate::capabilities::{CapabilityCache, CapabilityEnrichment, CapabilityFetcher};
use crate::events::{
    normalize_all, reshared_parent_update, EventPublisher, EventStream, EventSubscriber, FeedsEvent,
    RawEvent, SubscriptionToken,
};
use crate::types::{CapabilityMap, EventSource};
use std::sync::Arc;
use tracing::{debug, trace};

/// Client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Register the capability enrichment middleware.
    pub enrich_capabilities: bool,

    /// Fetch capabilities of feeds the cache does not know yet.
    pub fetch_missing_capabilities: bool,

    /// Buffer size of streams created with [`FeedsClient::subscribe_stream`].
    pub stream_buffer_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            enrich_capabilities: true,
            fetch_missing_capabilities: true,
            stream_buffer_size: 1000,
        }
    }
}

/// Owns the event pipeline of one session.
///
/// Remote frames enter through [`ingest`](Self::ingest), local request
/// results through [`publish_local`](Self::publish_local). Both go through
/// the same middleware chain before reaching subscribers. Dropping the client
/// releases the publisher; pending capability fetches then discard their
/// results.
pub struct FeedsClient {
    config: ClientConfig,
    publisher: EventPublisher,
    capabilities: Arc<CapabilityCache>,
}

impl FeedsClient {
    pub fn new(config: ClientConfig, fetcher: Option<Arc<dyn CapabilityFetcher>>) -> Self {
        let publisher = EventPublisher::new();
        let capabilities = Arc::new(CapabilityCache::new());

        if config.enrich_capabilities {
            let mut enrichment =
                CapabilityEnrichment::new(Arc::clone(&capabilities), publisher.downgrade());
            if config.fetch_missing_capabilities {
                if let Some(fetcher) = fetcher {
                    enrichment = enrichment.with_fetcher(fetcher);
                }
            }
            publisher.add_middleware(enrichment);
        }

        debug!(
            enrich = config.enrich_capabilities,
            fetch = config.fetch_missing_capabilities,
            "feeds client created"
        );

        Self {
            config,
            publisher,
            capabilities,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn publisher(&self) -> &EventPublisher {
        &self.publisher
    }

    pub fn capabilities(&self) -> &CapabilityCache {
        &self.capabilities
    }

    /// Shared handle to the cache, for collaborators outliving a borrow.
    pub fn capability_cache(&self) -> Arc<CapabilityCache> {
        Arc::clone(&self.capabilities)
    }

    /// Normalize a transport event and publish the result as remote.
    ///
    /// Returns how many canonical events were published (0 for kinds with
    /// no canonical form).
    pub async fn ingest(&self, raw: RawEvent) -> usize {
        let kind = raw.kind();
        let events = normalize_all(raw);
        if events.is_empty() {
            trace!(kind, "raw event dropped");
            return 0;
        }

        let count = events.len();
        for event in events {
            self.publisher.publish(event, EventSource::Remote).await;
        }
        count
    }

    /// Publish the result of a local request, plus the parent update when
    /// the result is a reshare.
    pub async fn publish_local(&self, event: FeedsEvent) {
        let parent = reshared_parent_update(&event);
        self.publisher.publish(event, EventSource::Local).await;
        if let Some(parent) = parent {
            self.publisher.publish(parent, EventSource::Local).await;
        }
    }

    /// Store capabilities from an explicit bulk fetch. Subscribers are told
    /// about the entries that actually changed, which are also returned.
    pub async fn save_capabilities(&self, capabilities: CapabilityMap) -> CapabilityMap {
        let changed = self.capabilities.save(capabilities);
        if !changed.is_empty() {
            self.publisher
                .publish(
                    FeedsEvent::FeedOwnCapabilitiesUpdated {
                        capabilities: changed.clone(),
                    },
                    EventSource::Local,
                )
                .await;
        }
        changed
    }

    pub fn subscribe<S>(&self, subscriber: S) -> SubscriptionToken
    where
        S: EventSubscriber + 'static,
    {
        self.publisher.subscribe(subscriber)
    }

    pub fn subscribe_fn<F>(&self, handler: F) -> SubscriptionToken
    where
        F: Fn(&FeedsEvent) + Send + Sync + 'static,
    {
        self.publisher.subscribe_fn(handler)
    }

    pub fn subscribe_stream(&self) -> EventStream {
        self.publisher.subscribe_channel(self.config.stream_buffer_size)
    }
}
