//! # Feeds State
//!
//! Client-side state core for a real-time activity feeds service.
//!
//! ## Core Concepts
//!
//! - **Events**: Transport events are normalized into one canonical vocabulary
//! - **Publisher**: Events pass an ordered middleware chain, then fan out to subscribers
//! - **Capabilities**: A per-session cache fills in what real-time payloads leave out
//! - **Collections**: Ordered, de-duplicated record lists that events are applied to
//!
//! ## Example
//!
//! ```ignore
//! use feeds_state::{ClientConfig, FeedsClient, RawEvent};
//!
//! let client = FeedsClient::new(ClientConfig::default(), Some(fetcher));
//!
//! // Observe canonical events
//! let _token = client.subscribe_fn(|event| println!("{}", event.kind()));
//!
//! // Feed it transport frames
//! client.ingest(RawEvent::from_json(frame)?).await;
//!
//! // Local request results take the same path
//! client.publish_local(FeedsEvent::FeedAdded { feed }).await;
//! ```

pub mod capabilities;
pub mod client;
pub mod collections;
pub mod error;
pub mod events;
pub mod models;
pub mod types;

// Re-exports
pub use capabilities::{CapabilityCache, CapabilityCarrier, CapabilityEnrichment, CapabilityFetcher};
pub use client::{ClientConfig, FeedsClient};
pub use collections::{
    ascending, compare_with_identity, descending, ModelUpdates, Nesting, OrderedCollection,
    OrderedCollectionExt, SortOrder,
};
pub use error::{FeedsError, Result};
pub use events::{
    normalize, normalize_all, reshared_parent_update, EventMiddleware, EventPublisher,
    EventStream, EventSubscriber, FeedsEvent, RawEvent, SubscriptionId, SubscriptionToken,
    WeakEventPublisher,
};
pub use models::*;
pub use types::*;
