//! Feed capabilities: what the current user may do in each feed.
//!
//! Capabilities arrive embedded in local request results but are stripped
//! from real-time payloads. The [`CapabilityCache`] remembers the last known
//! set per feed and [`CapabilityEnrichment`] uses it to fill remote events
//! back in, fetching unknown feeds through a [`CapabilityFetcher`].

mod cache;
mod carrier;
mod fetcher;
mod middleware;

pub use cache::CapabilityCache;
pub use carrier::CapabilityCarrier;
pub use fetcher::CapabilityFetcher;
pub use middleware::CapabilityEnrichment;
