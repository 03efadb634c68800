//! Remote capability lookup collaborator.

use crate::error::Result;
use crate::types::{CapabilityMap, FeedId};
use async_trait::async_trait;

/// Fetches the current user's capability sets for feeds from the service.
///
/// Timeouts and retries belong to the implementation; the cache only stores
/// whatever this returns.
#[async_trait]
pub trait CapabilityFetcher: Send + Sync {
    async fn fetch_capabilities(&self, feeds: Vec<FeedId>) -> Result<CapabilityMap>;
}
