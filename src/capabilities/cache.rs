//! Per-session capability cache.

use crate::types::{CapabilityMap, CapabilitySet, FeedId};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Capabilities the current user holds, keyed by feed.
///
/// Owned by the client session. The lock is only held for a single map read
/// or write, never across an await. A feed's set is always replaced whole.
#[derive(Debug, Default)]
pub struct CapabilityCache {
    entries: RwLock<HashMap<FeedId, CapabilitySet>>,
}

impl CapabilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached set for one feed. Never fetches.
    pub fn get(&self, fid: &FeedId) -> Option<CapabilitySet> {
        self.entries.read().get(fid).cloned()
    }

    /// Cached sets for every feed in `fids`, or `None` if any one is missing.
    pub fn get_all<'a, I>(&self, fids: I) -> Option<CapabilityMap>
    where
        I: IntoIterator<Item = &'a FeedId>,
    {
        let entries = self.entries.read();
        fids.into_iter()
            .map(|fid| entries.get(fid).map(|set| (fid.clone(), set.clone())))
            .collect()
    }

    /// The feeds of `fids` that have no cached set, sorted.
    pub fn missing<'a, I>(&self, fids: I) -> Vec<FeedId>
    where
        I: IntoIterator<Item = &'a FeedId>,
    {
        let entries = self.entries.read();
        let mut missing: Vec<FeedId> = fids
            .into_iter()
            .filter(|fid| !entries.contains_key(*fid))
            .cloned()
            .collect();
        missing.sort();
        missing.dedup();
        missing
    }

    pub fn contains(&self, fid: &FeedId) -> bool {
        self.entries.read().contains_key(fid)
    }

    /// Store `update` and return only the entries that differ from what was
    /// cached (new feeds or changed sets). Saving the same map twice returns
    /// an empty map the second time.
    pub fn save(&self, update: CapabilityMap) -> CapabilityMap {
        let mut changed = CapabilityMap::new();
        {
            let mut entries = self.entries.write();
            for (fid, set) in update {
                if entries.get(&fid) == Some(&set) {
                    continue;
                }
                entries.insert(fid.clone(), set.clone());
                changed.insert(fid, set);
            }
        }

        if !changed.is_empty() {
            debug!(feeds = changed.len(), "capability cache updated");
        }
        changed
    }

    /// Forget a feed, e.g. after it was deleted.
    pub fn remove(&self, fid: &FeedId) -> Option<CapabilitySet> {
        self.entries.write().remove(fid)
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Capability;

    fn fid(id: &str) -> FeedId {
        FeedId::new("user", id)
    }

    fn set(caps: &[Capability]) -> CapabilitySet {
        caps.iter().cloned().collect()
    }

    #[test]
    fn test_get_all_requires_every_feed() {
        let cache = CapabilityCache::new();
        cache.save(CapabilityMap::from([(fid("alice"), set(&[Capability::ReadFeed]))]));

        assert!(cache.get_all([&fid("alice"), &fid("bob")]).is_none());

        cache.save(CapabilityMap::from([(fid("bob"), set(&[Capability::Follow]))]));
        let all = cache.get_all([&fid("alice"), &fid("bob")]).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[&fid("bob")], set(&[Capability::Follow]));
    }

    #[test]
    fn test_get_all_of_nothing_is_empty_map() {
        let cache = CapabilityCache::new();
        assert_eq!(cache.get_all(std::iter::empty()), Some(CapabilityMap::new()));
    }

    #[test]
    fn test_save_reports_only_changes() {
        let cache = CapabilityCache::new();
        let update = CapabilityMap::from([
            (fid("alice"), set(&[Capability::ReadFeed, Capability::AddActivity])),
            (fid("bob"), set(&[Capability::ReadFeed])),
        ]);

        assert_eq!(cache.save(update.clone()), update);
        assert!(cache.save(update).is_empty());

        let changed = cache.save(CapabilityMap::from([
            (fid("alice"), set(&[Capability::ReadFeed])),
            (fid("bob"), set(&[Capability::ReadFeed])),
        ]));
        assert_eq!(
            changed,
            CapabilityMap::from([(fid("alice"), set(&[Capability::ReadFeed]))])
        );
        // Whole-set replacement, not a union.
        assert_eq!(cache.get(&fid("alice")), Some(set(&[Capability::ReadFeed])));
    }

    #[test]
    fn test_missing_is_sorted_and_unique() {
        let cache = CapabilityCache::new();
        cache.save(CapabilityMap::from([(fid("b"), CapabilitySet::new())]));
        let wanted = [fid("c"), fid("a"), fid("b"), fid("c")];
        assert_eq!(cache.missing(wanted.iter()), vec![fid("a"), fid("c")]);
    }

    #[test]
    fn test_remove_and_clear() {
        let cache = CapabilityCache::new();
        cache.save(CapabilityMap::from([
            (fid("a"), set(&[Capability::ReadFeed])),
            (fid("b"), set(&[Capability::ReadFeed])),
        ]));
        assert!(cache.remove(&fid("a")).is_some());
        assert!(!cache.contains(&fid("a")));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
