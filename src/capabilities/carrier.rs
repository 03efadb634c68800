//! Which feeds (and which capability fields) a value carries.

use crate::collections::ModelUpdates;
use crate::events::FeedsEvent;
use crate::models::{ActivityData, BookmarkData, FeedData, FollowData};
use crate::types::{CapabilityMap, FeedId};
use std::collections::HashSet;

/// A value embedding one or more feeds whose `own_capabilities` field can be
/// read from or spliced into.
pub trait CapabilityCarrier {
    /// Add every embedded feed to `feeds`.
    fn collect_feeds(&self, feeds: &mut HashSet<FeedId>);

    /// Add every embedded non-empty capability set to `capabilities`.
    fn collect_capabilities(&self, capabilities: &mut CapabilityMap);

    /// Overwrite embedded capability sets with those found in `capabilities`.
    fn apply_capabilities(&mut self, capabilities: &CapabilityMap);

    fn referenced_feeds(&self) -> HashSet<FeedId> {
        let mut feeds = HashSet::new();
        self.collect_feeds(&mut feeds);
        feeds
    }

    fn own_capabilities(&self) -> CapabilityMap {
        let mut capabilities = CapabilityMap::new();
        self.collect_capabilities(&mut capabilities);
        capabilities
    }

    fn with_capabilities(mut self, capabilities: &CapabilityMap) -> Self
    where
        Self: Sized,
    {
        self.apply_capabilities(capabilities);
        self
    }
}

impl CapabilityCarrier for FeedData {
    fn collect_feeds(&self, feeds: &mut HashSet<FeedId>) {
        feeds.insert(self.fid.clone());
    }

    fn collect_capabilities(&self, capabilities: &mut CapabilityMap) {
        if !self.own_capabilities.is_empty() {
            capabilities.insert(self.fid.clone(), self.own_capabilities.clone());
        }
    }

    fn apply_capabilities(&mut self, capabilities: &CapabilityMap) {
        if let Some(set) = capabilities.get(&self.fid) {
            self.own_capabilities = set.clone();
        }
    }
}

impl CapabilityCarrier for ActivityData {
    fn collect_feeds(&self, feeds: &mut HashSet<FeedId>) {
        if let Some(feed) = &self.current_feed {
            feed.collect_feeds(feeds);
        }
    }

    fn collect_capabilities(&self, capabilities: &mut CapabilityMap) {
        if let Some(feed) = &self.current_feed {
            feed.collect_capabilities(capabilities);
        }
    }

    fn apply_capabilities(&mut self, capabilities: &CapabilityMap) {
        if let Some(feed) = &mut self.current_feed {
            feed.apply_capabilities(capabilities);
        }
    }
}

impl CapabilityCarrier for BookmarkData {
    fn collect_feeds(&self, feeds: &mut HashSet<FeedId>) {
        self.activity.collect_feeds(feeds);
    }

    fn collect_capabilities(&self, capabilities: &mut CapabilityMap) {
        self.activity.collect_capabilities(capabilities);
    }

    fn apply_capabilities(&mut self, capabilities: &CapabilityMap) {
        self.activity.apply_capabilities(capabilities);
    }
}

impl CapabilityCarrier for FollowData {
    fn collect_feeds(&self, feeds: &mut HashSet<FeedId>) {
        self.source_feed.collect_feeds(feeds);
        self.target_feed.collect_feeds(feeds);
    }

    fn collect_capabilities(&self, capabilities: &mut CapabilityMap) {
        self.source_feed.collect_capabilities(capabilities);
        self.target_feed.collect_capabilities(capabilities);
    }

    fn apply_capabilities(&mut self, capabilities: &CapabilityMap) {
        self.source_feed.apply_capabilities(capabilities);
        self.target_feed.apply_capabilities(capabilities);
    }
}

impl CapabilityCarrier for ModelUpdates<ActivityData> {
    fn collect_feeds(&self, feeds: &mut HashSet<FeedId>) {
        self.records().for_each(|activity| activity.collect_feeds(feeds));
    }

    fn collect_capabilities(&self, capabilities: &mut CapabilityMap) {
        self.records()
            .for_each(|activity| activity.collect_capabilities(capabilities));
    }

    fn apply_capabilities(&mut self, capabilities: &CapabilityMap) {
        self.records_mut()
            .for_each(|activity| activity.apply_capabilities(capabilities));
    }
}

impl FeedsEvent {
    /// Payload parts that embed feeds. The capabilities-updated event has
    /// none, so re-publishing it cannot trigger extraction again.
    fn carriers(&self) -> Vec<&dyn CapabilityCarrier> {
        match self {
            FeedsEvent::ActivityAdded { activity, .. }
            | FeedsEvent::ActivityUpdated { activity, .. }
            | FeedsEvent::ActivityReactionAdded { activity, .. }
            | FeedsEvent::ActivityReactionUpdated { activity, .. }
            | FeedsEvent::ActivityReactionDeleted { activity, .. }
            | FeedsEvent::CommentAdded { activity, .. } => vec![activity as &dyn CapabilityCarrier],
            FeedsEvent::ActivityBatchUpdated { updates } => vec![updates as &dyn CapabilityCarrier],
            FeedsEvent::BookmarkAdded { bookmark }
            | FeedsEvent::BookmarkUpdated { bookmark }
            | FeedsEvent::BookmarkDeleted { bookmark } => vec![bookmark as &dyn CapabilityCarrier],
            FeedsEvent::FeedAdded { feed } | FeedsEvent::FeedUpdated { feed } => vec![feed as &dyn CapabilityCarrier],
            FeedsEvent::FollowAdded { follow }
            | FeedsEvent::FollowUpdated { follow }
            | FeedsEvent::FollowDeleted { follow } => vec![follow as &dyn CapabilityCarrier],
            FeedsEvent::ActivityDeleted { .. }
            | FeedsEvent::BookmarkFolderUpdated { .. }
            | FeedsEvent::BookmarkFolderDeleted { .. }
            | FeedsEvent::CommentUpdated { .. }
            | FeedsEvent::CommentDeleted { .. }
            | FeedsEvent::CommentsAddedBatch { .. }
            | FeedsEvent::CommentReactionAdded { .. }
            | FeedsEvent::CommentReactionUpdated { .. }
            | FeedsEvent::CommentReactionDeleted { .. }
            | FeedsEvent::PollUpdated { .. }
            | FeedsEvent::PollDeleted { .. }
            | FeedsEvent::PollVoteCasted { .. }
            | FeedsEvent::PollVoteChanged { .. }
            | FeedsEvent::PollVoteRemoved { .. }
            | FeedsEvent::FeedDeleted { .. }
            | FeedsEvent::FeedGroupChanged { .. }
            | FeedsEvent::FeedGroupDeleted { .. }
            | FeedsEvent::FeedMemberAdded { .. }
            | FeedsEvent::FeedMemberUpdated { .. }
            | FeedsEvent::FeedMemberDeleted { .. }
            | FeedsEvent::FeedMemberBatchUpdated { .. }
            | FeedsEvent::NotificationFeedUpdated { .. }
            | FeedsEvent::UserUpdated { .. }
            | FeedsEvent::FeedOwnCapabilitiesUpdated { .. } => Vec::new(),
        }
    }

    fn carriers_mut(&mut self) -> Vec<&mut dyn CapabilityCarrier> {
        match self {
            FeedsEvent::ActivityAdded { activity, .. }
            | FeedsEvent::ActivityUpdated { activity, .. }
            | FeedsEvent::ActivityReactionAdded { activity, .. }
            | FeedsEvent::ActivityReactionUpdated { activity, .. }
            | FeedsEvent::ActivityReactionDeleted { activity, .. }
            | FeedsEvent::CommentAdded { activity, .. } => vec![activity as &mut dyn CapabilityCarrier],
            FeedsEvent::ActivityBatchUpdated { updates } => vec![updates as &mut dyn CapabilityCarrier],
            FeedsEvent::BookmarkAdded { bookmark }
            | FeedsEvent::BookmarkUpdated { bookmark }
            | FeedsEvent::BookmarkDeleted { bookmark } => vec![bookmark as &mut dyn CapabilityCarrier],
            FeedsEvent::FeedAdded { feed } | FeedsEvent::FeedUpdated { feed } => vec![feed as &mut dyn CapabilityCarrier],
            FeedsEvent::FollowAdded { follow }
            | FeedsEvent::FollowUpdated { follow }
            | FeedsEvent::FollowDeleted { follow } => vec![follow as &mut dyn CapabilityCarrier],
            FeedsEvent::ActivityDeleted { .. }
            | FeedsEvent::BookmarkFolderUpdated { .. }
            | FeedsEvent::BookmarkFolderDeleted { .. }
            | FeedsEvent::CommentUpdated { .. }
            | FeedsEvent::CommentDeleted { .. }
            | FeedsEvent::CommentsAddedBatch { .. }
            | FeedsEvent::CommentReactionAdded { .. }
            | FeedsEvent::CommentReactionUpdated { .. }
            | FeedsEvent::CommentReactionDeleted { .. }
            | FeedsEvent::PollUpdated { .. }
            | FeedsEvent::PollDeleted { .. }
            | FeedsEvent::PollVoteCasted { .. }
            | FeedsEvent::PollVoteChanged { .. }
            | FeedsEvent::PollVoteRemoved { .. }
            | FeedsEvent::FeedDeleted { .. }
            | FeedsEvent::FeedGroupChanged { .. }
            | FeedsEvent::FeedGroupDeleted { .. }
            | FeedsEvent::FeedMemberAdded { .. }
            | FeedsEvent::FeedMemberUpdated { .. }
            | FeedsEvent::FeedMemberDeleted { .. }
            | FeedsEvent::FeedMemberBatchUpdated { .. }
            | FeedsEvent::NotificationFeedUpdated { .. }
            | FeedsEvent::UserUpdated { .. }
            | FeedsEvent::FeedOwnCapabilitiesUpdated { .. } => Vec::new(),
        }
    }
}

impl CapabilityCarrier for FeedsEvent {
    fn collect_feeds(&self, feeds: &mut HashSet<FeedId>) {
        for carrier in self.carriers() {
            carrier.collect_feeds(feeds);
        }
    }

    fn collect_capabilities(&self, capabilities: &mut CapabilityMap) {
        for carrier in self.carriers() {
            carrier.collect_capabilities(capabilities);
        }
    }

    fn apply_capabilities(&mut self, capabilities: &CapabilityMap) {
        for carrier in self.carriers_mut() {
            carrier.apply_capabilities(capabilities);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Capability, CapabilitySet, Timestamp};

    fn feed(group: &str, id: &str, caps: &[Capability]) -> FeedData {
        let mut feed = FeedData::new(FeedId::new(group, id));
        feed.own_capabilities = caps.iter().cloned().collect();
        feed
    }

    #[test]
    fn test_follow_references_both_feeds() {
        let event = FeedsEvent::FollowAdded {
            follow: FollowData::new(feed("timeline", "alice", &[]), feed("user", "bob", &[])),
        };
        let feeds = event.referenced_feeds();
        assert_eq!(feeds.len(), 2);
        assert!(feeds.contains(&FeedId::new("timeline", "alice")));
        assert!(feeds.contains(&FeedId::new("user", "bob")));
    }

    #[test]
    fn test_only_non_empty_sets_are_extracted() {
        let event = FeedsEvent::FollowAdded {
            follow: FollowData::new(
                feed("timeline", "alice", &[Capability::Follow]),
                feed("user", "bob", &[]),
            ),
        };
        let capabilities = event.own_capabilities();
        assert_eq!(capabilities.len(), 1);
        assert!(capabilities.contains_key(&FeedId::new("timeline", "alice")));
    }

    #[test]
    fn test_apply_splices_into_current_feed() {
        let mut activity = ActivityData::new("a1", "alice", Timestamp(1));
        activity.current_feed = Some(feed("user", "alice", &[]));
        let caps: CapabilitySet = [Capability::ReadFeed].into_iter().collect();
        let map = CapabilityMap::from([(FeedId::new("user", "alice"), caps.clone())]);

        let event = FeedsEvent::ActivityUpdated {
            activity,
            fid: FeedId::new("user", "alice"),
        }
        .with_capabilities(&map);

        match event {
            FeedsEvent::ActivityUpdated { activity, .. } => {
                assert_eq!(activity.current_feed.unwrap().own_capabilities, caps);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_capabilities_event_carries_nothing() {
        let event = FeedsEvent::FeedOwnCapabilitiesUpdated {
            capabilities: CapabilityMap::from([(
                FeedId::new("user", "alice"),
                [Capability::ReadFeed].into_iter().collect(),
            )]),
        };
        assert!(event.referenced_feeds().is_empty());
        assert!(event.own_capabilities().is_empty());
    }

    #[test]
    fn test_activity_without_current_feed_references_nothing() {
        let event = FeedsEvent::ActivityAdded {
            activity: ActivityData::new("a1", "alice", Timestamp(1)),
            fid: FeedId::new("user", "alice"),
        };
        assert!(event.referenced_feeds().is_empty());
    }
}
