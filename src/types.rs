//! Core identifier and permission types.

use crate::error::FeedsError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// A record with a stable identity, independent of its sort position.
///
/// Identities must be unique within one collection. Their natural ordering is
/// used as the tie-break whenever a comparator reports two records as equal.
pub trait Identifiable {
    type Id: Clone + Eq + Ord + Hash + fmt::Debug;

    fn id(&self) -> Self::Id;
}

/// Composite feed key (`group`, `id`) with the canonical string form `group:id`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeedId {
    group: String,
    id: String,
}

impl FeedId {
    pub fn new(group: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            id: id.into(),
        }
    }

    /// Feed group, e.g. `user` or `timeline`.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Feed id within its group.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Debug for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeedId({}:{})", self.group, self.id)
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.id)
    }
}

impl FromStr for FeedId {
    type Err = FeedsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((group, id)) if !group.is_empty() && !id.is_empty() => Ok(Self::new(group, id)),
            _ => Err(FeedsError::InvalidFeedId(s.to_string())),
        }
    }
}

impl TryFrom<String> for FeedId {
    type Error = FeedsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FeedId> for String {
    fn from(fid: FeedId) -> Self {
        fid.to_string()
    }
}

/// A permission token the current user holds on a specific feed.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Capability {
    AddActivity,
    AddActivityBookmark,
    AddActivityReaction,
    AddComment,
    AddCommentReaction,
    CreateFeed,
    DeleteFeed,
    DeleteOwnActivity,
    DeleteOwnComment,
    Follow,
    PinActivity,
    QueryFeedMembers,
    QueryFollows,
    ReadActivities,
    ReadFeed,
    Unfollow,
    UpdateFeed,
    UpdateFeedMembers,
    UpdateOwnActivity,
    UpdateOwnComment,
    /// A token this client does not know about yet.
    Other(String),
}

impl Capability {
    /// Wire name of the capability.
    pub fn as_str(&self) -> &str {
        match self {
            Capability::AddActivity => "add-activity",
            Capability::AddActivityBookmark => "add-activity-bookmark",
            Capability::AddActivityReaction => "add-activity-reaction",
            Capability::AddComment => "add-comment",
            Capability::AddCommentReaction => "add-comment-reaction",
            Capability::CreateFeed => "create-feed",
            Capability::DeleteFeed => "delete-feed",
            Capability::DeleteOwnActivity => "delete-own-activity",
            Capability::DeleteOwnComment => "delete-own-comment",
            Capability::Follow => "follow",
            Capability::PinActivity => "pin-activity",
            Capability::QueryFeedMembers => "query-feed-members",
            Capability::QueryFollows => "query-follows",
            Capability::ReadActivities => "read-activities",
            Capability::ReadFeed => "read-feed",
            Capability::Unfollow => "unfollow",
            Capability::UpdateFeed => "update-feed",
            Capability::UpdateFeedMembers => "update-feed-members",
            Capability::UpdateOwnActivity => "update-own-activity",
            Capability::UpdateOwnComment => "update-own-comment",
            Capability::Other(name) => name,
        }
    }
}

impl From<&str> for Capability {
    fn from(s: &str) -> Self {
        match s {
            "add-activity" => Capability::AddActivity,
            "add-activity-bookmark" => Capability::AddActivityBookmark,
            "add-activity-reaction" => Capability::AddActivityReaction,
            "add-comment" => Capability::AddComment,
            "add-comment-reaction" => Capability::AddCommentReaction,
            "create-feed" => Capability::CreateFeed,
            "delete-feed" => Capability::DeleteFeed,
            "delete-own-activity" => Capability::DeleteOwnActivity,
            "delete-own-comment" => Capability::DeleteOwnComment,
            "follow" => Capability::Follow,
            "pin-activity" => Capability::PinActivity,
            "query-feed-members" => Capability::QueryFeedMembers,
            "query-follows" => Capability::QueryFollows,
            "read-activities" => Capability::ReadActivities,
            "read-feed" => Capability::ReadFeed,
            "unfollow" => Capability::Unfollow,
            "update-feed" => Capability::UpdateFeed,
            "update-feed-members" => Capability::UpdateFeedMembers,
            "update-own-activity" => Capability::UpdateOwnActivity,
            "update-own-comment" => Capability::UpdateOwnComment,
            other => Capability::Other(other.to_string()),
        }
    }
}

impl From<String> for Capability {
    fn from(s: String) -> Self {
        Capability::from(s.as_str())
    }
}

impl From<Capability> for String {
    fn from(capability: Capability) -> Self {
        capability.as_str().to_string()
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Capability({})", self.as_str())
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission tokens held on one feed. Ordered so equal sets compare equal.
pub type CapabilitySet = BTreeSet<Capability>;

/// Capability sets keyed by feed.
pub type CapabilityMap = HashMap<FeedId, CapabilitySet>;

/// Microseconds since Unix epoch.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Current time.
    pub fn now() -> Self {
        let micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as i64)
            .unwrap_or_default();
        Timestamp(micros)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

/// Where an event entered the publisher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventSource {
    /// Pushed by the remote service over the streaming connection.
    Remote,
    /// Synthesized from a local request/response result.
    Local,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_id_string_form() {
        let fid = FeedId::new("user", "alice");
        assert_eq!(fid.to_string(), "user:alice");
        assert_eq!("user:alice".parse::<FeedId>().unwrap(), fid);
    }

    #[test]
    fn test_feed_id_keeps_colons_in_id() {
        let fid: FeedId = "notification:org:42".parse().unwrap();
        assert_eq!(fid.group(), "notification");
        assert_eq!(fid.id(), "org:42");
    }

    #[test]
    fn test_feed_id_rejects_malformed() {
        for bad in ["", "user", "user:", ":alice"] {
            assert!(matches!(
                bad.parse::<FeedId>(),
                Err(FeedsError::InvalidFeedId(_))
            ));
        }
    }

    #[test]
    fn test_feed_id_serde_as_string() {
        let fid = FeedId::new("timeline", "bob");
        let json = serde_json::to_string(&fid).unwrap();
        assert_eq!(json, "\"timeline:bob\"");
        let back: FeedId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fid);
        assert!(serde_json::from_str::<FeedId>("\"nocolon\"").is_err());
    }

    #[test]
    fn test_capability_wire_names() {
        let set: CapabilitySet =
            serde_json::from_str(r#"["read-feed", "add-activity", "teleport"]"#).unwrap();
        assert!(set.contains(&Capability::ReadFeed));
        assert!(set.contains(&Capability::AddActivity));
        assert!(set.contains(&Capability::Other("teleport".to_string())));

        let json = serde_json::to_string(&Capability::QueryFollows).unwrap();
        assert_eq!(json, "\"query-follows\"");
    }
}
