//! Domain records mirrored from the feeds service.
//!
//! Records are plain immutable snapshots. An activity that reshares another
//! holds its parent as a shared snapshot (`Arc`), never a back-pointer, so the
//! graph stays acyclic; the authoritative copy of the parent lives in whatever
//! collection owns it and is looked up by identity.

use crate::types::{CapabilitySet, FeedId, Identifiable, Timestamp};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Free-form custom data attached to a record.
pub type CustomData = serde_json::Map<String, serde_json::Value>;

/// A feed, including the capabilities the current user holds on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedData {
    pub fid: FeedId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
    #[serde(default)]
    pub follower_count: u32,
    #[serde(default)]
    pub following_count: u32,
    #[serde(default)]
    pub member_count: u32,
    /// Empty when the payload came from the streaming transport.
    #[serde(default)]
    pub own_capabilities: CapabilitySet,
    #[serde(default)]
    pub custom: CustomData,
}

impl FeedData {
    pub fn new(fid: FeedId) -> Self {
        Self {
            fid,
            name: String::new(),
            description: String::new(),
            created_by: String::new(),
            created_at: Timestamp::default(),
            updated_at: Timestamp::default(),
            follower_count: 0,
            following_count: 0,
            member_count: 0,
            own_capabilities: CapabilitySet::new(),
            custom: CustomData::new(),
        }
    }
}

impl Identifiable for FeedData {
    type Id = FeedId;

    fn id(&self) -> FeedId {
        self.fid.clone()
    }
}

/// A single feed entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityData {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub user_id: String,
    pub text: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub feeds: Vec<FeedId>,
    /// The feed this copy of the activity was delivered through.
    pub current_feed: Option<FeedData>,
    /// The activity this one reshares.
    pub parent: Option<Arc<ActivityData>>,
    pub reaction_count: u32,
    pub comment_count: u32,
    pub share_count: u32,
    pub bookmark_count: u32,
    pub latest_reactions: Vec<ReactionData>,
    pub own_reactions: Vec<ReactionData>,
    pub comments: Vec<CommentData>,
    pub poll: Option<PollData>,
    pub custom: CustomData,
}

impl ActivityData {
    pub fn new(id: impl Into<String>, user_id: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            id: id.into(),
            kind: "post".to_string(),
            user_id: user_id.into(),
            created_at,
            updated_at: created_at,
            ..Default::default()
        }
    }

    /// Identity of the reshared parent, if any.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent.as_deref().map(|p| p.id.as_str())
    }
}

impl Identifiable for ActivityData {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }
}

/// A reaction on an activity or on a comment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionData {
    #[serde(rename = "type")]
    pub kind: String,
    pub user_id: String,
    pub activity_id: String,
    /// Set when the reaction targets a comment rather than the activity.
    pub comment_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Identifiable for ReactionData {
    type Id = String;

    fn id(&self) -> String {
        let target = self.comment_id.as_deref().unwrap_or(&self.activity_id);
        format!("{}-{}-{}", target, self.kind, self.user_id)
    }
}

/// A comment, possibly with a loaded slice of threaded replies.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentData {
    pub id: String,
    /// Id of the commented object (an activity).
    pub object_id: String,
    pub user_id: String,
    pub parent_id: Option<String>,
    pub text: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub reaction_count: u32,
    pub reply_count: u32,
    pub latest_reactions: Vec<ReactionData>,
    pub own_reactions: Vec<ReactionData>,
    /// `None` when replies have not been loaded.
    pub replies: Option<Vec<CommentData>>,
}

impl CommentData {
    /// Child accessor for nested collection search.
    pub fn replies_mut(&mut self) -> Option<&mut Vec<CommentData>> {
        self.replies.as_mut()
    }
}

impl Identifiable for CommentData {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookmarkFolderData {
    pub id: String,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Identifiable for BookmarkFolderData {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }
}

/// A bookmark of an activity by a user, optionally filed into a folder.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookmarkData {
    pub activity: ActivityData,
    pub user_id: String,
    pub folder: Option<BookmarkFolderData>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Identifiable for BookmarkData {
    type Id = String;

    fn id(&self) -> String {
        let folder = self.folder.as_ref().map(|f| f.id.as_str()).unwrap_or("");
        format!("{}-{}-{}", self.activity.id, folder, self.user_id)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollOptionData {
    pub id: String,
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollVoteData {
    pub id: String,
    pub poll_id: String,
    pub option_id: String,
    pub user_id: String,
    pub is_answer: bool,
    pub answer_text: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Identifiable for PollVoteData {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollData {
    pub id: String,
    pub name: String,
    pub options: Vec<PollOptionData>,
    pub vote_count: u32,
    pub is_closed: bool,
    pub own_votes: Vec<PollVoteData>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Identifiable for PollData {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedGroupData {
    pub id: String,
    pub default_visibility: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Identifiable for FeedGroupData {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowStatus {
    #[default]
    Accepted,
    Pending,
    Rejected,
}

/// A follow relationship between two feeds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FollowData {
    pub source_feed: FeedData,
    pub target_feed: FeedData,
    #[serde(default)]
    pub status: FollowStatus,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl FollowData {
    pub fn new(source_feed: FeedData, target_feed: FeedData) -> Self {
        Self {
            source_feed,
            target_feed,
            status: FollowStatus::Accepted,
            created_at: Timestamp::default(),
            updated_at: Timestamp::default(),
        }
    }
}

impl Identifiable for FollowData {
    type Id = String;

    fn id(&self) -> String {
        format!("{}-{}", self.source_feed.fid, self.target_feed.fid)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedMemberData {
    pub user_id: String,
    pub role: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Identifiable for FeedMemberData {
    type Id = String;

    fn id(&self) -> String {
        self.user_id.clone()
    }
}

/// Read/seen counters of a notification feed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationStatus {
    pub unread: u32,
    pub unseen: u32,
    pub last_read_at: Option<Timestamp>,
    pub last_seen_at: Option<Timestamp>,
    pub read_activities: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserData {
    pub id: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub custom: CustomData,
}

impl Identifiable for UserData {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }
}
