//! Typed transport events as decoded from the streaming connection.
//!
//! These mirror the service's wire events one to one. Kinds this client does
//! not recognise decode to [`RawEvent::Unknown`] instead of failing.

use crate::models::{
    ActivityData, BookmarkData, BookmarkFolderData, CommentData, FeedData, FeedGroupData,
    FeedMemberData, FollowData, NotificationStatus, PollData, PollVoteData, ReactionData,
    UserData,
};
use crate::types::FeedId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivityPayload {
    pub fid: FeedId,
    pub activity: ActivityData,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivityReactionPayload {
    pub fid: FeedId,
    pub activity: ActivityData,
    pub reaction: ReactionData,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookmarkPayload {
    pub bookmark: BookmarkData,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkFolderPayload {
    pub bookmark_folder: BookmarkFolderData,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommentAddedPayload {
    pub fid: FeedId,
    pub comment: CommentData,
    pub activity: ActivityData,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPayload {
    pub fid: FeedId,
    pub comment: CommentData,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentReactionPayload {
    pub fid: FeedId,
    pub comment: CommentData,
    pub reaction: ReactionData,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollPayload {
    pub fid: FeedId,
    pub poll: PollData,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollVotePayload {
    pub fid: FeedId,
    pub poll: PollData,
    pub poll_vote: PollVoteData,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedPayload {
    pub fid: FeedId,
    pub feed: FeedData,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedDeletedPayload {
    pub fid: FeedId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedGroupChangedPayload {
    pub fid: FeedId,
    pub feed_group: FeedGroupData,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedGroupDeletedPayload {
    pub fid: FeedId,
    pub group_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FollowPayload {
    pub fid: FeedId,
    pub follow: FollowData,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedMemberPayload {
    pub fid: FeedId,
    pub member: FeedMemberData,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedMemberRemovedPayload {
    pub fid: FeedId,
    pub member_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationFeedPayload {
    pub fid: FeedId,
    #[serde(default)]
    pub notification_status: NotificationStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserPayload {
    pub user: UserData,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionPayload {
    pub connection_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationPayload {
    pub entity_id: String,
    pub entity_kind: String,
}

/// A decoded transport event, tagged by its wire `type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RawEvent {
    #[serde(rename = "feeds.activity.added")]
    ActivityAdded(ActivityPayload),
    #[serde(rename = "feeds.activity.updated")]
    ActivityUpdated(ActivityPayload),
    #[serde(rename = "feeds.activity.deleted")]
    ActivityDeleted(ActivityPayload),
    #[serde(rename = "feeds.activity.reaction.added")]
    ActivityReactionAdded(ActivityReactionPayload),
    #[serde(rename = "feeds.activity.reaction.updated")]
    ActivityReactionUpdated(ActivityReactionPayload),
    #[serde(rename = "feeds.activity.reaction.deleted")]
    ActivityReactionDeleted(ActivityReactionPayload),
    #[serde(rename = "feeds.bookmark.added")]
    BookmarkAdded(BookmarkPayload),
    #[serde(rename = "feeds.bookmark.updated")]
    BookmarkUpdated(BookmarkPayload),
    #[serde(rename = "feeds.bookmark.deleted")]
    BookmarkDeleted(BookmarkPayload),
    #[serde(rename = "feeds.bookmark_folder.updated")]
    BookmarkFolderUpdated(BookmarkFolderPayload),
    #[serde(rename = "feeds.bookmark_folder.deleted")]
    BookmarkFolderDeleted(BookmarkFolderPayload),
    #[serde(rename = "feeds.comment.added")]
    CommentAdded(CommentAddedPayload),
    #[serde(rename = "feeds.comment.updated")]
    CommentUpdated(CommentPayload),
    #[serde(rename = "feeds.comment.deleted")]
    CommentDeleted(CommentPayload),
    #[serde(rename = "feeds.comment.reaction.added")]
    CommentReactionAdded(CommentReactionPayload),
    #[serde(rename = "feeds.comment.reaction.updated")]
    CommentReactionUpdated(CommentReactionPayload),
    #[serde(rename = "feeds.comment.reaction.deleted")]
    CommentReactionDeleted(CommentReactionPayload),
    #[serde(rename = "feeds.poll.updated")]
    PollUpdated(PollPayload),
    #[serde(rename = "feeds.poll.closed")]
    PollClosed(PollPayload),
    #[serde(rename = "feeds.poll.deleted")]
    PollDeleted(PollPayload),
    #[serde(rename = "feeds.poll.vote_casted")]
    PollVoteCasted(PollVotePayload),
    #[serde(rename = "feeds.poll.vote_changed")]
    PollVoteChanged(PollVotePayload),
    #[serde(rename = "feeds.poll.vote_removed")]
    PollVoteRemoved(PollVotePayload),
    #[serde(rename = "feeds.feed.created")]
    FeedCreated(FeedPayload),
    #[serde(rename = "feeds.feed.updated")]
    FeedUpdated(FeedPayload),
    #[serde(rename = "feeds.feed.deleted")]
    FeedDeleted(FeedDeletedPayload),
    #[serde(rename = "feeds.feed_group.changed")]
    FeedGroupChanged(FeedGroupChangedPayload),
    #[serde(rename = "feeds.feed_group.deleted")]
    FeedGroupDeleted(FeedGroupDeletedPayload),
    #[serde(rename = "feeds.follow.created")]
    FollowCreated(FollowPayload),
    #[serde(rename = "feeds.follow.updated")]
    FollowUpdated(FollowPayload),
    #[serde(rename = "feeds.follow.deleted")]
    FollowDeleted(FollowPayload),
    #[serde(rename = "feeds.feed_member.added")]
    FeedMemberAdded(FeedMemberPayload),
    #[serde(rename = "feeds.feed_member.updated")]
    FeedMemberUpdated(FeedMemberPayload),
    #[serde(rename = "feeds.feed_member.removed")]
    FeedMemberRemoved(FeedMemberRemovedPayload),
    #[serde(rename = "feeds.notification_feed.updated")]
    NotificationFeedUpdated(NotificationFeedPayload),
    #[serde(rename = "user.updated")]
    UserUpdated(UserPayload),

    // --- Kinds without a canonical form ---
    #[serde(rename = "connection.ok")]
    ConnectionOk(ConnectionPayload),
    #[serde(rename = "health.check")]
    HealthCheck(ConnectionPayload),
    #[serde(rename = "moderation.flagged")]
    ModerationFlagged(ModerationPayload),
    #[serde(rename = "moderation.mark_reviewed")]
    ModerationMarkReviewed(ModerationPayload),
    #[serde(other)]
    Unknown,
}

impl RawEvent {
    /// Decode one transport frame.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Wire type name.
    pub fn kind(&self) -> &'static str {
        match self {
            RawEvent::ActivityAdded(_) => "feeds.activity.added",
            RawEvent::ActivityUpdated(_) => "feeds.activity.updated",
            RawEvent::ActivityDeleted(_) => "feeds.activity.deleted",
            RawEvent::ActivityReactionAdded(_) => "feeds.activity.reaction.added",
            RawEvent::ActivityReactionUpdated(_) => "feeds.activity.reaction.updated",
            RawEvent::ActivityReactionDeleted(_) => "feeds.activity.reaction.deleted",
            RawEvent::BookmarkAdded(_) => "feeds.bookmark.added",
            RawEvent::BookmarkUpdated(_) => "feeds.bookmark.updated",
            RawEvent::BookmarkDeleted(_) => "feeds.bookmark.deleted",
            RawEvent::BookmarkFolderUpdated(_) => "feeds.bookmark_folder.updated",
            RawEvent::BookmarkFolderDeleted(_) => "feeds.bookmark_folder.deleted",
            RawEvent::CommentAdded(_) => "feeds.comment.added",
            RawEvent::CommentUpdated(_) => "feeds.comment.updated",
            RawEvent::CommentDeleted(_) => "feeds.comment.deleted",
            RawEvent::CommentReactionAdded(_) => "feeds.comment.reaction.added",
            RawEvent::CommentReactionUpdated(_) => "feeds.comment.reaction.updated",
            RawEvent::CommentReactionDeleted(_) => "feeds.comment.reaction.deleted",
            RawEvent::PollUpdated(_) => "feeds.poll.updated",
            RawEvent::PollClosed(_) => "feeds.poll.closed",
            RawEvent::PollDeleted(_) => "feeds.poll.deleted",
            RawEvent::PollVoteCasted(_) => "feeds.poll.vote_casted",
            RawEvent::PollVoteChanged(_) => "feeds.poll.vote_changed",
            RawEvent::PollVoteRemoved(_) => "feeds.poll.vote_removed",
            RawEvent::FeedCreated(_) => "feeds.feed.created",
            RawEvent::FeedUpdated(_) => "feeds.feed.updated",
            RawEvent::FeedDeleted(_) => "feeds.feed.deleted",
            RawEvent::FeedGroupChanged(_) => "feeds.feed_group.changed",
            RawEvent::FeedGroupDeleted(_) => "feeds.feed_group.deleted",
            RawEvent::FollowCreated(_) => "feeds.follow.created",
            RawEvent::FollowUpdated(_) => "feeds.follow.updated",
            RawEvent::FollowDeleted(_) => "feeds.follow.deleted",
            RawEvent::FeedMemberAdded(_) => "feeds.feed_member.added",
            RawEvent::FeedMemberUpdated(_) => "feeds.feed_member.updated",
            RawEvent::FeedMemberRemoved(_) => "feeds.feed_member.removed",
            RawEvent::NotificationFeedUpdated(_) => "feeds.notification_feed.updated",
            RawEvent::UserUpdated(_) => "user.updated",
            RawEvent::ConnectionOk(_) => "connection.ok",
            RawEvent::HealthCheck(_) => "health.check",
            RawEvent::ModerationFlagged(_) => "moderation.flagged",
            RawEvent::ModerationMarkReviewed(_) => "moderation.mark_reviewed",
            RawEvent::Unknown => "unknown",
        }
    }
}
