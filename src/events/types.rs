//! Canonical event vocabulary.

use crate::collections::ModelUpdates;
use crate::models::{
    ActivityData, BookmarkData, BookmarkFolderData, CommentData, FeedData, FeedGroupData,
    FeedMemberData, FollowData, NotificationStatus, PollData, PollVoteData, ReactionData,
    UserData,
};
use crate::types::{CapabilityMap, FeedId};

/// One meaningful change to feed state, whether pushed by the remote service
/// or produced by a successful local request.
///
/// Values are immutable snapshots. Consumers should match exhaustively so a new
/// variant forces every handler to be revisited.
#[derive(Clone, Debug, PartialEq)]
pub enum FeedsEvent {
    // --- Activities ---
    ActivityAdded {
        activity: ActivityData,
        fid: FeedId,
    },
    ActivityUpdated {
        activity: ActivityData,
        fid: FeedId,
    },
    ActivityDeleted {
        activity_id: String,
        fid: FeedId,
    },
    ActivityBatchUpdated {
        updates: ModelUpdates<ActivityData>,
    },

    // --- Activity reactions ---
    ActivityReactionAdded {
        reaction: ReactionData,
        activity: ActivityData,
        fid: FeedId,
    },
    ActivityReactionUpdated {
        reaction: ReactionData,
        activity: ActivityData,
        fid: FeedId,
    },
    ActivityReactionDeleted {
        reaction: ReactionData,
        activity: ActivityData,
        fid: FeedId,
    },

    // --- Bookmarks ---
    BookmarkAdded {
        bookmark: BookmarkData,
    },
    BookmarkUpdated {
        bookmark: BookmarkData,
    },
    BookmarkDeleted {
        bookmark: BookmarkData,
    },
    BookmarkFolderUpdated {
        folder: BookmarkFolderData,
    },
    BookmarkFolderDeleted {
        folder_id: String,
    },

    // --- Comments ---
    CommentAdded {
        comment: CommentData,
        activity: ActivityData,
        fid: FeedId,
    },
    CommentUpdated {
        comment: CommentData,
        fid: FeedId,
    },
    CommentDeleted {
        comment: CommentData,
        fid: FeedId,
    },
    CommentsAddedBatch {
        comments: Vec<CommentData>,
        activity_id: String,
        fid: FeedId,
    },
    CommentReactionAdded {
        reaction: ReactionData,
        comment: CommentData,
        fid: FeedId,
    },
    CommentReactionUpdated {
        reaction: ReactionData,
        comment: CommentData,
        fid: FeedId,
    },
    CommentReactionDeleted {
        reaction: ReactionData,
        comment: CommentData,
        fid: FeedId,
    },

    // --- Polls ---
    PollUpdated {
        poll: PollData,
        fid: FeedId,
    },
    PollDeleted {
        poll_id: String,
        fid: FeedId,
    },
    PollVoteCasted {
        vote: PollVoteData,
        poll: PollData,
        fid: FeedId,
    },
    PollVoteChanged {
        vote: PollVoteData,
        poll: PollData,
        fid: FeedId,
    },
    PollVoteRemoved {
        vote: PollVoteData,
        poll: PollData,
        fid: FeedId,
    },

    // --- Feeds ---
    FeedAdded {
        feed: FeedData,
    },
    FeedUpdated {
        feed: FeedData,
    },
    FeedDeleted {
        fid: FeedId,
    },
    FeedGroupChanged {
        group: FeedGroupData,
        fid: FeedId,
    },
    FeedGroupDeleted {
        group_id: String,
        fid: FeedId,
    },

    // --- Follows ---
    FollowAdded {
        follow: FollowData,
    },
    FollowUpdated {
        follow: FollowData,
    },
    FollowDeleted {
        follow: FollowData,
    },

    // --- Members ---
    FeedMemberAdded {
        member: FeedMemberData,
        fid: FeedId,
    },
    FeedMemberUpdated {
        member: FeedMemberData,
        fid: FeedId,
    },
    FeedMemberDeleted {
        member_id: String,
        fid: FeedId,
    },
    FeedMemberBatchUpdated {
        updates: ModelUpdates<FeedMemberData>,
        fid: FeedId,
    },

    // --- Misc ---
    NotificationFeedUpdated {
        status: NotificationStatus,
        fid: FeedId,
    },
    UserUpdated {
        user: UserData,
    },

    /// Local only: the cached capability sets of these feeds changed.
    FeedOwnCapabilitiesUpdated {
        capabilities: CapabilityMap,
    },
}

impl FeedsEvent {
    /// Stable variant name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            FeedsEvent::ActivityAdded { .. } => "activity_added",
            FeedsEvent::ActivityUpdated { .. } => "activity_updated",
            FeedsEvent::ActivityDeleted { .. } => "activity_deleted",
            FeedsEvent::ActivityBatchUpdated { .. } => "activity_batch_updated",
            FeedsEvent::ActivityReactionAdded { .. } => "activity_reaction_added",
            FeedsEvent::ActivityReactionUpdated { .. } => "activity_reaction_updated",
            FeedsEvent::ActivityReactionDeleted { .. } => "activity_reaction_deleted",
            FeedsEvent::BookmarkAdded { .. } => "bookmark_added",
            FeedsEvent::BookmarkUpdated { .. } => "bookmark_updated",
            FeedsEvent::BookmarkDeleted { .. } => "bookmark_deleted",
            FeedsEvent::BookmarkFolderUpdated { .. } => "bookmark_folder_updated",
            FeedsEvent::BookmarkFolderDeleted { .. } => "bookmark_folder_deleted",
            FeedsEvent::CommentAdded { .. } => "comment_added",
            FeedsEvent::CommentUpdated { .. } => "comment_updated",
            FeedsEvent::CommentDeleted { .. } => "comment_deleted",
            FeedsEvent::CommentsAddedBatch { .. } => "comments_added_batch",
            FeedsEvent::CommentReactionAdded { .. } => "comment_reaction_added",
            FeedsEvent::CommentReactionUpdated { .. } => "comment_reaction_updated",
            FeedsEvent::CommentReactionDeleted { .. } => "comment_reaction_deleted",
            FeedsEvent::PollUpdated { .. } => "poll_updated",
            FeedsEvent::PollDeleted { .. } => "poll_deleted",
            FeedsEvent::PollVoteCasted { .. } => "poll_vote_casted",
            FeedsEvent::PollVoteChanged { .. } => "poll_vote_changed",
            FeedsEvent::PollVoteRemoved { .. } => "poll_vote_removed",
            FeedsEvent::FeedAdded { .. } => "feed_added",
            FeedsEvent::FeedUpdated { .. } => "feed_updated",
            FeedsEvent::FeedDeleted { .. } => "feed_deleted",
            FeedsEvent::FeedGroupChanged { .. } => "feed_group_changed",
            FeedsEvent::FeedGroupDeleted { .. } => "feed_group_deleted",
            FeedsEvent::FollowAdded { .. } => "follow_added",
            FeedsEvent::FollowUpdated { .. } => "follow_updated",
            FeedsEvent::FollowDeleted { .. } => "follow_deleted",
            FeedsEvent::FeedMemberAdded { .. } => "feed_member_added",
            FeedsEvent::FeedMemberUpdated { .. } => "feed_member_updated",
            FeedsEvent::FeedMemberDeleted { .. } => "feed_member_deleted",
            FeedsEvent::FeedMemberBatchUpdated { .. } => "feed_member_batch_updated",
            FeedsEvent::NotificationFeedUpdated { .. } => "notification_feed_updated",
            FeedsEvent::UserUpdated { .. } => "user_updated",
            FeedsEvent::FeedOwnCapabilitiesUpdated { .. } => "feed_own_capabilities_updated",
        }
    }
}
