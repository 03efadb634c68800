//! Mapping from transport events to canonical events.

use super::raw::RawEvent;
use super::types::FeedsEvent;

/// Map a transport event to its canonical form.
///
/// Returns `None` for kinds with no canonical meaning (connection lifecycle,
/// moderation, unknown kinds). Pure: no I/O, no logging, no shared state.
pub fn normalize(raw: RawEvent) -> Option<FeedsEvent> {
    let event = match raw {
        RawEvent::ActivityAdded(e) => FeedsEvent::ActivityAdded {
            activity: e.activity,
            fid: e.fid,
        },
        RawEvent::ActivityUpdated(e) => FeedsEvent::ActivityUpdated {
            activity: e.activity,
            fid: e.fid,
        },
        RawEvent::ActivityDeleted(e) => FeedsEvent::ActivityDeleted {
            activity_id: e.activity.id,
            fid: e.fid,
        },
        RawEvent::ActivityReactionAdded(e) => FeedsEvent::ActivityReactionAdded {
            reaction: e.reaction,
            activity: e.activity,
            fid: e.fid,
        },
        RawEvent::ActivityReactionUpdated(e) => FeedsEvent::ActivityReactionUpdated {
            reaction: e.reaction,
            activity: e.activity,
            fid: e.fid,
        },
        RawEvent::ActivityReactionDeleted(e) => FeedsEvent::ActivityReactionDeleted {
            reaction: e.reaction,
            activity: e.activity,
            fid: e.fid,
        },
        RawEvent::BookmarkAdded(e) => FeedsEvent::BookmarkAdded {
            bookmark: e.bookmark,
        },
        RawEvent::BookmarkUpdated(e) => FeedsEvent::BookmarkUpdated {
            bookmark: e.bookmark,
        },
        RawEvent::BookmarkDeleted(e) => FeedsEvent::BookmarkDeleted {
            bookmark: e.bookmark,
        },
        RawEvent::BookmarkFolderUpdated(e) => FeedsEvent::BookmarkFolderUpdated {
            folder: e.bookmark_folder,
        },
        RawEvent::BookmarkFolderDeleted(e) => FeedsEvent::BookmarkFolderDeleted {
            folder_id: e.bookmark_folder.id,
        },
        RawEvent::CommentAdded(e) => FeedsEvent::CommentAdded {
            comment: e.comment,
            activity: e.activity,
            fid: e.fid,
        },
        RawEvent::CommentUpdated(e) => FeedsEvent::CommentUpdated {
            comment: e.comment,
            fid: e.fid,
        },
        RawEvent::CommentDeleted(e) => FeedsEvent::CommentDeleted {
            comment: e.comment,
            fid: e.fid,
        },
        RawEvent::CommentReactionAdded(e) => FeedsEvent::CommentReactionAdded {
            reaction: e.reaction,
            comment: e.comment,
            fid: e.fid,
        },
        RawEvent::CommentReactionUpdated(e) => FeedsEvent::CommentReactionUpdated {
            reaction: e.reaction,
            comment: e.comment,
            fid: e.fid,
        },
        RawEvent::CommentReactionDeleted(e) => FeedsEvent::CommentReactionDeleted {
            reaction: e.reaction,
            comment: e.comment,
            fid: e.fid,
        },
        RawEvent::PollUpdated(e) | RawEvent::PollClosed(e) => FeedsEvent::PollUpdated {
            poll: e.poll,
            fid: e.fid,
        },
        RawEvent::PollDeleted(e) => FeedsEvent::PollDeleted {
            poll_id: e.poll.id,
            fid: e.fid,
        },
        RawEvent::PollVoteCasted(e) => FeedsEvent::PollVoteCasted {
            vote: e.poll_vote,
            poll: e.poll,
            fid: e.fid,
        },
        RawEvent::PollVoteChanged(e) => FeedsEvent::PollVoteChanged {
            vote: e.poll_vote,
            poll: e.poll,
            fid: e.fid,
        },
        RawEvent::PollVoteRemoved(e) => FeedsEvent::PollVoteRemoved {
            vote: e.poll_vote,
            poll: e.poll,
            fid: e.fid,
        },
        RawEvent::FeedCreated(e) => FeedsEvent::FeedAdded { feed: e.feed },
        RawEvent::FeedUpdated(e) => FeedsEvent::FeedUpdated { feed: e.feed },
        RawEvent::FeedDeleted(e) => FeedsEvent::FeedDeleted { fid: e.fid },
        RawEvent::FeedGroupChanged(e) => FeedsEvent::FeedGroupChanged {
            group: e.feed_group,
            fid: e.fid,
        },
        RawEvent::FeedGroupDeleted(e) => FeedsEvent::FeedGroupDeleted {
            group_id: e.group_id,
            fid: e.fid,
        },
        RawEvent::FollowCreated(e) => FeedsEvent::FollowAdded { follow: e.follow },
        RawEvent::FollowUpdated(e) => FeedsEvent::FollowUpdated { follow: e.follow },
        RawEvent::FollowDeleted(e) => FeedsEvent::FollowDeleted { follow: e.follow },
        RawEvent::FeedMemberAdded(e) => FeedsEvent::FeedMemberAdded {
            member: e.member,
            fid: e.fid,
        },
        RawEvent::FeedMemberUpdated(e) => FeedsEvent::FeedMemberUpdated {
            member: e.member,
            fid: e.fid,
        },
        RawEvent::FeedMemberRemoved(e) => FeedsEvent::FeedMemberDeleted {
            member_id: e.member_id,
            fid: e.fid,
        },
        RawEvent::NotificationFeedUpdated(e) => FeedsEvent::NotificationFeedUpdated {
            status: e.notification_status,
            fid: e.fid,
        },
        RawEvent::UserUpdated(e) => FeedsEvent::UserUpdated { user: e.user },

        RawEvent::ConnectionOk(_)
        | RawEvent::HealthCheck(_)
        | RawEvent::ModerationFlagged(_)
        | RawEvent::ModerationMarkReviewed(_)
        | RawEvent::Unknown => return None,
    };
    Some(event)
}

/// The update for a reshared parent implied by an `ActivityAdded` event.
///
/// The transport does not re-push the parent when its share counters change,
/// so whoever publishes an added reshare must publish this as well.
pub fn reshared_parent_update(event: &FeedsEvent) -> Option<FeedsEvent> {
    match event {
        FeedsEvent::ActivityAdded { activity, fid } => {
            activity
                .parent
                .as_deref()
                .map(|parent| FeedsEvent::ActivityUpdated {
                    activity: parent.clone(),
                    fid: fid.clone(),
                })
        }
        _ => None,
    }
}

/// Normalize a transport event and append any implied parent update.
pub fn normalize_all(raw: RawEvent) -> Vec<FeedsEvent> {
    let Some(event) = normalize(raw) else {
        return Vec::new();
    };
    let parent = reshared_parent_update(&event);
    std::iter::once(event).chain(parent).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::raw::{ActivityPayload, ConnectionPayload, FeedMemberRemovedPayload};
    use crate::models::ActivityData;
    use crate::types::{FeedId, Timestamp};
    use std::sync::Arc;

    fn fid() -> FeedId {
        FeedId::new("user", "alice")
    }

    #[test]
    fn test_activity_added_maps_payload() {
        let activity = ActivityData::new("a1", "alice", Timestamp(10));
        let event = normalize(RawEvent::ActivityAdded(ActivityPayload {
            fid: fid(),
            activity: activity.clone(),
        }));
        assert_eq!(
            event,
            Some(FeedsEvent::ActivityAdded {
                activity,
                fid: fid()
            })
        );
    }

    #[test]
    fn test_deleted_events_carry_identity_only() {
        let event = normalize(RawEvent::ActivityDeleted(ActivityPayload {
            fid: fid(),
            activity: ActivityData::new("gone", "alice", Timestamp(1)),
        }));
        assert!(matches!(
            event,
            Some(FeedsEvent::ActivityDeleted { ref activity_id, .. }) if activity_id == "gone"
        ));

        let event = normalize(RawEvent::FeedMemberRemoved(FeedMemberRemovedPayload {
            fid: fid(),
            member_id: "bob".into(),
        }));
        assert!(matches!(
            event,
            Some(FeedsEvent::FeedMemberDeleted { ref member_id, .. }) if member_id == "bob"
        ));
    }

    #[test]
    fn test_lifecycle_and_unknown_are_dropped() {
        assert_eq!(normalize(RawEvent::ConnectionOk(ConnectionPayload::default())), None);
        assert_eq!(normalize(RawEvent::HealthCheck(ConnectionPayload::default())), None);
        assert_eq!(normalize(RawEvent::Unknown), None);
        assert!(normalize_all(RawEvent::Unknown).is_empty());
    }

    #[test]
    fn test_reshare_synthesizes_parent_update() {
        let mut parent = ActivityData::new("orig", "bob", Timestamp(1));
        parent.share_count = 2;
        let mut share = ActivityData::new("share", "alice", Timestamp(5));
        share.parent = Some(Arc::new(parent.clone()));

        let events = normalize_all(RawEvent::ActivityAdded(ActivityPayload {
            fid: fid(),
            activity: share,
        }));

        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], FeedsEvent::ActivityAdded { activity, .. } if activity.id == "share"));
        assert_eq!(
            events[1],
            FeedsEvent::ActivityUpdated {
                activity: parent,
                fid: fid()
            }
        );
    }

    #[test]
    fn test_plain_activity_has_no_parent_update() {
        let events = normalize_all(RawEvent::ActivityAdded(ActivityPayload {
            fid: fid(),
            activity: ActivityData::new("a1", "alice", Timestamp(1)),
        }));
        assert_eq!(events.len(), 1);
    }
}
