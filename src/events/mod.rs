//! Canonical events and their delivery.
//!
//! Transport events ([`RawEvent`]) are normalized into one vocabulary
//! ([`FeedsEvent`]) and published through an [`EventPublisher`]:
//! - middlewares rewrite each event in registration order
//! - subscribers then receive the final event concurrently
//! - local request results enter through the same `publish` call
//!
//! # Example
//!
//! ```ignore
//! let publisher = EventPublisher::new();
//! let _token = publisher.subscribe_fn(|event| println!("{}", event.kind()));
//!
//! for event in normalize_all(RawEvent::from_json(frame)?) {
//!     publisher.publish(event, EventSource::Remote).await;
//! }
//! ```

mod normalize;
mod publisher;
mod raw;
mod types;

pub use normalize::{normalize, normalize_all, reshared_parent_update};
pub use publisher::{
    EventMiddleware, EventPublisher, EventStream, EventSubscriber, SubscriptionId,
    SubscriptionToken, WeakEventPublisher,
};
pub use raw::{
    ActivityPayload, ActivityReactionPayload, BookmarkFolderPayload, BookmarkPayload,
    CommentAddedPayload, CommentPayload, CommentReactionPayload, ConnectionPayload,
    FeedDeletedPayload, FeedGroupChangedPayload, FeedGroupDeletedPayload,
    FeedMemberPayload, FeedMemberRemovedPayload, FeedPayload, FollowPayload,
    ModerationPayload, NotificationFeedPayload, PollPayload, PollVotePayload, RawEvent,
    UserPayload,
};
pub use types::FeedsEvent;
