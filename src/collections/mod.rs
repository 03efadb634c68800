//! Ordered, de-duplicated record collections.
//!
//! Feature state (a feed's activities, an activity's comments, a feed's
//! followers, ...) is kept in sequences of records with unique identities,
//! optionally sorted. Events are applied to them with:
//! - positional operations: [`insert_or_replace`], [`remove_by_id`], [`update_by_id`]
//! - sorted operations: [`sorted_insert`], [`sorted_merge`], [`sorted_update`]
//! - batches: [`ModelUpdates`]
//!
//! Sorted operations break comparator ties by identity so that the same set of
//! records always lands in the same order.
//!
//! [`insert_or_replace`]: OrderedCollectionExt::insert_or_replace
//! [`remove_by_id`]: OrderedCollectionExt::remove_by_id
//! [`update_by_id`]: OrderedCollectionExt::update_by_id
//! [`sorted_insert`]: OrderedCollectionExt::sorted_insert
//! [`sorted_merge`]: OrderedCollectionExt::sorted_merge
//! [`sorted_update`]: OrderedCollectionExt::sorted_update

mod collection;
mod ordered;
mod updates;

pub use collection::{OrderedCollection, SortOrder};
pub use ordered::{compare_with_identity, Nesting, OrderedCollectionExt};
pub use updates::ModelUpdates;

use std::cmp::Ordering;

/// Comparator ordering records by ascending `key`.
pub fn ascending<T, K, F>(key: F) -> impl Fn(&T, &T) -> Ordering
where
    K: Ord,
    F: Fn(&T) -> K,
{
    move |a: &T, b: &T| key(a).cmp(&key(b))
}

/// Comparator ordering records by descending `key` (newest first for timestamps).
pub fn descending<T, K, F>(key: F) -> impl Fn(&T, &T) -> Ordering
where
    K: Ord,
    F: Fn(&T) -> K,
{
    move |a: &T, b: &T| key(b).cmp(&key(a))
}
