//! Owned collection state with an optional sort order.

use super::ordered::{compare_with_identity, Nesting, OrderedCollectionExt};
use super::updates::ModelUpdates;
use crate::models::ActivityData;
use crate::types::Identifiable;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Shared comparator for a sorted collection.
pub type SortOrder<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// A de-duplicated sequence of records, sorted when built with a comparator.
///
/// Every mutation routes to the sorted algorithms when an order is set and to
/// the positional ones otherwise, so the invariants hold after each call:
/// identities are unique, and a sorted collection is monotonic under its
/// order with ties broken by identity.
pub struct OrderedCollection<T> {
    items: Vec<T>,
    order: Option<SortOrder<T>>,
    nesting: Option<Nesting<T>>,
}

impl<T: Identifiable> OrderedCollection<T> {
    /// A collection that keeps insertion order (new records are prepended).
    pub fn unsorted() -> Self {
        Self {
            items: Vec::new(),
            order: None,
            nesting: None,
        }
    }

    /// A collection kept sorted by `order`.
    pub fn sorted<F>(order: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        Self {
            items: Vec::new(),
            order: Some(Arc::new(order)),
            nesting: None,
        }
    }

    /// Search child sequences (e.g. comment replies) on update and remove.
    pub fn with_nesting(mut self, nesting: Nesting<T>) -> Self {
        self.nesting = Some(nesting);
        self
    }

    pub fn is_sorted(&self) -> bool {
        self.order.is_some()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Top-level record with `id`.
    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|record| record.id() == *id)
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.get(id).is_some()
    }

    /// Insert a record or replace the stored copy with the same identity.
    pub fn upsert(&mut self, record: T) {
        match &self.order {
            Some(order) => self.items.sorted_insert(record, order.as_ref()),
            None => {
                self.items.insert_or_replace(record);
            }
        }
    }

    /// Rewrite the stored copy of `target`; `None` from `changes` removes it.
    pub fn update<C>(&mut self, target: &T, changes: C) -> bool
    where
        C: FnOnce(T) -> Option<T>,
    {
        match &self.order {
            Some(order) => self
                .items
                .sorted_update(target, self.nesting, order.as_ref(), changes),
            None => self.items.update_by_id(&target.id(), self.nesting, changes),
        }
    }

    /// Replace the stored copy of `record`, leaving absent records absent.
    pub fn replace(&mut self, record: T) -> bool {
        match &self.order {
            Some(order) => self
                .items
                .sorted_replace(record, self.nesting, order.as_ref()),
            None => {
                let id = record.id();
                self.items.update_by_id(&id, self.nesting, |_| Some(record))
            }
        }
    }

    /// Remove the record with `id`, searching nested sequences as well.
    pub fn remove(&mut self, id: &T::Id) -> bool {
        self.items.update_by_id(id, self.nesting, |_| None)
    }

    /// Remove top-level records by identity.
    pub fn remove_all<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = T::Id>,
    {
        self.items.remove_all(ids)
    }

    /// Mutate the first record matching `predicate`. A sorted collection is
    /// re-sorted afterwards, since `changes` may move the sort key.
    pub fn update_first<P, C>(&mut self, predicate: P, changes: C) -> bool
    where
        P: FnMut(&T) -> bool,
        C: FnOnce(&mut T),
    {
        if !self.items.update_first(predicate, changes) {
            return false;
        }
        if let Some(order) = &self.order {
            self.items
                .sort_by(|a, b| compare_with_identity(order.as_ref(), a, b));
        }
        true
    }

    /// Merge a page of records. Incoming copies replace stored ones; an
    /// unsorted collection appends records it did not have.
    pub fn merge(&mut self, incoming: Vec<T>)
    where
        T: Clone,
    {
        match &self.order {
            Some(order) => self.items = self.items.sorted_merge(incoming, order.as_ref()),
            None => {
                for record in incoming {
                    let id = record.id();
                    match self.items.iter().position(|existing| existing.id() == id) {
                        Some(index) => self.items[index] = record,
                        None => self.items.push(record),
                    }
                }
            }
        }
    }

    /// Replace the whole contents, e.g. after a refresh.
    pub fn replace_all(&mut self, mut records: Vec<T>) {
        if let Some(order) = &self.order {
            records.sort_by(|a, b| compare_with_identity(order.as_ref(), a, b));
        }
        self.items = records;
    }

    /// Apply a batch: removals, then updates of present records, then additions.
    pub fn apply(&mut self, updates: ModelUpdates<T>)
    where
        T: Clone,
    {
        let ModelUpdates {
            added,
            updated,
            removed_ids,
        } = updates;

        self.remove_all(removed_ids);
        for record in updated {
            self.replace(record);
        }
        if !added.is_empty() {
            self.merge(added);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn into_inner(self) -> Vec<T> {
        self.items
    }
}

impl OrderedCollection<ActivityData> {
    /// The parent of a reshared activity, preferring the copy held by this
    /// collection over the snapshot embedded in the activity.
    pub fn resolve_parent<'a>(&'a self, activity: &'a ActivityData) -> Option<&'a ActivityData> {
        let parent_id = activity.parent_id()?.to_string();
        self.get(&parent_id).or(activity.parent.as_deref())
    }
}

impl<T: Clone> Clone for OrderedCollection<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            order: self.order.clone(),
            nesting: self.nesting,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for OrderedCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedCollection")
            .field("items", &self.items)
            .field("sorted", &self.order.is_some())
            .field("nested", &self.nesting.is_some())
            .finish()
    }
}
