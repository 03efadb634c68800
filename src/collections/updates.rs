//! Batch transitions for ordered collections.

use crate::types::Identifiable;

/// Additions, in-place updates and removals applied to a collection as one
/// transition. Used for paginated bulk loads and multi-record push updates.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelUpdates<T: Identifiable> {
    pub added: Vec<T>,
    pub updated: Vec<T>,
    pub removed_ids: Vec<T::Id>,
}

impl<T: Identifiable> ModelUpdates<T> {
    pub fn new(added: Vec<T>, updated: Vec<T>, removed_ids: Vec<T::Id>) -> Self {
        Self {
            added,
            updated,
            removed_ids,
        }
    }

    /// Only additions.
    pub fn added(added: Vec<T>) -> Self {
        Self::new(added, Vec::new(), Vec::new())
    }

    /// Only in-place updates.
    pub fn updated(updated: Vec<T>) -> Self {
        Self::new(Vec::new(), updated, Vec::new())
    }

    /// Only removals.
    pub fn removed(removed_ids: Vec<T::Id>) -> Self {
        Self::new(Vec::new(), Vec::new(), removed_ids)
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed_ids.is_empty()
    }

    /// Total number of records touched.
    pub fn len(&self) -> usize {
        self.added.len() + self.updated.len() + self.removed_ids.len()
    }

    /// Every record carried by the batch, additions first.
    pub fn records(&self) -> impl Iterator<Item = &T> {
        self.added.iter().chain(self.updated.iter())
    }

    /// Every record carried by the batch, mutably.
    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.added.iter_mut().chain(self.updated.iter_mut())
    }
}

impl<T: Identifiable> Default for ModelUpdates<T> {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new())
    }
}
