//! In-place algorithms over identity-bearing sequences.

use crate::types::Identifiable;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Accessor for an optional child sequence of the same record type.
pub type Nesting<T> = fn(&mut T) -> Option<&mut Vec<T>>;

/// Compare with `cmp`, breaking ties by identity so that repeated merges of the
/// same logical set always produce the same order.
pub fn compare_with_identity<T, F>(cmp: &F, a: &T, b: &T) -> Ordering
where
    T: Identifiable,
    F: Fn(&T, &T) -> Ordering + ?Sized,
{
    cmp(a, b).then_with(|| a.id().cmp(&b.id()))
}

/// Collection operations on a sequence of records with unique identities.
///
/// "Not found" is never an error: operations report whether they touched
/// anything through their return value.
pub trait OrderedCollectionExt<T: Identifiable> {
    /// Replace the record with the same identity in place, or prepend it.
    /// Returns the replaced record.
    fn insert_or_replace(&mut self, record: T) -> Option<T>;

    /// Remove the record with `id`, preserving the order of the rest.
    fn remove_by_id(&mut self, id: &T::Id) -> Option<T>;

    /// Remove every record whose identity is in `ids`. Returns how many went.
    fn remove_all<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = T::Id>;

    /// Insert into a sorted sequence, dropping any older copy of the record.
    ///
    /// The old copy may sit anywhere if its sort key changed, so after the
    /// binary-search insert the neighbourhood is scanned outward from the
    /// insertion point until the duplicate is found or both ends are reached.
    fn sorted_insert<F>(&mut self, record: T, cmp: F)
    where
        F: Fn(&T, &T) -> Ordering;

    /// Merge `incoming` into a copy of this sorted sequence.
    ///
    /// Incoming records win: any existing record whose identity appears in
    /// `incoming` is dropped, whatever its position. Within `incoming` the
    /// last copy of an identity wins.
    fn sorted_merge<F>(&self, incoming: Vec<T>, cmp: F) -> Vec<T>
    where
        T: Clone,
        F: Fn(&T, &T) -> Ordering;

    /// Locate the record matching `target` and rewrite it with `changes`
    /// (returning `None` deletes it), then restore the sort order.
    ///
    /// Lookup is a binary search on `target`, falling back to a linear scan by
    /// identity when the stored copy has a stale sort key. With `nesting`, child
    /// sequences are searched depth-first when nothing matches at this level.
    /// Each fallback is O(n), which is fine for feed-sized collections but not
    /// for large ones whose keys change often.
    fn sorted_update<F, C>(
        &mut self,
        target: &T,
        nesting: Option<Nesting<T>>,
        cmp: F,
        changes: C,
    ) -> bool
    where
        F: Fn(&T, &T) -> Ordering,
        C: FnOnce(T) -> Option<T>;

    /// Replace the stored copy of `record`. Returns false if it was absent.
    fn sorted_replace<F>(&mut self, record: T, nesting: Option<Nesting<T>>, cmp: F) -> bool
    where
        F: Fn(&T, &T) -> Ordering;

    /// Remove the stored copy of `target`. Returns false if it was absent.
    fn sorted_remove<F>(&mut self, target: &T, nesting: Option<Nesting<T>>, cmp: F) -> bool
    where
        F: Fn(&T, &T) -> Ordering;

    /// Rewrite the record with `id` in place, searching children depth-first.
    /// Positions are preserved, so this is the unsorted counterpart of
    /// [`sorted_update`](Self::sorted_update).
    fn update_by_id<C>(&mut self, id: &T::Id, nesting: Option<Nesting<T>>, changes: C) -> bool
    where
        C: FnOnce(T) -> Option<T>;

    /// Mutate the first record matching `predicate`.
    fn update_first<P, C>(&mut self, predicate: P, changes: C) -> bool
    where
        P: FnMut(&T) -> bool,
        C: FnOnce(&mut T);
}

impl<T: Identifiable> OrderedCollectionExt<T> for Vec<T> {
    fn insert_or_replace(&mut self, record: T) -> Option<T> {
        let id = record.id();
        match self.iter().position(|existing| existing.id() == id) {
            Some(index) => Some(std::mem::replace(&mut self[index], record)),
            None => {
                self.insert(0, record);
                None
            }
        }
    }

    fn remove_by_id(&mut self, id: &T::Id) -> Option<T> {
        let index = self.iter().position(|existing| existing.id() == *id)?;
        Some(self.remove(index))
    }

    fn remove_all<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = T::Id>,
    {
        let ids: HashSet<T::Id> = ids.into_iter().collect();
        if ids.is_empty() {
            return 0;
        }
        let before = self.len();
        self.retain(|existing| !ids.contains(&existing.id()));
        before - self.len()
    }

    fn sorted_insert<F>(&mut self, record: T, cmp: F)
    where
        F: Fn(&T, &T) -> Ordering,
    {
        let id = record.id();
        let index =
            self.partition_point(|existing| compare_with_identity(&cmp, existing, &record).is_lt());
        self.insert(index, record);

        let mut offset = 1;
        loop {
            let left = index.checked_sub(offset);
            let right = index + offset;
            if left.is_none() && right >= self.len() {
                break;
            }
            if let Some(left) = left {
                if self[left].id() == id {
                    self.remove(left);
                    break;
                }
            }
            if right < self.len() && self[right].id() == id {
                self.remove(right);
                break;
            }
            offset += 1;
        }
    }

    fn sorted_merge<F>(&self, mut incoming: Vec<T>, cmp: F) -> Vec<T>
    where
        T: Clone,
        F: Fn(&T, &T) -> Ordering,
    {
        // A page may carry the same record twice; the later copy wins.
        let mut incoming_ids: HashSet<T::Id> = HashSet::with_capacity(incoming.len());
        incoming.reverse();
        incoming.retain(|record| incoming_ids.insert(record.id()));
        incoming.sort_by(|a, b| compare_with_identity(&cmp, a, b));

        let mut merged = Vec::with_capacity(self.len() + incoming.len());
        let mut existing = self
            .iter()
            .filter(|record| !incoming_ids.contains(&record.id()))
            .peekable();
        let mut incoming = incoming.into_iter().peekable();

        while let (Some(current), Some(next)) = (existing.peek(), incoming.peek()) {
            let take_existing = compare_with_identity(&cmp, *current, next).is_lt();
            if take_existing {
                merged.extend(existing.next().cloned());
            } else {
                merged.extend(incoming.next());
            }
        }
        merged.extend(existing.cloned());
        merged.extend(incoming);
        merged
    }

    fn sorted_update<F, C>(
        &mut self,
        target: &T,
        nesting: Option<Nesting<T>>,
        cmp: F,
        changes: C,
    ) -> bool
    where
        F: Fn(&T, &T) -> Ordering,
        C: FnOnce(T) -> Option<T>,
    {
        apply_sorted(self, target, nesting, &cmp, changes).is_ok()
    }

    fn sorted_replace<F>(&mut self, record: T, nesting: Option<Nesting<T>>, cmp: F) -> bool
    where
        F: Fn(&T, &T) -> Ordering,
    {
        let id = record.id();
        match locate_path(self, &record, &id, nesting, &cmp) {
            Some(path) => {
                replace_at_path(self, &path, nesting, &cmp, record);
                true
            }
            None => false,
        }
    }

    fn sorted_remove<F>(&mut self, target: &T, nesting: Option<Nesting<T>>, cmp: F) -> bool
    where
        F: Fn(&T, &T) -> Ordering,
    {
        apply_sorted(self, target, nesting, &cmp, |_| None).is_ok()
    }

    fn update_by_id<C>(&mut self, id: &T::Id, nesting: Option<Nesting<T>>, changes: C) -> bool
    where
        C: FnOnce(T) -> Option<T>,
    {
        apply_by_id(self, id, nesting, changes).is_ok()
    }

    fn update_first<P, C>(&mut self, predicate: P, changes: C) -> bool
    where
        P: FnMut(&T) -> bool,
        C: FnOnce(&mut T),
    {
        match self.iter().position(predicate) {
            Some(index) => {
                changes(&mut self[index]);
                true
            }
            None => false,
        }
    }
}

/// Binary search for `target`, then a linear scan by identity.
fn locate<T, F>(items: &[T], target: &T, id: &T::Id, cmp: &F) -> Option<usize>
where
    T: Identifiable,
    F: Fn(&T, &T) -> Ordering + ?Sized,
{
    items
        .binary_search_by(|existing| compare_with_identity(cmp, existing, target))
        .ok()
        .or_else(|| items.iter().position(|existing| existing.id() == *id))
}

/// Returns the unused `changes` when nothing matched.
fn apply_sorted<T, F, C>(
    items: &mut Vec<T>,
    target: &T,
    nesting: Option<Nesting<T>>,
    cmp: &F,
    changes: C,
) -> Result<(), C>
where
    T: Identifiable,
    F: Fn(&T, &T) -> Ordering + ?Sized,
    C: FnOnce(T) -> Option<T>,
{
    let id = target.id();
    if let Some(index) = locate(items, target, &id, cmp) {
        let current = items.remove(index);
        if let Some(updated) = changes(current) {
            items.push(updated);
            items.sort_by(|a, b| compare_with_identity(cmp, a, b));
        }
        return Ok(());
    }

    let Some(nesting) = nesting else {
        return Err(changes);
    };
    let mut changes = changes;
    for item in items.iter_mut() {
        if let Some(children) = nesting(item) {
            match apply_sorted(children, target, Some(nesting), cmp, changes) {
                Ok(()) => return Ok(()),
                Err(unused) => changes = unused,
            }
        }
    }
    Err(changes)
}

/// Index path to the record matching `target`, one index per nesting level.
fn locate_path<T, F>(
    items: &mut [T],
    target: &T,
    id: &T::Id,
    nesting: Option<Nesting<T>>,
    cmp: &F,
) -> Option<Vec<usize>>
where
    T: Identifiable,
    F: Fn(&T, &T) -> Ordering + ?Sized,
{
    if let Some(index) = locate(items, target, id, cmp) {
        return Some(vec![index]);
    }
    let nesting = nesting?;
    for (index, item) in items.iter_mut().enumerate() {
        if let Some(children) = nesting(item) {
            if let Some(mut path) = locate_path(children, target, id, Some(nesting), cmp) {
                path.insert(0, index);
                return Some(path);
            }
        }
    }
    None
}

fn replace_at_path<T, F>(
    items: &mut Vec<T>,
    path: &[usize],
    nesting: Option<Nesting<T>>,
    cmp: &F,
    record: T,
) where
    T: Identifiable,
    F: Fn(&T, &T) -> Ordering + ?Sized,
{
    match path {
        [index] => {
            items[*index] = record;
            items.sort_by(|a, b| compare_with_identity(cmp, a, b));
        }
        [index, rest @ ..] => {
            if let Some(children) = nesting.and_then(|nesting| nesting(&mut items[*index])) {
                replace_at_path(children, rest, nesting, cmp, record);
            }
        }
        [] => {}
    }
}

fn apply_by_id<T, C>(
    items: &mut Vec<T>,
    id: &T::Id,
    nesting: Option<Nesting<T>>,
    changes: C,
) -> Result<(), C>
where
    T: Identifiable,
    C: FnOnce(T) -> Option<T>,
{
    if let Some(index) = items.iter().position(|existing| existing.id() == *id) {
        let current = items.remove(index);
        if let Some(updated) = changes(current) {
            items.insert(index, updated);
        }
        return Ok(());
    }

    let Some(nesting) = nesting else {
        return Err(changes);
    };
    let mut changes = changes;
    for item in items.iter_mut() {
        if let Some(children) = nesting(item) {
            match apply_by_id(children, id, Some(nesting), changes) {
                Ok(()) => return Ok(()),
                Err(unused) => changes = unused,
            }
        }
    }
    Err(changes)
}
