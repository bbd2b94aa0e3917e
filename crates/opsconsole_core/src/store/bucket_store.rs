//! Ordered bucket store.
//!
//! # Responsibility
//! - Own every item record and the per-bucket rank index.
//! - Implement add/update/remove/move with dense rank maintenance.
//! - Notify subscribers after each committed mutation.
//!
//! # Invariants
//! - For every bucket, item `order` values are exactly `0..n-1`.
//! - Every item is indexed in exactly one bucket, the one its record names.
//! - Empty buckets are not indexed.
//! - Failed operations leave the store untouched (existence is checked
//!   before any write).

use crate::error::{InvariantViolation, StoreError, StoreResult};
use crate::model::item::{Item, ItemId, Payload};
use crate::store::notify::{ChangeNotifier, ListenerId, StoreChange};
use crate::store::snapshot::StoreSnapshot;
use log::debug;
use std::collections::{BTreeMap, HashMap};

/// Requested drop position inside the destination bucket.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MoveTarget {
    /// Append after the last item.
    #[default]
    End,
    /// Insert immediately before this item. Falls back to `End` when the item
    /// is not in the destination bucket.
    Before(ItemId),
    /// Insert at this rank, counted after the moved item left its bucket.
    /// Clamped to the destination size.
    Index(usize),
}

impl From<Option<ItemId>> for MoveTarget {
    fn from(value: Option<ItemId>) -> Self {
        match value {
            Some(id) => Self::Before(id),
            None => Self::End,
        }
    }
}

/// In-memory store of items grouped into ordered buckets.
#[derive(Debug)]
pub struct BucketStore<P> {
    items: HashMap<ItemId, Item<P>>,
    buckets: BTreeMap<String, Vec<ItemId>>,
    revision: u64,
    notifier: ChangeNotifier,
}

impl<P: Payload> BucketStore<P> {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            buckets: BTreeMap::new(),
            revision: 0,
            notifier: ChangeNotifier::new(),
        }
    }

    /// Creates an item at the end of `bucket_key` with a generated id.
    pub fn add(&mut self, bucket_key: impl Into<String>, payload: P) -> Item<P> {
        let mut id = ItemId::generate();
        while self.items.contains_key(&id) {
            id = ItemId::generate();
        }
        self.attach(id, bucket_key.into(), payload)
    }

    /// Creates an item at the end of `bucket_key` with a caller-provided id.
    ///
    /// # Errors
    /// - `DuplicateId` when `id` is already in the store.
    pub fn insert(
        &mut self,
        id: ItemId,
        bucket_key: impl Into<String>,
        payload: P,
    ) -> StoreResult<Item<P>> {
        if self.items.contains_key(&id) {
            return Err(StoreError::DuplicateId(id));
        }
        Ok(self.attach(id, bucket_key.into(), payload))
    }

    /// Merges `patch` into the item payload. Bucket and rank are untouched.
    ///
    /// Returns the updated item.
    pub fn update(&mut self, id: &ItemId, patch: P::Patch) -> StoreResult<Item<P>> {
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        item.payload.apply_patch(patch);
        let updated = item.clone();

        self.commit(|revision| StoreChange::Updated {
            id: id.clone(),
            revision,
        });
        Ok(updated)
    }

    /// Deletes an item and closes the gap it leaves in its bucket.
    ///
    /// Returns the removed item as it was before removal.
    pub fn remove(&mut self, id: &ItemId) -> StoreResult<Item<P>> {
        let removed = self
            .items
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        self.unlink(&removed.bucket_key, removed.order);
        self.reindex(&removed.bucket_key);

        self.commit(|revision| StoreChange::Removed {
            id: id.clone(),
            bucket_key: removed.bucket_key.clone(),
            order: removed.order,
            revision,
        });
        Ok(removed)
    }

    /// Moves an item into `bucket_key` at `target`.
    ///
    /// The item leaves its current bucket before the insertion rank is
    /// resolved, so a target rank or target item always refers to the
    /// destination as it looks without the moved item. A move that lands the
    /// item where it already was changes nothing and notifies nobody.
    ///
    /// # Errors
    /// - `NotFound` when `id` is not in the store. The store is unchanged.
    pub fn move_to(
        &mut self,
        id: &ItemId,
        bucket_key: &str,
        target: MoveTarget,
    ) -> StoreResult<()> {
        let (from_bucket, from_order) = match self.items.get(id) {
            Some(item) => (item.bucket_key.clone(), item.order),
            None => return Err(StoreError::NotFound(id.clone())),
        };
        let same_bucket = from_bucket == bucket_key;

        // Dropping onto itself keeps the current slot.
        let target = match target {
            MoveTarget::Before(target_id) if &target_id == id => {
                if same_bucket {
                    MoveTarget::Index(from_order)
                } else {
                    MoveTarget::End
                }
            }
            other => other,
        };

        self.unlink(&from_bucket, from_order);

        let destination = self.buckets.entry(bucket_key.to_string()).or_default();
        let to_order = match &target {
            MoveTarget::End => destination.len(),
            MoveTarget::Before(target_id) => destination
                .iter()
                .position(|candidate| candidate == target_id)
                .unwrap_or(destination.len()),
            MoveTarget::Index(index) => (*index).min(destination.len()),
        };
        destination.insert(to_order, id.clone());

        if let Some(item) = self.items.get_mut(id) {
            item.bucket_key = bucket_key.to_string();
        }
        self.reindex(&from_bucket);
        if !same_bucket {
            self.reindex(bucket_key);
        }

        if same_bucket && from_order == to_order {
            debug!(
                "event=item_move_noop module=store id={} bucket={} order={}",
                id, bucket_key, to_order
            );
            return Ok(());
        }

        self.commit(|revision| StoreChange::Moved {
            id: id.clone(),
            from_bucket: from_bucket.clone(),
            from_order,
            to_bucket: bucket_key.to_string(),
            to_order,
            revision,
        });
        Ok(())
    }

    /// Ordered copy of one bucket; empty for empty or unknown buckets.
    pub fn query(&self, bucket_key: &str) -> Vec<Item<P>> {
        self.buckets
            .get(bucket_key)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.items.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item<P>> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    /// Total number of items across all buckets.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn bucket_len(&self, bucket_key: &str) -> usize {
        self.buckets.get(bucket_key).map_or(0, Vec::len)
    }

    /// Keys of non-empty buckets, sorted.
    pub fn bucket_keys(&self) -> Vec<String> {
        self.buckets.keys().cloned().collect()
    }

    /// Number of committed mutations so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Detached copy of every bucket at the current revision.
    pub fn snapshot(&self) -> StoreSnapshot<P> {
        let buckets = self
            .buckets
            .keys()
            .map(|key| (key.clone(), self.query(key)))
            .collect();
        StoreSnapshot::new(self.revision, buckets)
    }

    /// Registers a listener called after every committed mutation.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&StoreChange) + Send + 'static,
    {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, listener: ListenerId) -> bool {
        self.notifier.unsubscribe(listener)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.notifier.len()
    }

    /// Swaps the listener registry, returning the previous one.
    pub(crate) fn replace_notifier(&mut self, notifier: ChangeNotifier) -> ChangeNotifier {
        std::mem::replace(&mut self.notifier, notifier)
    }

    /// Checks every structural invariant of the store.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        let mut indexed = 0usize;
        for (bucket, ids) in &self.buckets {
            if ids.is_empty() {
                return Err(InvariantViolation::EmptyBucket(bucket.clone()));
            }
            for (expected, id) in ids.iter().enumerate() {
                indexed += 1;
                let item = self
                    .items
                    .get(id)
                    .ok_or_else(|| InvariantViolation::DanglingId {
                        bucket: bucket.clone(),
                        id: id.clone(),
                    })?;
                if &item.bucket_key != bucket {
                    return Err(InvariantViolation::BucketMismatch {
                        id: id.clone(),
                        indexed: bucket.clone(),
                        recorded: item.bucket_key.clone(),
                    });
                }
                if item.order != expected {
                    return Err(InvariantViolation::OrderGap {
                        id: id.clone(),
                        bucket: bucket.clone(),
                        recorded: item.order,
                        expected,
                    });
                }
            }
        }
        if indexed != self.items.len() {
            return Err(InvariantViolation::CountMismatch {
                indexed,
                records: self.items.len(),
            });
        }
        Ok(())
    }

    fn attach(&mut self, id: ItemId, bucket_key: String, payload: P) -> Item<P> {
        let bucket = self.buckets.entry(bucket_key.clone()).or_default();
        let order = bucket.len();
        bucket.push(id.clone());

        let item = Item {
            id: id.clone(),
            bucket_key: bucket_key.clone(),
            order,
            payload,
        };
        self.items.insert(id.clone(), item.clone());

        self.commit(|revision| StoreChange::Added {
            id,
            bucket_key,
            order,
            revision,
        });
        item
    }

    /// Drops the id at `order` from the bucket index, and the bucket itself
    /// once empty. Record ranks are fixed up by `reindex`.
    fn unlink(&mut self, bucket_key: &str, order: usize) {
        let Some(bucket) = self.buckets.get_mut(bucket_key) else {
            return;
        };
        if order < bucket.len() {
            bucket.remove(order);
        }
        if bucket.is_empty() {
            self.buckets.remove(bucket_key);
        }
    }

    /// Rewrites record ranks of one bucket to match index positions.
    fn reindex(&mut self, bucket_key: &str) {
        let Some(ids) = self.buckets.get(bucket_key) else {
            return;
        };
        for (order, id) in ids.iter().enumerate() {
            if let Some(item) = self.items.get_mut(id) {
                item.order = order;
            }
        }
    }

    fn commit(&mut self, change: impl FnOnce(u64) -> StoreChange) {
        self.revision = self.revision.saturating_add(1);
        debug_assert_eq!(self.verify(), Ok(()));

        let change = change(self.revision);
        debug!(
            "event=store_commit module=store revision={} change={:?}",
            self.revision, change
        );
        self.notifier.emit(&change);
    }
}

impl<P: Payload> Default for BucketStore<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{BucketStore, MoveTarget};
    use crate::error::StoreError;
    use crate::model::item::ItemId;
    use serde_json::{Map, Value};

    type JsonStore = BucketStore<Map<String, Value>>;

    fn ids(store: &JsonStore, bucket: &str) -> Vec<String> {
        store
            .query(bucket)
            .into_iter()
            .map(|item| item.id.to_string())
            .collect()
    }

    fn seeded(bucket: &str, names: &[&str]) -> JsonStore {
        let mut store = JsonStore::new();
        for name in names {
            store
                .insert(ItemId::from(*name), bucket, Map::new())
                .unwrap();
        }
        store
    }

    #[test]
    fn add_appends_with_next_rank() {
        let mut store = JsonStore::new();
        let first = store.add("2024-06-01", Map::new());
        let second = store.add("2024-06-01", Map::new());
        let other = store.add("2024-06-02", Map::new());

        assert_eq!(first.order, 0);
        assert_eq!(second.order, 1);
        assert_eq!(other.order, 0);
        assert_eq!(store.revision(), 3);
    }

    #[test]
    fn insert_rejects_duplicate_id_without_changes() {
        let mut store = seeded("A", &["x"]);
        let err = store
            .insert(ItemId::from("x"), "B", Map::new())
            .unwrap_err();

        assert_eq!(err, StoreError::DuplicateId(ItemId::from("x")));
        assert_eq!(store.bucket_len("B"), 0);
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn move_later_in_same_bucket_lands_before_target() {
        let mut store = seeded("d", &["a", "b", "c", "e"]);
        store
            .move_to(&ItemId::from("a"), "d", MoveTarget::Before(ItemId::from("e")))
            .unwrap();

        assert_eq!(ids(&store, "d"), vec!["b", "c", "a", "e"]);
    }

    #[test]
    fn index_target_is_counted_without_moved_item() {
        let mut store = seeded("d", &["a", "b", "c"]);
        store
            .move_to(&ItemId::from("a"), "d", MoveTarget::Index(2))
            .unwrap();
        assert_eq!(ids(&store, "d"), vec!["b", "c", "a"]);

        store
            .move_to(&ItemId::from("b"), "d", MoveTarget::Index(99))
            .unwrap();
        assert_eq!(ids(&store, "d"), vec!["c", "a", "b"]);
    }

    #[test]
    fn self_target_in_other_bucket_appends() {
        let mut store = seeded("A", &["a"]);
        store.insert(ItemId::from("b"), "B", Map::new()).unwrap();

        store
            .move_to(&ItemId::from("a"), "B", MoveTarget::Before(ItemId::from("a")))
            .unwrap();

        assert_eq!(ids(&store, "B"), vec!["b", "a"]);
        assert!(store.query("A").is_empty());
    }

    #[test]
    fn noop_move_keeps_revision() {
        let mut store = seeded("A", &["a", "b"]);
        let before = store.revision();

        store
            .move_to(&ItemId::from("b"), "A", MoveTarget::End)
            .unwrap();

        assert_eq!(store.revision(), before);
        assert_eq!(ids(&store, "A"), vec!["a", "b"]);
    }

    #[test]
    fn empty_buckets_disappear_from_index() {
        let mut store = seeded("A", &["a"]);
        store
            .move_to(&ItemId::from("a"), "B", MoveTarget::End)
            .unwrap();

        assert_eq!(store.bucket_keys(), vec!["B".to_string()]);
        assert_eq!(store.verify(), Ok(()));
    }

    #[test]
    fn snapshot_is_detached_from_later_mutations() {
        let mut store = seeded("A", &["a", "b"]);
        let snapshot = store.snapshot();

        store.remove(&ItemId::from("a")).unwrap();

        assert_eq!(snapshot.query("A").len(), 2);
        assert_eq!(snapshot.revision(), 2);
        assert_eq!(store.query("A").len(), 1);
    }
}
