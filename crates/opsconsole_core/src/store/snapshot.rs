//! Immutable point-in-time view of a bucket store.

use crate::model::item::{Item, ItemId};
use serde::Serialize;
use std::collections::BTreeMap;

/// All buckets of a store at one revision, each sorted by `order`.
///
/// Snapshots are detached from the store: later mutations never show up in
/// an existing snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreSnapshot<P> {
    revision: u64,
    buckets: BTreeMap<String, Vec<Item<P>>>,
}

impl<P> StoreSnapshot<P> {
    pub(crate) fn new(revision: u64, buckets: BTreeMap<String, Vec<Item<P>>>) -> Self {
        Self { revision, buckets }
    }

    /// Store revision the snapshot was taken at.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Ordered items of one bucket; empty for unknown buckets.
    pub fn query(&self, bucket_key: &str) -> &[Item<P>] {
        self.buckets
            .get(bucket_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Keys of non-empty buckets, sorted.
    pub fn bucket_keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item<P>> {
        self.buckets
            .values()
            .flat_map(|bucket| bucket.iter())
            .find(|item| &item.id == id)
    }

    /// Total number of items across buckets.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl<P> Default for StoreSnapshot<P> {
    fn default() -> Self {
        Self {
            revision: 0,
            buckets: BTreeMap::new(),
        }
    }
}
