//! Mutation façade shared by every bucket store flavour.
//!
//! View adapters are written against this trait so they work the same on a
//! single-threaded `BucketStore` and on a `SharedBucketStore` behind an `Arc`.

use crate::error::StoreResult;
use crate::model::item::{Item, ItemId, Payload};
use crate::store::bucket_store::{BucketStore, MoveTarget};
use crate::store::shared::SharedBucketStore;
use std::sync::Arc;

/// The only surface through which consumers change a bucket store.
pub trait BucketFacade<P: Payload> {
    /// Appends a new item to `bucket_key`.
    fn add(&mut self, bucket_key: &str, payload: P) -> Item<P>;
    /// Appends a new item with a caller-provided id.
    fn insert(&mut self, id: ItemId, bucket_key: &str, payload: P) -> StoreResult<Item<P>>;
    /// Merges a partial payload into an existing item.
    fn update(&mut self, id: &ItemId, patch: P::Patch) -> StoreResult<Item<P>>;
    /// Deletes an item and densifies its bucket.
    fn remove(&mut self, id: &ItemId) -> StoreResult<Item<P>>;
    /// Moves an item to `bucket_key` at `target`.
    fn move_to(&mut self, id: &ItemId, bucket_key: &str, target: MoveTarget) -> StoreResult<()>;
    /// Ordered copy of one bucket.
    fn query(&self, bucket_key: &str) -> Vec<Item<P>>;
    /// Copy of one item.
    fn get(&self, id: &ItemId) -> Option<Item<P>>;
    /// Committed mutation count.
    fn revision(&self) -> u64;
}

impl<P: Payload> BucketFacade<P> for BucketStore<P> {
    fn add(&mut self, bucket_key: &str, payload: P) -> Item<P> {
        BucketStore::add(self, bucket_key, payload)
    }

    fn insert(&mut self, id: ItemId, bucket_key: &str, payload: P) -> StoreResult<Item<P>> {
        BucketStore::insert(self, id, bucket_key, payload)
    }

    fn update(&mut self, id: &ItemId, patch: P::Patch) -> StoreResult<Item<P>> {
        BucketStore::update(self, id, patch)
    }

    fn remove(&mut self, id: &ItemId) -> StoreResult<Item<P>> {
        BucketStore::remove(self, id)
    }

    fn move_to(&mut self, id: &ItemId, bucket_key: &str, target: MoveTarget) -> StoreResult<()> {
        BucketStore::move_to(self, id, bucket_key, target)
    }

    fn query(&self, bucket_key: &str) -> Vec<Item<P>> {
        BucketStore::query(self, bucket_key)
    }

    fn get(&self, id: &ItemId) -> Option<Item<P>> {
        BucketStore::get(self, id).cloned()
    }

    fn revision(&self) -> u64 {
        BucketStore::revision(self)
    }
}

impl<P> BucketFacade<P> for SharedBucketStore<P>
where
    P: Payload + Send + Sync + 'static,
{
    fn add(&mut self, bucket_key: &str, payload: P) -> Item<P> {
        SharedBucketStore::add(self, bucket_key, payload)
    }

    fn insert(&mut self, id: ItemId, bucket_key: &str, payload: P) -> StoreResult<Item<P>> {
        SharedBucketStore::insert(self, id, bucket_key, payload)
    }

    fn update(&mut self, id: &ItemId, patch: P::Patch) -> StoreResult<Item<P>> {
        SharedBucketStore::update(self, id, patch)
    }

    fn remove(&mut self, id: &ItemId) -> StoreResult<Item<P>> {
        SharedBucketStore::remove(self, id)
    }

    fn move_to(&mut self, id: &ItemId, bucket_key: &str, target: MoveTarget) -> StoreResult<()> {
        SharedBucketStore::move_to(self, id, bucket_key, target)
    }

    fn query(&self, bucket_key: &str) -> Vec<Item<P>> {
        SharedBucketStore::query(self, bucket_key)
    }

    fn get(&self, id: &ItemId) -> Option<Item<P>> {
        SharedBucketStore::get(self, id)
    }

    fn revision(&self) -> u64 {
        SharedBucketStore::revision(self)
    }
}

impl<P> BucketFacade<P> for Arc<SharedBucketStore<P>>
where
    P: Payload + Send + Sync + 'static,
{
    fn add(&mut self, bucket_key: &str, payload: P) -> Item<P> {
        SharedBucketStore::add(self, bucket_key, payload)
    }

    fn insert(&mut self, id: ItemId, bucket_key: &str, payload: P) -> StoreResult<Item<P>> {
        SharedBucketStore::insert(self, id, bucket_key, payload)
    }

    fn update(&mut self, id: &ItemId, patch: P::Patch) -> StoreResult<Item<P>> {
        SharedBucketStore::update(self, id, patch)
    }

    fn remove(&mut self, id: &ItemId) -> StoreResult<Item<P>> {
        SharedBucketStore::remove(self, id)
    }

    fn move_to(&mut self, id: &ItemId, bucket_key: &str, target: MoveTarget) -> StoreResult<()> {
        SharedBucketStore::move_to(self, id, bucket_key, target)
    }

    fn query(&self, bucket_key: &str) -> Vec<Item<P>> {
        SharedBucketStore::query(self, bucket_key)
    }

    fn get(&self, id: &ItemId) -> Option<Item<P>> {
        SharedBucketStore::get(self, id)
    }

    fn revision(&self) -> u64 {
        SharedBucketStore::revision(self)
    }
}
