//! Thread-safe wrapper for hosts that touch a store from several threads.
//!
//! # Invariants
//! - Every mutation runs under one writer lock, one at a time.
//! - Reads never take the writer lock; they see the latest published
//!   snapshot.
//! - A snapshot is published before listeners hear about the change, so a
//!   listener that reads the store sees the new state.
//! - Listeners run while the writer lock is held and must not mutate the
//!   same store.

use crate::error::StoreResult;
use crate::model::item::{Item, ItemId, Payload};
use crate::store::bucket_store::{BucketStore, MoveTarget};
use crate::store::notify::{ChangeNotifier, ListenerId, StoreChange};
use crate::store::snapshot::StoreSnapshot;
use arc_swap::ArcSwap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Bucket store with serialized writers and lock-free snapshot readers.
pub struct SharedBucketStore<P> {
    writer: Mutex<BucketStore<P>>,
    committed: ArcSwap<StoreSnapshot<P>>,
    pending: Arc<Mutex<Vec<StoreChange>>>,
    notifier: Mutex<ChangeNotifier>,
}

impl<P> SharedBucketStore<P>
where
    P: Payload + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::from_store(BucketStore::new())
    }

    /// Wraps an already populated store (e.g. one filled from mock data).
    ///
    /// Listeners already registered on `store` move to the wrapper and keep
    /// their ids, so they also run after the snapshot is published.
    pub fn from_store(mut store: BucketStore<P>) -> Self {
        let pending = Arc::new(Mutex::new(Vec::new()));
        let collector = Arc::clone(&pending);
        let notifier = store.replace_notifier(ChangeNotifier::new());
        store.subscribe(move |change| {
            lock(&collector).push(change.clone());
        });

        Self {
            committed: ArcSwap::from_pointee(store.snapshot()),
            writer: Mutex::new(store),
            pending,
            notifier: Mutex::new(notifier),
        }
    }

    pub fn add(&self, bucket_key: &str, payload: P) -> Item<P> {
        self.write(|store| store.add(bucket_key, payload))
    }

    pub fn insert(&self, id: ItemId, bucket_key: &str, payload: P) -> StoreResult<Item<P>> {
        self.write(|store| store.insert(id, bucket_key, payload))
    }

    pub fn update(&self, id: &ItemId, patch: P::Patch) -> StoreResult<Item<P>> {
        self.write(|store| store.update(id, patch))
    }

    pub fn remove(&self, id: &ItemId) -> StoreResult<Item<P>> {
        self.write(|store| store.remove(id))
    }

    pub fn move_to(&self, id: &ItemId, bucket_key: &str, target: MoveTarget) -> StoreResult<()> {
        self.write(|store| store.move_to(id, bucket_key, target))
    }

    /// Ordered bucket contents from the latest published snapshot.
    pub fn query(&self, bucket_key: &str) -> Vec<Item<P>> {
        self.committed.load().query(bucket_key).to_vec()
    }

    pub fn get(&self, id: &ItemId) -> Option<Item<P>> {
        self.committed.load().get(id).cloned()
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<StoreSnapshot<P>> {
        self.committed.load_full()
    }

    pub fn revision(&self) -> u64 {
        self.committed.load().revision()
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: FnMut(&StoreChange) + Send + 'static,
    {
        lock(&self.notifier).subscribe(listener)
    }

    pub fn unsubscribe(&self, listener: ListenerId) -> bool {
        lock(&self.notifier).unsubscribe(listener)
    }

    /// Consumes the wrapper and returns the inner store.
    ///
    /// The wrapper's listeners go back to the store; the internal change
    /// collector is dropped.
    pub fn into_inner(self) -> BucketStore<P> {
        let notifier = self
            .notifier
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let mut store = self
            .writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        store.replace_notifier(notifier);
        store
    }

    fn write<T>(&self, op: impl FnOnce(&mut BucketStore<P>) -> T) -> T {
        let mut store = lock(&self.writer);
        let before = store.revision();
        let result = op(&mut *store);

        if store.revision() != before {
            self.committed.store(Arc::new(store.snapshot()));
            let changes = std::mem::take(&mut *lock(&self.pending));
            let mut notifier = lock(&self.notifier);
            for change in &changes {
                notifier.emit(change);
            }
        }
        result
    }
}

impl<P> Default for SharedBucketStore<P>
where
    P: Payload + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

// Poisoning is ignored: a mutation is complete before any listener runs.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
