//! Store error taxonomy.
//!
//! # Invariants
//! - `NotFound` is the only error the façade operations (`add`, `update`,
//!   `remove`, `move_to`) can return.
//! - A returned error means the store was not modified.

use crate::model::item::ItemId;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from bucket store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Operation referenced an id that is not in the store.
    #[error("item not found: {0}")]
    NotFound(ItemId),
    /// Seeding tried to insert an id that already exists.
    #[error("item id already in use: {0}")]
    DuplicateId(ItemId),
}

/// Breach reported by `BucketStore::verify`.
///
/// Public operations never produce one of these; seeing it means a bug in
/// the store itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("bucket `{bucket}` holds id {id} that has no item record")]
    DanglingId { bucket: String, id: ItemId },
    #[error("item {id} is indexed in bucket `{indexed}` but records bucket `{recorded}`")]
    BucketMismatch {
        id: ItemId,
        indexed: String,
        recorded: String,
    },
    #[error("item {id} in bucket `{bucket}` has order {recorded}, expected {expected}")]
    OrderGap {
        id: ItemId,
        bucket: String,
        recorded: usize,
        expected: usize,
    },
    #[error("bucket `{0}` is empty but still indexed")]
    EmptyBucket(String),
    #[error("index holds {indexed} ids but {records} item records exist")]
    CountMismatch { indexed: usize, records: usize },
}
