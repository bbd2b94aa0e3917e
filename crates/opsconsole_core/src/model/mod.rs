//! Domain model for ordered bucket collections.
//!
//! # Responsibility
//! - Define the item record held by every bucket store.
//! - Define the payloads of the two console views (task board, calendar).
//!
//! # Invariants
//! - Bucket membership is decided by `Item::bucket_key` alone.
//! - Payload types never carry their own ordering.

pub mod event;
pub mod item;
pub mod task;
