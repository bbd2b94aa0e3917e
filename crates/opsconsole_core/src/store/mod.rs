//! Ordered bucket store and its public surface.
//!
//! # Responsibility
//! - Hold items grouped by bucket key with dense per-bucket ranks.
//! - Expose the mutation façade (`add`, `update`, `remove`, `move_to`) and
//!   read-only queries.
//! - Notify subscribers after every committed mutation.
//!
//! # Invariants
//! - Ranks inside a bucket are exactly `0..n-1` after every public call.
//! - `NotFound` leaves the store byte-for-byte unchanged.

pub mod bucket_store;
pub mod facade;
pub mod notify;
pub mod shared;
pub mod snapshot;
