//! View adapters over bucket stores.
//!
//! # Responsibility
//! - Give the task board and the operations calendar domain-named entry
//!   points on top of the generic mutation façade.
//! - Turn drag gestures into single store moves.
//!
//! # Invariants
//! - Adapters never bypass the façade.
//! - Adapters add input normalization only; ordering rules stay in the store.

pub mod board_service;
pub mod calendar_service;
pub mod drag;
