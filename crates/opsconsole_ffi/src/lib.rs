//! Flutter bridge for the operations console core.

pub mod api;
