//! Lifecycle management subsystem.
//!
//! # Design Decisions
//! - Ordered startup: config first, then catalog tasks, then the listener
//! - Shutdown fans out over a broadcast channel; background loops exit
//!   on the signal, axum drains in-flight requests

pub mod shutdown;

pub use shutdown::{wait_for_signal, Shutdown};
