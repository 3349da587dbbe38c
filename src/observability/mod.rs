//! Observability subsystem.
//!
//! # Responsibilities
//! - Structured logging via `tracing` (initialized in `main`)
//! - Prometheus metrics for requests and engine decisions
//!
//! # Design Decisions
//! - The engine itself carries no instrumentation beyond debug logs; all
//!   counters are recorded by the HTTP layer around the resolution call

pub mod metrics;
