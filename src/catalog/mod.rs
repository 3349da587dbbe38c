//! Rule catalog subsystem.
//!
//! # Data Flow
//! ```text
//! Authored rules (CMS/source URL)
//!     → publish.rs (batch job, writes JSON array per site key)
//!     → key-value store (store.rs)
//!     → cache.rs (interval refresh → ArcSwap snapshot)
//!     → request handlers (lock-free reads)
//! ```
//!
//! # Design Decisions
//! - The request path only ever touches the in-process snapshot
//! - Store unavailability degrades to previously cached rules, then to
//!   an empty catalog; never an error on the request path

pub mod cache;
pub mod publish;
pub mod store;

pub use cache::{CatalogCache, CatalogRefresher};
pub use publish::Publisher;
pub use store::{HttpKvStore, MemoryStore, RuleStore, StoreError};
