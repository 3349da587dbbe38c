//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, descriptor, locale & exclusion)
//!     → engine (resolution)
//!     → response.rs (redirect headers / origin forwarding)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestDescriptor, RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;
