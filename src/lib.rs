//! Redirect Resolution Proxy Library

pub mod catalog;
pub mod config;
pub mod engine;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod site;

pub use config::ProxyConfig;
pub use engine::{RedirectEngine, RedirectRule, ResolutionOutcome, ResolvedRequest};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
