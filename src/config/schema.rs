//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! redirect proxy. All types derive Serde traits for deserialization from
//! config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the redirect proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, connection limits).
    pub listener: ListenerConfig,

    /// Origin the proxy forwards non-redirected traffic to.
    pub origin: OriginConfig,

    /// Sites served by this proxy, keyed by hostname.
    pub sites: Vec<SiteConfig>,

    /// Redirect engine settings.
    pub redirects: RedirectsConfig,

    /// Key-value store holding the published rule catalogs.
    pub store: StoreConfig,

    /// Catalog publish job settings.
    pub publish: PublishConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
        }
    }
}

/// Origin server requests are forwarded to on Pass and Rewrite.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OriginConfig {
    /// Origin address (e.g., "127.0.0.1:3000").
    pub address: String,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// One site served by the proxy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    /// Hostname requests arrive on (exact, case-insensitive).
    pub hostname: String,

    /// Key the site's rule catalog is stored under.
    pub key: String,

    /// Default language when the request carries no locale prefix.
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

/// Redirect engine settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RedirectsConfig {
    /// Region/locale codes recognized as locale path segments. A target
    /// first segment outside this list stays a literal path segment.
    pub regions: Vec<String>,

    /// Placeholder token in rule targets replaced with the site's
    /// resolved language.
    pub locale_token: String,

    /// Path prefixes never considered for redirection (assets, APIs).
    pub excluded_path_prefixes: Vec<String>,

    /// Header marking preview traffic, which bypasses redirect rules.
    pub preview_header: String,

    /// Seconds between catalog snapshot refreshes.
    pub cache_refresh_secs: u64,
}

impl Default for RedirectsConfig {
    fn default() -> Self {
        Self {
            regions: ["en", "fr", "de", "es", "it", "nl"]
                .iter()
                .map(|r| r.to_string())
                .collect(),
            locale_token: "{lang}".to_string(),
            excluded_path_prefixes: vec!["/api/".to_string(), "/assets/".to_string()],
            preview_header: "x-preview".to_string(),
            cache_refresh_secs: 60,
        }
    }
}

/// Key-value store access over HTTP.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the store; catalogs live at `{base_url}/{site_key}`.
    pub base_url: String,

    /// Store request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:7700/rules".to_string(),
            timeout_secs: 5,
        }
    }
}

/// Publish job configuration: periodically copies rule sets from their
/// sources into the store. Decoupled from the request path.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Enable the publish job.
    pub enabled: bool,

    /// Seconds between publish runs.
    pub interval_secs: u64,

    /// Rule sources, one per site.
    pub sources: Vec<PublishSource>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: 300,
            sources: Vec::new(),
        }
    }
}

/// Where a site's authored rules are fetched from before publishing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PublishSource {
    /// Site key the fetched rules are stored under.
    pub site_key: String,

    /// URL returning the site's rules as a JSON array.
    pub url: String,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
