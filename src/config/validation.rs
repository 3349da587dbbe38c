//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (publish sources name configured sites)
//! - Validate value ranges (intervals > 0, addresses parseable)
//! - Detect duplicate site hostnames and keys
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid listener bind address '{0}'")]
    InvalidBindAddress(String),

    #[error("invalid metrics address '{0}'")]
    InvalidMetricsAddress(String),

    #[error("duplicate site hostname '{0}'")]
    DuplicateHostname(String),

    #[error("duplicate site key '{0}'")]
    DuplicateSiteKey(String),

    #[error("site '{0}' has an empty key")]
    EmptySiteKey(String),

    #[error("store base_url must not be empty")]
    EmptyStoreUrl,

    #[error("catalog refresh interval must be greater than zero")]
    ZeroRefreshInterval,

    #[error("publish interval must be greater than zero")]
    ZeroPublishInterval,

    #[error("publish source '{0}' does not match any configured site key")]
    UnknownPublishSite(String),
}

/// Validate the full configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    let mut hostnames = HashSet::new();
    let mut keys = HashSet::new();
    for site in &config.sites {
        if !hostnames.insert(site.hostname.to_lowercase()) {
            errors.push(ValidationError::DuplicateHostname(site.hostname.clone()));
        }
        if site.key.is_empty() {
            errors.push(ValidationError::EmptySiteKey(site.hostname.clone()));
        } else if !keys.insert(site.key.clone()) {
            errors.push(ValidationError::DuplicateSiteKey(site.key.clone()));
        }
    }

    if config.store.base_url.is_empty() {
        errors.push(ValidationError::EmptyStoreUrl);
    }

    if config.redirects.cache_refresh_secs == 0 {
        errors.push(ValidationError::ZeroRefreshInterval);
    }

    if config.publish.enabled {
        if config.publish.interval_secs == 0 {
            errors.push(ValidationError::ZeroPublishInterval);
        }
        for source in &config.publish.sources {
            if !config.sites.iter().any(|s| s.key == source.site_key) {
                errors.push(ValidationError::UnknownPublishSite(source.site_key.clone()));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
