//! Rule catalog storage access.
//!
//! # Responsibilities
//! - Read a site's published rule catalog from the key-value store
//! - Write a freshly published catalog (publish job only)
//!
//! # Design Decisions
//! - Catalogs are stored as a single JSON-encoded array per site key
//! - Absence (404) and emptiness are both `None`; callers treat every
//!   failure as "no rules" so the store can never block traffic
//! - `MemoryStore` backs unit and integration tests without a network

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::config::StoreConfig;
use crate::engine::RedirectRule;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("store returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("stored catalog is not a JSON rule array: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Read/write access to published rule catalogs.
pub trait RuleStore: Send + Sync {
    /// Fetch the ordered rule catalog for a site key. `None` when no
    /// catalog has been published for the key.
    fn get_rules(
        &self,
        site_key: &str,
    ) -> impl std::future::Future<Output = Result<Option<Vec<RedirectRule>>, StoreError>> + Send;

    /// Replace the catalog stored under a site key.
    fn put_rules(
        &self,
        site_key: &str,
        rules: &[RedirectRule],
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}

impl<S: RuleStore> RuleStore for std::sync::Arc<S> {
    async fn get_rules(&self, site_key: &str) -> Result<Option<Vec<RedirectRule>>, StoreError> {
        (**self).get_rules(site_key).await
    }

    async fn put_rules(&self, site_key: &str, rules: &[RedirectRule]) -> Result<(), StoreError> {
        (**self).put_rules(site_key, rules).await
    }
}

/// Key-value store exposed over HTTP; one JSON array per site key at
/// `{base_url}/{site_key}`.
#[derive(Debug, Clone)]
pub struct HttpKvStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpKvStore {
    pub fn new(config: &StoreConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn key_url(&self, site_key: &str) -> String {
        format!("{}/{}", self.base_url, site_key)
    }
}

impl RuleStore for HttpKvStore {
    async fn get_rules(&self, site_key: &str) -> Result<Option<Vec<RedirectRule>>, StoreError> {
        let response = self.client.get(self.key_url(site_key)).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(StoreError::Status(response.status()));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        let rules: Vec<RedirectRule> = serde_json::from_str(&body)?;
        Ok(Some(rules))
    }

    async fn put_rules(&self, site_key: &str, rules: &[RedirectRule]) -> Result<(), StoreError> {
        let response = self
            .client
            .put(self.key_url(site_key))
            .json(rules)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::Status(response.status()));
        }
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    catalogs: RwLock<HashMap<String, Vec<RedirectRule>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RuleStore for MemoryStore {
    async fn get_rules(&self, site_key: &str) -> Result<Option<Vec<RedirectRule>>, StoreError> {
        Ok(self.catalogs.read().await.get(site_key).cloned())
    }

    async fn put_rules(&self, site_key: &str, rules: &[RedirectRule]) -> Result<(), StoreError> {
        self.catalogs
            .write()
            .await
            .insert(site_key.to_string(), rules.to_vec());
        Ok(())
    }
}
