//! Catalog publish job.
//!
//! # Responsibilities
//! - Periodically fetch each site's authored rules from its source URL
//! - Write the full rule set to the store as one JSON array per site key
//!
//! # Design Decisions
//! - Batch job, fully decoupled from the request path; the engine only
//!   ever reads whatever is currently stored
//! - A failed source fetch skips that site for the run and leaves the
//!   stored catalog untouched

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::catalog::store::RuleStore;
use crate::config::{PublishConfig, PublishSource};
use crate::engine::RedirectRule;

/// Periodic publisher copying authored rule sets into the store.
pub struct Publisher<S: RuleStore> {
    store: S,
    client: reqwest::Client,
    config: PublishConfig,
}

impl<S: RuleStore> Publisher<S> {
    pub fn new(store: S, config: PublishConfig) -> Self {
        Self {
            store,
            client: reqwest::Client::new(),
            config,
        }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if !self.config.enabled {
            tracing::info!("Catalog publishing disabled");
            return;
        }

        tracing::info!(
            interval_secs = self.config.interval_secs,
            sources = self.config.sources.len(),
            "Catalog publisher starting"
        );

        let mut ticker = time::interval(Duration::from_secs(self.config.interval_secs));

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.publish_all().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Catalog publisher received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    async fn publish_all(&self) {
        for source in &self.config.sources {
            match self.fetch_source(source).await {
                Ok(rules) => {
                    if let Err(err) = self.store.put_rules(&source.site_key, &rules).await {
                        tracing::error!(site = %source.site_key, error = %err, "Failed to store published catalog");
                    } else {
                        tracing::info!(site = %source.site_key, rules = rules.len(), "Catalog published");
                    }
                }
                Err(err) => {
                    tracing::warn!(site = %source.site_key, url = %source.url, error = %err, "Rule source fetch failed, keeping stored catalog");
                }
            }
        }
    }

    async fn fetch_source(&self, source: &PublishSource) -> Result<Vec<RedirectRule>, reqwest::Error> {
        self.client
            .get(&source.url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<RedirectRule>>()
            .await
    }
}
