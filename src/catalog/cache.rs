//! Catalog snapshot cache.
//!
//! # Responsibilities
//! - Hold the current site-key → rules snapshot for the request path
//! - Refresh it from the store on an interval
//!
//! # Design Decisions
//! - The snapshot is an `ArcSwap` map: request handlers take a cheap
//!   lock-free load, the refresher swaps in a whole new map
//! - A failed fetch for one site keeps its previous rules; an absent
//!   catalog is an empty rule list (engine resolves it to Pass)

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use tokio::sync::broadcast;
use tokio::time;

use crate::catalog::store::RuleStore;
use crate::engine::RedirectRule;

type Snapshot = HashMap<String, Arc<Vec<RedirectRule>>>;

/// Shared, read-only view of all published catalogs.
#[derive(Debug, Default)]
pub struct CatalogCache {
    snapshot: ArcSwap<Snapshot>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules for one site; `None` when nothing is cached for the key.
    pub fn rules_for(&self, site_key: &str) -> Option<Arc<Vec<RedirectRule>>> {
        self.snapshot.load().get(site_key).cloned()
    }

    /// Install a complete snapshot, replacing the previous one.
    pub fn install(&self, snapshot: HashMap<String, Vec<RedirectRule>>) {
        let snapshot: Snapshot = snapshot
            .into_iter()
            .map(|(k, v)| (k, Arc::new(v)))
            .collect();
        self.snapshot.store(Arc::new(snapshot));
    }

    async fn refresh<S: RuleStore>(&self, store: &S, site_keys: &[String]) {
        let previous = self.snapshot.load_full();
        let mut next: Snapshot = HashMap::with_capacity(site_keys.len());

        for key in site_keys {
            match store.get_rules(key).await {
                Ok(Some(rules)) => {
                    next.insert(key.clone(), Arc::new(rules));
                }
                Ok(None) => {
                    next.insert(key.clone(), Arc::new(Vec::new()));
                }
                Err(err) => {
                    tracing::warn!(site = %key, error = %err, "Catalog fetch failed, keeping previous rules");
                    if let Some(rules) = previous.get(key) {
                        next.insert(key.clone(), rules.clone());
                    }
                }
            }
        }

        self.snapshot.store(Arc::new(next));
    }
}

/// Background refresher for the catalog cache.
pub struct CatalogRefresher<S: RuleStore> {
    cache: Arc<CatalogCache>,
    store: S,
    site_keys: Vec<String>,
    interval: Duration,
}

impl<S: RuleStore> CatalogRefresher<S> {
    pub fn new(cache: Arc<CatalogCache>, store: S, site_keys: Vec<String>, interval: Duration) -> Self {
        Self {
            cache,
            store,
            site_keys,
            interval,
        }
    }

    /// Refresh loop; first tick fires immediately so the cache is warm
    /// before traffic arrives.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            sites = self.site_keys.len(),
            "Catalog refresher starting"
        );

        let mut ticker = time::interval(self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.cache.refresh(&self.store, &self.site_keys).await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Catalog refresher received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
