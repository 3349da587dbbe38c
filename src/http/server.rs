//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with middleware (tracing, timeout, request ID)
//! - Build the request descriptor and run the resolution engine
//! - Translate outcomes into responses (redirect, rewrite, pass-through)
//! - Spawn the catalog refresher and publisher
//!
//! # Design Decisions
//! - The resolution call sits behind a fail-open guard: anything that
//!   prevents a decision behaves as "no rule matched" and the request
//!   reaches the origin unmodified
//! - The catalog snapshot is loaded per request; the engine never does I/O

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::catalog::{CatalogCache, CatalogRefresher, HttpKvStore, Publisher};
use crate::config::ProxyConfig;
use crate::engine::{RedirectEngine, ResolutionOutcome};
use crate::http::request::{RequestDescriptor, RequestIdLayer, X_REQUEST_ID};
use crate::http::response::{forward_to_origin, redirect_response};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::site::SiteRegistry;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RedirectEngine>,
    pub registry: Arc<SiteRegistry>,
    pub catalog: Arc<CatalogCache>,
    pub client: Client<HttpConnector, Body>,
    pub config: Arc<ProxyConfig>,
}

/// HTTP server for the redirect proxy.
pub struct HttpServer {
    router: Router,
    config: Arc<ProxyConfig>,
    catalog: Arc<CatalogCache>,
    shutdown: Shutdown,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Self {
        let config = Arc::new(config);
        let engine = Arc::new(RedirectEngine::new(&config.redirects));
        let registry = Arc::new(SiteRegistry::from_config(&config.sites));
        let catalog = Arc::new(CatalogCache::new());
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            engine,
            registry,
            catalog: catalog.clone(),
            client,
            config: config.clone(),
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            catalog,
            shutdown: Shutdown::new(),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(resolve_handler))
            .route("/", any(resolve_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let site_keys: Vec<String> = self.config.sites.iter().map(|s| s.key.clone()).collect();

        let refresher = CatalogRefresher::new(
            self.catalog.clone(),
            HttpKvStore::new(&self.config.store),
            site_keys,
            Duration::from_secs(self.config.redirects.cache_refresh_secs),
        );
        let refresher_shutdown = self.shutdown.subscribe();
        tokio::spawn(async move {
            refresher.run(refresher_shutdown).await;
        });

        if self.config.publish.enabled {
            let publisher = Publisher::new(
                HttpKvStore::new(&self.config.store),
                self.config.publish.clone(),
            );
            let publisher_shutdown = self.shutdown.subscribe();
            tokio::spawn(async move {
                publisher.run(publisher_shutdown).await;
            });
        }

        let shutdown = self.shutdown;
        let app = self.router.into_make_service();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                crate::lifecycle::wait_for_signal().await;
                shutdown.trigger();
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Direct access to the catalog cache; tests seed rules through it.
    pub fn catalog(&self) -> Arc<CatalogCache> {
        self.catalog.clone()
    }
}

/// Main handler: resolve the request against the site's catalog, then
/// redirect, rewrite or pass through.
async fn resolve_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let descriptor =
        RequestDescriptor::from_request(&request, &state.registry, &state.config.redirects);

    let outcome = if descriptor.excluded {
        ResolutionOutcome::Pass
    } else {
        resolve_fail_open(&state, &descriptor)
    };

    tracing::debug!(
        request_id = %request_id,
        site = %descriptor.site.key,
        path = %descriptor.request.path,
        locale = %descriptor.request.locale,
        outcome = outcome.label(),
        "Request resolved"
    );
    metrics::record_resolution(&descriptor.site.key, outcome.label());

    let response = match outcome {
        ResolutionOutcome::Redirect { url, status } => redirect_response(&url, status),
        ResolutionOutcome::Rewrite { url } => {
            forward_to_origin(
                &state.client,
                &state.config.origin.address,
                request,
                Some(&url),
            )
            .await
        }
        ResolutionOutcome::Pass => {
            forward_to_origin(&state.client, &state.config.origin.address, request, None).await
        }
    };

    metrics::record_request(&method, response.status().as_u16(), start);
    response
}

/// Resolution wrapped so a missing or unusable catalog can never block
/// legitimate traffic.
fn resolve_fail_open(state: &AppState, descriptor: &RequestDescriptor) -> ResolutionOutcome {
    let Some(rules) = state.catalog.rules_for(&descriptor.site.key) else {
        return ResolutionOutcome::Pass;
    };
    state
        .engine
        .resolve(&rules, &descriptor.request, &descriptor.site.language)
}
