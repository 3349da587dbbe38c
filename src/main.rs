//! Redirect Resolution Proxy
//!
//! An edge proxy built with Tokio and Axum whose core is a redirect
//! resolution engine: per request it decides, against a published rule
//! catalog, whether to redirect (301/302), internally rewrite, or pass
//! the request through to the origin.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │               REDIRECT PROXY                  │
//!                      │                                               │
//!   Client Request     │  ┌─────────┐   ┌───────────┐   ┌─────────┐   │
//!   ──────────────────▶│  │  http   │──▶│  request  │──▶│ engine  │   │
//!                      │  │ server  │   │descriptor │   │ resolve │   │
//!                      │  └─────────┘   └───────────┘   └────┬────┘   │
//!                      │                                      │        │
//!                      │          Redirect 301/302 ◀──────────┤        │
//!                      │          Rewrite / Pass ─────────────┼──────▶ │──── Origin
//!                      │                                      │        │
//!                      │  ┌────────────────────────────────────────┐  │
//!                      │  │           Catalog subsystem             │  │
//!                      │  │  publish job → KV store → snapshot      │  │
//!                      │  │  cache (ArcSwap, interval refresh)      │  │
//!                      │  └────────────────────────────────────────┘  │
//!                      │  ┌────────────────────────────────────────┐  │
//!                      │  │  config · observability · lifecycle     │  │
//!                      │  └────────────────────────────────────────┘  │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use redirect_proxy::config::{load_config, ProxyConfig};
use redirect_proxy::http::HttpServer;

#[derive(Parser)]
#[command(name = "redirect-proxy")]
#[command(about = "Edge proxy resolving requests against published redirect rules")]
struct Args {
    /// Path to the TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redirect_proxy=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("redirect-proxy v0.1.0 starting");

    let args = Args::parse();
    let config = match args.config {
        Some(path) => load_config(&path)?,
        None => ProxyConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        origin = %config.origin.address,
        sites = config.sites.len(),
        store = %config.store.base_url,
        cache_refresh_secs = config.redirects.cache_refresh_secs,
        "Configuration loaded"
    );

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(address = %local_addr, "Listening for connections");

    // Metrics exposition
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            redirect_proxy::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Create and run HTTP server
    let server = HttpServer::new(config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
