//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate a unique request ID as early as possible for tracing
//! - Build the normalized request descriptor the engine consumes
//! - Flag preview traffic and excluded routes before resolution runs
//!
//! # Design Decisions
//! - Locale is resolved from the path's first segment when it is a
//!   recognized region code, otherwise from the site default; the
//!   engine always sees the locale-stripped path
//! - Exclusion is decided on the original path, before locale stripping

use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{HeaderValue, Request};
use tower::{Layer, Service};
use uuid::Uuid;

use crate::config::RedirectsConfig;
use crate::engine::ResolvedRequest;
use crate::site::{split_locale, SiteContext, SiteRegistry};

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Everything the handler needs to know about one request before the
/// engine runs.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// Normalized request handed to the engine.
    pub request: ResolvedRequest,
    /// Site the hostname resolved to.
    pub site: SiteContext,
    /// Preview traffic or an excluded route; skips resolution entirely.
    pub excluded: bool,
}

impl RequestDescriptor {
    /// Build the descriptor from the raw request. All protocol parsing
    /// happens here; the engine never sees framework types.
    pub fn from_request(
        req: &Request<Body>,
        registry: &SiteRegistry,
        config: &RedirectsConfig,
    ) -> Self {
        let hostname = req
            .headers()
            .get("host")
            .and_then(|h| h.to_str().ok())
            .or_else(|| req.uri().host())
            .unwrap_or_default()
            .to_string();

        let site = registry.resolve(&hostname).clone();

        let raw_path = req.uri().path();
        let (locale, path) = split_locale(raw_path, &config.regions);
        let locale = locale.unwrap_or(&site.language).to_string();

        let excluded = config
            .excluded_path_prefixes
            .iter()
            .any(|prefix| raw_path.starts_with(prefix.as_str()))
            || req.headers().contains_key(config.preview_header.as_str());

        Self {
            request: ResolvedRequest {
                path: path.to_string(),
                query: req.uri().query().unwrap_or_default().to_string(),
                locale,
                hostname,
            },
            site,
            excluded,
        }
    }
}

/// Layer attaching a UUID request ID to requests that lack one.
#[derive(Debug, Clone, Copy)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S, B> Service<Request<B>> for RequestIdService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        if !req.headers().contains_key(X_REQUEST_ID) {
            let id = Uuid::new_v4().to_string();
            if let Ok(value) = HeaderValue::from_str(&id) {
                req.headers_mut().insert(X_REQUEST_ID, value);
            }
        }
        self.inner.call(req)
    }
}
