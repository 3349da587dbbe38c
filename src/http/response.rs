//! Response construction for resolution outcomes.
//!
//! # Responsibilities
//! - Turn a Redirect outcome into a 301/302 with a Location header
//! - Forward Pass/Rewrite traffic to the origin over the shared client
//!
//! # Design Decisions
//! - A rewrite keeps the client-visible URL; only the upstream URI
//!   changes before forwarding
//! - Origin errors surface as 502; the proxy adds nothing else

use axum::body::Body;
use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::{header, HeaderValue, Request, Response, StatusCode, Uri};
use axum::response::IntoResponse;
use hyper_util::client::legacy::{connect::HttpConnector, Client};

/// Build the client-visible redirect response.
pub fn redirect_response(url: &str, status: StatusCode) -> Response<Body> {
    match HeaderValue::from_str(url) {
        Ok(location) => {
            let mut response = Response::new(Body::empty());
            *response.status_mut() = status;
            response.headers_mut().insert(header::LOCATION, location);
            response
        }
        Err(_) => {
            // A target that cannot be a header value fails open.
            tracing::warn!(url, "Rewritten URL is not a valid Location header, passing through");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// Forward a request to the origin, optionally under a rewritten path.
pub async fn forward_to_origin(
    client: &Client<HttpConnector, Body>,
    origin: &str,
    mut req: Request<Body>,
    rewritten_path: Option<&str>,
) -> Response<Body> {
    let uri = match origin_uri(&req, origin, rewritten_path) {
        Some(uri) => uri,
        None => {
            tracing::error!(origin, "Failed to build origin URI");
            return (StatusCode::BAD_GATEWAY, "Invalid origin").into_response();
        }
    };
    *req.uri_mut() = uri;

    match client.request(req).await {
        Ok(response) => {
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(err) => {
            tracing::error!(error = %err, "Origin request failed");
            (StatusCode::BAD_GATEWAY, "Origin request failed").into_response()
        }
    }
}

fn origin_uri(req: &Request<Body>, origin: &str, rewritten_path: Option<&str>) -> Option<Uri> {
    let mut parts = req.uri().clone().into_parts();
    parts.scheme = Some(Scheme::HTTP);
    parts.authority = Some(origin.parse::<Authority>().ok()?);
    if let Some(path) = rewritten_path {
        parts.path_and_query = Some(path.parse::<PathAndQuery>().ok()?);
    } else if parts.path_and_query.is_none() {
        parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    Uri::from_parts(parts).ok()
}
