//! End-to-end tests: proxy in front of a mock origin, rules served from a
//! mock key-value store.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use redirect_proxy::config::{ProxyConfig, SiteConfig};
use redirect_proxy::engine::{RedirectKind, RedirectRule};
use redirect_proxy::http::HttpServer;
use tokio::net::TcpListener;

mod common;

fn rules() -> Vec<RedirectRule> {
    vec![
        RedirectRule {
            pattern: "/old-page/".into(),
            target: "/new-page/".into(),
            redirect_kind: RedirectKind::Permanent,
            locale: None,
            preserve_query_string: false,
        },
        RedirectRule {
            pattern: "/campaign".into(),
            target: "/landing".into(),
            redirect_kind: RedirectKind::Temporary,
            locale: None,
            preserve_query_string: false,
        },
        RedirectRule {
            pattern: "/x".into(),
            target: "/y".into(),
            redirect_kind: RedirectKind::ServerTransfer,
            locale: None,
            preserve_query_string: false,
        },
    ]
}

/// Boot the full stack on loopback ports and return the proxy base URL.
async fn start_stack(origin_port: u16, store_port: u16, proxy_port: u16) -> String {
    let origin_addr: SocketAddr = format!("127.0.0.1:{origin_port}").parse().unwrap();
    let store_addr: SocketAddr = format!("127.0.0.1:{store_port}").parse().unwrap();
    let proxy_addr: SocketAddr = format!("127.0.0.1:{proxy_port}").parse().unwrap();

    common::start_mock_backend(origin_addr, "origin-content".to_string()).await;
    // The store mock answers every key with the same catalog.
    common::start_mock_backend(store_addr, serde_json::to_string(&rules()).unwrap()).await;

    let mut config = ProxyConfig::default();
    config.listener.bind_address = proxy_addr.to_string();
    config.origin.address = origin_addr.to_string();
    config.store.base_url = format!("http://{store_addr}");
    config.sites.push(SiteConfig {
        hostname: format!("127.0.0.1:{proxy_port}"),
        key: "test-site".into(),
        language: "en".into(),
    });
    config.publish.enabled = false;
    config.observability.metrics_enabled = false;

    let server = HttpServer::new(config);
    // Seed the snapshot directly so assertions do not race the first
    // interval refresh (which fetches the same catalog from the mock).
    server
        .catalog()
        .install(HashMap::from([("test-site".to_string(), rules())]));

    let listener = TcpListener::bind(proxy_addr).await.unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    format!("http://{proxy_addr}")
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_permanent_redirect_end_to_end() {
    let base = start_stack(28311, 28312, 28313).await;
    let res = client()
        .get(format!("{base}/old-page/"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(res.headers().get("location").unwrap(), "/new-page/");
}

#[tokio::test]
async fn test_temporary_redirect_end_to_end() {
    let base = start_stack(28321, 28322, 28323).await;
    let res = client()
        .get(format!("{base}/campaign"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers().get("location").unwrap(), "/landing");
}

#[tokio::test]
async fn test_rewrite_serves_origin_content() {
    let base = start_stack(28331, 28332, 28333).await;
    let res = client().get(format!("{base}/x")).send().await.unwrap();

    // Internal rewrite: the client sees origin content, no redirect.
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "origin-content");
}

#[tokio::test]
async fn test_unmatched_path_passes_through() {
    let base = start_stack(28341, 28342, 28343).await;
    let res = client()
        .get(format!("{base}/not-redirected"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "origin-content");
}

#[tokio::test]
async fn test_excluded_prefix_bypasses_rules() {
    let base = start_stack(28351, 28352, 28353).await;
    // /api/ is excluded by default even when a rule would match.
    let res = client()
        .get(format!("{base}/api/old-page/"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "origin-content");
}

#[tokio::test]
async fn test_preview_header_bypasses_rules() {
    let base = start_stack(28361, 28362, 28363).await;
    let res = client()
        .get(format!("{base}/old-page/"))
        .header("x-preview", "1")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "origin-content");
}
