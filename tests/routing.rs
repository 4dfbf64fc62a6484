//! End-to-end routing through a running server and mock upstream.

use std::time::Duration;
use tenant_router::config::RouterConfig;

mod common;

fn config() -> RouterConfig {
    let mut config = RouterConfig::default();
    config.tenancy.base_domain = "example.com".into();
    config.auth.user_header = Some("x-user-id".into());
    config
}

async fn get(router: &common::TestRouter, host: &str, path: &str, user: Option<&str>) -> reqwest::Response {
    let mut req = common::client()
        .get(format!("http://{}{}", router.addr, path))
        .header("host", host);
    if let Some(user) = user {
        req = req.header("x-user-id", user);
    }
    req.send().await.expect("router unreachable")
}

#[tokio::test]
async fn test_tenant_subdomain_is_rewritten_upstream() {
    let upstream = common::start_echo_backend().await;
    let router = common::start_router(config(), upstream).await;

    let res = get(&router, "acme.example.com", "/funnels?page=2", Some("user_1")).await;
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));
    // Visible host is preserved; only the dispatched path changes.
    assert_eq!(res.text().await.unwrap(), "/acme/funnels?page=2|acme.example.com");

    router.shutdown.trigger();
}

#[tokio::test]
async fn test_fixed_rewrites() {
    let upstream = common::start_echo_backend().await;
    let router = common::start_router(config(), upstream).await;

    let res = get(&router, "example.com", "/sign-in", None).await;
    assert_eq!(res.text().await.unwrap(), "/agency/sign-in|example.com");

    let res = get(&router, "example.com", "/site", None).await;
    assert_eq!(res.text().await.unwrap(), "/site|example.com");

    let res = get(&router, "example.com", "/agency/billing?plan=pro", Some("user_1")).await;
    assert_eq!(res.text().await.unwrap(), "/agency/billing?plan=pro|example.com");

    let res = get(&router, "example.com", "/other", Some("user_1")).await;
    assert_eq!(res.text().await.unwrap(), "/other|example.com");

    router.shutdown.trigger();
}

#[tokio::test]
async fn test_anonymous_user_sent_to_sign_in() {
    let upstream = common::start_echo_backend().await;
    let router = common::start_router(config(), upstream).await;

    let res = get(&router, "example.com", "/subaccount/7", None).await;
    assert_eq!(res.status(), 307);
    assert_eq!(
        res.headers()["location"],
        "/sign-in?redirect_url=%2Fsubaccount%2F7"
    );

    router.shutdown.trigger();
}

#[tokio::test]
async fn test_static_assets_bypass_the_hook() {
    let upstream = common::start_echo_backend().await;
    let router = common::start_router(config(), upstream).await;

    // Anonymous, on a tenant host, yet neither gated nor rewritten.
    let res = get(&router, "acme.example.com", "/_next/static/chunk.js", None).await;
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "/_next/static/chunk.js|acme.example.com");

    router.shutdown.trigger();
}

#[tokio::test]
async fn test_config_update_applies_without_restart() {
    let upstream = common::start_echo_backend().await;
    let router = common::start_router(config(), upstream).await;

    let res = get(&router, "acme.plura.dev", "/x", Some("u")).await;
    assert_eq!(res.text().await.unwrap(), "/x|acme.plura.dev");

    let mut updated = config();
    updated.tenancy.base_domain = "plura.dev".into();
    updated.upstream.address = upstream.to_string();
    router.updates.send(updated).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let res = get(&router, "acme.plura.dev", "/x", Some("u")).await;
    assert_eq!(res.text().await.unwrap(), "/acme/x|acme.plura.dev");

    router.shutdown.trigger();
}
