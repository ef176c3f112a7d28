mod common;

use chrono::{Duration, Utc};
use serde_json::{Value, json};
use snaplink::config::Config;

#[tokio::test]
async fn test_shorten_success() {
    let app = common::spawn_app(common::test_config());

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "https://Example.com/some/long/path" }))
        .await;

    assert_eq!(response.status_code(), 201);

    let body: Value = response.json();
    assert_eq!(body["short_code"], "aaaaab");
    assert_eq!(body["short_url"], "http://localhost:3000/aaaaab");
    assert_eq!(body["original_url"], "https://example.com/some/long/path");
    assert!(body.get("custom_alias").is_none());
}

#[tokio::test]
async fn test_shorten_adds_default_scheme() {
    let app = common::spawn_app(common::test_config());

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "example.com/path" }))
        .await;

    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    assert_eq!(body["original_url"], "https://example.com/path");
}

#[tokio::test]
async fn test_shorten_reports_rate_limit_headers() {
    let app = common::spawn_app(common::test_config());

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/a" }))
        .await;

    assert_eq!(response.header("x-ratelimit-limit"), "10");
    assert_eq!(response.header("x-ratelimit-remaining"), "9");
    assert_eq!(response.header("x-ratelimit-window"), "60");
}

#[tokio::test]
async fn test_shorten_with_custom_alias() {
    let app = common::spawn_app(common::test_config());

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/a", "custom_alias": "my-link" }))
        .await;

    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    assert_eq!(body["custom_alias"], "my-link");
    assert_eq!(body["short_url"], "http://localhost:3000/my-link");
}

#[tokio::test]
async fn test_shorten_duplicate_alias_conflicts() {
    let app = common::spawn_app(common::test_config());
    let payload = json!({ "url": "https://example.com/a", "custom_alias": "taken" });

    app.server.post("/api/shorten").json(&payload).await;
    let response = app.server.post("/api/shorten").json(&payload).await;

    assert_eq!(response.status_code(), 409);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "conflict");
}

#[tokio::test]
async fn test_shorten_reserved_alias_is_rejected() {
    let app = common::spawn_app(common::test_config());

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/a", "custom_alias": "admin" }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_shorten_unsupported_scheme() {
    let app = common::spawn_app(common::test_config());

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "ftp://example.com/file" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_shorten_empty_url() {
    let app = common::spawn_app(common::test_config());

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "" }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_shorten_past_expiry_is_rejected() {
    let app = common::spawn_app(common::test_config());

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({
            "url": "https://example.com/a",
            "expires_at": Utc::now() - Duration::hours(1),
        }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_shorten_eleventh_request_is_rate_limited() {
    let app = common::spawn_app(common::test_config());

    for i in 0..10 {
        let response = app
            .server
            .post("/api/shorten")
            .json(&json!({ "url": format!("https://example.com/{i}") }))
            .await;
        assert_eq!(response.status_code(), 201);
    }

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/eleven" }))
        .await;

    assert_eq!(response.status_code(), 429);
    assert_eq!(response.header("retry-after"), "6");

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "rate_limited");
    assert_eq!(body["error"]["details"]["limit"], 10);
}

#[tokio::test]
async fn test_forwarded_for_ignored_without_proxy() {
    let app = common::spawn_app(Config {
        rate_limit_requests: 1,
        ..common::test_config()
    });

    let first = app
        .server
        .post("/api/shorten")
        .add_header("x-forwarded-for", "203.0.113.1")
        .json(&json!({ "url": "https://example.com/a" }))
        .await;
    let second = app
        .server
        .post("/api/shorten")
        .add_header("x-forwarded-for", "203.0.113.2")
        .json(&json!({ "url": "https://example.com/b" }))
        .await;

    assert_eq!(first.status_code(), 201);
    assert_eq!(second.status_code(), 429);
}

#[tokio::test]
async fn test_clients_limited_independently_behind_proxy() {
    let app = common::spawn_app(Config {
        rate_limit_requests: 1,
        behind_proxy: true,
        ..common::test_config()
    });

    let shorten = |ip: &'static str, path: &'static str| {
        app.server
            .post("/api/shorten")
            .add_header("x-forwarded-for", ip)
            .json(&json!({ "url": format!("https://example.com/{path}") }))
    };

    assert_eq!(shorten("203.0.113.1", "a").await.status_code(), 201);
    assert_eq!(shorten("203.0.113.1", "b").await.status_code(), 429);
    assert_eq!(shorten("203.0.113.2", "c").await.status_code(), 201);
}

#[tokio::test]
async fn test_rate_limit_disabled() {
    let app = common::spawn_app(Config {
        rate_limit_enabled: false,
        rate_limit_requests: 1,
        ..common::test_config()
    });

    for i in 0..5 {
        let response = app
            .server
            .post("/api/shorten")
            .json(&json!({ "url": format!("https://example.com/{i}") }))
            .await;
        assert_eq!(response.status_code(), 201);
    }
}

#[tokio::test]
async fn test_alias_spelling_a_future_code_does_not_block_it() {
    let app = common::spawn_app(common::test_config());

    // id 1 gets "aaaaab", so the next derived code is "aaaaac"
    let aliased = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/alias", "custom_alias": "aaaaac" }))
        .await;
    assert_eq!(aliased.status_code(), 201);

    let plain = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/plain" }))
        .await;
    assert_eq!(plain.status_code(), 201);
    let body: Value = plain.json();
    assert_eq!(body["short_code"], "aaaaac");

    let redirect = app.server.get("/aaaaac").await;
    assert_eq!(redirect.header("location"), "https://example.com/plain");

    let list: Value = app.server.get("/api/urls").await.json();
    assert_eq!(list["total"], 2);
}

#[tokio::test]
async fn test_failed_code_assignment_leaves_no_record() {
    // negative ids cannot be encoded
    let app = common::spawn_app_with(
        common::test_config(),
        snaplink::infrastructure::persistence::MemoryUrlRepository::with_next_id(-1),
    );

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/a" }))
        .await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(app.state.url_service.count().await.unwrap(), 0);

    let list: Value = app.server.get("/api/urls").await.json();
    assert_eq!(list["total"], 0);
}
