//! Integration tests for token issuance and caching.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use acommerce_client::{
    AcommerceError, ChannelId, MemoryTokenCache, MokaTokenCache, SUBJECT_TOKEN_HEADER,
};
use acommerce_integration_tests::{API_KEY, MockAcommerce, USERNAME};
use secrecy::ExposeSecret;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

const MERCHANTS_PATH: &str = "/channel/ufc/merchants";

async fn mount_merchants(mock: &MockAcommerce) {
    Mock::given(method("GET"))
        .and(path(MERCHANTS_PATH))
        .and(header(SUBJECT_TOKEN_HEADER, "tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock.server)
        .await;
    Mock::given(method("GET"))
        .and(path(MERCHANTS_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("missing subject token"))
        .mount(&mock.server)
        .await;
}

#[tokio::test]
async fn test_identity_request_shape() {
    let mock = MockAcommerce::start().await;
    Mock::given(method("POST"))
        .and(path("/identity/token"))
        .and(body_json(serde_json::json!({
            "auth": {
                "apiKeyCredentials": { "username": USERNAME, "apiKey": API_KEY }
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "token": { "token_id": "tok-1", "expires_at": "2099-01-01T00:00:00Z" }
        })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let token = mock.client().token().await.unwrap().unwrap();
    assert_eq!(token.expose_secret(), "tok-1");
}

#[tokio::test]
async fn test_token_reused_across_requests() {
    let mock = MockAcommerce::start().await;
    mock.issue_token("tok-1", Some(1)).await;
    mount_merchants(&mock).await;

    let client = mock.client();
    let channel = ChannelId::new("ufc");
    for _ in 0..3 {
        client.merchants(&channel).await.unwrap();
    }

    assert_eq!(mock.hits(MERCHANTS_PATH).await, 3);
}

#[tokio::test]
async fn test_shared_cache_across_clients() {
    let mock = MockAcommerce::start().await;
    mock.issue_token("tok-1", Some(1)).await;

    let cache = MokaTokenCache::new();
    let first = mock.client_with_cache(mock.config(), cache.clone());
    let second = mock.client_with_cache(mock.config(), cache);

    let a = first.token().await.unwrap().unwrap();
    let b = second.token().await.unwrap().unwrap();
    assert_eq!(a.expose_secret(), b.expose_secret());
}

#[tokio::test]
async fn test_arc_cache_is_shared() {
    let mock = MockAcommerce::start().await;
    mock.issue_token("tok-1", Some(1)).await;

    let cache = Arc::new(MemoryTokenCache::new());
    let client = mock.client_with_cache(mock.config(), Arc::clone(&cache));
    client.token().await.unwrap();

    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn test_expired_token_is_refreshed() {
    let mock = MockAcommerce::start().await;
    mock.issue_token("tok-1", Some(2)).await;

    let mut config = mock.config();
    config.token_ttl = Duration::from_millis(50);
    let client = mock.client_with_cache(config, MemoryTokenCache::new());

    client.token().await.unwrap();
    client.token().await.unwrap();
    tokio::time::sleep(Duration::from_millis(120)).await;
    client.token().await.unwrap();
}

#[tokio::test]
async fn test_switching_credentials_uses_new_cache_key() {
    let mock = MockAcommerce::start().await;
    mock.issue_token("tok-1", Some(2)).await;

    let cache = MemoryTokenCache::new();
    let client = mock.client_with_cache(mock.config(), cache.clone());
    client.token().await.unwrap();

    let other = client.with_credentials("np-warehouse", "other-key");
    assert_ne!(
        client.config().credentials.cache_key(),
        other.config().credentials.cache_key()
    );
    other.token().await.unwrap();
    client.token().await.unwrap();

    assert_eq!(cache.len().await, 2);
}

#[tokio::test]
async fn test_rejected_credentials_surface_on_resource_call() {
    let mock = MockAcommerce::start().await;
    Mock::given(method("POST"))
        .and(path("/identity/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad api key"))
        .mount(&mock.server)
        .await;
    mount_merchants(&mock).await;

    let cache = MemoryTokenCache::new();
    let client = mock.client_with_cache(mock.config(), cache.clone());

    assert!(client.token().await.unwrap().is_none());
    assert!(cache.is_empty().await);

    let err = client.merchants(&ChannelId::new("ufc")).await.unwrap_err();
    assert!(matches!(err, AcommerceError::Unauthorized { status: 401, .. }));
    assert!(err.is_auth_failure());

    let requests = mock.server.received_requests().await.unwrap_or_default();
    let resource = requests
        .iter()
        .find(|request| request.url.path() == MERCHANTS_PATH)
        .unwrap();
    assert!(!resource.headers.contains_key(SUBJECT_TOKEN_HEADER));
}

#[tokio::test]
async fn test_identity_outage_is_an_error() {
    let mock = MockAcommerce::start().await;
    Mock::given(method("POST"))
        .and(path("/identity/token"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&mock.server)
        .await;

    let err = mock.client().token().await.unwrap_err();
    assert!(matches!(err, AcommerceError::Auth(_)));
}
