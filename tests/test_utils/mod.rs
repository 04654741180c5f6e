//! Test utilities for integration tests
use std::sync::Arc;

use axum::{Router, body::Body, http::Request};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};

use meetsched::api::AppState;
use meetsched::api::app;
use meetsched::core::{ConfigCache, DEFAULT_WEBHOOK_TIMEOUT, FixedClock, PluginConfig, StaticSettings};
use meetsched::host::{Channel, ChannelType, HostApi, InMemoryHost, User};
use meetsched::schedule::WebhookClient;

pub const WEBHOOK_PATH: &str = "/webhook/meet";

/// Frozen "now" for every request, 2025-05-20 12:00 UTC.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 20, 12, 0, 0).unwrap()
}

pub fn user(id: &str, username: &str) -> User {
    User {
        id: id.to_string(),
        username: username.to_string(),
        email: format!("{}@example.com", username),
        first_name: username.to_string(),
        last_name: String::new(),
    }
}

pub fn channel(id: &str, name: &str, channel_type: ChannelType) -> Channel {
    Channel {
        id: id.to_string(),
        name: name.to_string(),
        display_name: name.to_string(),
        channel_type,
    }
}

/// Host with alice, bob and carol, a public channel and a DM
/// between alice and bob.
pub fn test_host() -> InMemoryHost {
    InMemoryHost::new()
        .with_user(user("u_alice", "alice"))
        .with_user(user("u_bob", "bob"))
        .with_user(user("u_carol", "carol"))
        .with_channel(channel("c_town", "town-square", ChannelType::Open))
        .with_channel(channel("c_dm", "u_alice__u_bob", ChannelType::Direct))
}

/// Creates a test application router over `host` with the webhook at
/// `webhook_url`. An empty URL leaves the webhook unconfigured.
pub fn test_app(host: Arc<InMemoryHost>, webhook_url: &str) -> Router {
    let settings = StaticSettings(PluginConfig {
        webhook_url: webhook_url.to_string(),
        open_in_new_tab: true,
    });
    test_app_with_host(host, settings)
}

pub fn test_app_with_host(host: Arc<dyn HostApi>, settings: StaticSettings) -> Router {
    let webhook =
        WebhookClient::new(DEFAULT_WEBHOOK_TIMEOUT).expect("Failed to build webhook client");
    let app_state = AppState::new(
        host,
        ConfigCache::new(Arc::new(settings)),
        webhook,
        Arc::new(FixedClock(test_now())),
    );
    app(Arc::new(app_state))
}

/// A request body that passes validation against `test_host`.
pub fn valid_body() -> Value {
    json!({
        "channel_id": "c_town",
        "team_id": "t1",
        "user_id": "u_alice",
        "start_at_local": "2025-06-01T10:00:00+03:00",
        "timezone": "Europe/Moscow",
        "duration_minutes": 30,
        "title": "Sprint review",
        "participant_ids": ["u_bob", "u_carol"]
    })
}

pub fn schedule_request(body: &Value) -> Request<Body> {
    Request::builder()
        .uri("/api/schedule-meeting")
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

pub async fn body_to_json(body: Body) -> Value {
    let body = body_to_string(body).await;
    serde_json::from_str(&body).expect("Body is not JSON")
}

/// Field names of an `{"errors": [...]}` body, in order.
pub fn error_fields(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .map(|e| e["field"].as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}
