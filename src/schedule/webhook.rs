//! Outbound call to the automation webhook that provisions the room.
use std::time::Duration;

use anyhow::Result;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const FIELD_ROOM_URL: &str = "room_url";
pub const FIELD_MEETING_URL: &str = "meeting_url";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PayloadParticipant {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Body posted to the webhook. Built once per request, never stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub operation_type: String,
    pub scheduled_at: String,
    pub scheduled_at_local: String,
    pub end_time: String,
    pub end_time_local: String,
    pub timezone: String,
    pub duration_minutes: i64,
    pub title: String,
    pub description: Option<String>,
    pub team_id: String,
    pub channel_id: String,
    pub channel_name: String,
    pub channel_type: String,
    pub user_id: String,
    pub username: String,
    pub user_email: String,
    pub participants: Vec<PayloadParticipant>,
    pub auto_detected: bool,
    pub source: String,
    pub timestamp: String,
}

/// Successful webhook answer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WebhookReply {
    pub room_url: Option<String>,
    pub meeting_url: Option<String>,
    /// The full response object, untouched.
    pub fields: Map<String, Value>,
}

impl WebhookReply {
    fn from_fields(fields: Map<String, Value>) -> Self {
        Self {
            room_url: str_field(&fields, FIELD_ROOM_URL).map(str::to_string),
            meeting_url: str_field(&fields, FIELD_MEETING_URL).map(str::to_string),
            fields,
        }
    }

    /// Link participants join with: `room_url`, falling back to `meeting_url`.
    pub fn join_url(&self) -> Option<&str> {
        self.room_url.as_deref().or(self.meeting_url.as_deref())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("failed to serialize webhook payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to send webhook request to {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid webhook response (status {status}): {reason}")]
    BadResponse { status: u16, reason: String },

    #[error("webhook error (status {status}): {message}")]
    Structured {
        message: String,
        execution_id: Option<String>,
        status: u16,
    },

    #[error("webhook error (status {status}): {message}")]
    Legacy { message: String, status: u16 },

    #[error("webhook reported failure: {message}")]
    Rejected { message: String },
}

impl WebhookError {
    /// Status the caller answers with.
    ///
    /// Structured errors keep the remote status when it is a client
    /// error and fall back to 422 otherwise.
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookError::Serialize(_)
            | WebhookError::Transport { .. }
            | WebhookError::Rejected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            WebhookError::BadResponse { .. } | WebhookError::Legacy { .. } => {
                StatusCode::BAD_GATEWAY
            }
            WebhookError::Structured { status, .. } => match *status {
                400..=499 => {
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::UNPROCESSABLE_ENTITY)
                }
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            },
        }
    }

    /// Message shown to the user who asked for the meeting.
    pub fn user_message(&self) -> String {
        match self {
            WebhookError::Serialize(err) => {
                format!("Failed to prepare meeting data: {}", err)
            }
            WebhookError::Transport { url, .. } => format!(
                "Could not create the meeting.\n\n\
                 🔌 Could not connect to the webhook:\n{}\n\n\
                 Check that:\n\
                 1. the automation service is running and reachable\n\
                 2. the workflow is active\n\
                 3. the webhook URL is correct",
                url
            ),
            WebhookError::BadResponse { status, reason } => {
                format!("Invalid webhook response (status {}): {}", status, reason)
            }
            WebhookError::Structured { message, .. }
            | WebhookError::Legacy { message, .. }
            | WebhookError::Rejected { message } => message.clone(),
        }
    }
}

fn str_field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

// Booleans, "true"/"1"/"yes" and non-zero numbers are truthy. Any other
// type counts as success.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.as_str(), "true" | "1" | "yes"),
        Value::Number(n) => n.as_f64().is_none_or(|f| f != 0.0),
        _ => true,
    }
}

/// Classifies a webhook answer from its status and raw body.
pub fn interpret(status: u16, body: &[u8]) -> Result<WebhookReply, WebhookError> {
    let fields: Map<String, Value> = if body.is_empty() {
        tracing::warn!("Webhook returned empty body");
        Map::new()
    } else {
        serde_json::from_slice(body).map_err(|err| WebhookError::BadResponse {
            status,
            reason: err.to_string(),
        })?
    };

    if status != StatusCode::OK.as_u16() {
        if str_field(&fields, "status") == Some("error") {
            return Err(WebhookError::Structured {
                message: str_field(&fields, "message")
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        format!("Could not create the meeting (status {})", status)
                    }),
                execution_id: str_field(&fields, "execution_id").map(str::to_string),
                status,
            });
        }

        let message = str_field(&fields, "message")
            .or_else(|| str_field(&fields, "error"))
            .map(str::to_string)
            .unwrap_or_else(|| format!("Webhook error (status {})", status));
        return Err(WebhookError::Legacy { message, status });
    }

    if let Some(success) = fields.get("success") {
        if !is_truthy(success) {
            let message = str_field(&fields, "message")
                .unwrap_or("Could not create the meeting")
                .to_string();
            return Err(WebhookError::Rejected { message });
        }
    }

    Ok(WebhookReply::from_fields(fields))
}

pub struct WebhookClient {
    client: reqwest::Client,
}

impl WebhookClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Posts `payload` to `url` once. No retries.
    pub async fn send(
        &self,
        url: &str,
        payload: &WebhookPayload,
    ) -> Result<WebhookReply, WebhookError> {
        let body = serde_json::to_vec(payload)?;
        tracing::info!(url = %url, payload_size = body.len(), "Sending webhook request");

        let transport = |source| WebhookError::Transport {
            url: url.to_string(),
            source,
        };

        let resp = self
            .client
            .post(url)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status().as_u16();
        let bytes = resp.bytes().await.map_err(transport)?;
        tracing::info!(status, body_length = bytes.len(), "Webhook response received");

        let result = interpret(status, &bytes);
        if let Err(err) = &result {
            tracing::error!("Webhook call failed: {}", err);
        }
        result
    }
}
