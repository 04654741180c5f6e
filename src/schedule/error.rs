//! Field-scoped errors and the pipeline failure taxonomy.
use http::StatusCode;
use serde::{Deserialize, Serialize};

use super::webhook::WebhookError;

pub const FIELD_GENERAL: &str = "general";
pub const FIELD_CHANNEL_ID: &str = "channel_id";
pub const FIELD_USER_ID: &str = "user_id";
pub const FIELD_START_AT_LOCAL: &str = "start_at_local";
pub const FIELD_DURATION_MINUTES: &str = "duration_minutes";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_PARTICIPANT_IDS: &str = "participant_ids";

/// One entry of an `{"errors": [...]}` response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn general(message: impl Into<String>) -> Self {
        Self::new(FIELD_GENERAL, message)
    }
}

/// Why a schedule-meeting request did not produce a meeting.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("invalid request ({} errors)", .0.len())]
    Invalid(Vec<FieldError>),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("channel not found: {0}")]
    ChannelNotFound(String),

    #[error("webhook URL is not configured")]
    WebhookNotConfigured,

    #[error(transparent)]
    Webhook(#[from] WebhookError),

    #[error("webhook succeeded without returning a room URL")]
    MissingRoomUrl,
}

impl ScheduleError {
    pub fn invalid(error: FieldError) -> Self {
        ScheduleError::Invalid(vec![error])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ScheduleError::Invalid(_) | ScheduleError::WebhookNotConfigured => {
                StatusCode::BAD_REQUEST
            }
            ScheduleError::UserNotFound(_) | ScheduleError::ChannelNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ScheduleError::Webhook(err) => err.status(),
            ScheduleError::MissingRoomUrl => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn field_errors(&self) -> Vec<FieldError> {
        match self {
            ScheduleError::Invalid(errors) => errors.clone(),
            ScheduleError::UserNotFound(id) => {
                vec![FieldError::new(FIELD_USER_ID, format!("User not found: {}", id))]
            }
            ScheduleError::ChannelNotFound(id) => vec![FieldError::new(
                FIELD_CHANNEL_ID,
                format!("Channel not found: {}", id),
            )],
            ScheduleError::WebhookNotConfigured => vec![FieldError::general(
                "Webhook URL is not configured. Contact your administrator.",
            )],
            ScheduleError::Webhook(err) => vec![FieldError::general(err.user_message())],
            ScheduleError::MissingRoomUrl => vec![FieldError::general(
                "Meeting not created: the webhook did not return a room URL",
            )],
        }
    }

    /// Correlation id reported by the remote workflow, if any.
    pub fn execution_id(&self) -> Option<&str> {
        match self {
            ScheduleError::Webhook(WebhookError::Structured { execution_id, .. }) => {
                execution_id.as_deref()
            }
            _ => None,
        }
    }
}
