//! User and channel lookups against the host.
//!
//! The host can answer with a value and an error at the same time. A
//! returned value always wins; the error only explains a missing value.
use crate::host::{Channel, HostApi, HostResponse, User};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} not found: {id} ({reason})")]
pub struct NotFound {
    pub kind: &'static str,
    pub id: String,
    pub reason: String,
}

fn settle<T>(resp: HostResponse<T>, kind: &'static str, id: &str) -> Result<T, NotFound> {
    if let Some(value) = resp.value {
        if let Some(err) = resp.error {
            tracing::debug!("Ignoring host error for {} {} returned with a value: {}", kind, id, err);
        }
        return Ok(value);
    }

    let reason = match resp.error {
        Some(err) => err.reason(),
        None => "not found".to_string(),
    };
    tracing::error!("Failed to get {} {}: {}", kind, id, reason);
    Err(NotFound {
        kind,
        id: id.to_string(),
        reason,
    })
}

fn empty_id(kind: &'static str) -> NotFound {
    NotFound {
        kind,
        id: String::new(),
        reason: format!("{} id is empty", kind),
    }
}

pub async fn resolve_user(host: &dyn HostApi, user_id: &str) -> Result<User, NotFound> {
    if user_id.is_empty() {
        return Err(empty_id("user"));
    }
    settle(host.get_user(user_id).await, "user", user_id)
}

pub async fn resolve_channel(host: &dyn HostApi, channel_id: &str) -> Result<Channel, NotFound> {
    if channel_id.is_empty() {
        return Err(empty_id("channel"));
    }
    settle(host.get_channel(channel_id).await, "channel", channel_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{AppError, ChannelType, InMemoryHost};

    fn alice() -> User {
        User {
            id: "u1".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
        }
    }

    #[tokio::test]
    async fn it_prefers_value_over_error() {
        let host = InMemoryHost::new()
            .with_user(alice())
            .with_user_error("u1", AppError::new("app.user.partial", "partial result", 500));

        let user = resolve_user(&host, "u1").await.unwrap();
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn it_prefers_channel_value_over_error() {
        let host = InMemoryHost::new()
            .with_channel(Channel {
                id: "c1".to_string(),
                name: "town-square".to_string(),
                display_name: "Town Square".to_string(),
                channel_type: ChannelType::Open,
            })
            .with_channel_error("c1", AppError::new("app.channel.partial", "partial result", 500));

        let channel = resolve_channel(&host, "c1").await.unwrap();
        assert_eq!(channel.name, "town-square");

        let host = InMemoryHost::new().with_channel_error(
            "c2",
            AppError::new("app.channel.get.existing.app_error", "Unable to find channel", 404),
        );
        let err = resolve_channel(&host, "c2").await.unwrap_err();
        assert_eq!(err.reason, "Unable to find channel");
    }

    #[tokio::test]
    async fn it_uses_error_reason_when_value_missing() {
        let host = InMemoryHost::new().with_user_error(
            "u404",
            AppError {
                id: "app.user.missing".to_string(),
                message: String::new(),
                detailed_error: "sql: no rows in result set".to_string(),
                status_code: 404,
            },
        );

        let err = resolve_user(&host, "u404").await.unwrap_err();
        assert_eq!(err.kind, "user");
        assert_eq!(err.reason, "sql: no rows in result set");
    }

    #[tokio::test]
    async fn it_reports_not_found_without_error() {
        let host = InMemoryHost::new();
        let err = resolve_channel(&host, "c404").await.unwrap_err();
        assert_eq!(err.reason, "not found");
        assert_eq!(err.to_string(), "channel not found: c404 (not found)");
    }

    #[tokio::test]
    async fn it_fails_fast_on_empty_id() {
        let host = InMemoryHost::new().with_channel(Channel {
            id: String::new(),
            name: "ghost".to_string(),
            display_name: String::new(),
            channel_type: ChannelType::Open,
        });
        let err = resolve_channel(&host, "").await.unwrap_err();
        assert_eq!(err.reason, "channel id is empty");

        let err = resolve_user(&host, "").await.unwrap_err();
        assert_eq!(err.reason, "user id is empty");
    }
}
