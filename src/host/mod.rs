//! The chat host this service runs against.
//!
//! The host owns users, channels and posts. We only read users and
//! channels and create posts; everything else about the host is out of
//! reach of this crate.
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod mattermost;
pub mod memory;

pub use mattermost::MattermostHost;
pub use memory::InMemoryHost;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelType {
    #[serde(rename = "O")]
    Open,
    #[serde(rename = "P")]
    Private,
    #[serde(rename = "D")]
    Direct,
    #[serde(rename = "G")]
    Group,
}

impl ChannelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelType::Open => "O",
            ChannelType::Private => "P",
            ChannelType::Direct => "D",
            ChannelType::Group => "G",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
}

impl Channel {
    pub fn is_direct(&self) -> bool {
        self.channel_type == ChannelType::Direct
    }

    /// The counterpart of `user_id` in a direct channel.
    ///
    /// Direct channel names are the two member ids joined by `__`. A
    /// self-DM yields the user's own id.
    pub fn other_user_for_dm(&self, user_id: &str) -> Option<String> {
        if !self.is_direct() {
            return None;
        }
        let (first, second) = self.name.split_once("__")?;
        if first.is_empty() || second.is_empty() || second.contains("__") {
            return None;
        }
        if first == second {
            return Some(first.to_string());
        }
        if first == user_id {
            Some(second.to_string())
        } else {
            Some(first.to_string())
        }
    }
}

/// Error record the host attaches to a failed call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppError {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub detailed_error: String,
    #[serde(default)]
    pub status_code: u16,
}

impl AppError {
    pub fn new(id: &str, message: &str, status_code: u16) -> Self {
        Self {
            id: id.to_string(),
            message: message.to_string(),
            detailed_error: String::new(),
            status_code,
        }
    }

    /// Best available description: message, then detail, then id.
    pub fn reason(&self) -> String {
        if !self.message.is_empty() {
            self.message.clone()
        } else if !self.detailed_error.is_empty() {
            self.detailed_error.clone()
        } else if !self.id.is_empty() {
            format!("AppError (id: {})", self.id)
        } else {
            "unknown error".to_string()
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason())
    }
}

impl std::error::Error for AppError {}

/// Result of a host lookup. The host may hand back a value and an error
/// at the same time, so both sides are optional.
#[derive(Clone, Debug)]
pub struct HostResponse<T> {
    pub value: Option<T>,
    pub error: Option<AppError>,
}

impl<T> HostResponse<T> {
    pub fn found(value: T) -> Self {
        Self {
            value: Some(value),
            error: None,
        }
    }

    pub fn failed(error: AppError) -> Self {
        Self {
            value: None,
            error: Some(error),
        }
    }

    pub fn empty() -> Self {
        Self {
            value: None,
            error: None,
        }
    }
}

/// A post to create in a channel, optionally as a thread reply.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    pub channel_id: String,
    pub user_id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub channel_id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub root_id: String,
}

#[async_trait]
pub trait HostApi: Send + Sync {
    async fn get_user(&self, user_id: &str) -> HostResponse<User>;

    async fn get_channel(&self, channel_id: &str) -> HostResponse<Channel>;

    async fn create_post(&self, post: NewPost) -> Result<Post, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dm(name: &str) -> Channel {
        Channel {
            id: "dm1".to_string(),
            name: name.to_string(),
            display_name: String::new(),
            channel_type: ChannelType::Direct,
        }
    }

    #[test]
    fn it_finds_other_user_in_dm() {
        let channel = dm("alice__bob");
        assert_eq!(channel.other_user_for_dm("alice"), Some("bob".to_string()));
        assert_eq!(channel.other_user_for_dm("bob"), Some("alice".to_string()));
    }

    #[test]
    fn it_handles_self_dm() {
        let channel = dm("alice__alice");
        assert_eq!(channel.other_user_for_dm("alice"), Some("alice".to_string()));
    }

    #[test]
    fn it_ignores_malformed_or_non_direct_channels() {
        assert_eq!(dm("alice").other_user_for_dm("alice"), None);
        assert_eq!(dm("alice__").other_user_for_dm("alice"), None);

        let mut channel = dm("alice__bob");
        channel.channel_type = ChannelType::Open;
        assert_eq!(channel.other_user_for_dm("alice"), None);
    }

    #[test]
    fn it_describes_app_errors_by_priority() {
        let mut err = AppError {
            id: "store.sql_user.missing".to_string(),
            message: "Unable to find the user.".to_string(),
            detailed_error: "sql: no rows".to_string(),
            status_code: 404,
        };
        assert_eq!(err.reason(), "Unable to find the user.");
        err.message.clear();
        assert_eq!(err.reason(), "sql: no rows");
        err.detailed_error.clear();
        assert_eq!(err.reason(), "AppError (id: store.sql_user.missing)");
        err.id.clear();
        assert_eq!(err.reason(), "unknown error");
    }

    #[test]
    fn it_deserializes_channel_type() {
        let channel: Channel =
            serde_json::from_str(r#"{"id": "c1", "name": "town-square", "type": "O"}"#).unwrap();
        assert_eq!(channel.channel_type, ChannelType::Open);
        assert_eq!(channel.channel_type.as_str(), "O");
    }
}
