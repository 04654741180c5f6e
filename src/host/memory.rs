//! In-process host backed by maps, used by the test suite.
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{AppError, Channel, HostApi, HostResponse, NewPost, Post, User};

#[derive(Default)]
pub struct InMemoryHost {
    users: HashMap<String, User>,
    channels: HashMap<String, Channel>,
    // Errors returned next to a value, or alone when there is no value
    user_errors: HashMap<String, AppError>,
    channel_errors: HashMap<String, AppError>,
    fail_posts: bool,
    posts: Mutex<Vec<NewPost>>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.id.clone(), user);
        self
    }

    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channels.insert(channel.id.clone(), channel);
        self
    }

    pub fn with_user_error(mut self, user_id: &str, error: AppError) -> Self {
        self.user_errors.insert(user_id.to_string(), error);
        self
    }

    pub fn with_channel_error(mut self, channel_id: &str, error: AppError) -> Self {
        self.channel_errors.insert(channel_id.to_string(), error);
        self
    }

    pub fn failing_posts(mut self) -> Self {
        self.fail_posts = true;
        self
    }

    /// Posts created so far, oldest first.
    pub fn posts(&self) -> Vec<NewPost> {
        self.posts.lock().expect("posts lock poisoned").clone()
    }
}

#[async_trait]
impl HostApi for InMemoryHost {
    async fn get_user(&self, user_id: &str) -> HostResponse<User> {
        HostResponse {
            value: self.users.get(user_id).cloned(),
            error: self.user_errors.get(user_id).cloned(),
        }
    }

    async fn get_channel(&self, channel_id: &str) -> HostResponse<Channel> {
        HostResponse {
            value: self.channels.get(channel_id).cloned(),
            error: self.channel_errors.get(channel_id).cloned(),
        }
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, AppError> {
        if self.fail_posts {
            return Err(AppError::new(
                "api.post.create_post.can_not_post_to_deleted.error",
                "Can not post to deleted channel.",
                400,
            ));
        }
        let mut posts = self.posts.lock().expect("posts lock poisoned");
        let created = Post {
            id: format!("post{}", posts.len() + 1),
            channel_id: post.channel_id.clone(),
            message: post.message.clone(),
            root_id: post.root_id.clone().unwrap_or_default(),
        };
        posts.push(post);
        Ok(created)
    }
}
