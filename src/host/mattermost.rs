//! Mattermost REST v4 adapter.
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::{AppError, Channel, HostApi, HostResponse, NewPost, Post, User};

const API_VERSION: &str = "/api/v4";

pub struct MattermostHost {
    base_url: String,
    token: String,
    client: Client,
}

impl MattermostHost {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            base_url: format!("{}{}", base_url.trim_end_matches('/'), API_VERSION),
            token: token.to_string(),
            client: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> HostResponse<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = match self.client.get(&url).bearer_auth(&self.token).send().await {
            Ok(resp) => resp,
            Err(err) => return HostResponse::failed(transport_error(err)),
        };

        if !resp.status().is_success() {
            return HostResponse::failed(error_from_response(resp).await);
        }

        match resp.json::<T>().await {
            Ok(value) => HostResponse::found(value),
            Err(err) => HostResponse::failed(AppError {
                id: "meetsched.host.decode".to_string(),
                message: String::new(),
                detailed_error: err.to_string(),
                status_code: 0,
            }),
        }
    }
}

fn transport_error(err: reqwest::Error) -> AppError {
    AppError {
        id: "meetsched.host.transport".to_string(),
        message: String::new(),
        detailed_error: err.to_string(),
        status_code: 0,
    }
}

async fn error_from_response(resp: Response) -> AppError {
    let status = resp.status().as_u16();
    let mut err = resp.json::<AppError>().await.unwrap_or_default();
    if err.status_code == 0 {
        err.status_code = status;
    }
    err
}

#[async_trait]
impl HostApi for MattermostHost {
    async fn get_user(&self, user_id: &str) -> HostResponse<User> {
        self.get_json(&format!("/users/{}", user_id)).await
    }

    async fn get_channel(&self, channel_id: &str) -> HostResponse<Channel> {
        self.get_json(&format!("/channels/{}", channel_id)).await
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, AppError> {
        let url = format!("{}/posts", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&post)
            .send()
            .await
            .map_err(transport_error)?;

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        resp.json::<Post>().await.map_err(|err| AppError {
            id: "meetsched.host.decode".to_string(),
            message: String::new(),
            detailed_error: err.to_string(),
            status_code: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn it_gets_user() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v4/users/u1")
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id": "u1", "username": "alice", "email": "alice@example.com",
                    "first_name": "Alice", "last_name": "Liddell", "roles": "system_user"}"#,
            )
            .create();

        let host = MattermostHost::new(&server.url(), "test-token");
        let resp = host.get_user("u1").await;

        let user = resp.value.expect("Should have a user");
        assert_eq!(user.username, "alice");
        assert_eq!(user.last_name, "Liddell");
        assert!(resp.error.is_none());
    }

    #[tokio::test]
    async fn it_parses_host_error_for_missing_channel() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v4/channels/missing")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id": "app.channel.get.existing.app_error", "message": "Unable to find the existing channel.",
                    "detailed_error": "", "status_code": 404}"#,
            )
            .create();

        let host = MattermostHost::new(&server.url(), "test-token");
        let resp = host.get_channel("missing").await;

        assert!(resp.value.is_none());
        let err = resp.error.expect("Should have an error");
        assert_eq!(err.status_code, 404);
        assert_eq!(err.reason(), "Unable to find the existing channel.");
    }

    #[tokio::test]
    async fn it_keeps_http_status_when_error_body_is_not_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v4/users/u1")
            .with_status(502)
            .with_body("bad gateway")
            .create();

        let host = MattermostHost::new(&server.url(), "test-token");
        let err = host.get_user("u1").await.error.expect("Should have an error");
        assert_eq!(err.status_code, 502);
    }

    #[tokio::test]
    async fn it_creates_thread_reply() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v4/posts")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "channel_id": "c1",
                "message": "hello",
                "root_id": "root1",
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "p1", "channel_id": "c1", "message": "hello", "root_id": "root1"}"#)
            .create();

        let host = MattermostHost::new(&format!("{}/", server.url()), "test-token");
        let post = host
            .create_post(NewPost {
                channel_id: "c1".to_string(),
                user_id: "u1".to_string(),
                message: "hello".to_string(),
                root_id: Some("root1".to_string()),
            })
            .await
            .unwrap();

        mock.assert();
        assert_eq!(post.id, "p1");
        assert_eq!(post.root_id, "root1");
    }
}
