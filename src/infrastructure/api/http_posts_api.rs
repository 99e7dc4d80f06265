use crate::config::ClientConfig;
use crate::domain::post::entity::{Post, PostDraft, PostId};
use crate::domain::post::errors::ClientError;
use crate::domain::session::entity::Session;
use crate::domain::shared::pagination::PostPage;
use crate::infrastructure::api::traits::{PostsApi, ToggleLikeResponse};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Error body shape used by the posting backend for every failure response.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct CreatedPostEnvelope {
    post: Post,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClearLikesResponse {
    deleted_count: u64,
}

/// Reqwest-backed [`PostsApi`] implementation.
///
/// Attaches the session's bearer token to every request that has one, the
/// same way the original client installed a default Authorization header at
/// login.
pub struct HttpPostsApi {
    http: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
}

impl HttpPostsApi {
    pub fn new(config: &ClientConfig, session: Arc<Session>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let request = match self.session.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ApiErrorBody>()
            .await
            .map(|body| body.message)
            .unwrap_or_else(|_| status.to_string());
        tracing::warn!(status = status.as_u16(), %message, "api request rejected");

        Err(match status.as_u16() {
            401 | 403 => ClientError::AuthenticationRequired,
            404 => ClientError::NotFound(message),
            400 => ClientError::Validation(message),
            code => ClientError::Api {
                status: code,
                message,
            },
        })
    }
}

#[async_trait]
impl PostsApi for HttpPostsApi {
    async fn list_posts(&self, page: u32, limit: u32) -> Result<PostPage, ClientError> {
        let response = self
            .send(
                self.http
                    .get(self.url("/api/posts"))
                    .query(&[("page", page), ("limit", limit)]),
            )
            .await?;
        Ok(response.json::<PostPage>().await?)
    }

    async fn liked_posts(&self, page: u32, limit: u32) -> Result<PostPage, ClientError> {
        let response = self
            .send(
                self.http
                    .get(self.url("/api/user/liked-posts"))
                    .query(&[("page", page), ("limit", limit)]),
            )
            .await?;
        Ok(response.json::<PostPage>().await?)
    }

    async fn toggle_like(&self, post_id: PostId) -> Result<ToggleLikeResponse, ClientError> {
        let response = self
            .send(self.http.post(self.url(&format!("/api/posts/{}/like", post_id))))
            .await?;
        Ok(response.json::<ToggleLikeResponse>().await?)
    }

    async fn create_post(&self, draft: &PostDraft) -> Result<Post, ClientError> {
        let response = self
            .send(self.http.post(self.url("/api/posts")).json(draft))
            .await?;
        Ok(response.json::<CreatedPostEnvelope>().await?.post)
    }

    async fn delete_post(&self, post_id: PostId) -> Result<(), ClientError> {
        self.send(self.http.delete(self.url(&format!("/api/posts/{}", post_id))))
            .await?;
        Ok(())
    }

    async fn clear_likes(&self) -> Result<u64, ClientError> {
        let response = self
            .send(self.http.delete(self.url("/api/user/liked-posts/clear")))
            .await?;
        Ok(response.json::<ClearLikesResponse>().await?.deleted_count)
    }
}
