use crate::domain::post::entity::{Post, PostDraft, PostId};
use crate::domain::post::errors::ClientError;
use crate::domain::shared::pagination::PostPage;
use async_trait::async_trait;
use serde::Deserialize;

/// Server answer to a like toggle.
///
/// `likes_count` is optional on the wire: the backend's toggle endpoint
/// reports only the resulting membership, while richer deployments include
/// the recomputed count.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleLikeResponse {
    pub is_liked: bool,
    #[serde(default)]
    pub likes_count: Option<u32>,
}

#[async_trait]
pub trait PostsApi: Send + Sync {
    /// Page through all posts, most recent first. Public endpoint; the
    /// per-post `is_liked` flag is only meaningful when a token is attached.
    async fn list_posts(&self, page: u32, limit: u32) -> Result<PostPage, ClientError>;

    /// Page through the current user's liked posts. Requires authentication.
    async fn liked_posts(&self, page: u32, limit: u32) -> Result<PostPage, ClientError>;

    /// Flip the current user's like for a post. Requires authentication.
    async fn toggle_like(&self, post_id: PostId) -> Result<ToggleLikeResponse, ClientError>;

    /// Create a post from an already-validated draft. Requires authentication.
    async fn create_post(&self, draft: &PostDraft) -> Result<Post, ClientError>;

    /// Delete one of the current user's posts. Requires authentication.
    async fn delete_post(&self, post_id: PostId) -> Result<(), ClientError>;

    /// Remove every like held by the current user, returning how many were
    /// deleted. Requires authentication.
    async fn clear_likes(&self) -> Result<u64, ClientError>;
}
