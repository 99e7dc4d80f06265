use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Backend post identifier. The posting service keys posts by an
/// auto-incrementing integer.
pub type PostId = i64;

/// A post as served by the backend feed endpoints.
///
/// `likes_count` and `is_liked` are computed server-side for the requesting
/// user at fetch time; once a post is observed, the like reconciler's local
/// cache takes over as the source the UI reads from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub body: String,
    pub user: Author,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub is_liked: bool,
}

/// Author summary embedded in each post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub username: String,
}

/// Input for creating a post, validated locally before the request is issued.
/// Bounds match what the backend enforces.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct PostDraft {
    #[validate(length(min = 3, max = 100))]
    pub title: String,
    #[validate(length(min = 10, max = 500))]
    pub body: String,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}
