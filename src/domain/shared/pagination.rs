use crate::domain::post::entity::Post;
use serde::{Deserialize, Serialize};

/// Pagination metadata as returned by the backend alongside every post list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_posts: u64,
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
}

/// One page of posts plus its pagination envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub pagination: PageInfo,
}
