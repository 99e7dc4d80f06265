use crate::domain::post::entity::Post;

/// Which post collection the pager is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    All,
    Liked,
}

/// Loading state of the feed view.
///
/// `LoadingInitial` blocks the whole view; `LoadingMore` only blocks the
/// trailing affordance. The two are never active at once. `Error` replaces
/// the feed with a retry affordance and has no automatic recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedPhase {
    Idle,
    LoadingInitial,
    LoadingMore,
    Error(String),
}

/// Read surface handed to the UI on every render.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub view: ViewMode,
    pub posts: Vec<Post>,
    pub page: u32,
    pub has_more: bool,
    pub phase: FeedPhase,
}
