use super::dto::{FeedPhase, FeedSnapshot, ViewMode};
use crate::application::likes::use_case::LikeReconciler;
use crate::config::ClientConfig;
use crate::domain::post::entity::{Post, PostDraft, PostId};
use crate::domain::post::errors::ClientError;
use crate::domain::session::entity::Session;
use crate::domain::session::events::SessionEvent;
use crate::domain::shared::pagination::PostPage;
use crate::infrastructure::api::traits::PostsApi;
use std::sync::{Arc, Mutex};
use validator::Validate;

struct FeedState {
    view: ViewMode,
    posts: Vec<Post>,
    page: u32,
    has_more: bool,
    phase: FeedPhase,
}

impl FeedState {
    fn new(view: ViewMode) -> Self {
        Self {
            view,
            posts: Vec::new(),
            page: 1,
            has_more: false,
            phase: FeedPhase::Idle,
        }
    }

    fn reset(&mut self, view: ViewMode) {
        *self = Self::new(view);
    }
}

/// Drives paginated retrieval of a post collection and keeps the local list
/// consistent with create/remove events from elsewhere in the UI.
///
/// Fetch errors never escape: initial/refresh failures become the `Error`
/// phase, load-more failures quietly stop the scroll. Every successfully
/// fetched page is seeded into the like reconciler's counter cache before it
/// lands in the list.
pub struct FeedPager {
    api: Arc<dyn PostsApi>,
    session: Arc<Session>,
    likes: Arc<LikeReconciler>,
    state: Mutex<FeedState>,
    page_size: u32,
}

impl FeedPager {
    pub fn new(
        api: Arc<dyn PostsApi>,
        session: Arc<Session>,
        likes: Arc<LikeReconciler>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            api,
            session,
            likes,
            state: Mutex::new(FeedState::new(ViewMode::All)),
            page_size: config.page_size,
        }
    }

    /// Load page 1 for the given view, replacing whatever was shown.
    ///
    /// The liked view requires authentication; without it the pager records
    /// `AuthenticationRequired` as view state and issues no request.
    pub async fn load_initial(&self, view: ViewMode) {
        if view == ViewMode::Liked && !self.session.is_authenticated() {
            let mut state = self.state.lock().expect("feed state lock poisoned");
            state.reset(view);
            state.phase = FeedPhase::Error(ClientError::AuthenticationRequired.to_string());
            return;
        }

        {
            let mut state = self.state.lock().expect("feed state lock poisoned");
            state.view = view;
            state.phase = FeedPhase::LoadingInitial;
        }

        match self.fetch(view, 1).await {
            Ok(page) => {
                self.likes.initialize(&page.posts);
                let mut state = self.state.lock().expect("feed state lock poisoned");
                state.posts = page.posts;
                state.page = 1;
                state.has_more = page.pagination.has_next;
                state.phase = FeedPhase::Idle;
            }
            Err(err) => {
                let mut state = self.state.lock().expect("feed state lock poisoned");
                state.posts.clear();
                state.page = 1;
                state.has_more = false;
                state.phase = FeedPhase::Error(err.to_string());
            }
        }
    }

    /// Fetch the next page and append it.
    ///
    /// The no-op guard and the phase transition happen under one lock, so
    /// rapid scroll events while a fetch is pending collapse into a single
    /// request. A failure leaves the fetched posts visible and stops the
    /// scroll; `refresh` restarts it.
    pub async fn load_more(&self) {
        let (view, next_page) = {
            let mut state = self.state.lock().expect("feed state lock poisoned");
            if state.phase != FeedPhase::Idle || !state.has_more {
                return;
            }
            state.phase = FeedPhase::LoadingMore;
            (state.view, state.page + 1)
        };

        match self.fetch(view, next_page).await {
            Ok(page) => {
                self.likes.initialize(&page.posts);
                let mut state = self.state.lock().expect("feed state lock poisoned");
                state.posts.extend(page.posts);
                state.page = next_page;
                state.has_more = page.pagination.has_next;
                state.phase = FeedPhase::Idle;
            }
            Err(err) => {
                tracing::warn!(page = next_page, error = %err, "load-more failed, stopping scroll");
                let mut state = self.state.lock().expect("feed state lock poisoned");
                state.has_more = false;
                state.phase = FeedPhase::Idle;
            }
        }
    }

    /// Start over at page 1 for the current view, discarding accumulated pages.
    pub async fn refresh(&self) {
        let view = self.state.lock().expect("feed state lock poisoned").view;
        self.load_initial(view).await;
    }

    /// Switch collections: clear the list, reset paging, load page 1 of the
    /// new view. A no-op when the mode is unchanged.
    pub async fn switch_view_mode(&self, view: ViewMode) {
        {
            let mut state = self.state.lock().expect("feed state lock poisoned");
            if state.view == view {
                return;
            }
            state.reset(view);
        }
        self.load_initial(view).await;
    }

    /// Merge a post created elsewhere in the UI. Only the all view prepends:
    /// a brand-new post is liked by nobody, so it has no place in the liked
    /// view.
    pub fn on_post_created(&self, post: Post) {
        self.likes.initialize(std::slice::from_ref(&post));
        let mut state = self.state.lock().expect("feed state lock poisoned");
        if state.view == ViewMode::All {
            state.posts.insert(0, post);
        }
    }

    /// Drop a post from the list, preserving the order of the rest. Used when
    /// a post is unliked while the liked view is showing.
    pub fn on_post_removed(&self, post_id: PostId) {
        let mut state = self.state.lock().expect("feed state lock poisoned");
        state.posts.retain(|post| post.id != post_id);
    }

    /// Validate a draft locally, create it server-side, and merge it into the
    /// feed. Validation and request errors go back to the caller for a
    /// form-level indicator; they are not feed error state.
    pub async fn create_post(&self, draft: PostDraft) -> Result<Post, ClientError> {
        if !self.session.is_authenticated() {
            return Err(ClientError::AuthenticationRequired);
        }
        draft.validate()?;
        let post = self.api.create_post(&draft).await?;
        self.on_post_created(post.clone());
        Ok(post)
    }

    /// Delete a post server-side, then drop it from the list. The list is
    /// untouched when the delete fails.
    pub async fn remove_post(&self, post_id: PostId) -> Result<(), ClientError> {
        if !self.session.is_authenticated() {
            return Err(ClientError::AuthenticationRequired);
        }
        self.api.delete_post(post_id).await?;
        self.on_post_removed(post_id);
        Ok(())
    }

    /// Current view state for rendering.
    pub fn snapshot(&self) -> FeedSnapshot {
        let state = self.state.lock().expect("feed state lock poisoned");
        FeedSnapshot {
            view: state.view,
            posts: state.posts.clone(),
            page: state.page,
            has_more: state.has_more,
            phase: state.phase.clone(),
        }
    }

    /// React to identity changes until the session is dropped. A sign-out
    /// invalidates the liked view, so its accumulated pages are discarded;
    /// the all view keeps whatever is loaded.
    pub async fn watch_session(self: Arc<Self>) {
        use tokio::sync::broadcast::error::RecvError;

        let mut events = self.session.subscribe();
        loop {
            let discard = match events.recv().await {
                Ok(SessionEvent::SignedOut) => true,
                Ok(SessionEvent::SignedIn { .. }) => false,
                // After a lag the session may have signed out unseen.
                Err(RecvError::Lagged(_)) => !self.session.is_authenticated(),
                Err(RecvError::Closed) => break,
            };
            if discard {
                let mut state = self.state.lock().expect("feed state lock poisoned");
                if state.view == ViewMode::Liked {
                    state.reset(ViewMode::Liked);
                }
            }
        }
    }

    async fn fetch(&self, view: ViewMode, page: u32) -> Result<PostPage, ClientError> {
        match view {
            ViewMode::All => self.api.list_posts(page, self.page_size).await,
            ViewMode::Liked => self.api.liked_posts(page, self.page_size).await,
        }
    }
}
