use super::dto::{LikeStatus, ToggleOutcome};
use crate::config::ClientConfig;
use crate::domain::post::entity::{Post, PostId};
use crate::domain::post::errors::ClientError;
use crate::domain::session::entity::Session;
use crate::domain::session::events::SessionEvent;
use crate::infrastructure::api::traits::PostsApi;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct LikeState {
    liked: HashSet<PostId>,
    counts: HashMap<PostId, u32>,
}

/// Keeps a locally-accurate view of "does the current user like post X" and
/// "how many likes does post X have" while the authoritative values live
/// server-side.
///
/// All mutation happens through the operations below. The internal lock is
/// never held across a network await, so other events (including a second
/// toggle on the same post) interleave at every suspension point exactly as
/// they would in the browser. Per-post toggles are deliberately not
/// serialized; callers are expected to disable the triggering control while a
/// toggle for that post is outstanding.
pub struct LikeReconciler {
    api: Arc<dyn PostsApi>,
    session: Arc<Session>,
    state: Mutex<LikeState>,
    liked_sync_limit: u32,
}

impl LikeReconciler {
    pub fn new(api: Arc<dyn PostsApi>, session: Arc<Session>, config: &ClientConfig) -> Self {
        Self {
            api,
            session,
            state: Mutex::new(LikeState::default()),
            liked_sync_limit: config.liked_sync_limit,
        }
    }

    /// Seed counters for posts observed in a feed page.
    ///
    /// Only IDs not already tracked are inserted: a count that is mid-toggle
    /// must not be clobbered by a stale value from a freshly fetched page.
    pub fn initialize(&self, posts: &[Post]) {
        let mut state = self.state.lock().expect("like state lock poisoned");
        for post in posts {
            state.counts.entry(post.id).or_insert(post.likes_count);
        }
    }

    /// Replace the liked set wholesale with the server's answer.
    ///
    /// Unauthenticated sessions get an empty set. Fetch failures also fall
    /// back to an empty set: under-reporting likes beats crashing the view.
    pub async fn sync_from_server(&self) {
        if !self.session.is_authenticated() {
            self.state
                .lock()
                .expect("like state lock poisoned")
                .liked
                .clear();
            return;
        }

        match self.api.liked_posts(1, self.liked_sync_limit).await {
            Ok(page) => {
                self.initialize(&page.posts);
                let ids: HashSet<PostId> = page.posts.iter().map(|post| post.id).collect();
                tracing::debug!(liked = ids.len(), "liked set synced");
                self.state.lock().expect("like state lock poisoned").liked = ids;
            }
            Err(err) => {
                tracing::warn!(error = %err, "liked set sync failed, falling back to empty");
                self.state
                    .lock()
                    .expect("like state lock poisoned")
                    .liked
                    .clear();
            }
        }
    }

    pub fn is_liked(&self, post_id: PostId) -> bool {
        self.state
            .lock()
            .expect("like state lock poisoned")
            .liked
            .contains(&post_id)
    }

    /// Cached like count, 0 for posts never observed.
    pub fn likes_count(&self, post_id: PostId) -> u32 {
        self.state
            .lock()
            .expect("like state lock poisoned")
            .counts
            .get(&post_id)
            .copied()
            .unwrap_or(0)
    }

    /// Flip the like for a post: optimistic local update, server call, then
    /// reconcile on success or roll back to the pre-call snapshot on failure.
    ///
    /// Membership and count move as a pair in every branch. The only `Err`
    /// is the authentication gate, raised before any mutation.
    pub async fn toggle(&self, post_id: PostId) -> Result<ToggleOutcome, ClientError> {
        if !self.session.is_authenticated() {
            return Err(ClientError::AuthenticationRequired);
        }

        let (snapshot, optimistic) = {
            let mut state = self.state.lock().expect("like state lock poisoned");
            let snapshot = LikeStatus {
                is_liked: state.liked.contains(&post_id),
                likes_count: state.counts.get(&post_id).copied().unwrap_or(0),
            };
            let optimistic = LikeStatus {
                is_liked: !snapshot.is_liked,
                likes_count: if snapshot.is_liked {
                    snapshot.likes_count.saturating_sub(1)
                } else {
                    snapshot.likes_count + 1
                },
            };
            apply(&mut state, post_id, optimistic);
            (snapshot, optimistic)
        };

        match self.api.toggle_like(post_id).await {
            Ok(response) => {
                // Server truth wins, correcting any drift from concurrent
                // toggles elsewhere (another tab, another device). When the
                // response omits the count, the optimistic value stands if the
                // server confirmed the flip; otherwise the snapshot count is
                // the best estimate.
                let confirmed = LikeStatus {
                    is_liked: response.is_liked,
                    likes_count: response.likes_count.unwrap_or(
                        if response.is_liked == optimistic.is_liked {
                            optimistic.likes_count
                        } else {
                            snapshot.likes_count
                        },
                    ),
                };
                let mut state = self.state.lock().expect("like state lock poisoned");
                apply(&mut state, post_id, confirmed);
                Ok(ToggleOutcome::Toggled(confirmed))
            }
            Err(cause) => {
                tracing::warn!(post_id, error = %cause, "toggle failed, rolling back");
                let mut state = self.state.lock().expect("like state lock poisoned");
                apply(&mut state, post_id, snapshot);
                Ok(ToggleOutcome::Failed {
                    rolled_back_to: snapshot,
                    cause,
                })
            }
        }
    }

    /// Remove every like server-side, then mirror that locally: empty the set
    /// and decrement each formerly-liked post's counter. Returns how many
    /// likes the server deleted.
    pub async fn unlike_all(&self) -> Result<u64, ClientError> {
        if !self.session.is_authenticated() {
            return Err(ClientError::AuthenticationRequired);
        }

        let deleted = self.api.clear_likes().await?;
        let mut state = self.state.lock().expect("like state lock poisoned");
        let formerly_liked: Vec<PostId> = state.liked.drain().collect();
        for post_id in formerly_liked {
            if let Some(count) = state.counts.get_mut(&post_id) {
                *count = count.saturating_sub(1);
            }
        }
        Ok(deleted)
    }

    /// Reset both maps. Invoked on sign-out.
    pub fn clear(&self) {
        let mut state = self.state.lock().expect("like state lock poisoned");
        state.liked.clear();
        state.counts.clear();
    }

    /// React to identity changes until the session is dropped. Spawn this the
    /// way a background worker is started:
    ///
    /// ```ignore
    /// tokio::spawn(reconciler.clone().watch_session());
    /// ```
    pub async fn watch_session(self: Arc<Self>) {
        use tokio::sync::broadcast::error::RecvError;

        let mut events = self.session.subscribe();
        loop {
            match events.recv().await {
                Ok(SessionEvent::SignedIn { .. }) => self.sync_from_server().await,
                Ok(SessionEvent::SignedOut) => self.clear(),
                // A lagged receiver missed intermediate transitions; the next
                // event still carries the current identity, so resync.
                Err(RecvError::Lagged(_)) => self.sync_from_server().await,
                Err(RecvError::Closed) => break,
            }
        }
    }
}

fn apply(state: &mut LikeState, post_id: PostId, status: LikeStatus) {
    if status.is_liked {
        state.liked.insert(post_id);
    } else {
        state.liked.remove(&post_id);
    }
    state.counts.insert(post_id, status.likes_count);
}
