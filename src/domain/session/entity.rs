use super::events::SessionEvent;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use tokio::sync::broadcast;

/// The authenticated user as returned by the backend's auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
}

/// Injected authentication collaborator.
///
/// Holds the current identity and bearer token, and publishes identity
/// changes on a broadcast channel so the like reconciler and feed pager can
/// react without holding references to each other. Token persistence across
/// restarts is the host's concern.
pub struct Session {
    inner: RwLock<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

#[derive(Default)]
struct SessionState {
    user: Option<CurrentUser>,
    token: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            inner: RwLock::new(SessionState::default()),
            events,
        }
    }

    /// Install an identity and token, publishing `SignedIn`. Also used for a
    /// user switch: the new identity simply replaces the old one.
    pub fn authenticate(&self, user: CurrentUser, token: impl Into<String>) {
        {
            let mut state = self.inner.write().expect("session lock poisoned");
            state.user = Some(user.clone());
            state.token = Some(token.into());
        }
        let _ = self.events.send(SessionEvent::SignedIn { user });
    }

    /// Drop the identity and token, publishing `SignedOut`.
    pub fn sign_out(&self) {
        {
            let mut state = self.inner.write().expect("session lock poisoned");
            state.user = None;
            state.token = None;
        }
        let _ = self.events.send(SessionEvent::SignedOut);
    }

    /// A session counts as authenticated only with both an identity and a token.
    pub fn is_authenticated(&self) -> bool {
        let state = self.inner.read().expect("session lock poisoned");
        state.user.is_some() && state.token.is_some()
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.inner
            .read()
            .expect("session lock poisoned")
            .user
            .clone()
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.inner
            .read()
            .expect("session lock poisoned")
            .token
            .clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
