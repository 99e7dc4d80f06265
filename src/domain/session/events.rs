use super::entity::CurrentUser;

/// Identity-change notifications published by [`super::entity::Session`].
#[derive(Debug, Clone)]
pub enum SessionEvent {
    SignedIn { user: CurrentUser },
    SignedOut,
}
