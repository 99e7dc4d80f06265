use crate::domain::post::errors::ClientError;

/// Local view of one post's like state: membership for the current user plus
/// the cached counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeStatus {
    pub is_liked: bool,
    pub likes_count: u32,
}

/// Result of a like toggle.
///
/// A failed toggle is not an error from the state's point of view: the
/// reconciler has already restored the pre-toggle snapshot, and hands the
/// caller both that snapshot and the cause so the UI can flash a transient
/// indicator.
#[derive(Debug)]
pub enum ToggleOutcome {
    /// The server confirmed; local state now holds the authoritative values.
    Toggled(LikeStatus),
    /// The request failed; local state was rolled back to the snapshot.
    Failed {
        rolled_back_to: LikeStatus,
        cause: ClientError,
    },
}

impl ToggleOutcome {
    /// The like state as it stands after the operation, whichever way it went.
    pub fn status(&self) -> LikeStatus {
        match self {
            ToggleOutcome::Toggled(status) => *status,
            ToggleOutcome::Failed { rolled_back_to, .. } => *rolled_back_to,
        }
    }
}
