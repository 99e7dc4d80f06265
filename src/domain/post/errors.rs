use thiserror::Error;

/// Failures surfaced by the client core.
///
/// The feed pager stores these as view-level error state; the like reconciler
/// rolls back first and then reports the cause through its toggle outcome.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("authentication required")]
    AuthenticationRequired,
    #[error("network failure: {0}")]
    Network(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            tracing::warn!(reqwest_timeout = %err);
            ClientError::Network("request timeout".into())
        } else if err.is_connect() {
            tracing::warn!(reqwest_connect = %err);
            ClientError::Network("connection failed".into())
        } else if err.is_decode() {
            tracing::error!(reqwest_decode = %err);
            ClientError::Network("malformed response body".into())
        } else {
            tracing::warn!(reqwest_error = %err);
            ClientError::Network(err.to_string())
        }
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(err: validator::ValidationErrors) -> Self {
        ClientError::Validation(err.to_string())
    }
}
