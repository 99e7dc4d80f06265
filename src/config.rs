//! Client configuration loading from environment variables.
//!
//! Configuration is read from the environment via standard `std::env::var`,
//! with `.env` files supported through `dotenvy` in the host.
//!
//! # Environment Variables
//!
//! ## Required Variables
//! - `POSTS_API_BASE_URL`: Base URL of the posting backend (e.g. `http://localhost:3001`)
//!
//! ## Optional Variables
//! - `POSTS_PAGE_SIZE`: Posts fetched per feed page (default: 10)
//! - `POSTS_LIKED_SYNC_LIMIT`: Liked-post IDs fetched in one bulk sync (default: 1000)
//! - `POSTS_REQUEST_TIMEOUT_SECS`: Per-request HTTP timeout (default: 30)

/// Client configuration for the posting backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend, without a trailing slash
    pub base_url: String,

    /// Posts requested per feed page
    pub page_size: u32,

    /// Upper bound on the bulk liked-posts sync; the liked set is assumed to
    /// fit in a single call
    pub liked_sync_limit: u32,

    /// Per-request timeout in seconds for the HTTP client
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    /// Configuration with defaults for everything but the base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            page_size: 10,
            liked_sync_limit: 1000,
            request_timeout_secs: 30,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `POSTS_API_BASE_URL` is missing or an optional
    /// variable is set but cannot be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            base_url: env_required("POSTS_API_BASE_URL")?,
            page_size: env_or("POSTS_PAGE_SIZE", 10)?,
            liked_sync_limit: env_or("POSTS_LIKED_SYNC_LIMIT", 1000)?,
            request_timeout_secs: env_or("POSTS_REQUEST_TIMEOUT_SECS", 30)?,
        })
    }
}

/// Load a required environment variable.
fn env_required(key: &str) -> anyhow::Result<String> {
    std::env::var(key).map_err(|_| anyhow::anyhow!("Missing required environment variable: {}", key))
}

/// Load an environment variable with a default value.
///
/// Returns the parsed environment variable if set, otherwise returns the default.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}
