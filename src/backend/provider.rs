use async_trait::async_trait;
use thiserror::Error;

use crate::core::model::{FeedQuery, NotificationIntent, Post};

/// Errors that can occur while talking to the hosted backend.
/// Variants carry enough info to determine retryability.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Backend misconfigured (missing key, bad URL). Not retryable.
    #[error("config error: {0}")]
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused). Retryable.
    #[error("network error: {0}")]
    Network(String),
    /// Backend returned an error response. Retryable if status >= 500 or 429.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
    /// Failed to parse the backend's response. Not retryable.
    #[error("parse error: {0}")]
    Parse(String),
}

impl BackendError {
    pub fn is_retryable(&self) -> bool {
        match self {
            BackendError::Network(_) => true,
            BackendError::Api { status, .. } => *status >= 500 || *status == 429,
            BackendError::Config(_) | BackendError::Parse(_) => false,
        }
    }
}

/// Data-access interface to the hosted backend.
///
/// Fetches feed snapshots and persists the writes derived from local
/// mutations. Implementations are passed around explicitly; nothing in the
/// crate reaches for a global client.
#[async_trait]
pub trait FeedBackend: Send + Sync {
    /// Returns the name of the backend.
    fn name(&self) -> &str;

    /// Fetch one feed, newest first, already normalised for `query.viewer_id`.
    async fn fetch_feed(&self, query: &FeedQuery) -> Result<Vec<Post>, BackendError>;

    /// Record (`liked = true`) or remove the viewer's like. Idempotent.
    async fn set_like(&self, post_id: &str, user_id: &str, liked: bool)
    -> Result<(), BackendError>;

    /// Save or unsave a post for the viewer.
    async fn set_saved(&self, post_id: &str, user_id: &str, saved: bool)
    -> Result<(), BackendError>;

    async fn insert_comment(
        &self,
        post_id: &str,
        user_id: &str,
        content: &str,
    ) -> Result<(), BackendError>;

    async fn insert_notification(&self, intent: &NotificationIntent) -> Result<(), BackendError>;

    /// Delete only the notification matching the intent's kind, post and actor.
    async fn retract_notification(&self, intent: &NotificationIntent)
    -> Result<(), BackendError>;
}
