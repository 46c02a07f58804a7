//! # Backend
//!
//! Everything that talks to the hosted database. The core never calls in
//! here directly; the TUI spawns tasks that fetch feeds and execute the
//! [`RemoteWrite`]s returned by the reducer.
//!
//! ```text
//! core::update() ──Effect::Persist(writes)──► execute_writes(backend, writes)
//!                ──Effect::FetchFeed(query)──► backend.fetch_feed(query)
//! ```

pub mod provider;
pub mod rest;
pub mod rows;

pub use provider::{BackendError, FeedBackend};
pub use rest::RestBackend;

use log::{debug, warn};

use crate::core::model::RemoteWrite;

/// Perform `writes` in order, stopping at the first failure.
///
/// Writes already sent are not undone; the caller re-fetches instead.
pub async fn execute_writes(
    backend: &dyn FeedBackend,
    writes: &[RemoteWrite],
) -> Result<(), BackendError> {
    for (i, write) in writes.iter().enumerate() {
        debug!("Executing remote write {}/{}: {:?}", i + 1, writes.len(), write);
        let result = match write {
            RemoteWrite::InsertLike { post_id, user_id } => {
                backend.set_like(post_id, user_id, true).await
            }
            RemoteWrite::DeleteLike { post_id, user_id } => {
                backend.set_like(post_id, user_id, false).await
            }
            RemoteWrite::InsertSave { post_id, user_id } => {
                backend.set_saved(post_id, user_id, true).await
            }
            RemoteWrite::DeleteSave { post_id, user_id } => {
                backend.set_saved(post_id, user_id, false).await
            }
            RemoteWrite::InsertComment {
                post_id,
                user_id,
                content,
            } => backend.insert_comment(post_id, user_id, content).await,
            RemoteWrite::InsertNotification(intent) => backend.insert_notification(intent).await,
            RemoteWrite::RetractNotification(intent) => {
                backend.retract_notification(intent).await
            }
        };

        if let Err(e) = result {
            warn!(
                "Remote write {}/{} failed on {}: {}",
                i + 1,
                writes.len(),
                backend.name(),
                e
            );
            return Err(e);
        }
    }
    Ok(())
}
