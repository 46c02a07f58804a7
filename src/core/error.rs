//! # Feed Errors
//!
//! Errors raised by the feed core. Both kinds are local and recoverable:
//! every operation validates before it mutates, so the store is still usable
//! after any failed call.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// Malformed input (zero column count, blank comment, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The referenced post id is not in the store.
    #[error("post not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, FeedError>;
