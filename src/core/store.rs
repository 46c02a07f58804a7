//! # Feed State Store
//!
//! The authoritative local view of the feed. Holds posts by id plus a
//! separate display order, and applies optimistic mutations synchronously.
//!
//! ```text
//! FeedStateStore
//! ├── posts: HashMap<PostId, Post>   // entity map
//! └── order: Vec<PostId>             // display order, same key set as `posts`
//! ```
//!
//! Mutations never talk to the network. Each one returns what changed so the
//! caller can issue the matching remote write. If that write fails, nothing is
//! rolled back here; the caller re-fetches and calls [`FeedStateStore::replace_all`].
//!
//! There is no internal locking. All calls are expected to come from a single
//! logical caller (the UI thread).

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::Utc;
use log::{debug, warn};

use crate::core::error::{FeedError, Result};
use crate::core::model::{Comment, NotificationIntent, NotificationKind, Post, PostId};

/// Outcome of [`FeedStateStore::toggle_like`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeToggle {
    pub previous_liked: bool,
    pub new_liked: bool,
    pub new_count: u32,
    /// Only present on an unliked → liked transition.
    pub notification: Option<NotificationIntent>,
}

/// Outcome of [`FeedStateStore::toggle_bookmark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookmarkToggle {
    pub previous_bookmarked: bool,
    pub new_bookmarked: bool,
}

/// Outcome of [`FeedStateStore::add_comment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentAdded {
    pub comment: Comment,
    pub notification: NotificationIntent,
}

#[derive(Debug, Default)]
pub struct FeedStateStore {
    posts: HashMap<PostId, Post>,
    order: Vec<PostId>,
}

impl FeedStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard everything and rebuild from `posts`, keeping their order.
    ///
    /// This is the only operation that changes which posts exist or their
    /// order. A repeated id keeps its first position and value.
    pub fn replace_all(&mut self, posts: impl IntoIterator<Item = Post>) {
        self.posts.clear();
        self.order.clear();

        for post in posts {
            match self.posts.entry(post.id.clone()) {
                Entry::Occupied(_) => {
                    warn!("Dropping duplicate post id {} from feed refresh", post.id);
                }
                Entry::Vacant(slot) => {
                    self.order.push(post.id.clone());
                    slot.insert(post);
                }
            }
        }

        debug!("Feed replaced: {} posts", self.order.len());
    }

    /// Flip the viewer's like on a post and adjust the count by one.
    ///
    /// The count never drops below zero, even if the local flag and count
    /// have drifted apart; the flag still flips in that case.
    pub fn toggle_like(&mut self, post_id: &str, viewer_id: &str) -> Result<LikeToggle> {
        let post = self.post_mut(post_id)?;

        let previous_liked = post.is_liked_by_viewer;
        let new_liked = !previous_liked;

        if new_liked {
            post.like_count = post.like_count.saturating_add(1);
        } else if post.like_count == 0 {
            warn!(
                "Like count for post {} already 0 while unliking; clamping",
                post_id
            );
        } else {
            post.like_count -= 1;
        }
        post.is_liked_by_viewer = new_liked;

        let notification = new_liked.then(|| NotificationIntent {
            kind: NotificationKind::Like,
            recipient: post.author_id.clone(),
            actor: viewer_id.to_string(),
            post_id: post.id.clone(),
        });

        debug!(
            "Like toggled on {}: {} -> {} (count {})",
            post_id, previous_liked, new_liked, post.like_count
        );

        Ok(LikeToggle {
            previous_liked,
            new_liked,
            new_count: post.like_count,
            notification,
        })
    }

    pub fn toggle_bookmark(&mut self, post_id: &str) -> Result<BookmarkToggle> {
        let post = self.post_mut(post_id)?;
        let previous_bookmarked = post.is_bookmarked_by_viewer;
        post.is_bookmarked_by_viewer = !previous_bookmarked;

        debug!(
            "Bookmark toggled on {}: {} -> {}",
            post_id, previous_bookmarked, post.is_bookmarked_by_viewer
        );

        Ok(BookmarkToggle {
            previous_bookmarked,
            new_bookmarked: post.is_bookmarked_by_viewer,
        })
    }

    /// Append a comment (most recent last) and produce the comment
    /// notification for the post's author.
    ///
    /// Blank content is rejected before anything is touched. The stored
    /// content is trimmed.
    pub fn add_comment(
        &mut self,
        post_id: &str,
        viewer_id: &str,
        author_handle: &str,
        content: &str,
    ) -> Result<CommentAdded> {
        let content = content.trim();
        if content.is_empty() {
            return Err(FeedError::InvalidArgument(
                "comment content must not be empty".to_string(),
            ));
        }

        let post = self.post_mut(post_id)?;
        let comment = Comment {
            author_handle: author_handle.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };
        post.comments.push(comment.clone());

        debug!(
            "Comment added to {} by @{} ({} total)",
            post_id,
            author_handle,
            post.comments.len()
        );

        Ok(CommentAdded {
            comment,
            notification: NotificationIntent {
                kind: NotificationKind::Comment,
                recipient: post.author_id.clone(),
                actor: viewer_id.to_string(),
                post_id: post.id.clone(),
            },
        })
    }

    pub fn get(&self, post_id: &str) -> Result<&Post> {
        self.posts
            .get(post_id)
            .ok_or_else(|| FeedError::NotFound(post_id.to_string()))
    }

    /// Snapshot of the feed in display order. Later mutations do not affect
    /// the returned vector.
    pub fn list(&self) -> Vec<Post> {
        self.order
            .iter()
            .filter_map(|id| self.posts.get(id))
            .cloned()
            .collect()
    }

    /// Post id at a display position.
    pub fn id_at(&self, index: usize) -> Option<&PostId> {
        self.order.get(index)
    }

    pub fn position(&self, post_id: &str) -> Option<usize> {
        self.order.iter().position(|id| id == post_id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn post_mut(&mut self, post_id: &str) -> Result<&mut Post> {
        self.posts
            .get_mut(post_id)
            .ok_or_else(|| FeedError::NotFound(post_id.to_string()))
    }
}
