//! # Feed Model
//!
//! Plain data records shared by the store, the layout engine, the backend and
//! the TUI. Nothing here performs I/O.
//!
//! ```text
//! Post
//! ├── id, author_* fields
//! ├── text_content / media_url / media_kind / emotion
//! ├── like_count + is_liked_by_viewer      (viewer's like is included in the count)
//! ├── is_bookmarked_by_viewer
//! └── comments: Vec<Comment>               (submission order, oldest first)
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Opaque post identity. Remote ids may be numeric; they are kept as strings.
pub type PostId = String;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    #[default]
    None,
}

impl MediaKind {
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::None => "none",
        }
    }
}

/// Emotion tag a post can carry. Explore can be filtered by one of these.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Apology,
    Appreciation,
    Gratitude,
    Love,
    Mindfulness,
    Thankful,
}

impl Emotion {
    /// All emotions in picker order (keys 1-6).
    pub const ALL: [Emotion; 6] = [
        Emotion::Apology,
        Emotion::Appreciation,
        Emotion::Gratitude,
        Emotion::Love,
        Emotion::Mindfulness,
        Emotion::Thankful,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Apology => "apology",
            Emotion::Appreciation => "appreciation",
            Emotion::Gratitude => "gratitude",
            Emotion::Love => "love",
            Emotion::Mindfulness => "mindfulness",
            Emotion::Thankful => "thankful",
        }
    }

    /// Picker slot for a digit key, `'1'..='6'`.
    pub fn from_digit(c: char) -> Option<Emotion> {
        let idx = c.to_digit(10)? as usize;
        idx.checked_sub(1).and_then(|i| Emotion::ALL.get(i).copied())
    }

    pub fn parse(s: &str) -> Option<Emotion> {
        Emotion::ALL.into_iter().find(|e| e.as_str() == s)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub author_handle: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub author_id: String,
    pub author_name: String,
    pub author_handle: String,
    pub author_avatar_url: Option<String>,
    pub text_content: Option<String>,
    pub media_url: Option<String>,
    pub media_kind: MediaKind,
    pub emotion: Option<Emotion>,
    pub created_at: DateTime<Utc>,
    pub like_count: u32,
    pub is_liked_by_viewer: bool,
    pub is_bookmarked_by_viewer: bool,
    pub comments: Vec<Comment>,
}

impl Post {
    /// True when the post has non-blank text.
    pub fn has_text(&self) -> bool {
        self.text_content
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }

    pub fn has_media(&self) -> bool {
        self.media_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// The signed-in user performing actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub id: String,
    pub handle: String,
}

/// Which feed the client is looking at.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FeedView {
    /// Followed accounts plus the viewer's own posts.
    #[default]
    Home,
    /// Everything with public visibility, rendered as a masonry grid.
    Explore,
}

impl FeedView {
    pub fn toggled(self) -> Self {
        match self {
            FeedView::Home => FeedView::Explore,
            FeedView::Explore => FeedView::Home,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FeedView::Home => "Home",
            FeedView::Explore => "Explore",
        }
    }
}

/// Everything the backend needs to fetch one feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub view: FeedView,
    pub viewer_id: String,
    /// Only honoured for `FeedView::Explore`.
    pub emotion: Option<Emotion>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Like,
    Comment,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Like => "like",
            NotificationKind::Comment => "comment",
        }
    }
}

/// A notification that should be persisted remotely. Returned by store
/// mutations instead of being sent directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationIntent {
    pub kind: NotificationKind,
    /// Author of the post.
    pub recipient: String,
    /// Viewer who liked or commented.
    pub actor: String,
    pub post_id: PostId,
}

/// One remote persistence call derived from a local mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteWrite {
    InsertLike { post_id: PostId, user_id: String },
    DeleteLike { post_id: PostId, user_id: String },
    InsertSave { post_id: PostId, user_id: String },
    DeleteSave { post_id: PostId, user_id: String },
    InsertComment { post_id: PostId, user_id: String, content: String },
    InsertNotification(NotificationIntent),
    /// Removes exactly the notification matching kind, post and actor.
    RetractNotification(NotificationIntent),
}
