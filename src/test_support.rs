//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::backend::{BackendError, FeedBackend};
use crate::core::model::{FeedQuery, MediaKind, NotificationIntent, Post, Viewer};

/// A bare post: no text, no media, no likes, authored by `author`.
pub fn post(id: &str) -> Post {
    post_by(id, "author")
}

pub fn post_by(id: &str, author_id: &str) -> Post {
    Post {
        id: id.to_string(),
        author_id: author_id.to_string(),
        author_name: format!("User {author_id}"),
        author_handle: author_id.to_string(),
        author_avatar_url: None,
        text_content: None,
        media_url: None,
        media_kind: MediaKind::None,
        emotion: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        like_count: 0,
        is_liked_by_viewer: false,
        is_bookmarked_by_viewer: false,
        comments: Vec::new(),
    }
}

pub fn post_with(id: &str, text: Option<&str>, media: Option<&str>) -> Post {
    let mut post = post(id);
    post.text_content = text.map(str::to_string);
    post.media_url = media.map(str::to_string);
    post.media_kind = match media {
        Some(url) if url.contains("postVideos") => MediaKind::Video,
        Some(_) => MediaKind::Image,
        None => MediaKind::None,
    };
    post
}

pub fn viewer() -> Viewer {
    Viewer {
        id: "viewer".to_string(),
        handle: "me".to_string(),
    }
}

/// A no-op backend for tests that don't need real API calls.
pub struct NoopBackend;

#[async_trait]
impl FeedBackend for NoopBackend {
    fn name(&self) -> &str {
        "noop"
    }

    async fn fetch_feed(&self, _query: &FeedQuery) -> Result<Vec<Post>, BackendError> {
        Ok(Vec::new())
    }

    async fn set_like(&self, _: &str, _: &str, _: bool) -> Result<(), BackendError> {
        Ok(())
    }

    async fn set_saved(&self, _: &str, _: &str, _: bool) -> Result<(), BackendError> {
        Ok(())
    }

    async fn insert_comment(&self, _: &str, _: &str, _: &str) -> Result<(), BackendError> {
        Ok(())
    }

    async fn insert_notification(&self, _: &NotificationIntent) -> Result<(), BackendError> {
        Ok(())
    }

    async fn retract_notification(&self, _: &NotificationIntent) -> Result<(), BackendError> {
        Ok(())
    }
}

/// Records every call as a short string; optionally fails one of them.
#[derive(Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

impl RecordingBackend {
    pub fn failing_on(call: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(call.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), BackendError> {
        let fail = self.fail_on.as_deref() == Some(call.as_str());
        self.calls.lock().unwrap().push(call);
        if fail {
            Err(BackendError::Api {
                status: 500,
                message: "boom".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl FeedBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    async fn fetch_feed(&self, query: &FeedQuery) -> Result<Vec<Post>, BackendError> {
        self.record(format!("fetch {}", query.view.label()))?;
        Ok(Vec::new())
    }

    async fn set_like(&self, post_id: &str, user_id: &str, liked: bool) -> Result<(), BackendError> {
        self.record(format!("like {post_id} {user_id} {liked}"))
    }

    async fn set_saved(&self, post_id: &str, user_id: &str, saved: bool) -> Result<(), BackendError> {
        self.record(format!("saved {post_id} {user_id} {saved}"))
    }

    async fn insert_comment(
        &self,
        post_id: &str,
        user_id: &str,
        content: &str,
    ) -> Result<(), BackendError> {
        self.record(format!("comment {post_id} {user_id} {content}"))
    }

    async fn insert_notification(&self, intent: &NotificationIntent) -> Result<(), BackendError> {
        self.record(format!(
            "notify {} {} {} {}",
            intent.kind.as_str(),
            intent.post_id,
            intent.recipient,
            intent.actor
        ))
    }

    async fn retract_notification(&self, intent: &NotificationIntent) -> Result<(), BackendError> {
        self.record(format!(
            "retract {} {} {}",
            intent.kind.as_str(),
            intent.post_id,
            intent.actor
        ))
    }
}

/// Creates a test App with a NoopBackend.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(Arc::new(NoopBackend), viewer())
}

/// Test App already seeded with `posts`.
pub fn test_app_with(posts: Vec<Post>) -> crate::core::state::App {
    let mut app = test_app();
    app.store.replace_all(posts);
    app
}
