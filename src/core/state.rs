//! # Application State
//!
//! Core business state for FeelTok. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── backend: Arc<dyn FeedBackend>   // remote data access
//! ├── viewer: Viewer                  // signed-in user
//! ├── store: FeedStateStore           // posts of the current view
//! ├── layout: FeedLayoutEngine        // explore masonry
//! ├── view: FeedView                  // home or explore
//! ├── emotion_filter: Option<Emotion> // explore filter
//! ├── column_count: usize             // explore columns
//! ├── retract_like_notifications      // unlike policy
//! ├── status_message: String          // status bar text
//! ├── is_loading: bool                // fetch in flight
//! └── error: Option<String>           // last failure
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::sync::Arc;

use crate::backend::FeedBackend;
use crate::core::config::ResolvedConfig;
use crate::core::error::Result;
use crate::core::layout::{DEFAULT_COLUMN_COUNT, FeedLayoutEngine};
use crate::core::model::{Emotion, FeedQuery, FeedView, Post, Viewer};
use crate::core::store::FeedStateStore;

pub struct App {
    pub backend: Arc<dyn FeedBackend>,
    pub viewer: Viewer,
    pub store: FeedStateStore,
    pub layout: FeedLayoutEngine,
    pub view: FeedView,
    pub emotion_filter: Option<Emotion>,
    pub column_count: usize,
    /// Unliking also deletes the viewer's own like notification.
    pub retract_like_notifications: bool,
    pub status_message: String,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl App {
    pub fn new(backend: Arc<dyn FeedBackend>, viewer: Viewer) -> Self {
        Self {
            backend,
            viewer,
            store: FeedStateStore::new(),
            layout: FeedLayoutEngine::new(),
            view: FeedView::default(),
            emotion_filter: None,
            column_count: DEFAULT_COLUMN_COUNT,
            retract_like_notifications: true,
            status_message: String::from("Welcome to FeelTok!"),
            is_loading: false,
            error: None,
        }
    }

    /// Creates an App from a fully resolved config.
    pub fn from_config(backend: Arc<dyn FeedBackend>, config: &ResolvedConfig) -> Self {
        let mut app = Self::new(backend, config.viewer.clone());
        app.layout = FeedLayoutEngine::with_estimator(config.card_heights);
        app.view = config.view;
        app.column_count = config.column_count;
        app.retract_like_notifications = config.retract_like_notifications;
        app
    }

    /// The query for whatever the viewer is currently looking at.
    pub fn feed_query(&self) -> FeedQuery {
        FeedQuery {
            view: self.view,
            viewer_id: self.viewer.id.clone(),
            emotion: match self.view {
                FeedView::Explore => self.emotion_filter,
                FeedView::Home => None,
            },
        }
    }

    /// Current posts split into explore columns.
    pub fn columns(&self) -> Result<Vec<Vec<Post>>> {
        let posts = self.store.list();
        let columns = self.layout.distribute(&posts, self.column_count)?;
        Ok(columns
            .into_iter()
            .map(|col| col.into_iter().cloned().collect())
            .collect())
    }
}
