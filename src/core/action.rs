//! # Actions
//!
//! Everything that can happen in FeelTok becomes an `Action`.
//! User presses `l`? That's `Action::ToggleLike(post_id)`.
//! Backend answers? That's `Action::FeedLoaded { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state and returns an [`Effect`] describing the I/O the caller should
//! perform. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Local mutations are optimistic: the store changes first and the matching
//! remote writes come back as `Effect::Persist`. A failed write is reported
//! as `Action::RemoteWriteFailed`, which re-fetches rather than rolling back.

use log::{debug, info, warn};

use crate::core::model::{
    Emotion, FeedQuery, FeedView, NotificationIntent, NotificationKind, Post, PostId, RemoteWrite,
};
use crate::core::state::App;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Re-fetch the current feed.
    Refresh,
    /// A fetch finished. Ignored if `query` no longer matches the app.
    FeedLoaded { query: FeedQuery, posts: Vec<Post> },
    /// A fetch failed. Ignored like `FeedLoaded` when `query` is stale.
    FeedFailed { query: FeedQuery, message: String },
    SwitchView(FeedView),
    FilterEmotion(Option<Emotion>),
    ToggleLike(PostId),
    ToggleBookmark(PostId),
    SubmitComment { post_id: PostId, content: String },
    RemoteWriteDone,
    RemoteWriteFailed(String),
    Quit,
}

/// I/O requested by [`update`].
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    FetchFeed(FeedQuery),
    Persist(Vec<RemoteWrite>),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Refresh => fetch(app),
        Action::FeedLoaded { query, posts } => {
            if query != app.feed_query() {
                debug!("Discarding stale feed for {:?}", query);
                return Effect::None;
            }
            app.store.replace_all(posts);
            app.is_loading = false;
            app.error = None;
            app.status_message = format!("{}: {} posts", app.view.label(), app.store.len());
            Effect::None
        }
        Action::FeedFailed { query, message } => {
            if query != app.feed_query() {
                debug!("Discarding stale fetch failure for {:?}: {}", query, message);
                return Effect::None;
            }
            warn!("Feed fetch failed: {}", message);
            app.is_loading = false;
            app.status_message = format!("Could not load feed: {message}");
            app.error = Some(message);
            Effect::None
        }
        Action::SwitchView(view) => {
            if view == app.view {
                return Effect::None;
            }
            info!("Switching view to {}", view.label());
            app.view = view;
            app.store.replace_all(Vec::new());
            fetch(app)
        }
        Action::FilterEmotion(emotion) => {
            if emotion == app.emotion_filter {
                return Effect::None;
            }
            app.emotion_filter = emotion;
            match app.view {
                FeedView::Explore => fetch(app),
                FeedView::Home => {
                    app.status_message = match emotion {
                        Some(e) => format!("Filter '{e}' applies to Explore"),
                        None => "Filter cleared".to_string(),
                    };
                    Effect::None
                }
            }
        }
        Action::ToggleLike(post_id) => toggle_like(app, &post_id),
        Action::ToggleBookmark(post_id) => match app.store.toggle_bookmark(&post_id) {
            Ok(toggle) => {
                let (post_id, user_id) = (post_id, app.viewer.id.clone());
                let write = if toggle.new_bookmarked {
                    app.status_message = "Bookmarked".to_string();
                    RemoteWrite::InsertSave { post_id, user_id }
                } else {
                    app.status_message = "Bookmark removed".to_string();
                    RemoteWrite::DeleteSave { post_id, user_id }
                };
                Effect::Persist(vec![write])
            }
            Err(e) => rejected(app, e),
        },
        Action::SubmitComment { post_id, content } => {
            let viewer = app.viewer.clone();
            match app
                .store
                .add_comment(&post_id, &viewer.id, &viewer.handle, &content)
            {
                Ok(added) => {
                    app.status_message = "Comment posted".to_string();
                    Effect::Persist(vec![
                        RemoteWrite::InsertComment {
                            post_id,
                            user_id: viewer.id,
                            content: added.comment.content,
                        },
                        RemoteWrite::InsertNotification(added.notification),
                    ])
                }
                Err(e) => rejected(app, e),
            }
        }
        Action::RemoteWriteDone => {
            debug!("Remote writes persisted");
            Effect::None
        }
        Action::RemoteWriteFailed(message) => {
            warn!("Remote write failed, re-fetching: {}", message);
            app.error = Some(message.clone());
            let effect = fetch(app);
            app.status_message = format!("Sync failed ({message}); refreshing");
            effect
        }
        Action::Quit => Effect::Quit,
    }
}

fn fetch(app: &mut App) -> Effect {
    app.is_loading = true;
    app.status_message = format!("Loading {}...", app.view.label());
    Effect::FetchFeed(app.feed_query())
}

fn toggle_like(app: &mut App, post_id: &str) -> Effect {
    let viewer_id = app.viewer.id.clone();
    let toggle = match app.store.toggle_like(post_id, &viewer_id) {
        Ok(t) => t,
        Err(e) => return rejected(app, e),
    };

    let mut writes = Vec::with_capacity(2);
    if toggle.new_liked {
        app.status_message = format!("Liked ({})", toggle.new_count);
        writes.push(RemoteWrite::InsertLike {
            post_id: post_id.to_string(),
            user_id: viewer_id,
        });
        writes.extend(toggle.notification.map(RemoteWrite::InsertNotification));
    } else {
        app.status_message = format!("Unliked ({})", toggle.new_count);
        writes.push(RemoteWrite::DeleteLike {
            post_id: post_id.to_string(),
            user_id: viewer_id.clone(),
        });
        if app.retract_like_notifications
            && let Ok(post) = app.store.get(post_id)
        {
            writes.push(RemoteWrite::RetractNotification(NotificationIntent {
                kind: NotificationKind::Like,
                recipient: post.author_id.clone(),
                actor: viewer_id,
                post_id: post.id.clone(),
            }));
        }
    }
    Effect::Persist(writes)
}

/// A store call refused the mutation; state is unchanged.
fn rejected(app: &mut App, error: crate::core::error::FeedError) -> Effect {
    warn!("Mutation rejected: {}", error);
    app.status_message = error.to_string();
    Effect::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{post, post_by, test_app, test_app_with};

    fn liked(id: &str, count: u32) -> Post {
        let mut p = post_by(id, "author");
        p.is_liked_by_viewer = true;
        p.like_count = count;
        p
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }

    #[test]
    fn test_refresh_fetches_current_view() {
        let mut app = test_app();
        let effect = update(&mut app, Action::Refresh);
        assert_eq!(effect, Effect::FetchFeed(app.feed_query()));
        assert!(app.is_loading);
    }

    #[test]
    fn test_feed_loaded_replaces_store() {
        let mut app = test_app_with(vec![post("old")]);
        app.is_loading = true;
        let query = app.feed_query();
        let effect = update(
            &mut app,
            Action::FeedLoaded {
                query,
                posts: vec![post("a"), post("b")],
            },
        );
        assert_eq!(effect, Effect::None);
        assert!(!app.is_loading);
        assert_eq!(app.store.len(), 2);
        assert!(app.store.get("old").is_err());
    }

    #[test]
    fn test_stale_feed_is_ignored() {
        let mut app = test_app_with(vec![post("keep")]);
        let stale = FeedQuery {
            view: FeedView::Explore,
            viewer_id: app.viewer.id.clone(),
            emotion: None,
        };
        update(
            &mut app,
            Action::FeedLoaded {
                query: stale,
                posts: vec![post("x")],
            },
        );
        assert!(app.store.get("keep").is_ok());
    }

    #[test]
    fn test_feed_failed_records_error() {
        let mut app = test_app();
        app.is_loading = true;
        let query = app.feed_query();
        update(
            &mut app,
            Action::FeedFailed {
                query,
                message: "offline".to_string(),
            },
        );
        assert!(!app.is_loading);
        assert_eq!(app.error.as_deref(), Some("offline"));
    }

    #[test]
    fn test_stale_failure_is_ignored() {
        let mut app = test_app();
        update(&mut app, Action::Refresh);
        let home = app.feed_query();
        update(&mut app, Action::SwitchView(FeedView::Explore));

        let effect = update(
            &mut app,
            Action::FeedFailed {
                query: home,
                message: "home: HTTP 500".to_string(),
            },
        );
        assert_eq!(effect, Effect::None);
        assert!(app.is_loading);
        assert_eq!(app.error, None);
        assert_eq!(app.view, FeedView::Explore);
    }

    #[test]
    fn test_switch_view() {
        let mut app = test_app_with(vec![post("a")]);
        assert_eq!(update(&mut app, Action::SwitchView(FeedView::Home)), Effect::None);

        let effect = update(&mut app, Action::SwitchView(FeedView::Explore));
        assert_eq!(app.view, FeedView::Explore);
        assert!(app.store.is_empty());
        assert!(matches!(effect, Effect::FetchFeed(q) if q.view == FeedView::Explore));
    }

    #[test]
    fn test_filter_emotion_refetches_only_on_explore() {
        let mut app = test_app();
        let effect = update(&mut app, Action::FilterEmotion(Some(Emotion::Love)));
        assert_eq!(effect, Effect::None);
        assert_eq!(app.emotion_filter, Some(Emotion::Love));

        app.view = FeedView::Explore;
        let effect = update(&mut app, Action::FilterEmotion(Some(Emotion::Gratitude)));
        assert!(matches!(
            effect,
            Effect::FetchFeed(FeedQuery { emotion: Some(Emotion::Gratitude), .. })
        ));

        let effect = update(&mut app, Action::FilterEmotion(None));
        assert!(matches!(effect, Effect::FetchFeed(FeedQuery { emotion: None, .. })));
    }

    #[test]
    fn test_like_persists_like_and_notification() {
        let mut app = test_app_with(vec![post_by("p1", "u1")]);
        let effect = update(&mut app, Action::ToggleLike("p1".to_string()));
        assert_eq!(
            effect,
            Effect::Persist(vec![
                RemoteWrite::InsertLike {
                    post_id: "p1".to_string(),
                    user_id: "viewer".to_string(),
                },
                RemoteWrite::InsertNotification(NotificationIntent {
                    kind: NotificationKind::Like,
                    recipient: "u1".to_string(),
                    actor: "viewer".to_string(),
                    post_id: "p1".to_string(),
                }),
            ])
        );
        assert_eq!(app.store.get("p1").unwrap().like_count, 1);
    }

    #[test]
    fn test_unlike_retracts_own_notification() {
        let mut app = test_app_with(vec![liked("p1", 5)]);
        let effect = update(&mut app, Action::ToggleLike("p1".to_string()));
        let Effect::Persist(writes) = effect else {
            panic!("expected persist");
        };
        assert_eq!(writes.len(), 2);
        assert!(matches!(&writes[0], RemoteWrite::DeleteLike { post_id, .. } if post_id == "p1"));
        assert!(matches!(
            &writes[1],
            RemoteWrite::RetractNotification(NotificationIntent { kind: NotificationKind::Like, actor, .. })
                if actor == "viewer"
        ));
        assert_eq!(app.store.get("p1").unwrap().like_count, 4);
    }

    #[test]
    fn test_unlike_without_retraction() {
        let mut app = test_app_with(vec![liked("p1", 1)]);
        app.retract_like_notifications = false;
        let effect = update(&mut app, Action::ToggleLike("p1".to_string()));
        assert_eq!(
            effect,
            Effect::Persist(vec![RemoteWrite::DeleteLike {
                post_id: "p1".to_string(),
                user_id: "viewer".to_string(),
            }])
        );
    }

    #[test]
    fn test_like_unknown_post_is_rejected() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::ToggleLike("nope".to_string())), Effect::None);
        assert!(app.status_message.contains("nope"));
    }

    #[test]
    fn test_bookmark_writes_save_rows() {
        let mut app = test_app_with(vec![post("p1")]);
        assert_eq!(
            update(&mut app, Action::ToggleBookmark("p1".to_string())),
            Effect::Persist(vec![RemoteWrite::InsertSave {
                post_id: "p1".to_string(),
                user_id: "viewer".to_string(),
            }])
        );
        assert_eq!(
            update(&mut app, Action::ToggleBookmark("p1".to_string())),
            Effect::Persist(vec![RemoteWrite::DeleteSave {
                post_id: "p1".to_string(),
                user_id: "viewer".to_string(),
            }])
        );
    }

    #[test]
    fn test_comment_persists_trimmed_content_and_notifies() {
        let mut app = test_app_with(vec![post_by("p1", "u1")]);
        let effect = update(
            &mut app,
            Action::SubmitComment {
                post_id: "p1".to_string(),
                content: "  lovely  ".to_string(),
            },
        );
        let Effect::Persist(writes) = effect else {
            panic!("expected persist");
        };
        assert_eq!(
            writes[0],
            RemoteWrite::InsertComment {
                post_id: "p1".to_string(),
                user_id: "viewer".to_string(),
                content: "lovely".to_string(),
            }
        );
        assert!(matches!(
            &writes[1],
            RemoteWrite::InsertNotification(NotificationIntent { kind: NotificationKind::Comment, recipient, .. })
                if recipient == "u1"
        ));
        assert_eq!(app.store.get("p1").unwrap().comments[0].author_handle, "me");
    }

    #[test]
    fn test_blank_comment_is_rejected() {
        let mut app = test_app_with(vec![post("p1")]);
        let effect = update(
            &mut app,
            Action::SubmitComment {
                post_id: "p1".to_string(),
                content: "   ".to_string(),
            },
        );
        assert_eq!(effect, Effect::None);
        assert!(app.store.get("p1").unwrap().comments.is_empty());
    }

    #[test]
    fn test_remote_failure_refetches_without_rollback() {
        let mut app = test_app_with(vec![post("p1")]);
        update(&mut app, Action::ToggleLike("p1".to_string()));
        let effect = update(&mut app, Action::RemoteWriteFailed("HTTP 500".to_string()));
        assert!(matches!(effect, Effect::FetchFeed(_)));
        assert!(app.is_loading);
        assert_eq!(app.error.as_deref(), Some("HTTP 500"));
        // Local state stays optimistic until the refetch lands
        assert!(app.store.get("p1").unwrap().is_liked_by_viewer);
    }
}
