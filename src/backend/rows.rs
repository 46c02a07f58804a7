//! Wire rows returned by the hosted backend and their normalisation into
//! [`Post`] values.
//!
//! A post row embeds its author (`users`), its comments (each with the
//! commenter's `users.username`), and the `likes` and `saves` rows so the
//! viewer-relative flags can be computed client-side.

use chrono::{DateTime, NaiveDateTime, Utc};
use log::debug;
use serde::{Deserialize, Deserializer};

use crate::core::model::{Comment, Emotion, MediaKind, Post};

/// Storage folder that marks an uploaded file as video.
const VIDEO_FOLDER: &str = "postVideos";
const UNKNOWN_NAME: &str = "Unknown User";
const UNKNOWN_HANDLE: &str = "unknown";

#[derive(Deserialize, Debug, Clone)]
pub struct PostRow {
    #[serde(deserialize_with = "id_string")]
    pub post_id: String,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(deserialize_with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub users: Option<AuthorRow>,
    #[serde(default)]
    pub comments: Option<Vec<CommentRow>>,
    #[serde(default)]
    pub likes: Option<Vec<UserRef>>,
    #[serde(default)]
    pub saves: Option<Vec<UserRef>>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct AuthorRow {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, rename = "profileImage")]
    pub profile_image: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CommentRow {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub users: Option<AuthorRow>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct UserRef {
    #[serde(deserialize_with = "id_string")]
    pub user_id: String,
}

/// Row of the `follows` table, only the column the home feed needs.
#[derive(Deserialize, Debug, Clone)]
pub struct FollowRow {
    #[serde(deserialize_with = "id_string")]
    pub following_id: String,
}

impl PostRow {
    /// Normalise a row into a [`Post`] as seen by `viewer_id`.
    pub fn into_post(self, viewer_id: &str) -> Post {
        let author = self.users.unwrap_or_default();
        let likes = self.likes.unwrap_or_default();
        let saves = self.saves.unwrap_or_default();

        let media_url = self.file.filter(|f| !f.trim().is_empty());
        let media_kind = match media_url.as_deref() {
            Some(url) if url.contains(VIDEO_FOLDER) => MediaKind::Video,
            Some(_) => MediaKind::Image,
            None => MediaKind::None,
        };

        let emotion = self.emotion.as_deref().and_then(|raw| {
            let parsed = Emotion::parse(raw);
            if parsed.is_none() {
                debug!("Unknown emotion '{}' on post {}", raw, self.post_id);
            }
            parsed
        });

        let post_created_at = self.created_at;
        let comments = self
            .comments
            .unwrap_or_default()
            .into_iter()
            .map(|row| Comment {
                author_handle: row
                    .users
                    .and_then(|u| u.username)
                    .unwrap_or_else(|| UNKNOWN_HANDLE.to_string()),
                content: row.content.unwrap_or_default(),
                created_at: row
                    .created_at
                    .as_deref()
                    .and_then(parse_timestamp)
                    .unwrap_or(post_created_at),
            })
            .collect();

        Post {
            id: self.post_id,
            author_id: self.user_id.unwrap_or_default(),
            author_name: author.name.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            author_handle: author
                .username
                .unwrap_or_else(|| UNKNOWN_HANDLE.to_string()),
            author_avatar_url: author.profile_image,
            text_content: self.content,
            media_url,
            media_kind,
            emotion,
            created_at: self.created_at,
            like_count: u32::try_from(likes.len()).unwrap_or(u32::MAX),
            is_liked_by_viewer: likes.iter().any(|l| l.user_id == viewer_id),
            is_bookmarked_by_viewer: saves.iter().any(|s| s.user_id == viewer_id),
            comments,
        }
    }
}

/// Accepts RFC 3339 timestamps and zone-less ones (assumed UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

/// Ids may arrive as JSON numbers (serial keys) or strings (uuids).
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}
