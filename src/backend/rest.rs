//! REST backend speaking the PostgREST dialect exposed by the hosted service.
//!
//! All tables live under `{base_url}/rest/v1/`. Filters are query parameters
//! (`column=eq.value`, `column=in.(a,b)`), embedded relations are requested
//! through `select`, and writes are JSON arrays of rows.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Serialize;

use crate::backend::rows::{FollowRow, PostRow};
use crate::backend::{BackendError, FeedBackend};
use crate::core::model::{FeedQuery, FeedView, NotificationIntent, NotificationKind, Post};

/// Post columns plus the embedded relations the feed needs.
const POST_SELECT: &str = "*,users:user_id(name,username,profileImage),\
comments(content,created_at,users:user_id(username)),likes(user_id),saves(user_id)";

#[derive(Serialize, Debug)]
struct ReactionRow<'a> {
    post_id: &'a str,
    user_id: &'a str,
}

#[derive(Serialize, Debug)]
struct NewComment<'a> {
    post_id: &'a str,
    user_id: &'a str,
    content: &'a str,
}

#[derive(Serialize, Debug)]
struct NewNotification<'a> {
    user_id: &'a str,
    post_id: &'a str,
    #[serde(rename = "type")]
    kind: NotificationKind,
    actor_id: &'a str,
}

pub struct RestBackend {
    base_url: String,
    api_key: String,
    access_token: Option<String>,
    client: reqwest::Client,
}

impl RestBackend {
    /// Creates a new REST backend.
    ///
    /// # Arguments
    /// * `base_url` - Project URL, e.g. `https://abc.supabase.co`
    /// * `api_key` - Public (anon) API key sent with every request
    /// * `access_token` - Session token of the signed-in viewer; falls back to the API key
    pub fn new(
        base_url: String,
        api_key: String,
        access_token: Option<String>,
    ) -> Result<Self, BackendError> {
        if base_url.trim().is_empty() {
            return Err(BackendError::Config("backend URL is empty".to_string()));
        }
        if api_key.trim().is_empty() {
            return Err(BackendError::Config("API key is empty".to_string()));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            access_token,
            client: reqwest::Client::new(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn bearer(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.api_key)
    }

    fn request(&self, method: reqwest::Method, table: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.bearer()))
    }

    /// Sends a request and maps transport and status failures.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        debug!("Backend response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Backend API error: {} - {}", status, err_body);
            return Err(BackendError::Api {
                status,
                message: err_body,
            });
        }

        Ok(response)
    }

    async fn get_rows<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, BackendError> {
        let request = self.request(reqwest::Method::GET, table).query(params);
        let body = self
            .send(request)
            .await?
            .text()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| BackendError::Parse(format!("{table}: {e}")))
    }

    async fn insert<T: Serialize + ?Sized>(
        &self,
        table: &str,
        rows: &T,
        params: &[(&str, String)],
        prefer: &str,
    ) -> Result<(), BackendError> {
        let request = self
            .request(reqwest::Method::POST, table)
            .query(params)
            .header("Prefer", prefer)
            .json(rows);
        self.send(request).await?;
        Ok(())
    }

    async fn delete(&self, table: &str, params: &[(&str, String)]) -> Result<(), BackendError> {
        let request = self.request(reqwest::Method::DELETE, table).query(params);
        self.send(request).await?;
        Ok(())
    }

    /// Author ids shown on the home feed: followed accounts plus the viewer.
    async fn home_authors(&self, viewer_id: &str) -> Result<Vec<String>, BackendError> {
        let follows: Vec<FollowRow> = self
            .get_rows(
                "follows",
                &[
                    ("select", "following_id".to_string()),
                    ("follower_id", format!("eq.{viewer_id}")),
                ],
            )
            .await?;
        let mut authors: Vec<String> = follows.into_iter().map(|f| f.following_id).collect();
        authors.push(viewer_id.to_string());
        Ok(authors)
    }

    async fn toggle_reaction(
        &self,
        table: &str,
        post_id: &str,
        user_id: &str,
        on: bool,
    ) -> Result<(), BackendError> {
        if on {
            self.insert(
                table,
                &[ReactionRow { post_id, user_id }],
                &[("on_conflict", "post_id,user_id".to_string())],
                "resolution=ignore-duplicates,return=minimal",
            )
            .await
        } else {
            self.delete(
                table,
                &[
                    ("post_id", format!("eq.{post_id}")),
                    ("user_id", format!("eq.{user_id}")),
                ],
            )
            .await
        }
    }
}

#[async_trait]
impl FeedBackend for RestBackend {
    fn name(&self) -> &str {
        "rest"
    }

    async fn fetch_feed(&self, query: &FeedQuery) -> Result<Vec<Post>, BackendError> {
        let mut params: Vec<(&str, String)> = vec![
            ("select", POST_SELECT.to_string()),
            ("order", "created_at.desc".to_string()),
            // Embedded rows have no implicit order; comments read oldest first
            ("comments.order", "created_at.asc".to_string()),
        ];

        match query.view {
            FeedView::Home => {
                let authors = self.home_authors(&query.viewer_id).await?;
                params.push(("user_id", format!("in.({})", authors.join(","))));
            }
            FeedView::Explore => {
                params.push(("visibility", "eq.everyone".to_string()));
                if let Some(emotion) = query.emotion {
                    params.push(("emotion", format!("eq.{emotion}")));
                }
            }
        }

        let rows: Vec<PostRow> = self.get_rows("posts", &params).await?;
        info!(
            "Fetched {} feed: {} posts (emotion={:?})",
            query.view.label(),
            rows.len(),
            query.emotion
        );

        Ok(rows
            .into_iter()
            .map(|row| row.into_post(&query.viewer_id))
            .collect())
    }

    async fn set_like(&self, post_id: &str, user_id: &str, liked: bool) -> Result<(), BackendError> {
        self.toggle_reaction("likes", post_id, user_id, liked).await
    }

    async fn set_saved(&self, post_id: &str, user_id: &str, saved: bool) -> Result<(), BackendError> {
        self.toggle_reaction("saves", post_id, user_id, saved).await
    }

    async fn insert_comment(
        &self,
        post_id: &str,
        user_id: &str,
        content: &str,
    ) -> Result<(), BackendError> {
        self.insert(
            "comments",
            &[NewComment {
                post_id,
                user_id,
                content,
            }],
            &[],
            "return=minimal",
        )
        .await
    }

    async fn insert_notification(&self, intent: &NotificationIntent) -> Result<(), BackendError> {
        self.insert(
            "notifications",
            &[NewNotification {
                user_id: &intent.recipient,
                post_id: &intent.post_id,
                kind: intent.kind,
                actor_id: &intent.actor,
            }],
            &[],
            "return=minimal",
        )
        .await
    }

    async fn retract_notification(&self, intent: &NotificationIntent) -> Result<(), BackendError> {
        self.delete(
            "notifications",
            &[
                ("post_id", format!("eq.{}", intent.post_id)),
                ("actor_id", format!("eq.{}", intent.actor)),
                ("type", format!("eq.{}", intent.kind.as_str())),
            ],
        )
        .await
    }
}
