//! Bluesky listener over the AT Protocol XRPC HTTP API.
//!
//! Authenticates with `com.atproto.server.createSession` and searches with
//! `app.bsky.feed.searchPosts`. Depending on the PDS or proxy in front of
//! it, post views arrive either in the documented typed shape or as a
//! looser generic mapping; [`normalize_post`] accepts both.

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ListenerError;
use crate::pacing::Pacing;
use crate::types::{NormalizedPost, Platform};

const DEFAULT_BASE_URL: &str = "https://bsky.social";

/// Search result limit enforced by the `searchPosts` endpoint.
const SEARCH_LIMIT_MAX: u32 = 100;

/// Authenticated Bluesky client.
///
/// Use [`BlueskyClient::login`] for production or
/// [`BlueskyClient::login_with_base_url`] to point at a mock server in
/// tests.
pub struct BlueskyClient {
    client: reqwest::Client,
    base_url: String,
    access_jwt: String,
}

#[derive(Debug, Deserialize)]
struct CreateSessionResponse {
    #[serde(rename = "accessJwt")]
    access_jwt: String,
}

#[derive(Debug, Deserialize)]
struct SearchPostsResponse {
    #[serde(default)]
    posts: Vec<RawPost>,
}

/// A post view as returned by `searchPosts`, in either provider shape.
///
/// Deserialization tries the typed [`PostView`] first and falls back to a
/// raw JSON mapping, so a provider that omits required fields still
/// yields a post (with defaults) instead of a failed page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawPost {
    View(PostView),
    Untyped(Value),
}

/// The documented typed shape of a search result post.
#[derive(Debug, Deserialize)]
pub struct PostView {
    pub uri: String,
    pub author: AuthorView,
    pub record: PostRecord,
    #[serde(default, rename = "likeCount")]
    pub like_count: u64,
    #[serde(default, rename = "replyCount")]
    pub reply_count: u64,
    #[serde(default, rename = "repostCount")]
    pub repost_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct AuthorView {
    pub handle: String,
    #[serde(default, rename = "displayName")]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostRecord {
    #[serde(default)]
    pub text: String,
    #[serde(default, rename = "createdAt")]
    pub created_at: String,
}

impl BlueskyClient {
    /// Create a session against the production Bluesky PDS.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::Auth`] if the credentials are rejected,
    /// [`ListenerError::Http`] on network failure, or
    /// [`ListenerError::Deserialize`] if the session response does not
    /// match the expected shape.
    pub async fn login(
        username: &str,
        password: &str,
        timeout_secs: u64,
    ) -> Result<Self, ListenerError> {
        Self::login_with_base_url(username, password, timeout_secs, DEFAULT_BASE_URL).await
    }

    /// Create a session against a custom base URL (for testing with
    /// wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`BlueskyClient::login`].
    pub async fn login_with_base_url(
        username: &str,
        password: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ListenerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("sigscout/0.1 (signal-listener)")
            .build()?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let url = format!("{base_url}/xrpc/com.atproto.server.createSession");
        let response = client
            .post(&url)
            .json(&serde_json::json!({
                "identifier": username,
                "password": password,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ListenerError::Auth {
                platform: "bluesky",
                reason: format!("createSession returned status {status}"),
            });
        }

        let body = response.text().await?;
        let session: CreateSessionResponse =
            serde_json::from_str(&body).map_err(|e| ListenerError::Deserialize {
                context: "createSession".to_string(),
                source: e,
            })?;

        Ok(Self {
            client,
            base_url,
            access_jwt: session.access_jwt,
        })
    }

    /// Search for posts matching a query, newest first.
    ///
    /// The limit is capped at the endpoint maximum of 100. An empty
    /// `language` omits the `lang` filter.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::Http`] on network failure,
    /// [`ListenerError::UnexpectedStatus`] on a non-2xx response, or
    /// [`ListenerError::Deserialize`] on a malformed body.
    pub async fn search_posts(
        &self,
        query: &str,
        limit: u32,
        language: &str,
    ) -> Result<Vec<RawPost>, ListenerError> {
        let url = format!("{}/xrpc/app.bsky.feed.searchPosts", self.base_url);

        let mut params = vec![
            ("q", query.to_string()),
            ("limit", limit.min(SEARCH_LIMIT_MAX).to_string()),
            ("sort", "latest".to_string()),
        ];
        if !language.is_empty() {
            params.push(("lang", language.to_string()));
        }

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_jwt)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ListenerError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let parsed: SearchPostsResponse =
            serde_json::from_str(&body).map_err(|e| ListenerError::Deserialize {
                context: format!("searchPosts(q={query})"),
                source: e,
            })?;

        Ok(parsed.posts)
    }
}

/// Fetch all posts matching the configured queries.
///
/// Deduplicates by post id within the call (a query may surface the same
/// post twice), logs and skips failed queries, and paces between
/// successive queries.
pub async fn fetch_bluesky(
    client: &BlueskyClient,
    queries: &[String],
    posts_per_query: u32,
    language: &str,
    pacing: Pacing,
) -> Vec<NormalizedPost> {
    let mut posts = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for (i, query) in queries.iter().enumerate() {
        match client.search_posts(query, posts_per_query, language).await {
            Ok(raw_posts) => {
                tracing::info!(
                    query = query.as_str(),
                    count = raw_posts.len(),
                    "bluesky search returned posts"
                );
                for raw in raw_posts {
                    let post = normalize_post(raw, query);
                    if seen_ids.insert(post.post_id.clone()) {
                        posts.push(post);
                    }
                }
            }
            Err(e) => {
                tracing::warn!(
                    query = query.as_str(),
                    error = %e,
                    "bluesky search failed — skipping query"
                );
            }
        }

        if i + 1 < queries.len() {
            pacing.pause().await;
        }
    }

    posts
}

/// Map either provider shape to a [`NormalizedPost`].
#[must_use]
pub fn normalize_post(raw: RawPost, matched_query: &str) -> NormalizedPost {
    match raw {
        RawPost::View(view) => from_view(view, matched_query),
        RawPost::Untyped(value) => from_value(&value, matched_query),
    }
}

fn from_view(view: PostView, matched_query: &str) -> NormalizedPost {
    let handle = view.author.handle;
    let author_name = view
        .author
        .display_name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| handle.clone());
    let post_id = rkey_from_uri(&view.uri);

    NormalizedPost {
        platform: Platform::Bluesky,
        url: web_url(&handle, &post_id),
        author_handle: handle,
        author_name,
        text: view.record.text,
        created_at: view.record.created_at,
        likes: view.like_count,
        replies: view.reply_count,
        reposts: view.repost_count,
        views: 0,
        post_id,
        matched_query: matched_query.to_string(),
        is_reply: false,
        author_followers: 0,
        author_bio: String::new(),
    }
}

fn from_value(value: &Value, matched_query: &str) -> NormalizedPost {
    let handle = str_at(value, &["author", "handle"]);
    let display_name = str_at(value, &["author", "displayName"]);
    let author_name = if display_name.is_empty() {
        handle.clone()
    } else {
        display_name
    };
    let uri = str_at(value, &["uri"]);
    let post_id = rkey_from_uri(&uri);

    NormalizedPost {
        platform: Platform::Bluesky,
        url: web_url(&handle, &post_id),
        author_handle: handle,
        author_name,
        text: str_at(value, &["record", "text"]),
        created_at: str_at(value, &["record", "createdAt"]),
        likes: u64_at(value, "likeCount"),
        replies: u64_at(value, "replyCount"),
        reposts: u64_at(value, "repostCount"),
        views: 0,
        post_id,
        matched_query: matched_query.to_string(),
        is_reply: false,
        author_followers: 0,
        author_bio: String::new(),
    }
}

/// Extract the record key (last path segment) from an AT URI.
fn rkey_from_uri(uri: &str) -> String {
    if uri.is_empty() {
        return String::new();
    }
    uri.rsplit('/').next().unwrap_or_default().to_string()
}

fn web_url(handle: &str, post_id: &str) -> String {
    if handle.is_empty() || post_id.is_empty() {
        return String::new();
    }
    format!("https://bsky.app/profile/{handle}/post/{post_id}")
}

fn str_at(value: &Value, path: &[&str]) -> String {
    let mut current = value;
    for key in path {
        match current.get(key) {
            Some(next) => current = next,
            None => return String::new(),
        }
    }
    current.as_str().unwrap_or_default().to_string()
}

fn u64_at(value: &Value, key: &str) -> u64 {
    value.get(key).and_then(Value::as_u64).unwrap_or(0)
}
