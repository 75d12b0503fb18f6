//! `YouTube` listener over the Data API v3.
//!
//! Each query runs a `search` call for recent videos, then a single
//! `videos` call for the page's statistics. The API returns counters as
//! JSON strings; parsing is lenient and falls back to 0.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::ListenerError;
use crate::pacing::Pacing;
use crate::types::{NormalizedPost, Platform};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Result cap enforced by the `search` endpoint.
const SEARCH_RESULTS_MAX: u32 = 50;

/// Client for the `YouTube` Data API v3.
pub struct YoutubeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

/// A single `search` result. Every field defaults so partial items
/// normalize instead of failing the page.
#[derive(Debug, Default, Deserialize)]
pub struct SearchItem {
    #[serde(default)]
    pub id: SearchItemId,
    #[serde(default)]
    pub snippet: Snippet,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchItemId {
    #[serde(default, rename = "videoId")]
    pub video_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Snippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "channelTitle")]
    pub channel_title: String,
    #[serde(default, rename = "publishedAt")]
    pub published_at: String,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    #[serde(default)]
    id: String,
    #[serde(default)]
    statistics: RawStatistics,
}

/// Statistics block; the API encodes all counters as strings.
#[derive(Debug, Default, Deserialize)]
struct RawStatistics {
    #[serde(default, rename = "viewCount")]
    view_count: Option<String>,
    #[serde(default, rename = "likeCount")]
    like_count: Option<String>,
    #[serde(default, rename = "commentCount")]
    comment_count: Option<String>,
}

/// Parsed per-video counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct VideoStats {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
}

impl YoutubeClient {
    /// Create a client for the production API.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, ListenerError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ListenerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("sigscout/0.1 (signal-listener)")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Search for recent videos matching a query, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::Http`] on network failure,
    /// [`ListenerError::UnexpectedStatus`] on a non-2xx response, or
    /// [`ListenerError::Deserialize`] on a malformed body.
    pub async fn search_videos(
        &self,
        query: &str,
        max_results: u32,
        language: &str,
        published_after: &str,
    ) -> Result<Vec<SearchItem>, ListenerError> {
        let url = format!("{}/search", self.base_url);
        let max_results = max_results.min(SEARCH_RESULTS_MAX).to_string();
        let params = [
            ("key", self.api_key.as_str()),
            ("q", query),
            ("part", "snippet"),
            ("type", "video"),
            ("maxResults", max_results.as_str()),
            ("order", "date"),
            ("relevanceLanguage", language),
            ("publishedAfter", published_after),
        ];

        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ListenerError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| ListenerError::Deserialize {
                context: format!("youtube search(q={query})"),
                source: e,
            })?;

        Ok(parsed.items)
    }

    /// Fetch statistics for a batch of video ids.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::Http`] on network failure,
    /// [`ListenerError::UnexpectedStatus`] on a non-2xx response, or
    /// [`ListenerError::Deserialize`] on a malformed body.
    pub async fn video_statistics(
        &self,
        video_ids: &[String],
    ) -> Result<HashMap<String, VideoStats>, ListenerError> {
        if video_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let url = format!("{}/videos", self.base_url);
        let ids = video_ids.join(",");
        let params = [
            ("key", self.api_key.as_str()),
            ("id", ids.as_str()),
            ("part", "statistics"),
        ];

        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ListenerError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let parsed: VideosResponse =
            serde_json::from_str(&body).map_err(|e| ListenerError::Deserialize {
                context: "youtube videos(statistics)".to_string(),
                source: e,
            })?;

        Ok(parsed
            .items
            .into_iter()
            .map(|item| (item.id, parse_stats(&item.statistics)))
            .collect())
    }
}

/// Fetch all videos matching the configured queries.
///
/// Deduplicates by video id within the call, logs and skips failed
/// queries, and paces between successive queries. A failed statistics
/// lookup degrades that page to zero counts rather than failing the
/// query.
pub async fn fetch_youtube(
    client: &YoutubeClient,
    queries: &[String],
    videos_per_query: u32,
    language: &str,
    max_age_days: u32,
    pacing: Pacing,
) -> Vec<NormalizedPost> {
    let cutoff = published_after(Utc::now(), max_age_days);
    let mut videos = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for (i, query) in queries.iter().enumerate() {
        match client
            .search_videos(query, videos_per_query, language, &cutoff)
            .await
        {
            Ok(items) => {
                tracing::info!(
                    query = query.as_str(),
                    count = items.len(),
                    "youtube search returned videos"
                );

                let ids: Vec<String> = items
                    .iter()
                    .map(|item| item.id.video_id.clone())
                    .filter(|id| !id.is_empty())
                    .collect();

                let stats = match client.video_statistics(&ids).await {
                    Ok(stats) => stats,
                    Err(e) => {
                        tracing::warn!(
                            query = query.as_str(),
                            error = %e,
                            "youtube statistics lookup failed — counting engagement as zero"
                        );
                        HashMap::new()
                    }
                };

                for item in items {
                    // Non-video results carry no videoId; nothing to link to.
                    if item.id.video_id.is_empty() {
                        continue;
                    }
                    let video_stats = stats
                        .get(&item.id.video_id)
                        .copied()
                        .unwrap_or_default();
                    let post = normalize_video(&item, video_stats, query);
                    if seen_ids.insert(post.post_id.clone()) {
                        videos.push(post);
                    }
                }
            }
            Err(e) => {
                tracing::warn!(
                    query = query.as_str(),
                    error = %e,
                    "youtube search failed — skipping query"
                );
            }
        }

        if i + 1 < queries.len() {
            pacing.pause().await;
        }
    }

    videos
}

/// Map a search item plus its statistics to a [`NormalizedPost`].
///
/// Comments map to `replies`; `reposts` stays 0, so the shared
/// engagement derivation counts likes + comments for `YouTube`.
#[must_use]
pub fn normalize_video(item: &SearchItem, stats: VideoStats, matched_query: &str) -> NormalizedPost {
    let video_id = item.id.video_id.clone();
    let snippet = &item.snippet;

    let text = if snippet.description.is_empty() {
        format!("**{}**", snippet.title)
    } else {
        format!("**{}**\n\n{}", snippet.title, snippet.description)
    };

    NormalizedPost {
        platform: Platform::Youtube,
        url: format!("https://www.youtube.com/watch?v={video_id}"),
        post_id: video_id,
        author_handle: snippet.channel_title.clone(),
        author_name: snippet.channel_title.clone(),
        text,
        created_at: snippet.published_at.clone(),
        likes: stats.likes,
        replies: stats.comments,
        reposts: 0,
        views: stats.views,
        matched_query: matched_query.to_string(),
        is_reply: false,
        author_followers: 0,
        author_bio: String::new(),
    }
}

/// RFC 3339 cutoff for the `publishedAfter` search parameter.
#[must_use]
pub fn published_after(now: DateTime<Utc>, max_age_days: u32) -> String {
    let cutoff = now - chrono::Duration::days(i64::from(max_age_days));
    cutoff.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn parse_stats(raw: &RawStatistics) -> VideoStats {
    VideoStats {
        views: parse_count(raw.view_count.as_deref()),
        likes: parse_count(raw.like_count.as_deref()),
        comments: parse_count(raw.comment_count.as_deref()),
    }
}

/// The API encodes counters as strings; anything unparsable counts as 0.
fn parse_count(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.parse().ok()).unwrap_or(0)
}
