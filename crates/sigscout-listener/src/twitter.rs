//! Twitter/X listener via the Apify `tweet-scraper` actor.
//!
//! There is no affordable first-party search API, so each query starts an
//! actor run, long-polls it to completion, and reads the run's dataset.
//! Tweets keep their author follower count and bio so the signal inbox
//! can render author context.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ListenerError;
use crate::pacing::Pacing;
use crate::types::{NormalizedPost, Platform};

const DEFAULT_BASE_URL: &str = "https://api.apify.com";

/// Keyword-search actor. The public name is `apidojo/twitter-scraper-v2`;
/// the REST path replaces the slash with a tilde.
const TWITTER_SEARCH_ACTOR: &str = "apidojo~twitter-scraper-v2";

/// Client for the Apify actor-run REST API.
pub struct ApifyClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

/// Envelope for Apify API responses.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    data: T,
}

/// Actor run metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: String,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: String,
}

#[derive(Debug, Serialize)]
struct SearchRunInput {
    #[serde(rename = "searchTerms")]
    search_terms: Vec<String>,
    #[serde(rename = "maxTweets")]
    max_tweets: u32,
    sort: &'static str,
    #[serde(rename = "tweetLanguage")]
    tweet_language: String,
}

/// A tweet from the actor dataset. Every field defaults so sparse items
/// normalize instead of failing the batch.
#[derive(Debug, Default, Deserialize)]
pub struct RawTweet {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "createdAt")]
    pub created_at: String,
    #[serde(default, rename = "likeCount")]
    pub like_count: u64,
    #[serde(default, rename = "replyCount")]
    pub reply_count: u64,
    #[serde(default, rename = "retweetCount")]
    pub retweet_count: u64,
    #[serde(default, rename = "viewCount")]
    pub view_count: u64,
    #[serde(default, rename = "isReply")]
    pub is_reply: bool,
    #[serde(default)]
    pub author: RawTweetAuthor,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawTweetAuthor {
    #[serde(default, rename = "userName")]
    pub user_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub description: String,
}

impl ApifyClient {
    /// Create a client for the production Apify API.
    ///
    /// `timeout_secs` must exceed the 60-second long-poll window used by
    /// [`ApifyClient::wait_for_run`].
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(token: &str, timeout_secs: u64) -> Result<Self, ListenerError> {
        Self::with_base_url(token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        token: &str,
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
            token: token.to_string(),
        })
    }

    /// Run a keyword search end-to-end: start the actor run, poll it to
    /// completion, fetch the dataset items.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::RunFailed`] if the actor run ends in a
    /// non-success state, plus the usual HTTP/deserialization errors.
    pub async fn search_tweets(
        &self,
        query: &str,
        max_tweets: u32,
        language: &str,
    ) -> Result<Vec<RawTweet>, ListenerError> {
        let run = self.start_search_run(query, max_tweets, language).await?;
        tracing::debug!(run_id = %run.id, query, "apify run started, polling for completion");

        let completed = self.wait_for_run(&run.id).await?;
        self.dataset_items(&completed.default_dataset_id).await
    }

    async fn start_search_run(
        &self,
        query: &str,
        max_tweets: u32,
        language: &str,
    ) -> Result<RunData, ListenerError> {
        let url = format!("{}/v2/acts/{TWITTER_SEARCH_ACTOR}/runs", self.base_url);
        let input = SearchRunInput {
            search_terms: vec![query.to_string()],
            max_tweets,
            sort: "Latest",
            tweet_language: language.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&input)
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
        let parsed: ApiResponse<RunData> =
            serde_json::from_str(&body).map_err(|e| ListenerError::Deserialize {
                context: format!("apify start run(q={query})"),
                source: e,
            })?;

        Ok(parsed.data)
    }

    /// Poll until a run reaches a terminal state, using `waitForFinish=60`
    /// long-polling so each request blocks server-side for up to a minute.
    async fn wait_for_run(&self, run_id: &str) -> Result<RunData, ListenerError> {
        loop {
            let url = format!(
                "{}/v2/actor-runs/{run_id}?waitForFinish=60",
                self.base_url
            );
            let response = self.client.get(&url).bearer_auth(&self.token).send().await?;

            let status = response.status();
            if !status.is_success() {
                return Err(ListenerError::UnexpectedStatus {
                    status: status.as_u16(),
                    url,
                });
            }

            let body = response.text().await?;
            let parsed: ApiResponse<RunData> =
                serde_json::from_str(&body).map_err(|e| ListenerError::Deserialize {
                    context: format!("apify run status({run_id})"),
                    source: e,
                })?;

            match parsed.data.status.as_str() {
                "SUCCEEDED" => return Ok(parsed.data),
                "FAILED" | "ABORTED" | "TIMED-OUT" => {
                    return Err(ListenerError::RunFailed {
                        run_id: run_id.to_string(),
                        status: parsed.data.status,
                    });
                }
                other => {
                    tracing::debug!(run_id, status = other, "apify run still in progress");
                }
            }
        }
    }

    async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<RawTweet>, ListenerError> {
        let url = format!(
            "{}/v2/datasets/{dataset_id}/items?format=json",
            self.base_url
        );
        let response = self.client.get(&url).bearer_auth(&self.token).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ListenerError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ListenerError::Deserialize {
            context: format!("apify dataset({dataset_id})"),
            source: e,
        })
    }
}

/// Fetch all tweets matching the configured queries.
///
/// Deduplicates by tweet id within the call, logs and skips failed
/// queries (including failed actor runs), and paces between successive
/// queries.
pub async fn fetch_twitter(
    client: &ApifyClient,
    queries: &[String],
    tweets_per_query: u32,
    language: &str,
    pacing: Pacing,
) -> Vec<NormalizedPost> {
    let mut tweets = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for (i, query) in queries.iter().enumerate() {
        match client.search_tweets(query, tweets_per_query, language).await {
            Ok(raw_tweets) => {
                tracing::info!(
                    query = query.as_str(),
                    count = raw_tweets.len(),
                    "twitter search returned tweets"
                );
                for raw in &raw_tweets {
                    let post = normalize_tweet(raw, query);
                    if seen_ids.insert(post.post_id.clone()) {
                        tweets.push(post);
                    }
                }
            }
            Err(e) => {
                tracing::warn!(
                    query = query.as_str(),
                    error = %e,
                    "twitter search failed — skipping query"
                );
            }
        }

        if i + 1 < queries.len() {
            pacing.pause().await;
        }
    }

    tweets
}

/// Map a dataset tweet to a [`NormalizedPost`].
#[must_use]
pub fn normalize_tweet(tweet: &RawTweet, matched_query: &str) -> NormalizedPost {
    let handle = tweet.author.user_name.clone();
    let author_name = if tweet.author.name.is_empty() {
        handle.clone()
    } else {
        tweet.author.name.clone()
    };

    let url = if tweet.url.is_empty() && !handle.is_empty() && !tweet.id.is_empty() {
        format!("https://twitter.com/{handle}/status/{}", tweet.id)
    } else {
        tweet.url.clone()
    };

    NormalizedPost {
        platform: Platform::Twitter,
        post_id: tweet.id.clone(),
        url,
        author_handle: handle,
        author_name,
        text: tweet.text.clone(),
        created_at: tweet.created_at.clone(),
        likes: tweet.like_count,
        replies: tweet.reply_count,
        reposts: tweet.retweet_count,
        views: tweet.view_count,
        matched_query: matched_query.to_string(),
        is_reply: tweet.is_reply,
        author_followers: tweet.author.followers,
        author_bio: tweet.author.description.clone(),
    }
}
