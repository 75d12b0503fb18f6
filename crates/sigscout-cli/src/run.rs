//! Pipeline orchestration: fetch → dedup → score → prioritize → report.
//!
//! Platforms run strictly one after another, queries one after another
//! within a platform; the only timing construct is the inter-query pacing
//! delay. A platform that cannot run (disabled, unconfigured, failed
//! auth) is logged and skipped so the remaining platforms and the
//! briefing still happen.

use chrono::{Local, Utc};
use sigscout_briefing::{
    load_existing_urls, render_briefing, render_signal, write_briefing, write_signal, RunStats,
};
use sigscout_core::{load_context, load_queries, AppConfig};
use sigscout_listener::bluesky::{fetch_bluesky, BlueskyClient};
use sigscout_listener::twitter::{fetch_twitter, ApifyClient};
use sigscout_listener::youtube::{fetch_youtube, YoutubeClient};
use sigscout_listener::{NormalizedPost, Pacing, Platform};
use sigscout_scorer::{Priority, ScoredPost, Scorer, Thresholds};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Apify runs are long-polled for up to 60 s per request, so the client
/// timeout must sit above that window.
const APIFY_TIMEOUT_SECS: u64 = 90;

/// Result of one platform's fetch stage.
#[derive(Debug, Default)]
struct PlatformFetch {
    posts: Vec<NormalizedPost>,
    queries_run: usize,
}

pub(crate) async fn run(
    config: &AppConfig,
    selection: Option<Platform>,
    dry_run: bool,
) -> anyhow::Result<()> {
    // Context files are a forward-compatible scoring input; today the run
    // only reports whether they are present.
    let icp_context = load_context(&config.paths.context_dir, "ICP Profile.md");
    let positioning_context = load_context(&config.paths.context_dir, "Positioning.md");
    tracing::info!(
        icp_context = icp_context.is_some(),
        positioning_context = positioning_context.is_some(),
        "context files loaded"
    );

    if dry_run {
        print_dry_run(config, selection);
        return Ok(());
    }

    let mut all_posts: Vec<NormalizedPost> = Vec::new();
    let mut stats = RunStats::default();

    if selected(selection, Platform::Bluesky) {
        let fetched = bluesky_posts(config).await;
        record(&mut stats, "Bluesky", fetched, &mut all_posts);
    }

    if selected(selection, Platform::Youtube) {
        let fetched = youtube_posts(config).await;
        record(&mut stats, "YouTube", fetched, &mut all_posts);
    }

    if selected(selection, Platform::Twitter) {
        let fetched = twitter_posts(config).await;
        if !fetched.posts.is_empty() {
            persist_twitter_signals(config, &fetched.posts);
        }
        record(&mut stats, "Twitter", fetched, &mut all_posts);
    }

    stats.total_fetched = all_posts.len();
    if all_posts.is_empty() {
        tracing::info!("no posts found across enabled platforms — the briefing will be empty");
    } else {
        tracing::info!(total = all_posts.len(), "fetch complete");
    }

    let scorer = Scorer::default();
    let thresholds = Thresholds {
        high: config.scorer.thresholds.high,
        medium: config.scorer.thresholds.medium,
    };

    let scored: Vec<ScoredPost> = all_posts
        .into_iter()
        .map(|post| {
            let score = scorer.score(&post);
            let priority = Priority::from_total(score.total, &thresholds);
            ScoredPost {
                post,
                score,
                priority,
            }
        })
        .collect();

    let high = count_tier(&scored, Priority::High);
    let medium = count_tier(&scored, Priority::Medium);
    let low = count_tier(&scored, Priority::Low);
    tracing::info!(high, medium, low, "scoring complete");

    let now = Local::now();
    let content = render_briefing(
        &scored,
        &stats,
        config.briefing.max_results,
        &thresholds,
        now,
    );
    let path = write_briefing(&config.briefing.output_dir, &content, now)?;

    println!("briefing saved to {}", path.display());
    println!("high: {high} · medium: {medium} · low: {low}");
    Ok(())
}

fn selected(selection: Option<Platform>, platform: Platform) -> bool {
    selection.is_none_or(|chosen| chosen == platform)
}

fn count_tier(scored: &[ScoredPost], tier: Priority) -> usize {
    scored.iter().filter(|p| p.priority == tier).count()
}

/// Fold one platform's results into the run totals. The platform is
/// listed in the briefing only if it actually produced posts.
fn record(
    stats: &mut RunStats,
    label: &str,
    fetched: PlatformFetch,
    all_posts: &mut Vec<NormalizedPost>,
) {
    stats.queries_run += fetched.queries_run;
    if !fetched.posts.is_empty() {
        stats.platforms.push(label.to_string());
    }
    all_posts.extend(fetched.posts);
}

async fn bluesky_posts(config: &AppConfig) -> PlatformFetch {
    let settings = &config.listener.bluesky;
    if !settings.enabled {
        tracing::info!("bluesky disabled in config");
        return PlatformFetch::default();
    }

    let queries = match load_queries(&config.paths.queries_dir, "bluesky") {
        Ok(queries) => queries,
        Err(e) => {
            tracing::warn!(error = %e, "bluesky query list unusable — skipping platform");
            return PlatformFetch::default();
        }
    };
    if queries.is_empty() {
        tracing::info!("bluesky has no active queries");
        return PlatformFetch::default();
    }

    if config.bluesky.username.is_empty() || config.bluesky.password.is_empty() {
        tracing::warn!("bluesky credentials missing — skipping platform");
        return PlatformFetch::default();
    }

    tracing::info!(
        queries = queries.len(),
        per_query = settings.posts_per_query,
        "fetching bluesky"
    );

    let client = match BlueskyClient::login(
        &config.bluesky.username,
        &config.bluesky.password,
        REQUEST_TIMEOUT_SECS,
    )
    .await
    {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "bluesky authentication failed — skipping platform");
            return PlatformFetch::default();
        }
    };

    let posts = fetch_bluesky(
        &client,
        &queries,
        settings.posts_per_query,
        &settings.language,
        Pacing::from_millis(settings.delay_ms),
    )
    .await;

    PlatformFetch {
        queries_run: queries.len(),
        posts,
    }
}

async fn youtube_posts(config: &AppConfig) -> PlatformFetch {
    let settings = &config.listener.youtube;
    if !settings.enabled {
        tracing::info!("youtube disabled in config");
        return PlatformFetch::default();
    }

    let queries = match load_queries(&config.paths.queries_dir, "youtube") {
        Ok(queries) => queries,
        Err(e) => {
            tracing::warn!(error = %e, "youtube query list unusable — skipping platform");
            return PlatformFetch::default();
        }
    };
    if queries.is_empty() {
        tracing::info!("youtube has no active queries");
        return PlatformFetch::default();
    }

    if config.youtube.api_key.is_empty() {
        tracing::warn!("youtube api key missing — skipping platform");
        return PlatformFetch::default();
    }

    tracing::info!(
        queries = queries.len(),
        per_query = settings.videos_per_query,
        "fetching youtube"
    );

    let client = match YoutubeClient::new(&config.youtube.api_key, REQUEST_TIMEOUT_SECS) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "youtube client construction failed — skipping platform");
            return PlatformFetch::default();
        }
    };

    let posts = fetch_youtube(
        &client,
        &queries,
        settings.videos_per_query,
        &settings.language,
        settings.max_age_days,
        Pacing::from_millis(settings.delay_ms),
    )
    .await;

    PlatformFetch {
        queries_run: queries.len(),
        posts,
    }
}

async fn twitter_posts(config: &AppConfig) -> PlatformFetch {
    let settings = &config.listener.twitter;
    if !settings.enabled {
        tracing::info!("twitter disabled in config");
        return PlatformFetch::default();
    }

    let queries = match load_queries(&config.paths.queries_dir, "twitter") {
        Ok(queries) => queries,
        Err(e) => {
            tracing::warn!(error = %e, "twitter query list unusable — skipping platform");
            return PlatformFetch::default();
        }
    };
    if queries.is_empty() {
        tracing::info!("twitter has no active queries");
        return PlatformFetch::default();
    }

    if config.apify.api_token.is_empty() {
        tracing::warn!("apify api token missing — skipping twitter");
        return PlatformFetch::default();
    }

    tracing::info!(
        queries = queries.len(),
        per_query = settings.tweets_per_query,
        "fetching twitter"
    );

    let client = match ApifyClient::new(&config.apify.api_token, APIFY_TIMEOUT_SECS) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "apify client construction failed — skipping twitter");
            return PlatformFetch::default();
        }
    };

    let posts = fetch_twitter(
        &client,
        &queries,
        settings.tweets_per_query,
        &settings.language,
        Pacing::from_millis(settings.delay_ms),
    )
    .await;

    PlatformFetch {
        queries_run: queries.len(),
        posts,
    }
}

/// Persist qualifying Twitter posts as signal files in the review inbox.
///
/// Posts below the configured engagement thresholds are not persisted
/// (they still flow into the briefing), and URLs already present in the
/// inbox are skipped so repeated runs do not duplicate signals.
fn persist_twitter_signals(config: &AppConfig, posts: &[NormalizedPost]) {
    let settings = &config.listener.twitter;
    let inbox = &config.paths.signals_inbox;

    let mut existing = load_existing_urls(inbox);
    tracing::info!(existing = existing.len(), "scanned signal inbox");

    let detected_at = Utc::now().to_rfc3339();
    let now = Local::now();

    let mut saved = 0usize;
    let mut duplicates = 0usize;
    let mut below_threshold = 0usize;

    for post in posts {
        if post.url.is_empty() {
            tracing::warn!(post_id = %post.post_id, "tweet without url — cannot persist signal");
            continue;
        }
        if existing.contains(&post.url) {
            duplicates += 1;
            continue;
        }
        if post.likes < settings.min_likes || post.replies < settings.min_replies {
            below_threshold += 1;
            continue;
        }

        let content = render_signal(post, &detected_at);
        match write_signal(inbox, post, &content, now) {
            Ok(path) => {
                saved += 1;
                existing.insert(post.url.clone());
                tracing::debug!(path = %path.display(), "saved signal");
            }
            Err(e) => {
                tracing::warn!(url = %post.url, error = %e, "could not save signal");
            }
        }
    }

    tracing::info!(saved, duplicates, below_threshold, "twitter signals persisted");
}

fn print_dry_run(config: &AppConfig, selection: Option<Platform>) {
    println!("dry-run: configuration loaded");

    for platform in [Platform::Bluesky, Platform::Youtube, Platform::Twitter] {
        if !selected(selection, platform) {
            continue;
        }
        let enabled = match platform {
            Platform::Bluesky => config.listener.bluesky.enabled,
            Platform::Youtube => config.listener.youtube.enabled,
            Platform::Twitter => config.listener.twitter.enabled,
        };
        match load_queries(&config.paths.queries_dir, &platform.to_string()) {
            Ok(queries) => println!(
                "  {platform}: enabled={enabled}, {} active queries",
                queries.len()
            ),
            Err(e) => println!("  {platform}: enabled={enabled}, query list unusable ({e})"),
        }
    }

    println!(
        "  briefing -> {} (top {})",
        config.briefing.output_dir.display(),
        config.briefing.max_results
    );
    println!("dry-run complete — nothing fetched, scored, or written");
}
