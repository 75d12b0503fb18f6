//! Per-signal inbox files.
//!
//! Each qualifying Twitter post becomes one markdown file in the review
//! inbox, named by timestamp, platform, and a short deterministic hash of
//! the canonical URL. The stored `url:` frontmatter line doubles as the
//! cross-run dedup key: before writing, a run scans existing files and
//! skips URLs it has already saved.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use sha2::{Digest, Sha256};
use sigscout_listener::NormalizedPost;

use crate::error::BriefingError;

/// Stable short identifier for a signal: the first 12 hex characters of
/// the SHA-256 of its canonical URL.
#[must_use]
pub fn signal_id(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    let mut id = String::with_capacity(12);
    for byte in digest.iter().take(6) {
        let _ = write!(id, "{byte:02x}");
    }
    id
}

/// Render the markdown signal document for one post.
///
/// `detected_at` is the run's detection timestamp (RFC 3339); it is
/// passed in rather than read from a clock so rendering stays pure.
#[must_use]
pub fn render_signal(post: &NormalizedPost, detected_at: &str) -> String {
    let id = signal_id(&post.url);
    let author_name = escape_quotes(&post.author_name);
    let bio = if post.author_bio.is_empty() {
        "No bio".to_string()
    } else {
        post.author_bio.clone()
    };
    let bio_escaped = escape_quotes(&bio);

    let thread_context = if post.is_reply {
        "This is a reply to another post."
    } else {
        "This is an original post (not a reply)."
    };

    let mut lines: Vec<String> = Vec::new();
    lines.push("---".to_string());
    lines.push(format!("id: {id}"));
    lines.push(format!("source: {}", post.platform));
    lines.push(format!("url: {}", post.url));
    lines.push(format!("author: \"@{}\"", post.author_handle));
    lines.push(format!("author_name: \"{author_name}\""));
    lines.push(format!("author_followers: {}", post.author_followers));
    lines.push(format!("detected_at: {detected_at}"));
    lines.push(format!("post_created_at: {}", post.created_at));
    lines.push("keywords_matched:".to_string());
    lines.push(format!("  - \"{}\"", post.matched_query));
    lines.push("engagement:".to_string());
    lines.push(format!("  likes: {}", post.likes));
    lines.push(format!("  retweets: {}", post.reposts));
    lines.push(format!("  replies: {}", post.replies));
    lines.push(format!("is_reply: {}", post.is_reply));
    lines.push("status: unscored".to_string());
    lines.push("---".to_string());
    lines.push(String::new());
    lines.push("## Original Post".to_string());
    lines.push(String::new());
    lines.push(post.text.clone());
    lines.push(String::new());
    lines.push("## Author Context".to_string());
    lines.push(String::new());
    lines.push(format!("**@{}** ({})", post.author_handle, post.author_name));
    lines.push(format!("- Followers: {}", post.author_followers));
    lines.push(format!("- Bio: {bio_escaped}"));
    lines.push(String::new());
    lines.push("## Engagement".to_string());
    lines.push(String::new());
    lines.push(format!("- Likes: {}", post.likes));
    lines.push(format!("- Retweets: {}", post.reposts));
    lines.push(format!("- Replies: {}", post.replies));
    lines.push(String::new());
    lines.push("## Matched Query".to_string());
    lines.push(String::new());
    lines.push(format!("`{}`", post.matched_query));
    lines.push(String::new());
    lines.push("## Thread Context".to_string());
    lines.push(String::new());
    lines.push(thread_context.to_string());
    lines.push(String::new());

    lines.join("\n")
}

/// Collect the URLs of signals already stored in the inbox.
///
/// Reads each `*.md` file's frontmatter `url:` line. Unreadable files are
/// warned about and skipped; a missing inbox directory means no existing
/// signals.
#[must_use]
pub fn load_existing_urls(inbox: &Path) -> HashSet<String> {
    let mut urls = HashSet::new();

    let entries = match std::fs::read_dir(inbox) {
        Ok(entries) => entries,
        Err(_) => return urls,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "md") {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                if let Some(url) = stored_url(&content) {
                    urls.insert(url);
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read signal file");
            }
        }
    }

    urls
}

/// First frontmatter `url:` line of a signal document.
fn stored_url(content: &str) -> Option<String> {
    content
        .lines()
        .find(|line| line.starts_with("url:"))
        .map(|line| line.trim_start_matches("url:").trim().to_string())
        .filter(|url| !url.is_empty())
}

/// Write a rendered signal to the inbox.
///
/// The filename is `{YYYY-MM-DD-HHMM}-{platform}-{signal_id}.md`, so the
/// URL-derived id keeps distinct posts from colliding within a minute.
///
/// # Errors
///
/// Returns [`BriefingError::Io`] if the inbox cannot be created or the
/// file cannot be written.
pub fn write_signal(
    inbox: &Path,
    post: &NormalizedPost,
    content: &str,
    now: DateTime<Local>,
) -> Result<PathBuf, BriefingError> {
    std::fs::create_dir_all(inbox).map_err(|e| BriefingError::Io {
        path: inbox.display().to_string(),
        source: e,
    })?;

    let filename = format!(
        "{}-{}-{}.md",
        now.format("%Y-%m-%d-%H%M"),
        post.platform,
        signal_id(&post.url)
    );
    let path = inbox.join(filename);

    std::fs::write(&path, content).map_err(|e| BriefingError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(path)
}

fn escape_quotes(value: &str) -> String {
    value.replace('"', "\\\"")
}
