//! Daily Briefing rendering and output.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use sigscout_scorer::{Priority, ScoredPost, Thresholds};

use crate::error::BriefingError;

/// Aggregate facts about a run, rendered into the briefing's summary and
/// statistics sections.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Human-readable names of the platforms that produced posts.
    pub platforms: Vec<String>,
    /// Number of search queries actually executed.
    pub queries_run: usize,
    /// Unique posts fetched across all platforms.
    pub total_fetched: usize,
}

impl RunStats {
    #[must_use]
    pub fn platforms_label(&self) -> String {
        if self.platforms.is_empty() {
            "None".to_string()
        } else {
            self.platforms.join(", ")
        }
    }
}

/// Render the Daily Briefing document.
///
/// Posts are ranked by total score descending; the sort is stable, so
/// posts with equal totals keep their fetch order. Only the top
/// `max_results` get a detailed entry, but the high/medium/low counts
/// cover the full scored set.
#[must_use]
pub fn render_briefing(
    scored: &[ScoredPost],
    stats: &RunStats,
    max_results: usize,
    thresholds: &Thresholds,
    now: DateTime<Local>,
) -> String {
    let mut ranked: Vec<&ScoredPost> = scored.iter().collect();
    ranked.sort_by(|a, b| b.score.total.cmp(&a.score.total));
    let top = &ranked[..ranked.len().min(max_results)];

    let high_count = count_tier(scored, Priority::High);
    let medium_count = count_tier(scored, Priority::Medium);
    let low_count = count_tier(scored, Priority::Low);

    let mut lines: Vec<String> = Vec::new();

    lines.push("---".to_string());
    lines.push(format!("date: {}", now.format("%Y-%b-%d")));
    lines.push(format!("generated: {}", now.to_rfc3339()));
    lines.push(format!("posts_scanned: {}", stats.total_fetched));
    lines.push(format!("showing: {}", top.len()));
    lines.push(format!("high_priority_total: {high_count}"));
    lines.push(format!("medium_priority_total: {medium_count}"));
    lines.push("status: unreviewed".to_string());
    lines.push("---".to_string());
    lines.push(String::new());

    lines.push("## Summary".to_string());
    lines.push(String::new());
    lines.push(format!(
        "Scanned **{}** posts across {}.",
        stats.total_fetched,
        stats.platforms_label()
    ));
    lines.push(format!("Showing top **{}** ranked by score.", top.len()));
    lines.push(String::new());
    if high_count > 0 {
        lines.push(format!(
            "**{high_count}** high-signal posts found in this batch."
        ));
    }
    lines.push(String::new());

    lines.push("## Top Opportunities".to_string());
    lines.push(String::new());

    for (rank, entry) in top.iter().enumerate() {
        push_entry(&mut lines, rank + 1, entry);
    }

    lines.push("## Run Statistics".to_string());
    lines.push(String::new());
    lines.push("| Metric | Value |".to_string());
    lines.push("|--------|-------|".to_string());
    lines.push(format!("| Platforms | {} |", stats.platforms_label()));
    lines.push(format!("| Queries run | {} |", stats.queries_run));
    lines.push(format!("| Posts scanned | {} |", stats.total_fetched));
    lines.push(format!(
        "| High signal ({}+) | {high_count} |",
        thresholds.high
    ));
    lines.push(format!(
        "| Medium signal ({}-{}) | {medium_count} |",
        thresholds.medium,
        thresholds.high.saturating_sub(1)
    ));
    lines.push(format!(
        "| Low signal (<{}) | {low_count} |",
        thresholds.medium
    ));
    lines.push(String::new());

    lines.join("\n")
}

fn push_entry(lines: &mut Vec<String>, rank: usize, entry: &ScoredPost) {
    let badge = match entry.priority {
        Priority::High => "HIGH SIGNAL",
        Priority::Medium => "Medium",
        Priority::Low => "Low",
    };
    let post = &entry.post;
    let score = &entry.score;

    lines.push(format!(
        "### {rank}. @{} — Score: {} ({badge})",
        post.author_handle, score.total
    ));
    lines.push(String::new());
    lines.push(format!(
        "**{}** · {} likes · {} replies · {} reposts",
        post.author_name, post.likes, post.replies, post.reposts
    ));
    lines.push(String::new());
    // Full post text, untruncated.
    lines.push(format!("> {}", post.text));
    lines.push(String::new());
    lines.push(format!("**Matched query:** `{}`", post.matched_query));
    lines.push(format!("**Link:** {}", post.url));
    lines.push(String::new());
    lines.push("<details><summary>Score breakdown</summary>".to_string());
    lines.push(String::new());
    lines.push("| Dimension | Score |".to_string());
    lines.push("|-----------|-------|".to_string());
    lines.push(format!("| ICP Match | {} |", score.icp_match));
    lines.push(format!("| Topic Relevance | {} |", score.topic_relevance));
    lines.push(format!("| Reach Potential | {} |", score.reach_potential));
    lines.push(format!("| Timing | {} |", score.timing));
    lines.push(format!(
        "| Conversation Stage | {} |",
        score.conversation_stage
    ));
    lines.push(String::new());
    lines.push("</details>".to_string());
    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());
}

fn count_tier(scored: &[ScoredPost], tier: Priority) -> usize {
    scored.iter().filter(|p| p.priority == tier).count()
}

/// Write the briefing under a timestamp-suffixed filename so repeated or
/// concurrent runs never overwrite each other.
///
/// # Errors
///
/// Returns [`BriefingError::Io`] if the output directory cannot be
/// created or the file cannot be written.
pub fn write_briefing(
    dir: &Path,
    content: &str,
    now: DateTime<Local>,
) -> Result<PathBuf, BriefingError> {
    std::fs::create_dir_all(dir).map_err(|e| BriefingError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;

    let filename = format!(
        "{} - Daily Briefing ({}).md",
        now.format("%Y-%b-%d"),
        now.format("%H%M")
    );
    let path = dir.join(filename);

    std::fs::write(&path, content).map_err(|e| BriefingError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(path)
}
