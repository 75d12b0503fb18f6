use sigscout_listener::NormalizedPost;

use crate::priority::Priority;

/// Per-dimension score breakdown for one post. Every field is in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBreakdown {
    /// How strongly the language matches the ideal customer profile.
    pub icp_match: u32,
    /// How directly the content relates to the offering.
    pub topic_relevance: u32,
    /// Engagement-derived reach proxy.
    pub reach_potential: u32,
    /// Conversation freshness. Currently a constant; see [`crate::Weights`].
    pub timing: u32,
    /// Where the author is in their decision journey.
    pub conversation_stage: u32,
    /// Weighted combination of the five sub-scores, rounded half-up
    /// (all terms are non-negative, so `f64::round` is exactly that).
    pub total: u32,
}

/// A post together with its score and derived priority tier.
///
/// The tier is always recomputed from `score.total` and the configured
/// thresholds; it carries no independent state.
#[derive(Debug, Clone)]
pub struct ScoredPost {
    pub post: NormalizedPost,
    pub score: ScoreBreakdown,
    pub priority: Priority,
}
