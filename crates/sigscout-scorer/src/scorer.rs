//! The five-dimension ICP scorer.

use sigscout_listener::NormalizedPost;

use crate::types::ScoreBreakdown;
use crate::vocab::Vocabulary;

/// Points per matched high-value profile term.
const HIGH_VALUE_WEIGHT: u32 = 20;
/// Points per matched question/exploration signal.
const QUESTION_SIGNAL_WEIGHT: u32 = 25;
/// Penalty per matched low-value term.
const LOW_VALUE_PENALTY: u32 = 30;
/// Points per matched direct-relevance topic.
const DIRECT_RELEVANCE_WEIGHT: u32 = 30;
/// Points per matched adjacent topic.
const ADJACENT_TOPIC_WEIGHT: u32 = 15;

/// Floor for posts that matched a search query but none of the profile
/// vocabulary: matching at all implies nonzero relevance.
const ICP_BASELINE: u32 = 30;
const TOPIC_BASELINE: u32 = 25;

/// Dimension weights for the total. Must sum to 1.0.
///
/// `timing_default` is the constant timing sub-score: searches already
/// target recent content, so freshness is assumed rather than computed.
/// A real recency calculation from `created_at` would replace this field,
/// not bypass it.
#[derive(Debug, Clone, Copy)]
pub struct Weights {
    pub icp_match: f64,
    pub topic_relevance: f64,
    pub reach_potential: f64,
    pub timing: f64,
    pub conversation_stage: f64,
    pub timing_default: u32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            icp_match: 0.30,
            topic_relevance: 0.25,
            reach_potential: 0.15,
            timing: 0.15,
            conversation_stage: 0.15,
            timing_default: 80,
        }
    }
}

/// Pure scorer mapping a [`NormalizedPost`] to a [`ScoreBreakdown`].
///
/// No I/O, no clock, no randomness: the same post always produces the
/// same breakdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    vocab: Vocabulary,
    weights: Weights,
}

impl Scorer {
    #[must_use]
    pub fn new(vocab: Vocabulary, weights: Weights) -> Self {
        Self { vocab, weights }
    }

    /// Score one post. All text matching is case-insensitive substring
    /// presence; each vocabulary term counts at most once.
    #[must_use]
    pub fn score(&self, post: &NormalizedPost) -> ScoreBreakdown {
        let text = post.text.to_lowercase();

        let icp_match = self.icp_match(&text);
        let topic_relevance = self.topic_relevance(&text);
        let reach = reach_potential(post.engagement_total());
        let timing = self.weights.timing_default;
        let stage = self.conversation_stage(&text);

        ScoreBreakdown {
            icp_match,
            topic_relevance,
            reach_potential: reach,
            timing,
            conversation_stage: stage,
            total: self.weighted_total(icp_match, topic_relevance, reach, timing, stage),
        }
    }

    fn icp_match(&self, text: &str) -> u32 {
        let high = count_hits(text, self.vocab.high_value);
        let question = count_hits(text, self.vocab.question_signals);
        let low = count_hits(text, self.vocab.low_value);

        let positive = (high * HIGH_VALUE_WEIGHT + question * QUESTION_SIGNAL_WEIGHT).min(100);
        let score = positive.saturating_sub(low * LOW_VALUE_PENALTY);

        if score == 0 {
            ICP_BASELINE
        } else {
            score
        }
    }

    fn topic_relevance(&self, text: &str) -> u32 {
        let direct = count_hits(text, self.vocab.direct_relevance);
        let adjacent = count_hits(text, self.vocab.adjacent_topics);

        let score = (direct * DIRECT_RELEVANCE_WEIGHT + adjacent * ADJACENT_TOPIC_WEIGHT).min(100);

        if score == 0 {
            TOPIC_BASELINE
        } else {
            score
        }
    }

    /// Priority-ordered stage checks; first match wins. A post that both
    /// asks a question and vents frustration scores as a question.
    fn conversation_stage(&self, text: &str) -> u32 {
        if any_hit(text, self.vocab.question_markers) {
            85
        } else if any_hit(text, self.vocab.frustration_markers) {
            75
        } else if any_hit(text, self.vocab.decided_markers) {
            30
        } else {
            50
        }
    }

    // Sub-scores never exceed 100, so the rounded total fits comfortably.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn weighted_total(&self, icp: u32, topic: u32, reach: u32, timing: u32, stage: u32) -> u32 {
        let w = &self.weights;
        let total = f64::from(icp) * w.icp_match
            + f64::from(topic) * w.topic_relevance
            + f64::from(reach) * w.reach_potential
            + f64::from(timing) * w.timing
            + f64::from(stage) * w.conversation_stage;

        // Round half-up; every term is non-negative, so `round`'s
        // half-away-from-zero behavior is the same thing.
        total.round() as u32
    }
}

/// Step function mapping the engagement total to a reach score.
#[must_use]
pub fn reach_potential(engagement: u64) -> u32 {
    match engagement {
        100.. => 100,
        50..=99 => 80,
        20..=49 => 60,
        10..=19 => 40,
        5..=9 => 25,
        _ => 10,
    }
}

/// Number of vocabulary terms present in the text (presence, not
/// multiplicity: a term repeated in the text still counts once).
#[allow(clippy::cast_possible_truncation)] // term lists are tiny
fn count_hits(text: &str, terms: &[&str]) -> u32 {
    terms.iter().filter(|term| text.contains(*term)).count() as u32
}

fn any_hit(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| text.contains(term))
}

#[cfg(test)]
mod tests {
    use sigscout_listener::{NormalizedPost, Platform};

    use super::*;
    use crate::{Priority, Thresholds};

    fn post(text: &str, engagement: u64) -> NormalizedPost {
        NormalizedPost {
            platform: Platform::Bluesky,
            post_id: "id".to_string(),
            url: String::new(),
            author_handle: "handle".to_string(),
            author_name: "name".to_string(),
            text: text.to_string(),
            created_at: "2025-11-01T00:00:00Z".to_string(),
            likes: engagement,
            replies: 0,
            reposts: 0,
            views: 0,
            matched_query: "q".to_string(),
            is_reply: false,
            author_followers: 0,
            author_bio: String::new(),
        }
    }

    #[test]
    fn seeking_post_scores_medium() {
        // Two high-value terms (decentralized, big tech), two question
        // signals (looking for, tired of), one direct-relevance topic
        // (decentralized storage), engagement 12.
        let scorer = Scorer::default();
        let breakdown = scorer.score(&post(
            "I'm looking for decentralized storage, tired of big tech",
            12,
        ));
        assert_eq!(breakdown.icp_match, 90, "2*20 + 2*25, below the cap");
        assert_eq!(breakdown.topic_relevance, 30);
        assert_eq!(breakdown.reach_potential, 40);
        assert_eq!(breakdown.timing, 80);
        assert_eq!(
            breakdown.conversation_stage, 85,
            "question markers outrank the frustration marker 'tired of'"
        );
        // 27 + 7.5 + 6 + 12 + 12.75 = 65.25
        assert_eq!(breakdown.total, 65);
        assert_eq!(
            Priority::from_total(breakdown.total, &Thresholds::default()),
            Priority::Medium
        );
    }

    #[test]
    fn empty_post_scores_low_on_baselines() {
        let scorer = Scorer::default();
        let breakdown = scorer.score(&post("", 0));
        assert_eq!(breakdown.icp_match, 30);
        assert_eq!(breakdown.topic_relevance, 25);
        assert_eq!(breakdown.reach_potential, 10);
        assert_eq!(breakdown.timing, 80);
        assert_eq!(breakdown.conversation_stage, 50);
        // 9 + 6.25 + 1.5 + 12 + 7.5 = 36.25
        assert_eq!(breakdown.total, 36);
        assert_eq!(
            Priority::from_total(breakdown.total, &Thresholds::default()),
            Priority::Low
        );
    }

    #[test]
    fn scoring_is_idempotent() {
        let scorer = Scorer::default();
        let p = post("anyone know a private storage option? tired of dropbox", 42);
        let first = scorer.score(&p);
        let second = scorer.score(&p);
        assert_eq!(first, second);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let scorer = Scorer::default();
        let upper = scorer.score(&post("TIRED OF BIG TECH, LOOKING FOR DROPBOX", 0));
        let lower = scorer.score(&post("tired of big tech, looking for dropbox", 0));
        assert_eq!(upper, lower);
    }

    #[test]
    fn icp_match_caps_at_100() {
        let text = "own my data data sovereignty self-sovereign decentralized \
                    peer-to-peer big tech walled gardens";
        let scorer = Scorer::default();
        let breakdown = scorer.score(&post(text, 0));
        assert_eq!(breakdown.icp_match, 100, "7*20 = 140 capped at 100");
    }

    #[test]
    fn low_value_terms_pull_score_to_baseline() {
        // One high-value term (+20), two low-value terms (-60): floored at
        // 0, then baseline.
        let scorer = Scorer::default();
        let breakdown = scorer.score(&post("decentralized nft airdrop", 0));
        assert_eq!(breakdown.icp_match, 30);
    }

    #[test]
    fn low_value_only_text_still_gets_baseline() {
        let scorer = Scorer::default();
        let breakdown = scorer.score(&post("nft presale to the moon", 0));
        assert_eq!(
            breakdown.icp_match, 30,
            "floor-at-0 then baseline applies even to spam-adjacent text"
        );
    }

    #[test]
    fn topic_relevance_caps_at_100() {
        let text = "decentralized storage encrypted storage private storage data privacy";
        let scorer = Scorer::default();
        let breakdown = scorer.score(&post(text, 0));
        assert_eq!(breakdown.topic_relevance, 100, "4*30 capped at 100");
    }

    #[test]
    fn reach_potential_step_boundaries() {
        assert_eq!(reach_potential(0), 10);
        assert_eq!(reach_potential(4), 10);
        assert_eq!(reach_potential(5), 25);
        assert_eq!(reach_potential(9), 25);
        assert_eq!(reach_potential(10), 40);
        assert_eq!(reach_potential(19), 40);
        assert_eq!(reach_potential(20), 60);
        assert_eq!(reach_potential(49), 60);
        assert_eq!(reach_potential(50), 80);
        assert_eq!(reach_potential(99), 80);
        assert_eq!(reach_potential(100), 100);
        assert_eq!(reach_potential(10_000), 100);
    }

    #[test]
    fn frustration_outranks_decided() {
        let scorer = Scorer::default();
        let breakdown = scorer.score(&post("i hate the tool i use daily", 0));
        assert_eq!(
            breakdown.conversation_stage, 75,
            "frustration checked before decided markers"
        );
    }

    #[test]
    fn decided_post_scores_stage_30() {
        let scorer = Scorer::default();
        let breakdown = scorer.score(&post("switched to a new provider, loving it", 0));
        assert_eq!(breakdown.conversation_stage, 30);
    }

    #[test]
    fn question_mark_alone_marks_question_stage() {
        let scorer = Scorer::default();
        let breakdown = scorer.score(&post("which provider is best?", 0));
        assert_eq!(breakdown.conversation_stage, 85);
    }

    #[test]
    fn total_rounds_half_up() {
        // Baselines with engagement 5: 9 + 6.25 + 3.75 + 12 + 7.5 = 38.5.
        let scorer = Scorer::default();
        let breakdown = scorer.score(&post("", 5));
        assert_eq!(breakdown.total, 39);
    }

    #[test]
    fn all_scores_stay_in_range() {
        let scorer = Scorer::default();
        let texts = [
            "",
            "nft airdrop presale token price b2b roi kpi",
            "own my data decentralized storage anyone know? tired of big tech \
             ipfs filecoin storj nextcloud syncthing proton dropbox aws azure",
        ];
        for text in texts {
            for engagement in [0, 7, 55, 10_000] {
                let b = scorer.score(&post(text, engagement));
                for value in [
                    b.icp_match,
                    b.topic_relevance,
                    b.reach_potential,
                    b.timing,
                    b.conversation_stage,
                    b.total,
                ] {
                    assert!(value <= 100, "score {value} out of range for {text:?}");
                }
            }
        }
    }

    #[test]
    fn fixture_vocabulary_swaps_cleanly() {
        let vocab = Vocabulary {
            high_value: &["widget"],
            question_signals: &[],
            low_value: &[],
            direct_relevance: &["gadget"],
            adjacent_topics: &[],
            question_markers: &[],
            frustration_markers: &[],
            decided_markers: &[],
        };
        let scorer = Scorer::new(vocab, Weights::default());
        let breakdown = scorer.score(&post("a widget and a gadget", 0));
        assert_eq!(breakdown.icp_match, 20);
        assert_eq!(breakdown.topic_relevance, 30);
        assert_eq!(breakdown.conversation_stage, 50, "no markers configured");
    }
}
