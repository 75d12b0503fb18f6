//! ICP scoring for sigscout.
//!
//! A pure, deterministic scorer: each post's text and engagement counters
//! map to five sub-scores and a weighted total, which the prioritizer
//! buckets into high/medium/low tiers. Vocabulary and weights are plain
//! data injected at construction so tests can swap in fixtures.

mod priority;
mod scorer;
mod types;
mod vocab;

pub use priority::{Priority, Thresholds};
pub use scorer::{reach_potential, Scorer, Weights};
pub use types::{ScoreBreakdown, ScoredPost};
pub use vocab::Vocabulary;
