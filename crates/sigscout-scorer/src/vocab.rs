//! ICP vocabulary: the term lists the scorer matches against.
//!
//! All matching is case-insensitive substring presence, so multi-word
//! phrases must appear lowercased here exactly as they would in text.

/// Language patterns characteristic of the ideal customer profile.
const HIGH_VALUE_TERMS: &[&str] = &[
    "own my data",
    "data sovereignty",
    "self-sovereign",
    "privacy by design",
    "decentralized",
    "peer-to-peer",
    "no single point of failure",
    "big tech",
    "walled gardens",
    "surveillance capitalism",
    "self-hosting",
    "homelab",
    "cypherpunk",
    "open web",
    "the web we were promised",
    "digital rights",
    "data ownership",
];

/// Question/exploration signals; weighted above plain profile matches.
const QUESTION_SIGNALS: &[&str] = &[
    "is there an alternative",
    "looking for",
    "anyone know",
    "what's actually",
    "recommendations for",
    "trying to find",
    "frustrated with",
    "tired of",
    "concerned about",
    "worried about",
];

/// Speculation/enterprise language that marks a poor outreach fit.
const LOW_VALUE_TERMS: &[&str] = &[
    "token price",
    "to the moon",
    "nft",
    "airdrop",
    "presale",
    "enterprise solution",
    "b2b",
    "roi",
    "kpi",
];

/// Topics directly covered by the offering.
const DIRECT_RELEVANCE: &[&str] = &[
    "decentralized storage",
    "encrypted storage",
    "private storage",
    "data privacy",
    "end-to-end encryption",
    "self-encrypting",
    "no servers",
    "serverless",
    "permanent storage",
    "censorship resistant",
];

/// Adjacent or comparative topics worth monitoring.
const ADJACENT_TOPICS: &[&str] = &[
    "ipfs",
    "filecoin",
    "storj",
    "sia",
    "nextcloud",
    "syncthing",
    "proton",
    "signal",
    "cloud storage",
    "google drive",
    "dropbox",
    "aws",
    "azure",
    "cloud costs",
];

/// Markers of an open question or active search.
const QUESTION_MARKERS: &[&str] = &["?", "anyone", "looking for", "recommendations", "trying to"];

/// Markers of frustration with a current solution.
const FRUSTRATION_MARKERS: &[&str] = &["frustrated", "tired of", "hate", "annoyed", "sick of"];

/// Markers that the author has already settled on something.
const DECIDED_MARKERS: &[&str] = &["i use", "switched to", "moved to", "loving"];

/// The term lists driving [`crate::Scorer`], injected at construction so
/// tests can substitute small fixtures without touching scoring logic.
#[derive(Debug, Clone, Copy)]
pub struct Vocabulary {
    pub high_value: &'static [&'static str],
    pub question_signals: &'static [&'static str],
    pub low_value: &'static [&'static str],
    pub direct_relevance: &'static [&'static str],
    pub adjacent_topics: &'static [&'static str],
    pub question_markers: &'static [&'static str],
    pub frustration_markers: &'static [&'static str],
    pub decided_markers: &'static [&'static str],
}

impl Default for Vocabulary {
    /// The built-in ICP vocabulary.
    fn default() -> Self {
        Self {
            high_value: HIGH_VALUE_TERMS,
            question_signals: QUESTION_SIGNALS,
            low_value: LOW_VALUE_TERMS,
            direct_relevance: DIRECT_RELEVANCE,
            adjacent_topics: ADJACENT_TOPICS,
            question_markers: QUESTION_MARKERS,
            frustration_markers: FRUSTRATION_MARKERS,
            decided_markers: DECIDED_MARKERS,
        }
    }
}
