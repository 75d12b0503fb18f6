/// Source platform of a normalized post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Bluesky,
    Youtube,
    Twitter,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Bluesky => write!(f, "bluesky"),
            Platform::Youtube => write!(f, "youtube"),
            Platform::Twitter => write!(f, "twitter"),
        }
    }
}

/// A platform-agnostic post record, the unit flowing through the
/// dedup → score → rank pipeline.
///
/// Every field is populated by the owning platform's normalization with
/// explicit defaults (0 for counts, empty string for text) when the
/// provider omits a value. `created_at` keeps the platform-native
/// ISO-8601 string; nothing downstream parses it.
#[derive(Debug, Clone)]
pub struct NormalizedPost {
    pub platform: Platform,
    /// Platform-native identifier, unique per platform within a run.
    pub post_id: String,
    /// Canonical web-viewable link.
    pub url: String,
    pub author_handle: String,
    pub author_name: String,
    /// Body content used for scoring; empty allowed, never absent.
    pub text: String,
    pub created_at: String,
    pub likes: u64,
    pub replies: u64,
    pub reposts: u64,
    pub views: u64,
    /// The search term that surfaced this record.
    pub matched_query: String,
    /// Twitter only: whether this post replies to another. False elsewhere.
    pub is_reply: bool,
    /// Twitter only: author follower count, for the signal inbox.
    pub author_followers: u64,
    /// Twitter only: author bio, for the signal inbox.
    pub author_bio: String,
}

impl NormalizedPost {
    /// Sum of interaction counters used as a reach proxy.
    ///
    /// Uniform across platforms because `YouTube` normalization maps
    /// comments to `replies` and leaves `reposts` at 0.
    #[must_use]
    pub fn engagement_total(&self) -> u64 {
        self.likes + self.replies + self.reposts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(platform: Platform, id: &str) -> NormalizedPost {
        NormalizedPost {
            platform,
            post_id: id.to_string(),
            url: String::new(),
            author_handle: String::new(),
            author_name: String::new(),
            text: String::new(),
            created_at: String::new(),
            likes: 0,
            replies: 0,
            reposts: 0,
            views: 0,
            matched_query: String::new(),
            is_reply: false,
            author_followers: 0,
            author_bio: String::new(),
        }
    }

    #[test]
    fn engagement_total_sums_likes_replies_reposts() {
        let mut p = post(Platform::Bluesky, "a");
        p.likes = 3;
        p.replies = 4;
        p.reposts = 5;
        p.views = 1000;
        assert_eq!(p.engagement_total(), 12, "views must not count");
    }

    #[test]
    fn platform_display_is_lowercase() {
        assert_eq!(Platform::Bluesky.to_string(), "bluesky");
        assert_eq!(Platform::Youtube.to_string(), "youtube");
        assert_eq!(Platform::Twitter.to_string(), "twitter");
    }
}
