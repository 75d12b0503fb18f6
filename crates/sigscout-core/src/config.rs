use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::ConfigError;

/// Top-level application configuration, deserialized from `config.yaml`.
///
/// Every section has serde defaults so a minimal config file (or an empty
/// one) still produces a runnable — if mostly disabled — configuration.
/// Credentials may be left blank in the file and supplied via the
/// environment instead (see [`AppConfig::apply_env_overrides`]).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub listener: ListenerConfig,
    pub scorer: ScorerConfig,
    pub briefing: BriefingConfig,
    pub paths: PathsConfig,
    pub bluesky: BlueskyCredentials,
    pub youtube: YoutubeCredentials,
    pub apify: ApifyCredentials,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    pub bluesky: BlueskyListener,
    pub youtube: YoutubeListener,
    pub twitter: TwitterListener,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BlueskyListener {
    pub enabled: bool,
    pub posts_per_query: u32,
    pub language: String,
    /// Delay between successive search queries, in milliseconds.
    pub delay_ms: u64,
}

impl Default for BlueskyListener {
    fn default() -> Self {
        Self {
            enabled: false,
            posts_per_query: 25,
            language: "en".to_string(),
            delay_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct YoutubeListener {
    pub enabled: bool,
    pub videos_per_query: u32,
    pub language: String,
    /// Only videos published within this many days are searched.
    pub max_age_days: u32,
    pub delay_ms: u64,
}

impl Default for YoutubeListener {
    fn default() -> Self {
        Self {
            enabled: false,
            videos_per_query: 10,
            language: "en".to_string(),
            max_age_days: 90,
            delay_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TwitterListener {
    pub enabled: bool,
    pub tweets_per_query: u32,
    pub language: String,
    /// Tweets below either threshold are not persisted to the signal inbox.
    pub min_likes: u64,
    pub min_replies: u64,
    pub delay_ms: u64,
}

impl Default for TwitterListener {
    fn default() -> Self {
        Self {
            enabled: false,
            tweets_per_query: 20,
            language: "en".to_string(),
            min_likes: 0,
            min_replies: 0,
            delay_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    pub thresholds: ThresholdConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub high: u32,
    pub medium: u32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            high: 70,
            medium: 50,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BriefingConfig {
    /// How many posts get a detailed entry in the briefing.
    pub max_results: usize,
    pub output_dir: PathBuf,
}

impl Default for BriefingConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            output_dir: PathBuf::from("Daily Review"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub queries_dir: PathBuf,
    pub context_dir: PathBuf,
    pub signals_inbox: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            queries_dir: PathBuf::from("queries"),
            context_dir: PathBuf::from("Context"),
            signals_inbox: PathBuf::from("Signals/Inbox"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlueskyCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct YoutubeCredentials {
    pub api_key: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApifyCredentials {
    pub api_token: String,
}

/// Load, override, and validate the application configuration.
///
/// An absent or unparsable config file is the one fatal configuration
/// condition: callers are expected to exit nonzero on `Err` here.
/// Per-platform problems (missing credentials, empty query lists) are
/// not errors — they surface later as skipped platforms.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or parsed, or if
/// validation fails.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut config: AppConfig =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })?;

    config.apply_env_overrides();
    validate(&config)?;

    Ok(config)
}

impl AppConfig {
    /// Override credentials from the process environment.
    ///
    /// Secrets do not belong in `config.yaml` on shared machines; any of
    /// `SIGSCOUT_BLUESKY_USERNAME`, `SIGSCOUT_BLUESKY_PASSWORD`,
    /// `SIGSCOUT_YOUTUBE_API_KEY`, and `SIGSCOUT_APIFY_TOKEN` takes
    /// precedence over the file value when set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_with(|key| std::env::var(key).ok());
    }

    /// Core override logic, decoupled from the actual environment so it
    /// can be tested with a plain closure.
    fn apply_env_overrides_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SIGSCOUT_BLUESKY_USERNAME") {
            self.bluesky.username = v;
        }
        if let Some(v) = lookup("SIGSCOUT_BLUESKY_PASSWORD") {
            self.bluesky.password = v;
        }
        if let Some(v) = lookup("SIGSCOUT_YOUTUBE_API_KEY") {
            self.youtube.api_key = v;
        }
        if let Some(v) = lookup("SIGSCOUT_APIFY_TOKEN") {
            self.apify.api_token = v;
        }
    }
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let thresholds = config.scorer.thresholds;
    if thresholds.high < thresholds.medium {
        return Err(ConfigError::Validation(format!(
            "scorer.thresholds.high ({}) must be >= scorer.thresholds.medium ({})",
            thresholds.high, thresholds.medium
        )));
    }

    if config.listener.bluesky.posts_per_query == 0 {
        return Err(ConfigError::Validation(
            "listener.bluesky.posts_per_query must be nonzero".to_string(),
        ));
    }
    if config.listener.youtube.videos_per_query == 0 {
        return Err(ConfigError::Validation(
            "listener.youtube.videos_per_query must be nonzero".to_string(),
        ));
    }
    if config.listener.twitter.tweets_per_query == 0 {
        return Err(ConfigError::Validation(
            "listener.twitter.tweets_per_query must be nonzero".to_string(),
        ));
    }

    if config.briefing.max_results == 0 {
        return Err(ConfigError::Validation(
            "briefing.max_results must be nonzero".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load_config(Path::new("/nonexistent/config.yaml"));
        assert!(
            matches!(result, Err(ConfigError::Io { .. })),
            "expected Io error, got {result:?}"
        );
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let file = write_config("listener: [not a mapping");
        let result = load_config(file.path());
        assert!(
            matches!(result, Err(ConfigError::Parse { .. })),
            "expected Parse error, got {result:?}"
        );
    }

    #[test]
    fn empty_mapping_gets_defaults() {
        let file = write_config("{}");
        let config = load_config(file.path()).expect("defaults should load");
        assert!(!config.listener.bluesky.enabled);
        assert_eq!(config.listener.bluesky.posts_per_query, 25);
        assert_eq!(config.listener.youtube.videos_per_query, 10);
        assert_eq!(config.listener.youtube.max_age_days, 90);
        assert_eq!(config.listener.twitter.tweets_per_query, 20);
        assert_eq!(config.scorer.thresholds.high, 70);
        assert_eq!(config.scorer.thresholds.medium, 50);
        assert_eq!(config.briefing.max_results, 10);
        assert_eq!(config.paths.queries_dir, PathBuf::from("queries"));
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let file = write_config(
            "listener:\n  bluesky:\n    enabled: true\n    posts_per_query: 5\n",
        );
        let config = load_config(file.path()).expect("partial config should load");
        assert!(config.listener.bluesky.enabled);
        assert_eq!(config.listener.bluesky.posts_per_query, 5);
        assert_eq!(config.listener.bluesky.language, "en");
        assert!(!config.listener.youtube.enabled);
    }

    #[test]
    fn inverted_thresholds_rejected() {
        let file = write_config("scorer:\n  thresholds:\n    high: 40\n    medium: 50\n");
        let result = load_config(file.path());
        assert!(
            matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("thresholds")),
            "expected threshold validation error, got {result:?}"
        );
    }

    #[test]
    fn zero_posts_per_query_rejected() {
        let file = write_config("listener:\n  bluesky:\n    posts_per_query: 0\n");
        let result = load_config(file.path());
        assert!(
            matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("posts_per_query")),
            "expected posts_per_query validation error, got {result:?}"
        );
    }

    #[test]
    fn env_overrides_replace_file_credentials() {
        let mut config = AppConfig {
            bluesky: BlueskyCredentials {
                username: "from-file".to_string(),
                password: String::new(),
            },
            ..AppConfig::default()
        };
        config.apply_env_overrides_with(|key| match key {
            "SIGSCOUT_BLUESKY_USERNAME" => Some("from-env".to_string()),
            "SIGSCOUT_APIFY_TOKEN" => Some("token-env".to_string()),
            _ => None,
        });
        assert_eq!(config.bluesky.username, "from-env");
        assert_eq!(config.apify.api_token, "token-env");
        // Untouched keys keep their file values.
        assert_eq!(config.youtube.api_key, "");
    }

    #[test]
    fn load_config_from_real_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config.yaml");
        assert!(
            path.exists(),
            "config.yaml missing at {path:?} — required for this test"
        );
        let result = load_config(&path);
        assert!(result.is_ok(), "failed to load config.yaml: {result:?}");
    }

    #[test]
    fn credentials_parsed_from_file() {
        let file = write_config(
            "bluesky:\n  username: scout.bsky.social\n  password: app-pass\nyoutube:\n  api_key: yt-key\napify:\n  api_token: apify-token\n",
        );
        let config = load_config(file.path()).expect("credentials should load");
        assert_eq!(config.bluesky.username, "scout.bsky.social");
        assert_eq!(config.bluesky.password, "app-pass");
        assert_eq!(config.youtube.api_key, "yt-key");
        assert_eq!(config.apify.api_token, "apify-token");
    }
}
