//! Configuration loading for sigscout.
//!
//! Everything the pipeline reads at startup lives here: the YAML app
//! config (`config.yaml`), per-platform query lists, and the optional
//! free-text context files.

use thiserror::Error;

mod config;
mod context;
mod queries;

pub use config::{
    load_config, AppConfig, ApifyCredentials, BlueskyCredentials, BlueskyListener,
    BriefingConfig, ListenerConfig, PathsConfig, ScorerConfig, ThresholdConfig,
    TwitterListener, YoutubeCredentials, YoutubeListener,
};
pub use context::load_context;
pub use queries::load_queries;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Validation(String),
}
