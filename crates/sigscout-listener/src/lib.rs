//! Platform listeners for sigscout.
//!
//! One fetcher per platform (Bluesky XRPC, `YouTube` Data API v3,
//! Twitter/X via an Apify actor), each mapping its provider's raw shape
//! into the platform-agnostic [`NormalizedPost`]. Fetchers deduplicate by
//! post id within a run, recover from per-query failures, and pace
//! successive queries to respect provider rate limits.

pub mod bluesky;
pub mod twitter;
pub mod youtube;

mod error;
mod pacing;
mod types;

pub use error::ListenerError;
pub use pacing::Pacing;
pub use types::{NormalizedPost, Platform};
