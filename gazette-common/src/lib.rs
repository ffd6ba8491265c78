//! Common types and utilities shared across Gazette crates.
//!
//! This crate defines the feed data model, the shared error type, the browser
//! stealth level, and observability helpers used throughout the Gazette
//! workspace. It stays dependency‑light so that every crate can depend on it
//! without introducing heavy transitive costs.
//!
//! # Overview
//!
//! - [`feed`]: [`FeedItem`] and [`FeedResult`], the records handed to the
//!   aggregation layer
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`GazetteError`] and [`Result`]: Shared error handling
//! - [`StealthLevel`]: How aggressively browser sessions hide automation
//!
//! # Examples
//!
//! ```rust
//! use gazette_common::{FeedResult, StealthLevel};
//!
//! let feed = FeedResult::new("cdzj", "https://example.com", "cdzj_des", vec![]);
//! assert!(feed.item.is_empty());
//! assert_eq!(StealthLevel::default(), StealthLevel::Balanced);
//! ```
use serde::{Deserialize, Serialize};

pub mod feed;
pub mod observability;

pub use feed::{FeedItem, FeedResult};

/// Browser automation stealth level.
///
/// Every level hides `navigator.webdriver` and the automation switches;
/// higher levels add canvas and WebGL fingerprint noise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StealthLevel {
    Lightweight,
    #[default]
    Balanced,
    Maximum,
}

/// Error types used across the Gazette system.
#[derive(thiserror::Error, Debug)]
pub enum GazetteError {
    /// The target could not be reached or the page load did not finish.
    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// Network activity never settled within the idle wait window.
    #[error("Page never reached network idle (waited {waited_ms} ms)")]
    RenderTimeout { waited_ms: u64 },

    /// Reading the rendered markup back from the browser failed.
    #[error("Capture error: {0}")]
    Capture(String),

    /// The browser session could not be shut down cleanly.
    #[error("Session close error: {0}")]
    SessionClose(String),

    /// A driver (browser, WebDriver endpoint, etc.) reported an error.
    #[error("Driver error: {0}")]
    Driver(#[from] anyhow::Error),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A route returned without writing its feed into the context.
    #[error("Route {0} finished without producing a feed")]
    EmptyState(String),

    /// No route is registered for the requested source kind or id.
    #[error("Unknown source: {0}")]
    UnknownSource(String),
}

/// Convenient alias for results that use [`GazetteError`].
pub type Result<T> = std::result::Result<T, GazetteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stealth_level_uses_lowercase_names() {
        let level: StealthLevel = serde_json::from_str("\"maximum\"").unwrap();
        assert_eq!(level, StealthLevel::Maximum);
        assert_eq!(
            serde_json::to_string(&StealthLevel::Lightweight).unwrap(),
            "\"lightweight\""
        );
    }

    #[test]
    fn errors_render_their_context() {
        let err = GazetteError::Navigation {
            url: "https://example.com".into(),
            reason: "dns failure".into(),
        };
        assert_eq!(
            err.to_string(),
            "Navigation to https://example.com failed: dns failure"
        );

        let err = GazetteError::RenderTimeout { waited_ms: 30_000 };
        assert!(err.to_string().contains("30000 ms"));

        let err: GazetteError = anyhow::anyhow!("chromedriver refused connection").into();
        assert!(matches!(err, GazetteError::Driver(_)));
    }
}
