//! Kansou-Harvest: an incremental e-commerce review harvester
//!
//! This crate turns a large paginated product catalog into normalized CSV
//! rows. It runs two pipelines: `products` walks every catalog listing page
//! and extracts one product row per listing card, and `reviews` walks each
//! product's paginated review thread and extracts one row per review.
//! Both pipelines fan work out over a bounded worker pool, retry transient
//! failures with a fixed delay, and flush results batch by batch so an
//! interrupted run loses at most one batch of progress.

pub mod config;
pub mod extract;
pub mod harvest;
pub mod plan;
pub mod record;
pub mod sink;

use thiserror::Error;

/// Main error type for harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] harvest::FetchError),

    #[error("Sink error: {0}")]
    Sink(#[from] sink::SinkError),

    #[error("Seed table error: {0}")]
    Seed(#[from] csv::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Structural extraction errors
///
/// These signal that a page no longer matches the extraction rules the
/// harvester was built against. They are never retried: a stale selector
/// cannot be fixed by fetching the same page again, so the run aborts and
/// surfaces the mismatch to the operator.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Catalog page-count indicator not found at {url}")]
    PageIndicator { url: String },

    #[error("Review-count pattern missing in {url}: {text:?}")]
    ReviewCountPattern { url: String, text: String },

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("Malformed unit URL: {0}")]
    UnitUrl(String),
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use harvest::{FetchError, HttpFetcher, PageFetcher};
pub use record::{ListingUnit, ProductRecord, ReviewRecord, ReviewThreadUnit, SeedRecord, UnitState};
