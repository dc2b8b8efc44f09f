use serde::Deserialize;

/// Main configuration structure for Kansou-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub harvester: HarvesterConfig,
    pub output: OutputConfig,
}

/// Catalog site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Root URL of the paginated catalog listing
    #[serde(rename = "root-url")]
    pub root_url: String,

    /// Number of reviews shown per review-thread page (fixed by the site)
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: u32,
}

/// Harvester behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HarvesterConfig {
    /// Number of units dispatched together before each sink flush
    #[serde(rename = "batch-size")]
    pub batch_size: usize,

    /// Maximum number of units processed concurrently within a batch
    pub workers: usize,

    /// Total number of attempts per unit before it is degraded
    #[serde(rename = "retry-limit", default = "default_retry_limit")]
    pub retry_limit: u32,

    /// Fixed delay between attempts (seconds)
    #[serde(rename = "retry-delay-secs", default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the product rows CSV
    #[serde(rename = "products-path")]
    pub products_path: String,

    /// Path to the review rows CSV
    #[serde(rename = "reviews-path")]
    pub reviews_path: String,

    /// Path to the seed table (price, review URL, page count)
    #[serde(rename = "seeds-path")]
    pub seeds_path: String,

    /// Directory for raw-document dumps of degraded units
    #[serde(rename = "dump-dir")]
    pub dump_dir: String,
}

fn default_page_size() -> u32 {
    10
}

fn default_retry_limit() -> u32 {
    5
}

fn default_retry_delay_secs() -> u64 {
    5
}
