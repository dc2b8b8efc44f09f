//! Harvest engine
//!
//! Everything between the planner and the sink: the fetch capability, the
//! per-unit record sources, the retry orchestrator, the batch scheduler,
//! and the coordinator that wires a whole pipeline run together.

mod coordinator;
mod fetcher;
mod retry;
mod scheduler;
mod source;

pub use coordinator::{run_products, run_reviews, HarvestReport};
pub use fetcher::{FetchError, HttpFetcher, PageFetcher};
pub use retry::{run_unit, RetryPolicy, UnitOutcome};
pub use scheduler::{BatchScheduler, RunStats, UnitProcessor};
pub use source::{listing_products, review_thread, SourceError};
