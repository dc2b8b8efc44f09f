//! Pipeline coordination
//!
//! Wires planner, scheduler, and sinks together for the two pipelines.
//! `run_products` walks the catalog listing pages and appends product rows
//! plus the seed table the review pipeline consumes; `run_reviews` reads
//! that seed table back and appends review rows.

use crate::config::Config;
use crate::harvest::fetcher::HttpFetcher;
use crate::harvest::retry::{run_unit, RetryPolicy, UnitOutcome};
use crate::harvest::scheduler::{BatchScheduler, RunStats, UnitProcessor};
use crate::harvest::source;
use crate::plan::{listing_units, max_catalog_pages, read_seed_units, review_page_count};
use crate::record::{ListingUnit, ProductRecord, ReviewRecord, ReviewThreadUnit, SeedRecord};
use crate::sink::{CsvSink, DumpStore, RecordSink, SinkError};
use crate::{ExtractError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::{Duration, Instant};

/// Summary of one finished pipeline run
#[derive(Debug, Clone)]
pub struct HarvestReport {
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub stats: RunStats,
}

impl HarvestReport {
    fn new(started_at: DateTime<Utc>, elapsed: Duration, stats: RunStats) -> Self {
        Self {
            started_at,
            duration: elapsed,
            stats,
        }
    }
}

/// Processes one catalog listing page under the retry policy
struct ListingProcessor<'a> {
    fetcher: &'a dyn crate::harvest::PageFetcher,
    policy: RetryPolicy,
    dumps: DumpStore,
}

#[async_trait]
impl UnitProcessor for ListingProcessor<'_> {
    type Unit = ListingUnit;
    type Record = ProductRecord;

    fn describe(&self, unit: &ListingUnit) -> String {
        format!("listing page {}", unit.page_index)
    }

    async fn process(
        &self,
        unit: &ListingUnit,
    ) -> std::result::Result<UnitOutcome<ProductRecord>, ExtractError> {
        let label = self.describe(unit);
        run_unit(&self.policy, &label, &unit.url, self.fetcher, &self.dumps, || {
            source::listing_products(self.fetcher, unit)
        })
        .await
    }
}

/// Processes one product's review thread under the retry policy
struct ReviewProcessor<'a> {
    fetcher: &'a dyn crate::harvest::PageFetcher,
    policy: RetryPolicy,
    dumps: DumpStore,
}

#[async_trait]
impl UnitProcessor for ReviewProcessor<'_> {
    type Unit = ReviewThreadUnit;
    type Record = ReviewRecord;

    fn describe(&self, unit: &ReviewThreadUnit) -> String {
        format!("review thread {}", unit.base_url)
    }

    async fn process(
        &self,
        unit: &ReviewThreadUnit,
    ) -> std::result::Result<UnitOutcome<ReviewRecord>, ExtractError> {
        let label = self.describe(unit);
        run_unit(
            &self.policy,
            &label,
            &unit.base_url,
            self.fetcher,
            &self.dumps,
            || source::review_thread(self.fetcher, unit),
        )
        .await
    }
}

/// Product sink that also maintains the seed table
///
/// Every product row yields one seed row `(price, url, page_count)`, so
/// both tables advance together, one append per batch. Products with zero
/// reviews keep their seed row (page_count 0) so the table stays a full
/// index of the catalog.
struct ProductSink {
    products: CsvSink<ProductRecord>,
    seeds: CsvSink<SeedRecord>,
    page_size: u32,
}

impl ProductSink {
    fn open(products_path: &Path, seeds_path: &Path, page_size: u32) -> Result<Self> {
        Ok(Self {
            products: CsvSink::open(products_path)?,
            seeds: CsvSink::open(seeds_path)?,
            page_size,
        })
    }
}

impl RecordSink<ProductRecord> for ProductSink {
    fn append(&mut self, records: &[ProductRecord]) -> std::result::Result<(), SinkError> {
        let seeds: Vec<SeedRecord> = records
            .iter()
            .map(|record| SeedRecord {
                price: record.price,
                url: record.detail_url.clone(),
                page_count: review_page_count(record.review_count, self.page_size),
            })
            .collect();

        self.products.append(records)?;
        self.seeds.append(&seeds)
    }
}

/// Harvests every catalog listing page into the product and seed tables
pub async fn run_products(config: &Config) -> Result<HarvestReport> {
    let started_at = Utc::now();
    let clock = Instant::now();

    let fetcher = HttpFetcher::new()?;
    let max_page = max_catalog_pages(&fetcher, &config.catalog).await?;
    let units = listing_units(&config.catalog, max_page)?;

    tracing::info!(
        "Products run: {} listing pages, batch size {}, {} workers",
        units.len(),
        config.harvester.batch_size,
        config.harvester.workers
    );

    let processor = ListingProcessor {
        fetcher: &fetcher,
        policy: RetryPolicy::from_config(&config.harvester),
        dumps: DumpStore::new(&config.output.dump_dir),
    };
    let mut sink = ProductSink::open(
        Path::new(&config.output.products_path),
        Path::new(&config.output.seeds_path),
        config.catalog.page_size,
    )?;

    let scheduler = BatchScheduler::from_config(&config.harvester);
    let stats = scheduler.run(&processor, units, &mut sink).await?;

    let report = HarvestReport::new(started_at, clock.elapsed(), stats);
    log_report("products", &report);
    Ok(report)
}

/// Harvests every seeded review thread into the review table
pub async fn run_reviews(config: &Config) -> Result<HarvestReport> {
    let started_at = Utc::now();
    let clock = Instant::now();

    let units = read_seed_units(Path::new(&config.output.seeds_path))?;

    tracing::info!(
        "Reviews run: {} seeded threads, batch size {}, {} workers",
        units.len(),
        config.harvester.batch_size,
        config.harvester.workers
    );

    let fetcher = HttpFetcher::new()?;
    let processor = ReviewProcessor {
        fetcher: &fetcher,
        policy: RetryPolicy::from_config(&config.harvester),
        dumps: DumpStore::new(&config.output.dump_dir),
    };
    let mut sink: CsvSink<ReviewRecord> = CsvSink::open(Path::new(&config.output.reviews_path))?;

    let scheduler = BatchScheduler::from_config(&config.harvester);
    let stats = scheduler.run(&processor, units, &mut sink).await?;

    let report = HarvestReport::new(started_at, clock.elapsed(), stats);
    log_report("reviews", &report);
    Ok(report)
}

fn log_report(pipeline: &str, report: &HarvestReport) {
    tracing::info!(
        "{} run complete in {:.1?}: {} units ({} succeeded, {} degraded), {} records over {} batches",
        pipeline,
        report.duration,
        report.stats.units_total,
        report.stats.units_succeeded,
        report.stats.units_degraded,
        report.stats.records_appended,
        report.stats.batches_flushed
    );
}
