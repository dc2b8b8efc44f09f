//! Batch scheduling
//!
//! The full ordered unit list is partitioned into fixed-size batches.
//! Within a batch, units are processed with bounded concurrency and their
//! results collected in unit order; the concatenation is handed to the
//! sink as one append before the next batch starts. Batches therefore
//! bound in-flight memory and give crash recovery batch granularity: an
//! interrupted run loses at most one batch of progress.

use crate::config::HarvesterConfig;
use crate::harvest::retry::UnitOutcome;
use crate::sink::RecordSink;
use crate::{ExtractError, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};

/// Processes one unit to a terminal outcome
///
/// Implementations wrap a record source in the retry orchestrator, so the
/// scheduler only ever sees terminal states: records, a degraded empty
/// set, or a structural error that aborts the run.
#[async_trait]
pub trait UnitProcessor: Sync {
    type Unit: Sync;
    type Record: Send;

    /// Short human-readable unit name for progress logging
    fn describe(&self, unit: &Self::Unit) -> String;

    async fn process(&self, unit: &Self::Unit)
        -> std::result::Result<UnitOutcome<Self::Record>, ExtractError>;
}

/// Counters for one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub units_total: usize,
    pub units_succeeded: usize,
    pub units_degraded: usize,
    pub records_appended: usize,
    pub batches_flushed: usize,
}

/// Partitions units into batches and drives them through a worker pool
#[derive(Debug, Clone)]
pub struct BatchScheduler {
    batch_size: usize,
    workers: usize,
}

impl BatchScheduler {
    pub fn new(batch_size: usize, workers: usize) -> Self {
        Self {
            batch_size,
            workers,
        }
    }

    pub fn from_config(config: &HarvesterConfig) -> Self {
        Self::new(config.batch_size, config.workers)
    }

    /// Runs every unit, flushing the sink once per batch
    ///
    /// Batch-local ordering is preserved: within one append, records
    /// appear in unit order, and each unit's records in the order the
    /// source generated them. A structural error in any unit aborts the
    /// run once the rest of its batch has reached a terminal state; the
    /// aborting batch is not flushed.
    pub async fn run<P>(
        &self,
        processor: &P,
        units: Vec<P::Unit>,
        sink: &mut dyn RecordSink<P::Record>,
    ) -> Result<RunStats>
    where
        P: UnitProcessor,
    {
        let total_batches = units.len().div_ceil(self.batch_size);
        let mut stats = RunStats {
            units_total: units.len(),
            ..RunStats::default()
        };

        for (batch_index, batch) in units.chunks(self.batch_size).enumerate() {
            tracing::info!(
                "Batch {}/{}: dispatching {} units ({} workers)",
                batch_index + 1,
                total_batches,
                batch.len(),
                self.workers
            );

            // Bounded fan-out; buffered yields outcomes in unit order and
            // drives the whole batch to completion before we inspect any
            // failure
            let outcomes: Vec<_> = stream::iter(batch)
                .map(|unit| async move {
                    tracing::debug!("Processing {}", processor.describe(unit));
                    processor.process(unit).await
                })
                .buffered(self.workers)
                .collect()
                .await;

            let mut records = Vec::new();
            for outcome in outcomes {
                let outcome = outcome?;
                if outcome.state().is_success() {
                    stats.units_succeeded += 1;
                } else {
                    stats.units_degraded += 1;
                }
                records.extend(outcome.into_records());
            }

            sink.append(&records)?;
            stats.records_appended += records.len();
            stats.batches_flushed += 1;

            tracing::info!(
                "Batch {}/{} flushed: {} records",
                batch_index + 1,
                total_batches,
                records.len()
            );
        }

        Ok(stats)
    }
}
