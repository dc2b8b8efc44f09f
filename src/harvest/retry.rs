//! Retry orchestration
//!
//! Drives one unit from pending to a terminal state. Transient failures
//! are retried on an explicit bounded loop with a fixed delay (a counter,
//! never recursion, so pathological repeated failures cannot grow the
//! stack). A unit that exhausts its budget is degraded: its raw document
//! is captured for offline inspection and it contributes an empty record
//! set, but the run continues. Structural failures short-circuit with no
//! retries, because a stale extraction rule cannot be fixed by refetching.

use crate::config::HarvesterConfig;
use crate::harvest::source::SourceError;
use crate::harvest::PageFetcher;
use crate::record::UnitState;
use crate::sink::DumpStore;
use crate::ExtractError;
use std::future::Future;
use std::time::Duration;

/// Bounded retry-with-delay policy
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per unit, including the first
    pub attempts: u32,

    /// Fixed delay between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    pub fn from_config(config: &HarvesterConfig) -> Self {
        Self::new(
            config.retry_limit,
            Duration::from_secs(config.retry_delay_secs),
        )
    }
}

/// Terminal outcome of one unit
#[derive(Debug)]
pub enum UnitOutcome<R> {
    /// Unit produced its records
    Success(Vec<R>),

    /// Unit exhausted its retry budget; it contributes nothing
    Degraded,
}

impl<R> UnitOutcome<R> {
    pub fn state(&self) -> UnitState {
        match self {
            Self::Success(_) => UnitState::Succeeded,
            Self::Degraded => UnitState::Degraded,
        }
    }

    /// Records for the sink; a degraded unit yields an empty set
    pub fn into_records(self) -> Vec<R> {
        match self {
            Self::Success(records) => records,
            Self::Degraded => Vec::new(),
        }
    }
}

/// Runs one unit's source operation under the retry policy
///
/// `op` is re-invoked for each attempt; `dump_url` names the unit's
/// primary page, which is captured to the dump store if the unit degrades.
///
/// # Returns
///
/// * `Ok(UnitOutcome::Success(records))` - some attempt succeeded
/// * `Ok(UnitOutcome::Degraded)` - every attempt failed transiently
/// * `Err(ExtractError)` - a structural failure, propagated with no retry
pub async fn run_unit<R, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    dump_url: &str,
    fetcher: &dyn PageFetcher,
    dumps: &DumpStore,
    mut op: F,
) -> Result<UnitOutcome<R>, ExtractError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Vec<R>, SourceError>>,
{
    let mut attempt: u32 = 1;

    loop {
        tracing::trace!(unit = label, state = %UnitState::Fetching, attempt, "processing unit");

        match op().await {
            Ok(records) => {
                tracing::debug!(
                    unit = label,
                    state = %UnitState::Succeeded,
                    records = records.len(),
                    "unit complete"
                );
                return Ok(UnitOutcome::Success(records));
            }

            Err(SourceError::Fatal(e)) => {
                tracing::error!(unit = label, "structural failure: {}", e);
                return Err(e);
            }

            Err(SourceError::Retryable(e)) => {
                if attempt >= policy.attempts {
                    tracing::warn!(
                        unit = label,
                        state = %UnitState::Degraded,
                        "giving up after {} attempts: {}",
                        attempt,
                        e
                    );
                    capture_dump(fetcher, dumps, dump_url).await;
                    return Ok(UnitOutcome::Degraded);
                }

                tracing::warn!(
                    unit = label,
                    attempt,
                    "transient failure, retrying in {:?}: {}",
                    policy.delay,
                    e
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}

/// Persists the unit's raw document for offline inspection
///
/// Best effort only: a unit that is being degraded must not be able to
/// fail the run through its diagnostics.
async fn capture_dump(fetcher: &dyn PageFetcher, dumps: &DumpStore, url: &str) {
    match fetcher.fetch(url).await {
        Ok(body) => match dumps.save(url, &body) {
            Ok(path) => tracing::warn!("Saved raw document for {} to {}", url, path.display()),
            Err(e) => tracing::warn!("Failed to save raw document for {}: {}", url, e),
        },
        Err(e) => tracing::warn!("Could not capture raw document for {}: {}", url, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harvest::FetchError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tempfile::TempDir;

    struct StaticFetcher;

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
            Ok("<html>raw</html>".to_string())
        }
    }

    fn fast_policy(attempts: u32) -> RetryPolicy {
        RetryPolicy::new(attempts, Duration::from_millis(0))
    }

    fn timeout_error() -> SourceError {
        SourceError::Retryable(FetchError::Timeout {
            url: "https://catalog.example.com/search?page=1".to_string(),
        })
    }

    #[tokio::test]
    async fn test_immediate_success() {
        let dumps = TempDir::new().unwrap();
        let store = DumpStore::new(dumps.path());

        let outcome = run_unit(
            &fast_policy(5),
            "unit",
            "https://catalog.example.com/search?page=1",
            &StaticFetcher,
            &store,
            || async { Ok(vec![1, 2, 3]) },
        )
        .await
        .unwrap();

        assert_eq!(outcome.into_records(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_fail_twice_then_succeed_yields_same_records() {
        let dumps = TempDir::new().unwrap();
        let store = DumpStore::new(dumps.path());
        let calls = AtomicU32::new(0);

        let outcome = run_unit(
            &fast_policy(5),
            "unit",
            "https://catalog.example.com/search?page=1",
            &StaticFetcher,
            &store,
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(timeout_error())
                    } else {
                        Ok(vec!["row-a", "row-b"])
                    }
                }
            },
        )
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(outcome.state().is_success());
        assert_eq!(outcome.into_records(), vec!["row-a", "row-b"]);
    }

    #[tokio::test]
    async fn test_exhaustion_degrades_and_dumps() {
        let dumps = TempDir::new().unwrap();
        let store = DumpStore::new(dumps.path());
        let calls = AtomicU32::new(0);

        let outcome: UnitOutcome<&str> = run_unit(
            &fast_policy(5),
            "unit",
            "https://catalog.example.com/search?page=1",
            &StaticFetcher,
            &store,
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(timeout_error()) }
            },
        )
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert_eq!(outcome.state(), UnitState::Degraded);
        assert!(outcome.into_records().is_empty());

        // The raw document was captured for offline inspection
        let entries: Vec<_> = std::fs::read_dir(dumps.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_fatal_short_circuits_with_no_retry() {
        let dumps = TempDir::new().unwrap();
        let store = DumpStore::new(dumps.path());
        let calls = AtomicU32::new(0);

        let result: Result<UnitOutcome<&str>, _> = run_unit(
            &fast_policy(5),
            "unit",
            "https://catalog.example.com/search?page=1",
            &StaticFetcher,
            &store,
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(SourceError::Fatal(ExtractError::ReviewCountPattern {
                        url: "https://catalog.example.com/search?page=1".to_string(),
                        text: "感想".to_string(),
                    }))
                }
            },
        )
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_remote_error_payload_is_retried() {
        let dumps = TempDir::new().unwrap();
        let store = DumpStore::new(dumps.path());
        let calls = AtomicU32::new(0);

        let outcome = run_unit(
            &fast_policy(3),
            "unit",
            "https://catalog.example.com/search?page=1",
            &StaticFetcher,
            &store,
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(SourceError::Retryable(FetchError::Remote {
                            url: "https://catalog.example.com/search?page=1".to_string(),
                            message: "unexpected payload".to_string(),
                        }))
                    } else {
                        Ok(vec![42])
                    }
                }
            },
        )
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(outcome.into_records(), vec![42]);
    }
}
