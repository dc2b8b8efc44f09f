//! Record sources
//!
//! One logical unit of work maps to zero or more records: a `ListingUnit`
//! is a single page fetch plus card extraction, a `ReviewThreadUnit` walks
//! every page of one product's review thread sequentially in ascending
//! page order. That per-unit ordering is a contract: a product's reviews
//! appear page-ascending in the output even when units interleave across
//! workers.

use crate::extract::{extract_listing_cards, extract_review_cards};
use crate::harvest::{FetchError, PageFetcher};
use crate::record::{ListingUnit, ProductRecord, ReviewRecord, ReviewThreadUnit};
use crate::ExtractError;
use thiserror::Error;
use url::Url;

/// Failure of one unit, split along the retry boundary
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transient failure; the orchestrator retries with a fixed delay
    #[error(transparent)]
    Retryable(#[from] FetchError),

    /// Structural failure; retrying cannot fix it, the run aborts
    #[error(transparent)]
    Fatal(#[from] ExtractError),
}

/// Fetches one catalog listing page and extracts its product cards
pub async fn listing_products(
    fetcher: &dyn PageFetcher,
    unit: &ListingUnit,
) -> Result<Vec<ProductRecord>, SourceError> {
    let body = fetcher.fetch(&unit.url).await?;
    let records = extract_listing_cards(&body, &unit.url)?;
    tracing::debug!(
        "Listing page {}: {} cards extracted",
        unit.page_index,
        records.len()
    );
    Ok(records)
}

/// Fetches every page of one product's review thread, in ascending order
///
/// Pages are requested sequentially within the unit; concurrency happens
/// across units, never inside one. A unit with `page_count == 0` performs
/// no fetches and yields no records.
pub async fn review_thread(
    fetcher: &dyn PageFetcher,
    unit: &ReviewThreadUnit,
) -> Result<Vec<ReviewRecord>, SourceError> {
    let base = Url::parse(&unit.base_url)
        .map_err(|_| ExtractError::UnitUrl(unit.base_url.clone()))?;

    let mut records = Vec::new();
    for page in 1..=unit.page_count {
        let page_url = base
            .join(&format!("?page={}", page))
            .map_err(|_| ExtractError::UnitUrl(unit.base_url.clone()))?;

        let body = fetcher.fetch(page_url.as_str()).await?;
        records.extend(extract_review_cards(&body, unit.price)?);
    }

    tracing::debug!(
        "Review thread {}: {} reviews over {} pages",
        unit.base_url,
        records.len(),
        unit.page_count
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records requested URLs and replays canned bodies in order
    struct ScriptedFetcher {
        bodies: Mutex<Vec<Result<String, FetchError>>>,
        requested: Mutex<Vec<String>>,
    }

    impl ScriptedFetcher {
        fn new(bodies: Vec<Result<String, FetchError>>) -> Self {
            Self {
                bodies: Mutex::new(bodies),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for ScriptedFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.requested.lock().unwrap().push(url.to_string());
            self.bodies.lock().unwrap().remove(0)
        }
    }

    fn review_page(title: &str) -> String {
        format!(
            r#"<div class="review-list__content">
                 <h3 class="review-list__title">{title}</h3>
               </div>"#
        )
    }

    #[tokio::test]
    async fn test_review_thread_pages_ascending() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(review_page("page one")),
            Ok(review_page("page two")),
            Ok(review_page("page three")),
        ]);
        let unit = ReviewThreadUnit {
            price: 8000,
            base_url: "https://catalog.example.com/x/42/review/".to_string(),
            page_count: 3,
        };

        let records = review_thread(&fetcher, &unit).await.unwrap();

        let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["page one", "page two", "page three"]);
        assert!(records.iter().all(|r| r.price == 8000));

        let requested = fetcher.requested.lock().unwrap().clone();
        assert_eq!(
            requested,
            [
                "https://catalog.example.com/x/42/review/?page=1",
                "https://catalog.example.com/x/42/review/?page=2",
                "https://catalog.example.com/x/42/review/?page=3",
            ]
        );
    }

    #[tokio::test]
    async fn test_review_thread_zero_pages_fetches_nothing() {
        let fetcher = ScriptedFetcher::new(vec![]);
        let unit = ReviewThreadUnit {
            price: 8000,
            base_url: "https://catalog.example.com/x/42/review/".to_string(),
            page_count: 0,
        };

        let records = review_thread(&fetcher, &unit).await.unwrap();
        assert!(records.is_empty());
        assert!(fetcher.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_review_thread_mid_page_fetch_error_is_retryable() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(review_page("page one")),
            Err(FetchError::Timeout {
                url: "https://catalog.example.com/x/42/review/?page=2".to_string(),
            }),
        ]);
        let unit = ReviewThreadUnit {
            price: 8000,
            base_url: "https://catalog.example.com/x/42/review/".to_string(),
            page_count: 2,
        };

        let err = review_thread(&fetcher, &unit).await.unwrap_err();
        assert!(matches!(err, SourceError::Retryable(_)));
    }

    #[tokio::test]
    async fn test_review_thread_malformed_base_url_is_fatal() {
        let fetcher = ScriptedFetcher::new(vec![]);
        let unit = ReviewThreadUnit {
            price: 0,
            base_url: "not a url".to_string(),
            page_count: 1,
        };

        let err = review_thread(&fetcher, &unit).await.unwrap_err();
        assert!(matches!(err, SourceError::Fatal(_)));
    }

    #[tokio::test]
    async fn test_listing_products_fatal_on_pattern_miss() {
        let html = r#"<div class="card-product">
            <span class="card-product__price">1,000&#160;円</span>
            <a class="card-product__comment" href="/x/1/review/">感想なし</a>
        </div>"#;
        let fetcher = ScriptedFetcher::new(vec![Ok(html.to_string())]);
        let unit = ListingUnit {
            url: "https://catalog.example.com/search?sort=11&page=1".to_string(),
            page_index: 1,
        };

        let err = listing_products(&fetcher, &unit).await.unwrap_err();
        assert!(matches!(err, SourceError::Fatal(_)));
    }
}
