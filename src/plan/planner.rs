use crate::config::CatalogConfig;
use crate::extract::parse_last_page;
use crate::harvest::PageFetcher;
use crate::record::ListingUnit;
use crate::{HarvestError, Result};
use url::Url;

/// Reads the catalog root and returns the highest listing page index
///
/// This runs once, before any units exist, and is deliberately not wrapped
/// in the retry orchestrator: a missing indicator means the catalog
/// structure changed, and without a page count there is no unit list to
/// degrade around, so the pipeline aborts immediately.
pub async fn max_catalog_pages(fetcher: &dyn PageFetcher, catalog: &CatalogConfig) -> Result<u32> {
    let body = fetcher.fetch(&catalog.root_url).await?;
    let max_page = parse_last_page(&body, &catalog.root_url)?;
    tracing::info!("{} catalog pages found", max_page);
    Ok(max_page)
}

/// Expands the catalog into one `ListingUnit` per page, 1..=max_page
///
/// Page URLs are the root URL with a `page` query parameter appended, so
/// roots that already carry query parameters keep them.
pub fn listing_units(catalog: &CatalogConfig, max_page: u32) -> Result<Vec<ListingUnit>> {
    let root = Url::parse(&catalog.root_url).map_err(HarvestError::UrlParse)?;

    let units = (1..=max_page)
        .map(|page_index| {
            let mut url = root.clone();
            url.query_pairs_mut()
                .append_pair("page", &page_index.to_string());
            ListingUnit {
                url: url.to_string(),
                page_index,
            }
        })
        .collect();

    Ok(units)
}

/// Number of review pages needed to show `review_count` reviews
///
/// Exact integer ceiling division; zero reviews means zero pages and
/// therefore no work.
pub fn review_page_count(review_count: u32, page_size: u32) -> u32 {
    review_count.div_ceil(page_size)
}
