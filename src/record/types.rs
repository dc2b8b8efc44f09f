use serde::{Deserialize, Serialize};

/// One page of the product catalog, scheduled for listing-card extraction
///
/// Created by the pagination planner from the catalog's last-page indicator
/// and consumed exactly once by the batch scheduler. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingUnit {
    /// Absolute URL of the listing page
    pub url: String,

    /// 1-based page index within the catalog
    pub page_index: u32,
}

/// The full review history of one product
///
/// `page_count` is derived from the product's review count divided by the
/// site's fixed page size, rounded up. A product with zero reviews has
/// `page_count == 0` and contributes no records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewThreadUnit {
    /// Product price, carried along because review pages do not repeat it
    pub price: u64,

    /// Base URL of the review thread (page parameter appended per page)
    pub base_url: String,

    /// Number of review pages to fetch
    pub page_count: u32,
}

/// One product row extracted from a listing card
///
/// Field order is the CSV column order: title, price, review_count,
/// detail_url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product title, `"no title"` when unresolvable
    pub title: String,

    /// Product price in yen, 0 when the price text is unparsable
    pub price: u64,

    /// Number of reviews the card advertises
    pub review_count: u32,

    /// Absolute URL of the product's review thread
    pub detail_url: String,
}

/// One review row extracted from a review card
///
/// Field order is the CSV column order: title, gender, age, date, product,
/// price, label, text, reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Review title
    pub title: String,

    /// Reviewer gender, from the combined "gender｜age" field
    pub gender: String,

    /// Reviewer age bracket, from the combined "gender｜age" field
    pub age: String,

    /// Posting date with its fixed label prefix stripped
    pub date: String,

    /// Product name with its fixed label prefix stripped
    pub product: String,

    /// Product price, carried over from the unit
    pub price: u64,

    /// Slash-joined review tags, empty string when none
    pub label: String,

    /// Review body as a single-line HTML fragment
    pub text: String,

    /// Slash-joined purchase reasons, empty string when none
    pub reason: String,
}

/// One row of the seed table linking the two pipelines
///
/// Written by the products pipeline, read back to seed `ReviewThreadUnit`s.
/// Field order is the CSV column order: price, url, page_count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedRecord {
    /// Product price in yen
    pub price: u64,

    /// Base URL of the product's review thread
    pub url: String,

    /// Number of review pages, ceil(review_count / page_size)
    pub page_count: u32,
}

impl SeedRecord {
    /// Converts a seed row into a schedulable review-thread unit
    pub fn into_unit(self) -> ReviewThreadUnit {
        ReviewThreadUnit {
            price: self.price,
            base_url: self.url,
            page_count: self.page_count,
        }
    }
}
