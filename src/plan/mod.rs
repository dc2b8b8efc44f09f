//! Pagination planning
//!
//! Turns "how much work is there" into a concrete, ordered unit list: the
//! catalog's last-page indicator expands into `ListingUnit`s, a product's
//! review count expands into a review-thread page count, and the seed
//! table expands into `ReviewThreadUnit`s.

mod planner;
mod seeds;

pub use planner::{listing_units, max_catalog_pages, review_page_count};
pub use seeds::read_seed_units;
