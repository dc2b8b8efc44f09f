//! Field extraction from catalog HTML
//!
//! Pure functions mapping one fetched document to structured records.
//! Nothing in this module performs I/O: callers hand in the page body as a
//! string and receive rows (or a structural `ExtractError` when a pattern
//! the harvester depends on has disappeared from the markup).

mod listing;
mod review;
mod text;

pub use listing::{extract_listing_cards, parse_last_page, NO_TITLE};
pub use review::extract_review_cards;
pub use text::{parse_price, single_line_fragment, split_profile, strip_prefix_chars};
