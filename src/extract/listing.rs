//! Listing-card extraction
//!
//! A catalog listing page carries one card per product. Each card holds a
//! price element, a title element, and a comment link whose text embeds the
//! review count as `感想(<N>)` and whose href points at the product's
//! review thread.

use crate::extract::text::parse_price;
use crate::record::ProductRecord;
use crate::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Sentinel title for cards whose title cannot be resolved
pub const NO_TITLE: &str = "no title";

const CARD_SELECTOR: &str = ".card-product";
const PRICE_SELECTOR: &str = ".card-product__price";
const COMMENT_SELECTOR: &str = ".card-product__comment";
const TITLE_SELECTOR: &str = ".card-product__title";
const LAST_PAGE_SELECTOR: &str = ".nv-pager__item.is-last > span";

/// Parenthesized review count inside the comment link text, e.g. 感想(211)
static REVIEW_COUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([0-9]+)\)").expect("static pattern is valid"));

fn selector(s: &str) -> Result<Selector, ExtractError> {
    Selector::parse(s).map_err(|_| ExtractError::Selector(s.to_string()))
}

/// Reads the catalog's last-page indicator from the root listing page
///
/// The indicator is a single element naming the highest listing page index.
/// Its absence means the catalog structure has changed, which no amount of
/// retrying can fix, so this is a structural error that aborts the run.
pub fn parse_last_page(html: &str, url: &str) -> Result<u32, ExtractError> {
    let document = Html::parse_document(html);
    let last_page = selector(LAST_PAGE_SELECTOR)?;

    document
        .select(&last_page)
        .next()
        .map(|elem| elem.text().collect::<String>())
        .and_then(|text| text.trim().parse().ok())
        .ok_or_else(|| ExtractError::PageIndicator {
            url: url.to_string(),
        })
}

/// Extracts one `ProductRecord` per listing card on a catalog page
///
/// Cards missing a price or comment element are placeholders and are
/// skipped without error, as are cards whose comment link has no usable
/// href. A comment element whose text lacks the parenthesized review count
/// is a structural error: the count is assumed invariant and its absence
/// signals selector drift.
pub fn extract_listing_cards(html: &str, page_url: &str) -> Result<Vec<ProductRecord>, ExtractError> {
    let document = Html::parse_document(html);
    let card_sel = selector(CARD_SELECTOR)?;
    let price_sel = selector(PRICE_SELECTOR)?;
    let comment_sel = selector(COMMENT_SELECTOR)?;
    let title_sel = selector(TITLE_SELECTOR)?;

    let base_url = Url::parse(page_url).ok();

    let mut records = Vec::new();
    for card in document.select(&card_sel) {
        let price_elem = card.select(&price_sel).next();
        let comment_elem = card.select(&comment_sel).next();

        // Placeholder cards lack one or both; skip, not an error
        let (Some(price_elem), Some(comment_elem)) = (price_elem, comment_elem) else {
            continue;
        };

        let Some(href) = comment_elem.value().attr("href") else {
            continue;
        };
        let Some(detail_url) = resolve_href(href, base_url.as_ref()) else {
            continue;
        };

        let comment_text: String = comment_elem.text().collect();
        let review_count = parse_review_count(&comment_text, page_url)?;

        let price_text: String = price_elem.text().collect();
        let price = parse_price(&price_text).unwrap_or_else(|| {
            tracing::debug!("Unparsable price {:?} on {}, defaulting to 0", price_text, page_url);
            0
        });

        let title = card
            .select(&title_sel)
            .next()
            .map(resolve_title)
            .unwrap_or_else(|| NO_TITLE.to_string());

        records.push(ProductRecord {
            title,
            price,
            review_count,
            detail_url,
        });
    }

    Ok(records)
}

/// Captures the integer inside the comment link's parenthetical
fn parse_review_count(text: &str, page_url: &str) -> Result<u32, ExtractError> {
    REVIEW_COUNT_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| ExtractError::ReviewCountPattern {
            url: page_url.to_string(),
            text: text.trim().to_string(),
        })
}

/// Resolves a product title from its element
///
/// Prefers the element's direct text; compound or decorated titles have
/// several text fragments, in which case the last non-empty stripped
/// fragment carries the actual name. An element with no text at all yields
/// the sentinel.
fn resolve_title(elem: ElementRef) -> String {
    let fragments: Vec<&str> = elem
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    match fragments.last() {
        Some(raw) => raw.replace('\n', "").replace("<br/>", ""),
        None => NO_TITLE.to_string(),
    }
}

/// Resolves a card href to an absolute HTTP(S) URL
fn resolve_href(href: &str, base_url: Option<&Url>) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let absolute = match Url::parse(href) {
        Ok(url) => url,
        Err(_) => base_url?.join(href).ok()?,
    };

    if absolute.scheme() == "http" || absolute.scheme() == "https" {
        Some(absolute.to_string())
    } else {
        None
    }
}
