//! Review-card extraction
//!
//! A review-thread page carries one card per review. Missing optional
//! fields degrade to empty strings rather than failing: review markup is
//! looser than the listing markup and individual cards are allowed to be
//! sparse.

use crate::extract::text::{single_line_fragment, split_profile, strip_prefix_chars};
use crate::record::ReviewRecord;
use crate::ExtractError;
use scraper::{ElementRef, Html, Selector};

const CARD_SELECTOR: &str = ".review-list__content";
const TITLE_SELECTOR: &str = ".review-list__title";
const PROFILE_SELECTOR: &str = ".review-list__data";
const DATE_SELECTOR: &str = ".review-list__date";
const NAME_SELECTOR: &str = ".review-list__name";
const TAG_SELECTOR: &str = ".review-tag__text";
const BODY_SELECTOR: &str = ".review-list__text";
const REASON_SELECTOR: &str = ".review-reason__item";

// The date field reads 投稿日：..., the product field 商品：...
const DATE_PREFIX_CHARS: usize = 4;
const NAME_PREFIX_CHARS: usize = 3;

fn selector(s: &str) -> Result<Selector, ExtractError> {
    Selector::parse(s).map_err(|_| ExtractError::Selector(s.to_string()))
}

/// Extracts one `ReviewRecord` per review card, in document order
///
/// `price` is carried over from the unit, because review pages do not
/// repeat the product price anywhere.
pub fn extract_review_cards(html: &str, price: u64) -> Result<Vec<ReviewRecord>, ExtractError> {
    let document = Html::parse_document(html);
    let card_sel = selector(CARD_SELECTOR)?;
    let title_sel = selector(TITLE_SELECTOR)?;
    let profile_sel = selector(PROFILE_SELECTOR)?;
    let date_sel = selector(DATE_SELECTOR)?;
    let name_sel = selector(NAME_SELECTOR)?;
    let tag_sel = selector(TAG_SELECTOR)?;
    let body_sel = selector(BODY_SELECTOR)?;
    let reason_sel = selector(REASON_SELECTOR)?;

    let mut records = Vec::new();
    for card in document.select(&card_sel) {
        let title = first_text(&card, &title_sel);

        let (gender, age) = split_profile(&first_text(&card, &profile_sel));

        let date = strip_prefix_chars(&first_text(&card, &date_sel), DATE_PREFIX_CHARS);
        let product = strip_prefix_chars(&first_text(&card, &name_sel), NAME_PREFIX_CHARS);

        let label = joined_text(&card, &tag_sel);
        let reason = joined_text(&card, &reason_sel);

        // Body keeps inline markup: callers get an HTML-fragment-safe line
        let text = card
            .select(&body_sel)
            .next()
            .map(|elem| single_line_fragment(&elem.inner_html()))
            .unwrap_or_default();

        records.push(ReviewRecord {
            title,
            gender,
            age,
            date,
            product,
            price,
            label,
            text,
            reason,
        });
    }

    Ok(records)
}

/// Trimmed text of the first element matching the selector, or empty
fn first_text(card: &ElementRef, sel: &Selector) -> String {
    card.select(sel)
        .next()
        .map(|elem| elem.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Slash-join of all matching elements' text, in document order
///
/// An empty match list yields an empty string, never a missing field.
fn joined_text(card: &ElementRef, sel: &Selector) -> String {
    card.select(sel)
        .map(|elem| elem.text().collect::<String>().trim().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review_card() -> &'static str {
        r#"<div class="review-list__content">
             <h3 class="review-list__title">また頼みたい</h3>
             <p class="review-list__data">寄付者｜男性｜50代</p>
             <p class="review-list__date">投稿日：2023年1月5日</p>
             <p class="review-list__name">商品：うなぎ蒲焼3尾</p>
             <span class="review-tag__text">リピート</span>
             <span class="review-tag__text">家族で</span>
             <div class="review-list__text">肉厚で<br/>とても美味しい　また注文します</div>
             <li class="review-reason__item">量</li>
             <li class="review-reason__item">味</li>
           </div>"#
    }

    #[test]
    fn test_extract_full_card() {
        let records = extract_review_cards(review_card(), 10000).unwrap();
        assert_eq!(records.len(), 1);

        let r = &records[0];
        assert_eq!(r.title, "また頼みたい");
        assert_eq!(r.gender, "男性");
        assert_eq!(r.age, "50代");
        assert_eq!(r.date, "2023年1月5日");
        assert_eq!(r.product, "うなぎ蒲焼3尾");
        assert_eq!(r.price, 10000);
        assert_eq!(r.label, "リピート/家族で");
        assert_eq!(r.text, "肉厚でとても美味しい また注文します");
        assert_eq!(r.reason, "量/味");
    }

    #[test]
    fn test_no_tags_yields_empty_string() {
        let html = r#"<div class="review-list__content">
            <h3 class="review-list__title">良い</h3>
            <p class="review-list__data">寄付者｜女性｜30代</p>
            <p class="review-list__date">投稿日：2023年2月1日</p>
            <p class="review-list__name">商品：りんご</p>
            <div class="review-list__text">甘い</div>
        </div>"#;

        let records = extract_review_cards(html, 5000).unwrap();
        assert_eq!(records[0].label, "");
        assert_eq!(records[0].reason, "");
    }

    #[test]
    fn test_sparse_card_degrades_to_defaults() {
        let html = r#"<div class="review-list__content"></div>"#;
        let records = extract_review_cards(html, 3000).unwrap();
        assert_eq!(records.len(), 1);

        let r = &records[0];
        assert_eq!(r.title, "");
        assert_eq!(r.gender, "");
        assert_eq!(r.age, "");
        assert_eq!(r.text, "");
        assert_eq!(r.price, 3000);
    }

    #[test]
    fn test_no_cards() {
        let records = extract_review_cards("<html><body></body></html>", 1000).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_body_keeps_inline_markup() {
        let html = r#"<div class="review-list__content">
            <div class="review-list__text">とても<b>美味しい</b>です</div>
        </div>"#;
        let records = extract_review_cards(html, 0).unwrap();
        assert_eq!(records[0].text, "とても<b>美味しい</b>です");
    }

    #[test]
    fn test_cards_in_document_order() {
        let html = r#"
            <div class="review-list__content"><h3 class="review-list__title">一</h3></div>
            <div class="review-list__content"><h3 class="review-list__title">二</h3></div>
            <div class="review-list__content"><h3 class="review-list__title">三</h3></div>
        "#;
        let records = extract_review_cards(html, 0).unwrap();
        let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["一", "二", "三"]);
    }
}
