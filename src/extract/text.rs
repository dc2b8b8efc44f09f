//! Shared text normalization helpers
//!
//! These mirror the site's quirks: prices carry a non-breaking space before
//! the currency marker, reviewer profiles pack gender and age into one
//! full-width-bar-delimited field, and several fields carry fixed-width
//! label prefixes.

/// Parses a raw price string such as `"12,345\u{a0}円"` into yen
///
/// The non-breaking space is normalized to a regular space, the first
/// whitespace-delimited token is taken, and thousands separators are
/// stripped. Returns `None` when the text does not contain a leading
/// integer; callers substitute the documented default of 0.
pub fn parse_price(text: &str) -> Option<u64> {
    let cleaned = text.replace('\u{a0}', " ");
    let token = cleaned.split_whitespace().next()?;
    token.replace(',', "").parse().ok()
}

/// Collapses an HTML fragment to a single line
///
/// Newlines and literal line-break markup are removed and full-width
/// spaces are normalized to regular spaces, so the result is safe to embed
/// in a one-row-per-record table while staying an HTML fragment.
pub fn single_line_fragment(html: &str) -> String {
    html.replace('\n', "")
        .replace("<br/>", "")
        .replace("<br>", "")
        .replace('　', " ")
}

/// Splits a combined "gender｜age" profile field
///
/// Gender is the text strictly between the first and last full-width bar;
/// age is everything after the last bar. A field with a single bar has no
/// gender segment, and a field with no bar has neither.
pub fn split_profile(s: &str) -> (String, String) {
    const BAR: char = '｜';
    let first = s.find(BAR);
    let last = s.rfind(BAR);

    match (first, last) {
        (Some(f), Some(l)) if l > f => (
            s[f + BAR.len_utf8()..l].to_string(),
            s[l + BAR.len_utf8()..].to_string(),
        ),
        (Some(f), _) => (String::new(), s[f + BAR.len_utf8()..].to_string()),
        (None, _) => (String::new(), String::new()),
    }
}

/// Removes a fixed-width label prefix, counted in characters
///
/// Field labels on this site are fixed character counts, not fixed byte
/// counts, so the skip has to be by `char`.
pub fn strip_prefix_chars(s: &str, n: usize) -> String {
    s.chars().skip(n).collect()
}
