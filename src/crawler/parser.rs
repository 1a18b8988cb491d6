//! HTML parser for extracting links
//!
//! Parsing is permissive: html5ever (through `scraper`) recovers from any
//! malformed markup, so extraction never fails. It may just find fewer links.

use scraper::{Html, Selector};

/// Extracts the raw `href` value of every anchor element
///
/// Values are trimmed and empty ones dropped. Nothing is resolved, filtered,
/// or deduplicated; that is left to [`crate::url::normalize_link`].
///
/// # Example
///
/// ```
/// use ripple_sitemap::crawler::extract_links;
///
/// let html = r#"<html><body><a href=" /page ">Link</a><a href="">Empty</a></body></html>"#;
/// assert_eq!(extract_links(html), vec!["/page".to_string()]);
/// ```
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect()
}
