use crate::url::domain::same_host;
use crate::url::JoinStrategy;
use crate::RippleError;
use url::Url;

/// Href prefixes that never lead to a crawlable page (compared lowercase)
const NON_CRAWLABLE_PREFIXES: &[&str] = &["mailto:", "tel:", "javascript:"];

/// Normalizes a raw href against the base URL using the concatenation join
///
/// See [`normalize_link_with`] for the full rules.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ripple_sitemap::url::normalize_link;
///
/// let base = Url::parse("https://x.com/").unwrap();
/// assert_eq!(
///     normalize_link("/about#team", &base, "x.com").as_deref(),
///     Some("https://x.com/about")
/// );
/// assert_eq!(normalize_link("mailto:a@b.com", &base, "x.com"), None);
/// ```
pub fn normalize_link(href: &str, base_url: &Url, base_host: &str) -> Option<String> {
    normalize_link_with(href, base_url, base_host, JoinStrategy::Concatenate)
}

/// Normalizes a raw href into a canonical, fragment-free URL on `base_host`
///
/// # Normalization Steps
///
/// 1. Reject `mailto:`, `tel:` and `javascript:` hrefs (case-insensitive)
/// 2. `//host/path` takes the base URL's scheme
/// 3. Anything that is not `http://` or `https://` absolute is relative and is
///    joined onto the base URL according to `strategy`
/// 4. Parse; reject unless the scheme is http(s) and the host is `base_host`
/// 5. Remove the fragment
///
/// No other canonicalization happens: query strings are kept as written and
/// `/a` and `/a/` are distinct pages.
///
/// # Returns
///
/// * `Some(String)` - The canonical URL
/// * `None` - The link is not crawlable or leaves the host
pub fn normalize_link_with(
    href: &str,
    base_url: &Url,
    base_host: &str,
    strategy: JoinStrategy,
) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if NON_CRAWLABLE_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
    {
        return None;
    }

    let mut url = if href.starts_with("//") {
        Url::parse(&format!("{}:{}", base_url.scheme(), href)).ok()?
    } else if lowered.starts_with("http://") || lowered.starts_with("https://") {
        Url::parse(href).ok()?
    } else {
        match strategy {
            JoinStrategy::Concatenate => Url::parse(&concatenate(base_url, href)).ok()?,
            JoinStrategy::Rfc3986 => base_url.join(href).ok()?,
        }
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    if !same_host(&url, base_host) {
        return None;
    }

    url.set_fragment(None);

    Some(url.into())
}

/// Appends `href` to the base URL's path with exactly one `/` between them
///
/// The base URL's own query and fragment are dropped first.
fn concatenate(base_url: &Url, href: &str) -> String {
    let mut base = base_url.clone();
    base.set_query(None);
    base.set_fragment(None);

    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        href.trim_start_matches('/')
    )
}

/// Canonical form of the seed URL, as it appears in the results
///
/// The seed goes through the same fragment stripping as discovered links, so
/// a link back to the seed deduplicates against it.
pub fn canonicalize_seed(seed: &str) -> Result<(Url, String), RippleError> {
    let mut url = Url::parse(seed)?;
    url.set_fragment(None);

    let host = crate::url::extract_host(&url)
        .ok_or_else(|| RippleError::MissingHost(seed.to_string()))?;

    Ok((url, host))
}
