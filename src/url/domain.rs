use url::Url;

/// Extracts the host from a URL
///
/// The host is returned lowercase. URLs without a host, or with an empty one,
/// yield `None`; such URLs are never admitted into the frontier.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ripple_sitemap::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("mailto:admin@example.com").unwrap();
/// assert_eq!(extract_host(&url), None);
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
}

/// Returns true if `url` is on `host` (port and scheme are not compared)
pub fn same_host(url: &Url, host: &str) -> bool {
    extract_host(url).is_some_and(|h| h.eq_ignore_ascii_case(host))
}
