/// Extracts the domain (authority) from a normalized URL
///
/// Normalized URLs have the form `host[:port]/path`, so the domain is
/// everything before the first `/` or `?`.
///
/// # Examples
///
/// ```
/// use polite_frontier::url::domain_of;
///
/// assert_eq!(domain_of("example.com/path"), "example.com");
/// assert_eq!(domain_of("127.0.0.1:8080/x?y=1"), "127.0.0.1:8080");
/// ```
pub fn domain_of(normalized: &str) -> &str {
    let end = normalized.find(['/', '?']).unwrap_or(normalized.len());
    &normalized[..end]
}
