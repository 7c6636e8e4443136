use crate::UrlError;
use url::Url;

/// Normalizes a URL into the identity used for dedup and site queues
///
/// # Normalization Steps
///
/// 1. Reject non-HTTP schemes (`mailto:`, `javascript:`, `ftp://`, ...)
/// 2. Drop the `http://` / `https://` scheme so both compare equal
/// 3. Lowercase the host and remove a leading `www.`
/// 4. Keep an explicit port (so `host:8080` and `host` stay distinct sites)
/// 5. Resolve dot segments; an empty path becomes `/`
/// 6. Remove the fragment, keep the query
///
/// The result has the form `host[:port]/path[?query]`.
///
/// # Examples
///
/// ```
/// use polite_frontier::url::normalize_url;
///
/// assert_eq!(normalize_url("http://WWW.Example.com/a/../b#top").unwrap(), "example.com/b");
/// assert_eq!(normalize_url("https://example.com").unwrap(), "example.com/");
/// assert_eq!(normalize_url("www.example.com/x?q=1").unwrap(), "example.com/x?q=1");
/// ```
pub fn normalize_url(raw: &str) -> Result<String, UrlError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    let rest = strip_scheme(raw)?;
    let url = Url::parse(&format!("http://{}", rest)).map_err(|e| UrlError::Parse(e.to_string()))?;

    let host = url.host_str().ok_or(UrlError::MissingDomain)?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    if host.is_empty() {
        return Err(UrlError::MissingDomain);
    }

    let mut normalized = String::with_capacity(rest.len());
    normalized.push_str(host);
    if let Some(port) = url.port() {
        normalized.push(':');
        normalized.push_str(&port.to_string());
    }
    normalized.push_str(url.path());
    if let Some(query) = url.query() {
        normalized.push('?');
        normalized.push_str(query);
    }

    Ok(normalized)
}

/// Returns the part of `raw` after an HTTP(S) scheme, or `raw` itself if it has none
fn strip_scheme(raw: &str) -> Result<&str, UrlError> {
    if let Some((scheme, rest)) = raw.split_once("://") {
        return if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") {
            Ok(rest)
        } else {
            Err(UrlError::InvalidScheme(scheme.to_string()))
        };
    }

    if let Some(scheme) = opaque_scheme(raw) {
        return Err(UrlError::InvalidScheme(scheme.to_string()));
    }

    Ok(raw)
}

/// Detects `scheme:` prefixes without `//`, e.g. `mailto:` or `javascript:`
///
/// `host:8080/path` is not a scheme: a port always starts with a digit.
pub(crate) fn opaque_scheme(raw: &str) -> Option<&str> {
    let (candidate, after) = raw.split_once(':')?;
    let mut chars = candidate.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let scheme_chars = candidate
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    let looks_like_port = after.chars().next().is_some_and(|c| c.is_ascii_digit());

    if starts_alpha && scheme_chars && !looks_like_port && !candidate.contains('.') {
        Some(candidate)
    } else {
        None
    }
}

/// Builds the address actually requested for a normalized URL
pub fn fetch_url(normalized: &str) -> String {
    format!("http://{}", normalized)
}
