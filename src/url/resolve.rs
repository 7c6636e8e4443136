use crate::url::normalize::opaque_scheme;
use crate::UrlError;
use url::Url;

/// Turns an anchor href into an absolute address the frontier can accept
///
/// Hrefs beginning with `http` or `www.` are already absolute and are
/// returned unchanged. Anything else is taken relative to the root of the
/// base URI's host: `..` is removed, leading slashes are collapsed, and the
/// result is `http://<host[:port]>/<href>`.
///
/// # Errors
///
/// * `UrlError::Unresolvable` - empty or fragment-only href
/// * `UrlError::InvalidScheme` - `mailto:`, `javascript:`, `tel:`, `data:` and friends
/// * `UrlError::Parse` / `UrlError::MissingDomain` - base URI has no usable host
///
/// # Examples
///
/// ```
/// use polite_frontier::url::resolve_link;
///
/// let base = "http://a.example/docs/index.html";
/// assert_eq!(resolve_link("/y", base).unwrap(), "http://a.example/y");
/// assert_eq!(resolve_link("../z", base).unwrap(), "http://a.example/z");
/// assert_eq!(resolve_link("https://b.example/z", base).unwrap(), "https://b.example/z");
/// ```
pub fn resolve_link(href: &str, base_uri: &str) -> Result<String, UrlError> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return Err(UrlError::Unresolvable(href.to_string()));
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("http") || lowered.starts_with("www.") {
        return Ok(href.to_string());
    }

    if let Some(scheme) = opaque_scheme(href) {
        return Err(UrlError::InvalidScheme(scheme.to_string()));
    }

    let base = Url::parse(base_uri.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    let host = base.host_str().ok_or(UrlError::MissingDomain)?;
    let authority = match base.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    let path = href.replace("..", "");
    let path = path.trim_start_matches('/');

    Ok(format!("http://{}/{}", authority, path))
}
