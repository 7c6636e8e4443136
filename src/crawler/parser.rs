//! HTML parser for extracting anchor links
//!
//! Only `<a href>` targets are collected. Resolution against the base URI
//! happens later, in the worker, so that malformed hrefs can be dropped one
//! at a time.

use scraper::{Html, Selector};
use url::Url;

/// Anchor hrefs found in a document and the URI they are relative to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLinks {
    /// `<base href>` if present and resolvable, otherwise the page URL
    pub base_uri: String,

    /// Raw href values in document order
    pub hrefs: Vec<String>,
}

/// Parses HTML content and extracts anchor hrefs
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_url` - The URL the document was served from
///
/// # Example
///
/// ```
/// use polite_frontier::crawler::parse_links;
///
/// let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_links(html, "http://example.com/");
/// assert_eq!(parsed.hrefs, vec!["/page"]);
/// assert_eq!(parsed.base_uri, "http://example.com/");
/// ```
pub fn parse_links(html: &str, page_url: &str) -> ParsedLinks {
    let document = Html::parse_document(html);

    ParsedLinks {
        base_uri: base_uri(&document, page_url),
        hrefs: extract_hrefs(&document),
    }
}

fn extract_hrefs(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
        .collect()
}

fn base_uri(document: &Html, page_url: &str) -> String {
    let declared = Selector::parse("base[href]").ok().and_then(|selector| {
        document
            .select(&selector)
            .next()
            .and_then(|element| element.value().attr("href"))
            .map(|href| href.trim().to_string())
    });

    let Some(declared) = declared else {
        return page_url.to_string();
    };

    // A relative <base> is itself resolved against the page URL
    match Url::parse(&declared) {
        Ok(absolute) => absolute.to_string(),
        Err(_) => Url::parse(page_url)
            .and_then(|page| page.join(&declared))
            .map(|joined| joined.to_string())
            .unwrap_or_else(|_| page_url.to_string()),
    }
}
