//! Per-domain queue of pending URLs
//!
//! A `SiteQueue` is not `Clone`: it is moved between the
//! frontier and the worker that checked it out, so exactly one owner can
//! mutate its pending list at any time.

use crate::robots::RobotsRules;
use std::collections::VecDeque;

/// Pending URLs and crawl rules for one domain
#[derive(Debug)]
pub struct SiteQueue {
    domain: String,
    pending: VecDeque<String>,
    rules: RobotsRules,
}

impl SiteQueue {
    /// Creates an empty queue for `domain` governed by `rules`
    pub fn new(domain: impl Into<String>, rules: RobotsRules) -> Self {
        Self {
            domain: domain.into(),
            pending: VecDeque::new(),
            rules,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn rules(&self) -> &RobotsRules {
        &self.rules
    }

    /// Appends a normalized URL to the tail
    pub fn add_url(&mut self, url: impl Into<String>) {
        self.pending.push_back(url.into());
    }

    /// Appends URLs in order
    pub fn extend<I>(&mut self, urls: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.pending.extend(urls);
    }

    /// Pops the oldest pending URL
    pub fn next_url(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    pub fn has_next(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Checks the site's rules for a normalized URL of this domain
    ///
    /// The domain prefix is stripped to obtain the path. An empty URL, or
    /// one with nothing after the domain, is never permitted.
    pub fn permits_crawl(&self, url: &str) -> bool {
        if url.is_empty() {
            return false;
        }

        let path = match url.find(self.domain.as_str()) {
            Some(start) => &url[start + self.domain.len()..],
            None => url,
        };

        if path.is_empty() {
            return false;
        }

        self.rules.permits(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site_with_rules(content: &str) -> SiteQueue {
        SiteQueue::new("a.example", RobotsRules::from_content(content))
    }

    #[test]
    fn test_fifo_order() {
        let mut site = SiteQueue::new("a.example", RobotsRules::allow_all());
        site.add_url("a.example/a");
        site.add_url("a.example/b");
        site.add_url("a.example/c");

        assert_eq!(site.len(), 3);
        assert_eq!(site.next_url().as_deref(), Some("a.example/a"));
        assert_eq!(site.next_url().as_deref(), Some("a.example/b"));
        assert_eq!(site.next_url().as_deref(), Some("a.example/c"));
        assert_eq!(site.next_url(), None);
        assert!(!site.has_next());
    }

    #[test]
    fn test_extend_appends_after_existing() {
        let mut site = SiteQueue::new("a.example", RobotsRules::allow_all());
        site.add_url("a.example/a");
        site.extend(vec!["a.example/b".to_string(), "a.example/c".to_string()]);

        let drained: Vec<_> = std::iter::from_fn(|| site.next_url()).collect();
        assert_eq!(drained, vec!["a.example/a", "a.example/b", "a.example/c"]);
    }

    #[test]
    fn test_permits_crawl_uses_path() {
        let site = site_with_rules("User-agent: *\nDisallow: /priv\nAllow: /priv/public");

        assert!(!site.permits_crawl("a.example/priv/x"));
        assert!(site.permits_crawl("a.example/priv/public/y"));
        assert!(site.permits_crawl("a.example/other"));
    }

    #[test]
    fn test_domain_name_not_matched_against_rules() {
        // "example" is part of the domain, not the path
        let site = site_with_rules("User-agent: *\nDisallow: example");
        assert!(site.permits_crawl("a.example/page"));
        assert!(!site.permits_crawl("a.example/example-page"));
    }

    #[test]
    fn test_bare_disallow_leaves_site_open() {
        let site = site_with_rules("User-agent: *\nDisallow:");
        assert!(site.permits_crawl("a.example/index.html"));
        assert!(site.permits_crawl("a.example/"));
    }

    #[test]
    fn test_empty_url_or_path_never_permitted() {
        let site = SiteQueue::new("a.example", RobotsRules::allow_all());
        assert!(!site.permits_crawl(""));
        assert!(!site.permits_crawl("a.example"));
        assert!(site.permits_crawl("a.example/"));
    }
}
