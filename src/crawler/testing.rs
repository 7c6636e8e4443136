//! Scripted collaborators for scheduler and worker tests

use crate::crawler::fetcher::{FetchedPage, Fetcher};
use crate::robots::RobotsFetch;
use crate::FetchError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// In-memory fetcher answering from fixed tables
///
/// Pages are keyed by the exact address requested (`http://host/path`).
/// Robots outcomes default to `Unavailable`. Probes report the content type
/// of a scripted page and fail with 404 for anything else.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, (String, String)>,
    robots: HashMap<String, RobotsFetch>,
    robots_latency: Duration,
    fetch_log: Mutex<Vec<(String, Instant)>>,
    robots_log: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages
            .insert(url.to_string(), (body.to_string(), "text/html; charset=utf-8".to_string()));
        self
    }

    pub fn with_typed_page(mut self, url: &str, content_type: &str, body: &str) -> Self {
        self.pages
            .insert(url.to_string(), (body.to_string(), content_type.to_string()));
        self
    }

    pub fn with_robots(mut self, domain: &str, fetch: RobotsFetch) -> Self {
        self.robots.insert(domain.to_string(), fetch);
        self
    }

    /// Makes every robots.txt request take `latency`
    pub fn with_robots_latency(mut self, latency: Duration) -> Self {
        self.robots_latency = latency;
        self
    }

    /// Page addresses in the order they were fetched, with the fetch time
    pub fn fetches(&self) -> Vec<(String, Instant)> {
        self.fetch_log.lock().unwrap().clone()
    }

    pub fn fetched_urls(&self) -> Vec<String> {
        self.fetches().into_iter().map(|(url, _)| url).collect()
    }

    pub fn robots_requests(&self) -> Vec<String> {
        self.robots_log.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.fetch_log
            .lock()
            .unwrap()
            .push((url.to_string(), Instant::now()));

        match self.pages.get(url) {
            Some((body, content_type)) => Ok(FetchedPage {
                url: url.to_string(),
                content_type: content_type.clone(),
                body: body.clone(),
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }

    async fn fetch_robots(&self, domain: &str) -> RobotsFetch {
        self.robots_log.lock().unwrap().push(domain.to_string());
        if !self.robots_latency.is_zero() {
            tokio::time::sleep(self.robots_latency).await;
        }
        self.robots
            .get(domain)
            .cloned()
            .unwrap_or(RobotsFetch::Unavailable)
    }

    async fn probe_content_type(&self, url: &str) -> Result<String, FetchError> {
        match self.pages.get(url) {
            Some((_, content_type)) => Ok(content_type.clone()),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
