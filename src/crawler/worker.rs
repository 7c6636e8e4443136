//! Crawl worker loop
//!
//! A worker repeatedly checks a site out of the frontier, processes the
//! site's next URL and hands the site back. The politeness delay is served
//! inside [`Frontier::release`], so a worker that just fetched from a domain
//! is occupied until that domain may be contacted again.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::{Frontier, SubmitOutcome};
use crate::crawler::parser::parse_links;
use crate::crawler::site::SiteQueue;
use crate::storage::DocumentStore;
use crate::url::{fetch_url, normalize_url, resolve_link};
use crate::CrawlError;
use std::sync::Arc;
use std::time::Duration;

/// Lifecycle of a worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Waiting for a site
    Idle,

    /// Holding a checked-out site
    HoldingSite,

    /// Fetching and processing one URL
    Fetching,

    /// The frontier reported completion; the loop has exited
    Done,
}

/// One concurrent crawl agent
pub struct Worker {
    id: usize,
    frontier: Arc<Frontier>,
    fetcher: Arc<dyn Fetcher>,
    store: Arc<dyn DocumentStore>,
    config: Arc<CrawlerConfig>,
    state: WorkerState,
    processed: usize,
}

impl Worker {
    pub fn new(
        id: usize,
        frontier: Arc<Frontier>,
        fetcher: Arc<dyn Fetcher>,
        store: Arc<dyn DocumentStore>,
        config: Arc<CrawlerConfig>,
    ) -> Self {
        Self {
            id,
            frontier,
            fetcher,
            store,
            config,
            state: WorkerState::Idle,
            processed: 0,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// URLs this worker has fetched (successfully or not)
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Runs until the frontier reports completion
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of URLs this worker processed
    /// * `Err(CrawlError)` - A fatal error (capacity fault) stopped the crawl
    pub async fn run(&mut self) -> Result<usize, CrawlError> {
        tracing::debug!("Worker {} started", self.id);

        while !self.frontier.is_done().await {
            self.state = WorkerState::Idle;

            let Some(site) = self.frontier.checkout().await else {
                continue;
            };
            self.state = WorkerState::HoldingSite;

            if let Err(e) = self.work_site(site).await {
                self.state = WorkerState::Done;
                tracing::error!("Worker {} stopping: {}", self.id, e);
                return Err(e);
            }
        }

        self.state = WorkerState::Done;
        tracing::debug!(
            "Worker {} finished after {} documents",
            self.id,
            self.processed
        );
        Ok(self.processed)
    }

    /// Processes the next URL of a checked-out site and releases it
    async fn work_site(&mut self, mut site: SiteQueue) -> Result<(), CrawlError> {
        let Some(url) = site.next_url() else {
            self.frontier.release(site, Duration::ZERO).await;
            return Ok(());
        };

        if !site.permits_crawl(&url) {
            tracing::debug!("Skipping {}: disallowed by robots.txt", url);
            self.frontier.release(site, Duration::ZERO).await;
            return Ok(());
        }

        self.state = WorkerState::Fetching;
        self.process_url(&url).await?;

        self.processed += 1;
        let total = self.frontier.mark_visited(&url).await;
        if total % 10 == 0 {
            tracing::info!(
                "Progress: {} documents processed, {} unique URLs known",
                total,
                self.frontier.unique_count().await
            );
        }

        self.frontier
            .release(site, self.config.politeness_delay())
            .await;
        Ok(())
    }

    /// Fetches one URL, stores it and submits the links it admits
    ///
    /// Only frontier faults are returned; every per-URL failure is logged
    /// and dropped. Link handling ends as soon as the frontier stops
    /// accepting URLs.
    async fn process_url(&self, url: &str) -> Result<(), CrawlError> {
        let address = fetch_url(url);

        let page = match self.fetcher.fetch_page(&address).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", address, e);
                return Ok(());
            }
        };

        tracing::debug!("Fetched {} ({} bytes)", address, page.body.len());

        if let Err(e) = self.store.store(url, &page.body) {
            tracing::warn!("Failed to store {}: {}", url, e);
        }

        let parsed = parse_links(&page.body, &address);
        let mut submitted = 0;

        for href in &parsed.hrefs {
            if !self.frontier.is_accepting().await {
                tracing::debug!("{}: crawl is stopping, not following remaining links", url);
                break;
            }

            let candidate = match resolve_link(href, &parsed.base_uri)
                .and_then(|resolved| normalize_url(&resolved))
            {
                Ok(candidate) => candidate,
                Err(e) => {
                    tracing::debug!("Dropping link {:?} on {}: {}", href, url, e);
                    continue;
                }
            };

            if self.frontier.contains(&candidate).await {
                continue;
            }

            if !self.admits(&candidate).await {
                continue;
            }

            match self.frontier.submit(&candidate).await? {
                SubmitOutcome::Queued | SubmitOutcome::NewSite => submitted += 1,
                SubmitOutcome::Duplicate | SubmitOutcome::DomainForbidden => {}
                SubmitOutcome::Stopped => break,
            }
        }

        tracing::debug!(
            "{}: {} links found, {} submitted",
            url,
            parsed.hrefs.len(),
            submitted
        );
        Ok(())
    }

    /// Probes a candidate's content type against the admitted types
    async fn admits(&self, candidate: &str) -> bool {
        let address = fetch_url(candidate);
        match self.fetcher.probe_content_type(&address).await {
            Ok(content_type) if self.config.admits_content_type(&content_type) => true,
            Ok(content_type) => {
                tracing::debug!("Not following {}: content type {}", address, content_type);
                false
            }
            Err(e) => {
                tracing::debug!("Not following {}: {}", address, e);
                false
            }
        }
    }
}
