//! Crawler coordinator - crawl run orchestration
//!
//! This module wires a crawl run together:
//! - Seeding the frontier
//! - Spawning the worker pool on a `JoinSet`
//! - Halting every worker on the first fatal error
//! - Joining all workers and reporting the run once

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::frontier::{Frontier, StopReason, SubmitOutcome};
use crate::crawler::worker::Worker;
use crate::output::CrawlStats;
use crate::storage::{open_store, DocumentStore};
use crate::CrawlError;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Summary of a finished crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub stop_reason: StopReason,
    pub stats: CrawlStats,
    /// Processed URLs in processing order
    pub visited: Vec<String>,
    pub unique_count: usize,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<CrawlerConfig>,
    frontier: Arc<Frontier>,
    fetcher: Arc<dyn Fetcher>,
    store: Arc<dyn DocumentStore>,
}

impl Coordinator {
    /// Creates a coordinator with an empty frontier
    ///
    /// # Arguments
    ///
    /// * `config` - Scheduling and politeness settings
    /// * `fetcher` - Network collaborator shared by the frontier and workers
    /// * `store` - Receives every fetched document
    pub fn new(
        config: CrawlerConfig,
        fetcher: Arc<dyn Fetcher>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        let frontier = Arc::new(Frontier::new(&config, fetcher.clone()));
        Self {
            config: Arc::new(config),
            frontier,
            fetcher,
            store,
        }
    }

    pub fn frontier(&self) -> &Arc<Frontier> {
        &self.frontier
    }

    /// Submits seed URLs before any worker starts
    ///
    /// Seeds that fail to normalize are logged and skipped.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of seeds that entered the frontier
    /// * `Err(CrawlError)` - The dedup table is exhausted
    pub async fn seed<I, S>(&self, seeds: I) -> Result<usize, CrawlError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut accepted = 0;

        for seed in seeds {
            let seed = seed.as_ref();
            match self.frontier.submit(seed).await {
                Ok(SubmitOutcome::NewSite | SubmitOutcome::Queued) => accepted += 1,
                Ok(SubmitOutcome::Duplicate) => {
                    tracing::debug!("Seed {} is a duplicate", seed);
                }
                Ok(SubmitOutcome::DomainForbidden) => {
                    tracing::warn!("Seed {} excluded: robots.txt forbidden", seed);
                }
                Ok(SubmitOutcome::Stopped) => {
                    tracing::debug!("Seed {} not recorded: ceiling already passed", seed);
                }
                Err(CrawlError::Url(e)) => {
                    tracing::warn!("Skipping invalid seed {}: {}", seed, e);
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!("Seeded frontier with {} URLs", accepted);
        Ok(accepted)
    }

    /// Runs the worker pool until the frontier reports completion
    ///
    /// Every worker is joined before returning. If any worker failed, the
    /// frontier is halted so the others stop at their next iteration, and
    /// the first error is returned once all of them have exited.
    pub async fn run(&self) -> Result<CrawlReport, CrawlError> {
        let start_time = std::time::Instant::now();
        tracing::info!("Starting crawl with {} workers", self.config.workers);

        let mut workers = JoinSet::new();
        for id in 0..self.config.workers as usize {
            let mut worker = Worker::new(
                id,
                self.frontier.clone(),
                self.fetcher.clone(),
                self.store.clone(),
                self.config.clone(),
            );
            workers.spawn(async move { worker.run().await });
        }

        let mut first_error = None;
        while let Some(joined) = workers.join_next().await {
            let outcome = joined.map_err(CrawlError::from).and_then(|result| result);
            if let Err(e) = outcome {
                self.frontier.halt(StopReason::Aborted);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        if let Some(e) = first_error {
            tracing::error!("Crawl aborted: {}", e);
            return Err(e);
        }

        let stop_reason = self.frontier.stop_reason().unwrap_or(StopReason::Drained);
        let report = CrawlReport {
            stop_reason,
            stats: self.frontier.stats().await,
            visited: self.frontier.visited().await,
            unique_count: self.frontier.unique_count().await,
        };

        tracing::info!(
            "Crawl completed ({:?}): {} documents processed, {} unique URLs in {:?}",
            report.stop_reason,
            report.visited.len(),
            report.unique_count,
            start_time.elapsed()
        );

        Ok(report)
    }
}

/// Runs a complete crawl from a loaded configuration
///
/// Builds the HTTP fetcher and document store, seeds the frontier from
/// `config.seeds`, and runs the worker pool.
///
/// # Example
///
/// ```no_run
/// use polite_frontier::config::load_config;
/// use polite_frontier::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let report = run_crawl(config).await?;
/// report.stats.print()?;
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlReport, CrawlError> {
    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::from_config(
        &config.user_agent,
        config.crawler.fetch_timeout(),
    )?);
    let store = open_store(&config.output)?;

    let coordinator = Coordinator::new(config.crawler, fetcher, store);
    coordinator.seed(&config.seeds).await?;
    coordinator.run().await
}
