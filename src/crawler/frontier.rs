//! Frontier: the shared scheduler of a crawl run
//!
//! This module handles:
//! - Deduplication of every submitted URL against a fixed-size table
//! - Partitioning known sites into "available" and "in use"
//! - Fair, oldest-first hand-out of sites to workers
//! - The politeness hand-off: a site stays unreachable from checkout until
//!   the politeness delay after its release has elapsed
//! - The visited list and the growth statistics
//! - Detection of the end of the crawl (drained, ceiling, fatal error)

use crate::config::CrawlerConfig;
use crate::crawler::dedup::{DedupTable, Probe, Reservation};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::site::SiteQueue;
use crate::output::CrawlStats;
use crate::robots::{rules_from_fetch, RobotsRules};
use crate::url::{domain_of, normalize_url};
use crate::CrawlError;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::{Mutex, Notify};

/// What happened to a submitted URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Already known; nothing changed
    Duplicate,

    /// Appended to the queue of a known domain
    Queued,

    /// First URL of a new domain; a site queue was created for it
    NewSite,

    /// robots.txt access was refused, so the domain is excluded
    DomainForbidden,

    /// The crawl is over (ceiling passed or halted); nothing was recorded
    Stopped,
}

/// Why a crawl run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No site is available or in use
    Drained,

    /// More unique URLs were discovered than the configured ceiling
    CeilingReached,

    /// A fatal error (capacity fault) halted every worker
    Aborted,
}

/// State guarded by the frontier lock
#[derive(Debug)]
struct FrontierState {
    /// Sites ready for checkout, oldest admission first
    available: VecDeque<SiteQueue>,

    /// Checked-out domains, with URLs discovered for them in the meantime
    in_use: HashMap<String, Vec<String>>,

    /// New domains whose robots.txt is being fetched, with the URLs
    /// submitted for them so far. None of these URLs is in `dedup` yet.
    admitting: HashMap<String, Vec<String>>,

    dedup: DedupTable,
    visited: Vec<String>,
    stats: CrawlStats,
}

/// Shared scheduler handed to every worker
///
/// All mutation is serialized by one async mutex, which is never held
/// across a network request. A checked-out [`SiteQueue`] is moved out to
/// its worker and only its domain name stays behind in the in-use table, so
/// two workers can never hold the same site.
///
/// Once the unique URL count passes the ceiling no further URL is recorded,
/// so the dedup table never holds more than `ceiling + 1` entries.
pub struct Frontier {
    state: Mutex<FrontierState>,
    site_ready: Notify,
    fetcher: Arc<dyn Fetcher>,
    ceiling: usize,
    checkout_timeout: Duration,
    stop: OnceLock<StopReason>,
}

impl Frontier {
    /// Creates an empty frontier
    ///
    /// # Arguments
    ///
    /// * `config` - Supplies the ceiling, dedup capacity and checkout timeout
    /// * `fetcher` - Used to fetch robots.txt for newly discovered domains
    pub fn new(config: &CrawlerConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            state: Mutex::new(FrontierState {
                available: VecDeque::new(),
                in_use: HashMap::new(),
                admitting: HashMap::new(),
                dedup: DedupTable::with_capacity(config.dedup_capacity),
                visited: Vec::new(),
                stats: CrawlStats::new(),
            }),
            site_ready: Notify::new(),
            fetcher,
            ceiling: config.unique_link_ceiling,
            checkout_timeout: config.checkout_timeout(),
            stop: OnceLock::new(),
        }
    }

    /// Adds a URL to the frontier unless it is already known
    ///
    /// URLs of a known domain are recorded and queued at once. The first URL
    /// of an unseen domain waits, unrecorded, while robots.txt is fetched
    /// outside the lock; URLs submitted for that domain in the meantime wait
    /// with it. A refusal discards them all and excludes the domain.
    ///
    /// # Errors
    ///
    /// * `CrawlError::Url` - The URL cannot be normalized
    /// * `CrawlError::CapacityFault` - The dedup table is full; the frontier halts
    pub async fn submit(&self, url: &str) -> Result<SubmitOutcome, CrawlError> {
        let normalized = normalize_url(url)?;
        let domain = domain_of(&normalized).to_string();

        {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;

            if !self.accepting(state) {
                return Ok(SubmitOutcome::Stopped);
            }

            let Some(reservation) = self.reserve(&state.dedup, &normalized)? else {
                return Ok(SubmitOutcome::Duplicate);
            };

            // Dropping the reservation leaves the URL unrecorded until admission
            if let Some(waiting) = state.admitting.get_mut(&domain) {
                if waiting.contains(&normalized) {
                    return Ok(SubmitOutcome::Duplicate);
                }
                waiting.push(normalized);
                return Ok(SubmitOutcome::Queued);
            }

            let known = if let Some(buffered) = state.in_use.get_mut(&domain) {
                buffered.push(normalized.clone());
                true
            } else if let Some(site) = state.available.iter_mut().find(|s| s.domain() == domain) {
                site.add_url(normalized.clone());
                true
            } else {
                false
            };

            if known {
                state.dedup.commit(reservation, normalized);
                return Ok(SubmitOutcome::Queued);
            }

            state.admitting.insert(domain.clone(), vec![normalized]);
        }

        let rules = rules_from_fetch(self.fetcher.fetch_robots(&domain).await);
        self.admit(domain, rules).await
    }

    /// Completes the admission of a new domain once its robots.txt is known
    async fn admit(
        &self,
        domain: String,
        rules: Option<RobotsRules>,
    ) -> Result<SubmitOutcome, CrawlError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let waiting = state.admitting.remove(&domain).unwrap_or_default();

        let Some(rules) = rules else {
            tracing::info!("robots.txt forbidden for {}, excluding domain", domain);
            return Ok(SubmitOutcome::DomainForbidden);
        };

        if !self.accepting(state) {
            tracing::debug!("Not admitting {}: crawl is stopping", domain);
            return Ok(SubmitOutcome::Stopped);
        }

        tracing::debug!(
            "New site {} ({} disallow, {} allow rules)",
            domain,
            rules.disallowed().len(),
            rules.allowed().len()
        );

        let mut site = SiteQueue::new(domain, rules);
        for url in waiting {
            if state.dedup.len() > self.ceiling {
                break;
            }
            if let Some(reservation) = self.reserve(&state.dedup, &url)? {
                state.dedup.commit(reservation, url.clone());
                site.add_url(url);
            }
        }

        if !site.has_next() {
            return Ok(SubmitOutcome::Duplicate);
        }

        state.available.push_back(site);
        drop(guard);

        self.site_ready.notify_waiters();
        Ok(SubmitOutcome::NewSite)
    }

    /// Looks a URL up, halting the frontier if the table is exhausted
    ///
    /// # Returns
    ///
    /// * `Ok(Some(reservation))` - The URL is new
    /// * `Ok(None)` - The URL is already recorded
    fn reserve(&self, dedup: &DedupTable, url: &str) -> Result<Option<Reservation>, CrawlError> {
        match dedup.probe(url) {
            Ok(Probe::Vacant(reservation)) => Ok(Some(reservation)),
            Ok(Probe::Duplicate) => Ok(None),
            Err(e) => {
                tracing::error!("Cannot record {}: {}", url, e);
                self.halt(StopReason::Aborted);
                Err(e)
            }
        }
    }

    /// Returns false once the run is halted or the ceiling has been passed
    ///
    /// Passing the ceiling latches `StopReason::CeilingReached` and logs it,
    /// once.
    fn accepting(&self, state: &FrontierState) -> bool {
        if self.is_stopped() {
            return false;
        }

        if state.dedup.len() > self.ceiling {
            if self.halt(StopReason::CeilingReached) {
                tracing::info!(
                    "Unique link ceiling of {} exceeded ({} known), stopping crawl",
                    self.ceiling,
                    state.dedup.len()
                );
            }
            return false;
        }

        true
    }

    /// Returns true while submitted URLs can still be recorded
    ///
    /// Workers check this before handling each discovered link.
    pub async fn is_accepting(&self) -> bool {
        let state = self.state.lock().await;
        self.accepting(&state)
    }

    /// Hands the oldest available site to the caller
    ///
    /// If no site is available, waits up to the checkout timeout (waking
    /// early when a site is admitted) and tries once more. Returns `None`
    /// rather than blocking indefinitely, so the caller can re-check
    /// [`Frontier::is_done`].
    pub async fn checkout(&self) -> Option<SiteQueue> {
        if self.is_stopped() {
            return None;
        }

        // Registered before the first attempt so an admission in between is not missed
        let notified = self.site_ready.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        if let Some(site) = self.try_checkout().await {
            return Some(site);
        }

        let _ = tokio::time::timeout(self.checkout_timeout, notified).await;

        // The ceiling may have been crossed while waiting
        if self.is_done().await {
            return None;
        }
        self.try_checkout().await
    }

    async fn try_checkout(&self) -> Option<SiteQueue> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let site = state.available.pop_front()?;
        state.in_use.insert(site.domain().to_string(), Vec::new());
        tracing::trace!("Checked out {}", site.domain());
        Some(site)
    }

    /// Returns a checked-out site after the politeness delay
    ///
    /// The site stays in the in-use table for the whole delay, so no worker
    /// can fetch from the domain again before it elapses. URLs discovered
    /// for the domain meanwhile are appended, then the site is re-admitted
    /// to the back of the available queue if it has pending URLs, or
    /// dropped otherwise.
    pub async fn release(&self, mut site: SiteQueue, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        if let Some(buffered) = state.in_use.remove(site.domain()) {
            site.extend(buffered);
        }

        if site.has_next() {
            tracing::trace!("Re-admitting {} with {} pending", site.domain(), site.len());
            state.available.push_back(site);
            drop(guard);
            self.site_ready.notify_waiters();
        } else {
            tracing::trace!("Retiring exhausted site {}", site.domain());
        }
    }

    /// Records a processed URL and takes a stats snapshot
    ///
    /// # Returns
    ///
    /// The number of documents processed so far
    pub async fn mark_visited(&self, url: &str) -> usize {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        state.visited.push(url.to_string());
        let processed = state.visited.len();
        state.stats.record(processed, state.dedup.len());
        processed
    }

    /// Checks whether workers should stop
    ///
    /// True once the unique URL count exceeds the ceiling (a hard stop, which
    /// is latched and logged exactly once), after a fatal error, or when no
    /// site is available, in use or awaiting admission.
    pub async fn is_done(&self) -> bool {
        if self.is_stopped() {
            return true;
        }

        let state = self.state.lock().await;

        if !self.accepting(&state) {
            return true;
        }

        state.available.is_empty() && state.in_use.is_empty() && state.admitting.is_empty()
    }

    /// Latches a stop reason
    ///
    /// # Returns
    ///
    /// * `true` - This call stopped the frontier
    /// * `false` - It was already stopped (the first reason is kept)
    pub fn halt(&self, reason: StopReason) -> bool {
        let first = self.stop.set(reason).is_ok();
        if first {
            self.site_ready.notify_waiters();
        }
        first
    }

    /// Returns true once a stop reason has been latched
    pub fn is_stopped(&self) -> bool {
        self.stop.get().is_some()
    }

    /// The latched stop reason, or `None` if the run has not been halted
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop.get().copied()
    }

    /// Returns true if the normalized URL is recorded or awaiting admission
    pub async fn contains(&self, normalized: &str) -> bool {
        let state = self.state.lock().await;
        state.dedup.contains(normalized)
            || state
                .admitting
                .values()
                .any(|waiting| waiting.iter().any(|url| url == normalized))
    }

    /// Number of unique URLs recorded
    pub async fn unique_count(&self) -> usize {
        self.state.lock().await.dedup.len()
    }

    /// Visited URLs in processing order
    pub async fn visited(&self) -> Vec<String> {
        self.state.lock().await.visited.clone()
    }

    /// Snapshot of the growth statistics
    pub async fn stats(&self) -> CrawlStats {
        self.state.lock().await.stats.clone()
    }

    /// Domains currently available, in checkout order
    pub async fn available_domains(&self) -> Vec<String> {
        let state = self.state.lock().await;
        state
            .available
            .iter()
            .map(|site| site.domain().to_string())
            .collect()
    }

    /// Domains currently checked out
    pub async fn in_use_domains(&self) -> Vec<String> {
        let state = self.state.lock().await;
        let mut domains: Vec<_> = state.in_use.keys().cloned().collect();
        domains.sort();
        domains
    }

    /// Number of pending URLs, including those buffered for checked-out sites
    pub async fn pending_count(&self) -> usize {
        let state = self.state.lock().await;
        state.available.iter().map(SiteQueue::len).sum::<usize>()
            + state.in_use.values().map(Vec::len).sum::<usize>()
            + state.admitting.values().map(Vec::len).sum::<usize>()
    }
}
