//! Crawler module: scheduling and the crawl loop
//!
//! This module contains the core crawling logic, including:
//! - The frontier: dedup, per-site queues and the politeness hand-off
//! - HTTP fetching of pages, robots.txt and content-type probes
//! - HTML parsing and link extraction
//! - The worker loop and overall crawl coordination

mod coordinator;
mod dedup;
mod fetcher;
mod frontier;
mod parser;
mod site;
mod worker;

#[cfg(test)]
mod testing;

pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use dedup::{rolling_hash, DedupTable, Probe, Reservation};
pub use fetcher::{build_http_client, FetchedPage, Fetcher, HttpFetcher};
pub use frontier::{Frontier, StopReason, SubmitOutcome};
pub use parser::{parse_links, ParsedLinks};
pub use site::SiteQueue;
pub use worker::{Worker, WorkerState};
