//! Output module for reporting crawl results
//!
//! The only required output of a run is the growth table printed at
//! shutdown, one `<documents processed> <known URLs>` line per document.

pub mod stats;

pub use stats::CrawlStats;
