use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for a crawl run
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// URLs submitted to the frontier before any worker starts
    #[serde(default)]
    pub seeds: Vec<String>,
}

/// Scheduling and politeness configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of concurrent workers
    pub workers: u32,

    /// Crawl stops once more unique URLs than this have been discovered
    #[serde(rename = "unique-link-ceiling")]
    pub unique_link_ceiling: usize,

    /// Fixed number of slots in the dedup table (must exceed the ceiling)
    #[serde(rename = "dedup-capacity")]
    pub dedup_capacity: usize,

    /// How long a checkout waits for a site before giving up (milliseconds)
    #[serde(rename = "checkout-timeout-ms")]
    pub checkout_timeout_ms: u64,

    /// Time a domain stays unreachable after a fetch (milliseconds)
    #[serde(rename = "politeness-delay-ms")]
    pub politeness_delay_ms: u64,

    /// Upper bound on a single page fetch (milliseconds)
    #[serde(rename = "fetch-timeout-ms")]
    pub fetch_timeout_ms: u64,

    /// Content-type fragments a discovered link must report to be followed
    #[serde(rename = "admitted-content-types")]
    pub admitted_content_types: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            unique_link_ceiling: 1000,
            dedup_capacity: 2000,
            checkout_timeout_ms: 1000,
            politeness_delay_ms: 5000,
            fetch_timeout_ms: 5000,
            admitted_content_types: vec!["html".to_string(), "pdf".to_string()],
        }
    }
}

impl CrawlerConfig {
    pub fn checkout_timeout(&self) -> Duration {
        Duration::from_millis(self.checkout_timeout_ms)
    }

    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Returns true if a probed content type matches one of the admitted fragments
    pub fn admits_content_type(&self, content_type: &str) -> bool {
        let content_type = content_type.to_lowercase();
        self.admitted_content_types
            .iter()
            .any(|admitted| content_type.contains(&admitted.to_lowercase()))
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Format: CrawlerName/Version (+ContactURL; ContactEmail)
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// SQLite file receiving fetched documents; in-memory when absent
    #[serde(rename = "documents-path")]
    pub documents_path: Option<String>,
}
