//! Integration tests against mock HTTP servers
//!
//! Each wiremock server listens on its own port, so every server is a
//! distinct domain (`127.0.0.1:<port>`) as far as the frontier is concerned.

mod crawl_tests;
mod fetcher_tests;

use polite_frontier::config::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

pub fn create_test_user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

/// Creates a test configuration with short timings
pub fn create_test_config(seeds: Vec<String>, documents_path: Option<String>) -> Config {
    Config {
        crawler: CrawlerConfig {
            workers: 2,
            unique_link_ceiling: 50,
            dedup_capacity: 100,
            checkout_timeout_ms: 50,
            politeness_delay_ms: 100, // Very short for testing
            fetch_timeout_ms: 2000,
            ..CrawlerConfig::default()
        },
        user_agent: create_test_user_agent(),
        output: OutputConfig { documents_path },
        seeds,
    }
}

/// The domain the frontier assigns to a mock server (`host:port`)
pub fn domain_of_server(uri: &str) -> String {
    uri.trim_start_matches("http://").to_string()
}
