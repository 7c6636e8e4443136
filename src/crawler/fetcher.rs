//! HTTP fetcher implementation
//!
//! This module defines the network collaborator used by the frontier and the
//! workers, and its reqwest-backed implementation:
//! - Building HTTP clients with a proper user agent string and timeout
//! - GET requests for page content
//! - GET requests for robots.txt, classifying explicit refusals
//! - HEAD requests to probe the Content-Type of discovered links

use crate::config::UserAgentConfig;
use crate::robots::RobotsFetch;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,
    /// Content-Type header value (empty if absent)
    pub content_type: String,
    /// Page body content
    pub body: String,
}

/// Network operations the crawl depends on
///
/// Every method must be bounded in time; the frontier calls
/// `fetch_robots` while holding its lock.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches a page body
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, FetchError>;

    /// Fetches `http://<domain>/robots.txt`
    async fn fetch_robots(&self, domain: &str) -> RobotsFetch;

    /// Reports the Content-Type a URL would be served with
    async fn probe_content_type(&self, url: &str) -> Result<String, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Upper bound on every request made by the client
///
/// # Example
///
/// ```no_run
/// use polite_frontier::config::UserAgentConfig;
/// use polite_frontier::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "PoliteFrontier".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(5)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from the user agent section and fetch timeout
    pub fn from_config(
        user_agent: &UserAgentConfig,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(user_agent, timeout)?))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let content_type = content_type_of(&response).unwrap_or_default();
        let body = response.text().await.map_err(|e| classify_error(url, e))?;

        Ok(FetchedPage {
            url: final_url,
            content_type,
            body,
        })
    }

    async fn fetch_robots(&self, domain: &str) -> RobotsFetch {
        let url = format!("http://{}/robots.txt", domain);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("robots.txt unavailable for {}: {}", domain, e);
                return RobotsFetch::Unavailable;
            }
        };

        match response.status() {
            StatusCode::FORBIDDEN => RobotsFetch::Forbidden,
            status if status.is_success() => match response.text().await {
                Ok(body) => RobotsFetch::Body(body),
                Err(e) => {
                    tracing::debug!("Failed to read robots.txt for {}: {}", domain, e);
                    RobotsFetch::Unavailable
                }
            },
            status => {
                tracing::debug!("robots.txt for {} returned HTTP {}", domain, status);
                RobotsFetch::Unavailable
            }
        }
    }

    async fn probe_content_type(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        content_type_of(&response).ok_or_else(|| FetchError::MissingContentType {
            url: url.to_string(),
        })
    }
}

fn content_type_of(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
