//! HttpFetcher behaviour against a live server

use crate::{create_test_user_agent, domain_of_server};
use polite_frontier::crawler::{Fetcher, HttpFetcher};
use polite_frontier::robots::RobotsFetch;
use polite_frontier::FetchError;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_fetcher() -> HttpFetcher {
    HttpFetcher::from_config(&create_test_user_agent(), Duration::from_secs(2))
        .expect("Failed to build HTTP client")
}

#[tokio::test]
async fn test_fetch_page_returns_body_and_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact; test@example.com)",
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body>Hello</body></html>")
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let page = create_fetcher()
        .fetch_page(&format!("{}/page", mock_server.uri()))
        .await
        .expect("Fetch should succeed");

    assert_eq!(page.body, "<html><body>Hello</body></html>");
    assert!(page.content_type.contains("text/html"));
    assert!(page.url.ends_with("/page"));
}

#[tokio::test]
async fn test_fetch_page_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let result = create_fetcher()
        .fetch_page(&format!("{}/broken", mock_server.uri()))
        .await;

    assert!(matches!(result, Err(FetchError::Status { status: 500, .. })));
}

#[tokio::test]
async fn test_fetch_page_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::from_config(&create_test_user_agent(), Duration::from_millis(200))
        .expect("Failed to build HTTP client");
    let result = fetcher
        .fetch_page(&format!("{}/slow", mock_server.uri()))
        .await;

    assert!(matches!(result, Err(FetchError::Timeout { .. })));
}

#[tokio::test]
async fn test_fetch_robots_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /priv"))
        .mount(&mock_server)
        .await;

    let fetched = create_fetcher()
        .fetch_robots(&domain_of_server(&mock_server.uri()))
        .await;

    assert_eq!(
        fetched,
        RobotsFetch::Body("User-agent: *\nDisallow: /priv".to_string())
    );
}

#[tokio::test]
async fn test_fetch_robots_forbidden() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let fetched = create_fetcher()
        .fetch_robots(&domain_of_server(&mock_server.uri()))
        .await;

    assert_eq!(fetched, RobotsFetch::Forbidden);
}

#[tokio::test]
async fn test_fetch_robots_missing_is_unavailable() {
    // Nothing mounted: every request is a 404
    let mock_server = MockServer::start().await;

    let fetched = create_fetcher()
        .fetch_robots(&domain_of_server(&mock_server.uri()))
        .await;

    assert_eq!(fetched, RobotsFetch::Unavailable);
}

#[tokio::test]
async fn test_content_type_check_uses_head_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/doc.pdf"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "application/pdf"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/doc.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let content_type = create_fetcher()
        .probe_content_type(&format!("{}/doc.pdf", mock_server.uri()))
        .await
        .expect("Probe should succeed");

    assert_eq!(content_type, "application/pdf");
}

#[tokio::test]
async fn test_content_type_check_of_missing_page_fails() {
    let mock_server = MockServer::start().await;

    let result = create_fetcher()
        .probe_content_type(&format!("{}/gone", mock_server.uri()))
        .await;

    assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
}
