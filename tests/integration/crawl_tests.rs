//! End-to-end crawls across mock servers

use crate::{create_test_config, domain_of_server};
use polite_frontier::crawler::{run_crawl, Coordinator, HttpFetcher};
use polite_frontier::storage::{DocumentStore, MemoryStore, SqliteStore};
use polite_frontier::StopReason;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Answers every HEAD request as HTML
async fn mount_html_probes(server: &MockServer) {
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_crawl_across_two_domains() {
    let site_a = MockServer::start().await;
    let site_b = MockServer::start().await;
    let domain_a = domain_of_server(&site_a.uri());
    let domain_b = domain_of_server(&site_b.uri());

    mount_robots(&site_a, 200, "User-agent: *\nDisallow: /private").await;
    mount_html_probes(&site_a).await;
    mount_html_probes(&site_b).await;

    mount_page(
        &site_a,
        "/",
        format!(
            r#"<html><body>
            <a href="/page1">Page 1</a>
            <a href="/private/secret">Secret</a>
            <a href="{}/z">Other site</a>
            <a href="/">Home</a>
            <a href="mailto:someone@example.com">Mail</a>
            </body></html>"#,
            site_b.uri()
        ),
    )
    .await;
    mount_page(&site_a, "/page1", "<p>Page 1</p>".to_string()).await;
    mount_page(&site_b, "/z", "<p>Z</p>".to_string()).await;

    Mock::given(method("GET"))
        .and(path("/private/secret"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&site_a)
        .await;

    let config = create_test_config(vec![format!("{}/", site_a.uri())], None);
    let fetcher = Arc::new(
        HttpFetcher::from_config(&config.user_agent, config.crawler.fetch_timeout())
            .expect("Failed to build HTTP client"),
    );
    let store = Arc::new(MemoryStore::new());
    let coordinator = Coordinator::new(config.crawler.clone(), fetcher, store.clone());

    coordinator
        .seed(&config.seeds)
        .await
        .expect("Seeding should succeed");
    let report = coordinator.run().await.expect("Crawl should complete");

    assert_eq!(report.stop_reason, StopReason::Drained);
    assert_eq!(report.visited[0], format!("{}/", domain_a));

    let mut visited = report.visited.clone();
    visited.sort();
    let mut expected = vec![
        format!("{}/", domain_a),
        format!("{}/page1", domain_a),
        format!("{}/z", domain_b),
    ];
    expected.sort();
    assert_eq!(visited, expected);

    // The disallowed page is known but never fetched
    assert_eq!(report.unique_count, 4);
    assert!(coordinator
        .frontier()
        .contains(&format!("{}/private/secret", domain_a))
        .await);

    assert_eq!(report.stats.len(), 3);
    assert_eq!(store.count().unwrap(), 3);
    assert_eq!(
        store.get(&format!("{}/page1", domain_a)).unwrap().as_deref(),
        Some("<p>Page 1</p>")
    );
}

#[tokio::test]
async fn test_forbidden_robots_excludes_domain() {
    let site_a = MockServer::start().await;
    let site_b = MockServer::start().await;

    mount_html_probes(&site_a).await;
    mount_html_probes(&site_b).await;
    mount_robots(&site_b, 403, "").await;

    mount_page(
        &site_a,
        "/",
        format!(r#"<a href="{}/z">Other site</a>"#, site_b.uri()),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/z"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&site_b)
        .await;

    let config = create_test_config(vec![format!("{}/", site_a.uri())], None);
    let report = run_crawl(config).await.expect("Crawl should complete");

    assert_eq!(report.visited, vec![format!("{}/", domain_of_server(&site_a.uri()))]);
    assert_eq!(report.unique_count, 1);
}

#[tokio::test]
async fn test_ceiling_stops_crawl() {
    let site = MockServer::start().await;
    mount_html_probes(&site).await;

    let links: String = (0..5)
        .map(|i| format!(r#"<a href="/p{}">{}</a>"#, i, i))
        .collect();
    mount_page(&site, "/", format!("<html><body>{}</body></html>", links)).await;

    let mut config = create_test_config(vec![format!("{}/", site.uri())], None);
    config.crawler.unique_link_ceiling = 3;
    config.crawler.dedup_capacity = 10;

    let report = run_crawl(config).await.expect("Crawl should complete");

    assert_eq!(report.stop_reason, StopReason::CeilingReached);
    assert_eq!(report.visited.len(), 1);
    // Link handling stops as soon as the count passes the ceiling
    assert_eq!(report.unique_count, 4);
    assert_eq!(report.stats.rows().collect::<Vec<_>>(), vec![(1, 5)]);
}

#[tokio::test]
async fn test_run_crawl_persists_documents_to_sqlite() {
    let site = MockServer::start().await;
    mount_html_probes(&site).await;
    mount_page(&site, "/", r#"<a href="/next">next</a>"#.to_string()).await;
    mount_page(&site, "/next", "<p>next</p>".to_string()).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("documents.db");

    let config = create_test_config(
        vec![format!("{}/", site.uri())],
        Some(db_path.to_string_lossy().into_owned()),
    );
    let report = run_crawl(config).await.expect("Crawl should complete");

    assert_eq!(report.visited.len(), 2);

    let store = SqliteStore::new(&db_path).expect("Failed to reopen database");
    assert_eq!(store.count().unwrap(), 2);
    assert_eq!(
        store
            .get(&format!("{}/next", domain_of_server(&site.uri())))
            .unwrap()
            .as_deref(),
        Some("<p>next</p>")
    );
}
