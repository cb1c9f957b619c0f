//! Integration tests for the crawler
//!
//! These tests use wiremock to serve listing and detail pages and run the
//! full crawl cycle end-to-end against a temporary output file.

use std::path::Path;
use std::sync::Arc;
use term_harvest::config::Config;
use term_harvest::crawler::{Coordinator, CrawlOutcome};
use term_harvest::state::{Ledger, LedgerSeed};
use term_harvest::{HarvestError, StatsSnapshot};
use wiremock::matchers::{method, path};
use tokio::sync::Notify;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, output: &Path) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.http.timeout_secs = 5;
    config.output.path = output.to_path_buf();
    config
}

/// Renders a listing page with the given (text, href) query links
fn listing_page(links: &[(&str, &str)]) -> String {
    let anchors: String = links
        .iter()
        .map(|(text, href)| format!(r#"<a href="{}">{}</a>"#, href, text))
        .collect();
    format!(
        r#"<html><head><title>Top queries</title></head><body>
        <nav><a href="/">Home</a></nav>
        <div class="row links">{}</div>
        </body></html>"#,
        anchors
    )
}

/// Renders a detail page with one job entry per title
fn detail_page(titles: &[&str]) -> String {
    let entries: String = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            format!(
                r#"<li><article><header><h2><a href="/job/{}">{}</a></h2></header></article></li>"#,
                i, title
            )
        })
        .collect();
    format!(
        r#"<html><body><ul class="jobs">{}</ul></body></html>"#,
        entries
    )
}

/// Mounts a GET route serving an HTML body
async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts a GET route that must be requested exactly `times` times
async fn mount_page_expect(server: &MockServer, route: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(times)
        .mount(server)
        .await;
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("Failed to read output")
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_full_crawl_until_pagination_ends() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/topqueries/1",
        listing_page(&[
            ("Software Engineer", "/empleo-software-engineer.html"),
            ("Nurse", "/empleo-nurse.html"),
        ]),
    )
    .await;
    mount_page(
        &mock_server,
        "/topqueries/2",
        listing_page(&[("Chef", "/empleo-chef.html")]),
    )
    .await;
    mount_page(&mock_server, "/topqueries/3", listing_page(&[])).await;

    mount_page(
        &mock_server,
        "/empleo-software-engineer.html",
        detail_page(&["Backend Developer", "Rust Engineer"]),
    )
    .await;
    mount_page(
        &mock_server,
        "/empleo-nurse.html",
        detail_page(&["Enfermera UCI"]),
    )
    .await;
    mount_page(
        &mock_server,
        "/empleo-chef.html",
        detail_page(&["Cocinero"]),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results.csv");
    let config = create_test_config(&mock_server.uri(), &output);

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let outcome = coordinator
        .run_until(std::future::pending())
        .await
        .expect("Crawl failed");

    assert_eq!(outcome, CrawlOutcome::Exhausted { pages: 2 });
    assert_eq!(
        read_lines(&output),
        vec![
            "software engineer,Backend Developer",
            "software engineer,Rust Engineer",
            "nurse,Enfermera UCI",
            "chef,Cocinero",
        ]
    );
    assert_eq!(
        coordinator.stats(),
        StatsSnapshot {
            queries_seen: 3,
            total_results: 4,
            high_result_queries: 0,
        }
    );
    assert_eq!(coordinator.ledger().len(), 3);
}

#[tokio::test]
async fn test_same_normalized_query_processed_once() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/topqueries/1",
        listing_page(&[
            ("Software Engineer", "/empleo-software-engineer.html"),
            ("software engineer ", "/empleo-software-engineer-2.html"),
        ]),
    )
    .await;
    mount_page(
        &mock_server,
        "/topqueries/2",
        listing_page(&[("SOFTWARE ENGINEER", "/empleo-software-engineer-3.html")]),
    )
    .await;
    mount_page(&mock_server, "/topqueries/3", listing_page(&[])).await;

    mount_page_expect(
        &mock_server,
        "/empleo-software-engineer.html",
        detail_page(&["Backend Developer"]),
        1,
    )
    .await;
    mount_page_expect(
        &mock_server,
        "/empleo-software-engineer-2.html",
        detail_page(&["Duplicate"]),
        0,
    )
    .await;
    mount_page_expect(
        &mock_server,
        "/empleo-software-engineer-3.html",
        detail_page(&["Duplicate"]),
        0,
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results.csv");
    let config = create_test_config(&mock_server.uri(), &output);

    let mut coordinator = Coordinator::new(config).unwrap();
    coordinator.run_until(std::future::pending()).await.unwrap();

    assert_eq!(read_lines(&output), vec!["software engineer,Backend Developer"]);
    assert_eq!(coordinator.stats().queries_seen, 1);
    assert!(coordinator.ledger().contains("software engineer"));
}

#[tokio::test]
async fn test_query_without_jobs_section() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/topqueries/1",
        listing_page(&[("Nurse", "/empleo-nurse.html")]),
    )
    .await;
    mount_page(&mock_server, "/topqueries/2", listing_page(&[])).await;
    mount_page(
        &mock_server,
        "/empleo-nurse.html",
        "<html><body><p>No hay ofertas</p></body></html>".to_string(),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results.csv");
    let config = create_test_config(&mock_server.uri(), &output);

    let mut coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator.run_until(std::future::pending()).await.unwrap();

    assert_eq!(outcome, CrawlOutcome::Exhausted { pages: 1 });
    assert!(!output.exists(), "no write expected for an empty result set");
    assert_eq!(
        coordinator.stats(),
        StatsSnapshot {
            queries_seen: 1,
            total_results: 0,
            high_result_queries: 0,
        }
    );
    assert!(coordinator.ledger().contains("nurse"));
}

#[tokio::test]
async fn test_commas_stripped_from_titles() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/topqueries/1",
        listing_page(&[("Nurse", "/empleo-nurse.html")]),
    )
    .await;
    mount_page(&mock_server, "/topqueries/2", listing_page(&[])).await;
    mount_page(
        &mock_server,
        "/empleo-nurse.html",
        detail_page(&["Engineer, Backend"]),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results.csv");
    let config = create_test_config(&mock_server.uri(), &output);

    let mut coordinator = Coordinator::new(config).unwrap();
    coordinator.run_until(std::future::pending()).await.unwrap();

    assert_eq!(read_lines(&output), vec!["nurse,Engineer Backend"]);
}

#[tokio::test]
async fn test_commas_preserved_when_disabled() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/topqueries/1",
        listing_page(&[("Chef, Cook", "/empleo-chef.html")]),
    )
    .await;
    mount_page(&mock_server, "/topqueries/2", listing_page(&[])).await;
    mount_page(
        &mock_server,
        "/empleo-chef.html",
        detail_page(&["Chef, Night Shift"]),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results.csv");
    let mut config = create_test_config(&mock_server.uri(), &output);
    config.crawler.strip_commas = false;

    let mut coordinator = Coordinator::new(config).unwrap();
    coordinator.run_until(std::future::pending()).await.unwrap();

    assert_eq!(read_lines(&output), vec!["chef, cook,Chef, Night Shift"]);
}

#[tokio::test]
async fn test_high_result_queries_counted() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/topqueries/1",
        listing_page(&[("Nurse", "/empleo-nurse.html"), ("Chef", "/empleo-chef.html")]),
    )
    .await;
    mount_page(&mock_server, "/topqueries/2", listing_page(&[])).await;

    let many: Vec<String> = (0..16).map(|i| format!("Enfermera {}", i)).collect();
    let many: Vec<&str> = many.iter().map(String::as_str).collect();
    let exactly_fifteen: Vec<String> = (0..15).map(|i| format!("Cocinero {}", i)).collect();
    let exactly_fifteen: Vec<&str> = exactly_fifteen.iter().map(String::as_str).collect();

    mount_page(&mock_server, "/empleo-nurse.html", detail_page(&many)).await;
    mount_page(
        &mock_server,
        "/empleo-chef.html",
        detail_page(&exactly_fifteen),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results.csv");
    let config = create_test_config(&mock_server.uri(), &output);

    let mut coordinator = Coordinator::new(config).unwrap();
    coordinator.run_until(std::future::pending()).await.unwrap();

    assert_eq!(
        coordinator.stats(),
        StatsSnapshot {
            queries_seen: 2,
            total_results: 31,
            high_result_queries: 1,
        }
    );
    assert_eq!(read_lines(&output).len(), 31);
}

#[tokio::test]
async fn test_extraction_failure_halts_and_keeps_earlier_pages() {
    let mock_server = MockServer::start().await;

    for page in 1..=6 {
        let href = format!("/empleo-term-{}.html", page);
        let text = format!("Term {}", page);
        mount_page(
            &mock_server,
            &format!("/topqueries/{}", page),
            listing_page(&[(text.as_str(), href.as_str())]),
        )
        .await;
        mount_page(
            &mock_server,
            &href,
            detail_page(&[format!("Job {}", page).as_str()]),
        )
        .await;
    }

    // Page 7 has no links row at all
    mount_page(
        &mock_server,
        "/topqueries/7",
        r#"<html><body><a href="/empleo-term-7.html">Term 7</a></body></html>"#.to_string(),
    )
    .await;
    mount_page_expect(
        &mock_server,
        "/empleo-term-7.html",
        detail_page(&["Job 7"]),
        0,
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results.csv");
    let config = create_test_config(&mock_server.uri(), &output);

    let mut coordinator = Coordinator::new(config).unwrap();
    let result = coordinator.run_until(std::future::pending()).await;

    match result {
        Err(HarvestError::Extraction { url, .. }) => assert!(url.ends_with("/topqueries/7")),
        other => panic!("expected extraction failure, got {:?}", other),
    }

    let lines = read_lines(&output);
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "term 1,Job 1");
    assert_eq!(lines[5], "term 6,Job 6");
    assert!(!lines.iter().any(|line| line.starts_with("term 7")));
    assert_eq!(coordinator.stats().queries_seen, 6);
}

#[tokio::test]
async fn test_transport_failure_halts_page() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/topqueries/1",
        listing_page(&[
            ("Nurse", "/empleo-nurse.html"),
            ("Chef", "/empleo-chef.html"),
            ("Cook", "/empleo-cook.html"),
        ]),
    )
    .await;
    mount_page(
        &mock_server,
        "/empleo-nurse.html",
        detail_page(&["Enfermera"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/empleo-chef.html"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_page_expect(
        &mock_server,
        "/empleo-cook.html",
        detail_page(&["Cocinero"]),
        0,
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results.csv");
    let config = create_test_config(&mock_server.uri(), &output);

    let mut coordinator = Coordinator::new(config).unwrap();
    let result = coordinator.run_until(std::future::pending()).await;

    assert!(matches!(result, Err(HarvestError::Status { status: 500, .. })));
    assert_eq!(read_lines(&output), vec!["nurse,Enfermera"]);
    assert!(coordinator.ledger().contains("nurse"));
    assert!(!coordinator.ledger().contains("chef"));
    assert_eq!(coordinator.stats().queries_seen, 1);
}

#[tokio::test]
async fn test_missing_listing_page_is_fatal() {
    let mock_server = MockServer::start().await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results.csv");
    let config = create_test_config(&mock_server.uri(), &output);

    let mut coordinator = Coordinator::new(config).unwrap();
    let result = coordinator.run_until(std::future::pending()).await;

    assert!(matches!(result, Err(HarvestError::Status { status: 404, .. })));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_rerun_with_fresh_ledger_duplicates_output() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/topqueries/1",
        listing_page(&[("Nurse", "/empleo-nurse.html")]),
    )
    .await;
    mount_page(&mock_server, "/topqueries/2", listing_page(&[])).await;
    mount_page(
        &mock_server,
        "/empleo-nurse.html",
        detail_page(&["Enfermera UCI"]),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results.csv");

    for _ in 0..2 {
        let config = create_test_config(&mock_server.uri(), &output);
        let mut coordinator = Coordinator::new(config).unwrap();
        coordinator.run_until(std::future::pending()).await.unwrap();
        assert_eq!(coordinator.stats().queries_seen, 1);
    }

    assert_eq!(
        read_lines(&output),
        vec!["nurse,Enfermera UCI", "nurse,Enfermera UCI"]
    );
}

#[tokio::test]
async fn test_rerun_with_seeded_ledger_skips_known_terms() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/topqueries/1",
        listing_page(&[("Nurse", "/empleo-nurse.html"), ("Chef", "/empleo-chef.html")]),
    )
    .await;
    mount_page(&mock_server, "/topqueries/2", listing_page(&[])).await;
    mount_page_expect(
        &mock_server,
        "/empleo-nurse.html",
        detail_page(&["Enfermera UCI"]),
        0,
    )
    .await;
    mount_page_expect(
        &mock_server,
        "/empleo-chef.html",
        detail_page(&["Cocinero"]),
        1,
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results.csv");
    std::fs::write(&output, "nurse,Enfermera UCI\n").unwrap();

    let mut config = create_test_config(&mock_server.uri(), &output);
    config.crawler.ledger_seed = LedgerSeed::OutputFile;

    let mut coordinator = Coordinator::new(config).unwrap();
    coordinator.run_until(std::future::pending()).await.unwrap();

    assert_eq!(
        read_lines(&output),
        vec!["nurse,Enfermera UCI", "chef,Cocinero"]
    );
    assert_eq!(coordinator.stats().queries_seen, 1);
}

#[tokio::test]
async fn test_injected_ledger_skips_known_terms() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/topqueries/1",
        listing_page(&[("Nurse", "/empleo-nurse.html")]),
    )
    .await;
    mount_page(&mock_server, "/topqueries/2", listing_page(&[])).await;
    mount_page_expect(
        &mock_server,
        "/empleo-nurse.html",
        detail_page(&["Enfermera UCI"]),
        0,
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results.csv");
    let config = create_test_config(&mock_server.uri(), &output);

    let mut ledger = Ledger::new();
    ledger.add("nurse");

    let mut coordinator = Coordinator::new(config).unwrap().with_ledger(ledger);
    let outcome = coordinator.run_until(std::future::pending()).await.unwrap();

    assert_eq!(outcome, CrawlOutcome::Exhausted { pages: 1 });
    assert_eq!(coordinator.stats().queries_seen, 0);
    assert!(!output.exists());
}

#[tokio::test]
async fn test_page_limit() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/topqueries/1",
        listing_page(&[("Nurse", "/empleo-nurse.html")]),
    )
    .await;
    mount_page_expect(
        &mock_server,
        "/topqueries/2",
        listing_page(&[("Chef", "/empleo-chef.html")]),
        0,
    )
    .await;
    mount_page(
        &mock_server,
        "/empleo-nurse.html",
        detail_page(&["Enfermera"]),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results.csv");
    let mut config = create_test_config(&mock_server.uri(), &output);
    config.crawler.max_pages = Some(1);

    let mut coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator.run_until(std::future::pending()).await.unwrap();

    assert_eq!(outcome, CrawlOutcome::PageLimit { pages: 1 });
    assert_eq!(read_lines(&output), vec!["nurse,Enfermera"]);
}

#[tokio::test]
async fn test_shutdown_stops_new_fetches() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/topqueries/1",
        listing_page(&[("Nurse", "/empleo-nurse.html"), ("Chef", "/empleo-chef.html")]),
    )
    .await;
    mount_page(
        &mock_server,
        "/empleo-nurse.html",
        detail_page(&["Enfermera"]),
    )
    .await;
    // Shutdown fires as soon as the chef request reaches the server; the
    // response itself never arrives within the test
    let chef_requested = Arc::new(Notify::new());
    Mock::given(method("GET"))
        .and(path("/empleo-chef.html"))
        .respond_with(NotifyingResponder {
            notify: Arc::clone(&chef_requested),
            template: ResponseTemplate::new(200)
                .set_body_string(detail_page(&["Cocinero"]))
                .set_delay(std::time::Duration::from_secs(60)),
        })
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results.csv");
    let config = create_test_config(&mock_server.uri(), &output);

    let mut coordinator = Coordinator::new(config).unwrap();
    let shutdown = {
        let chef_requested = Arc::clone(&chef_requested);
        async move { chef_requested.notified().await }
    };
    let outcome = coordinator.run_until(shutdown).await.unwrap();

    assert_eq!(outcome, CrawlOutcome::Interrupted { pages: 0 });
    assert_eq!(read_lines(&output), vec!["nurse,Enfermera"]);
    assert!(!coordinator.ledger().contains("chef"));
}

/// Responds with `template` and signals `notify` when a request arrives
struct NotifyingResponder {
    notify: Arc<Notify>,
    template: ResponseTemplate,
}

impl Respond for NotifyingResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.notify.notify_one();
        self.template.clone()
    }
}
