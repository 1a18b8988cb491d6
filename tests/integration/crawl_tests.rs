//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, including the sitemap and history files.

use ripple_sitemap::config::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use ripple_sitemap::crawler::{run_once, CrawlEngine};
use ripple_sitemap::storage::load_history;
use ripple_sitemap::url::JoinStrategy;
use ripple_sitemap::RippleError;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing its artifacts into `dir`
fn create_test_config(seed: &str, dir: &TempDir) -> Config {
    Config {
        crawler: CrawlerConfig {
            seed_url: seed.to_string(),
            fetch_timeout: 5,
            max_concurrent_fetches: 1,
            link_join: JoinStrategy::Concatenate,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            sitemap_path: dir.path().join("sitemap.xml"),
            history_path: dir.path().join("history.log"),
        },
    }
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>Test</title></head><body>{}</body></html>",
            body
        ))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_seed_without_links_yields_single_entry() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_page(&mock_server, "/", "No links at all").await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", base_url), &dir);

    let report = run_once(&config).await.expect("Crawl failed");

    assert_eq!(report.urls, vec![format!("{}/", base_url)]);
    assert_eq!(report.count, 1);
    assert_eq!(report.message(), "Sitemap generated with 1 URLs");

    let sitemap = std::fs::read_to_string(&config.output.sitemap_path).unwrap();
    assert_eq!(sitemap.matches("<url>").count(), 1);
    assert!(sitemap.contains(&format!("<loc>{}/</loc>", base_url)));
    assert!(sitemap.contains(&format!(
        "<lastmod>{}</lastmod>",
        report.finished_at.format("%Y-%m-%d")
    )));
}

#[tokio::test]
async fn test_relative_and_fragment_links_deduplicate() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        &format!(
            r#"<a href="/about">About</a> <a href="{}/about#team">Team</a>"#,
            base_url
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html_page("About us"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", base_url), &dir);
    let report = run_once(&config).await.expect("Crawl failed");

    assert_eq!(
        report.urls,
        vec![format!("{}/", base_url), format!("{}/about", base_url)]
    );
}

#[tokio::test]
async fn test_mailto_and_cross_host_links_excluded() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Use localhost for the other server so the host differs from 127.0.0.1
    let other_url = other_server.uri().replace("127.0.0.1", "localhost");

    mount_page(
        &mock_server,
        "/",
        &format!(
            r#"<a href="mailto:a@b.com">Mail</a>
               <a href="tel:+15550100">Call</a>
               <a href="{}/page">Elsewhere</a>
               <a href="https://other-host.com/page">Other</a>"#,
            other_url
        ),
    )
    .await;
    Mock::given(method("GET"))
        .respond_with(html_page("never"))
        .expect(0)
        .mount(&other_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", base_url), &dir);
    let report = run_once(&config).await.expect("Crawl failed");

    assert_eq!(report.urls, vec![format!("{}/", base_url)]);
}

#[tokio::test]
async fn test_site_offline_writes_no_artifacts() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", mock_server.uri()), &dir);

    let result = run_once(&config).await;

    let err = result.expect_err("Crawl should fail");
    assert!(matches!(err, RippleError::NoUrlsDiscovered { .. }));
    assert!(err.to_string().starts_with("No URLs discovered"));
    assert!(!config.output.sitemap_path.exists());
    assert!(!config.output.history_path.exists());
}

#[tokio::test]
async fn test_connection_refused_writes_no_artifacts() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("http://127.0.0.1:{}/", port), &dir);

    let result = run_once(&config).await;

    assert!(matches!(result, Err(RippleError::NoUrlsDiscovered { .. })));
    assert!(!config.output.sitemap_path.exists());
    assert!(!config.output.history_path.exists());
}

#[tokio::test]
async fn test_sitemap_write_failure_fails_run_without_history() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", "Home").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", mock_server.uri()), &dir);
    config.output.sitemap_path = dir.path().join("missing").join("sitemap.xml");

    let result = run_once(&config).await;

    assert!(matches!(result, Err(RippleError::Write(_))));
    assert!(!config.output.sitemap_path.exists());
    assert!(!config.output.history_path.exists());
}

#[tokio::test]
async fn test_history_write_failure_fails_run() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", "Home").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", mock_server.uri()), &dir);
    config.output.history_path = dir.path().to_path_buf();

    let result = run_once(&config).await;

    assert!(matches!(result, Err(RippleError::Write(_))));
}

#[tokio::test]
async fn test_consecutive_runs_append_history() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_page(&mock_server, "/", r#"<a href="/a">A</a>"#).await;
    mount_page(&mock_server, "/a", "").await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", base_url), &dir);

    let first = run_once(&config).await.expect("First crawl failed");
    let second = run_once(&config).await.expect("Second crawl failed");

    let records = load_history(&config.output.history_path).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records[0].timestamp <= records[1].timestamp);
    assert_eq!(records[0].url_count, first.count);
    assert_eq!(records[1].url_count, second.count);
    assert_eq!(records[1].url_count, 2);
}

#[tokio::test]
async fn test_results_sorted_and_unique() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/zeta">z</a><a href="/alpha">a</a><a href="/mid">m</a><a href="/alpha#x">a2</a>"#,
    )
    .await;
    mount_page(&mock_server, "/zeta", r#"<a href="/alpha">a</a><a href="/beta">b</a>"#).await;
    mount_page(&mock_server, "/alpha", r#"<a href="/zeta">z</a>"#).await;
    mount_page(&mock_server, "/mid", r#"<a href="/">home</a>"#).await;
    mount_page(&mock_server, "/beta", "").await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", base_url), &dir);
    let report = run_once(&config).await.expect("Crawl failed");

    let expected: Vec<String> = ["/", "/alpha", "/beta", "/mid", "/zeta"]
        .iter()
        .map(|p| format!("{}{}", base_url, p))
        .collect();
    assert_eq!(report.urls, expected);

    // Sitemap preserves the sorted order
    let sitemap = std::fs::read_to_string(&config.output.sitemap_path).unwrap();
    let positions: Vec<usize> = expected
        .iter()
        .map(|u| sitemap.find(&format!("<loc>{}</loc>", u)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_unreachable_sibling_does_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/missing">gone</a><a href="/slow">slow</a><a href="/ok">ok</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_page("late").set_delay(std::time::Duration::from_secs(3)))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/ok", r#"<a href="/deeper">d</a>"#).await;
    mount_page(&mock_server, "/deeper", "").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", base_url), &dir);
    config.crawler.fetch_timeout = 1;

    let report = run_once(&config).await.expect("Crawl failed");

    assert_eq!(
        report.urls,
        vec![
            format!("{}/", base_url),
            format!("{}/deeper", base_url),
            format!("{}/ok", base_url),
        ]
    );
    assert_eq!(report.failed_pages, 2);
}

#[tokio::test]
async fn test_redirected_page_is_indexed_under_requested_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/old">old</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", format!("{}/new", base_url).as_str()),
        )
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/new", "").await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", base_url), &dir);
    let report = run_once(&config).await.expect("Crawl failed");

    assert_eq!(
        report.urls,
        vec![format!("{}/", base_url), format!("{}/old", base_url)]
    );
}

#[tokio::test]
async fn test_concurrent_engine_matches_sequential() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let root_links: String = (0..12)
        .map(|i| format!(r#"<a href="/section{}">s</a>"#, i))
        .collect();
    mount_page(&mock_server, "/", &root_links).await;
    for i in 0..12 {
        mount_page(
            &mock_server,
            &format!("/section{}", i),
            &format!(r#"<a href="/section{}/item">i</a><a href="/">home</a>"#, i),
        )
        .await;
        mount_page(&mock_server, &format!("/section{}/item", i), "").await;
    }

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", base_url), &dir);

    let mut sequential = CrawlEngine::new(&config).unwrap();
    let sequential = sequential.run().await.unwrap();

    config.crawler.max_concurrent_fetches = 6;
    let mut concurrent = CrawlEngine::new(&config).unwrap();
    let concurrent = concurrent.run().await.unwrap();

    assert_eq!(sequential.urls.len(), 25);
    assert_eq!(sequential, concurrent);
}

#[tokio::test]
async fn test_rfc3986_join_resolves_from_root() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/docs/", r#"<a href="/about">about</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html_page(""))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/docs/", base_url), &dir);
    config.crawler.link_join = JoinStrategy::Rfc3986;

    let report = run_once(&config).await.expect("Crawl failed");
    assert_eq!(
        report.urls,
        vec![format!("{}/about", base_url), format!("{}/docs/", base_url)]
    );
}

#[tokio::test]
async fn test_concatenate_join_appends_to_seed_path() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/docs/", r#"<a href="/about">about</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/docs/about"))
        .respond_with(html_page(""))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/docs/", base_url), &dir);

    let report = run_once(&config).await.expect("Crawl failed");
    assert_eq!(
        report.urls,
        vec![
            format!("{}/docs/", base_url),
            format!("{}/docs/about", base_url)
        ]
    );
}
