//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! full crawl cycle end-to-end: frontier traversal, scope filtering,
//! content extraction, failure isolation, and the archive file format.

use papyrus::config::{Config, ContentConfig, CrawlConfig, OutputConfig, ScopeConfig, UserAgentConfig};
use papyrus::crawler::crawl;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at a mock server
fn create_test_config(origin: &str, seed: &str, archive_path: &str) -> Config {
    Config {
        crawl: CrawlConfig {
            seed_url: seed.to_string(),
            politeness_delay_ms: 0, // No pacing in tests
            fetch_timeout_secs: 10,
            max_retries: 0,
            workers: 2,
        },
        scope: ScopeConfig {
            origin: origin.to_string(),
            excluded_prefixes: vec!["/scans/".to_string()],
            excluded_extensions: vec![".jpg".to_string(), ".pdf".to_string()],
        },
        content: ContentConfig {
            min_block_words: 20,
        },
        output: OutputConfig {
            archive_path: archive_path.to_string(),
            flush_every_pages: 1,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
        },
    }
}

/// A paragraph with exactly `n` distinct words
fn paragraph(n: usize) -> String {
    (0..n).map(|i| format!("word{}", i)).collect::<Vec<_>>().join(" ")
}

/// Wraps body markup in a minimal page
fn page_html(title: &str, body: &str) -> String {
    format!(
        "<html><head><title>{}</title></head><body>{}</body></html>",
        title, body
    )
}

async fn mount_page(server: &MockServer, page_path: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_end_to_end_example() {
    // Seed /a links to /b (in scope) and to another origin (out of scope);
    // /a has one 25-word paragraph, /b has nothing substantive.
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/a",
        page_html(
            "Page A",
            &format!(
                r#"<div><p>{}</p></div>
                <a href="/b">Next</a>
                <a href="https://other.example/x">Elsewhere</a>"#,
                paragraph(25)
            ),
        ),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(page_html("Page B", "<div><p>too short</p></div>"))
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let archive_path = dir.path().join("archive.txt");
    let config = create_test_config(
        &base_url,
        &format!("{}/a", base_url),
        archive_path.to_str().unwrap(),
    );

    let summary = crawl(config).await.expect("Crawl failed");

    assert_eq!(summary.pages_visited, 2);
    assert_eq!(summary.pages_archived, 1);
    assert_eq!(summary.pages_failed, 0);

    let content = std::fs::read_to_string(&archive_path).unwrap();
    assert_eq!(content.matches("URL: ").count(), 1);
    assert!(content.contains(&format!("URL: {}/a", base_url)));
    assert!(content.contains(&paragraph(25)));
    assert!(!content.contains("other.example"));
}

#[tokio::test]
async fn test_closed_graph_terminates_and_visits_all() {
    // A cyclic link graph: / -> /a -> /b -> / ; every page links back.
    // The crawl must terminate with each page fetched exactly once.
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let body = |links: &str| {
        page_html(
            "Cycle",
            &format!("<div><p>{}</p></div>{}", paragraph(30), links),
        )
    };

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body(r#"<a href="/a">a</a><a href="/b">b</a>"#))
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body(r#"<a href="/b">b</a><a href="/">home</a>"#))
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body(r#"<a href="/">home</a><a href="/a">a</a>"#))
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let archive_path = dir.path().join("archive.txt");
    let mut config = create_test_config(
        &base_url,
        &format!("{}/", base_url),
        archive_path.to_str().unwrap(),
    );
    // Exercise the shared politeness gate under concurrency
    config.crawl.politeness_delay_ms = 10;

    let summary = crawl(config).await.expect("Crawl failed");

    assert_eq!(summary.pages_visited, 3);
    assert_eq!(summary.pages_archived, 3);

    let content = std::fs::read_to_string(&archive_path).unwrap();
    assert_eq!(content.matches("URL: ").count(), 3);
}

#[tokio::test]
async fn test_failure_isolation() {
    // One page deterministically returns 500; the rest of the crawl must
    // complete and the archive must simply omit the failing URL.
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        page_html(
            "Home",
            &format!(
                r#"<div><p>{}</p></div>
                <a href="/ok">ok</a>
                <a href="/broken">broken</a>"#,
                paragraph(25)
            ),
        ),
    )
    .await;

    mount_page(
        &mock_server,
        "/ok",
        page_html("OK", &format!("<div><p>{}</p></div>", paragraph(25))),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let archive_path = dir.path().join("archive.txt");
    let config = create_test_config(
        &base_url,
        &format!("{}/", base_url),
        archive_path.to_str().unwrap(),
    );

    let summary = crawl(config).await.expect("Crawl failed");

    assert_eq!(summary.pages_visited, 3);
    assert_eq!(summary.pages_archived, 2);
    assert_eq!(summary.pages_failed, 1);

    let content = std::fs::read_to_string(&archive_path).unwrap();
    assert!(content.contains(&format!("URL: {}/ok", base_url)));
    assert!(!content.contains("/broken"));
}

#[tokio::test]
async fn test_excluded_urls_never_fetched() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        page_html(
            "Home",
            &format!(
                r#"<div><p>{}</p></div>
                <a href="/photo.jpg">photo</a>
                <a href="/scans/book.html">scan</a>
                <a href="/fine.html">fine</a>"#,
                paragraph(25)
            ),
        ),
    )
    .await;

    mount_page(
        &mock_server,
        "/fine.html",
        page_html("Fine", &format!("<div><p>{}</p></div>", paragraph(25))),
    )
    .await;

    // Excluded by extension and prefix: must never be requested
    Mock::given(method("GET"))
        .and(path("/photo.jpg"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/scans/book.html"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let archive_path = dir.path().join("archive.txt");
    let config = create_test_config(
        &base_url,
        &format!("{}/", base_url),
        archive_path.to_str().unwrap(),
    );

    let summary = crawl(config).await.expect("Crawl failed");
    assert_eq!(summary.pages_visited, 2);
}

#[tokio::test]
async fn test_duplicate_spellings_fetched_once() {
    // Three spellings of the same resource must collapse to one fetch
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        page_html(
            "Home",
            &format!(
                r#"<div><p>{}</p></div>
                <a href="/page">one</a>
                <a href="/page/">two</a>
                <a href="/page#section">three</a>"#,
                paragraph(25)
            ),
        ),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(page_html(
                    "Page",
                    &format!("<div><p>{}</p></div>", paragraph(25)),
                ))
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let archive_path = dir.path().join("archive.txt");
    let config = create_test_config(
        &base_url,
        &format!("{}/", base_url),
        archive_path.to_str().unwrap(),
    );

    let summary = crawl(config).await.expect("Crawl failed");
    assert_eq!(summary.pages_visited, 2);
}

#[tokio::test]
async fn test_transient_failure_retried() {
    // First response exceeds the client timeout; the retry succeeds.
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(page_html("Slow", ""))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    mount_page(
        &mock_server,
        "/slow",
        page_html("Slow", &format!("<div><p>{}</p></div>", paragraph(25))),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let archive_path = dir.path().join("archive.txt");
    let mut config = create_test_config(
        &base_url,
        &format!("{}/slow", base_url),
        archive_path.to_str().unwrap(),
    );
    config.crawl.fetch_timeout_secs = 1;
    config.crawl.max_retries = 1;

    let summary = crawl(config).await.expect("Crawl failed");

    assert_eq!(summary.pages_visited, 1);
    assert_eq!(summary.pages_archived, 1);
    assert_eq!(summary.pages_failed, 0);
}

#[tokio::test]
async fn test_archive_entry_format() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/only",
        page_html("Only", &format!("<div><p>{}</p></div>", paragraph(25))),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let archive_path = dir.path().join("archive.txt");
    let config = create_test_config(
        &base_url,
        &format!("{}/only", base_url),
        archive_path.to_str().unwrap(),
    );

    crawl(config).await.expect("Crawl failed");

    let content = std::fs::read_to_string(&archive_path).unwrap();
    let delimiter = "=".repeat(80);
    let expected = format!(
        "{d}\nURL: {base}/only\n{d}\n\n{body}\n\n",
        d = delimiter,
        base = base_url,
        body = paragraph(25)
    );
    assert_eq!(content, expected);
}

#[tokio::test]
async fn test_seed_out_of_scope_is_startup_error() {
    let dir = TempDir::new().unwrap();
    let archive_path = dir.path().join("archive.txt");

    // Seed under an excluded prefix: rejected before any network activity
    let config = create_test_config(
        "https://example.org",
        "https://example.org/scans/book.html",
        archive_path.to_str().unwrap(),
    );

    let result = crawl(config).await;
    assert!(result.is_err());
}
