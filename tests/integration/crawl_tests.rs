//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end over real HTTP.

use std::sync::Mutex;
use thread_harvest::config::Config;
use thread_harvest::crawler::{fetch_popular_threads, HttpTransport, Transport};
use thread_harvest::output::{progress_event, EventStreamSink};
use thread_harvest::{crawl, probe_thread, HarvestError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a fast test configuration
fn create_test_config(concurrency: u32) -> Config {
    let mut config = Config::default();
    config.crawler.base_delay_ms = 10; // Very short for testing
    config.crawler.concurrency_limit = concurrency;
    config.crawler.timeout_ms = 5_000;
    config
}

/// Builds a thread page with two posts and pagination up to `last_page`
fn thread_page(page: u32, last_page: u32) -> String {
    format!(
        r#"<html><head><title>Thread</title></head><body>
        <div class="page-title"><h1><a href="/thread/t123">Integration thread</a></h1></div>
        <div class="pagination">
            <a href="/thread/t123p2">2</a>
            <a href="/thread/t123p{last}">Last</a>
        </div>
        <div class="post">
            <a id="postcount{first}">#{first}</a>
            <div class="post_message">Post {page}-1</div>
        </div>
        <div class="post">
            <a id="postcount{second}">#{second}</a>
            <div class="post_message">Post {page}-2</div>
        </div>
        </body></html>"#,
        last = last_page,
        page = page,
        first = page * 2 - 1,
        second = page * 2,
    )
}

/// HTML response declaring UTF-8
///
/// `set_body_raw` sets the content type; `set_body_string` would force text/plain.
fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/html; charset=utf-8")
}

/// Mounts pages 1..=last of the thread, skipping `failing`
async fn mount_thread(server: &MockServer, last_page: u32, failing: Option<u32>) {
    for page in 1..=last_page {
        let route = if page == 1 {
            "/thread/t123".to_string()
        } else {
            format!("/thread/t123p{}", page)
        };

        let response = if Some(page) == failing {
            ResponseTemplate::new(500)
        } else {
            html(thread_page(page, last_page))
        };

        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(response)
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_full_crawl_over_http() {
    let server = MockServer::start().await;
    mount_thread(&server, 3, None).await;
    let base_url = format!("{}/thread/t123", server.uri());

    let outcome = crawl(&base_url, &create_test_config(2), None)
        .await
        .expect("Crawl should complete");

    assert_eq!(outcome.thread.total_pages, 3);
    assert_eq!(outcome.thread.title.as_deref(), Some("Integration thread"));

    let bodies: Vec<&str> = outcome.records.iter().map(|r| r.body.as_str()).collect();
    assert_eq!(
        bodies,
        vec!["Post 1-1", "Post 1-2", "Post 2-1", "Post 2-2", "Post 3-1", "Post 3-2"]
    );
    assert_eq!(outcome.records[0].id, "#1");
    assert_eq!(outcome.records[5].id, "#6");
    assert!(outcome.is_complete());

    // Probe plus one request per page
    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 4);

    // Two batches (pages 1-2, then page 3) with one pause between them
    let waits = outcome
        .log
        .iter()
        .filter(|line| line.starts_with("Waiting"))
        .count();
    assert_eq!(waits, 1);
    assert_eq!(outcome.full_text().matches("\n\n").count(), 5);
}

#[tokio::test]
async fn test_crawl_with_failing_page() {
    let server = MockServer::start().await;
    mount_thread(&server, 5, Some(2)).await;
    let base_url = format!("{}/thread/t123", server.uri());

    let outcome = crawl(&base_url, &create_test_config(3), None)
        .await
        .expect("Crawl should complete despite a failed page");

    let pages: Vec<u32> = outcome.records.iter().map(|r| r.page).collect();
    assert_eq!(pages, vec![1, 1, 3, 3, 4, 4, 5, 5]);
    assert_eq!(outcome.failed_pages, vec![2]);

    let errors: Vec<&String> = outcome
        .log
        .iter()
        .filter(|line| line.starts_with("Error fetching page"))
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("page 2"));
    assert!(errors[0].contains("500"));
}

#[tokio::test]
async fn test_crawl_with_stride_and_cap() {
    let server = MockServer::start().await;
    mount_thread(&server, 9, None).await;
    let base_url = format!("{}/thread/t123", server.uri());

    let mut config = create_test_config(3);
    config.crawler.stride = 4;
    config.crawler.max_pages = Some(2);

    let outcome = crawl(&base_url, &config, None).await.expect("Crawl should complete");

    let pages: Vec<u32> = outcome.records.iter().map(|r| r.page).collect();
    assert_eq!(pages, vec![1, 1, 5, 5]);
    assert_eq!(outcome.pages_attempted, 2);
}

#[tokio::test]
async fn test_crawl_streams_progress_frames() {
    let server = MockServer::start().await;
    mount_thread(&server, 2, None).await;
    let base_url = format!("{}/thread/t123", server.uri());

    let sink = EventStreamSink::new(Vec::new());
    let outcome = crawl(&base_url, &create_test_config(3), Some(&sink))
        .await
        .expect("Crawl should complete");

    let frames = String::from_utf8(sink.into_inner()).expect("Frames are UTF-8");
    let expected: String = outcome.log.iter().map(|line| progress_event(line)).collect();
    assert_eq!(frames, expected);
    assert!(frames.starts_with("data: Total pages: 2\n\n"));
}

#[tokio::test]
async fn test_probe_defaults_when_thread_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let base_url = format!("{}/thread/t404", server.uri());

    let info = probe_thread(&base_url, &Config::default())
        .await
        .expect("Probe never fails on fetch errors");

    assert_eq!(info.total_pages, 1);
    assert_eq!(info.title, None);
}

#[tokio::test]
async fn test_invalid_url_fetches_nothing() {
    let seen = Mutex::new(Vec::<String>::new());
    let sink = |line: &str| seen.lock().unwrap().push(line.to_string());

    let result = crawl("   ", &create_test_config(3), Some(&sink)).await;

    assert!(matches!(result, Err(HarvestError::Url(_))));
    assert!(seen.lock().unwrap().is_empty());

    let result = crawl("ftp://forum.example/t1", &create_test_config(3), None).await;
    assert!(matches!(result, Err(HarvestError::Url(_))));
}

#[tokio::test]
async fn test_popular_threads_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/populara-amnen/"))
        .respond_with(html(
            r#"<html><body><table><tr>
                <td>
                    <a class="thread-title" href="/t99">Hot topic</a>
                    <a class="thread-forum-title" href="/f3">Samhälle</a>
                </td>
                <td><div class="text-muted">2 048 visningar • 5 läsare • 77 svar</div></td>
            </tr></table></body></html>"#
                .to_string(),
        ))
        .mount(&server)
        .await;

    let config = Config::default();
    let transport = HttpTransport::new(&config.http).expect("Client should build");
    let listing_url = format!("{}/populara-amnen/", server.uri());

    let threads = fetch_popular_threads(&transport, &listing_url, &config.listing)
        .await
        .expect("Listing should parse");

    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].title, "Hot topic");
    assert_eq!(threads[0].url, Some(format!("{}/t99", server.uri())));
    assert_eq!(threads[0].category, "Samhälle");
    assert_eq!(threads[0].views, Some(2048));
    assert_eq!(threads[0].replies, Some(77));
}

#[tokio::test]
async fn test_declared_utf8_body_is_decoded_as_utf8() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/thread/t7"))
        .respond_with(html("<p>Samhälle och kärnkraft</p>".to_string()))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&Config::default().http).expect("Client should build");
    let body = transport
        .get(&format!("{}/thread/t7", server.uri()))
        .await
        .expect("Fetch should succeed");

    assert_eq!(body, "<p>Samhälle och kärnkraft</p>");
}

#[tokio::test]
async fn test_undeclared_charset_falls_back_to_default() {
    let server = MockServer::start().await;
    // "Samhälle" encoded as ISO-8859-1, with no charset on the content type
    let latin1 = b"<p>Samh\xe4lle</p>".to_vec();
    Mock::given(method("GET"))
        .and(path("/thread/t8"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(latin1, "text/html"))
        .mount(&server)
        .await;

    let config = Config::default();
    assert_eq!(config.http.default_charset, "iso-8859-1");
    let transport = HttpTransport::new(&config.http).expect("Client should build");
    let body = transport
        .get(&format!("{}/thread/t8", server.uri()))
        .await
        .expect("Fetch should succeed");

    assert_eq!(body, "<p>Samhälle</p>");
}
