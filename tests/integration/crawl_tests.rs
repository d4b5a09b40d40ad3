//! Crawl stage against a mock wiki

use crate::{article_page, create_test_config, index_page};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiki_corpus::config::ArticleErrorPolicy;
use wiki_corpus::crawler::{CrawlError, Crawler};
use wiki_corpus::output::{ProgressEvent, RecordingReporter};
use wiki_corpus::{Stage, StopReason};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_html(server: &MockServer, route: &str, body: String) {
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

fn crawler(config: wiki_corpus::IngestionConfig) -> (Crawler, Arc<RecordingReporter>) {
    let reporter = Arc::new(RecordingReporter::new());
    let crawler = Crawler::new(Arc::new(config), reporter.clone()).unwrap();
    (crawler, reporter)
}

#[tokio::test]
async fn test_pagination_until_wrap_to_start() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let pages = [
        ("/index1", "Goku", None, Some("/index2")),
        ("/index2", "Vegeta", Some("/index1"), Some("/index3")),
        ("/index3", "Yamcha", Some("/index2"), None),
    ];

    for (route, title, prev, next) in pages {
        let mut nav = Vec::new();
        if let Some(prev) = prev {
            nav.push(("Previous page (A)", prev));
        }
        if let Some(next) = next {
            nav.push(("Next page (Z)", next));
        }
        let article_path = format!("/wiki/{}", title);

        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(index_page(
                        &[(title, article_path.as_str())],
                        Some(nav.as_slice()),
                    )),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        mount_html(
            &mock_server,
            &article_path,
            article_page(&[&format!("{} trains.", title)]),
        )
        .await;
    }

    let (crawler, _) = crawler(create_test_config(dir.path(), &mock_server.uri(), "/index1"));
    let summary = crawler.run().await.unwrap();

    assert_eq!(summary.pages_visited, 3);
    assert_eq!(summary.articles_written, 3);
    assert_eq!(summary.stop_reason, StopReason::WrappedToStart);
    assert_eq!(
        fs::read_to_string(dir.path().join("raw/Vegeta.txt")).unwrap(),
        "Vegeta trains."
    );
    // `expect(1)` on every index page is verified when the server drops
}

#[tokio::test]
async fn test_missing_navigation_halts_cleanly() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/index",
        index_page(&[("Goku", "/wiki/Goku")], None),
    )
    .await;
    mount_html(
        &mock_server,
        "/wiki/Goku",
        article_page(&["Goku is a Saiyan.", "He was raised on Earth."]),
    )
    .await;

    let (crawler, _) = crawler(create_test_config(dir.path(), &mock_server.uri(), "/index"));
    let summary = crawler.run().await.unwrap();

    assert_eq!(summary.pages_visited, 1);
    assert_eq!(summary.stop_reason, StopReason::NoNavigation);
    assert_eq!(
        fs::read_to_string(dir.path().join("raw/Goku.txt")).unwrap(),
        "Goku is a Saiyan.He was raised on Earth."
    );
}

#[tokio::test]
async fn test_missing_content_block_writes_empty_capture() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/index",
        index_page(&[("Stub", "/wiki/Stub")], None),
    )
    .await;
    mount_html(
        &mock_server,
        "/wiki/Stub",
        "<html><body><p>Nothing here</p></body></html>".to_string(),
    )
    .await;

    let (crawler, _) = crawler(create_test_config(dir.path(), &mock_server.uri(), "/index"));
    let summary = crawler.run().await.unwrap();

    assert_eq!(summary.articles_written, 1);
    assert_eq!(
        fs::read_to_string(dir.path().join("raw/Stub.txt")).unwrap(),
        ""
    );
}

#[tokio::test]
async fn test_article_timeout_is_skipped() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/index",
        index_page(&[("Slow", "/wiki/Slow"), ("Fast", "/wiki/Fast")], None),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(article_page(&["Too late."]))
                .set_delay(Duration::from_millis(1_500)),
        )
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/wiki/Fast", article_page(&["On time."])).await;

    let mut config = create_test_config(dir.path(), &mock_server.uri(), "/index");
    config.http.timeout_ms = 200;
    let (crawler, _) = crawler(config);
    let summary = crawler.run().await.unwrap();

    assert_eq!(summary.articles_written, 1);
    assert_eq!(summary.articles_skipped, 1);
    assert!(!dir.path().join("raw/Slow.txt").exists());
    assert!(dir.path().join("raw/Fast.txt").exists());
}

#[tokio::test]
async fn test_article_http_error_aborts_by_default() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/index",
        index_page(&[("Missing", "/wiki/Missing")], None),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let (crawler, _) = crawler(create_test_config(dir.path(), &mock_server.uri(), "/index"));
    let err = crawler.run().await.unwrap_err();

    match err {
        CrawlError::ArticleFetch { url, reason } => {
            assert_eq!(url, format!("{}/wiki/Missing", mock_server.uri()));
            assert_eq!(reason, "HTTP 404");
        }
        other => panic!("expected article fetch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_article_http_error_skipped_with_skip_policy() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/index",
        index_page(&[("Missing", "/wiki/Missing"), ("Goku", "/wiki/Goku")], None),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/wiki/Goku", article_page(&["Kamehameha."])).await;

    let mut config = create_test_config(dir.path(), &mock_server.uri(), "/index");
    config.ingestion.on_article_error = ArticleErrorPolicy::Skip;
    let (crawler, _) = crawler(config);
    let summary = crawler.run().await.unwrap();

    assert_eq!(summary.articles_written, 1);
    assert_eq!(summary.articles_skipped, 1);
    assert!(dir.path().join("raw/Goku.txt").exists());
}

#[tokio::test]
async fn test_index_error_status_stops_without_error() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/index"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (crawler, _) = crawler(create_test_config(dir.path(), &mock_server.uri(), "/index"));
    let summary = crawler.run().await.unwrap();

    assert_eq!(summary.pages_visited, 1);
    assert_eq!(summary.articles_written, 0);
    assert_eq!(summary.stop_reason, StopReason::IndexStatus(500));
}

#[tokio::test]
async fn test_missing_article_list_stops() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/index",
        "<html><body><p>Maintenance</p></body></html>".to_string(),
    )
    .await;

    let (crawler, _) = crawler(create_test_config(dir.path(), &mock_server.uri(), "/index"));
    let summary = crawler.run().await.unwrap();

    assert_eq!(summary.stop_reason, StopReason::MissingArticleList);
    assert!(dir.path().join("raw").is_dir());
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/index",
        index_page(&[("Goku", "/wiki/Goku")], None),
    )
    .await;
    // Mounted first, so it answers the first request only
    Mock::given(method("GET"))
        .and(path("/wiki/Goku"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/wiki/Goku", article_page(&["Back online."])).await;

    let mut config = create_test_config(dir.path(), &mock_server.uri(), "/index");
    config.http.max_retries = 2;
    config.http.retry_base_ms = 2;
    config.http.retry_max_ms = 10;
    let (crawler, _) = crawler(config);
    let summary = crawler.run().await.unwrap();

    assert_eq!(summary.articles_written, 1);
    assert_eq!(
        fs::read_to_string(dir.path().join("raw/Goku.txt")).unwrap(),
        "Back online."
    );
}

#[tokio::test]
async fn test_concurrent_fetches_keep_index_order() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let titles = ["Bulma", "Chiaotzu", "Goku", "Krillin", "Piccolo"];
    let links: Vec<(String, String)> = titles
        .iter()
        .map(|t| (t.to_string(), format!("/wiki/{}", t)))
        .collect();
    let refs: Vec<(&str, &str)> = links
        .iter()
        .map(|(t, l)| (t.as_str(), l.as_str()))
        .collect();

    mount_html(&mock_server, "/index", index_page(&refs, None)).await;
    for (i, (title, link)) in links.iter().enumerate() {
        Mock::given(method("GET"))
            .and(path(link.as_str()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(article_page(&[title.as_str()]))
                    // Earlier articles answer later
                    .set_delay(Duration::from_millis(50 * (titles.len() - i) as u64)),
            )
            .mount(&mock_server)
            .await;
    }

    let mut config = create_test_config(dir.path(), &mock_server.uri(), "/index");
    config.http.article_concurrency = 5;
    config.ingestion.checkpoint_interval = 2;
    let (crawler, reporter) = crawler(config);
    let summary = crawler.run().await.unwrap();

    assert_eq!(summary.articles_written, 5);
    for title in titles {
        assert_eq!(
            fs::read_to_string(dir.path().join(format!("raw/{}.txt", title))).unwrap(),
            title
        );
    }
    assert_eq!(
        reporter.events(),
        vec![
            ProgressEvent::Checkpoint(Stage::Crawl, 2),
            ProgressEvent::Checkpoint(Stage::Crawl, 4),
            ProgressEvent::Finished(Stage::Crawl, 5),
        ]
    );
}

#[tokio::test]
async fn test_transient_failure_without_retries_aborts() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/index",
        index_page(&[("Goku", "/wiki/Goku")], None),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Goku"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (crawler, _) = crawler(create_test_config(dir.path(), &mock_server.uri(), "/index"));
    let err = crawler.run().await.unwrap_err();

    assert!(matches!(err, CrawlError::ArticleFetch { .. }));
}
