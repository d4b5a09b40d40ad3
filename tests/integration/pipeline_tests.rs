//! Full ingestion runs against a mock wiki

use crate::{article_page, create_test_config, index_page};
use std::fs;
use tempfile::TempDir;
use wiki_corpus::config::WriteMode;
use wiki_corpus::{IngestError, Ingestion, Stage, StopReason};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_goku_wiki(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/index"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(index_page(
                &[("Goku", "/wiki/Goku"), ("Son Gohan", "/wiki/Son_Gohan")],
                Some(&[("Previous page (Zarbon)", "/index")]),
            )),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/wiki/Goku"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><div class="mw-parser-output"><p>Goku is a Saiyan.
</p><ul><li>raised on  Earth.</li></ul></div></body></html>"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/wiki/Son_Gohan"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(article_page(&["Scholar."])),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_end_to_end_goku() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_goku_wiki(&mock_server).await;

    let mut config = create_test_config(dir.path(), &mock_server.uri(), "/index");
    config.output.summary_path = Some(dir.path().join("summary.md"));
    let ingestion = Ingestion::new(config);

    let report = ingestion.run_with_report().await.unwrap();

    assert_eq!(report.clean_dir, dir.path().join("clean"));
    let crawl = report.crawl.as_ref().unwrap();
    assert_eq!(crawl.pages_visited, 1);
    assert_eq!(crawl.articles_written, 2);
    assert_eq!(crawl.stop_reason, StopReason::WrappedToStart);
    assert_eq!(report.normalize.files_cleaned, 2);

    assert_eq!(
        fs::read_to_string(dir.path().join("raw/Goku.txt")).unwrap(),
        "Goku is a Saiyan.\nraised on  Earth."
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("clean/Goku.txt")).unwrap(),
        "Goku is a Saiyan. raised on Earth."
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("clean/SonGohan.txt")).unwrap(),
        "Scholar."
    );

    let summary = fs::read_to_string(dir.path().join("summary.md")).unwrap();
    assert!(summary.contains("| Articles captured | 2 |"));
}

#[tokio::test]
async fn test_run_returns_clean_dir() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_goku_wiki(&mock_server).await;

    let config = create_test_config(dir.path(), &mock_server.uri(), "/index");
    let clean_dir = Ingestion::new(config).run().await.unwrap();

    assert_eq!(clean_dir, dir.path().join("clean"));
    assert!(clean_dir.join("Goku.txt").is_file());
}

#[tokio::test]
async fn test_disabled_crawl_makes_no_requests() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    fs::create_dir_all(dir.path().join("raw")).unwrap();
    fs::write(dir.path().join("raw/Vegeta.txt"), "Prince\n\nof  Saiyans").unwrap();

    let mut config = create_test_config(dir.path(), &mock_server.uri(), "/index");
    config.ingestion.crawl_enabled = false;
    let report = Ingestion::new(config).run_with_report().await.unwrap();

    assert!(report.crawl.is_none());
    assert_eq!(
        fs::read_to_string(dir.path().join("clean/Vegeta.txt")).unwrap(),
        "Prince of Saiyans"
    );
}

#[tokio::test]
async fn test_crawl_failure_is_tagged_and_skips_normalize() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/index"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(index_page(&[("Missing", "/wiki/Missing")], None)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = create_test_config(dir.path(), &mock_server.uri(), "/index");
    let err = Ingestion::new(config).run().await.unwrap_err();

    assert!(matches!(err, IngestError::Crawl(_)));
    assert_eq!(err.stage(), Stage::Crawl);
    assert!(!dir.path().join("clean").exists());
    assert!(!dir.path().join("raw.lock").exists());
}

#[tokio::test]
async fn test_unreachable_index_is_fatal() {
    let dir = TempDir::new().unwrap();
    // Nothing listens on the discard port
    let config = create_test_config(dir.path(), "http://127.0.0.1:9", "/index");

    let err = Ingestion::new(config).run().await.unwrap_err();

    assert_eq!(err.stage(), Stage::Crawl);
}

#[tokio::test]
async fn test_append_mode_accumulates_captures() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_goku_wiki(&mock_server).await;

    let mut config = create_test_config(dir.path(), &mock_server.uri(), "/index");
    config.ingestion.write_mode = WriteMode::Append;
    let ingestion = Ingestion::new(config);

    ingestion.run().await.unwrap();
    ingestion.run().await.unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("raw/SonGohan.txt")).unwrap(),
        "Scholar.Scholar."
    );
}

#[tokio::test]
async fn test_overwrite_mode_replaces_captures() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_goku_wiki(&mock_server).await;

    let config = create_test_config(dir.path(), &mock_server.uri(), "/index");
    let ingestion = Ingestion::new(config);

    ingestion.run().await.unwrap();
    ingestion.run().await.unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("raw/SonGohan.txt")).unwrap(),
        "Scholar."
    );
}
