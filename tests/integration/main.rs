//! Integration tests for the ingestion pipeline
//!
//! These tests use wiremock to serve a small wiki and run the crawl and
//! normalize stages end-to-end against it.

mod crawl_tests;
mod pipeline_tests;

use std::path::Path;
use wiki_corpus::config::IngestionConfig;

/// Creates a configuration pointed at a mock wiki, with short timeouts
pub fn create_test_config(dir: &Path, server_uri: &str, start_path: &str) -> IngestionConfig {
    let mut config = IngestionConfig::new(dir.join("raw"), dir.join("clean"));
    config.site.start_url = format!("{}{}", server_uri, start_path);
    config.site.base_url = server_uri.to_string();
    config.http.timeout_ms = 2_000;
    config.http.connect_timeout_ms = 1_000;
    config
}

/// Renders an index page with the given articles and navigation links
///
/// `nav` of `None` leaves out the navigation block entirely.
pub fn index_page(articles: &[(&str, &str)], nav: Option<&[(&str, &str)]>) -> String {
    let items: String = articles
        .iter()
        .map(|(title, href)| {
            format!(
                r#"<li><a href="{}" title="{}">{}</a></li>"#,
                href, title, title
            )
        })
        .collect();

    let navigation = nav
        .map(|links| {
            let anchors: String = links
                .iter()
                .map(|(text, href)| format!(r#"<a href="{}">{}</a>"#, href, text))
                .collect::<Vec<_>>()
                .join(" | ");
            format!(r#"<div class="mw-allpages-nav">{}</div>"#, anchors)
        })
        .unwrap_or_default();

    format!(
        r#"<html><body>{}<div class="mw-allpages-body"><ul>{}</ul></div>{}</body></html>"#,
        navigation, items, navigation
    )
}

/// Renders an article page whose content block holds the given paragraphs
pub fn article_page(paragraphs: &[&str]) -> String {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<p>{}</p>", p))
        .collect();
    format!(
        r#"<html><body><h1>Title</h1><div class="mw-parser-output">{}<table><tr><td>infobox</td></tr></table></div></body></html>"#,
        body
    )
}
