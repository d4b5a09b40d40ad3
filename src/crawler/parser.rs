//! HTML parser for index and article pages
//!
//! This module handles parsing HTML content to extract:
//! - Article links from the article-list block of an index page
//! - Pagination links from the navigation block of an index page
//! - Paragraph and list text from the content block of an article page
//!
//! Parsing is synchronous and returns owned data, so no parsed document is
//! ever held across an `.await`.

use crate::config::SelectorConfig;
use crate::corpus::ArticleRef;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Compiled structural selectors
#[derive(Debug, Clone)]
pub struct PageSelectors {
    navigation: Selector,
    article_list: Selector,
    content: Selector,
    anchor: Selector,
}

impl PageSelectors {
    /// Compiles the configured CSS selectors
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            navigation: compile_selector("navigation", &config.navigation)?,
            article_list: compile_selector("article-list", &config.article_list)?,
            content: compile_selector("content", &config.content)?,
            anchor: compile_selector("anchor", "a")?,
        })
    }
}

fn compile_selector(field: &str, css: &str) -> Result<Selector, ConfigError> {
    Selector::parse(css)
        .map_err(|e| ConfigError::InvalidSelector(format!("{} '{}': {:?}", field, css, e)))
}

/// A link inside an index page's navigation block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    /// Visible text of the link
    pub text: String,

    /// Link target, if the anchor has one
    pub href: Option<String>,
}

/// Extracted information from an index page
#[derive(Debug, Clone, Default)]
pub struct IndexPage {
    /// Articles listed on the page, `None` if the article-list block is missing
    pub articles: Option<Vec<ArticleRef>>,

    /// Links of the navigation block, `None` if the block is missing
    pub navigation: Option<Vec<NavLink>>,
}

/// Parses an index page
///
/// Every anchor inside the article-list block that carries both a `title`
/// and an `href` becomes an [`ArticleRef`], in document order. The
/// navigation block is the first element matching the navigation selector.
///
/// # Example
///
/// ```
/// use wiki_corpus::config::SelectorConfig;
/// use wiki_corpus::crawler::{parse_index, PageSelectors};
///
/// let selectors = PageSelectors::compile(&SelectorConfig::default()).unwrap();
/// let html = r#"<div class="mw-allpages-body"><a title="Goku" href="/wiki/Goku">Goku</a></div>"#;
/// let page = parse_index(html, &selectors);
/// assert_eq!(page.articles.unwrap()[0].stem, "Goku");
/// assert!(page.navigation.is_none());
/// ```
pub fn parse_index(html: &str, selectors: &PageSelectors) -> IndexPage {
    let document = Html::parse_document(html);

    let articles = document
        .select(&selectors.article_list)
        .next()
        .map(|list| extract_articles(list, selectors));

    let navigation = document
        .select(&selectors.navigation)
        .next()
        .map(|nav| extract_nav_links(nav, selectors));

    IndexPage {
        articles,
        navigation,
    }
}

/// Extracts article references from the article-list block
fn extract_articles(list: ElementRef<'_>, selectors: &PageSelectors) -> Vec<ArticleRef> {
    let mut articles = Vec::new();

    for anchor in list.select(&selectors.anchor) {
        let element = anchor.value();
        match (element.attr("title"), element.attr("href")) {
            (Some(title), Some(href)) => articles.push(ArticleRef::new(title, href.trim())),
            _ => {
                tracing::debug!(
                    "Skipping index anchor without title or href: {:?}",
                    anchor.text().collect::<String>()
                );
            }
        }
    }

    articles
}

/// Extracts all links of the navigation block in document order
fn extract_nav_links(nav: ElementRef<'_>, selectors: &PageSelectors) -> Vec<NavLink> {
    nav.select(&selectors.anchor)
        .map(|anchor| NavLink {
            text: anchor.text().collect::<String>(),
            href: anchor.value().attr("href").map(|h| h.trim().to_string()),
        })
        .collect()
}

/// Parses an article page
///
/// Returns the text of every `p` and `ul` element that is a direct child of
/// the content block, in document order, or `None` when the page has no
/// content block.
pub fn parse_article(html: &str, selectors: &PageSelectors) -> Option<Vec<String>> {
    let document = Html::parse_document(html);
    let content = document.select(&selectors.content).next()?;

    let fragments = content
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "p" | "ul"))
        .map(|el| el.text().collect::<String>())
        .collect();

    Some(fragments)
}

/// Resolves a link found on a page against the site base URL
///
/// Relative links are appended to the base URL; absolute `http(s)` links
/// are returned unchanged.
///
/// # Example
///
/// ```
/// use wiki_corpus::crawler::resolve_link;
///
/// assert_eq!(
///     resolve_link("https://dragonball.fandom.com", "/wiki/Goku"),
///     "https://dragonball.fandom.com/wiki/Goku"
/// );
/// ```
pub fn resolve_link(base_url: &str, href: &str) -> String {
    let href = href.trim();

    if let Ok(absolute) = Url::parse(href) {
        if absolute.scheme() == "http" || absolute.scheme() == "https" {
            return absolute.to_string();
        }
    }

    let base = base_url.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{}{}", base, href)
    } else {
        format!("{}/{}", base, href)
    }
}
