/// Crawl state definitions for the pagination state machine
///
/// A crawl walks index pages one at a time. Each page is fetched, its
/// articles are captured, and the navigation block decides whether another
/// page follows.
use crate::corpus::ArticleRef;
use crate::crawler::NavLink;
use std::fmt;

/// Marker text on the last navigation link once the index has wrapped back
/// to its beginning
pub const WRAP_MARKER: &str = "Previous page";

/// Represents the current state of a crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlState {
    /// Fetching the index page at this URL
    FetchingIndex { url: String },

    /// Capturing the articles listed on the current index page
    ExtractingArticles {
        url: String,
        articles: Vec<ArticleRef>,
        navigation: Option<Vec<NavLink>>,
    },

    /// Choosing the next index page from the navigation block
    FetchingNextPage { navigation: Option<Vec<NavLink>> },

    /// Crawl finished
    Done(StopReason),
}

impl CrawlState {
    /// Returns true once the crawl has terminated
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

/// Why a crawl stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The last index page had no navigation block
    NoNavigation,

    /// The navigation block held no usable link
    NoNextLink,

    /// The last navigation link pointed back to the start of the index
    WrappedToStart,

    /// An index page lacked the article-list block
    MissingArticleList,

    /// An index page answered with a non-success status
    IndexStatus(u16),
}

impl StopReason {
    /// Returns true if the crawl reached the natural end of the index
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::NoNavigation | Self::NoNextLink | Self::WrappedToStart)
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoNavigation => write!(f, "no navigation block"),
            Self::NoNextLink => write!(f, "no next-page link"),
            Self::WrappedToStart => write!(f, "index wrapped to start"),
            Self::MissingArticleList => write!(f, "article list missing"),
            Self::IndexStatus(code) => write!(f, "index page returned HTTP {}", code),
        }
    }
}

/// Decides the state following an index page's article capture
///
/// The **last** navigation link is the candidate next page. The crawl stops
/// when there is no navigation block, when it holds no link with an `href`,
/// or when that last link reads "Previous page".
pub fn next_state(navigation: Option<&[NavLink]>) -> NextPage {
    let Some(links) = navigation else {
        return NextPage::Stop(StopReason::NoNavigation);
    };

    let Some(last) = links.last() else {
        return NextPage::Stop(StopReason::NoNextLink);
    };

    if last.text.contains(WRAP_MARKER) {
        return NextPage::Stop(StopReason::WrappedToStart);
    }

    match &last.href {
        Some(href) => NextPage::Follow(href.clone()),
        None => NextPage::Stop(StopReason::NoNextLink),
    }
}

/// Outcome of [`next_state`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// Fetch the index page at this (relative) link
    Follow(String),
    /// Terminate the crawl
    Stop(StopReason),
}
