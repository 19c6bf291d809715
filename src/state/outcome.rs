//! Crawl units and their outcomes

use crate::state::SymbolEntry;
use crate::url::ServerRoot;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

/// Document path for a package inside the docset's `Documents` directory
///
/// ```
/// use godocset::state::document_path;
///
/// assert_eq!(document_path("github.com/user/pkg"), "pkg/github.com/user/pkg/index.html");
/// ```
pub fn document_path(package: &str) -> String {
    format!("pkg/{}/index.html", package.trim_matches('/'))
}

/// One package to crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageTarget {
    /// Import path, e.g. `github.com/user/pkg`
    pub name: String,

    /// Page on the documentation server
    pub url: Url,

    /// Output document path, `pkg/<name>/index.html`
    pub document_path: String,
}

impl PackageTarget {
    /// Builds a target from an href of the package listing
    pub fn from_listing(root: &ServerRoot, href: &str) -> Result<Self, url::ParseError> {
        let name = href.trim_end_matches('/').to_string();
        Ok(Self {
            url: root.package_page(href)?,
            document_path: document_path(&name),
            name,
        })
    }
}

/// Why an attempt at a package failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackageError {
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("link rewrite failed: {0}")]
    Rewrite(String),

    #[error("writing document failed: {0}")]
    Write(String),

    #[error("index insert failed: {0}")]
    Index(String),

    #[error("crawl task aborted: {0}")]
    Aborted(String),
}

/// Terminal status of a crawl unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlStatus {
    /// Document written and symbols indexed
    Indexed,

    /// The page is a directory listing, skipped without retrying
    NotAPackage,

    /// Every attempt failed
    Failed,
}

impl CrawlStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indexed => "indexed",
            Self::NotAPackage => "not_a_package",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for CrawlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of crawling one package, as left by its last attempt
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub target: Arc<PackageTarget>,
    pub status: CrawlStatus,
    pub error: Option<PackageError>,
    pub symbols: Vec<SymbolEntry>,
    pub attempts: u32,
}

impl CrawlOutcome {
    pub fn indexed(target: Arc<PackageTarget>, symbols: Vec<SymbolEntry>) -> Self {
        Self {
            target,
            status: CrawlStatus::Indexed,
            error: None,
            symbols,
            attempts: 1,
        }
    }

    pub fn not_a_package(target: Arc<PackageTarget>) -> Self {
        Self {
            target,
            status: CrawlStatus::NotAPackage,
            error: None,
            symbols: Vec::new(),
            attempts: 1,
        }
    }

    pub fn failed(target: Arc<PackageTarget>, error: PackageError) -> Self {
        Self {
            target,
            status: CrawlStatus::Failed,
            error: Some(error),
            symbols: Vec::new(),
            attempts: 1,
        }
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn is_failure(&self) -> bool {
        self.status.is_error()
    }
}
