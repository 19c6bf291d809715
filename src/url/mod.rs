//! URL and path handling
//!
//! This module provides:
//! - The documentation server root and the endpoints derived from it
//! - Package filter matching
//! - Relative path computation for offline documents

mod matcher;
mod relative;

pub use matcher::{is_third_party, matches_filter};
pub use relative::{relative_path, relative_to_document, RelativePathError};

use std::fmt;
use url::{ParseError, Url};

/// Root URL of a documentation server
///
/// The path always ends in `/` so that server-relative paths can be joined
/// onto it without dropping segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRoot(Url);

impl ServerRoot {
    /// Parses a server root such as `http://localhost:6060`
    ///
    /// # Examples
    ///
    /// ```
    /// use godocset::url::ServerRoot;
    ///
    /// let root = ServerRoot::parse("http://localhost:6060").unwrap();
    /// assert_eq!(root.package_index().as_str(), "http://localhost:6060/pkg/");
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let mut url = Url::parse(raw)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url.set_query(None);
        url.set_fragment(None);
        Ok(Self(url))
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// The package directory listing, `/pkg/`
    pub fn package_index(&self) -> Url {
        self.join("pkg/").unwrap_or_else(|_| self.0.clone())
    }

    /// The page for a listed package; `href` is taken verbatim from the listing
    pub fn package_page(&self, href: &str) -> Result<Url, ParseError> {
        self.join(&format!("pkg/{}", href.trim_start_matches('/')))
    }

    /// A server-relative path such as `lib/godoc/style.css`
    pub fn join(&self, relative: &str) -> Result<Url, ParseError> {
        self.0.join(relative.trim_start_matches('/'))
    }
}

impl fmt::Display for ServerRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_str().trim_end_matches('/'))
    }
}
