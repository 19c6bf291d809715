//! Package discovery from the server's `/pkg/` listing

use crate::crawler::fetcher::fetch_page;
use crate::crawler::parser::parse_package_listing;
use crate::state::PackageTarget;
use crate::url::{is_third_party, matches_filter, ServerRoot};
use crate::DocsetError;
use reqwest::Client;

/// Keeps the listing hrefs that name third-party packages matching a filter
///
/// Order is preserved. An empty filter list keeps every third-party package.
///
/// # Example
///
/// ```
/// use godocset::crawler::select_packages;
///
/// let hrefs = vec!["bufio/".to_string(), "github.com/user/pkg/".to_string()];
/// assert_eq!(select_packages(&hrefs, &[]), vec!["github.com/user/pkg/"]);
/// ```
pub fn select_packages<'a>(hrefs: &'a [String], filters: &[String]) -> Vec<&'a str> {
    hrefs
        .iter()
        .map(String::as_str)
        .filter(|href| {
            let name = href.trim_end_matches('/');
            if !is_third_party(name) {
                tracing::trace!("Skipping standard library package {}", name);
                return false;
            }
            // filters see the href as listed, trailing slash included
            if !matches_filter(href, filters) {
                tracing::debug!("Package {} excluded by filters", name);
                return false;
            }
            true
        })
        .collect()
}

/// Fetches the package listing and returns the packages to crawl
///
/// Any failure here is fatal to the run. An empty result is not an error.
pub async fn discover_packages(
    client: &Client,
    root: &ServerRoot,
    filters: &[String],
) -> Result<Vec<PackageTarget>, DocsetError> {
    let index_url = root.package_index();
    tracing::info!("Listing packages from {}", index_url);

    let html = fetch_page(client, &index_url)
        .await
        .map_err(|e| DocsetError::Setup(format!("fetching package list: {}", e)))?;

    let hrefs = parse_package_listing(&html);
    let selected = select_packages(&hrefs, filters);

    let targets = selected
        .into_iter()
        .map(|href| PackageTarget::from_listing(root, href))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!(
        "Discovered {} packages ({} listed)",
        targets.len(),
        hrefs.len()
    );
    Ok(targets)
}
