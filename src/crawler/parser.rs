//! HTML parser for godoc listing and package pages
//!
//! This module handles parsing the server's HTML to extract:
//! - Package hrefs from the `/pkg/` directory listing
//! - Whether a page documents a package or is a directory listing
//! - Whether the server has finished its initial scan
//! - Entries of a static directory listing

use scraper::{ElementRef, Html, Selector};

/// Heading prefix that marks a package page
const PACKAGE_HEADING_PREFIX: &str = "Package";

/// Extracts package hrefs from the `/pkg/` listing, in page order
///
/// Hrefs are returned verbatim, e.g. `github.com/user/pkg/`.
///
/// # Example
///
/// ```
/// use godocset::crawler::parse_package_listing;
///
/// let html = r#"<div class="pkg-dir"><table>
///     <tr><td class="pkg-name"><a href="github.com/user/pkg/">pkg</a></td></tr>
/// </table></div>"#;
/// assert_eq!(parse_package_listing(html), vec!["github.com/user/pkg/"]);
/// ```
pub fn parse_package_listing(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut hrefs = Vec::new();

    if let Ok(selector) = Selector::parse("div.pkg-dir td.pkg-name a") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                hrefs.push(href.to_string());
            }
        }
    }

    hrefs
}

/// Returns true if the page's primary heading starts with `Package`
///
/// Directory pages under `/pkg/` share the URL space with package pages but
/// carry a `Directory ...` heading instead.
pub fn is_package_page(html: &str) -> bool {
    let document = Html::parse_document(html);
    primary_heading(&document)
        .map(|heading| is_package_heading(&heading))
        .unwrap_or(false)
}

/// Classifies a primary heading's text
pub fn is_package_heading(text: &str) -> bool {
    text.trim().starts_with(PACKAGE_HEADING_PREFIX)
}

/// Text of the first `h1`
fn primary_heading(document: &Html) -> Option<String> {
    let selector = Selector::parse("h1").ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>())
}

/// Returns true once the server no longer shows its "scan not complete" alert
pub fn is_scan_complete(html: &str) -> bool {
    let document = Html::parse_document(html);
    match Selector::parse("span.alert") {
        Ok(selector) => document.select(&selector).next().is_none(),
        Err(_) => true,
    }
}

/// Extracts entry hrefs from a static directory listing
///
/// Rows with fewer than two cells (the `..` parent row) are skipped; the href
/// of the first link in each remaining row is returned.
pub fn parse_directory_listing(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let (Ok(rows), Ok(link)) = (Selector::parse("tbody tr"), Selector::parse("a")) else {
        return Vec::new();
    };

    document
        .select(&rows)
        .filter(|row| row.children().filter_map(ElementRef::wrap).count() >= 2)
        .filter_map(|row| {
            row.select(&link)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string)
        })
        .collect()
}
