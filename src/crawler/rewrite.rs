//! Offline link rewriting built on `lol_html`
//!
//! Package pages reference their stylesheets and scripts by server-rooted
//! paths (`/lib/godoc/style.css`). Once saved under
//! `Documents/pkg/<name>/index.html` those references must become relative to
//! the document's directory.

use crate::url::relative_to_document;
use lol_html::{element, rewrite_str, RewriteStrSettings};
use std::cell::Cell;

/// A page with its resource references rewritten
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenPage {
    pub html: String,
    /// References that now point relative to the document
    pub rewritten: usize,
    /// CSS/JS references left untouched because no relative path exists
    pub skipped: usize,
}

/// Directory part of a `/`-separated document path
fn document_dir(document_path: &str) -> &str {
    document_path
        .rsplit_once('/')
        .map(|(dir, _)| dir)
        .unwrap_or("")
}

/// Rewrites one reference; `None` leaves it unmodified
fn relocate(value: &str, extension: &str, dir: &str, skipped: &Cell<usize>) -> Option<String> {
    if !value.ends_with(extension) {
        return None;
    }
    match relative_to_document(dir, value) {
        Ok(relative) => Some(relative),
        Err(e) => {
            tracing::warn!("Leaving reference {} unmodified: {}", value, e);
            skipped.set(skipped.get() + 1);
            None
        }
    }
}

/// Rewrites `<link href="*.css">` and `<script src="*.js">` references
///
/// # Arguments
///
/// * `html` - The page as fetched from the server
/// * `document_path` - Where the page will be written, e.g. `pkg/foo/index.html`
///
/// # Example
///
/// ```
/// use godocset::crawler::rewrite_links;
///
/// let page = rewrite_links(
///     r#"<link rel="stylesheet" href="/lib/godoc/style.css">"#,
///     "pkg/foo/index.html",
/// ).unwrap();
/// assert!(page.html.contains(r#"href="../../lib/godoc/style.css""#));
/// ```
pub fn rewrite_links(
    html: &str,
    document_path: &str,
) -> Result<RewrittenPage, lol_html::errors::RewritingError> {
    let dir = document_dir(document_path);
    let rewritten = Cell::new(0usize);
    let skipped = Cell::new(0usize);

    let output = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("link[href]", |el| {
                    if let Some(href) = el.get_attribute("href") {
                        if let Some(relative) = relocate(&href, ".css", dir, &skipped) {
                            el.set_attribute("href", &relative)?;
                            rewritten.set(rewritten.get() + 1);
                        }
                    }
                    Ok(())
                }),
                element!("script[src]", |el| {
                    if let Some(src) = el.get_attribute("src") {
                        if let Some(relative) = relocate(&src, ".js", dir, &skipped) {
                            el.set_attribute("src", &relative)?;
                            rewritten.set(rewritten.get() + 1);
                        }
                    }
                    Ok(())
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )?;

    Ok(RewrittenPage {
        html: output,
        rewritten: rewritten.get(),
        skipped: skipped.get(),
    })
}
