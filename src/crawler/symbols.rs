//! Symbol extraction from godoc package pages
//!
//! godoc anchors every documented construct:
//! - `<h2 id="Name">func ...` / `<h3 id="Name">func ...` for functions
//! - `<h3 id="Type.Method">func (recv) ...` for methods
//! - `<h2 id="Name">type ...` for types
//! - `<span id="Name">` inside `const` / `var` declaration blocks
//!
//! Section headings use `pkg-` prefixed ids (`pkg-overview`, `pkg-index`, ...)
//! and are not symbols.

use crate::state::{SymbolEntry, SymbolKind};
use scraper::{ElementRef, Html, Selector};

const SECTION_ID_PREFIX: &str = "pkg-";

/// Classifies a symbol heading by its text
fn heading_kind(text: &str) -> Option<SymbolKind> {
    let text = text.trim_start();
    if text.starts_with("func (") {
        Some(SymbolKind::Method)
    } else if text.starts_with("func ") {
        Some(SymbolKind::Function)
    } else if text.starts_with("type ") {
        Some(SymbolKind::Type)
    } else {
        None
    }
}

/// Classifies a declaration block by its leading keyword
fn declaration_kind(text: &str) -> Option<SymbolKind> {
    let text = text.trim_start();
    if text.starts_with("const") {
        Some(SymbolKind::Constant)
    } else if text.starts_with("var") {
        Some(SymbolKind::Variable)
    } else {
        None
    }
}

fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect()
}

/// Extracts the package entry followed by every anchored symbol, in page order
///
/// # Arguments
///
/// * `html` - The package page (already link-rewritten)
/// * `package` - Import path, used as the package entry's name
/// * `document_path` - Output document path the anchors are appended to
///
/// # Example
///
/// ```
/// use godocset::crawler::extract_symbols;
/// use godocset::SymbolKind;
///
/// let html = r#"<h1>Package foo</h1><h2 id="Parse">func <a>Parse</a></h2>"#;
/// let symbols = extract_symbols(html, "foo", "pkg/foo/index.html");
/// assert_eq!(symbols[0].kind, SymbolKind::Package);
/// assert_eq!(symbols[1].path, "pkg/foo/index.html#Parse");
/// ```
pub fn extract_symbols(html: &str, package: &str, document_path: &str) -> Vec<SymbolEntry> {
    let document = Html::parse_document(html);
    let mut symbols = vec![SymbolEntry::new(
        package,
        SymbolKind::Package,
        document_path,
        None,
    )];

    let (Ok(anchored), Ok(spans)) = (
        Selector::parse("h2[id], h3[id], pre"),
        Selector::parse("span[id]"),
    ) else {
        return symbols;
    };

    for element in document.select(&anchored) {
        if element.value().name() == "pre" {
            let Some(kind) = declaration_kind(&text_of(&element)) else {
                continue;
            };
            for span in element.select(&spans) {
                if let Some(id) = span.value().id() {
                    // dotted ids are struct fields, not declarations
                    if !id.contains('.') {
                        symbols.push(SymbolEntry::new(id, kind, document_path, Some(id)));
                    }
                }
            }
            continue;
        }

        let Some(id) = element.value().id() else {
            continue;
        };
        if id.starts_with(SECTION_ID_PREFIX) {
            continue;
        }
        if let Some(kind) = heading_kind(&text_of(&element)) {
            symbols.push(SymbolEntry::new(id, kind, document_path, Some(id)));
        }
    }

    symbols
}
