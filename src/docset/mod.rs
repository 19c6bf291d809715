//! Docset bundle output
//!
//! This module owns everything written to disk besides the search index
//! contents: the bundle directory layout, `Info.plist`, the icon, and the
//! offline documents.

mod layout;
mod plist;

pub use layout::DocsetLayout;
pub use plist::render_plist;
