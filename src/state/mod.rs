//! Crawl state types
//!
//! This module contains:
//! - Package targets discovered from the server listing
//! - Per-package crawl outcomes
//! - Symbol entries destined for the search index

mod outcome;
mod symbol;

pub use outcome::{document_path, CrawlOutcome, CrawlStatus, PackageError, PackageTarget};
pub use symbol::{SymbolEntry, SymbolKind};
