//! Crawler module for turning server pages into docset content
//!
//! This module contains the core pipeline, including:
//! - HTTP fetching with fixed-interval retry
//! - Package discovery and filtering
//! - Link rewriting and symbol extraction
//! - Bounded-concurrency scheduling of package crawls
//! - Recursive mirroring of static assets
//! - Overall pipeline coordination

mod assets;
mod coordinator;
mod discovery;
mod fetcher;
mod package;
mod parser;
mod retry;
mod rewrite;
mod scheduler;
mod symbols;

pub use assets::{AssetMirror, MirrorReport};
pub use coordinator::Pipeline;
pub use discovery::{discover_packages, select_packages};
pub use fetcher::{build_http_client, fetch_bytes, fetch_page, FetchError};
pub use package::PackageCrawler;
pub use parser::{
    is_package_heading, is_package_page, is_scan_complete, parse_directory_listing,
    parse_package_listing,
};
pub use retry::{retry, Retried, RetryPolicy};
pub use rewrite::{rewrite_links, RewrittenPage};
pub use scheduler::CrawlScheduler;
pub use symbols::extract_symbols;
