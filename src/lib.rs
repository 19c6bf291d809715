//! godocset: turns a running godoc server into an offline Dash docset
//!
//! This crate crawls the HTML output of a documentation server, rewrites each
//! package page so it renders standalone from disk, extracts the documented
//! symbols, and records them in a deduplicated SQLite search index.

pub mod config;
pub mod crawler;
pub mod docset;
pub mod output;
pub mod server;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for godocset operations
#[derive(Debug, Error)]
pub enum DocsetError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Failed to start documentation server: {0}")]
    Server(String),

    #[error("Setup failed: {0}")]
    Setup(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for godocset operations
pub type Result<T> = std::result::Result<T, DocsetError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::Pipeline;
pub use docset::DocsetLayout;
pub use state::{CrawlOutcome, CrawlStatus, PackageTarget, SymbolEntry, SymbolKind};
pub use storage::SearchIndex;
