//! Configuration module for godocset
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Command-line flags are layered on top by the binary.
//!
//! # Example
//!
//! ```no_run
//! use godocset::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("godocset-config.toml")).unwrap();
//! println!("Docset will be written to: {}", config.docset_root().display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AssetsConfig, Config, CrawlConfig, CrawlStrategy, DocsetConfig, GoConfig, OptionsConfig,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, find_config_file, load_config, parse_config, parse_filter_list,
    CONFIG_FILE_NAME,
};
pub use validation::validate;
