use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// File name looked up when no explicit config path is given
pub const CONFIG_FILE_NAME: &str = "godocset-config.toml";

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use godocset::config::load_config;
///
/// let config = load_config(Path::new("godocset-config.toml")).unwrap();
/// println!("Docset name: {}", config.docset.name);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Parses configuration from a TOML string without validating it
///
/// Missing sections and keys fall back to their defaults.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Finds the default config file, checking the working directory then `/tmp`
pub fn find_config_file() -> Option<PathBuf> {
    [PathBuf::from("."), PathBuf::from("/tmp")]
        .into_iter()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Splits a comma separated filter list, dropping blank entries
///
/// ```
/// use godocset::config::parse_filter_list;
///
/// let filters = parse_filter_list("github.com/user/pkg1, user/pkg2,,");
/// assert_eq!(filters, vec!["github.com/user/pkg1", "user/pkg2"]);
/// ```
pub fn parse_filter_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

/// Computes a SHA-256 fingerprint of the effective configuration
///
/// Two runs with the same fingerprint are expected to produce the same docset.
pub fn compute_config_hash(config: &Config) -> String {
    let serialized = toml::to_string(config).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(serialized.as_bytes());
    hex::encode(hasher.finalize())
}
