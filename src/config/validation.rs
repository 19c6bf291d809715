use crate::config::types::{AssetsConfig, Config, CrawlConfig, DocsetConfig, GoConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_docset_config(&config.docset)?;
    validate_go_config(&config.go)?;
    validate_crawl_config(&config.crawl)?;
    validate_assets_config(&config.assets)?;
    Ok(())
}

/// Validates docset naming
fn validate_docset_config(config: &DocsetConfig) -> Result<(), ConfigError> {
    if config.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "docset name cannot be empty".to_string(),
        ));
    }

    if config.name.contains('/') || config.name.contains('\\') {
        return Err(ConfigError::Validation(format!(
            "docset name must not contain path separators, got '{}'",
            config.name
        )));
    }

    Ok(())
}

/// Validates the documentation server settings
fn validate_go_config(config: &GoConfig) -> Result<(), ConfigError> {
    if let Some(server) = &config.server {
        let url = Url::parse(server)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid server URL '{}': {}", server, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Server URL '{}' must use http or https",
                server
            )));
        }
    }

    if config.probe_attempts < 1 {
        return Err(ConfigError::Validation(
            "probe-attempts must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawl tuning
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.batch_size < 1 || config.batch_size > 100 {
        return Err(ConfigError::Validation(format!(
            "batch-size must be between 1 and 100, got {}",
            config.batch_size
        )));
    }

    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    Ok(())
}

/// Validates the asset root, which is joined verbatim onto server and output paths
fn validate_assets_config(config: &AssetsConfig) -> Result<(), ConfigError> {
    if config.root.is_empty() || config.root.starts_with('/') || !config.root.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "asset root must be a relative directory ending in '/', got '{}'",
            config.root
        )));
    }

    if config.root.split('/').any(|segment| segment == "..") {
        return Err(ConfigError::Validation(format!(
            "asset root must not escape the document tree, got '{}'",
            config.root
        )));
    }

    Ok(())
}
