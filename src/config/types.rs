use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for godocset
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub options: OptionsConfig,
    pub docset: DocsetConfig,
    pub go: GoConfig,
    pub crawl: CrawlConfig,
    pub assets: AssetsConfig,
}

impl Config {
    /// Root directory of the generated bundle, `<output>/<name>.docset`
    pub fn docset_root(&self) -> PathBuf {
        let base = match &self.docset.output {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => PathBuf::new(),
        };
        base.join(format!("{}.docset", self.docset.name))
    }
}

/// General runtime options
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OptionsConfig {
    /// Only print errors
    pub silent: bool,
}

/// Docset naming and output configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DocsetConfig {
    /// Display name, also used as bundle identifier
    pub name: String,

    /// Path to a user-supplied PNG icon
    pub icon: Option<String>,

    /// Directory the `<name>.docset` bundle is created in
    pub output: Option<String>,

    /// Package filters: substrings or trailing-`*` wildcards
    pub filters: Vec<String>,
}

impl Default for DocsetConfig {
    fn default() -> Self {
        Self {
            name: "GoDoc".to_string(),
            icon: None,
            output: None,
            filters: Vec::new(),
        }
    }
}

/// Documentation server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GoConfig {
    /// GOROOT override passed to a spawned godoc
    pub goroot: Option<String>,

    /// Root URL of an already running server; when unset godoc is spawned
    pub server: Option<String>,

    /// Readiness probe iterations
    pub probe_attempts: u32,

    /// Delay between readiness probes (milliseconds)
    pub probe_interval_ms: u64,
}

impl Default for GoConfig {
    fn default() -> Self {
        Self {
            goroot: None,
            server: None,
            probe_attempts: 15,
            probe_interval_ms: 500,
        }
    }
}

impl GoConfig {
    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms)
    }
}

/// How the crawl scheduler bounds concurrency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CrawlStrategy {
    /// Fixed-size batches, each awaited in full before the next starts
    #[default]
    Batch,

    /// Sliding window: a new unit starts as soon as any slot frees up
    Window,
}

/// Package crawl tuning
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlConfig {
    /// Maximum number of packages crawled at once
    pub batch_size: usize,

    /// Attempts per package before giving up
    pub max_attempts: u32,

    /// Fixed wait between failed attempts (milliseconds)
    pub retry_delay_ms: u64,

    pub strategy: CrawlStrategy,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            max_attempts: 5,
            retry_delay_ms: 2000,
            strategy: CrawlStrategy::Batch,
        }
    }
}

impl CrawlConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Static asset mirroring configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Server-relative directory holding stylesheets and scripts
    pub root: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: "lib/godoc/".to_string(),
        }
    }
}
