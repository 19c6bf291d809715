//! godocset main entry point
//!
//! This is the command-line interface that builds a Dash docset from a godoc
//! server.

use anyhow::Context;
use clap::Parser;
use godocset::config::{
    compute_config_hash, find_config_file, load_config, parse_filter_list, validate, Config,
    CrawlStrategy,
};
use godocset::output::print_report;
use godocset::server::{wait_until_ready, GodocServer};
use godocset::url::ServerRoot;
use godocset::Pipeline;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// godocset: offline Dash docsets from godoc
///
/// Crawls the third-party packages served by godoc, rewrites each package page
/// for offline reading, and builds the docset's search index.
#[derive(Parser, Debug)]
#[command(name = "godocset")]
#[command(version)]
#[command(about = "Build a Dash docset from a godoc server", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (default: ./godocset-config.toml, then /tmp)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    silent: bool,

    /// Docset name
    #[arg(short, long)]
    name: Option<String>,

    /// PNG icon to bundle instead of the default one
    #[arg(short, long, value_name = "FILE")]
    icon: Option<String>,

    /// Directory the docset is written to
    #[arg(short, long, value_name = "DIR")]
    output: Option<String>,

    /// Comma separated package filters, e.g. "github.com/user/*,pkg2"
    #[arg(short, long)]
    filters: Option<String>,

    /// Root URL of a running godoc server; a local one is started otherwise
    #[arg(long, value_name = "URL")]
    server: Option<String>,

    /// GOROOT passed to the spawned godoc
    #[arg(long, value_name = "DIR")]
    goroot: Option<String>,

    /// How concurrent package crawls are scheduled
    #[arg(long, value_enum)]
    strategy: Option<CrawlStrategy>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, source) = build_config(&cli)?;

    // Setup logging based on verbosity; silent may come from the config file
    setup_logging(cli.verbose, config.options.silent);

    if let Some(path) = &source {
        tracing::info!("Loaded configuration from: {}", path.display());
    }
    tracing::info!(
        "Configuration ready (hash: {})",
        compute_config_hash(&config)
    );

    // Use the configured server, or start godoc for the duration of the run
    let (root, spawned) = match &config.go.server {
        Some(server) => {
            let root = ServerRoot::parse(server)
                .with_context(|| format!("invalid server root {}", server))?;
            (root, None)
        }
        None => {
            let server = GodocServer::spawn(&config.go, config.options.silent)
                .context("failed to start godoc")?;
            (server.root().clone(), Some(server))
        }
    };

    let pipeline = Pipeline::new(config.clone()).context("failed to build HTTP client")?;
    wait_until_ready(
        pipeline.client(),
        &root,
        config.go.probe_attempts,
        config.go.probe_interval(),
    )
    .await;

    let result = pipeline.run(&root).await;

    if let Some(server) = spawned {
        if let Err(e) = server.shutdown().await {
            tracing::error!("{}", e);
        }
    }

    let report = result.with_context(|| {
        format!("failed to build {}", pipeline.layout().root().display())
    })?;

    if !report.is_complete() {
        tracing::warn!(
            "Docset is incomplete: {} package(s) and {} asset(s) failed",
            report.failed.len(),
            report.assets.failures
        );
    }

    if !config.options.silent {
        print_report(&report);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, silent: bool) {
    let filter = if silent {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("godocset=info,warn"),
            1 => EnvFilter::new("godocset=debug,info"),
            2 => EnvFilter::new("godocset=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file, if any, and layers command-line flags on top
///
/// Returns the effective configuration and the file it was read from.
fn build_config(cli: &Cli) -> anyhow::Result<(Config, Option<PathBuf>)> {
    let path = cli.config.clone().or_else(find_config_file);
    let mut config = match &path {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => Config::default(),
    };

    if cli.silent {
        config.options.silent = true;
    }
    if let Some(name) = &cli.name {
        config.docset.name = name.clone();
    }
    if let Some(icon) = &cli.icon {
        config.docset.icon = Some(icon.clone());
    }
    if let Some(output) = &cli.output {
        config.docset.output = Some(output.clone());
    }
    if let Some(filters) = &cli.filters {
        config.docset.filters = parse_filter_list(filters);
    }
    if let Some(server) = &cli.server {
        config.go.server = Some(server.clone());
    }
    if let Some(goroot) = &cli.goroot {
        config.go.goroot = Some(goroot.clone());
    }
    if let Some(strategy) = cli.strategy {
        config.crawl.strategy = strategy;
    }

    validate(&config).context("invalid configuration")?;
    Ok((config, path))
}
