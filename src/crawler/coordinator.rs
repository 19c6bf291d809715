//! Pipeline coordinator - main docset build orchestration
//!
//! This module ties the crawl together:
//! - Setting up the docset bundle (icon, property list, fresh index)
//! - Discovering packages on the documentation server
//! - Crawling packages and mirroring assets concurrently
//! - Committing the index and summarizing the run

use crate::config::Config;
use crate::crawler::assets::AssetMirror;
use crate::crawler::discovery::discover_packages;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::package::PackageCrawler;
use crate::crawler::retry::RetryPolicy;
use crate::crawler::scheduler::CrawlScheduler;
use crate::docset::DocsetLayout;
use crate::output::CrawlReport;
use crate::storage::SearchIndex;
use crate::url::ServerRoot;
use crate::DocsetError;
use chrono::Utc;
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;

/// Builds one docset from one documentation server
pub struct Pipeline {
    config: Arc<Config>,
    client: Client,
    layout: Arc<DocsetLayout>,
}

impl Pipeline {
    /// Creates a pipeline writing to the docset named by `config`
    ///
    /// # Returns
    ///
    /// * `Ok(Pipeline)` - Ready to run
    /// * `Err(DocsetError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, DocsetError> {
        let client = build_http_client()?;
        Ok(Self::with_client(config, client))
    }

    /// Creates a pipeline sharing an existing HTTP client
    pub fn with_client(config: Config, client: Client) -> Self {
        let layout = Arc::new(DocsetLayout::from_config(&config));
        Self {
            config: Arc::new(config),
            client,
            layout,
        }
    }

    pub fn layout(&self) -> &DocsetLayout {
        &self.layout
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Runs the whole build against `root`
    ///
    /// Setup, discovery and the final commit are fatal on failure. Per-package
    /// and per-asset failures are logged and summarized in the report.
    pub async fn run(&self, root: &ServerRoot) -> Result<CrawlReport, DocsetError> {
        let started_at = Utc::now();
        tracing::info!(
            "Building {} from {}",
            self.layout.root().display(),
            root
        );

        let index = self.prepare_docset()?;
        let targets =
            discover_packages(&self.client, root, &self.config.docset.filters).await?;

        let mirror = AssetMirror::new(
            self.client.clone(),
            root.clone(),
            self.layout.clone(),
            &self.config.assets.root,
        );
        let crawler = Arc::new(PackageCrawler::new(
            self.client.clone(),
            self.layout.clone(),
            index.clone(),
            RetryPolicy::from_config(&self.config.crawl),
        ));
        let scheduler = CrawlScheduler::from_config(&self.config.crawl);

        let (assets, outcomes) = tokio::join!(
            mirror.run(),
            scheduler.run(targets, |target| {
                let crawler = crawler.clone();
                async move { crawler.crawl(target).await }
            })
        );

        index.commit()?;
        tracing::info!("Committed index at {}", self.layout.index_path().display());

        let report = CrawlReport::from_outcomes(&outcomes, assets, started_at).with_index(&index)?;
        tracing::info!(
            "Indexed {}/{} packages ({} entries), {} failed",
            report.indexed,
            report.discovered,
            report.total_entries,
            report.failed.len()
        );
        Ok(report)
    }

    /// Writes the icon and property list and creates an empty index
    fn prepare_docset(&self) -> Result<Arc<SearchIndex>, DocsetError> {
        let docset = &self.config.docset;

        self.layout
            .write_icon(docset.icon.as_deref().map(Path::new))
            .map_err(|e| DocsetError::Setup(format!("writing icon: {}", e)))?;
        self.layout
            .write_plist(&docset.name)
            .map_err(|e| DocsetError::Setup(format!("writing Info.plist: {}", e)))?;

        let index = SearchIndex::create(&self.layout.index_path())?;
        tracing::debug!("Created index at {}", self.layout.index_path().display());
        Ok(Arc::new(index))
    }
}
