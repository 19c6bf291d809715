//! The per-package fetch, rewrite, extract, index unit

use crate::crawler::fetcher::fetch_page;
use crate::crawler::parser::is_package_page;
use crate::crawler::retry::{retry, RetryPolicy};
use crate::crawler::rewrite::rewrite_links;
use crate::crawler::symbols::extract_symbols;
use crate::docset::DocsetLayout;
use crate::state::{CrawlOutcome, PackageError, PackageTarget, SymbolEntry};
use crate::storage::IndexWriter;
use reqwest::Client;
use std::sync::Arc;

/// What a successful attempt produced
#[derive(Debug)]
enum Attempt {
    Indexed(Vec<SymbolEntry>),
    NotAPackage,
}

/// Crawls single packages into the docset
///
/// Shared by every crawl task; all fields are cheap to clone or behind `Arc`.
pub struct PackageCrawler {
    client: Client,
    layout: Arc<DocsetLayout>,
    index: Arc<dyn IndexWriter>,
    policy: RetryPolicy,
}

impl PackageCrawler {
    pub fn new(
        client: Client,
        layout: Arc<DocsetLayout>,
        index: Arc<dyn IndexWriter>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            client,
            layout,
            index,
            policy,
        }
    }

    /// Crawls one package, retrying failed attempts
    ///
    /// A directory page ends the unit immediately as a benign skip. Failures
    /// are retried per the policy and the last one is kept in the outcome;
    /// nothing is propagated.
    pub async fn crawl(&self, target: Arc<PackageTarget>) -> CrawlOutcome {
        let package: &PackageTarget = &target;
        let retried = retry(self.policy, move |attempt| self.attempt(package, attempt)).await;

        let outcome = match retried.result {
            Ok(Attempt::Indexed(symbols)) => {
                tracing::info!(
                    "Indexed {} ({} symbols, {} attempt(s))",
                    target.name,
                    symbols.len(),
                    retried.attempts
                );
                CrawlOutcome::indexed(target.clone(), symbols)
            }
            Ok(Attempt::NotAPackage) => {
                tracing::info!("Skipping {}: not a package page", target.name);
                CrawlOutcome::not_a_package(target.clone())
            }
            Err(e) => {
                tracing::warn!(
                    "Giving up on {} after {} attempt(s): {}",
                    target.name,
                    retried.attempts,
                    e
                );
                CrawlOutcome::failed(target.clone(), e)
            }
        };

        let outcome = outcome.with_attempts(retried.attempts);
        tracing::trace!("{} finished as {}", target.name, outcome.status);
        outcome
    }

    async fn attempt(&self, target: &PackageTarget, attempt: u32) -> Result<Attempt, PackageError> {
        tracing::debug!("Fetching {} (attempt {})", target.url, attempt);
        let html = fetch_page(&self.client, &target.url).await?;

        if !is_package_page(&html) {
            return Ok(Attempt::NotAPackage);
        }

        let page = rewrite_links(&html, &target.document_path)
            .map_err(|e| PackageError::Rewrite(e.to_string()))?;
        tracing::trace!(
            "Rewrote {} references in {} ({} left as is)",
            page.rewritten,
            target.document_path,
            page.skipped
        );

        self.layout
            .write_document(&target.document_path, page.html.as_bytes())
            .await
            .map_err(|e| PackageError::Write(e.to_string()))?;

        let symbols = extract_symbols(&page.html, &target.name, &target.document_path);
        let inserted = self
            .index
            .insert_all(&symbols)
            .map_err(|e| PackageError::Index(e.to_string()))?;
        tracing::debug!(
            "{}: {} symbols, {} new index rows",
            target.name,
            symbols.len(),
            inserted
        );

        Ok(Attempt::Indexed(symbols))
    }
}
