//! Run summary built from crawl outcomes and the committed index
//!
//! This module provides the report a pipeline run returns and the
//! human-readable rendering the binary prints at the end.

use crate::crawler::MirrorReport;
use crate::state::{CrawlOutcome, CrawlStatus, PackageError, SymbolKind};
use crate::storage::{SearchIndex, StorageResult};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A package that could not be crawled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedPackage {
    pub name: String,
    pub error: Option<PackageError>,
    pub attempts: u32,
}

/// Summary of one pipeline run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Packages selected by discovery
    pub discovered: usize,

    /// Packages written and indexed
    pub indexed: usize,

    /// Directory pages skipped
    pub not_a_package: usize,

    /// Packages that exhausted their attempts, in discovery order
    pub failed: Vec<FailedPackage>,

    /// Index rows per kind, after deduplication
    pub symbols_by_kind: BTreeMap<SymbolKind, u64>,

    /// Total index rows
    pub total_entries: u64,

    pub assets: MirrorReport,

    /// SHA-256 over the sorted index rows
    pub index_digest: String,
}

impl CrawlReport {
    /// Tallies outcomes; index figures are filled in by [`CrawlReport::with_index`]
    pub fn from_outcomes(
        outcomes: &[CrawlOutcome],
        assets: MirrorReport,
        started_at: DateTime<Utc>,
    ) -> Self {
        let mut report = Self {
            started_at,
            finished_at: Utc::now(),
            discovered: outcomes.len(),
            indexed: 0,
            not_a_package: 0,
            failed: Vec::new(),
            symbols_by_kind: BTreeMap::new(),
            total_entries: 0,
            assets,
            index_digest: String::new(),
        };

        for outcome in outcomes {
            match outcome.status {
                CrawlStatus::Indexed => report.indexed += 1,
                CrawlStatus::NotAPackage => report.not_a_package += 1,
                CrawlStatus::Failed => report.failed.push(FailedPackage {
                    name: outcome.target.name.clone(),
                    error: outcome.error.clone(),
                    attempts: outcome.attempts,
                }),
            }
        }

        report
    }

    /// Records row counts and the content digest of a committed index
    pub fn with_index(mut self, index: &SearchIndex) -> StorageResult<Self> {
        self.symbols_by_kind = index.count_by_kind()?.into_iter().collect();
        self.total_entries = index.count_entries()?;
        self.index_digest = index.content_digest()?;
        Ok(self)
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// True when every package and asset made it into the docset
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.assets.failures == 0
    }
}

/// Prints the report to stdout in a formatted manner
pub fn print_report(report: &CrawlReport) {
    println!("=== Docset Summary ===\n");

    println!("Packages:");
    println!("  Discovered: {}", report.discovered);
    println!("  Indexed: {}", report.indexed);
    println!("  Not a package: {}", report.not_a_package);
    println!("  Failed: {}", report.failed.len());
    println!();

    println!("Index ({} entries):", report.total_entries);
    for kind in SymbolKind::all_kinds() {
        let count = report.symbols_by_kind.get(&kind).copied().unwrap_or(0);
        println!("  {}: {}", kind, count);
    }
    println!();

    println!("Assets:");
    println!("  Files mirrored: {}", report.assets.files);
    if report.assets.failures > 0 {
        println!("  Failures: {}", report.assets.failures);
    }
    println!();

    if !report.failed.is_empty() {
        println!("Failed Packages ({}):", report.failed.len());
        for failed in &report.failed {
            match &failed.error {
                Some(error) => println!(
                    "  - {} after {} attempt(s): {}",
                    failed.name, failed.attempts, error
                ),
                None => println!("  - {}", failed.name),
            }
        }
        println!();
    }

    println!(
        "Finished in {:.1}s at {}",
        report.duration().num_milliseconds() as f64 / 1000.0,
        report.finished_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("Index digest: {}", report.index_digest);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{PackageTarget, SymbolEntry};
    use crate::storage::IndexWriter;
    use crate::url::ServerRoot;
    use std::sync::Arc;

    fn target(name: &str) -> Arc<PackageTarget> {
        let root = ServerRoot::parse("http://localhost:6060").unwrap();
        Arc::new(PackageTarget::from_listing(&root, &format!("{}/", name)).unwrap())
    }

    #[test]
    fn test_tallies_outcomes() {
        let outcomes = vec![
            CrawlOutcome::indexed(target("example.com/a"), Vec::new()),
            CrawlOutcome::not_a_package(target("example.com/dir")),
            CrawlOutcome::failed(target("example.com/b"), PackageError::Status(500)).with_attempts(5),
            CrawlOutcome::indexed(target("example.com/c"), Vec::new()),
        ];
        let report = CrawlReport::from_outcomes(&outcomes, MirrorReport::default(), Utc::now());

        assert_eq!(report.discovered, 4);
        assert_eq!(report.indexed, 2);
        assert_eq!(report.not_a_package, 1);
        assert_eq!(
            report.failed,
            vec![FailedPackage {
                name: "example.com/b".to_string(),
                error: Some(PackageError::Status(500)),
                attempts: 5,
            }]
        );
        assert!(!report.is_complete());
        assert!(report.duration() >= chrono::Duration::zero());
    }

    #[test]
    fn test_with_index() {
        let index = SearchIndex::create_in_memory().unwrap();
        let doc = "pkg/example.com/a/index.html";
        index
            .insert_all(&[
                SymbolEntry::new("example.com/a", SymbolKind::Package, doc, None),
                SymbolEntry::new("Run", SymbolKind::Function, doc, Some("Run")),
                SymbolEntry::new("Stop", SymbolKind::Function, doc, Some("Stop")),
            ])
            .unwrap();
        index.commit().unwrap();

        let report = CrawlReport::from_outcomes(&[], MirrorReport::default(), Utc::now())
            .with_index(&index)
            .unwrap();
        assert_eq!(report.total_entries, 3);
        assert_eq!(report.symbols_by_kind.get(&SymbolKind::Function), Some(&2));
        assert_eq!(report.index_digest, index.content_digest().unwrap());
        assert!(report.is_complete());
    }

    #[test]
    fn test_asset_failures_make_run_incomplete() {
        let assets = MirrorReport {
            files: 3,
            failures: 1,
        };
        let report = CrawlReport::from_outcomes(&[], assets, Utc::now());
        assert!(!report.is_complete());
    }
}
