//! Bounded-concurrency scheduling of crawl units
//!
//! Two strategies are available:
//! - `Batch`: fixed-size batches with a barrier between them; a slow unit
//!   holds back the whole next batch
//! - `Window`: a sliding window where a new unit starts as soon as any
//!   running one finishes
//!
//! Both run every target exactly once and return outcomes in target order.

use crate::config::{CrawlConfig, CrawlStrategy};
use crate::state::{CrawlOutcome, PackageError, PackageTarget};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Runs crawl units over a set of targets
#[derive(Debug, Clone, Copy)]
pub struct CrawlScheduler {
    batch_size: usize,
    strategy: CrawlStrategy,
}

impl CrawlScheduler {
    /// Creates a scheduler running at most `batch_size` units at once
    pub fn new(batch_size: usize, strategy: CrawlStrategy) -> Self {
        Self {
            batch_size: batch_size.max(1),
            strategy,
        }
    }

    pub fn from_config(config: &CrawlConfig) -> Self {
        Self::new(config.batch_size, config.strategy)
    }

    /// Runs `unit` once per target and waits for all of them
    ///
    /// # Arguments
    ///
    /// * `targets` - The packages to crawl
    /// * `unit` - Builds the crawl future for one target
    ///
    /// # Returns
    ///
    /// One outcome per target, in the order the targets were given. A unit
    /// whose task panicked is reported as failed.
    pub async fn run<F, Fut>(&self, targets: Vec<PackageTarget>, unit: F) -> Vec<CrawlOutcome>
    where
        F: Fn(Arc<PackageTarget>) -> Fut,
        Fut: Future<Output = CrawlOutcome> + Send + 'static,
    {
        let targets: Vec<Arc<PackageTarget>> = targets.into_iter().map(Arc::new).collect();
        tracing::info!(
            "Crawling {} packages, {} at a time ({:?})",
            targets.len(),
            self.batch_size,
            self.strategy
        );

        let mut slots: Vec<Option<CrawlOutcome>> = vec![None; targets.len()];
        match self.strategy {
            CrawlStrategy::Batch => self.run_batches(&targets, &unit, &mut slots).await,
            CrawlStrategy::Window => self.run_window(&targets, &unit, &mut slots).await,
        }

        let outcomes: Vec<CrawlOutcome> = targets
            .into_iter()
            .zip(slots)
            .map(|(target, slot)| {
                slot.unwrap_or_else(|| {
                    CrawlOutcome::failed(
                        target,
                        PackageError::Aborted("task did not complete".to_string()),
                    )
                })
            })
            .collect();

        let failures = outcomes.iter().filter(|o| o.is_failure()).count();
        tracing::info!(
            "Crawled {} packages, {} failed",
            outcomes.len(),
            failures
        );
        outcomes
    }

    async fn run_batches<F, Fut>(
        &self,
        targets: &[Arc<PackageTarget>],
        unit: &F,
        slots: &mut [Option<CrawlOutcome>],
    ) where
        F: Fn(Arc<PackageTarget>) -> Fut,
        Fut: Future<Output = CrawlOutcome> + Send + 'static,
    {
        let batches = targets.len().div_ceil(self.batch_size);
        for (batch_no, batch) in targets.chunks(self.batch_size).enumerate() {
            let offset = batch_no * self.batch_size;
            tracing::debug!(
                "Starting batch {}/{} ({} packages)",
                batch_no + 1,
                batches,
                batch.len()
            );

            let mut tasks = JoinSet::new();
            for (i, target) in batch.iter().enumerate() {
                let crawl = unit(target.clone());
                tasks.spawn(async move { (offset + i, crawl.await) });
            }
            collect(&mut tasks, slots).await;
        }
    }

    async fn run_window<F, Fut>(
        &self,
        targets: &[Arc<PackageTarget>],
        unit: &F,
        slots: &mut [Option<CrawlOutcome>],
    ) where
        F: Fn(Arc<PackageTarget>) -> Fut,
        Fut: Future<Output = CrawlOutcome> + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.batch_size));
        let mut tasks = JoinSet::new();

        for (i, target) in targets.iter().enumerate() {
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                tracing::error!("Crawl window closed with {} packages left", targets.len() - i);
                break;
            };
            let crawl = unit(target.clone());
            tasks.spawn(async move {
                let outcome = crawl.await;
                drop(permit);
                (i, outcome)
            });
        }
        collect(&mut tasks, slots).await;
    }
}

/// Drains a task set into the outcome slots
async fn collect(
    tasks: &mut JoinSet<(usize, CrawlOutcome)>,
    slots: &mut [Option<CrawlOutcome>],
) {
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((i, outcome)) => slots[i] = Some(outcome),
            Err(e) => tracing::error!("Crawl task failed to complete: {}", e),
        }
    }
}
