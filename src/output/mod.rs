//! Output module for run summaries
//!
//! This module handles:
//! - Tallying crawl outcomes and index figures into a report
//! - Printing the report at the end of a run

pub mod stats;

pub use stats::{print_report, CrawlReport, FailedPackage};
