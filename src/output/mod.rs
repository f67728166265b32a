//! Output module for crawl reports and statistics
//!
//! This module handles:
//! - Per-pass counters (`PassReport`)
//! - Archive and frontier statistics, logged after each pass or printed on demand

mod report;
pub mod stats;

pub use report::PassReport;
pub use stats::{load_statistics, log_statistics, print_statistics, CrawlStatistics};
