//! Output module for crawl results and statistics
//!
//! This module handles:
//! - Appending normalized `term,title` records to the results file
//! - Recording running crawl statistics

mod sink;
pub mod stats;

pub use sink::ResultSink;
pub use stats::{CrawlStats, StatsSnapshot, HIGH_RESULT_THRESHOLD};
