//! Running crawl statistics

use std::fmt;

/// Result count above which a query counts as "high result"
pub const HIGH_RESULT_THRESHOLD: usize = 15;

/// Cumulative counters for a crawl run
///
/// Updated once per processed query, after its results are known. Counters
/// never decrease.
#[derive(Debug, Clone, Default)]
pub struct CrawlStats {
    queries_seen: u64,
    total_results: u64,
    high_result_queries: u64,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a processed query and its number of results
    pub fn record_query(&mut self, result_count: usize) {
        self.queries_seen += 1;
        self.total_results += result_count as u64;
        if result_count > HIGH_RESULT_THRESHOLD {
            self.high_result_queries += 1;
        }
    }

    /// Returns a copy of the current counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            queries_seen: self.queries_seen,
            total_results: self.total_results,
            high_result_queries: self.high_result_queries,
        }
    }
}

/// Point-in-time view of [`CrawlStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub queries_seen: u64,
    pub total_results: u64,
    /// Queries with more than [`HIGH_RESULT_THRESHOLD`] results
    pub high_result_queries: u64,
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total: {:>5} queries, {:>6} results, {:>5} queries with more than {} results",
            self.queries_seen, self.total_results, self.high_result_queries, HIGH_RESULT_THRESHOLD
        )
    }
}
