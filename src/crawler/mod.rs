//! Crawler module for page fetching and crawl orchestration
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of listing and detail pages
//! - The pagination and dedup loop

mod coordinator;
mod fetcher;

pub use coordinator::{Coordinator, CrawlOutcome};
pub use fetcher::{build_http_client, Fetcher};

use crate::config::Config;
use crate::HarvestError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Seed the ledger and build the HTTP client
/// 2. Walk listing pages until pagination ends or Ctrl-C is pressed
/// 3. Append the results of every new query to the output file
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - How the crawl ended
/// * `Err(HarvestError)` - Crawl failed
///
/// # Example
///
/// ```no_run
/// use term_harvest::config::Config;
/// use term_harvest::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = crawl(Config::default()).await?;
/// println!("{}", outcome);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config) -> Result<CrawlOutcome, HarvestError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
