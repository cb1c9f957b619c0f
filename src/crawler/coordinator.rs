//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator walks listing pages `1, 2, 3, ...`. For every query on a
//! page that the ledger has not seen yet it fetches the detail page, extracts
//! the results, appends them to the sink, then updates the ledger and the
//! statistics and logs one progress line.
//!
//! The crawl ends when:
//! - a listing page parses fine but lists no queries (end of pagination)
//! - the configured page limit is reached
//! - the shutdown future resolves (Ctrl-C for [`Coordinator::run`])
//! - a fatal error occurs (returned as `Err`)

use crate::config::{Config, SiteConfig};
use crate::crawler::Fetcher;
use crate::extract::{
    JobsSectionExtractor, LinksRowExtractor, Query, QueryExtractor, ResultExtractor,
};
use crate::output::{CrawlStats, ResultSink, StatsSnapshot};
use crate::state::Ledger;
use crate::text::Normalizer;
use crate::url::{listing_url, parse_base_url, query_url};
use crate::HarvestError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use url::Url;

/// How a crawl run ended
///
/// `pages` counts the listing pages whose queries were fully processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// A listing page was parsed successfully and listed no queries
    Exhausted { pages: u32 },

    /// The configured `max-pages` limit was reached
    PageLimit { pages: u32 },

    /// Shutdown was requested; no new fetch was started afterwards
    Interrupted { pages: u32 },
}

impl CrawlOutcome {
    pub fn pages(&self) -> u32 {
        match self {
            Self::Exhausted { pages } | Self::PageLimit { pages } | Self::Interrupted { pages } => {
                *pages
            }
        }
    }
}

impl fmt::Display for CrawlOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted { pages } => write!(f, "end of pagination after {} pages", pages),
            Self::PageLimit { pages } => write!(f, "page limit reached after {} pages", pages),
            Self::Interrupted { pages } => write!(f, "interrupted after {} pages", pages),
        }
    }
}

/// Main crawler coordinator structure
///
/// Generic over the two page-layout adapters so a site redesign only needs a
/// new extractor.
pub struct Coordinator<Q = LinksRowExtractor, R = JobsSectionExtractor> {
    site: SiteConfig,
    max_pages: Option<u32>,
    fetcher: Fetcher,
    query_extractor: Q,
    result_extractor: R,
    ledger: Ledger,
    stats: CrawlStats,
    sink: ResultSink,
}

impl Coordinator {
    /// Creates a coordinator with the default page-layout adapters
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - Invalid selectors or base URL, unreadable
    ///   ledger seed, or HTTP client setup failure
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let normalizer = Normalizer::new(config.crawler.strip_commas);
        let query_extractor = LinksRowExtractor::from_config(&config.site, normalizer)?;
        let result_extractor = JobsSectionExtractor::from_config(&config.site, normalizer)?;
        Self::with_extractors(config, query_extractor, result_extractor)
    }
}

impl<Q: QueryExtractor, R: ResultExtractor> Coordinator<Q, R> {
    /// Creates a coordinator with custom page-layout adapters
    ///
    /// The ledger is built according to `config.crawler.ledger_seed`.
    pub fn with_extractors(
        config: Config,
        query_extractor: Q,
        result_extractor: R,
    ) -> Result<Self, HarvestError> {
        parse_base_url(&config.site.base_url)?;

        let ledger = Ledger::seeded(config.crawler.ledger_seed, &config.output.path).map_err(
            |source| HarvestError::LedgerSeed {
                path: config.output.path.clone(),
                source,
            },
        )?;
        if !ledger.is_empty() {
            tracing::info!(
                "Ledger seeded with {} known queries from {}",
                ledger.len(),
                config.output.path.display()
            );
        }

        let fetcher = Fetcher::new(&config.http)?;

        Ok(Self {
            sink: ResultSink::new(config.output.path),
            site: config.site,
            max_pages: config.crawler.max_pages,
            fetcher,
            query_extractor,
            result_extractor,
            ledger,
            stats: CrawlStats::new(),
        })
    }

    /// Replaces the ledger, e.g. with one hydrated from another source
    pub fn with_ledger(mut self, ledger: Ledger) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Runs the crawl until it ends or Ctrl-C is pressed
    pub async fn run(&mut self) -> Result<CrawlOutcome, HarvestError> {
        tracing::info!("Press CTRL+C to stop");

        self.run_until(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("Ctrl-C received, stopping after the current query"),
                Err(e) => {
                    tracing::warn!("Failed to listen for Ctrl-C: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        })
        .await
    }

    /// Runs the crawl until it ends or `shutdown` resolves
    ///
    /// Shutdown is only observed while a page is being fetched. Once a detail
    /// page has arrived its results are always written, so the output file
    /// never ends in a partial line.
    ///
    /// A fatal error is returned to the caller without being logged here.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<CrawlOutcome, HarvestError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let result = self.crawl_pages(&mut shutdown).await;
        match &result {
            Ok(outcome) => tracing::info!("Crawl finished: {} ({})", outcome, self.stats()),
            Err(_) => tracing::info!("Crawl stopped early ({})", self.stats()),
        }
        result
    }

    async fn crawl_pages<F>(
        &mut self,
        shutdown: &mut Pin<&mut F>,
    ) -> Result<CrawlOutcome, HarvestError>
    where
        F: Future<Output = ()>,
    {
        let mut page: u32 = 1;

        loop {
            let pages = page - 1;
            if self.max_pages.is_some_and(|max| pages >= max) {
                return Ok(CrawlOutcome::PageLimit { pages });
            }

            // Paging
            tracing::info!("Looking page {}...", page);
            let url = listing_url(&self.site.base_url, &self.site.queries_route, page)?;
            let Some(html) = self.fetch_or_shutdown(&url, shutdown).await? else {
                return Ok(CrawlOutcome::Interrupted { pages });
            };

            let queries = self
                .query_extractor
                .extract_queries(&html)
                .map_err(|source| HarvestError::Extraction {
                    url: url.to_string(),
                    source,
                })?;

            if queries.is_empty() {
                tracing::info!("Page {} lists no queries", page);
                return Ok(CrawlOutcome::Exhausted { pages });
            }

            // Draining
            for query in queries {
                if self.ledger.contains(&query.name) {
                    tracing::debug!("Skipping known query '{}'", query.name);
                    continue;
                }

                let url = query_url(&self.site.base_url, &query.path)?;
                let Some(html) = self.fetch_or_shutdown(&url, shutdown).await? else {
                    return Ok(CrawlOutcome::Interrupted { pages });
                };

                self.process_query(&query, &html)?;
            }

            page += 1;
        }
    }

    /// Fetches a page unless shutdown resolves first
    async fn fetch_or_shutdown<F>(
        &self,
        url: &Url,
        shutdown: &mut Pin<&mut F>,
    ) -> Result<Option<String>, HarvestError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = shutdown.as_mut() => Ok(None),
            body = self.fetcher.fetch_page(url) => body.map(Some),
        }
    }

    /// Writes the results of a freshly fetched query and books it
    ///
    /// The ledger and statistics are only updated once the results are on
    /// disk.
    fn process_query(&mut self, query: &Query, html: &str) -> Result<(), HarvestError> {
        let results = self.result_extractor.extract_results(&query.name, html);

        self.sink.append(&results)?;
        self.ledger.add(&query.name);
        self.stats.record_query(results.len());

        let query_info = format!("New query '{}' with {} results", query.name, results.len());
        tracing::info!("{:<70} ({})", query_info, self.stats.snapshot());

        Ok(())
    }
}
