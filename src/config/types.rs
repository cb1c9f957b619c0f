use crate::state::LedgerSeed;
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Term-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub http: HttpConfig,
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
}

/// Target site location and page layout
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base location, e.g. `https://www.opcionempleo.cl`
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Route of the paginated query listing, relative to the base
    #[serde(rename = "queries-route")]
    pub queries_route: String,

    /// CSS selector of the container holding query links on a listing page
    #[serde(rename = "links-selector")]
    pub links_selector: String,

    /// CSS selector of the query links inside that container
    #[serde(rename = "anchor-selector")]
    pub anchor_selector: String,

    /// CSS selector of the results section on a detail page
    #[serde(rename = "jobs-selector")]
    pub jobs_selector: String,

    /// CSS selector of one job entry inside the results section
    #[serde(rename = "entry-selector")]
    pub entry_selector: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.opcionempleo.cl".to_string(),
            queries_route: "topqueries".to_string(),
            links_selector: ".row.links".to_string(),
            anchor_selector: "a".to_string(),
            jobs_selector: ".jobs".to_string(),
            entry_selector: "article".to_string(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("term-harvest/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Replace commas in query names and titles with spaces
    #[serde(rename = "strip-commas")]
    pub strip_commas: bool,

    /// Where the dedup ledger starts from
    #[serde(rename = "ledger-seed")]
    pub ledger_seed: LedgerSeed,

    /// Stop after this many listing pages
    #[serde(rename = "max-pages")]
    pub max_pages: Option<u32>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            strip_commas: true,
            ledger_seed: LedgerSeed::Empty,
            max_pages: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the `term,title` results file
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("results.csv"),
        }
    }
}
