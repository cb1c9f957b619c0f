//! Page extractors
//!
//! The crawler depends on two pieces of page layout: the container that lists
//! queries on a listing page and the container that lists jobs on a detail
//! page. Both are reached through the [`QueryExtractor`] and [`ResultExtractor`]
//! traits so a layout change only touches an adapter, never the coordinator.
//!
//! The default adapters are [`LinksRowExtractor`] and [`JobsSectionExtractor`].

mod queries;
mod results;

pub use queries::LinksRowExtractor;
pub use results::JobsSectionExtractor;

use crate::ConfigError;
use scraper::Selector;
use thiserror::Error;

/// A search term discovered on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Normalized, human-readable label. Used as the dedup key.
    pub name: String,

    /// Link target as found on the page, combined with the base URL to fetch
    pub path: String,
}

/// One job listing found for a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub term: String,
    pub title: String,
}

impl ResultRecord {
    /// Formats the record as an output line, without the newline
    ///
    /// ```
    /// use term_harvest::ResultRecord;
    ///
    /// let record = ResultRecord { term: "nurse".into(), title: "Engineer Backend".into() };
    /// assert_eq!(record.to_line(), "nurse,Engineer Backend");
    /// ```
    pub fn to_line(&self) -> String {
        format!("{},{}", self.term, self.title)
    }
}

/// Errors raised while extracting data from a page
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no element matches container selector '{selector}'")]
    MissingContainer { selector: String },
}

/// Extracts the queries listed on a listing page
pub trait QueryExtractor {
    /// Returns the queries in document order
    ///
    /// A page whose query container is missing is malformed and yields
    /// [`ExtractError::MissingContainer`]. A present but empty container yields
    /// an empty vector, which the crawler treats as the end of pagination.
    fn extract_queries(&self, html: &str) -> Result<Vec<Query>, ExtractError>;
}

/// Extracts the job results listed on a query's detail page
pub trait ResultExtractor {
    /// Returns one record per listing entry, each tagged with `term`
    ///
    /// A page without a results section legitimately has no results, so this
    /// never fails.
    fn extract_results(&self, term: &str, html: &str) -> Vec<ResultRecord>;
}

/// Parses a CSS selector from configuration
pub fn parse_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}
