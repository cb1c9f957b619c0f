use crate::config::SiteConfig;
use crate::extract::{parse_selector, ResultExtractor, ResultRecord};
use crate::text::Normalizer;
use crate::ConfigError;
use scraper::{Html, Selector};

/// Reads job titles from the "jobs" section of a detail page
///
/// The title of each entry is the text of its first link.
#[derive(Debug, Clone)]
pub struct JobsSectionExtractor {
    container: Selector,
    entry: Selector,
    link: Selector,
    normalizer: Normalizer,
}

impl JobsSectionExtractor {
    /// Builds an extractor from CSS selectors
    pub fn new(container: &str, entry: &str, normalizer: Normalizer) -> Result<Self, ConfigError> {
        Ok(Self {
            container: parse_selector(container)?,
            entry: parse_selector(entry)?,
            link: parse_selector("a")?,
            normalizer,
        })
    }

    /// Builds an extractor from the `[site]` configuration section
    pub fn from_config(site: &SiteConfig, normalizer: Normalizer) -> Result<Self, ConfigError> {
        Self::new(&site.jobs_selector, &site.entry_selector, normalizer)
    }
}

impl ResultExtractor for JobsSectionExtractor {
    fn extract_results(&self, term: &str, html: &str) -> Vec<ResultRecord> {
        let document = Html::parse_document(html);

        let Some(container) = document.select(&self.container).next() else {
            return Vec::new();
        };

        container
            .select(&self.entry)
            .filter_map(|entry| match entry.select(&self.link).next() {
                Some(link) => Some(ResultRecord {
                    term: term.to_string(),
                    title: self.normalizer.title(&link.text().collect::<String>()),
                }),
                None => {
                    tracing::debug!("Skipping '{}' result entry without a link", term);
                    None
                }
            })
            .collect()
    }
}
