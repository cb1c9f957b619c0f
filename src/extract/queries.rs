use crate::config::SiteConfig;
use crate::extract::{parse_selector, ExtractError, Query, QueryExtractor};
use crate::text::Normalizer;
use crate::ConfigError;
use scraper::{Html, Selector};

/// Reads queries from the "links row" container of a listing page
///
/// Every anchor inside the first element matching the container selector
/// becomes one [`Query`]: the anchor text, normalized as a query name, and the
/// anchor's `href`, untouched.
#[derive(Debug, Clone)]
pub struct LinksRowExtractor {
    container_selector: String,
    container: Selector,
    anchor: Selector,
    normalizer: Normalizer,
}

impl LinksRowExtractor {
    /// Builds an extractor from CSS selectors
    ///
    /// # Example
    ///
    /// ```
    /// use term_harvest::extract::{LinksRowExtractor, QueryExtractor};
    /// use term_harvest::text::Normalizer;
    ///
    /// let extractor = LinksRowExtractor::new(".row.links", "a", Normalizer::default()).unwrap();
    /// let html = r#"<div class="row links"><a href="/empleo-nurse.html"> Nurse </a></div>"#;
    /// let queries = extractor.extract_queries(html).unwrap();
    /// assert_eq!(queries[0].name, "nurse");
    /// assert_eq!(queries[0].path, "/empleo-nurse.html");
    /// ```
    pub fn new(
        container: &str,
        anchor: &str,
        normalizer: Normalizer,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            container_selector: container.to_string(),
            container: parse_selector(container)?,
            anchor: parse_selector(anchor)?,
            normalizer,
        })
    }

    /// Builds an extractor from the `[site]` configuration section
    pub fn from_config(site: &SiteConfig, normalizer: Normalizer) -> Result<Self, ConfigError> {
        Self::new(&site.links_selector, &site.anchor_selector, normalizer)
    }
}

impl QueryExtractor for LinksRowExtractor {
    fn extract_queries(&self, html: &str) -> Result<Vec<Query>, ExtractError> {
        let document = Html::parse_document(html);

        let container = document.select(&self.container).next().ok_or_else(|| {
            ExtractError::MissingContainer {
                selector: self.container_selector.clone(),
            }
        })?;

        let mut queries = Vec::new();
        for anchor in container.select(&self.anchor) {
            let text = anchor.text().collect::<String>();

            let Some(href) = anchor.value().attr("href") else {
                tracing::warn!("Skipping query link without href: {:?}", text.trim());
                continue;
            };

            queries.push(Query {
                name: self.normalizer.query(&text),
                path: href.to_string(),
            });
        }

        Ok(queries)
    }
}
