//! Configuration module for Term-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every field has a default, so a crawl can run without any file at all.
//!
//! # Example
//!
//! ```no_run
//! use term_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawling {}", config.site.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HttpConfig, OutputConfig, SiteConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
