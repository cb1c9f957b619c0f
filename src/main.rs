//! Term-Harvest main entry point
//!
//! This is the command-line interface for the Term-Harvest crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use term_harvest::config::{load_config, validate, Config};
use term_harvest::crawler::crawl;
use term_harvest::state::LedgerSeed;
use tracing_subscriber::EnvFilter;

/// Term-Harvest: an incremental search-term crawler
///
/// Walks the paginated query listing of a job site and appends `term,title`
/// lines for every query not seen before. Runs until the listing runs out of
/// queries or Ctrl-C is pressed.
#[derive(Parser, Debug)]
#[command(name = "term-harvest")]
#[command(version)]
#[command(about = "An incremental search-term crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the site to crawl
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Route of the paginated query listing
    #[arg(long, value_name = "ROUTE")]
    route: Option<String>,

    /// File to append results to
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Preserve commas in query names and titles. Warning: this can break the
    /// two-column CSV format
    #[arg(long, visible_alias = "pc", overrides_with = "no_preserve_commas")]
    preserve_commas: bool,

    /// Replace commas with spaces (default)
    #[arg(long, overrides_with = "preserve_commas")]
    no_preserve_commas: bool,

    /// Stop after this many listing pages
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Skip queries whose term already appears in the output file
    #[arg(long)]
    seed_ledger_from_output: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    tracing::info!(
        "Crawling {}/{} into {} (commas {})",
        config.site.base_url.trim_end_matches('/'),
        config.site.queries_route.trim_matches('/'),
        config.output.path.display(),
        if config.crawler.strip_commas {
            "stripped"
        } else {
            "preserved"
        }
    );

    let output = config.output.path.clone();
    let outcome = crawl(config).await.context("Crawl failed")?;
    tracing::info!(
        "{} listing pages processed, results in {}",
        outcome.pages(),
        output.display()
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("term_harvest=info,warn"),
            1 => EnvFilter::new("term_harvest=debug,info"),
            2 => EnvFilter::new("term_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, if any, and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(base_url) = &cli.base_url {
        config.site.base_url = base_url.clone();
    }
    if let Some(route) = &cli.route {
        config.site.queries_route = route.clone();
    }
    if let Some(output) = &cli.output {
        config.output.path = output.clone();
    }
    if cli.preserve_commas {
        config.crawler.strip_commas = false;
    } else if cli.no_preserve_commas {
        config.crawler.strip_commas = true;
    }
    if cli.max_pages.is_some() {
        config.crawler.max_pages = cli.max_pages;
    }
    if cli.seed_ledger_from_output {
        config.crawler.ledger_seed = LedgerSeed::OutputFile;
    }

    validate(&config).context("Invalid configuration")?;

    Ok(config)
}
