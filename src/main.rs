//! listing-harvest main entry point
//!
//! This is the command-line interface for the listing-harvest scraper.

use anyhow::Context;
use clap::Parser;
use listing_harvest::config::{load_config_with_hash, Config};
use listing_harvest::output::print_statistics;
use listing_harvest::scrape::run_harvest;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// listing-harvest: a classifieds search scraper
///
/// Reads the searches listed in a TOML configuration file, scrapes every
/// result page and posting, and writes one CSV file per search.
#[derive(Parser, Debug)]
#[command(name = "listing-harvest")]
#[command(version)]
#[command(about = "Scrape classifieds search results into CSV files", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show which searches would run, without fetching anything
    #[arg(long)]
    dry_run: bool,

    /// Only run the searches with these names (repeatable)
    #[arg(long, value_name = "NAME")]
    only: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config, &cli.only);
        return Ok(());
    }

    let report = run_harvest(&config, &cli.only)
        .await
        .context("harvest failed")?;

    if !cli.quiet {
        print_statistics(&report);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("listing_harvest=info,warn"),
            1 => EnvFilter::new("listing_harvest=debug,info"),
            2 => EnvFilter::new("listing_harvest=trace,debug"),
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

/// Handles the --dry-run mode: shows what would be scraped
fn handle_dry_run(config: &Config, only: &[String]) {
    println!("=== listing-harvest Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Request timeout: {}s", config.scraper.request_timeout);
    println!("  Max extra pages: {}", config.scraper.max_extra_pages);
    println!(
        "  Origin: ({}, {})",
        config.origin.latitude, config.origin.longitude
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    let selected: Vec<_> = config
        .searches
        .iter()
        .filter(|s| only.is_empty() || only.contains(&s.name))
        .collect();

    println!("\nSearches ({}):", selected.len());
    for search in &selected {
        println!("  - {}", search.name);
        println!("    * {}", search.url);
        println!("    * -> {}", search.output);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would run {} searches", selected.len());
}
