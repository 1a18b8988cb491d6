//! Ripple-Sitemap main entry point
//!
//! This is the command-line interface for the Ripple-Sitemap generator.

use anyhow::Context;
use clap::Parser;
use ripple_sitemap::config::{load_config_with_hash, Config};
use ripple_sitemap::crawler::run_once;
use ripple_sitemap::output::{load_statistics, print_statistics};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Ripple-Sitemap: a single-host sitemap generator
///
/// Ripple-Sitemap crawls every page reachable from the configured seed URL
/// on the seed's host, writes a sitemap.xml for them and records the run in
/// an append-only history file.
#[derive(Parser, Debug)]
#[command(name = "ripple-sitemap")]
#[command(version = "1.0.0")]
#[command(about = "A single-host sitemap generator", long_about = None)]
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

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "history")]
    dry_run: bool,

    /// Show the recorded run history and exit
    #[arg(long, conflicts_with = "dry_run")]
    history: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.history {
        handle_history(&config)?;
    } else {
        handle_crawl(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_sitemap=info,warn"),
            1 => EnvFilter::new("ripple_sitemap=debug,info"),
            2 => EnvFilter::new("ripple_sitemap=trace,debug"),
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

/// Handles the --dry-run mode: shows the validated configuration
fn handle_dry_run(config: &Config) {
    println!("=== Ripple-Sitemap Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout);
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    println!("  Link join: {:?}", config.crawler.link_join);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Sitemap: {}", config.output.sitemap_path.display());
    println!("  History: {}", config.output.history_path.display());

    println!("\n✓ Configuration is valid");
}

/// Handles the --history mode: prints the recorded runs
fn handle_history(config: &Config) -> anyhow::Result<()> {
    let stats = load_statistics(&config.output.history_path).with_context(|| {
        format!(
            "Failed to read history {}",
            config.output.history_path.display()
        )
    })?;
    print_statistics(&stats);
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Starting crawl of {}", config.crawler.seed_url);

    match run_once(config).await {
        Ok(report) => {
            tracing::info!("Crawl completed successfully");
            println!("{}", report.message());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
