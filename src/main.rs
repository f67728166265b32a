//! Langscout main entry point
//!
//! This is the command-line interface for the Langscout follower-graph crawler.

use anyhow::Context;
use clap::Parser;
use langscout::config::{config_fingerprint, load_config, Config};
use langscout::crawler::crawl;
use langscout::frontier::{load_seeds, SqliteFrontier};
use langscout::output::{load_statistics, print_statistics};
use langscout::storage::open_archive;
use tracing_subscriber::EnvFilter;

/// Langscout: a language-targeted follower-graph crawler
///
/// Langscout walks outward from seed accounts through their followers and
/// archives every account whose recent posts are mostly in the target
/// language. Configuration is read from the environment (and `.env`).
#[derive(Parser, Debug)]
#[command(name = "langscout")]
#[command(version)]
#[command(about = "A language-targeted follower-graph crawler", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the archive and frontier and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    // Load and validate configuration
    let config = match load_config() {
        Ok(cfg) => {
            tracing::info!(
                "Configuration loaded successfully (fingerprint: {})",
                config_fingerprint(&cfg)
            );
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_crawl(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("langscout=info,warn"),
            1 => EnvFilter::new("langscout=debug,info"),
            2 => EnvFilter::new("langscout=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Langscout Dry Run ===\n");

    println!("API:");
    println!("  Base URL: {}", config.api.base_url);
    println!("  Request timeout: {}s", config.api.request_timeout_secs);
    println!("  Token timeout: {}s", config.api.token_timeout_secs);

    println!("\nCrawler Configuration:");
    println!("  Target language: {}", config.crawler.target_language);
    println!("  Acceptance threshold: {}", config.crawler.threshold);
    println!("  Script share: {}", config.crawler.script_share);
    println!("  Timeline limit: {}", config.crawler.timeline_limit);
    println!("  Follower sample size: {}", config.crawler.sample_size);
    println!("  Pass size: {}", config.crawler.pass_size);
    println!("  Workers: {}", config.crawler.workers);
    println!("  Cooldown: {}s", config.crawler.cooldown_secs);
    println!("  Idle sleep: {}s", config.crawler.idle_secs);

    println!("\nStorage:");
    println!("  Archive: {}", config.storage.database_path.display());
    println!(
        "  Frontier: {} (set '{}')",
        config.storage.frontier_path.display(),
        config.storage.frontier_name
    );

    let seeds = load_seeds(&config.seeds).context("Failed to load seeds")?;
    println!("\nSeeds ({}):", seeds.len());
    for seed in &seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --stats mode: shows statistics from the archive and frontier
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Archive: {}", config.storage.database_path.display());
    println!("Frontier: {}\n", config.storage.frontier_path.display());

    let archive = open_archive(&config.storage.database_path)
        .context("Failed to open archive database")?;
    let frontier = SqliteFrontier::new(
        &config.storage.frontier_path,
        &config.storage.frontier_name,
    )
    .context("Failed to open frontier database")?;

    let stats = load_statistics(&archive, &frontier)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling for '{}' accounts (threshold {}, {} worker(s))",
        config.crawler.target_language,
        config.crawler.threshold,
        config.crawler.workers
    );

    match crawl(config).await {
        Ok(never) => match never {},
        Err(e) => {
            tracing::error!("Crawl failed to start: {}", e);
            Err(e.into())
        }
    }
}
