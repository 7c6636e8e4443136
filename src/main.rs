//! Polite Frontier main entry point
//!
//! This is the command-line interface for the polite frontier crawler.

use anyhow::Context;
use clap::Parser;
use polite_frontier::config::{load_config_with_hash, validate, Config};
use polite_frontier::crawler::run_crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Polite Frontier: a polite, deduplicating web crawler
///
/// Crawls outward from seed URLs with a pool of concurrent workers. No site
/// is fetched by two workers at once or faster than the politeness delay,
/// and every domain is crawled within the limits of its robots.txt. On
/// completion, prints one `<documents> <known URLs>` line per document.
#[derive(Parser, Debug)]
#[command(name = "polite-frontier")]
#[command(version)]
#[command(about = "A polite, deduplicating web crawler", long_about = None)]
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
    #[arg(long)]
    dry_run: bool,

    /// Additional seed URL (repeatable), appended to the configured seeds
    #[arg(long = "seed", value_name = "URL")]
    seeds: Vec<String>,

    /// Override the configured number of workers
    #[arg(long, value_name = "N")]
    workers: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    // Command-line overrides are validated like the file itself
    config.seeds.extend(cli.seeds);
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    validate(&config).context("Invalid configuration after command-line overrides")?;

    if config.seeds.is_empty() {
        anyhow::bail!("No seed URLs: set `seeds` in the config or pass --seed");
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let report = run_crawl(config).await.context("Crawl failed")?;
    report
        .stats
        .print()
        .context("Failed to write crawl statistics")?;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only the statistics table.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("polite_frontier=info,warn"),
            1 => EnvFilter::new("polite_frontier=debug,info"),
            2 => EnvFilter::new("polite_frontier=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Polite Frontier Dry Run ===\n");

    let crawler = &config.crawler;
    println!("Crawler Configuration:");
    println!("  Workers: {}", crawler.workers);
    println!("  Unique link ceiling: {}", crawler.unique_link_ceiling);
    println!("  Dedup capacity: {}", crawler.dedup_capacity);
    println!("  Checkout timeout: {}ms", crawler.checkout_timeout_ms);
    println!("  Politeness delay: {}ms", crawler.politeness_delay_ms);
    println!("  Fetch timeout: {}ms", crawler.fetch_timeout_ms);
    println!(
        "  Admitted content types: {}",
        crawler.admitted_content_types.join(", ")
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    match &config.output.documents_path {
        Some(path) => println!("  Documents: {}", path),
        None => println!("  Documents: in memory"),
    }

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  * {}", seed);
    }

    println!("\n✓ Configuration is valid");
}
