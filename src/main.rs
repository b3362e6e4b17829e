//! Papyrus main entry point
//!
//! This is the command-line interface for the Papyrus single-site text
//! archiver.

use anyhow::Context;
use clap::Parser;
use papyrus::config::load_config_with_hash;
use papyrus::crawler::crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Papyrus: a single-site text archiver
///
/// Papyrus crawls one website from a seed URL, visiting every in-scope page
/// reachable by links, and archives the substantive text of each page into
/// a single ordered text file.
#[derive(Parser, Debug)]
#[command(name = "papyrus")]
#[command(version = "1.0.0")]
#[command(about = "A single-site text archiver", long_about = None)]
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

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let summary = crawl(config).await.context("Crawl failed")?;

    println!(
        "Archived {} of {} visited pages ({} blocks, {} bytes) in {:.1}s",
        summary.pages_archived,
        summary.pages_visited,
        summary.blocks_written,
        summary.bytes_written,
        summary.elapsed.as_secs_f64()
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
            0 => EnvFilter::new("papyrus=info,warn"),
            1 => EnvFilter::new("papyrus=debug,info"),
            2 => EnvFilter::new("papyrus=trace,debug"),
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
fn handle_dry_run(config: &papyrus::config::Config) {
    println!("=== Papyrus Dry Run ===\n");

    println!("Crawl:");
    println!("  Seed URL: {}", config.crawl.seed_url);
    println!("  Politeness delay: {}ms", config.crawl.politeness_delay_ms);
    println!("  Fetch timeout: {}s", config.crawl.fetch_timeout_secs);
    println!("  Max retries: {}", config.crawl.max_retries);
    println!("  Workers: {}", config.crawl.workers);

    println!("\nScope:");
    println!("  Origin: {}", config.scope.origin);
    println!(
        "  Excluded prefixes ({}):",
        config.scope.excluded_prefixes.len()
    );
    for prefix in &config.scope.excluded_prefixes {
        println!("    - {}", prefix);
    }
    println!(
        "  Excluded extensions ({}):",
        config.scope.excluded_extensions.len()
    );
    for ext in &config.scope.excluded_extensions {
        println!("    - {}", ext);
    }

    println!("\nContent:");
    println!("  Minimum block words: {}", config.content.min_block_words);

    println!("\nOutput:");
    println!("  Archive: {}", config.output.archive_path);
    println!("  Flush every: {} pages", config.output.flush_every_pages);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\n✓ Configuration is valid");
}
