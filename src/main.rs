//! Dict-Ripple main entry point
//!
//! This is the command-line interface for the Dict-Ripple dictionary harvester.

use anyhow::{bail, Context};
use clap::Parser;
use dict_ripple::config::{load_config_with_hash, Config};
use dict_ripple::crawler::{crawl, Coordinator, CrawlOptions, ExtractOutcome};
use dict_ripple::output::{load_statistics, print_statistics, ActivitySink, MemorySink};
use dict_ripple::storage::{JsonRecordStore, MediaStore};
use dict_ripple::Mode;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Dict-Ripple: a resumable dictionary harvester
///
/// Dict-Ripple walks a dictionary site's prefix search, extracts every
/// word's detail page into a JSON record, and follows synonyms, antonyms and
/// similar words one hop. Stored records are never fetched again, so an
/// interrupted run resumes where it stopped.
#[derive(Parser, Debug)]
#[command(name = "dict-ripple")]
#[command(version = "1.0.0")]
#[command(about = "A resumable dictionary harvester", long_about = None)]
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

    /// Crawl only these modes (en-kh, kh-kh, kh-en); repeatable
    #[arg(long = "mode", value_name = "MODE")]
    modes: Vec<Mode>,

    /// Start from these prefixes instead of the seed alphabet; repeatable
    #[arg(long = "prefix", value_name = "PREFIX", conflicts_with = "word")]
    prefixes: Vec<String>,

    /// Fetch or load a single word and print its record
    #[arg(long, value_name = "WORD")]
    word: Option<String>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "word"])]
    dry_run: bool,

    /// Show statistics from the data directory and exit
    #[arg(long, conflicts_with_all = ["dry_run", "word"])]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let options = CrawlOptions {
        modes: cli.modes.clone(),
        seeds: cli.prefixes.clone(),
    };

    if cli.dry_run {
        handle_dry_run(&config, &options);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if let Some(word) = &cli.word {
        handle_word(&config, word, &cli.modes).await?;
    } else {
        handle_crawl(&config, &options).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("dict_ripple=info,warn"),
            1 => EnvFilter::new("dict_ripple=debug,info"),
            2 => EnvFilter::new("dict_ripple=trace,debug"),
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

fn selected_modes(config: &Config, requested: &[Mode]) -> Vec<Mode> {
    if requested.is_empty() {
        config.crawler.modes.clone()
    } else {
        requested.to_vec()
    }
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, options: &CrawlOptions) {
    println!("=== Dict-Ripple Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!("  Branch threshold: {}", config.crawler.branch_threshold);
    println!("  Relation depth: {}", config.crawler.relation_depth);

    println!("\nSource:");
    println!("  English search: {}", config.source.english_search_url);
    println!("  Khmer search: {}", config.source.khmer_search_url);
    println!("  Detail page: {}", config.source.detail_url);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Data directory: {}", config.output.data_dir);
    println!("  Activity log: {}", config.output.activity_log);

    let modes = selected_modes(config, &options.modes);
    println!("\nModes ({}):", modes.len());
    for mode in &modes {
        let seeds = if options.seeds.is_empty() {
            mode.seed_alphabet()
        } else {
            options.seeds.clone()
        };
        println!(
            "  - {} ({} seeds, prefixes up to {} characters)",
            mode,
            seeds.len(),
            mode.max_prefix_len()
        );
        println!("    {}", seeds.join(" "));
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: counts what the data directory holds
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let data_dir = Path::new(&config.output.data_dir);
    println!("Data directory: {}\n", data_dir.display());

    let sink: Arc<dyn ActivitySink> = Arc::new(MemorySink::new());
    let store = JsonRecordStore::new(data_dir, sink);
    let media = MediaStore::new(data_dir, reqwest::Client::new());

    let stats = load_statistics(&store, &media)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles --word: fetch-or-build a single record and print it as JSON
async fn handle_word(config: &Config, word: &str, requested: &[Mode]) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(config)?;

    for mode in selected_modes(config, requested) {
        match coordinator.fetch_word(word, mode).await {
            ExtractOutcome::Fetched(entry) | ExtractOutcome::Cached(entry) => {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            }
            ExtractOutcome::NotFound => println!("{}: '{}' not found", mode, word),
            ExtractOutcome::Failed(message) => bail!("{}: '{}' failed: {}", mode, word, message),
        }
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, options: &CrawlOptions) -> anyhow::Result<()> {
    let modes = selected_modes(config, &options.modes);
    tracing::info!(
        "Crawling modes: {}",
        modes
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    if !options.seeds.is_empty() {
        tracing::info!("Explicit prefixes: {}", options.seeds.join(", "));
    }

    let report = crawl(config, options).await.context("Crawl failed")?;

    tracing::info!("Crawl completed successfully");
    println!("{}", report);

    Ok(())
}
