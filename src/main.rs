//! Wiki-Corpus main entry point
//!
//! This is the command-line interface for the Wiki-Corpus ingestion pipeline.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wiki_corpus::config::{load_config_with_hash, IngestionConfig};
use wiki_corpus::output::model_artifact_exists;
use wiki_corpus::Ingestion;

/// Wiki-Corpus: builds a clean text corpus from a paginated wiki index
///
/// Wiki-Corpus walks the alphabetical article index of a wiki, captures the
/// text of every article, and writes a whitespace-normalized copy for model
/// training.
#[derive(Parser, Debug)]
#[command(name = "wiki-corpus")]
#[command(version)]
#[command(about = "Builds a clean text corpus from a paginated wiki index", long_about = None)]
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

    /// Only normalize the existing raw corpus, without crawling
    #[arg(long)]
    skip_crawl: bool,

    /// Validate config and show what would be done without doing it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.skip_crawl {
        config.ingestion.crawl_enabled = false;
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let clean_dir = Ingestion::new(config)
        .run()
        .await
        .context("ingestion failed")?;

    println!("{}", clean_dir.display());
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("wiki_corpus=info,warn"),
            1 => EnvFilter::new("wiki_corpus=debug,info"),
            2 => EnvFilter::new("wiki_corpus=trace,debug"),
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

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &IngestionConfig) {
    println!("=== Wiki-Corpus Dry Run ===\n");

    println!("Corpus:");
    println!("  Raw directory: {}", config.ingestion.raw_dir.display());
    println!("  Clean directory: {}", config.ingestion.clean_dir.display());
    println!("  Write mode: {:?}", config.ingestion.write_mode);
    println!("  On article error: {:?}", config.ingestion.on_article_error);
    println!(
        "  Checkpoint interval: {}",
        config.ingestion.checkpoint_interval
    );

    println!("\nSite:");
    println!("  Start URL: {}", config.site.start_url);
    println!("  Base URL: {}", config.site.base_url);

    println!("\nSelectors:");
    println!("  Navigation: {}", config.selectors.navigation);
    println!("  Article list: {}", config.selectors.article_list);
    println!("  Content: {}", config.selectors.content);

    println!("\nHTTP:");
    println!("  Timeout: {}ms", config.http.timeout_ms);
    println!("  Max retries: {}", config.http.max_retries);
    println!("  Article concurrency: {}", config.http.article_concurrency);
    println!("  User agent: {}", config.user_agent.header_value());

    if let Some(path) = &config.output.model_artifact_path {
        let status = if model_artifact_exists(path) {
            "present"
        } else {
            "absent"
        };
        println!("\nModel artifact: {} ({})", path.display(), status);
    }

    println!("\n✓ Configuration is valid");
    if config.ingestion.crawl_enabled {
        println!("✓ Would crawl from {}", config.site.start_url);
    } else {
        println!("✓ Would only normalize existing captures");
    }
}
