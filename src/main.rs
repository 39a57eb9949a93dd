//! Product crawler main entry point
//!
//! This is the command-line interface for the breadth-first product crawler.

use anyhow::Context;
use clap::Parser;
use product_crawler::config::{clamp_depth, load_config_with_hash, validate_config, Config};
use product_crawler::crawler::run_crawl;
use product_crawler::output::log_statistics;
use product_crawler::url::SiteScope;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Product Crawler: a resumable breadth-first product page crawler
///
/// Crawls one site level by level from PATH, records the product name, page
/// title and URL of every product page in a CSV file, and can checkpoint its
/// progress so a later run picks up where this one stopped.
#[derive(Parser, Debug)]
#[command(name = "product-crawler")]
#[command(version)]
#[command(about = "A resumable breadth-first product page crawler", long_about = None)]
struct Cli {
    /// Starting path on the site (e.g. "/") or an absolute on-site URL
    #[arg(value_name = "PATH")]
    path: String,

    /// Maximum crawl depth; the starting page is depth 0
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    depth: i64,

    /// CSV file receiving product records
    #[arg(short, long, value_name = "FILE", default_value = "crawl_output.csv")]
    output: PathBuf,

    /// Checkpoint file to resume from and save progress to (.json or .db)
    #[arg(short, long, value_name = "FILE")]
    resume: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the site base URL from the configuration
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    ExitCode::from(exit_code(&run(cli).await))
}

/// Maps the outcome of a run to the process exit status
fn exit_code(result: &anyhow::Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("{:#}", e);
            1
        }
    }
}

/// Everything a crawl needs once the command line has been checked
struct CrawlPlan {
    config: Config,
    seed: Url,
    max_depth: u32,
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("product_crawler=info,warn"),
            1 => EnvFilter::new("product_crawler=debug,info"),
            2 => EnvFilter::new("product_crawler=trace,debug"),
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

/// Loads the configuration and resolves the seed and depth
///
/// Nothing is fetched or written here; every error is a configuration error.
fn plan_crawl(cli: &Cli) -> anyhow::Result<CrawlPlan> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(base_url) = &cli.base_url {
        config.site.base_url = base_url.clone();
    }

    validate_config(&config).context("Invalid configuration")?;

    let max_depth = clamp_depth(cli.depth);
    let scope = SiteScope::new(&config.site.base_url)?;
    let seed = scope
        .resolve_seed(&cli.path)
        .with_context(|| format!("Invalid start path '{}'", cli.path))?;

    Ok(CrawlPlan {
        config,
        seed,
        max_depth,
    })
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let CrawlPlan {
        config,
        seed,
        max_depth,
    } = plan_crawl(&cli)?;

    tracing::info!(
        "Crawling {} to depth {}, writing products to {}",
        seed,
        max_depth,
        cli.output.display()
    );
    if let Some(resume) = &cli.resume {
        tracing::info!("Checkpointing to {}", resume.display());
    }

    let stats = run_crawl(
        config,
        seed,
        max_depth,
        &cli.output,
        cli.resume.as_deref(),
    )
    .await
    .context("Crawl failed")?;

    log_statistics(&stats);

    Ok(())
}
