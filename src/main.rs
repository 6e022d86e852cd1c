//! Thread-Harvest main entry point
//!
//! This is the command-line interface for the Thread-Harvest forum crawler.

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use thread_harvest::config::{load_config_with_hash, Config};
use thread_harvest::crawler::{fetch_popular_threads, HttpTransport};
use thread_harvest::output::{
    print_statistics, write_error_event, write_outcome_json, write_result_event, EventStreamSink,
};
use tracing_subscriber::EnvFilter;

/// Thread-Harvest: a polite crawler for paginated forum threads
///
/// Thread-Harvest discovers how many pages a thread has, fetches them in
/// small rate-limited batches with randomized pauses, and collects every
/// post in page order.
#[derive(Parser, Debug)]
#[command(name = "thread-harvest")]
#[command(version)]
#[command(about = "A polite crawler for paginated forum threads", long_about = None)]
struct Cli {
    /// URL of the thread's first page (or of the listing page with --popular)
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Fetch every Nth page
    #[arg(long)]
    stride: Option<u32>,

    /// Fetch at most this many pages
    #[arg(long)]
    max_pages: Option<u32>,

    /// Maximum simultaneous page fetches
    #[arg(long)]
    concurrency: Option<u32>,

    /// Median pause between batches in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Only report the page count and title, without crawling
    #[arg(long, conflicts_with_all = ["popular", "stream"])]
    probe: bool,

    /// Treat URL as a popular-threads listing and print its entries
    #[arg(long, conflicts_with_all = ["probe", "stream"])]
    popular: bool,

    /// Write progress and the final result as event-stream frames on stdout
    #[arg(long, conflicts_with_all = ["probe", "popular"])]
    stream: bool,

    /// Write the crawl outcome as JSON to this file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };
    apply_overrides(&mut config, &cli);

    if cli.probe {
        handle_probe(&cli.url, &config).await
    } else if cli.popular {
        handle_popular(&cli.url, &config).await
    } else {
        handle_crawl(&cli, &config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout stays clean for `--stream` frames.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("thread_harvest=info,warn"),
            1 => EnvFilter::new("thread_harvest=debug,info"),
            2 => EnvFilter::new("thread_harvest=trace,debug"),
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

/// Applies command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(stride) = cli.stride {
        config.crawler.stride = stride;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = Some(max_pages);
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency_limit = concurrency;
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.crawler.base_delay_ms = delay_ms;
    }
}

/// Handles the --probe mode: shows page count, title and estimated records
async fn handle_probe(url: &str, config: &Config) -> anyhow::Result<()> {
    let info = thread_harvest::probe_thread(url, config)
        .await
        .context("Probe failed")?;

    println!("=== Thread Probe ===\n");
    println!("URL: {}", url);
    println!("Title: {}", info.title.as_deref().unwrap_or("(not found)"));
    println!("Total pages: {}", info.total_pages);
    println!(
        "Estimated records: {}",
        info.estimated_records(config.listing.records_per_page)
    );

    Ok(())
}

/// Handles the --popular mode: lists threads from a listing page
async fn handle_popular(url: &str, config: &Config) -> anyhow::Result<()> {
    let transport = HttpTransport::new(&config.http).context("Failed to build HTTP client")?;
    let threads = fetch_popular_threads(&transport, url, &config.listing)
        .await
        .context("Failed to fetch popular threads")?;

    println!("=== Popular Threads ({}) ===\n", threads.len());
    for thread in &threads {
        println!("{}", thread.title);
        if !thread.category.is_empty() {
            println!("  Category: {}", thread.category);
        }
        if let Some(url) = &thread.url {
            println!("  URL: {}", url);
        }
        if let (Some(views), Some(replies)) = (thread.views, thread.replies) {
            println!("  Views: {}, Replies: {}", views, replies);
        }
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        "Starting crawl of {} (stride {}, concurrency {}, cap {:?})",
        cli.url,
        config.crawler.stride,
        config.crawler.concurrency_limit,
        config.crawler.max_pages
    );

    let outcome = if cli.stream {
        let sink = EventStreamSink::new(std::io::stdout());
        let crawled = thread_harvest::crawl(&cli.url, config, Some(&sink)).await;
        let mut stdout = sink.into_inner();
        match crawled {
            Ok(outcome) => {
                write_result_event(&mut stdout, &outcome).context("Failed to write result event")?;
                stdout.flush()?;
                outcome
            }
            Err(e) => {
                write_error_event(&mut stdout, &e).context("Failed to write error event")?;
                return Err(anyhow::Error::new(e).context("Crawl failed"));
            }
        }
    } else {
        let outcome = thread_harvest::crawl(&cli.url, config, None)
            .await
            .context("Crawl failed")?;
        print_statistics(&outcome);
        outcome
    };

    if let Some(path) = &cli.output {
        write_outcome_json(&outcome, path)
            .with_context(|| format!("Failed to write outcome to {}", path.display()))?;
    }

    Ok(())
}
