//! pubmed-scraper - PubMed search and CSV export
//!
//! ## Usage
//!
//! ```bash
//! pubmed-scraper "machine learning[Title] AND 2023[dp]" --max 200 --output ml.csv
//! ```

use anyhow::{Context, Result};
use clap::builder::RangedU64ValueParser;
use clap::Parser;
use pubmed_scraper::config::{ClientConfig, DEFAULT_EMAIL};
use pubmed_scraper::entrez::EntrezClient;
use pubmed_scraper::fetch::{FetchOptions, DEFAULT_CHUNK_SIZE};
use pubmed_scraper::{pipeline, search};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// PubMed Data Scraper
#[derive(Parser)]
#[command(name = "pubmed-scraper")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Search query for PubMed
    query: String,

    /// Maximum number of results to retrieve
    #[arg(long, default_value_t = 100)]
    max: usize,

    /// Output file name
    #[arg(long, default_value = "pubmed_data.csv")]
    output: PathBuf,

    /// Contact email sent to NCBI with every request
    #[arg(long, env = "NCBI_EMAIL", default_value = DEFAULT_EMAIL)]
    email: String,

    /// NCBI API key (raises the rate limit)
    #[arg(long, env = "NCBI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Identifiers per fetch request
    #[arg(
        long,
        default_value_t = DEFAULT_CHUNK_SIZE,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    chunk_size: usize,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    println!("Searching PubMed for: {}", cli.query);
    println!("Maximum results: {}", cli.max);

    let config = ClientConfig::new(cli.email).with_api_key(cli.api_key);
    let client = EntrezClient::new(config).context("Invalid E-utilities configuration")?;

    let fetch_options = FetchOptions::default().with_chunk_size(cli.chunk_size);

    let ids = search::search(&client, &cli.query, cli.max)
        .await
        .context("PubMed search failed")?;
    println!("Found {} publications", ids.len());

    let summary = pipeline::fetch_and_export(&client, &ids, &fetch_options, &cli.output)
        .await
        .context("PubMed scrape failed")?;

    println!(
        "Fetched {} records, wrote {} rows",
        summary.fetched, summary.rows
    );
    println!("Data saved to {}", cli.output.display());
    println!("Done!");

    Ok(())
}
