//! # pubmed-scraper
//!
//! PubMed literature retrieval: search, chunked fetch, field extraction and CSV export.
//!
//! ## Modules
//!
//! - [`search`] - ESearch for identifiers ordered by relevance
//! - [`fetch`] - chunked EFetch with retry and exponential backoff
//! - [`extract`] - per-field accessors flattening records into rows
//! - [`table`] - rows, tables and date standardization
//! - [`export`] - CSV writer
//! - [`entrez`] - E-utilities HTTP client
//! - [`config`] - client configuration
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pubmed_scraper::{config::ClientConfig, entrez::EntrezClient, fetch::FetchOptions, pipeline};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = EntrezClient::new(ClientConfig::new("me@example.org"))?;
//!     let summary = pipeline::run(
//!         &client,
//!         "crispr[Title]",
//!         50,
//!         &FetchOptions::default(),
//!         Path::new("pubmed_data.csv"),
//!     )
//!     .await?;
//!     println!("Wrote {} rows", summary.rows);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod entrez;
pub mod error;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod progress;
pub mod record;
pub mod search;
pub mod table;
pub mod xml;

pub use error::{PubmedError, Result};
