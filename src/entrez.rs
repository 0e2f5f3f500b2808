//! NCBI E-utilities client.
//!
//! [`EntrezApi`] is the boundary to the remote service: one call per ESearch
//! or EFetch request, no retries. Retry and pacing policy live in
//! [`crate::fetch`]; this module only speaks HTTP and turns response bodies
//! into identifiers or [`RawRecord`]s.
//!
//! API Details:
//! - ESearch: GET /esearch.fcgi?db=pubmed&term=...&sort=relevance&retmax=N
//! - EFetch: GET /efetch.fcgi?db=pubmed&id=1,2,3&retmode=xml
//! - `tool`/`email` (and `api_key` when set) on every request

use crate::config::ClientConfig;
use crate::error::{OptionExt, PubmedError, Result};
use crate::record::{Pmid, RawRecord};
use crate::xml::{self, Element};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Outcome of one ESearch request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    /// Total number of matches reported by the service (may exceed `ids.len()`)
    pub count: Option<u64>,
    /// Identifiers in relevance order
    pub ids: Vec<Pmid>,
}

/// The two E-utilities operations the pipeline needs
#[async_trait]
pub trait EntrezApi {
    /// Search PubMed, returning up to `max_results` identifiers sorted by relevance
    async fn esearch(&self, query: &str, max_results: usize) -> Result<SearchResult>;

    /// Fetch full records for a batch of identifiers
    async fn efetch(&self, ids: &[Pmid]) -> Result<Vec<RawRecord>>;
}

/// reqwest-backed E-utilities client
pub struct EntrezClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl EntrezClient {
    /// Create a new EntrezClient
    ///
    /// Fails if the configuration does not identify the caller properly.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .user_agent(format!(
                "{}/{} (mailto:{})",
                config.tool,
                env!("CARGO_PKG_VERSION"),
                config.email
            ))
            .timeout(config.timeout)
            .build()
            .map_err(|e| PubmedError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// GET an E-utility and return the response body
    async fn get(&self, utility: &str, mut params: Vec<(&'static str, String)>) -> Result<String> {
        params.extend(self.config.identification());
        let url = self.config.endpoint(utility);

        debug!(url = %url, "Sending E-utilities request");

        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), utility, error = %error_text, "API error");
            return Err(PubmedError::Api {
                code: status.as_u16() as i32,
                message: format!("E-utilities error: {} - {}", status, error_text.trim()),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl EntrezApi for EntrezClient {
    async fn esearch(&self, query: &str, max_results: usize) -> Result<SearchResult> {
        let body = self
            .get(
                "esearch.fcgi",
                vec![
                    ("db", "pubmed".to_string()),
                    ("term", query.to_string()),
                    ("sort", "relevance".to_string()),
                    ("retmax", max_results.to_string()),
                    ("retmode", "xml".to_string()),
                ],
            )
            .await?;
        parse_search_response(&body)
    }

    async fn efetch(&self, ids: &[Pmid]) -> Result<Vec<RawRecord>> {
        let body = self
            .get(
                "efetch.fcgi",
                vec![
                    ("db", "pubmed".to_string()),
                    ("id", ids.join(",")),
                    ("retmode", "xml".to_string()),
                ],
            )
            .await?;
        parse_fetch_response(&body)
    }
}

/// Parse an `<eSearchResult>` document
pub fn parse_search_response(body: &str) -> Result<SearchResult> {
    let root = xml::parse(body)?;
    check_service_error(&root)?;

    for message in root
        .children("WarningList")
        .flat_map(|w| w.elements())
        .map(|m| m.text_lossy())
    {
        warn!(message = %message, "ESearch warning");
    }

    let ids = root
        .child("IdList")
        .ok_or_parse("ESearch response has no IdList")?
        .children("Id")
        .map(|id| id.text_lossy())
        .filter(|id| !id.is_empty())
        .collect();

    let count = root
        .child("Count")
        .and_then(|c| c.text_lossy().parse::<u64>().ok());

    Ok(SearchResult { count, ids })
}

/// Parse a `<PubmedArticleSet>` document into records.
///
/// Only `<PubmedArticle>` entries are kept; a set without any yields an empty list.
pub fn parse_fetch_response(body: &str) -> Result<Vec<RawRecord>> {
    let root = xml::parse(body)?;
    check_service_error(&root)?;

    Ok(root
        .into_children("PubmedArticle")
        .into_iter()
        .map(RawRecord::new)
        .collect())
}

/// E-utilities report request-level failures as an `<ERROR>` element with HTTP 200
fn check_service_error(root: &Element) -> Result<()> {
    match root.child("ERROR") {
        Some(error) => Err(PubmedError::Api {
            code: 0,
            message: error.text_lossy(),
        }),
        None => Ok(()),
    }
}
