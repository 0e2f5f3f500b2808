//! PubMed search (ESearch).

use crate::entrez::EntrezApi;
use crate::error::{PubmedError, Result};
use crate::record::Pmid;
use tracing::info;

/// Search PubMed and return up to `max_results` identifiers ordered by relevance.
///
/// Issues exactly one request. Failures are not retried: without identifiers
/// there is nothing for the rest of the pipeline to do.
///
/// # Errors
///
/// `Validation` for a blank query; any error from the service otherwise.
pub async fn search<A>(api: &A, query: &str, max_results: usize) -> Result<Vec<Pmid>>
where
    A: EntrezApi + ?Sized,
{
    let query = query.trim();
    if query.is_empty() {
        return Err(PubmedError::Validation("Search query is empty".to_string()));
    }

    info!(query, max_results, "Starting PubMed search");

    let result = api.esearch(query, max_results).await?;

    info!(
        returned = result.ids.len(),
        total_matches = ?result.count,
        "PubMed search complete"
    );

    Ok(result.ids)
}
