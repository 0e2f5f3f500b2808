//! Chunked EFetch with bounded retry.
//!
//! Identifiers are fetched in consecutive chunks, one request at a time.
//! A failing chunk is retried with exponential backoff (2s, 4s) and dropped
//! after the last attempt; the run carries on with the next chunk. Every chunk
//! is followed by a fixed pause to keep the request rate polite.

use crate::entrez::EntrezApi;
use crate::progress;
use crate::record::{Pmid, RawRecord};
use indicatif::ProgressBar;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Default number of identifiers per EFetch request
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Default number of attempts per chunk
pub const DEFAULT_MAX_TRIES: u32 = 3;

/// Pause after every chunk
pub const DEFAULT_PACING: Duration = Duration::from_millis(500);

/// Fetch loop settings
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Identifiers per request (0 is treated as 1)
    pub chunk_size: usize,
    /// Attempts per chunk, including the first
    pub max_tries: u32,
    /// Pause after each chunk, success or not
    pub pacing: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_tries: DEFAULT_MAX_TRIES,
            pacing: DEFAULT_PACING,
        }
    }
}

impl FetchOptions {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }
}

/// Delay before the next attempt after `tries` failures: `2^tries` seconds
pub fn backoff_delay(tries: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(tries))
}

/// Number of requests needed for `ids` identifiers
pub fn chunk_count(ids: usize, chunk_size: usize) -> usize {
    ids.div_ceil(chunk_size.max(1))
}

/// Fetch full records for `ids`, in order.
///
/// Never fails as a whole: chunks that exhaust their attempts are logged and
/// skipped, so the result may hold fewer records than `ids`, never more.
pub async fn fetch_details<A>(api: &A, ids: &[Pmid], options: &FetchOptions) -> Vec<RawRecord>
where
    A: EntrezApi + ?Sized,
{
    let chunk_size = options.chunk_size.max(1);
    let max_tries = options.max_tries.max(1);
    let total_chunks = chunk_count(ids.len(), chunk_size);

    info!(
        ids = ids.len(),
        chunks = total_chunks,
        chunk_size,
        "Fetching publication details"
    );

    let pb = progress::bar(total_chunks, "Fetching publication details");
    let mut all_records = Vec::new();

    for (chunk_idx, chunk) in ids.chunks(chunk_size).enumerate() {
        let offset = chunk_idx * chunk_size;

        if let Some(mut records) = fetch_chunk(api, chunk, offset, max_tries, &pb).await {
            if records.len() > chunk.len() {
                pb.suspend(|| {
                    warn!(
                        offset,
                        requested = chunk.len(),
                        returned = records.len(),
                        "EFetch returned more records than requested, truncating"
                    )
                });
                records.truncate(chunk.len());
            }
            debug!(offset, found = records.len(), "Chunk completed");
            all_records.extend(records);
        }

        pb.inc(1);
        tokio::time::sleep(options.pacing).await;
    }

    pb.finish_and_clear();

    info!(
        requested = ids.len(),
        fetched = all_records.len(),
        "Fetch complete"
    );

    all_records
}

/// One chunk with up to `max_tries` attempts; `None` once they are exhausted
async fn fetch_chunk<A>(
    api: &A,
    chunk: &[Pmid],
    offset: usize,
    max_tries: u32,
    pb: &ProgressBar,
) -> Option<Vec<RawRecord>>
where
    A: EntrezApi + ?Sized,
{
    let mut tries = 0;

    while tries < max_tries {
        match api.efetch(chunk).await {
            Ok(records) => return Some(records),
            Err(e) => {
                tries += 1;
                pb.suspend(|| {
                    warn!(
                        offset,
                        attempt = tries,
                        max_tries,
                        error = %e,
                        "Error fetching details"
                    )
                });

                if tries < max_tries {
                    let wait = backoff_delay(tries);
                    pb.suspend(|| warn!(wait_secs = wait.as_secs(), "Waiting before retrying"));
                    tokio::time::sleep(wait).await;
                } else {
                    pb.suspend(|| {
                        error!(offset, ids = chunk.len(), "Failed to fetch details for chunk")
                    });
                }
            }
        }
    }

    None
}
