//! Field extraction from PubMed records.
//!
//! Each output column has its own accessor that owns one presence/shape
//! policy and substitutes a sentinel when the source is missing. Extraction
//! never drops a record: `extract` yields exactly one [`Row`] per input.

use crate::progress;
use crate::record::RawRecord;
use crate::table::{Row, Table, NO_DATA};
use crate::xml::Element;
use quick_xml::escape::EscapeError;
use tracing::{debug, info, warn};

pub const NO_PMID: &str = "No PMID";
pub const NO_TITLE: &str = "No Title";
pub const NO_ABSTRACT: &str = "No Abstract";
pub const NO_JOURNAL: &str = "No Journal";
pub const UNKNOWN_LANGUAGE: &str = "Unknown";
pub const NO_AUTHORS: &str = "No Authors";
pub const NO_KEYWORDS: &str = "No Keywords";
pub const NO_DOI: &str = "No DOI";

/// Counters for failures that extraction hides behind sentinels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractDiagnostics {
    /// Records whose abstract was present but could not be decoded
    pub abstract_failures: usize,
}

/// Flatten records into a table, one row per record
pub fn extract(records: &[RawRecord]) -> Table {
    let (table, diagnostics) = extract_with_diagnostics(records);
    if diagnostics.abstract_failures > 0 {
        warn!(
            failures = diagnostics.abstract_failures,
            "Some abstracts could not be decoded and were replaced with a placeholder"
        );
    }
    table
}

/// Like [`extract`], also reporting how many fields fell back to a sentinel
/// because of a decoding error
pub fn extract_with_diagnostics(records: &[RawRecord]) -> (Table, ExtractDiagnostics) {
    let pb = progress::bar(records.len(), "Extracting publication data");
    let mut diagnostics = ExtractDiagnostics::default();
    let mut rows = Vec::with_capacity(records.len());

    for record in records {
        let (row, abstract_ok) = extract_row(record);
        if !abstract_ok {
            diagnostics.abstract_failures += 1;
        }
        rows.push(row);
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(rows = rows.len(), "Extraction complete");

    (Table::new(rows), diagnostics)
}

/// Build one row; the flag is `false` when the abstract had to be replaced
fn extract_row(record: &RawRecord) -> (Row, bool) {
    let pmid = pmid(record);

    let (abstract_text, abstract_ok) = match abstract_text(record) {
        Ok(text) => (text.unwrap_or_else(|| NO_ABSTRACT.to_string()), true),
        Err(e) => {
            debug!(pmid = %pmid, error = %e, "Abstract could not be decoded");
            (NO_ABSTRACT.to_string(), false)
        }
    };

    let row = Row {
        title: title(record),
        abstract_text,
        journal: journal(record),
        language: language(record),
        year: Some(pub_date_part(record, "Year")),
        month: Some(pub_date_part(record, "Month")),
        day: Some(pub_date_part(record, "Day")),
        authors: authors(record),
        keywords: keywords(record),
        doi: doi(record),
        pmid,
    };

    (row, abstract_ok)
}

/// `MedlineCitation/PMID`
pub fn pmid(record: &RawRecord) -> String {
    record
        .citation()
        .and_then(|c| c.child("PMID"))
        .map(Element::text_lossy)
        .unwrap_or_else(|| NO_PMID.to_string())
}

/// `Article/ArticleTitle`, with inline markup flattened
pub fn title(record: &RawRecord) -> String {
    record
        .article()
        .and_then(|a| a.child("ArticleTitle"))
        .map(Element::text_lossy)
        .unwrap_or_else(|| NO_TITLE.to_string())
}

/// `Article/Abstract/AbstractText` segments joined by a single space.
///
/// `Ok(None)` when there is no abstract; `Err` when a segment holds an entity
/// reference that cannot be resolved.
pub fn abstract_text(record: &RawRecord) -> Result<Option<String>, EscapeError> {
    let segments: Vec<&Element> = record
        .article()
        .and_then(|a| a.child("Abstract"))
        .map(|ab| ab.children("AbstractText").collect())
        .unwrap_or_default();

    if segments.is_empty() {
        return Ok(None);
    }

    let parts = segments
        .iter()
        .map(|s| s.text())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(parts.join(" ")))
}

/// `Article/Journal/Title`
pub fn journal(record: &RawRecord) -> String {
    record
        .article()
        .and_then(|a| a.path(&["Journal", "Title"]))
        .map(Element::text_lossy)
        .unwrap_or_else(|| NO_JOURNAL.to_string())
}

/// First `Article/Language`
pub fn language(record: &RawRecord) -> String {
    record
        .article()
        .and_then(|a| a.child("Language"))
        .map(Element::text_lossy)
        .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string())
}

/// `Year`, `Month` or `Day` under `Journal/JournalIssue/PubDate`
pub fn pub_date_part(record: &RawRecord, part: &str) -> String {
    record
        .article()
        .and_then(|a| a.path(&["Journal", "JournalIssue", "PubDate", part]))
        .map(Element::text_lossy)
        .unwrap_or_else(|| NO_DATA.to_string())
}

/// Display name of one `<Author>`: "LastName ForeName", "LastName" or the
/// collective name, in that order of preference
pub fn author_name(author: &Element) -> Option<String> {
    match (author.child("LastName"), author.child("ForeName")) {
        (Some(last), Some(fore)) => Some(format!("{} {}", last.text_lossy(), fore.text_lossy())),
        (Some(last), None) => Some(last.text_lossy()),
        _ => author.child("CollectiveName").map(Element::text_lossy),
    }
}

/// All nameable authors joined with "; "
pub fn authors(record: &RawRecord) -> String {
    let names: Vec<String> = record
        .article()
        .and_then(|a| a.child("AuthorList"))
        .map(|list| list.children("Author").filter_map(author_name).collect())
        .unwrap_or_default();

    if names.is_empty() {
        NO_AUTHORS.to_string()
    } else {
        names.join("; ")
    }
}

/// Keywords of the first `KeywordList` only, joined with "; "
pub fn keywords(record: &RawRecord) -> String {
    let keywords: Vec<String> = record
        .citation()
        .and_then(|c| c.child("KeywordList"))
        .map(|group| group.children("Keyword").map(Element::text_lossy).collect())
        .unwrap_or_default();

    if keywords.is_empty() {
        NO_KEYWORDS.to_string()
    } else {
        keywords.join("; ")
    }
}

/// First `ArticleId` with `IdType="doi"`
pub fn doi(record: &RawRecord) -> String {
    record
        .pubmed_data()
        .and_then(|d| d.child("ArticleIdList"))
        .and_then(|list| {
            list.children("ArticleId")
                .find(|id| id.attr("IdType") == Some("doi"))
        })
        .map(Element::text_lossy)
        .unwrap_or_else(|| NO_DOI.to_string())
}
