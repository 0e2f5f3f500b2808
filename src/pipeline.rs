//! End-to-end run: search, fetch, extract, standardize, export.

use crate::entrez::EntrezApi;
use crate::error::Result;
use crate::export;
use crate::extract;
use crate::fetch::{self, FetchOptions};
use crate::record::Pmid;
use crate::search;
use std::path::Path;
use tracing::info;

/// Counts from one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Identifiers returned by the search
    pub found: usize,
    /// Records that survived the fetch stage
    pub fetched: usize,
    /// Rows written to the output file
    pub rows: usize,
}

/// Run the whole pipeline and write the CSV to `output`.
///
/// Only the search stage and the final write can fail the run; fetch chunks
/// that keep failing are dropped and the file is written with what remains.
pub async fn run<A>(
    api: &A,
    query: &str,
    max_results: usize,
    fetch_options: &FetchOptions,
    output: &Path,
) -> Result<RunSummary>
where
    A: EntrezApi + ?Sized,
{
    let ids = search::search(api, query, max_results).await?;
    fetch_and_export(api, &ids, fetch_options, output).await
}

/// Everything after the search: fetch `ids`, extract, standardize dates and
/// write the CSV. An empty `ids` still produces a header-only file.
pub async fn fetch_and_export<A>(
    api: &A,
    ids: &[Pmid],
    fetch_options: &FetchOptions,
    output: &Path,
) -> Result<RunSummary>
where
    A: EntrezApi + ?Sized,
{
    info!(count = ids.len(), "Found publications");

    let records = fetch::fetch_details(api, ids, fetch_options).await;
    let fetched = records.len();

    let table = extract::extract(&records).standardize_dates();
    export::save_csv(output, &table)?;

    Ok(RunSummary {
        found: ids.len(),
        fetched,
        rows: table.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::entrez::EntrezClient;
    use crate::error::PubmedError;
    use crate::table::COLUMNS;
    use mockito::Matcher;
    use std::time::Duration;

    const FETCH_XML: &str = r#"<?xml version="1.0" ?>
<PubmedArticleSet>
<PubmedArticle>
  <MedlineCitation Status="MEDLINE" Owner="NLM">
    <PMID Version="1">101</PMID>
    <Article>
      <Journal>
        <JournalIssue><PubDate><Year>2023</Year><Month>Mar</Month></PubDate></JournalIssue>
        <Title>The Lancet</Title>
      </Journal>
      <ArticleTitle>First study.</ArticleTitle>
      <Abstract><AbstractText>Background text.</AbstractText><AbstractText>Methods text.</AbstractText></Abstract>
      <AuthorList>
        <Author><LastName>Smith</LastName><ForeName>J</ForeName></Author>
        <Author><CollectiveName>Study Group</CollectiveName></Author>
      </AuthorList>
      <Language>eng</Language>
    </Article>
  </MedlineCitation>
  <PubmedData>
    <ArticleIdList>
      <ArticleId IdType="pubmed">101</ArticleId>
      <ArticleId IdType="doi">10.1016/S0140-6736(23)00001-1</ArticleId>
    </ArticleIdList>
  </PubmedData>
</PubmedArticle>
<PubmedArticle>
  <MedlineCitation Status="In-Process" Owner="NLM">
    <PMID Version="1">102</PMID>
    <Article><ArticleTitle>Second study.</ArticleTitle></Article>
  </MedlineCitation>
</PubmedArticle>
</PubmedArticleSet>"#;

    fn options() -> FetchOptions {
        FetchOptions {
            pacing: Duration::ZERO,
            ..Default::default()
        }
    }

    fn client_for(server: &mockito::Server) -> EntrezClient {
        EntrezClient::new(ClientConfig::new("tester@lab.org").with_base_url(server.url()))
            .expect("valid config")
    }

    #[tokio::test]
    async fn test_run_writes_standardized_csv() {
        let mut server = mockito::Server::new_async().await;
        let search_mock = server
            .mock("GET", "/esearch.fcgi")
            .match_query(Matcher::UrlEncoded("term".into(), "asthma".into()))
            .with_body("<eSearchResult><Count>2</Count><IdList><Id>101</Id><Id>102</Id></IdList></eSearchResult>")
            .expect(1)
            .create_async()
            .await;
        let fetch_mock = server
            .mock("GET", "/efetch.fcgi")
            .match_query(Matcher::UrlEncoded("id".into(), "101,102".into()))
            .with_body(FETCH_XML)
            .expect(1)
            .create_async()
            .await;

        let dir = tempfile::tempdir().expect("temp dir");
        let output = dir.path().join("pubmed_data.csv");
        let client = client_for(&server);

        let summary = run(&client, "asthma", 10, &options(), &output)
            .await
            .expect("run succeeds");

        assert_eq!(
            summary,
            RunSummary {
                found: 2,
                fetched: 2,
                rows: 2
            }
        );
        search_mock.assert_async().await;
        fetch_mock.assert_async().await;

        let mut reader = csv::Reader::from_path(&output).expect("output exists");
        let records: Vec<csv::StringRecord> = reader
            .records()
            .collect::<std::result::Result<_, _>>()
            .expect("valid csv");
        assert_eq!(records.len(), 2);

        let first: Vec<&str> = records[0].iter().collect();
        assert_eq!(
            first,
            vec![
                "101",
                "First study.",
                "Background text. Methods text.",
                "The Lancet",
                "eng",
                "2023",
                "03",
                "",
                "Smith J; Study Group",
                "No Keywords",
                "10.1016/S0140-6736(23)00001-1",
            ]
        );

        let second: Vec<&str> = records[1].iter().collect();
        assert_eq!(
            second,
            vec![
                "102",
                "Second study.",
                "No Abstract",
                "No Journal",
                "Unknown",
                "",
                "",
                "",
                "No Authors",
                "No Keywords",
                "No DOI",
            ]
        );
    }

    #[tokio::test]
    async fn test_run_with_no_results_writes_header_only() {
        let mut server = mockito::Server::new_async().await;
        let search_mock = server
            .mock("GET", "/esearch.fcgi")
            .match_query(Matcher::Any)
            .with_body("<eSearchResult><Count>0</Count><IdList/></eSearchResult>")
            .expect(1)
            .create_async()
            .await;
        let fetch_mock = server
            .mock("GET", "/efetch.fcgi")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let dir = tempfile::tempdir().expect("temp dir");
        let output = dir.path().join("empty.csv");
        let client = client_for(&server);

        let summary = run(&client, "zzzxqqq", 100, &options(), &output)
            .await
            .expect("run succeeds");

        assert_eq!(summary, RunSummary::default());
        search_mock.assert_async().await;
        fetch_mock.assert_async().await;

        let contents = std::fs::read_to_string(&output).expect("output exists");
        assert_eq!(contents, format!("{}\n", COLUMNS.join(",")));
    }

    #[tokio::test]
    async fn test_search_failure_aborts_before_writing() {
        let mut server = mockito::Server::new_async().await;
        let search_mock = server
            .mock("GET", "/esearch.fcgi")
            .match_query(Matcher::Any)
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let dir = tempfile::tempdir().expect("temp dir");
        let output = dir.path().join("never.csv");
        let client = client_for(&server);

        let err = run(&client, "asthma", 10, &options(), &output)
            .await
            .expect_err("search failure is fatal");

        assert!(matches!(err, PubmedError::Api { code: 500, .. }));
        assert!(!output.exists());
        search_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_and_export_skips_search() {
        let mut server = mockito::Server::new_async().await;
        let search_mock = server
            .mock("GET", "/esearch.fcgi")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let fetch_mock = server
            .mock("GET", "/efetch.fcgi")
            .match_query(Matcher::UrlEncoded("id".into(), "101,102".into()))
            .with_body(FETCH_XML)
            .expect(1)
            .create_async()
            .await;

        let dir = tempfile::tempdir().expect("temp dir");
        let output = dir.path().join("ids.csv");
        let client = client_for(&server);
        let ids = vec!["101".to_string(), "102".to_string()];

        let summary = fetch_and_export(&client, &ids, &options(), &output)
            .await
            .expect("export succeeds");

        assert_eq!(
            summary,
            RunSummary {
                found: 2,
                fetched: 2,
                rows: 2
            }
        );
        search_mock.assert_async().await;
        fetch_mock.assert_async().await;

        let mut reader = csv::Reader::from_path(&output).expect("output exists");
        assert_eq!(reader.records().count(), 2);
    }
}
