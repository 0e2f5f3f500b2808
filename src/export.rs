//! CSV export.

use crate::error::Result;
use crate::table::{Table, COLUMNS};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Write the table to `path`, replacing any existing file
pub fn save_csv(path: &Path, table: &Table) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(file, table)?;
    info!(path = %path.display(), rows = table.len(), "Saved CSV");
    Ok(())
}

/// Write the header and one line per row.
///
/// The header is written explicitly so an empty table still yields a valid
/// header-only file. Missing date parts become empty cells.
pub fn write_csv<W: Write>(writer: W, table: &Table) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(COLUMNS)?;
    for row in table.rows() {
        wtr.serialize(row)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Row, NO_DATA};

    fn sample_row() -> Row {
        Row {
            pmid: "42".to_string(),
            title: "Commas, \"quotes\" and more".to_string(),
            abstract_text: "Line one.".to_string(),
            journal: "Cell".to_string(),
            language: "eng".to_string(),
            year: Some("2020".to_string()),
            month: Some("Mar".to_string()),
            day: Some(NO_DATA.to_string()),
            authors: "Smith J; Study Group".to_string(),
            keywords: "a; b".to_string(),
            doi: "10.1016/j.cell.2020.01.001".to_string(),
        }
    }

    fn render(table: &Table) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, table).expect("write to memory");
        String::from_utf8(buf).expect("utf8 output")
    }

    #[test]
    fn test_empty_table_writes_header_only() {
        assert_eq!(
            render(&Table::default()),
            "PMID,Title,Abstract,Journal,Language,Year,Month,Day,Authors,Keywords,DOI\n"
        );
    }

    #[test]
    fn test_rows_follow_header_and_missing_dates_are_empty() {
        let table = Table::new(vec![sample_row()]).standardize_dates();
        let out = render(&table);
        let mut lines = out.lines();

        assert_eq!(lines.next(), Some(COLUMNS.join(",").as_str()));
        assert_eq!(
            lines.next(),
            Some("42,\"Commas, \"\"quotes\"\" and more\",Line one.,Cell,eng,2020,03,,Smith J; Study Group,a; b,10.1016/j.cell.2020.01.001")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_save_csv_round_trips_through_reader() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("out.csv");
        let table = Table::new(vec![sample_row(), sample_row()]);

        save_csv(&path, &table).expect("save");

        let mut reader = csv::Reader::from_path(&path).expect("open");
        let headers: Vec<String> = reader
            .headers()
            .expect("headers")
            .iter()
            .map(str::to_string)
            .collect();
        assert_eq!(headers, COLUMNS);

        let records: Vec<csv::StringRecord> = reader
            .records()
            .collect::<std::result::Result<_, _>>()
            .expect("valid csv");
        assert_eq!(records.len(), table.len());
        for record in &records {
            let cells: Vec<&str> = record.iter().collect();
            assert_eq!(cells.len(), COLUMNS.len());
            assert_eq!(cells[0], "42");
            assert_eq!(cells[1], "Commas, \"quotes\" and more");
            assert_eq!(cells[6], "Mar");
            assert_eq!(cells[7], NO_DATA);
        }
    }
}
