//! Flat output rows and date standardization.

use serde::Serialize;

/// Placeholder for an absent year, month or day before standardization
pub const NO_DATA: &str = "No Data";

/// CSV column order for the exported table
pub const COLUMNS: [&str; 11] = [
    "PMID", "Title", "Abstract", "Journal", "Language", "Year", "Month", "Day", "Authors",
    "Keywords", "DOI",
];

/// Three-letter month abbreviations as PubMed writes them in `PubDate/Month`
const MONTHS: [(&str, &str); 12] = [
    ("Jan", "01"),
    ("Feb", "02"),
    ("Mar", "03"),
    ("Apr", "04"),
    ("May", "05"),
    ("Jun", "06"),
    ("Jul", "07"),
    ("Aug", "08"),
    ("Sep", "09"),
    ("Oct", "10"),
    ("Nov", "11"),
    ("Dec", "12"),
];

/// One flattened record.
///
/// Date parts are `Some(NO_DATA)` straight out of extraction and `None` (an
/// empty CSV cell) once [`Table::standardize_dates`] has run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    #[serde(rename = "PMID")]
    pub pmid: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Abstract")]
    pub abstract_text: String,
    #[serde(rename = "Journal")]
    pub journal: String,
    #[serde(rename = "Language")]
    pub language: String,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Month")]
    pub month: Option<String>,
    #[serde(rename = "Day")]
    pub day: Option<String>,
    #[serde(rename = "Authors")]
    pub authors: String,
    #[serde(rename = "Keywords")]
    pub keywords: String,
    #[serde(rename = "DOI")]
    pub doi: String,
}

/// Ordered rows, one per fetched record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Numeric months and a proper missing marker for absent date parts.
    ///
    /// Month abbreviations `Jan`..`Dec` become `01`..`12`; any other month
    /// value is kept as is. `No Data` in Year, Month or Day becomes `None`.
    /// Applying this twice gives the same table.
    pub fn standardize_dates(self) -> Table {
        self.rows
            .into_iter()
            .map(|row| Row {
                year: clear_no_data(row.year),
                month: clear_no_data(row.month.map(|m| match month_number(&m) {
                    Some(num) => num.to_string(),
                    None => m,
                })),
                day: clear_no_data(row.day),
                ..row
            })
            .collect()
    }
}

impl FromIterator<Row> for Table {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Two-digit month for an exact three-letter abbreviation
pub fn month_number(name: &str) -> Option<&'static str> {
    MONTHS
        .iter()
        .find(|(abbr, _)| *abbr == name)
        .map(|(_, num)| *num)
}

fn clear_no_data(cell: Option<String>) -> Option<String> {
    cell.filter(|v| v != NO_DATA)
}
