//! Custom error types for pubmed-scraper.
//!
//! This module defines all error types used throughout the library.
//! All fallible functions return `Result<T, PubmedError>` instead of using `unwrap()`.

use thiserror::Error;

/// Main error type for pubmed-scraper operations.
///
/// Uses `thiserror` for ergonomic error handling and automatic `Display` implementation.
#[derive(Debug, Error)]
pub enum PubmedError {
    /// Network/HTTP transport error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// E-utilities returned a non-success status or an `<ERROR>` element
    #[error("API error: {code} - {message}")]
    Api {
        /// HTTP status code (0 when the error came from the response body)
        code: i32,
        /// Error message from the service
        message: String,
    },

    /// Malformed or unexpected XML
    #[error("Parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias using `PubmedError`
pub type Result<T> = std::result::Result<T, PubmedError>;

/// Extension trait for adding context to Option types
pub trait OptionExt<T> {
    /// Convert Option to Result with a parse error message
    fn ok_or_parse(self, msg: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_parse(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| PubmedError::Parse(msg.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_or_parse() {
        let present: Option<u8> = Some(1);
        assert_eq!(present.ok_or_parse("missing").ok(), Some(1));

        let absent: Option<u8> = None;
        match absent.ok_or_parse("missing IdList") {
            Err(PubmedError::Parse(msg)) => assert_eq!(msg, "missing IdList"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
