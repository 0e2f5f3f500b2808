//! Client configuration for NCBI E-utilities.
//!
//! NCBI asks every caller to identify itself with `tool` and `email`
//! parameters; an API key raises the rate limit from 3 to 10 requests per
//! second. All of it lives in one [`ClientConfig`] value that is handed to
//! [`crate::entrez::EntrezClient`] once.

use crate::error::{PubmedError, Result};
use std::time::Duration;

/// E-utilities base URL
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Placeholder contact address, meant to be overridden
pub const DEFAULT_EMAIL: &str = "your.email@example.com";

/// Tool name reported to NCBI
pub const DEFAULT_TOOL: &str = "pubmed-scraper";

/// Connection settings and caller identification
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Contact address sent with every request
    pub email: String,
    /// Tool name sent with every request
    pub tool: String,
    /// Optional NCBI API key
    pub api_key: Option<String>,
    /// Base URL without trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            email: DEFAULT_EMAIL.to_string(),
            tool: DEFAULT_TOOL.to_string(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Default configuration with the given contact address
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = tool.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the identification fields before any request is made
    pub fn validate(&self) -> Result<()> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(PubmedError::Config(format!(
                "Invalid contact email: {:?}",
                self.email
            )));
        }
        if self.tool.is_empty() || self.tool.contains(char::is_whitespace) {
            return Err(PubmedError::Config(format!(
                "Tool name must be non-empty and contain no spaces: {:?}",
                self.tool
            )));
        }
        if self.base_url.is_empty() {
            return Err(PubmedError::Config("Base URL is empty".to_string()));
        }
        Ok(())
    }

    /// Identification query parameters attached to every request
    pub fn identification(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("tool", self.tool.clone()), ("email", self.email.clone())];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }
        params
    }

    /// Full URL of an E-utility endpoint, e.g. `esearch.fcgi`
    pub fn endpoint(&self, utility: &str) -> String {
        format!("{}/{}", self.base_url, utility)
    }
}
