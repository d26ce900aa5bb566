//! Client configuration for NCBI E-utilities requests
//!
//! NCBI asks API consumers to identify themselves (`tool`, `email`) and
//! enforces different rate limits depending on whether an API key is
//! provided (3 requests/second without, 10 with).

use std::time::Duration;

use crate::rate_limit::RateLimiter;

const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
const DEFAULT_TOOL: &str = "get-papers-list";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default ESearch page size (retmax)
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Configuration for [`PubMedClient`](crate::PubMedClient)
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Option<String>,
    api_key: Option<String>,
    email: Option<String>,
    tool: Option<String>,
    rate_limit: Option<f64>,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Maximum number of PMIDs to retrieve per search
    pub max_results: usize,
}

impl ClientConfig {
    /// Create a configuration with NCBI defaults (no API key, 3 req/sec)
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            email: None,
            tool: None,
            rate_limit: None,
            timeout: DEFAULT_TIMEOUT,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Set an NCBI API key (raises the default rate limit to 10 req/sec)
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the contact email sent with every request (recommended by NCBI)
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the tool name sent with every request
    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self
    }

    /// Override the E-utilities base URL (used by tests to point at a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Override the request rate limit (requests per second)
    pub fn with_rate_limit(mut self, requests_per_second: f64) -> Self {
        self.rate_limit = Some(requests_per_second);
        self
    }

    /// Set the HTTP request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of search results (ESearch retmax)
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Effective base URL (custom or NCBI default)
    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Effective tool name
    pub fn effective_tool(&self) -> &str {
        self.tool.as_deref().unwrap_or(DEFAULT_TOOL)
    }

    /// Effective user agent string
    pub fn effective_user_agent(&self) -> String {
        format!(
            "{}/{} ({})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            self.effective_tool()
        )
    }

    /// Effective rate limit in requests per second
    ///
    /// A custom limit always wins; otherwise the NCBI default for the
    /// key/no-key case applies.
    pub fn effective_rate_limit(&self) -> f64 {
        if let Some(rate) = self.rate_limit {
            rate
        } else if self.api_key.is_some() {
            10.0
        } else {
            3.0
        }
    }

    /// Create a rate limiter matching this configuration
    pub fn create_rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(self.effective_rate_limit())
    }

    /// Build the identification parameters appended to every request URL
    pub fn build_api_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if let Some(api_key) = &self.api_key {
            params.push(("api_key".to_string(), api_key.clone()));
        }
        if let Some(email) = &self.email {
            params.push(("email".to_string(), email.clone()));
        }
        if let Some(tool) = &self.tool {
            params.push(("tool".to_string(), tool.clone()));
        }

        params
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
