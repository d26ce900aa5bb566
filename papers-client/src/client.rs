//! HTTP client for the NCBI E-utilities search and fetch endpoints

use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::models::PaperRecord;
use crate::parser::PubMedXmlParser;
use crate::rate_limit::RateLimiter;
use crate::responses::ESearchResult;

/// EFetch accepts long ID lists; 200 per request keeps URLs well under
/// the E-utilities GET limit
const EFETCH_BATCH_SIZE: usize = 200;

/// Client for the PubMed ESearch and EFetch endpoints
#[derive(Clone)]
pub struct PubMedClient {
    client: Client,
    base_url: String,
    rate_limiter: RateLimiter,
    config: ClientConfig,
}

impl PubMedClient {
    /// Create a client with default configuration (no API key, 3 req/sec)
    pub fn new() -> Self {
        Self::with_config(ClientConfig::new())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ClientConfig) -> Self {
        let rate_limiter = config.create_rate_limiter();
        let base_url = config.effective_base_url().to_string();

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.effective_user_agent())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            rate_limiter,
            config,
        }
    }

    /// Search PubMed and return the PMIDs of matching articles
    ///
    /// Result count is bounded by the configured `max_results` (ESearch
    /// retmax).
    #[instrument(skip(self), fields(query = %query))]
    pub async fn search_papers(&self, query: &str) -> Result<Vec<String>> {
        if query.trim().is_empty() {
            debug!("Empty query provided, returning empty results");
            return Ok(Vec::new());
        }

        self.rate_limiter.acquire().await;

        let mut url = format!(
            "{}/esearch.fcgi?db=pubmed&term={}&retmax={}&retmode=json",
            self.base_url,
            urlencoding::encode(query),
            self.config.max_results
        );
        self.append_api_params(&mut url);

        debug!("Making ESearch API request");
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Search API request failed with status: {}", status);
            return Err(Error::Api {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown error").to_string(),
            });
        }

        let body = response.text().await?;
        let search_result: ESearchResult = serde_json::from_str(&body)?;
        let pmids = search_result.esearchresult.idlist;

        info!(results_found = pmids.len(), "Search completed");

        Ok(pmids)
    }

    /// Fetch full metadata records for the given PMIDs
    ///
    /// IDs are fetched in batches; records that fail to parse are skipped
    /// by the parser, while any HTTP failure aborts the whole fetch.
    #[instrument(skip(self, pmids), fields(id_count = pmids.len()))]
    pub async fn fetch_papers(&self, pmids: &[String]) -> Result<Vec<PaperRecord>> {
        if pmids.is_empty() {
            return Ok(Vec::new());
        }

        for pmid in pmids {
            if pmid.trim().is_empty() || !pmid.chars().all(|c| c.is_ascii_digit()) {
                warn!(pmid = %pmid, "Invalid PMID format provided");
                return Err(Error::InvalidPmid { pmid: pmid.clone() });
            }
        }

        let mut records = Vec::new();
        for chunk in pmids.chunks(EFETCH_BATCH_SIZE) {
            records.extend(self.fetch_batch(chunk).await?);
        }

        info!(records_fetched = records.len(), "Fetch completed");

        Ok(records)
    }

    async fn fetch_batch(&self, pmids: &[String]) -> Result<Vec<PaperRecord>> {
        self.rate_limiter.acquire().await;

        let mut url = format!(
            "{}/efetch.fcgi?db=pubmed&id={}&retmode=xml",
            self.base_url,
            pmids.join(",")
        );
        self.append_api_params(&mut url);

        debug!(batch_size = pmids.len(), "Making EFetch API request");
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Fetch API request failed with status: {}", status);
            return Err(Error::Api {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown error").to_string(),
            });
        }

        let xml_text = response.text().await?;
        PubMedXmlParser::parse_records_from_xml(&xml_text)
    }

    fn append_api_params(&self, url: &mut String) {
        for (key, value) in self.config.build_api_params() {
            url.push('&');
            url.push_str(&key);
            url.push('=');
            url.push_str(&urlencoding::encode(&value));
        }
    }
}

impl Default for PubMedClient {
    fn default() -> Self {
        Self::new()
    }
}
