//! Pipeline orchestrator: search → fetch → parse → classify → collect
//!
//! Failure semantics: a search or fetch failure aborts the run with no
//! output; a single malformed record is skipped by the parser and the
//! run continues.

use tracing::{debug, info, instrument};

use crate::classifier::Classifier;
use crate::client::PubMedClient;
use crate::error::{Error, Result};
use crate::models::{FilteredPaper, PaperRecord};
use crate::parser::extract_email_from_text;

/// Runs the full search-and-filter pipeline for one query
pub struct Pipeline {
    client: PubMedClient,
    classifier: Classifier,
}

impl Pipeline {
    pub fn new(client: PubMedClient, classifier: Classifier) -> Self {
        Self { client, classifier }
    }

    /// Search PubMed for `query` and return the papers with at least one
    /// pharma/biotech-affiliated author
    #[instrument(skip(self), fields(query = %query))]
    pub async fn run(&self, query: &str) -> Result<Vec<FilteredPaper>> {
        if query.trim().is_empty() {
            return Err(Error::InvalidQuery {
                message: "query must not be empty".to_string(),
            });
        }

        let pmids = self.client.search_papers(query).await?;
        if pmids.is_empty() {
            info!("No papers matched the query");
            return Ok(Vec::new());
        }

        let records = self.client.fetch_papers(&pmids).await?;

        let papers: Vec<FilteredPaper> = records
            .into_iter()
            .filter_map(|record| self.filter_record(record))
            .collect();

        info!(qualifying = papers.len(), "Pipeline completed");

        Ok(papers)
    }

    /// Classify every author of a record; keep the paper iff at least one
    /// author has a non-academic affiliation
    pub(crate) fn filter_record(&self, record: PaperRecord) -> Option<FilteredPaper> {
        let mut non_academic_authors = Vec::new();
        let mut company_affiliations: Vec<String> = Vec::new();
        let mut corresponding_email = None;

        for author in &record.authors {
            let Some(affiliation) = author.affiliation.as_deref() else {
                continue;
            };

            // The first email anywhere in the author list stands in for
            // the corresponding author's address
            if corresponding_email.is_none() {
                corresponding_email = extract_email_from_text(affiliation);
            }

            let classification = self.classifier.classify(affiliation);
            if classification.is_non_academic {
                non_academic_authors.push(author.name.clone());
                if let Some(company) = classification.company_name {
                    if !company_affiliations.contains(&company) {
                        company_affiliations.push(company);
                    }
                }
            }
        }

        if non_academic_authors.is_empty() {
            debug!(pmid = %record.pmid, "All authors academic, dropping paper");
            return None;
        }

        Some(FilteredPaper {
            pmid: record.pmid,
            title: record.title,
            pub_date: record.pub_date,
            non_academic_authors,
            company_affiliations,
            corresponding_email,
        })
    }
}
