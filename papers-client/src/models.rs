use serde::{Deserialize, Serialize};

/// One author as listed on a PubMed record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    /// Display name ("ForeName LastName" when both are present)
    pub name: String,
    /// Affiliation text taken verbatim from the record; multiple
    /// affiliations are concatenated with "; "
    pub affiliation: Option<String>,
}

/// Parsed form of one `<PubmedArticle>` EFetch record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperRecord {
    /// PubMed ID
    pub pmid: String,
    /// Article title
    pub title: String,
    /// Publication date as given by the source (e.g. "2020-Sep-15")
    pub pub_date: String,
    /// Authors in record order
    pub authors: Vec<Author>,
}

/// A paper that passed the non-academic authorship filter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilteredPaper {
    /// PubMed ID
    pub pmid: String,
    /// Article title
    pub title: String,
    /// Publication date
    pub pub_date: String,
    /// Names of authors with a non-academic affiliation, in record order
    pub non_academic_authors: Vec<String>,
    /// Company names extracted from those affiliations, deduplicated
    /// in first-seen order
    pub company_affiliations: Vec<String>,
    /// First email address found in any author affiliation
    pub corresponding_email: Option<String>,
}
