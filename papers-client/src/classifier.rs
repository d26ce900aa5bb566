//! Affiliation classification: academic vs. pharma/biotech
//!
//! The classifier decides, for one affiliation string, whether it names
//! a commercial (pharmaceutical/biotech) entity rather than a
//! university, hospital, or research institute. The decision is an
//! ordered keyword heuristic that favors precision over recall for the
//! non-academic label: any academic indicator wins, so strings naming
//! both a company and a university classify as academic.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Substrings identifying academic institutions
const ACADEMIC_INDICATORS: &[&str] = &[
    "university",
    "college",
    "institute",
    "school",
    "hospital",
    "department",
    "dept",
    "center",
    "centre",
    "academy",
];

/// Substrings identifying commercial entities
const INDUSTRY_INDICATORS: &[&str] = &[
    "pharma",
    "biotech",
    "therapeutics",
    "laboratories",
    "solutions",
    "inc",
    "ltd",
    "llc",
    "gmbh",
    "corp",
    "co",
];

/// Result of classifying a single affiliation string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// True when the affiliation names a commercial entity
    pub is_non_academic: bool,
    /// Extracted company name, set only for non-academic affiliations
    pub company_name: Option<String>,
}

impl Classification {
    fn academic() -> Self {
        Self {
            is_non_academic: false,
            company_name: None,
        }
    }
}

/// Indicator keyword lists, kept as data so they can be refined without
/// code changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorLists {
    /// Keywords marking academic institutions
    pub academic: Vec<String>,
    /// Keywords marking commercial entities
    pub industry: Vec<String>,
}

impl IndicatorLists {
    /// Load indicator lists from a JSON file of the form
    /// `{"academic": [...], "industry": [...]}`
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("cannot read indicator file {}: {}", path.display(), e),
        })?;
        serde_json::from_str(&text).map_err(|e| Error::Config {
            message: format!("invalid indicator file {}: {}", path.display(), e),
        })
    }
}

impl Default for IndicatorLists {
    fn default() -> Self {
        Self {
            academic: ACADEMIC_INDICATORS.iter().map(|s| s.to_string()).collect(),
            industry: INDUSTRY_INDICATORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Classifies affiliation strings using configurable indicator lists
#[derive(Debug, Clone)]
pub struct Classifier {
    lists: IndicatorLists,
}

impl Classifier {
    /// Classifier with the built-in indicator lists
    pub fn new() -> Self {
        Self::with_lists(IndicatorLists::default())
    }

    /// Classifier with custom indicator lists
    pub fn with_lists(lists: IndicatorLists) -> Self {
        Self { lists }
    }

    /// Classify one affiliation string
    ///
    /// Ordered rules, first match wins:
    /// 1. empty text → academic (no evidence of industry affiliation)
    /// 2. any academic indicator → academic
    /// 3. otherwise → non-academic, with a company name extracted from
    ///    the text (an industry indicator confirms the match but its
    ///    absence does not rescue a string no academic indicator claimed)
    pub fn classify(&self, affiliation: &str) -> Classification {
        let tokens = normalize(affiliation);
        if tokens.is_empty() {
            return Classification::academic();
        }

        if self.matches_any(&tokens, &self.lists.academic) {
            return Classification::academic();
        }

        if self.matches_any(&tokens, &self.lists.industry) {
            debug!(affiliation, "Industry indicator matched");
        } else {
            debug!(affiliation, "No indicator matched, defaulting to non-academic");
        }

        Classification {
            is_non_academic: true,
            company_name: Some(extract_company_name(affiliation)),
        }
    }

    fn matches_any(&self, tokens: &[String], indicators: &[String]) -> bool {
        let joined = tokens.join(" ");
        indicators.iter().any(|indicator| {
            let indicator_tokens = normalize(indicator);
            match indicator_tokens.as_slice() {
                [] => false,
                // Short corporate suffixes ("co", "inc", "ltd") must match a
                // whole token or they would fire inside ordinary words
                [single] if single.len() <= 3 => tokens.iter().any(|token| token == single),
                [single] => tokens.iter().any(|token| token.starts_with(single.as_str())),
                // Multi-word indicators ("school of medicine") match the
                // normalized text as a phrase
                _ => joined.contains(&indicator_tokens.join(" ")),
            }
        })
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercase the text and split it into alphanumeric tokens
fn normalize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Extract a company name: the longest run of capitalized tokens before
/// the first comma, falling back to the full affiliation string
fn extract_company_name(affiliation: &str) -> String {
    let head = affiliation.split(',').next().unwrap_or(affiliation).trim();

    let mut best: Vec<&str> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for token in head.split_whitespace() {
        if token.chars().next().is_some_and(|c| c.is_uppercase()) {
            current.push(token);
            if current.len() > best.len() {
                best = current.clone();
            }
        } else {
            current.clear();
        }
    }

    if best.is_empty() {
        affiliation.trim().to_string()
    } else {
        best.join(" ")
    }
}
