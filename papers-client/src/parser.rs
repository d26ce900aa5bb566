//! Streaming parser for EFetch `<PubmedArticleSet>` responses

use std::io::BufReader;
use std::sync::OnceLock;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};
use crate::models::{Author, PaperRecord};

pub struct PubMedXmlParser;

impl PubMedXmlParser {
    /// Parse all `<PubmedArticle>` records from an EFetch XML response
    ///
    /// Records missing mandatory fields (PMID, title) are logged and
    /// skipped; the remaining records are still returned. A malformed
    /// XML document as a whole is an error.
    #[instrument(skip(xml), fields(xml_size = xml.len()))]
    pub fn parse_records_from_xml(xml: &str) -> Result<Vec<PaperRecord>> {
        let mut reader = Reader::from_reader(BufReader::new(xml.as_bytes()));
        reader.config_mut().trim_text(true);

        let mut records: Vec<PaperRecord> = Vec::new();
        let mut skipped = 0usize;

        let mut buf = Vec::new();

        // Per-article state
        let mut current = ArticleState::default();
        let mut in_article = false;
        let mut in_pmid = false;
        let mut in_article_title = false;
        let mut in_pub_date = false;
        let mut in_year = false;
        let mut in_month = false;
        let mut in_day = false;
        let mut in_medline_date = false;
        let mut in_author_list = false;
        let mut in_author = false;
        let mut in_last_name = false;
        let mut in_fore_name = false;
        let mut in_affiliation_info = false;
        let mut in_affiliation = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"PubmedArticle" => {
                        in_article = true;
                        current = ArticleState::default();
                    }
                    // The first PMID inside an article identifies it; later
                    // ones belong to references or comment corrections
                    b"PMID" if in_article && current.pmid.is_empty() => in_pmid = true,
                    b"ArticleTitle" if in_article => in_article_title = true,
                    b"PubDate" if in_article => in_pub_date = true,
                    b"Year" if in_pub_date => in_year = true,
                    b"Month" if in_pub_date => in_month = true,
                    b"Day" if in_pub_date => in_day = true,
                    b"MedlineDate" if in_pub_date => in_medline_date = true,
                    b"AuthorList" if in_article => in_author_list = true,
                    b"Author" if in_author_list => {
                        in_author = true;
                        current.author_last.clear();
                        current.author_fore.clear();
                        current.author_affiliations.clear();
                    }
                    b"LastName" if in_author => in_last_name = true,
                    b"ForeName" if in_author => in_fore_name = true,
                    b"AffiliationInfo" if in_author => {
                        in_affiliation_info = true;
                        current.affiliation_text.clear();
                    }
                    b"Affiliation" if in_affiliation_info => in_affiliation = true,
                    _ => {}
                },
                Ok(Event::End(ref e)) => match e.name().as_ref() {
                    b"PubmedArticle" => {
                        match current.build() {
                            Ok(record) => records.push(record),
                            Err(e) => {
                                warn!(error = %e, "Skipping malformed record");
                                skipped += 1;
                            }
                        }
                        in_article = false;
                    }
                    b"PMID" => in_pmid = false,
                    b"ArticleTitle" => in_article_title = false,
                    b"PubDate" => in_pub_date = false,
                    b"Year" => in_year = false,
                    b"Month" => in_month = false,
                    b"Day" => in_day = false,
                    b"MedlineDate" => in_medline_date = false,
                    b"AuthorList" => in_author_list = false,
                    b"Author" => {
                        if in_author {
                            current.finish_author();
                            in_author = false;
                        }
                    }
                    b"LastName" => in_last_name = false,
                    b"ForeName" => in_fore_name = false,
                    b"AffiliationInfo" => {
                        if in_affiliation_info {
                            current.finish_affiliation();
                            in_affiliation_info = false;
                        }
                    }
                    b"Affiliation" => in_affiliation = false,
                    _ => {}
                },
                Ok(Event::Text(e)) => {
                    let text = e
                        .unescape()
                        .map_err(|e| Error::Parse {
                            message: format!("failed to decode XML text: {}", e),
                        })?
                        .into_owned();

                    if in_pmid {
                        current.pmid = text;
                    } else if in_article_title {
                        // Titles with inline markup arrive as several text events
                        if current.title.is_empty() {
                            current.title = text;
                        } else {
                            current.title.push(' ');
                            current.title.push_str(&text);
                        }
                    } else if in_year {
                        current.year = text;
                    } else if in_month {
                        current.month = text;
                    } else if in_day {
                        current.day = text;
                    } else if in_medline_date {
                        current.medline_date = text;
                    } else if in_last_name && in_author {
                        current.author_last = text;
                    } else if in_fore_name && in_author {
                        current.author_fore = text;
                    } else if in_affiliation && in_affiliation_info {
                        // Affiliations can carry inline markup too
                        if current.affiliation_text.is_empty() {
                            current.affiliation_text = text;
                        } else {
                            current.affiliation_text.push(' ');
                            current.affiliation_text.push_str(&text);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Parse {
                        message: format!("XML parsing error: {}", e),
                    });
                }
                _ => {}
            }
            buf.clear();
        }

        debug!(
            parsed = records.len(),
            skipped, "Completed EFetch XML parsing"
        );

        Ok(records)
    }
}

/// Accumulated state for the article currently being parsed
#[derive(Default)]
struct ArticleState {
    pmid: String,
    title: String,
    year: String,
    month: String,
    day: String,
    medline_date: String,
    authors: Vec<Author>,
    author_last: String,
    author_fore: String,
    author_affiliations: Vec<String>,
    affiliation_text: String,
}

impl ArticleState {
    fn finish_affiliation(&mut self) {
        if !self.affiliation_text.is_empty() {
            self.author_affiliations.push(self.affiliation_text.clone());
        }
    }

    fn finish_author(&mut self) {
        let name = format_author_name(&self.author_fore, &self.author_last);
        if name.is_empty() {
            return;
        }
        let affiliation = if self.author_affiliations.is_empty() {
            None
        } else {
            Some(self.author_affiliations.join("; "))
        };
        self.authors.push(Author { name, affiliation });
    }

    fn build(&mut self) -> Result<PaperRecord> {
        if self.pmid.is_empty() {
            return Err(Error::Parse {
                message: "record has no PMID".to_string(),
            });
        }
        if self.title.is_empty() {
            return Err(Error::Parse {
                message: format!("record {} has no title", self.pmid),
            });
        }

        Ok(PaperRecord {
            pmid: std::mem::take(&mut self.pmid),
            title: std::mem::take(&mut self.title),
            pub_date: self.format_pub_date(),
            authors: std::mem::take(&mut self.authors),
        })
    }

    fn format_pub_date(&self) -> String {
        // Some records carry a free-form MedlineDate instead of
        // Year/Month/Day components
        if !self.medline_date.is_empty() {
            return self.medline_date.clone();
        }
        [&self.year, &self.month, &self.day]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// Format an author name from ForeName/LastName components
fn format_author_name(fore_name: &str, last_name: &str) -> String {
    match (fore_name.is_empty(), last_name.is_empty()) {
        (false, false) => format!("{} {}", fore_name, last_name),
        (true, false) => last_name.to_string(),
        (false, true) => fore_name.to_string(),
        (true, true) => String::new(),
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

/// Extract the first email address from affiliation text
pub fn extract_email_from_text(text: &str) -> Option<String> {
    let re = EMAIL_RE.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
            .expect("email regex is valid")
    });
    re.find(text).map(|m| m.as_str().to_string())
}
