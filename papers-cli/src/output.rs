//! CSV rendering for filtered papers
//!
//! Column order is fixed; list columns are semicolon-joined and a
//! missing corresponding email is written as "N/A".

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use papers_client::{Error, FilteredPaper, Result};

const CSV_HEADER: [&str; 6] = [
    "PubmedID",
    "Title",
    "PublicationDate",
    "NonAcademicAuthors",
    "CompanyAffiliations",
    "CorrespondingAuthorEmail",
];

/// Write papers as CSV to any writer, header first
pub fn write_csv<W: Write>(writer: W, papers: &[FilteredPaper]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(CSV_HEADER).map_err(output_error)?;

    for paper in papers {
        let authors = paper.non_academic_authors.join("; ");
        let companies = paper.company_affiliations.join("; ");
        let email = paper.corresponding_email.as_deref().unwrap_or("N/A");

        csv_writer
            .write_record([
                paper.pmid.as_str(),
                paper.title.as_str(),
                paper.pub_date.as_str(),
                authors.as_str(),
                companies.as_str(),
                email,
            ])
            .map_err(output_error)?;
    }

    csv_writer.flush().map_err(|e| Error::Output {
        message: e.to_string(),
    })?;

    Ok(())
}

/// Write papers as a CSV file at `path`
///
/// The file is only created here, after the pipeline has already
/// succeeded, so a fetch failure never leaves a partial CSV behind.
pub fn write_csv_file(path: &Path, papers: &[FilteredPaper]) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::Output {
        message: format!("cannot write {}: {}", path.display(), e),
    })?;
    write_csv(file, papers)
}

/// Print papers as CSV to stdout
pub fn write_csv_stdout(papers: &[FilteredPaper]) -> Result<()> {
    let stdout = io::stdout();
    write_csv(stdout.lock(), papers)
}

fn output_error(e: csv::Error) -> Error {
    Error::Output {
        message: e.to_string(),
    }
}
