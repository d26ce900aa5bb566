//! # papers-client
//!
//! An async Rust client for finding PubMed papers with pharmaceutical or
//! biotech (non-academic) authorship. The crate wraps the NCBI
//! E-utilities ESearch/EFetch endpoints, parses article metadata,
//! classifies author affiliations with a configurable keyword heuristic,
//! and returns only the papers with at least one non-academic author.
//!
//! ## Quick Start
//!
//! ```no_run
//! use papers_client::{Classifier, ClientConfig, Pipeline, PubMedClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new()
//!         .with_email("researcher@example.com")
//!         .with_max_results(50);
//!
//!     let pipeline = Pipeline::new(PubMedClient::with_config(config), Classifier::new());
//!     let papers = pipeline.run("cancer treatment").await?;
//!
//!     for paper in papers {
//!         println!(
//!             "{}: {} ({})",
//!             paper.pmid,
//!             paper.title,
//!             paper.company_affiliations.join("; ")
//!         );
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod classifier;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod rate_limit;

mod responses;

// Re-export main types for convenience
pub use classifier::{Classification, Classifier, IndicatorLists};
pub use client::PubMedClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use models::{Author, FilteredPaper, PaperRecord};
pub use pipeline::Pipeline;
pub use rate_limit::RateLimiter;
