use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use papers_client::{Classifier, ClientConfig, Error, IndicatorLists, Pipeline, PubMedClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod output;

#[derive(Parser, Debug)]
#[command(
    name = "get-papers-list",
    about = "List PubMed papers with pharmaceutical/biotech-affiliated authors",
    long_about = "Searches PubMed for a query, classifies each author affiliation as \
academic or pharma/biotech, and emits papers with at least one non-academic author as CSV."
)]
struct Cli {
    /// PubMed search query
    #[arg(value_name = "QUERY")]
    query: String,

    /// Write CSV results to a file instead of stdout
    #[arg(short = 'f', long)]
    output: Option<PathBuf>,

    /// Enable verbose logging to stderr
    #[arg(short, long)]
    debug: bool,

    /// Maximum number of search results to retrieve
    #[arg(short, long, default_value_t = 100)]
    max_results: usize,

    /// JSON file with custom indicator lists ({"academic": [...], "industry": [...]})
    #[arg(long, value_name = "PATH")]
    indicators: Option<PathBuf>,

    /// API key for NCBI E-utilities (increases rate limit)
    #[arg(long, env = "NCBI_API_KEY")]
    api_key: Option<String>,

    /// Email for NCBI requests (recommended)
    #[arg(long, env = "NCBI_EMAIL")]
    email: Option<String>,

    /// Tool name for NCBI requests
    #[arg(long, env = "NCBI_TOOL", default_value = "get-papers-list")]
    tool: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

async fn run(cli: &Cli) -> papers_client::Result<()> {
    let pipeline = build_pipeline(cli)?;
    execute(cli, &pipeline).await
}

fn build_pipeline(cli: &Cli) -> papers_client::Result<Pipeline> {
    let mut config = ClientConfig::new()
        .with_tool(cli.tool.as_str())
        .with_max_results(cli.max_results);
    if let Some(api_key) = &cli.api_key {
        config = config.with_api_key(api_key);
    }
    if let Some(email) = &cli.email {
        config = config.with_email(email);
    }

    let classifier = match &cli.indicators {
        Some(path) => Classifier::with_lists(IndicatorLists::from_json_file(path)?),
        None => Classifier::new(),
    };

    Ok(Pipeline::new(PubMedClient::with_config(config), classifier))
}

async fn execute(cli: &Cli, pipeline: &Pipeline) -> papers_client::Result<()> {
    let papers = pipeline.run(&cli.query).await?;

    match &cli.output {
        Some(path) => {
            output::write_csv_file(path, &papers)?;
            info!(path = %path.display(), papers = papers.len(), "Results saved");
        }
        None => output::write_csv_stdout(&papers)?,
    }

    Ok(())
}

/// Exit codes: 1 for fetch/output failures, 2 for bad input (clap uses 2
/// for usage errors as well)
fn exit_code_for(error: &Error) -> u8 {
    match error {
        Error::InvalidQuery { .. } | Error::Config { .. } => 2,
        _ => 1,
    }
}
