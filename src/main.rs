//! # Web Scrape Export
//!
//! Fetches web pages, pulls out either their tables or their paragraph text,
//! and writes the result to Excel, CSV, or Word files, optionally appending an
//! LLM-generated summary to the Word output.
//!
//! ## Usage
//!
//! ```sh
//! web_scrape_export -u https://example.com/stats -o ~/Desktop -f CSV
//! ```
//!
//! ## Architecture
//!
//! Each run follows a sequential pipeline, one URL at a time:
//! 1. **Session**: create `<root>/web scrapped files/<YYYYMMDD_HHMMSS>/`
//! 2. **Fetching**: one HTTP GET per URL
//! 3. **Extraction**: tables when the format supports them, otherwise paragraphs
//! 4. **Summary** (optional): chunked summaries of the paragraph text
//! 5. **Output**: `table_data_<n>.xlsx|csv` or `text_data[_with_summary].docx`

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod error;
mod models;
mod outputs;
mod page;
mod pipeline;
mod report;
mod summarize;
mod utils;

use api::AskFnWrapper;
use cli::Cli;
use page::HttpFetcher;
use pipeline::RunObserver;
use report::{ConsoleReporter, JsonLinesReporter};
use summarize::Summarizer;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("web_scrape_export starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let request = args.run_request().inspect_err(|e| error!(error = %e, "Invalid input"))?;
    let summary_options = args.summary_options()?;

    let fetcher = HttpFetcher::new(Duration::from_secs(args.timeout_secs))?;

    // ---- Summarization backend (optional) ----
    let summarizer = match summary_options {
        Some(options) => {
            let backend = AskFnWrapper::load(args.config.as_deref(), &args.template)
                .await
                .inspect_err(|e| error!(error = %e, "Failed to load summarization backend"))?;
            let summarizer = Summarizer::new(backend, options);
            info!(options = ?summarizer.options(), "Summaries enabled");
            Some(summarizer)
        }
        None => None,
    };

    let mut observer: Box<dyn RunObserver> = if args.json {
        Box::new(JsonLinesReporter::new(std::io::stdout()))
    } else {
        Box::new(ConsoleReporter::new())
    };

    let outcome = pipeline::run(
        &request,
        &fetcher,
        summarizer.as_ref(),
        observer.as_mut(),
        Local::now(),
    )
    .await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        session = %outcome.session_dir.display(),
        total = outcome.total,
        failed = outcome.failed,
        "Execution complete"
    );

    Ok(())
}
