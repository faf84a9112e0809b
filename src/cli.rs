//! Command-line interface definitions.
//!
//! The command line stands in for the interactive form: it collects the URL
//! list, the destination root, and the output format, plus the settings of
//! the optional summary step.

use crate::models::{OutputFormat, RunRequest, SummaryOptions};
use crate::page::fetch::DEFAULT_TIMEOUT;
use crate::utils::{clean_destination, parse_url_list};
use clap::Parser;
use std::error::Error;
use std::io::Read;
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Tables from two pages as Excel workbooks
/// web_scrape_export -u https://example.com/a -u https://example.com/b -o ~/Desktop
///
/// # URLs from a file, paragraph text with a summary
/// web_scrape_export -i urls.txt -o "/data/out" -f Word --summarize
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// URL to scrape (repeatable)
    #[arg(short, long = "url")]
    pub urls: Vec<String>,

    /// File with one URL per line, or `-` for stdin
    #[arg(short = 'i', long)]
    pub urls_file: Option<PathBuf>,

    /// Destination root for the `web scrapped files` folder
    #[arg(short, long)]
    pub output_dir: String,

    /// Output file format
    #[arg(short, long, value_enum, ignore_case = true, default_value = "Excel")]
    pub format: OutputFormat,

    /// Append an LLM summary to documents written from paragraph text
    #[arg(long)]
    pub summarize: bool,

    /// Path to the summarization backend's config.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Chat template used for summaries
    #[arg(long, default_value = "summarizer")]
    pub template: String,

    /// Upper summary length bound per chunk, in words
    #[arg(long, default_value_t = SummaryOptions::default().max_length)]
    pub summary_max_length: usize,

    /// Lower summary length bound per chunk, in words
    #[arg(long, default_value_t = SummaryOptions::default().min_length)]
    pub summary_min_length: usize,

    /// Characters per summarization chunk
    #[arg(long, default_value_t = SummaryOptions::default().chunk_width as u64, value_parser = clap::value_parser!(u64).range(1..))]
    pub chunk_width: u64,

    /// Seconds to wait for each page before giving up on it
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs(), value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Print run events as JSON lines instead of a progress bar
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Collect URLs from `--url` flags first, then from `--urls-file`.
    pub fn collect_urls(&self) -> Result<Vec<String>, Box<dyn Error>> {
        let mut urls: Vec<String> = self
            .urls
            .iter()
            .flat_map(|u| parse_url_list(u))
            .collect();

        if let Some(path) = &self.urls_file {
            let text = if path.as_os_str() == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                std::fs::read_to_string(path)?
            };
            urls.extend(parse_url_list(&text));
        }
        Ok(urls)
    }

    /// Validate the arguments and capture them as an immutable request.
    pub fn run_request(&self) -> Result<RunRequest, Box<dyn Error>> {
        let urls = self.collect_urls()?;
        let destination = clean_destination(&self.output_dir);
        if urls.is_empty() || destination.as_os_str().is_empty() {
            return Err("Please provide both URLs and a storage path.".into());
        }
        Ok(RunRequest {
            urls,
            destination,
            format: self.format,
        })
    }

    /// Summary settings when `--summarize` is set.
    pub fn summary_options(&self) -> Result<Option<SummaryOptions>, Box<dyn Error>> {
        if !self.summarize {
            return Ok(None);
        }
        if self.summary_min_length > self.summary_max_length {
            return Err(format!(
                "--summary-min-length ({}) must not exceed --summary-max-length ({})",
                self.summary_min_length, self.summary_max_length
            )
            .into());
        }
        Ok(Some(SummaryOptions {
            max_length: self.summary_max_length,
            min_length: self.summary_min_length,
            chunk_width: usize::try_from(self.chunk_width)?,
        }))
    }
}
