//! Error taxonomy for a scraping run.
//!
//! Only [`DirectoryError`] is fatal to a run. Every other error is recovered
//! at the URL (or summary chunk) level and surfaced as a notification.

use std::path::PathBuf;
use thiserror::Error;

/// The session directory could not be created under the destination root.
#[derive(Debug, Error)]
#[error("Could not create session directory {path}")]
pub struct DirectoryError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Fetching a single URL failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL could not be parsed.
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The HTTP client could not be built.
    #[error("failed to create HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    /// Transport failure or non-success status code.
    #[error("{url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Wrap a client error; the URL is kept once, on the variant.
    pub fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        FetchError::Request {
            url: url.to_string(),
            source: source.without_url(),
        }
    }
}

/// The page had neither usable tables nor paragraphs.
#[derive(Debug, Error)]
#[error("No suitable data found on the page.")]
pub struct ExtractionEmpty;

/// Writing an output file failed.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build archive for {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("failed to encode CSV for {path}: {message}")]
    Csv { path: PathBuf, message: String },
}

/// A single summary chunk failed; the chunk is dropped from the summary.
#[derive(Debug, Error)]
#[error("summarizing chunk {index} failed: {message}")]
pub struct SummarizationChunkError {
    pub index: usize,
    pub message: String,
}
