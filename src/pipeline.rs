//! Run orchestration: fetch → extract → export, one URL at a time.
//!
//! A run creates its session directory, then walks the URL list strictly in
//! order. Every URL ends in exactly one notification and one progress event,
//! whether it succeeded or not; only a failure to create the session
//! directory stops the run. The front end learns about the run solely through
//! [`RunObserver`] events.

use crate::api::SummaryBackend;
use crate::error::{DirectoryError, ExportError, ExtractionEmpty};
use crate::models::{Extraction, Notification, OutputFormat, RunEvent, RunRequest, Severity};
use crate::outputs::{write_narrative, write_tables};
use crate::page::{Fetch, extract};
use crate::summarize::Summarizer;
use crate::utils::{create_session_dir, progress_percent};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};

pub const DIRECTORY_ERROR_MESSAGE: &str =
    "Could not find or create the specified path. Please check the folder path and try again.";

/// Receives run events as they happen.
pub trait RunObserver {
    fn on_event(&mut self, event: &RunEvent);
}

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub session_dir: PathBuf,
    pub total: usize,
    /// URLs that ended in an error notification.
    pub failed: usize,
}

/// Execute `request`.
///
/// # Arguments
///
/// * `request` - URLs, destination root and output format.
/// * `fetcher` - Retrieves each page body.
/// * `summarizer` - When present, narrative pages get a summary appended.
/// * `observer` - Receives every [`RunEvent`] in order.
/// * `started_at` - Names the session directory (`YYYYMMDD_HHMMSS`).
///
/// # Returns
///
/// The session directory and URL counts. Per-URL failures are reported as
/// notifications and counted in [`RunOutcome::failed`].
///
/// # Errors
///
/// [`DirectoryError`] when the session directory cannot be created, in which
/// case nothing is fetched.
#[instrument(level = "info", skip_all, fields(urls = request.urls.len(), format = %request.format, summarize = summarizer.is_some()))]
pub async fn run<F, B, O>(
    request: &RunRequest,
    fetcher: &F,
    summarizer: Option<&Summarizer<B>>,
    observer: &mut O,
    started_at: DateTime<Local>,
) -> Result<RunOutcome, DirectoryError>
where
    F: Fetch,
    B: SummaryBackend,
    O: RunObserver + ?Sized,
{
    let total = request.urls.len();

    let session_dir = match create_session_dir(&request.destination, started_at).await {
        Ok(dir) => dir,
        Err(e) => {
            error!(error = %e, path = %e.path.display(), "Cannot create session directory; aborting run");
            observer.on_event(&RunEvent::Notice(Notification::error(
                None,
                DIRECTORY_ERROR_MESSAGE,
            )));
            return Err(e);
        }
    };
    observer.on_event(&RunEvent::Started {
        total,
        session_dir: session_dir.clone(),
    });

    let mut failed = 0;
    for (i, url) in request.urls.iter().enumerate() {
        let notice = process_url(url, request.format, &session_dir, fetcher, summarizer).await;
        if notice.severity == Severity::Error {
            failed += 1;
        }
        observer.on_event(&RunEvent::Notice(notice));

        let processed = i + 1;
        observer.on_event(&RunEvent::Progress {
            processed,
            total,
            percent: progress_percent(processed, total),
        });
    }

    let message = if summarizer.is_some() {
        "Scraping and summarization completed!"
    } else {
        "Scraping completed!"
    };
    info!(total, failed, session = %session_dir.display(), "Run complete");
    observer.on_event(&RunEvent::Completed {
        total,
        failed,
        message: message.to_string(),
    });

    Ok(RunOutcome {
        session_dir,
        total,
        failed,
    })
}

/// Fetch, classify, and export a single URL.
#[instrument(level = "info", skip(format, dir, fetcher, summarizer))]
async fn process_url<F, B>(
    url: &str,
    format: OutputFormat,
    dir: &Path,
    fetcher: &F,
    summarizer: Option<&Summarizer<B>>,
) -> Notification
where
    F: Fetch,
    B: SummaryBackend,
{
    let body = match fetcher.fetch(url).await {
        Ok(body) => body,
        Err(e) => {
            error!(error = %e, "Fetch failed; skipping URL");
            return Notification::error(
                Some(url),
                format!("Failed to retrieve data from the URL: {e}"),
            );
        }
    };

    match extract(&body, format) {
        Extraction::Tables { format, tables } => match write_tables(&tables, format, dir).await {
            Ok(_) => Notification::info(Some(url), format!("Data saved in {} files.", format.label())),
            Err(e) => export_failure(url, e),
        },
        Extraction::Narrative(narrative) => {
            let summary = match summarizer {
                Some(summarizer) => Some(summarizer.summarize(&narrative.text()).await),
                None => None,
            };
            match write_narrative(&narrative, summary.as_deref(), dir).await {
                Ok(_) if summary.is_some() => Notification::info(
                    Some(url),
                    "Data and summary saved in a Word document.",
                ),
                Ok(_) => Notification::info(Some(url), "Data saved in a Word document."),
                Err(e) => export_failure(url, e),
            }
        }
        Extraction::Empty => {
            warn!("No tables or paragraphs found");
            Notification::info(Some(url), ExtractionEmpty.to_string())
        }
    }
}

fn export_failure(url: &str, e: ExportError) -> Notification {
    error!(error = %e, "Export failed; files already written are kept");
    Notification::error(Some(url), format!("Failed to save data from the URL: {e}"))
}
