//! Terminal front ends for run events.
//!
//! - [`ConsoleReporter`]: progress bar plus one line per notification
//! - [`JsonLinesReporter`]: one JSON object per event, for driving the tool
//!   from another program

use crate::models::{RunEvent, Severity};
use crate::pipeline::RunObserver;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use tracing::warn;

/// Human-readable progress on the terminal.
pub struct ConsoleReporter {
    bar: ProgressBar,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
        Self { bar }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RunObserver for ConsoleReporter {
    fn on_event(&mut self, event: &RunEvent) {
        match event {
            RunEvent::Started { total, session_dir } => {
                self.bar.set_position(0);
                self.bar
                    .set_message(format!("Scraping {total} URL(s) into {}", session_dir.display()));
            }
            RunEvent::Notice(notice) => {
                let tag = match notice.severity {
                    Severity::Info => "info",
                    Severity::Error => "error",
                };
                let line = match &notice.url {
                    Some(url) => format!("[{tag}] {url}: {}", notice.message),
                    None => format!("[{tag}] {}", notice.message),
                };
                self.bar.println(line);
            }
            RunEvent::Progress {
                processed,
                total,
                percent,
            } => {
                self.bar.set_position(percent.round() as u64);
                self.bar.set_message(format!("{processed}/{total}"));
            }
            RunEvent::Completed { message, .. } => {
                self.bar.finish_with_message(message.clone());
            }
        }
    }
}

/// Writes each event as a JSON line to `out`.
pub struct JsonLinesReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> RunObserver for JsonLinesReporter<W> {
    fn on_event(&mut self, event: &RunEvent) {
        let written = serde_json::to_writer(&mut self.out, event)
            .map_err(std::io::Error::from)
            .and_then(|_| writeln!(self.out))
            .and_then(|_| self.out.flush());
        if let Err(e) = written {
            warn!(error = %e, "Failed to write run event");
        }
    }
}
