//! Chunked extractive summaries of narrative text.
//!
//! Text is cut into fixed-width character chunks with no regard for sentence
//! or token boundaries. Each chunk is summarized on its own; failed chunks are
//! logged and left out, and the surviving summaries are joined with a single
//! space in chunk order.

use crate::api::{LengthBounds, SummaryBackend};
use crate::error::SummarizationChunkError;
use crate::models::SummaryOptions;
use crate::utils::truncate_for_log;
use itertools::Itertools;
use tracing::{debug, info, instrument, warn};

/// Split `text` into chunks of at most `width` characters. A width of zero
/// is treated as one.
pub fn chunk_text(text: &str, width: usize) -> Vec<String> {
    text.chars()
        .chunks(width.max(1))
        .into_iter()
        .map(|chunk| chunk.collect::<String>())
        .collect()
}

/// Summarizes narrative text through a [`SummaryBackend`].
#[derive(Debug)]
pub struct Summarizer<B> {
    backend: B,
    options: SummaryOptions,
}

impl<B: SummaryBackend> Summarizer<B> {
    pub fn new(backend: B, options: SummaryOptions) -> Self {
        Self { backend, options }
    }

    pub fn options(&self) -> SummaryOptions {
        self.options
    }

    /// Summarize `text` chunk by chunk.
    ///
    /// Each chunk of [`SummaryOptions::chunk_width`] characters is sent to the
    /// backend once. Chunks whose call fails are logged and left out.
    ///
    /// # Arguments
    ///
    /// * `text` - The page's paragraphs joined by single spaces.
    ///
    /// # Returns
    ///
    /// The surviving chunk summaries in chunk order, joined by a space. Never
    /// fails: an empty string means no chunk produced a summary.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let summarizer = Summarizer::new(backend, SummaryOptions::default());
    /// let summary = summarizer.summarize(&narrative.text()).await;
    /// ```
    #[instrument(level = "info", skip_all, fields(chars = text.chars().count(), width = self.options.chunk_width))]
    pub async fn summarize(&self, text: &str) -> String {
        let bounds = LengthBounds {
            max: self.options.max_length,
            min: self.options.min_length,
        };
        let chunks = chunk_text(text, self.options.chunk_width);
        let total = chunks.len();
        let mut summaries = Vec::with_capacity(total);

        for (index, chunk) in chunks.iter().enumerate() {
            debug!(index, chars = chunk.chars().count(), "Summarizing chunk");
            match self.backend.summarize(chunk, bounds).await {
                Ok(summary) => summaries.push(summary),
                Err(e) => {
                    let err = SummarizationChunkError {
                        index,
                        message: e.to_string(),
                    };
                    warn!(
                        error = %err,
                        chunk_preview = %truncate_for_log(chunk, 80),
                        "Dropping chunk from summary"
                    );
                }
            }
        }

        info!(
            chunks = total,
            summarized = summaries.len(),
            failed = total - summaries.len(),
            "Summary complete"
        );
        summaries.join(" ")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::error::Error;

    /// Backend that echoes a marker per chunk and fails on chosen indices.
    #[derive(Debug, Default)]
    pub(crate) struct ScriptedBackend {
        pub fail_on: Vec<usize>,
        pub calls: RefCell<Vec<String>>,
    }

    impl SummaryBackend for ScriptedBackend {
        async fn summarize(
            &self,
            chunk: &str,
            bounds: LengthBounds,
        ) -> Result<String, Box<dyn Error>> {
            let index = self.calls.borrow().len();
            self.calls.borrow_mut().push(chunk.to_string());
            if self.fail_on.contains(&index) {
                return Err(format!("chunk {index} rejected").into());
            }
            Ok(format!("s{}({}-{})", index + 1, bounds.min, bounds.max))
        }
    }

    fn options(width: usize) -> SummaryOptions {
        SummaryOptions {
            max_length: 20,
            min_length: 5,
            chunk_width: width,
        }
    }

    #[test]
    fn test_chunk_text_fixed_width() {
        assert_eq!(chunk_text("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(chunk_text("abc", 10), vec!["abc"]);
        assert!(chunk_text("", 10).is_empty());
    }

    #[test]
    fn test_chunk_text_counts_characters_not_bytes() {
        assert_eq!(chunk_text("héllo", 2), vec!["hé", "ll", "o"]);
    }

    #[test]
    fn test_chunk_text_zero_width() {
        assert_eq!(chunk_text("ab", 0), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_short_text_is_one_chunk() {
        let summarizer = Summarizer::new(ScriptedBackend::default(), options(1024));
        let summary = summarizer.summarize("A short narrative.").await;
        assert_eq!(summary, "s1(5-20)");
        assert_eq!(summarizer.backend.calls.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_chunk_is_omitted() {
        let backend = ScriptedBackend {
            fail_on: vec![1],
            ..Default::default()
        };
        let summarizer = Summarizer::new(backend, options(4));
        let summary = summarizer.summarize("aaaabbbbcccc").await;

        assert_eq!(summary, "s1(5-20) s3(5-20)");
        assert_eq!(
            *summarizer.backend.calls.borrow(),
            vec!["aaaa", "bbbb", "cccc"]
        );
    }

    #[tokio::test]
    async fn test_all_chunks_failing_gives_empty_summary() {
        let backend = ScriptedBackend {
            fail_on: vec![0, 1],
            ..Default::default()
        };
        let summarizer = Summarizer::new(backend, options(2));
        assert_eq!(summarizer.summarize("abcd").await, "");
    }
}
