//! Summarization backend interaction.
//!
//! The summary step talks to an OpenAI-compatible LLM through `awful_aj`.
//! The backend sits behind the [`SummaryBackend`] trait so the chunking and
//! partial-failure logic in [`crate::summarize`] does not depend on a live
//! model.
//!
//! Calls are made exactly once: a failed chunk is reported to the caller,
//! which drops it from the summary.

use awful_aj::api::ask;
use awful_aj::{config, config_dir, config::AwfulJadeConfig, template, template::ChatTemplate};
use std::error::Error;
use std::path::Path;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Target length bounds for one chunk's summary, in words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    pub max: usize,
    pub min: usize,
}

/// Something that condenses one chunk of text.
pub trait SummaryBackend {
    async fn summarize(&self, chunk: &str, bounds: LengthBounds) -> Result<String, Box<dyn Error>>;
}

/// Instruction sent ahead of each chunk.
pub fn summary_prompt(chunk: &str, bounds: LengthBounds) -> String {
    format!(
        "Summarize the following text in at least {} and at most {} words. Reply with the summary only.\n\n{}",
        bounds.min, bounds.max, chunk
    )
}

/// [`SummaryBackend`] backed by `awful_aj::api::ask`.
#[derive(Debug)]
pub struct AskFnWrapper {
    /// LLM configuration (API keys, endpoints, model settings).
    pub config: AwfulJadeConfig,
    /// Chat template holding the system prompt for summarization.
    pub template: ChatTemplate,
}

impl AskFnWrapper {
    /// Load the backend config and the named chat template.
    ///
    /// Without `config_path`, `config.yaml` in the `awful_aj` config
    /// directory is used.
    #[instrument(level = "info", skip_all, fields(template = %template_name))]
    pub async fn load(
        config_path: Option<&Path>,
        template_name: &str,
    ) -> Result<Self, Box<dyn Error>> {
        let conf_file = match config_path {
            Some(path) => path.to_path_buf(),
            None => config_dir()?.join("config.yaml"),
        };
        let conf_str = conf_file
            .to_str()
            .ok_or("config path is not valid UTF-8")?;
        let config = config::load_config(conf_str)?;
        info!(config_path = conf_str, "Loaded configuration");

        let template = template::load_template(template_name).await?;
        info!("Loaded template");

        Ok(Self { config, template })
    }
}

impl SummaryBackend for AskFnWrapper {
    #[instrument(level = "info", skip_all, fields(chars = chunk.chars().count()))]
    async fn summarize(&self, chunk: &str, bounds: LengthBounds) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let res = ask(
            &self.config,
            summary_prompt(chunk, bounds),
            &self.template,
            None,
            None,
        )
        .await;
        let dt = t0.elapsed();

        match &res {
            Ok(_) => info!(elapsed_ms = dt.as_millis() as u128, "API call succeeded"),
            Err(e) => warn!(elapsed_ms = dt.as_millis() as u128, error = %e, "API call failed"),
        }
        res.map(|summary| summary.trim().to_string())
    }
}
