//! HTTP page fetching.
//!
//! [`HttpFetcher`] performs a single unauthenticated GET per URL with a
//! bounded timeout. There are no retries and no custom headers; redirects
//! follow the client's defaults.

use crate::error::FetchError;
use std::time::Duration;
use tracing::{info, instrument, warn};
use url::Url;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Something that can retrieve the raw bytes behind a URL.
pub trait Fetch {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// [`Fetch`] implementation backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        let response = response.error_for_status().map_err(|e| {
            warn!(%status, "Non-success status");
            FetchError::from_reqwest(url, e)
        })?;

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        info!(%status, bytes = body.len(), "Fetched page");
        Ok(body.to_vec())
    }
}
