//! HTTP status page source.
//!
//! Queries `<base-url>?json` with a bounded per-request timeout.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};

use super::{Snapshot, StatusSource};
use crate::error::FetchError;

/// Default request timeout; kept below the one-second tick so a hung request
/// cannot stall the next one.
pub const FETCH_TIMEOUT: Duration = Duration::from_millis(900);

/// A status source that reads the pool manager's JSON status page.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: Url,
    description: String,
}

impl HttpSource {
    /// Create a source for the given base status URL with default settings.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::builder().endpoint(base_url).build()
    }

    /// Create a new builder for configuring the source.
    pub fn builder() -> HttpSourceBuilder {
        HttpSourceBuilder::default()
    }

    /// The full URL queried on each fetch (including the `json` query).
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl StatusSource for HttpSource {
    async fn fetch(&self) -> Result<Snapshot, FetchError> {
        let response = self.client.get(self.url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        Ok(Snapshot::from_json(&body)?)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for [`HttpSource`].
#[derive(Debug, Default)]
pub struct HttpSourceBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl HttpSourceBuilder {
    /// Set the base status URL (e.g., "http://localhost/status").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the per-request timeout (default: [`FETCH_TIMEOUT`]).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the source, validating the endpoint URL.
    pub fn build(self) -> Result<HttpSource> {
        let base = self
            .endpoint
            .unwrap_or_else(|| crate::config::DEFAULT_STATUS_URL.to_string());
        let url = status_url(&base)?;

        // Status pages live next to the pool; never route them through a proxy.
        let client = Client::builder()
            .timeout(self.timeout.unwrap_or(FETCH_TIMEOUT))
            .no_proxy()
            .build()
            .context("failed to build HTTP client")?;

        Ok(HttpSource {
            client,
            description: format!("http: {}", base),
            url,
        })
    }
}

/// Build the JSON status URL from a base status URL.
///
/// Appends the key-only `json` query parameter, keeping any existing query.
pub fn status_url(base: &str) -> Result<Url> {
    let mut url = Url::parse(base).with_context(|| format!("invalid status URL: {}", base))?;

    if !matches!(url.scheme(), "http" | "https") {
        bail!("unsupported status URL scheme: {}", url.scheme());
    }

    let query = match url.query() {
        Some(q) if !q.is_empty() => format!("{}&json", q),
        _ => "json".to_string(),
    };
    url.set_query(Some(&query));
    Ok(url)
}
