//! `OnDemandClient` - NHK radio on-demand JSON client implementation.

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, StatusCode};
use tracing::instrument;
use url::Url;

use crate::error::OnDemandError;

use super::api::LocalOnDemandApi;
use super::types::{DetailEntry, DetailResponse, IndexEntry, IndexResponse};

/// Default index URL.
pub const DEFAULT_INDEX_URL: &str = "https://www.nhk.or.jp/radioondemand/json/index/index.json";

/// NHK radio on-demand client.
///
/// One GET per call; no retries, no caching.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OnDemandClient {
    /// HTTP client (reqwest, gzip enabled).
    http_client: Client,
    /// Index URL.
    index_url: Url,
}

/// Builder for `OnDemandClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OnDemandClientBuilder {
    index_url: Option<Url>,
    user_agent: Option<String>,
}

impl OnDemandClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            index_url: None,
            user_agent: None,
        }
    }

    /// Overrides the index URL (config file, or wiremock in tests).
    #[must_use]
    pub fn index_url(mut self, url: Url) -> Self {
        self.index_url = Some(url);
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<OnDemandClient> {
        let user_agent = self.user_agent.context("user_agent is required")?;

        let index_url = if let Some(url) = self.index_url {
            url
        } else {
            let result = Url::parse(DEFAULT_INDEX_URL);
            result.context("invalid default index URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(OnDemandClient {
            http_client,
            index_url,
        })
    }
}

impl OnDemandClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> OnDemandClientBuilder {
        OnDemandClientBuilder::new()
    }

    /// Returns the configured index URL.
    #[must_use]
    pub const fn index_url(&self) -> &Url {
        &self.index_url
    }

    /// Sends one GET request and decodes the body as JSON.
    ///
    /// The status must be exactly 200. Invalid UTF-8 sequences are replaced,
    /// but JSON syntax errors are fatal.
    #[instrument(skip_all, fields(url = %url))]
    async fn fetch_json<T: serde::de::DeserializeOwned>(&self, url: &Url) -> Result<T> {
        tracing::debug!("on-demand request");

        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| OnDemandError::remote(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(OnDemandError::remote(url, anyhow!("server returned {status}")).into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| OnDemandError::remote(url, e))?;
        tracing::debug!(len = bytes.len(), "response received");

        let body = String::from_utf8_lossy(&bytes);
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        let parsed = raw_result.map_err(|e| {
            OnDemandError::remote(
                url,
                anyhow::Error::new(e).context("failed to decode JSON response"),
            )
        })?;
        Ok(parsed)
    }
}

impl LocalOnDemandApi for OnDemandClient {
    #[instrument(skip_all)]
    async fn list_index(&self) -> Result<Vec<IndexEntry>> {
        let url = &self.index_url;
        let response: IndexResponse = self.fetch_json(url).await?;
        let entries = response
            .data_list
            .ok_or_else(|| OnDemandError::remote(url, anyhow!("response has no data_list")))?;
        tracing::debug!(count = entries.len(), "index entries");
        Ok(entries)
    }

    #[instrument(skip_all)]
    async fn list_details(&self, detail_url: &Url) -> Result<Vec<DetailEntry>> {
        let response: DetailResponse = self.fetch_json(detail_url).await?;
        let details = response
            .main
            .and_then(|main| main.detail_list)
            .ok_or_else(|| {
                OnDemandError::remote(detail_url, anyhow!("response has no main.detail_list"))
            })?;
        tracing::debug!(count = details.len(), "detail entries");
        Ok(details)
    }
}
