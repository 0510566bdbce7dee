use std::time::Duration;

use futures_util::StreamExt;
use url::Url;
use wikiseek_core::{opensearch_url, page_info_url, Suggestion, WikiSite};
use wikiseek_logging::{excerpt, seek_debug};

use crate::response::{parse_opensearch, parse_page_info};
use crate::{FailureKind, FetchError};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    /// Whole-request deadline. `None` leaves it to the network stack.
    pub request_timeout: Option<Duration>,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            redirect_limit: 5,
            max_bytes: 1024 * 1024,
            user_agent: format!("wikiseek/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Source of autosuggestions for a query.
#[async_trait::async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn suggest(&self, site: &WikiSite, query: &str) -> Result<Vec<Suggestion>, FetchError>;
}

/// Exact-title lookup returning the canonical URL of an existing page.
#[async_trait::async_trait]
pub trait PageLookup: Send + Sync {
    async fn lookup(&self, site: &WikiSite, title: &str) -> Result<Option<String>, FetchError>;
}

/// MediaWiki API client over reqwest.
#[derive(Debug, Clone)]
pub struct WikiClient {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl WikiClient {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .user_agent(settings.user_agent.clone());
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }

    async fn get_body(&self, url: Url) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl SuggestionSource for WikiClient {
    async fn suggest(&self, site: &WikiSite, query: &str) -> Result<Vec<Suggestion>, FetchError> {
        seek_debug!("opensearch {:?} '{}'", site.endpoint(), excerpt(query, 40));
        let body = self.get_body(opensearch_url(site, query)).await?;
        parse_opensearch(site, &body)
    }
}

#[async_trait::async_trait]
impl PageLookup for WikiClient {
    async fn lookup(&self, site: &WikiSite, title: &str) -> Result<Option<String>, FetchError> {
        seek_debug!("page info {:?} '{}'", site.endpoint(), excerpt(title, 40));
        let body = self.get_body(page_info_url(site, title)).await?;
        parse_page_info(&body)
    }
}

fn too_large(max_bytes: u64, actual: u64) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return FetchError::new(FailureKind::InvalidUrl, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
