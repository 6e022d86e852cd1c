//! HTTP fetcher implementation
//!
//! This module handles all network retrieval for the crawler, including:
//! - Building one pooled HTTP client with browser-like headers
//! - The `Transport` seam, so crawls can run against fakes in tests
//! - Fetching one thread page and turning it into a `PageResult`

use crate::config::HttpConfig;
use crate::crawler::extractor::RecordExtractor;
use crate::url::page_url;
use crate::HarvestError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// One extracted unit of content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Identifier as shown on the page, or the configured placeholder
    pub id: String,

    /// Body text
    pub body: String,

    /// Page the record was found on
    pub page: u32,
}

/// Outcome of fetching one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub page: u32,
    pub records: Vec<Record>,
    pub error: Option<String>,
}

impl PageResult {
    /// A page that was fetched and parsed
    pub fn success(page: u32, records: Vec<Record>) -> Self {
        Self {
            page,
            records,
            error: None,
        }
    }

    /// A page whose fetch or parse failed; it contributes no records
    pub fn failed(page: u32, error: impl Into<String>) -> Self {
        Self {
            page,
            records: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Retrieves raw markup for a URL
///
/// Implementations must be cheap to share between concurrent fetches.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url` and returns its decoded body
    async fn get(&self, url: &str) -> Result<String, HarvestError>;
}

/// `Transport` backed by a pooled `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    default_charset: String,
}

impl HttpTransport {
    /// Builds a transport from the HTTP configuration
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            default_charset: config.default_charset.clone(),
        })
    }

    /// Wraps an existing client
    pub fn with_client(client: Client, default_charset: impl Into<String>) -> Self {
        Self {
            client,
            default_charset: default_charset.into(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, HarvestError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| HarvestError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text_with_charset(&self.default_charset)
            .await
            .map_err(|source| HarvestError::Http {
                url: url.to_string(),
                source,
            })
    }
}

/// Builds an HTTP client with proper configuration
///
/// The client keeps connections alive and is meant to be shared by every
/// fetch of a crawl.
///
/// # Example
///
/// ```no_run
/// use thread_harvest::config::HttpConfig;
/// use thread_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&config.accept) {
        headers.insert(ACCEPT, value);
    }
    if let Ok(value) = HeaderValue::from_str(&config.accept_language) {
        headers.insert(ACCEPT_LANGUAGE, value);
    }

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_millis(config.request_timeout_ms))
        .connect_timeout(Duration::from_secs(10))
        .tcp_keepalive(Duration::from_secs(60))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one page of a thread and extracts its records
///
/// Page 1 is the bare base URL; page N appends `suffix` and N. Records whose
/// body is empty are dropped. Any failure is folded into the returned
/// `PageResult` so one bad page never disturbs its siblings.
pub async fn fetch_page<T, X>(
    transport: &T,
    extractor: &X,
    base_url: &str,
    page: u32,
    suffix: &str,
) -> PageResult
where
    T: Transport + ?Sized,
    X: RecordExtractor + ?Sized,
{
    let url = page_url(base_url, page, suffix);

    match transport.get(&url).await {
        Ok(markup) => {
            let records: Vec<Record> = extractor
                .extract_records(&markup, page)
                .into_iter()
                .filter(|record| !record.body.trim().is_empty())
                .collect();
            tracing::debug!("Page {} yielded {} records", page, records.len());
            PageResult::success(page, records)
        }
        Err(e) => {
            tracing::warn!("Failed to fetch page {} ({}): {}", page, url, e);
            PageResult::failed(page, e.to_string())
        }
    }
}
