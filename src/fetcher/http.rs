//! Plain HTTP fetcher
//!
//! This backend handles:
//! - Building an HTTP client with the configured user agent string
//! - GET requests with limited redirect following
//! - Content-Type checks so only HTML reaches the extractor
//! - Error classification into [`FetchError`]

use crate::fetcher::{FetchError, FetchResult, Fetcher, FetcherFactory};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Opens [`HttpFetcher`] sessions
#[derive(Debug, Clone)]
pub struct HttpFetcherFactory {
    user_agent: String,
    timeout: Duration,
}

impl HttpFetcherFactory {
    pub fn new(user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            user_agent: user_agent.into(),
            timeout,
        }
    }
}

#[async_trait]
impl FetcherFactory for HttpFetcherFactory {
    async fn open(&self) -> FetchResult<Box<dyn Fetcher>> {
        let client = build_http_client(&self.user_agent, self.timeout)
            .map_err(|e| FetchError::Startup(format!("failed to build HTTP client: {}", e)))?;
        tracing::debug!("Opened HTTP fetcher session");
        Ok(Box::new(HttpFetcher { client }))
    }
}

/// Builds an HTTP client with proper configuration
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages with a static GET; scripts are not executed
pub struct HttpFetcher {
    client: Client,
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&mut self, url: &Url) -> FetchResult<String> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // A missing Content-Type is given the benefit of the doubt
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.is_empty() && !is_html(&content_type) {
            return Err(FetchError::ContentMismatch {
                url: url.to_string(),
                content_type,
            });
        }

        response.text().await.map_err(|e| classify_error(url, e))
    }
}

fn is_html(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("text/html") || content_type.contains("application/xhtml+xml")
}

fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Navigation {
            url: url.to_string(),
            message: "Connection refused".to_string(),
        }
    } else {
        FetchError::Navigation {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
