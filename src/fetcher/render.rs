//! Rendering fetcher backed by a headless-browser service
//!
//! The service speaks the Browserless HTTP API: `GET /json/version` answers
//! when the browser is up, and `POST /content` navigates to a URL, runs the
//! requested waits and scripts and returns the final DOM as HTML.
//!
//! Each fetch asks the service to:
//! 1. navigate and wait (bounded by `ready_timeout`) for `<body>`
//! 2. scroll to the bottom of the page to trigger lazy loading
//! 3. wait `settle_time` before serializing the DOM

use crate::fetcher::{FetchError, FetchResult, Fetcher, FetcherFactory};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use url::Url;

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Waits applied to every rendered page
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Upper bound for navigation and for `<body>` to appear
    pub ready_timeout: Duration,

    /// Pause after scrolling so lazy content can load
    pub settle_time: Duration,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            ready_timeout: Duration::from_secs(15),
            settle_time: Duration::from_secs(5),
        }
    }
}

/// Opens [`RenderFetcher`] sessions against one rendering service
#[derive(Debug, Clone)]
pub struct RenderFetcherFactory {
    endpoint: Url,
    token: Option<String>,
    options: RenderOptions,
}

impl RenderFetcherFactory {
    pub fn new(endpoint: Url, token: Option<String>, options: RenderOptions) -> Self {
        Self {
            endpoint,
            token,
            options,
        }
    }

    fn service_url(&self, path: &str) -> FetchResult<Url> {
        let mut url = self
            .endpoint
            .join(path)
            .map_err(|e| FetchError::Startup(format!("invalid render endpoint: {}", e)))?;
        if let Some(token) = &self.token {
            url.query_pairs_mut().append_pair("token", token);
        }
        Ok(url)
    }
}

#[async_trait]
impl FetcherFactory for RenderFetcherFactory {
    async fn open(&self) -> FetchResult<Box<dyn Fetcher>> {
        // Navigation, readiness wait and settle all happen server-side
        let request_timeout = self.options.ready_timeout * 2 + self.options.settle_time;

        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| FetchError::Startup(format!("failed to build HTTP client: {}", e)))?;

        let version_url = self.service_url("json/version")?;
        let response = client
            .get(version_url.as_str())
            .send()
            .await
            .map_err(|e| FetchError::Startup(format!("rendering service unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(FetchError::Startup(format!(
                "rendering service answered {} to version probe",
                response.status()
            )));
        }

        tracing::info!("Opened rendering session at {}", self.endpoint);

        Ok(Box::new(RenderFetcher {
            client,
            content_url: self.service_url("content")?,
            options: self.options,
            open: true,
        }))
    }
}

/// Fetches fully rendered markup through the rendering service
pub struct RenderFetcher {
    client: Client,
    content_url: Url,
    options: RenderOptions,
    open: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentRequest<'a> {
    url: &'a str,
    goto_options: GotoOptions,
    wait_for_selector: WaitForSelector<'a>,
    add_script_tag: [ScriptTag<'a>; 1],
    wait_for_timeout: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GotoOptions {
    timeout: u64,
    wait_until: &'static str,
}

#[derive(Serialize)]
struct WaitForSelector<'a> {
    selector: &'a str,
    timeout: u64,
}

#[derive(Serialize)]
struct ScriptTag<'a> {
    content: &'a str,
}

impl RenderFetcher {
    fn request_body<'a>(&self, url: &'a Url) -> ContentRequest<'a> {
        let ready_ms = self.options.ready_timeout.as_millis() as u64;
        ContentRequest {
            url: url.as_str(),
            goto_options: GotoOptions {
                timeout: ready_ms,
                wait_until: "networkidle2",
            },
            wait_for_selector: WaitForSelector {
                selector: "body",
                timeout: ready_ms,
            },
            add_script_tag: [ScriptTag {
                content: SCROLL_TO_BOTTOM,
            }],
            wait_for_timeout: self.options.settle_time.as_millis() as u64,
        }
    }
}

#[async_trait]
impl Fetcher for RenderFetcher {
    async fn fetch(&mut self, url: &Url) -> FetchResult<String> {
        if !self.open {
            return Err(FetchError::Session("rendering session already closed".into()));
        }

        let response = self
            .client
            .post(self.content_url.as_str())
            .json(&self.request_body(url))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout {
                        url: url.to_string(),
                    }
                } else if e.is_connect() {
                    FetchError::Session(format!("rendering service unreachable: {}", e))
                } else {
                    FetchError::Navigation {
                        url: url.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if status == StatusCode::REQUEST_TIMEOUT || status == StatusCode::GATEWAY_TIMEOUT {
            return Err(FetchError::Timeout {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Navigation {
                url: url.to_string(),
                message: format!("rendering service answered {}: {}", status, message.trim()),
            });
        }

        response.text().await.map_err(|e| FetchError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    async fn close(&mut self) -> FetchResult<()> {
        if self.open {
            self.open = false;
            tracing::info!("Closed rendering session");
        }
        Ok(())
    }
}
