//! Page fetching
//!
//! The crawler only needs "give me the markup for this URL". This module
//! defines that seam and two backends:
//! - [`RenderFetcher`]: a headless-browser rendering service that executes
//!   page scripts, scrolls to the bottom and lets lazy content settle
//! - [`HttpFetcher`]: a plain HTTP GET for sites that need no rendering
//!
//! Backends are opened through a [`FetcherFactory`] so every worker can own an
//! independent session.

mod http;
mod render;

pub use http::{HttpFetcher, HttpFetcherFactory};
pub use render::{RenderFetcher, RenderFetcherFactory, RenderOptions};

use crate::config::{Config, FetcherMode};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors reported by a fetcher
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML from {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("Navigation failed for {url}: {message}")]
    Navigation { url: String, message: String },

    #[error("Fetcher session lost: {0}")]
    Session(String),

    #[error("Fetcher startup failed: {0}")]
    Startup(String),
}

impl FetchError {
    /// Returns true if the session can no longer serve requests
    ///
    /// Every other error only concerns the URL that produced it.
    pub fn is_session_fatal(&self) -> bool {
        matches!(self, Self::Session(_) | Self::Startup(_))
    }
}

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

/// One open fetcher session
#[async_trait]
pub trait Fetcher: Send {
    /// Returns the (rendered) markup of `url`
    async fn fetch(&mut self, url: &Url) -> FetchResult<String>;

    /// Releases the session
    async fn close(&mut self) -> FetchResult<()> {
        Ok(())
    }
}

/// Opens fetcher sessions
#[async_trait]
pub trait FetcherFactory: Send + Sync {
    /// Acquires a new session; failure here is fatal for the worker asking
    async fn open(&self) -> FetchResult<Box<dyn Fetcher>>;
}

/// Builds the factory selected by `[fetcher] mode`
pub fn build_factory(config: &Config) -> FetchResult<Arc<dyn FetcherFactory>> {
    let user_agent = config.user_agent.header_value();

    match config.fetcher.mode {
        FetcherMode::Http => Ok(Arc::new(HttpFetcherFactory::new(
            user_agent,
            Duration::from_millis(config.crawler.page_timeout),
        ))),
        FetcherMode::Render => {
            let endpoint = config.fetcher.render_endpoint.as_deref().ok_or_else(|| {
                FetchError::Startup("render mode requires render-endpoint".to_string())
            })?;
            let endpoint = Url::parse(endpoint)
                .map_err(|e| FetchError::Startup(format!("invalid render endpoint: {}", e)))?;

            let options = RenderOptions {
                ready_timeout: Duration::from_millis(config.fetcher.ready_timeout),
                settle_time: Duration::from_millis(config.fetcher.settle_time),
            };

            Ok(Arc::new(RenderFetcherFactory::new(
                endpoint,
                config.fetcher.render_token.clone(),
                options,
            )))
        }
    }
}
