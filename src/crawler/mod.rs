//! Crawler module: per-seed traversal and run orchestration
//!
//! This module contains the core crawling logic, including:
//! - The bounded same-origin traversal of one seed ([`crawl_seed`])
//! - Running every seed of a list through one or more fetcher sessions
//!   ([`Runner`])
//! - Cooperative cancellation ([`CancelFlag`])

mod runner;
mod site;
#[cfg(test)]
pub(crate) mod testing;

pub use runner::{RunSummary, Runner};
pub use site::crawl_seed;

use crate::config::Config;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Per-seed traversal limits
#[derive(Debug, Clone, Copy)]
pub struct CrawlSettings {
    /// Fetch attempts allowed per seed
    pub max_depth: u32,

    /// Hard bound on a single fetch
    pub page_timeout: Duration,
}

impl CrawlSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_depth: config.crawler.max_depth,
            page_timeout: Duration::from_millis(config.crawler.page_timeout),
        }
    }
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            max_depth: 2,
            page_timeout: Duration::from_secs(30),
        }
    }
}

/// Shared cancellation flag
///
/// Cloning hands out another handle to the same flag. The crawler checks it
/// before every seed and every page.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Sets the flag when the process receives Ctrl-C
    ///
    /// Must be called from within a tokio runtime.
    pub fn install_ctrl_c(&self) {
        let flag = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, finishing in-flight seeds");
                flag.cancel();
            }
        });
    }
}
