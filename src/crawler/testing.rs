//! In-memory fetchers for crawler tests

use crate::fetcher::{FetchError, FetchResult, Fetcher, FetcherFactory};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

/// What a scripted URL answers with
#[derive(Debug, Clone)]
pub enum Reply {
    Page(String),
    Status(u16),
    SessionLost,
    Hang,
}

/// Answers from a fixed URL table and records every fetch
#[derive(Debug, Clone, Default)]
pub struct ScriptedSite {
    replies: HashMap<String, Reply>,
    fetched: Arc<Mutex<Vec<String>>>,
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
    open_limit: Option<usize>,
}

impl ScriptedSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.replies
            .insert(url.to_string(), Reply::Page(html.to_string()));
        self
    }

    pub fn reply(mut self, url: &str, reply: Reply) -> Self {
        self.replies.insert(url.to_string(), reply);
        self
    }

    /// Refuses to open more than `limit` sessions
    pub fn open_limit(mut self, limit: usize) -> Self {
        self.open_limit = Some(limit);
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn session(&self) -> ScriptedFetcher {
        self.opened.fetch_add(1, Ordering::SeqCst);
        ScriptedFetcher { site: self.clone() }
    }
}

pub struct ScriptedFetcher {
    site: ScriptedSite,
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&mut self, url: &Url) -> FetchResult<String> {
        self.site.fetched.lock().unwrap().push(url.to_string());

        match self.site.replies.get(url.as_str()).cloned() {
            Some(Reply::Page(html)) => Ok(html),
            Some(Reply::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
            Some(Reply::SessionLost) => Err(FetchError::Session("browser crashed".into())),
            Some(Reply::Hang) => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(String::new())
            }
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }

    async fn close(&mut self) -> FetchResult<()> {
        self.site.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl FetcherFactory for ScriptedSite {
    async fn open(&self) -> FetchResult<Box<dyn Fetcher>> {
        if self.open_limit.is_some_and(|limit| self.opened() >= limit) {
            return Err(FetchError::Startup("rendering service unreachable".into()));
        }
        Ok(Box::new(self.session()))
    }
}

/// Factory whose sessions can never be opened
pub struct DownFactory;

#[async_trait]
impl FetcherFactory for DownFactory {
    async fn open(&self) -> FetchResult<Box<dyn Fetcher>> {
        Err(FetchError::Startup("rendering service unreachable".into()))
    }
}
