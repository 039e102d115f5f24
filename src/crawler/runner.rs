//! Runs every seed of a list through fetcher sessions
//!
//! Sessions are opened before the first seed is crawled; failing to open one
//! aborts the run. Each worker owns one session and pulls seeds from a shared
//! queue, so with `concurrency = 1` seeds are crawled strictly one after the
//! other. Reports travel over a channel to the single result sink. Sessions
//! are closed on every exit path.
//!
//! A session lost mid-seed is reopened. A worker that cannot reopen its
//! session stops; once no worker holds a session, the seeds still queued are
//! reported as failed so every seed ends up with a record.

use crate::crawler::site::crawl_site;
use crate::crawler::{CancelFlag, CrawlSettings};
use crate::fetcher::{FetchError, Fetcher, FetcherFactory};
use crate::input::Seed;
use crate::output::ResultSink;
use crate::state::{SeedReport, SeedStatus};
use crate::SiftError;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Totals for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Seeds in the input list
    pub seeds_total: usize,
    pub completed: usize,
    pub interrupted: usize,
    pub failed: usize,
    pub pages_visited: usize,
    pub pages_fetched: usize,

    /// Reports the sink could not persist
    pub persist_failures: usize,

    /// Workers stopped because their session could not be reopened
    pub lost_sessions: usize,

    /// Whether the run was cancelled before every seed was crawled
    pub cancelled: bool,
}

impl RunSummary {
    /// Seeds that produced a report
    pub fn seeds_processed(&self) -> usize {
        self.completed + self.interrupted + self.failed
    }

    fn record(&mut self, report: &SeedReport) {
        match report.status {
            SeedStatus::Completed => self.completed += 1,
            SeedStatus::Interrupted => self.interrupted += 1,
            SeedStatus::Failed => self.failed += 1,
        }
        self.pages_visited += report.pages_visited;
        self.pages_fetched += report.pages_fetched;
    }
}

/// Drives seeds through one or more fetcher sessions
pub struct Runner {
    factory: Arc<dyn FetcherFactory>,
    settings: CrawlSettings,
    concurrency: usize,
}

impl Runner {
    /// Creates a runner; `concurrency` is clamped to at least one worker
    pub fn new(
        factory: Arc<dyn FetcherFactory>,
        settings: CrawlSettings,
        concurrency: usize,
    ) -> Self {
        Self {
            factory,
            settings,
            concurrency: concurrency.max(1),
        }
    }

    /// Crawls every seed and emits one report per seed
    ///
    /// Seed-level failures, including a session that cannot be reopened, are
    /// reported through the sink and never abort the run. A sink error is
    /// logged and counted. Only failing to open the initial sessions returns
    /// an error.
    pub async fn run(
        &self,
        seeds: Vec<Seed>,
        sink: &mut dyn ResultSink,
        cancel: &CancelFlag,
    ) -> Result<RunSummary, SiftError> {
        let mut summary = RunSummary {
            seeds_total: seeds.len(),
            ..RunSummary::default()
        };

        let workers = self.concurrency.min(seeds.len()).max(1);
        let sessions = self.open_sessions(workers).await?;
        tracing::info!(
            "Crawling {} seeds with {} worker(s), budget {} pages per seed",
            seeds.len(),
            workers,
            self.settings.max_depth
        );

        let (tx, mut rx) = mpsc::unbounded_channel();
        let context = WorkerContext {
            factory: Arc::clone(&self.factory),
            queue: Arc::new(Mutex::new(VecDeque::from(seeds))),
            live: Arc::new(AtomicUsize::new(workers)),
            settings: self.settings,
            cancel: cancel.clone(),
            reports: tx,
        };

        let handles: Vec<_> = sessions
            .into_iter()
            .enumerate()
            .map(|(id, fetcher)| tokio::spawn(worker(id, fetcher, context.clone())))
            .collect();
        drop(context);

        while let Some(report) = rx.recv().await {
            summary.record(&report);
            if let Err(e) = sink.emit(&report) {
                tracing::error!("Failed to persist result for row {}: {}", report.row, e);
                summary.persist_failures += 1;
            }
        }

        for handle in handles {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::warn!("Worker stopped without a session: {}", e);
                    summary.lost_sessions += 1;
                }
                Err(e) => tracing::error!("Worker task failed: {}", e),
            }
        }

        summary.cancelled =
            cancel.is_cancelled() && summary.seeds_processed() < summary.seeds_total;

        tracing::info!(
            "Run finished: {} completed, {} interrupted, {} failed, {} pages visited",
            summary.completed,
            summary.interrupted,
            summary.failed,
            summary.pages_visited
        );
        Ok(summary)
    }

    /// Opens `count` sessions, closing the ones already open if any fails
    async fn open_sessions(&self, count: usize) -> Result<Vec<Box<dyn Fetcher>>, SiftError> {
        let mut sessions = Vec::with_capacity(count);
        for _ in 0..count {
            match self.factory.open().await {
                Ok(fetcher) => sessions.push(fetcher),
                Err(e) => {
                    tracing::error!("Could not open fetcher session: {}", e);
                    for mut fetcher in sessions {
                        close_session(fetcher.as_mut()).await;
                    }
                    return Err(SiftError::ResourceAcquisition(e));
                }
            }
        }
        Ok(sessions)
    }
}

/// State shared by every worker of a run
#[derive(Clone)]
struct WorkerContext {
    factory: Arc<dyn FetcherFactory>,
    queue: Arc<Mutex<VecDeque<Seed>>>,
    /// Workers still holding a usable session
    live: Arc<AtomicUsize>,
    settings: CrawlSettings,
    cancel: CancelFlag,
    reports: mpsc::UnboundedSender<SeedReport>,
}

/// Crawls seeds from the shared queue until it is drained or the run stops
///
/// A session lost mid-seed is replaced before the next seed. If no new
/// session can be opened the worker stops with that error; the last worker to
/// stop this way fails the seeds left in the queue.
#[tracing::instrument(name = "worker", skip_all, fields(id = id))]
async fn worker(
    id: usize,
    mut fetcher: Box<dyn Fetcher>,
    ctx: WorkerContext,
) -> Result<(), FetchError> {
    loop {
        if ctx.cancel.is_cancelled() {
            break;
        }
        let Some(seed) = next_seed(&ctx.queue) else {
            break;
        };

        let crawl = crawl_site(
            fetcher.as_mut(),
            seed.row,
            &seed.url,
            &ctx.settings,
            &ctx.cancel,
        )
        .await;
        let session_lost = crawl.session_lost;
        if ctx.reports.send(crawl.report).is_err() {
            break;
        }

        if session_lost {
            close_session(fetcher.as_mut()).await;
            match ctx.factory.open().await {
                Ok(fresh) => {
                    tracing::info!("Reopened fetcher session");
                    fetcher = fresh;
                }
                Err(e) => {
                    tracing::error!("Could not reopen fetcher session: {}", e);
                    let remaining = ctx.live.fetch_sub(1, Ordering::SeqCst) - 1;
                    if remaining == 0 && !ctx.cancel.is_cancelled() {
                        fail_remaining(&ctx, &e);
                    }
                    return Err(e);
                }
            }
        }
    }

    close_session(fetcher.as_mut()).await;
    Ok(())
}

/// Reports every queued seed as failed
fn fail_remaining(ctx: &WorkerContext, cause: &FetchError) {
    let mut failed = 0;
    while let Some(seed) = next_seed(&ctx.queue) {
        let report = SeedReport::failed(
            seed.row,
            seed.url,
            format!("fetcher session unavailable: {}", cause),
        );
        if ctx.reports.send(report).is_err() {
            break;
        }
        failed += 1;
    }
    if failed > 0 {
        tracing::warn!("No fetcher session left, marked {} queued seeds failed", failed);
    }
}

fn next_seed(queue: &Mutex<VecDeque<Seed>>) -> Option<Seed> {
    queue
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .pop_front()
}

async fn close_session(fetcher: &mut dyn Fetcher) {
    if let Err(e) = fetcher.close().await {
        tracing::warn!("Failed to close fetcher session: {}", e);
    }
}
