//! Bounded traversal of a single seed

use crate::crawler::{CancelFlag, CrawlSettings};
use crate::extract::{extract_document, PageSignals};
use crate::fetcher::{FetchError, Fetcher};
use crate::state::{AggregatedResult, CrawlState, SeedReport, SeedStatus};
use crate::url::{normalize_seed, same_origin_links_in};
use scraper::Html;
use std::collections::BTreeSet;
use tracing::Instrument;
use url::Url;

/// Outcome of one seed plus whether the fetcher session survived it
pub(crate) struct SiteCrawl {
    pub report: SeedReport,
    pub session_lost: bool,
}

/// Crawls one seed and reports what it yielded
///
/// Up to `settings.max_depth` URLs are fetched, starting with the seed and
/// continuing breadth-first through same-origin links. Links are always
/// resolved against the seed URL. A page that fails to load contributes
/// nothing and the traversal moves on; a lost fetcher session ends the seed
/// with [`SeedStatus::Failed`] but keeps what was already gathered.
///
/// # Arguments
///
/// * `fetcher` - An open fetcher session
/// * `row` - Row of the seed in the input list
/// * `seed` - The seed as written in the input
/// * `settings` - Fetch budget and per-page timeout
/// * `cancel` - Checked before every page
pub async fn crawl_seed(
    fetcher: &mut dyn Fetcher,
    row: usize,
    seed: &str,
    settings: &CrawlSettings,
    cancel: &CancelFlag,
) -> SeedReport {
    crawl_site(fetcher, row, seed, settings, cancel).await.report
}

#[tracing::instrument(name = "seed", skip(fetcher, settings, cancel))]
pub(crate) async fn crawl_site(
    fetcher: &mut dyn Fetcher,
    row: usize,
    seed: &str,
    settings: &CrawlSettings,
    cancel: &CancelFlag,
) -> SiteCrawl {
    let base = match normalize_seed(seed) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Skipping invalid seed: {}", e);
            return SiteCrawl {
                report: SeedReport::failed(row, seed, e.to_string()),
                session_lost: false,
            };
        }
    };

    let mut state = CrawlState::new(base.clone(), settings.max_depth);
    let mut result = AggregatedResult::new();
    let mut status = SeedStatus::Completed;
    let mut error = None;
    let mut session_lost = false;
    let mut pages_fetched = 0;

    loop {
        if cancel.is_cancelled() && !state.is_finished() {
            tracing::info!("Cancelled after {} pages", state.depth());
            status = SeedStatus::Interrupted;
            error = Some("run cancelled".to_string());
            break;
        }

        let Some(url) = state.next_url() else {
            break;
        };

        tracing::debug!("Fetching {} ({}/{})", url, state.depth() + 1, state.max_depth());
        let span = tracing::debug_span!("page", url = %url);
        let outcome = tokio::time::timeout(settings.page_timeout, fetcher.fetch(&url))
            .instrument(span)
            .await
            .unwrap_or_else(|_| {
                Err(FetchError::Timeout {
                    url: url.to_string(),
                })
            });
        state.record_attempt();

        match outcome {
            Ok(html) => {
                pages_fetched += 1;
                let (signals, links) = scan_page(&html, &base);
                tracing::debug!(
                    emails = signals.emails.len(),
                    phones = signals.phones.len(),
                    social = signals.social_links.len(),
                    "Extracted signals from {}",
                    url
                );
                result.merge(signals);
                let queued = state.enqueue_all(links);
                tracing::trace!("Queued {} new links from {}", queued, url);
            }
            Err(e) if e.is_session_fatal() => {
                tracing::error!("Fetcher session lost while crawling {}: {}", url, e);
                status = SeedStatus::Failed;
                error = Some(e.to_string());
                session_lost = true;
                break;
            }
            Err(e) => {
                tracing::warn!("{}", e);
            }
        }
    }

    tracing::info!(
        status = %status,
        pages = state.visited().len(),
        emails = result.emails.len(),
        phones = result.phones.len(),
        social = result.social_links.len(),
        "Seed finished"
    );

    SiteCrawl {
        report: SeedReport {
            row,
            seed: seed.to_string(),
            status,
            result,
            pages_visited: state.visited().len(),
            pages_fetched,
            error,
        },
        session_lost,
    }
}

/// Extracts signals and same-origin links from one page
///
/// The parsed document never outlives this call, so the caller's future stays
/// `Send`.
fn scan_page(html: &str, base: &Url) -> (PageSignals, BTreeSet<Url>) {
    let document = Html::parse_document(html);
    (
        extract_document(&document),
        same_origin_links_in(&document, base),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::testing::{Reply, ScriptedSite};
    use crate::extract::SocialPlatform;
    use std::time::Duration;

    const HOME: &str = r#"<html><body>
        <p>Contact x@a.test or call 555-123-4567</p>
        <a href="/about">About</a>
        <a href="https://b.test/">Partner</a>
    </body></html>"#;

    const ABOUT: &str = r#"<html><body>
        <p>Sales: sales@a.test</p>
        <a href="/team">Team</a>
        <footer><a href="https://facebook.com/acme">fb</a></footer>
    </body></html>"#;

    fn settings(max_depth: u32) -> CrawlSettings {
        CrawlSettings {
            max_depth,
            page_timeout: Duration::from_secs(5),
        }
    }

    async fn crawl(site: &ScriptedSite, seed: &str, max_depth: u32) -> SiteCrawl {
        let mut fetcher = site.session();
        crawl_site(&mut fetcher, 2, seed, &settings(max_depth), &CancelFlag::new()).await
    }

    #[tokio::test]
    async fn test_home_and_about_within_budget() {
        let site = ScriptedSite::new()
            .page("https://a.test/", HOME)
            .page("https://a.test/about", ABOUT);

        let report = crawl(&site, "https://a.test", 2).await.report;

        assert_eq!(report.status, SeedStatus::Completed);
        assert_eq!(report.pages_visited, 2);
        assert_eq!(report.pages_fetched, 2);
        assert!(report.result.emails.contains("x@a.test"));
        assert!(report.result.emails.contains("sales@a.test"));
        assert!(report.result.phones.contains("5551234567"));
        assert_eq!(
            report.result.social(SocialPlatform::Facebook),
            Some("https://facebook.com/acme")
        );
        assert_eq!(
            site.fetched(),
            vec!["https://a.test/".to_string(), "https://a.test/about".to_string()]
        );
    }

    #[tokio::test]
    async fn test_visited_never_exceeds_budget() {
        let links: String = (0..20)
            .map(|i| format!(r#"<a href="/p{i}">p{i}</a>"#))
            .collect();
        let home = format!("<html><body>{links}</body></html>");
        let mut site = ScriptedSite::new().page("https://a.test/", &home);
        for i in 0..20 {
            site = site.page(&format!("https://a.test/p{i}"), &home);
        }

        for budget in [1, 3, 7] {
            let report = crawl(&site, "https://a.test/", budget).await.report;
            assert!(report.pages_visited <= budget as usize);
            assert_eq!(report.pages_visited, budget as usize);
        }
    }

    #[tokio::test]
    async fn test_external_link_never_fetched() {
        let site = ScriptedSite::new()
            .page("https://a.test/", HOME)
            .page("https://a.test/about", ABOUT)
            .page("https://b.test/", "<p>other@b.test</p>");

        let report = crawl(&site, "https://a.test", 10).await.report;

        assert!(site.fetched().iter().all(|u| u.starts_with("https://a.test")));
        assert!(!report.result.emails.contains("other@b.test"));
    }

    #[tokio::test]
    async fn test_failed_only_page_gives_empty_result() {
        let site = ScriptedSite::new().reply("https://down.test/", Reply::Status(500));

        let crawl = crawl(&site, "https://down.test", 2).await;

        assert!(!crawl.session_lost);
        assert_eq!(crawl.report.status, SeedStatus::Completed);
        assert!(crawl.report.result.is_empty());
        assert_eq!(crawl.report.pages_visited, 1);
        assert_eq!(crawl.report.pages_fetched, 0);
    }

    #[tokio::test]
    async fn test_failed_page_spends_budget_and_crawl_continues() {
        let site = ScriptedSite::new()
            .page(
                "https://a.test/",
                r#"<a href="/broken">x</a><a href="/ok">y</a>"#,
            )
            .reply("https://a.test/broken", Reply::Status(404))
            .page("https://a.test/ok", "<p>ok@a.test</p>");

        let report = crawl(&site, "https://a.test", 3).await.report;

        assert_eq!(report.pages_visited, 3);
        assert_eq!(report.pages_fetched, 2);
        assert!(report.result.emails.contains("ok@a.test"));
    }

    #[tokio::test]
    async fn test_session_loss_keeps_partial_result() {
        let site = ScriptedSite::new()
            .page("https://a.test/", HOME)
            .reply("https://a.test/about", Reply::SessionLost);

        let crawl = crawl(&site, "https://a.test", 5).await;

        assert!(crawl.session_lost);
        assert_eq!(crawl.report.status, SeedStatus::Failed);
        assert!(crawl.report.result.emails.contains("x@a.test"));
        assert!(crawl.report.error.is_some());
    }

    #[tokio::test]
    async fn test_invalid_seed_fails_without_fetching() {
        let site = ScriptedSite::new();

        let report = crawl(&site, "ftp://files.test", 2).await.report;

        assert_eq!(report.status, SeedStatus::Failed);
        assert_eq!(report.pages_visited, 0);
        assert!(site.fetched().is_empty());
    }

    #[tokio::test]
    async fn test_hung_page_times_out() {
        let site = ScriptedSite::new()
            .page("https://a.test/", r#"<a href="/slow">s</a><a href="/fast">f</a>"#)
            .reply("https://a.test/slow", Reply::Hang)
            .page("https://a.test/fast", "<p>fast@a.test</p>");

        let mut fetcher = site.session();
        let settings = CrawlSettings {
            max_depth: 3,
            page_timeout: Duration::from_millis(50),
        };
        let report = crawl_seed(
            &mut fetcher,
            2,
            "https://a.test",
            &settings,
            &CancelFlag::new(),
        )
        .await;

        assert_eq!(report.pages_visited, 3);
        assert!(report.result.emails.contains("fast@a.test"));
    }

    #[tokio::test]
    async fn test_cancelled_before_start_is_interrupted() {
        let site = ScriptedSite::new().page("https://a.test/", HOME);
        let cancel = CancelFlag::new();
        cancel.cancel();

        let mut fetcher = site.session();
        let report = crawl_seed(&mut fetcher, 2, "https://a.test", &settings(2), &cancel).await;

        assert_eq!(report.status, SeedStatus::Interrupted);
        assert!(site.fetched().is_empty());
    }

    #[tokio::test]
    async fn test_links_resolve_against_seed() {
        // "team" on /shop/sub/about resolves against the seed, not the page
        let site = ScriptedSite::new()
            .page("https://a.test/shop/", r#"<a href="/shop/sub/about">a</a>"#)
            .page("https://a.test/shop/sub/about", r#"<a href="team">t</a>"#)
            .page("https://a.test/shop/team", "<p>team@a.test</p>")
            .page("https://a.test/shop/sub/team", "<p>wrong@a.test</p>");

        let report = crawl(&site, "https://a.test/shop/", 3).await.report;

        assert!(report.result.emails.contains("team@a.test"));
        assert!(!report.result.emails.contains("wrong@a.test"));
    }

    #[tokio::test]
    async fn test_first_social_link_wins_across_pages() {
        let site = ScriptedSite::new()
            .page(
                "https://a.test/",
                r#"<a href="/next">n</a><footer><a href="https://twitter.com/first">t</a></footer>"#,
            )
            .page(
                "https://a.test/next",
                r#"<footer><a href="https://twitter.com/second">t</a></footer>"#,
            );

        let report = crawl(&site, "https://a.test", 2).await.report;

        assert_eq!(
            report.result.social(SocialPlatform::Twitter),
            Some("https://twitter.com/first")
        );
    }
}
