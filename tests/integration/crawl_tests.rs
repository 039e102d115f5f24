//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run seeds through
//! the plain HTTP fetcher end-to-end.

use site_sift::config::parse_config;
use site_sift::crawler::{crawl_seed, CancelFlag, CrawlSettings, Runner};
use site_sift::fetcher::{build_factory, FetcherFactory, HttpFetcherFactory};
use site_sift::input::{load_seeds, Seed};
use site_sift::output::{
    format_markdown_summary, generate_summary, MemorySink, SqliteSink,
};
use site_sift::storage::{RunStatus, SqliteStorage, Storage};
use site_sift::{SeedStatus, SocialPlatform};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_raw(body, "text/html; charset=utf-8")
}

/// Mounts a small company site: home links to /about and to `external`
async fn mount_site(server: &MockServer, external: &str) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(format!(
            r#"<html><body>
                <h1>Acme</h1>
                <p>Write to x@a.test or call 555-123-4567</p>
                <a href="/about">About us</a>
                <a href="{external}/">Our partner</a>
                <script>var tracking = "bot@tracker.test";</script>
            </body></html>"#
        )))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html(
            r#"<html><body>
                <p>Sales: sales@a.test</p>
                <a href="https://twitter.com/acme_body">tw</a>
                <a href="/team">Team</a>
                <footer>
                    <a href="https://www.facebook.com/acme">Facebook</a>
                    <a href="https://www.linkedin.com/company/acme">LinkedIn</a>
                </footer>
            </body></html>"#
                .to_string(),
        ))
        .expect(1)
        .mount(server)
        .await;

    // Beyond the two-page budget
    Mock::given(method("GET"))
        .and(path("/team"))
        .respond_with(html("<p>team@a.test</p>".to_string()))
        .expect(0)
        .mount(server)
        .await;
}

async fn external_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html("<p>leak@b.test</p>".to_string()))
        .expect(0)
        .mount(&server)
        .await;
    server
}

fn settings() -> CrawlSettings {
    CrawlSettings {
        max_depth: 2,
        page_timeout: Duration::from_secs(10),
    }
}

fn http_factory() -> Arc<dyn FetcherFactory> {
    Arc::new(HttpFetcherFactory::new(
        "TestSifter/1.0 (+https://example.com/bot; bot@example.com)",
        Duration::from_secs(10),
    ))
}

#[tokio::test]
async fn test_crawl_seed_end_to_end() {
    let site = MockServer::start().await;
    let external = external_server().await;
    mount_site(&site, &external.uri()).await;

    let mut fetcher = http_factory().open().await.unwrap();
    let report = crawl_seed(
        fetcher.as_mut(),
        2,
        &site.uri(),
        &settings(),
        &CancelFlag::new(),
    )
    .await;

    assert_eq!(report.status, SeedStatus::Completed);
    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.pages_fetched, 2);

    let result = &report.result;
    assert!(result.emails.contains("x@a.test"));
    assert!(result.emails.contains("sales@a.test"));
    assert!(!result.emails.contains("team@a.test"));
    assert!(!result.emails.contains("bot@tracker.test"));
    assert!(!result.emails.contains("leak@b.test"));
    assert!(result.phones.contains("5551234567"));

    // Footer links win; the body-only twitter link is not in the footer
    assert_eq!(
        result.social(SocialPlatform::Facebook),
        Some("https://www.facebook.com/acme")
    );
    assert_eq!(
        result.social(SocialPlatform::LinkedIn),
        Some("https://www.linkedin.com/company/acme")
    );
    assert_eq!(result.social(SocialPlatform::Twitter), None);

    fetcher.close().await.unwrap();
    // MockServer drop verifies the .expect() counts, including the external host
}

#[tokio::test]
async fn test_failed_seed_does_not_abort_run() {
    let down = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&down)
        .await;

    let site = MockServer::start().await;
    let external = external_server().await;
    mount_site(&site, &external.uri()).await;

    let seeds = vec![
        Seed {
            row: 2,
            url: down.uri(),
        },
        Seed {
            row: 3,
            url: "http://".to_string(),
        },
        Seed {
            row: 4,
            url: site.uri(),
        },
    ];

    let runner = Runner::new(http_factory(), settings(), 1);
    let mut sink = MemorySink::new();
    let summary = runner
        .run(seeds, &mut sink, &CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(summary.seeds_processed(), 3);
    assert!(!summary.cancelled);

    let failed_page = sink.get(2).unwrap();
    assert_eq!(failed_page.emails, "");
    assert_eq!(failed_page.phones, "");
    assert_eq!(failed_page.pages_fetched, 0);

    let invalid = sink.get(3).unwrap();
    assert_eq!(invalid.status, SeedStatus::Failed);
    assert!(invalid.error_message.is_some());

    let good = sink.get(4).unwrap();
    assert_eq!(good.emails, "sales@a.test, x@a.test");
    assert_eq!(good.phones, "5551234567");
    assert_eq!(good.facebook, "https://www.facebook.com/acme");
    assert_eq!(good.instagram, "");
    assert_eq!(good.twitter, "");
    assert_eq!(good.linkedin, "https://www.linkedin.com/company/acme");
}

#[tokio::test]
async fn test_configured_run_persists_to_sqlite() {
    let site = MockServer::start().await;
    let external = external_server().await;
    mount_site(&site, &external.uri()).await;

    let dir = tempfile::tempdir().unwrap();
    let seeds_path = dir.path().join("websites.csv");
    let db_path = dir.path().join("sift.db");

    let mut seeds_file = std::fs::File::create(&seeds_path).unwrap();
    writeln!(seeds_file, "Website,Notes").unwrap();
    writeln!(seeds_file, "{},main site", site.uri()).unwrap();
    writeln!(seeds_file, ",no website").unwrap();

    let config = parse_config(&format!(
        r#"
[crawler]
max-depth = 2
concurrency = 2
page-timeout = 10000

[fetcher]
mode = "http"

[user-agent]
crawler-name = "TestSifter"
crawler-version = "1.0"
contact-url = "https://example.com/bot"
contact-email = "bot@example.com"

[input]
seeds-path = "{}"

[output]
database-path = "{}"
summary-path = "{}"
"#,
        seeds_path.display(),
        db_path.display(),
        dir.path().join("summary.md").display(),
    ))
    .unwrap();

    let seeds = load_seeds(&seeds_path, config.input.has_header).unwrap();
    assert_eq!(seeds.len(), 1);
    assert_eq!(seeds[0].row, 2);

    let mut storage = SqliteStorage::new(&db_path).unwrap();
    let run_id = storage.create_run("test-hash").unwrap();

    let runner = Runner::new(
        build_factory(&config).unwrap(),
        CrawlSettings::from_config(&config),
        config.crawler.concurrency as usize,
    );
    let summary = {
        let mut sink = SqliteSink::new(&mut storage, run_id);
        runner
            .run(seeds, &mut sink, &CancelFlag::new())
            .await
            .unwrap()
    };
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.persist_failures, 0);

    storage.finish_run(run_id, RunStatus::Completed).unwrap();

    let results = storage.load_results(run_id).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].row_index, 2);
    assert_eq!(results[0].emails, "sales@a.test, x@a.test");

    let run_summary = generate_summary(&storage).unwrap();
    assert_eq!(run_summary.status, "completed");
    assert_eq!(run_summary.seeds_with_email, 1);
    let markdown = format_markdown_summary(&run_summary);
    assert!(markdown.contains("sales@a.test, x@a.test"));
}

#[tokio::test]
async fn test_non_html_page_contributes_nothing() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<a href="/brochure.pdf">pdf</a><a href="/contact">c</a>"#.to_string(),
        ))
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .and(path("/brochure.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("%PDF-1.4 pdf@a.test")
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(html("<p>hello@a.test</p>".to_string()))
        .mount(&site)
        .await;

    let mut fetcher = http_factory().open().await.unwrap();
    let report = crawl_seed(
        fetcher.as_mut(),
        2,
        &site.uri(),
        &CrawlSettings {
            max_depth: 3,
            page_timeout: Duration::from_secs(10),
        },
        &CancelFlag::new(),
    )
    .await;

    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.pages_fetched, 2);
    assert!(report.result.emails.contains("hello@a.test"));
    assert!(!report.result.emails.contains("pdf@a.test"));
}
