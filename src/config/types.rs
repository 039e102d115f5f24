use serde::Deserialize;

/// Main configuration structure for Site-Sift
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    pub fetcher: FetcherConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Fetch-attempt budget per seed (not link distance)
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Number of seeds crawled in parallel, each with its own fetcher session
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,

    /// Hard upper bound on a single fetch (milliseconds)
    #[serde(rename = "page-timeout", default = "default_page_timeout")]
    pub page_timeout: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            concurrency: default_concurrency(),
            page_timeout: default_page_timeout(),
        }
    }
}

fn default_max_depth() -> u32 {
    2
}

fn default_concurrency() -> u32 {
    1
}

fn default_page_timeout() -> u64 {
    30_000
}

/// Which fetcher backend produces page markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetcherMode {
    /// Headless-browser rendering service
    Render,
    /// Plain HTTP GET, no script execution
    Http,
}

/// Fetcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    pub mode: FetcherMode,

    /// Base URL of the rendering service (required for `render` mode)
    #[serde(rename = "render-endpoint")]
    pub render_endpoint: Option<String>,

    /// Access token passed to the rendering service
    #[serde(rename = "render-token")]
    pub render_token: Option<String>,

    /// How long to wait for the page body to appear (milliseconds)
    #[serde(rename = "ready-timeout", default = "default_ready_timeout")]
    pub ready_timeout: u64,

    /// Pause after scrolling to the bottom so lazy content can load (milliseconds)
    #[serde(rename = "settle-time", default = "default_settle_time")]
    pub settle_time: u64,
}

fn default_ready_timeout() -> u64 {
    15_000
}

fn default_settle_time() -> u64 {
    5_000
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the user agent header: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Seed list configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Path to the seed list (first column holds the URL)
    #[serde(rename = "seeds-path")]
    pub seeds_path: String,

    /// Whether the first line is a header row
    #[serde(rename = "has-header", default = "default_has_header")]
    pub has_header: bool,
}

fn default_has_header() -> bool {
    true
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}
