use serde::Deserialize;

/// Main configuration structure for Papyrus
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawl: CrawlConfig,
    pub scope: ScopeConfig,
    #[serde(default)]
    pub content: ContentConfig,
    pub output: OutputConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// The URL the crawl starts from
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Mandatory pause between consecutive request starts (milliseconds),
    /// enforced globally across all workers
    #[serde(rename = "politeness-delay-ms", default = "default_politeness_delay_ms")]
    pub politeness_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Maximum retries for transient (timeout/transport) failures
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Number of concurrent fetch workers
    #[serde(default = "default_workers")]
    pub workers: u32,
}

/// Crawl scope configuration: which URLs are eligible at all
#[derive(Debug, Clone, Deserialize)]
pub struct ScopeConfig {
    /// Target origin, e.g. "https://example.org"; only URLs on this exact
    /// scheme+host+port are crawled
    pub origin: String,

    /// Path prefixes excluded from the crawl, e.g. "/archive/scans/"
    #[serde(rename = "excluded-prefixes", default)]
    pub excluded_prefixes: Vec<String>,

    /// File extensions excluded from the crawl, e.g. ".pdf"
    #[serde(rename = "excluded-extensions", default)]
    pub excluded_extensions: Vec<String>,
}

/// Content extraction configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ContentConfig {
    /// Minimum word count for an extracted block to be kept (inclusive)
    #[serde(rename = "min-block-words", default = "default_min_block_words")]
    pub min_block_words: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            min_block_words: default_min_block_words(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the archive text file
    #[serde(rename = "archive-path")]
    pub archive_path: String,

    /// Flush the archive to disk every N archived pages
    #[serde(rename = "flush-every-pages", default = "default_flush_every_pages")]
    pub flush_every_pages: u32,
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
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

fn default_politeness_delay_ms() -> u64 {
    1000
}

fn default_fetch_timeout_secs() -> u64 {
    15
}

fn default_max_retries() -> u32 {
    2
}

fn default_workers() -> u32 {
    4
}

fn default_min_block_words() -> usize {
    20
}

fn default_flush_every_pages() -> u32 {
    16
}
