//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - Frontier management (pending/in-flight/visited URL sets)
//! - HTTP fetching with failure classification and bounded retry
//! - Link discovery and substantive-content extraction
//! - The worker-pool crawl engine tying it all together

mod content;
mod engine;
mod fetcher;
mod frontier;
mod parser;

pub use content::{extract_blocks, ExtractContent, ThresholdExtractor};
pub use engine::{CrawlSummary, Engine};
pub use fetcher::{build_http_client, fetch_url, fetch_with_retry, FetchFailure, FetchedPage};
pub use frontier::{Claim, Frontier};
pub use parser::{extract_links, parse_page, ParsedPage};

use crate::config::Config;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the scope filter and HTTP client
/// 2. Open the archive file
/// 3. Seed the frontier and run the worker pool to exhaustion
/// 4. Finish the archive and return the run summary
///
/// # Arguments
///
/// * `config` - The validated crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl completed; the archive is on disk
/// * `Err(CrawlError)` - Startup failed before any crawling happened
pub async fn crawl(config: Config) -> Result<CrawlSummary, CrawlError> {
    Engine::new(config)?.run().await
}
