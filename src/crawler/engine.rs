//! Crawl engine - main crawl orchestration logic
//!
//! The engine drives the whole crawl: it pulls URLs from the frontier,
//! fetches them, extracts content and links, feeds new links back, and
//! appends extracted content to the archive. A bounded pool of workers
//! shares one frontier and one archive writer; the politeness delay is
//! enforced globally across the pool so the target origin sees at most one
//! request start per delay interval.
//!
//! Every per-URL failure is contained here: it is logged, counted, and the
//! crawl proceeds. The only errors that escape are startup problems.

use crate::config::Config;
use crate::crawler::content::{ExtractContent, ThresholdExtractor};
use crate::crawler::fetcher::{build_http_client, fetch_with_retry};
use crate::crawler::frontier::{Claim, Frontier};
use crate::crawler::parser::parse_page;
use crate::output::{ArchiveWriter, PageContent};
use crate::url::{normalize_url, ScopeFilter};
use crate::CrawlError;
use reqwest::Client;
use scraper::Html;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinSet;
use url::Url;

/// How long an idle worker sleeps before re-checking the frontier
const IDLE_WAIT: Duration = Duration::from_millis(25);

/// Pages between progress log lines
const PROGRESS_INTERVAL: usize = 10;

/// Final counts for a completed crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// URLs fetched (success or failure)
    pub pages_visited: usize,

    /// Pages that yielded content into the archive
    pub pages_archived: usize,

    /// Pages whose fetch failed after retries
    pub pages_failed: usize,

    /// Content blocks written
    pub blocks_written: u64,

    /// Bytes written to the archive file
    pub bytes_written: u64,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

/// Spaces request starts by a fixed delay, globally across all workers
///
/// Each waiter reserves the next start slot under the lock, then sleeps
/// until its slot arrives. One origin, one request rate, regardless of how
/// many workers are fetching.
struct RequestGate {
    delay: Duration,
    next_slot: tokio::sync::Mutex<Option<tokio::time::Instant>>,
}

impl RequestGate {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_slot: tokio::sync::Mutex::new(None),
        }
    }

    async fn wait(&self) {
        if self.delay.is_zero() {
            return;
        }

        let start = {
            let mut slot = self.next_slot.lock().await;
            let now = tokio::time::Instant::now();
            let at = match *slot {
                Some(t) if t > now => t,
                _ => now,
            };
            *slot = Some(at + self.delay);
            at
        };

        tokio::time::sleep_until(start).await;
    }
}

/// Per-run failure/success tallies shared between workers
#[derive(Debug, Default)]
struct Tally {
    archived: usize,
    failed: usize,
}

/// State shared by all workers
struct Shared {
    client: Client,
    filter: ScopeFilter,
    extractor: Box<dyn ExtractContent + Send + Sync>,
    frontier: Mutex<Frontier>,
    writer: Mutex<ArchiveWriter>,
    tally: Mutex<Tally>,
    gate: RequestGate,
    max_retries: u32,
}

/// The crawl engine
pub struct Engine {
    shared: Arc<Shared>,
    workers: u32,
}

impl Engine {
    /// Builds an engine from validated configuration
    ///
    /// Fails on startup problems only: a malformed or out-of-scope seed,
    /// an HTTP client that cannot be built, or an unwritable archive path.
    pub fn new(config: Config) -> Result<Self, CrawlError> {
        let filter = ScopeFilter::from_config(&config.scope)?;

        let seed = normalize_url(&config.crawl.seed_url)?;
        if !filter.is_in_scope(&seed) {
            return Err(CrawlError::SeedOutOfScope {
                url: seed.to_string(),
            });
        }

        let client = build_http_client(&config.user_agent, config.crawl.fetch_timeout_secs)?;

        let writer = ArchiveWriter::create(
            Path::new(&config.output.archive_path),
            config.output.flush_every_pages,
        )?;

        let mut frontier = Frontier::new();
        frontier.seed(seed);

        let shared = Arc::new(Shared {
            client,
            filter,
            extractor: Box::new(ThresholdExtractor::new(config.content.min_block_words)),
            frontier: Mutex::new(frontier),
            writer: Mutex::new(writer),
            tally: Mutex::new(Tally::default()),
            gate: RequestGate::new(Duration::from_millis(config.crawl.politeness_delay_ms)),
            max_retries: config.crawl.max_retries,
        });

        Ok(Self {
            shared,
            workers: config.crawl.workers,
        })
    }

    /// Runs the crawl to completion
    ///
    /// Workers drain the frontier until pending and in-flight are both
    /// empty, then the archive is finished exactly once.
    pub async fn run(self) -> Result<CrawlSummary, CrawlError> {
        let start = std::time::Instant::now();

        tracing::info!(
            "Starting crawl of {} with {} workers",
            self.shared.filter.origin(),
            self.workers
        );

        let mut tasks = JoinSet::new();
        for _ in 0..self.workers {
            let shared = Arc::clone(&self.shared);
            tasks.spawn(worker(shared));
        }

        while let Some(joined) = tasks.join_next().await {
            joined.map_err(|e| CrawlError::Worker(e.to_string()))?;
        }

        let stats = self.shared.writer.lock().unwrap().finish()?;
        let pages_visited = self.shared.frontier.lock().unwrap().visited_count();
        let (pages_archived, pages_failed) = {
            let tally = self.shared.tally.lock().unwrap();
            (tally.archived, tally.failed)
        };

        let summary = CrawlSummary {
            pages_visited,
            pages_archived,
            pages_failed,
            blocks_written: stats.blocks,
            bytes_written: stats.bytes,
            elapsed: start.elapsed(),
        };

        tracing::info!(
            "Crawl complete: {} pages visited, {} archived, {} failed, {} blocks ({} bytes) in {:?}",
            summary.pages_visited,
            summary.pages_archived,
            summary.pages_failed,
            summary.blocks_written,
            summary.bytes_written,
            summary.elapsed
        );

        Ok(summary)
    }
}

/// Worker loop: claim, fetch, process, repeat until the frontier is drained
async fn worker(shared: Arc<Shared>) {
    loop {
        let claim = shared.frontier.lock().unwrap().claim();
        match claim {
            Claim::Url(url) => process_url(&shared, url).await,
            Claim::Wait => tokio::time::sleep(IDLE_WAIT).await,
            Claim::Exhausted => break,
        }
    }
}

/// Fetches and processes one URL; never lets a failure escape
async fn process_url(shared: &Shared, url: Url) {
    shared.gate.wait().await;

    tracing::debug!("Fetching {}", url);
    let result = fetch_with_retry(&shared.client, &url, shared.max_retries).await;

    // Visited regardless of outcome: a failing URL is never retried within
    // the run beyond the fetcher's own transient-retry budget
    let visited_count = {
        let mut frontier = shared.frontier.lock().unwrap();
        frontier.mark_visited(url.clone());
        frontier.visited_count()
    };

    match result {
        Ok(page) => {
            let processed = process_document(
                &page.body,
                &page.final_url,
                &shared.filter,
                shared.extractor.as_ref(),
            );

            let new_links = shared.frontier.lock().unwrap().offer(processed.links);

            let content = PageContent::new(url.clone(), processed.blocks);
            if content.is_empty() {
                tracing::info!("Visited {} - no substantive content", url);
            } else {
                let block_count = content.blocks.len();
                let write_result = shared.writer.lock().unwrap().append_page(&content);
                match write_result {
                    Ok(()) => {
                        shared.tally.lock().unwrap().archived += 1;
                        tracing::info!(
                            "Archived {} ({} blocks, {} new links){}",
                            url,
                            block_count,
                            new_links,
                            processed
                                .title
                                .map(|t| format!(" - {}", t))
                                .unwrap_or_default()
                        );
                    }
                    Err(e) => {
                        tracing::error!("Failed to write archive entry for {}: {}", url, e);
                    }
                }
            }
        }
        Err(failure) => {
            shared.tally.lock().unwrap().failed += 1;
            tracing::warn!("Failed {}: {}", url, failure);
        }
    }

    if visited_count % PROGRESS_INTERVAL == 0 {
        let pending = shared.frontier.lock().unwrap().pending_count();
        tracing::info!("Progress: {} pages visited, {} pending", visited_count, pending);
    }
}

/// Everything extracted from one fetched page
struct ProcessedDocument {
    title: Option<String>,
    blocks: Vec<String>,
    links: Vec<Url>,
}

/// Parses a page body once and runs both extractors over it
///
/// Synchronous on purpose: the parsed document must not live across an
/// await point. An unparseable body degrades to zero blocks and zero links.
fn process_document(
    body: &str,
    base_url: &Url,
    filter: &ScopeFilter,
    extractor: &dyn ExtractContent,
) -> ProcessedDocument {
    let document = Html::parse_document(body);
    let parsed = parse_page(&document, base_url, filter);
    let blocks = extractor.extract_blocks(&document);

    ProcessedDocument {
        title: parsed.title,
        blocks,
        links: parsed.links,
    }
}
