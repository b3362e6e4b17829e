//! Archive data types
//!
//! The archive is an ordered sequence of content blocks, each tagged with
//! the URL it came from. Blocks within a page keep document order; pages
//! keep visit order.

use url::Url;

/// One unit of extracted substantive text
///
/// Immutable once created. `block_index` is the block's position within its
/// source page, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    pub source_url: Url,
    pub text: String,
    pub block_index: usize,
}

/// All content blocks extracted from a single page
#[derive(Debug, Clone)]
pub struct PageContent {
    pub url: Url,
    pub blocks: Vec<ContentBlock>,
}

impl PageContent {
    /// Wraps extracted block texts with their source URL and indices
    pub fn new(url: Url, texts: Vec<String>) -> Self {
        let blocks = texts
            .into_iter()
            .enumerate()
            .map(|(block_index, text)| ContentBlock {
                source_url: url.clone(),
                text,
                block_index,
            })
            .collect();
        Self { url, blocks }
    }

    /// True if the page yielded no substantive content
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Running totals for the written archive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    /// Pages that yielded content and were written
    pub pages: u64,

    /// Total content blocks written
    pub blocks: u64,

    /// Total bytes written to the archive file
    pub bytes: u64,
}
