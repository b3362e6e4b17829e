//! Archive file writer
//!
//! Serializes accumulated page content to the single output text file. Each
//! page that yielded content gets an entry, in visit order:
//!
//! ```text
//! ================================================================================
//! URL: https://example.org/page
//! ================================================================================
//!
//! first block
//!
//! second block
//! ```
//!
//! Entries are separated by one blank line. Writes are buffered and flushed
//! every `flush_every_pages` pages, so a killed process loses at most one
//! flush interval of content.

use crate::output::archive::{ArchiveStats, PageContent};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Width of the `=` delimiter lines framing each entry's URL
const DELIMITER_WIDTH: usize = 80;

/// Incremental writer for the archive file
pub struct ArchiveWriter {
    writer: BufWriter<File>,
    flush_every_pages: u32,
    pages_since_flush: u32,
    stats: ArchiveStats,
}

impl ArchiveWriter {
    /// Creates the archive file, truncating any existing one
    ///
    /// An unwritable path fails here, before any network activity.
    pub fn create(path: &Path, flush_every_pages: u32) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            flush_every_pages,
            pages_since_flush: 0,
            stats: ArchiveStats::default(),
        })
    }

    /// Appends one page's entry to the archive
    ///
    /// Pages without blocks are skipped silently — a page that yielded no
    /// content leaves no entry.
    pub fn append_page(&mut self, page: &PageContent) -> io::Result<()> {
        if page.is_empty() {
            return Ok(());
        }

        let entry = format_entry(page);
        self.writer.write_all(entry.as_bytes())?;

        self.stats.pages += 1;
        self.stats.blocks += page.blocks.len() as u64;
        self.stats.bytes += entry.len() as u64;

        self.pages_since_flush += 1;
        if self.pages_since_flush >= self.flush_every_pages {
            self.writer.flush()?;
            self.pages_since_flush = 0;
        }

        Ok(())
    }

    /// Flushes everything to disk and returns the final totals
    pub fn finish(&mut self) -> io::Result<ArchiveStats> {
        self.writer.flush()?;
        Ok(self.stats)
    }

    pub fn stats(&self) -> ArchiveStats {
        self.stats
    }
}

/// Formats one page's archive entry
fn format_entry(page: &PageContent) -> String {
    let delimiter = "=".repeat(DELIMITER_WIDTH);
    let mut entry = String::new();

    entry.push_str(&delimiter);
    entry.push('\n');
    entry.push_str("URL: ");
    entry.push_str(page.url.as_str());
    entry.push('\n');
    entry.push_str(&delimiter);
    entry.push_str("\n\n");

    for (i, block) in page.blocks.iter().enumerate() {
        if i > 0 {
            entry.push('\n');
        }
        entry.push_str(&block.text);
        entry.push('\n');
    }
    entry.push('\n');

    entry
}
