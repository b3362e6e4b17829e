//! URL handling module for Papyrus
//!
//! This module provides URL normalization and crawl-scope filtering. Every
//! URL is normalized before it is compared, deduplicated, or stored, so two
//! spellings of the same resource always collapse to one frontier entry.

mod normalize;
mod scope;

// Re-export main types and functions
pub use normalize::{normalize, normalize_url};
pub use scope::{Origin, ScopeFilter};
