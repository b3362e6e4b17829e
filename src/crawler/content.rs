//! Substantive-text extraction
//!
//! A heuristic pass that separates prose from boilerplate: navigation,
//! scripts, and page chrome are excluded, block-level containers holding
//! prose become candidate blocks, and blocks below a word-count threshold
//! are discarded. Approximate by design — boilerplate over the threshold and
//! short-but-meaningful paragraphs are accepted trade-offs. The extraction
//! strategy is swappable behind [`ExtractContent`] without touching the
//! engine.

use scraper::{node::Node, ElementRef, Html, Selector};

/// Tags whose subtrees never contribute text
const NOISE_TAGS: &[&str] = &["script", "style", "header", "footer", "nav", "aside"];

/// ARIA roles treated the same as the noise tags
const NOISE_ROLES: &[&str] = &["navigation", "banner", "contentinfo", "complementary"];

/// A content-extraction strategy
///
/// One method: substantive text blocks out of one parsed document, in
/// document order. Pure — no network, no crawl state, no mutation of the
/// document.
pub trait ExtractContent {
    fn extract_blocks(&self, document: &Html) -> Vec<String>;
}

/// The default heuristic: block containers, prose requirement, word-count
/// threshold
#[derive(Debug, Clone)]
pub struct ThresholdExtractor {
    /// Minimum word count for a block to be kept (inclusive)
    pub min_words: usize,
}

impl ThresholdExtractor {
    pub fn new(min_words: usize) -> Self {
        Self { min_words }
    }
}

impl ExtractContent for ThresholdExtractor {
    fn extract_blocks(&self, document: &Html) -> Vec<String> {
        extract_blocks(document, self.min_words)
    }
}

/// Extracts substantive text blocks from a parsed document
///
/// # Algorithm
///
/// 1. Candidate containers are the block-level structural elements
///    (`div`, `section`, `article`, `main`), in document order.
/// 2. Containers inside a noise subtree (or that are noise themselves, via
///    a `role` attribute) are skipped.
/// 3. A container qualifies only if it contains at least one prose-bearing
///    element (`p`, `h1`-`h6`, `li`).
/// 4. Its visible text is collected with element boundaries as newlines,
///    noise subtrees skipped, each text node trimmed.
/// 5. Blocks with at least `min_words` words survive (boundary inclusive).
///
/// Nested containers may each yield a block, the outer one subsuming the
/// inner text. A document that fails to parse as HTML simply yields no
/// blocks.
pub fn extract_blocks(document: &Html, min_words: usize) -> Vec<String> {
    let container_selector = match Selector::parse("div, section, article, main") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };
    let prose_selector = match Selector::parse("p, h1, h2, h3, h4, h5, h6, li") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let mut blocks = Vec::new();

    for container in document.select(&container_selector) {
        if is_noise(container) || in_noise_subtree(container) {
            continue;
        }

        // Containers without any prose element are layout, not content
        if container.select(&prose_selector).next().is_none() {
            continue;
        }

        let text = block_text(container);
        if text.split_whitespace().count() >= min_words {
            blocks.push(text);
        }
    }

    blocks
}

/// Whether an element is a non-content element by tag or role
fn is_noise(element: ElementRef<'_>) -> bool {
    let value = element.value();
    if NOISE_TAGS.contains(&value.name()) {
        return true;
    }
    value
        .attr("role")
        .map(|role| NOISE_ROLES.iter().any(|n| role.eq_ignore_ascii_case(n)))
        .unwrap_or(false)
}

/// Whether any ancestor of the element is a noise element
fn in_noise_subtree(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(is_noise)
}

/// Collects the visible text of a container, newline-separated
fn block_text(element: ElementRef<'_>) -> String {
    let mut parts = Vec::new();
    collect_text(element, &mut parts);
    parts.join("\n")
}

fn collect_text(element: ElementRef<'_>, parts: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.text.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed.to_string());
                }
            }
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    if !is_noise(child_element) {
                        collect_text(child_element, parts);
                    }
                }
            }
            _ => {}
        }
    }
}
