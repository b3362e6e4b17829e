//! HTML parsing for link discovery
//!
//! Extracts the page title and the set of in-scope links a page references.
//! Links are resolved against the page's base URL, normalized, and filtered
//! through the scope filter. A link is never rejected here for having been
//! visited already — that check belongs to the frontier.

use crate::url::{normalize, ScopeFilter};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracted navigation information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title (from the <title> tag), for progress logging
    pub title: Option<String>,

    /// In-scope absolute links, normalized and deduplicated, document order
    pub links: Vec<Url>,
}

/// Parses a page for its title and in-scope links
pub fn parse_page(document: &Html, base_url: &Url, filter: &ScopeFilter) -> ParsedPage {
    ParsedPage {
        title: extract_title(document),
        links: extract_links(document, base_url, filter),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts all in-scope links from the HTML document
///
/// # Link Extraction Rules
///
/// **Include:** `<a href="...">` anywhere in the document, resolved against
/// `base_url`, normalized, and passing the scope filter.
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links (same-page anchors)
/// - Anything the scope filter rejects (other origins, excluded
///   extensions/prefixes)
pub fn extract_links(document: &Html, base_url: &Url, filter: &ScopeFilter) -> Vec<Url> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            // Skip if it has the download attribute
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(resolved) = resolve_link(href, base_url) {
                    let normalized = normalize(resolved);
                    if filter.is_in_scope(&normalized) && seen.insert(normalized.clone()) {
                        links.push(normalized);
                    }
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Invalid URLs or non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    // Fragment-only links point back into the same page
    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url)
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScopeConfig;

    fn base_url() -> Url {
        Url::parse("https://example.org/page").unwrap()
    }

    fn filter() -> ScopeFilter {
        ScopeFilter::from_config(&ScopeConfig {
            origin: "https://example.org".to_string(),
            excluded_prefixes: vec!["/scans/".to_string()],
            excluded_extensions: vec![".pdf".to_string()],
        })
        .unwrap()
    }

    fn links_of(html: &str) -> Vec<Url> {
        let document = Html::parse_document(html);
        extract_links(&document, &base_url(), &filter())
    }

    #[test]
    fn test_extract_title() {
        let html = r#"<html><head><title>  Test Page  </title></head><body></body></html>"#;
        let document = Html::parse_document(html);
        let parsed = parse_page(&document, &base_url(), &filter());
        assert_eq!(parsed.title, Some("Test Page".to_string()));
    }

    #[test]
    fn test_no_title() {
        let html = r#"<html><head></head><body></body></html>"#;
        let document = Html::parse_document(html);
        assert_eq!(extract_title(&document), None);
    }

    #[test]
    fn test_extract_relative_link() {
        let links = links_of(r#"<html><body><a href="/other">Link</a></body></html>"#);
        assert_eq!(links, vec![Url::parse("https://example.org/other").unwrap()]);
    }

    #[test]
    fn test_extract_relative_path_link() {
        let links = links_of(r#"<html><body><a href="other">Link</a></body></html>"#);
        assert_eq!(links, vec![Url::parse("https://example.org/other").unwrap()]);
    }

    #[test]
    fn test_out_of_scope_link_filtered() {
        let links = links_of(r#"<html><body><a href="https://other.org/page">Link</a></body></html>"#);
        assert!(links.is_empty());
    }

    #[test]
    fn test_excluded_extension_filtered() {
        let links = links_of(r#"<html><body><a href="/book.pdf">PDF</a></body></html>"#);
        assert!(links.is_empty());
    }

    #[test]
    fn test_excluded_prefix_filtered() {
        let links = links_of(r#"<html><body><a href="/scans/page1.html">Scan</a></body></html>"#);
        assert!(links.is_empty());
    }

    #[test]
    fn test_skip_javascript_link() {
        let links = links_of(r#"<html><body><a href="javascript:void(0)">Link</a></body></html>"#);
        assert!(links.is_empty());
    }

    #[test]
    fn test_skip_mailto_link() {
        let links = links_of(r#"<html><body><a href="mailto:a@example.org">Email</a></body></html>"#);
        assert!(links.is_empty());
    }

    #[test]
    fn test_skip_tel_link() {
        let links = links_of(r#"<html><body><a href="tel:+1234567890">Call</a></body></html>"#);
        assert!(links.is_empty());
    }

    #[test]
    fn test_skip_data_uri() {
        let links = links_of(r#"<html><body><a href="data:text/html,<h1>x</h1>">Data</a></body></html>"#);
        assert!(links.is_empty());
    }

    #[test]
    fn test_skip_download_link() {
        let links = links_of(r#"<html><body><a href="/file.html" download>Download</a></body></html>"#);
        assert!(links.is_empty());
    }

    #[test]
    fn test_skip_fragment_only() {
        let links = links_of(r##"<html><body><a href="#section">Jump</a></body></html>"##);
        assert!(links.is_empty());
    }

    #[test]
    fn test_links_normalized_and_deduplicated() {
        let links = links_of(
            r##"<html><body>
            <a href="/other/">Trailing slash</a>
            <a href="/other">Plain</a>
            <a href="/other#frag">Fragment</a>
            </body></html>"##,
        );
        assert_eq!(links, vec![Url::parse("https://example.org/other").unwrap()]);
    }

    #[test]
    fn test_query_variants_both_kept() {
        let links = links_of(
            r#"<html><body>
            <a href="/page?id=1">One</a>
            <a href="/page?id=2">Two</a>
            </body></html>"#,
        );
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn test_mixed_valid_and_invalid_links() {
        let links = links_of(
            r#"<html><body>
            <a href="/valid">Valid</a>
            <a href="javascript:alert('no')">Invalid</a>
            <a href="https://elsewhere.net/x">Out of scope</a>
            <a href="/another-valid">Valid</a>
            </body></html>"#,
        );
        assert_eq!(links.len(), 2);
    }
}
