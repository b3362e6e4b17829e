use crate::config::ScopeConfig;
use crate::{UrlError, UrlResult};
use url::Url;

/// The target origin a crawl is confined to: scheme + host + effective port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl Origin {
    /// Parses an origin string such as `https://example.org` or
    /// `http://127.0.0.1:8080`
    ///
    /// Any path, query, or fragment on the string is ignored; only the
    /// scheme, host, and port are kept.
    pub fn parse(origin: &str) -> UrlResult<Self> {
        let url = Url::parse(origin).map_err(|e| UrlError::Parse(e.to_string()))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS origins are supported, got: {}",
                url.scheme()
            )));
        }

        let host = url.host_str().ok_or(UrlError::MissingHost)?.to_lowercase();

        Ok(Self {
            scheme: url.scheme().to_string(),
            host,
            port: url.port_or_known_default(),
        })
    }

    /// Checks whether a URL is on this exact origin
    pub fn matches(&self, url: &Url) -> bool {
        url.scheme() == self.scheme
            && url
                .host_str()
                .map(|h| h.eq_ignore_ascii_case(&self.host))
                .unwrap_or(false)
            && url.port_or_known_default() == self.port
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)?;
        // Only show an explicit port when it differs from the scheme default
        let default = match self.scheme.as_str() {
            "http" => Some(80),
            "https" => Some(443),
            _ => None,
        };
        if self.port != default {
            if let Some(port) = self.port {
                write!(f, ":{}", port)?;
            }
        }
        Ok(())
    }
}

/// Decides whether a candidate URL is in scope for the crawl
///
/// A pure function of the URL and static configuration: no side effects, no
/// crawl-state knowledge. Visited-set checks belong to the frontier.
#[derive(Debug, Clone)]
pub struct ScopeFilter {
    origin: Origin,
    excluded_prefixes: Vec<String>,
    excluded_extensions: Vec<String>,
}

impl ScopeFilter {
    /// Builds a filter from the scope section of the configuration
    ///
    /// Extensions are lowercased once here so the per-URL check can be
    /// case-insensitive without repeated allocation.
    pub fn from_config(config: &ScopeConfig) -> UrlResult<Self> {
        let origin = Origin::parse(&config.origin)?;

        Ok(Self {
            origin,
            excluded_prefixes: config.excluded_prefixes.clone(),
            excluded_extensions: config
                .excluded_extensions
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
        })
    }

    /// Returns the origin this filter confines the crawl to
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Checks whether a URL is in scope
    ///
    /// All three rules must hold:
    /// 1. the URL is on the target origin;
    /// 2. its path does not end with an excluded extension;
    /// 3. its path does not start with an excluded prefix.
    ///
    /// URLs differing only in query string are distinct resources and each
    /// passes or fails on its own path.
    pub fn is_in_scope(&self, url: &Url) -> bool {
        if !self.origin.matches(url) {
            return false;
        }

        let path = url.path();
        let path_lower = path.to_lowercase();

        if self
            .excluded_extensions
            .iter()
            .any(|ext| path_lower.ends_with(ext.as_str()))
        {
            return false;
        }

        if self
            .excluded_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
        {
            return false;
        }

        true
    }
}
