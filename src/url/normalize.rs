use crate::UrlError;
use url::Url;

/// Normalizes a URL string according to Papyrus's normalization rules
///
/// Two URLs that denote the same resource must compare equal after
/// normalization; every URL is normalized before it enters any frontier set.
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or non-HTTP(S)
/// 2. Remove the fragment (everything after #)
/// 3. Remove the trailing slash from the path (except for the root /)
/// 4. Sort query parameters alphabetically by key
/// 5. Remove an empty query string (trailing ?)
///
/// Host case and dot segments (`.` and `..`) are normalized by the `url`
/// crate at parse time. Query parameters are kept: URLs with different query
/// strings are distinct resources.
///
/// Normalization is idempotent: `normalize(normalize(u)) == normalize(u)`.
///
/// # Examples
///
/// ```
/// use papyrus::url::normalize_url;
///
/// let url = normalize_url("https://example.org/page/#section").unwrap();
/// assert_eq!(url.as_str(), "https://example.org/page");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(normalize(url))
}

/// Normalizes an already-parsed URL
///
/// Used on link-extractor output, where relative references have been joined
/// against a base URL and are known to be well-formed.
pub fn normalize(mut url: Url) -> Url {
    url.set_fragment(None);

    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        url.set_path(&trimmed);
    }

    if url.query().is_some() {
        let mut params: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        params.sort();

        if params.is_empty() {
            url.set_query(None);
        } else {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params)
                .finish();
            url.set_query(Some(&query));
        }
    }

    url
}
