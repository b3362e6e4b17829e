use crate::config::types::{Config, CrawlConfig, OutputConfig, ScopeConfig, UserAgentConfig};
use crate::url::Origin;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_scope_config(&config.scope)?;
    validate_output_config(&config.output)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_seed_in_scope(config)?;
    Ok(())
}

/// Validates crawl behavior configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    Url::parse(&config.seed_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed-url '{}': {}", config.seed_url, e)))?;

    if config.fetch_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "fetch-timeout-secs must be >= 1, got {}",
            config.fetch_timeout_secs
        )));
    }

    if config.workers < 1 || config.workers > 64 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 64, got {}",
            config.workers
        )));
    }

    Ok(())
}

/// Validates scope configuration
fn validate_scope_config(config: &ScopeConfig) -> Result<(), ConfigError> {
    Origin::parse(&config.origin)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid origin '{}': {}", config.origin, e)))?;

    for prefix in &config.excluded_prefixes {
        if !prefix.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "Excluded prefix '{}' must start with '/'",
                prefix
            )));
        }
    }

    for ext in &config.excluded_extensions {
        if !ext.starts_with('.') || ext.len() < 2 {
            return Err(ConfigError::Validation(format!(
                "Excluded extension '{}' must start with '.' followed by at least one character",
                ext
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.archive_path.is_empty() {
        return Err(ConfigError::Validation(
            "archive-path cannot be empty".to_string(),
        ));
    }

    if config.flush_every_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "flush-every-pages must be >= 1, got {}",
            config.flush_every_pages
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    Ok(())
}

/// Checks that the seed URL actually falls inside the configured scope
///
/// A seed outside its own origin would produce an immediately empty crawl,
/// which is always a configuration mistake.
fn validate_seed_in_scope(config: &Config) -> Result<(), ConfigError> {
    let origin = Origin::parse(&config.scope.origin)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid origin: {}", e)))?;
    let seed = crate::url::normalize_url(&config.crawl.seed_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed-url: {}", e)))?;

    if !origin.matches(&seed) {
        return Err(ConfigError::Validation(format!(
            "seed-url '{}' is not on the configured origin '{}'",
            config.crawl.seed_url, config.scope.origin
        )));
    }

    Ok(())
}
