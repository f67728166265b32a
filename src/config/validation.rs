use crate::config::types::{ApiConfig, Config, CrawlerConfig, StorageConfig};
use crate::models::Candidate;
use crate::ConfigError;
use url::Url;

/// Largest page size the timeline endpoint accepts
const MAX_TIMELINE_LIMIT: u32 = 200;

/// Upper bound on concurrent workers
const MAX_WORKERS: usize = 32;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_crawler_config(&config.crawler)?;
    validate_storage_config(&config.storage)?;
    validate_seed_handles(&config.seeds.handles)?;
    Ok(())
}

/// Validates remote API configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url).map_err(|e| {
        ConfigError::Validation(format!("Invalid api base '{}': {}", config.base_url, e))
    })?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::Validation(format!(
            "Api base '{}' must use http or https",
            config.base_url
        )));
    }

    if config.request_timeout_secs == 0 || config.token_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request and token timeouts must be at least 1 second".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawl behavior configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.target_language.is_empty()
        || !config
            .target_language
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "target_language must be a language tag like 'zh', got '{}'",
            config.target_language
        )));
    }

    // A threshold of 1.0 could never be exceeded
    if !(0.0..1.0).contains(&config.threshold) {
        return Err(ConfigError::Validation(format!(
            "threshold must be in [0, 1), got {}",
            config.threshold
        )));
    }

    if !(0.0..1.0).contains(&config.script_share) {
        return Err(ConfigError::Validation(format!(
            "script_share must be in [0, 1), got {}",
            config.script_share
        )));
    }

    if config.sample_size < 1 {
        return Err(ConfigError::Validation(format!(
            "sample_size must be >= 1, got {}",
            config.sample_size
        )));
    }

    if config.timeline_limit < 1 || config.timeline_limit > MAX_TIMELINE_LIMIT {
        return Err(ConfigError::Validation(format!(
            "timeline_limit must be between 1 and {}, got {}",
            MAX_TIMELINE_LIMIT, config.timeline_limit
        )));
    }

    if config.pass_size < 1 {
        return Err(ConfigError::Validation(format!(
            "pass_size must be >= 1, got {}",
            config.pass_size
        )));
    }

    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    Ok(())
}

/// Validates store locations
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.frontier_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "frontier_path cannot be empty".to_string(),
        ));
    }

    if config.frontier_name.is_empty()
        || !config
            .frontier_name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "frontier_name must contain only alphanumeric characters, '-' and '_', got '{}'",
            config.frontier_name
        )));
    }

    Ok(())
}

/// Validates inline seed handles
fn validate_seed_handles(handles: &[String]) -> Result<(), ConfigError> {
    for handle in handles {
        handle
            .parse::<Candidate>()
            .map_err(|e| ConfigError::Validation(format!("Invalid seed: {}", e)))?;
    }
    Ok(())
}
