use crate::config::types::{ApiConfig, Config, CrawlerConfig, SeedConfig, StorageConfig};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_API_BASE: &str = "https://api.twitter.com";
const DEFAULT_DATABASE_PATH: &str = "langscout.db";
const DEFAULT_FRONTIER_PATH: &str = "frontier.db";
const DEFAULT_FRONTIER_NAME: &str = "frontier";

/// Loads and validates the configuration from the process environment
///
/// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - A required variable is missing, or a value failed to parse or validate
///
/// # Example
///
/// ```no_run
/// use langscout::config::load_config;
///
/// let config = load_config().unwrap();
/// println!("Target language: {}", config.crawler.target_language);
/// ```
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(|name| std::env::var(name).ok())
}

/// Loads and validates the configuration from an arbitrary variable lookup
///
/// Empty values are treated as unset.
pub fn load_config_from<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
    let defaults = CrawlerConfig::default();

    let api = ApiConfig {
        base_url: get("SCOUT_API_BASE")
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string(),
        consumer_key: get("CONSUMER_KEY")
            .ok_or_else(|| ConfigError::Missing("CONSUMER_KEY".to_string()))?,
        consumer_secret: get("CONSUMER_SECRET")
            .ok_or_else(|| ConfigError::Missing("CONSUMER_SECRET".to_string()))?,
        request_timeout_secs: parse_or(&get, "SCOUT_REQUEST_TIMEOUT_SECS", 10)?,
        token_timeout_secs: parse_or(&get, "SCOUT_TOKEN_TIMEOUT_SECS", 3)?,
    };

    let crawler = CrawlerConfig {
        target_language: get("SCOUT_TARGET_LANGUAGE")
            .map(|v| v.trim().to_lowercase())
            .unwrap_or(defaults.target_language),
        threshold: parse_or(&get, "SCOUT_THRESHOLD", defaults.threshold)?,
        script_share: parse_or(&get, "SCOUT_SCRIPT_SHARE", defaults.script_share)?,
        cooldown_secs: parse_or(&get, "SCOUT_COOLDOWN_SECS", defaults.cooldown_secs)?,
        idle_secs: parse_or(&get, "SCOUT_IDLE_SECS", defaults.idle_secs)?,
        sample_size: parse_or(&get, "SCOUT_SAMPLE_SIZE", defaults.sample_size)?,
        timeline_limit: parse_or(&get, "SCOUT_TIMELINE_LIMIT", defaults.timeline_limit)?,
        pass_size: parse_or(&get, "SCOUT_PASS_SIZE", defaults.pass_size)?,
        workers: parse_or(&get, "SCOUT_WORKERS", defaults.workers)?,
    };

    let storage = StorageConfig {
        database_path: get("SCOUT_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
        frontier_path: get("SCOUT_FRONTIER_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FRONTIER_PATH)),
        frontier_name: get("SCOUT_FRONTIER_NAME")
            .unwrap_or_else(|| DEFAULT_FRONTIER_NAME.to_string()),
    };

    let seeds = SeedConfig {
        handles: get("SCOUT_SEEDS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        file: get("SCOUT_SEED_FILE").map(PathBuf::from),
    };

    let config = Config {
        api,
        crawler,
        storage,
        seeds,
    };

    validate(&config)?;

    Ok(config)
}

fn parse_or<T, G>(get: &G, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name: name.to_string(),
            value: raw,
        }),
    }
}

/// Computes a SHA-256 fingerprint of the non-secret settings
///
/// Logged at startup so log lines from different runs can be tied to the
/// configuration they ran with. Credentials never enter the hash.
pub fn config_fingerprint(config: &Config) -> String {
    let c = &config.crawler;
    let s = &config.storage;
    let material = format!(
        "{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}",
        config.api.base_url,
        c.target_language,
        c.threshold,
        c.script_share,
        c.cooldown_secs,
        c.idle_secs,
        c.sample_size,
        c.timeline_limit,
        c.pass_size,
        c.workers,
        s.database_path.display(),
        s.frontier_path.display(),
        s.frontier_name,
    );

    let mut hasher = Sha256::new();
    hasher.update(material.as_bytes());
    hex::encode(hasher.finalize())
}
