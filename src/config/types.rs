use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Langscout
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub crawler: CrawlerConfig,
    pub storage: StorageConfig,
    pub seeds: SeedConfig,
}

/// Remote API access configuration
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL of the API, without trailing slash
    pub base_url: String,

    /// Client-credential key
    pub consumer_key: String,

    /// Client-credential secret
    pub consumer_secret: String,

    /// Timeout for timeline, profile and follower calls (seconds)
    pub request_timeout_secs: u64,

    /// Timeout for the token exchange (seconds)
    pub token_timeout_secs: u64,
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn token_timeout(&self) -> Duration {
        Duration::from_secs(self.token_timeout_secs)
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("consumer_key", &"<redacted>")
            .field("consumer_secret", &"<redacted>")
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("token_timeout_secs", &self.token_timeout_secs)
            .finish()
    }
}

/// Crawl behavior configuration
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Language tag an account must predominantly post in
    pub target_language: String,

    /// Share of matching posts an account must exceed to be accepted
    pub threshold: f64,

    /// Share of a post's letters a script must exceed to classify the post
    pub script_share: f64,

    /// Global backoff after a rate-limit signal (seconds)
    pub cooldown_secs: u64,

    /// Sleep when the frontier is empty and nothing could be re-seeded (seconds)
    pub idle_secs: u64,

    /// Maximum number of followers offered per accepted account
    pub sample_size: usize,

    /// Number of posts requested per timeline fetch
    pub timeline_limit: u32,

    /// Maximum number of candidates drawn per pass
    pub pass_size: usize,

    /// Number of concurrent workers in a pass
    pub workers: usize,
}

impl CrawlerConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    pub fn idle(&self) -> Duration {
        Duration::from_secs(self.idle_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            target_language: "zh".to_string(),
            threshold: 0.3,
            script_share: 0.3,
            cooldown_secs: 300,
            idle_secs: 60,
            sample_size: 10,
            timeline_limit: 200,
            pass_size: 1000,
            workers: 1,
        }
    }
}

/// Store locations
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Path to the SQLite archive of accepted accounts and posts
    pub database_path: PathBuf,

    /// Path to the SQLite file holding the frontier and confirmed sets
    pub frontier_path: PathBuf,

    /// Name of the frontier set inside the frontier store
    pub frontier_name: String,
}

/// Cold-start seed sources
#[derive(Debug, Clone, Default)]
pub struct SeedConfig {
    /// Handles given inline
    pub handles: Vec<String>,

    /// File with one handle per line
    pub file: Option<PathBuf>,
}

impl SeedConfig {
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty() && self.file.is_none()
    }
}
