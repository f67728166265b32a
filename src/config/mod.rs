//! Configuration module for Langscout
//!
//! Configuration comes from the process environment. `main` loads a `.env`
//! file first, so the same variables can live there during development.
//!
//! # Example
//!
//! ```no_run
//! use langscout::config::load_config;
//!
//! let config = load_config().unwrap();
//! println!("Cooldown after rate limiting: {}s", config.crawler.cooldown_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ApiConfig, Config, CrawlerConfig, SeedConfig, StorageConfig};

// Re-export parser functions
pub use parser::{config_fingerprint, load_config, load_config_from};
pub use validation::validate;
