//! Shared fixtures for the integration tests

use langscout::config::{ApiConfig, Config, CrawlerConfig, SeedConfig, StorageConfig};
use serde_json::{json, Value};
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at a mock API and a scratch directory
pub fn create_test_config(base_url: &str, dir: &Path) -> Config {
    Config {
        api: ApiConfig {
            base_url: base_url.to_string(),
            consumer_key: "test-key".to_string(),
            consumer_secret: "test-secret".to_string(),
            request_timeout_secs: 5,
            token_timeout_secs: 3,
        },
        crawler: CrawlerConfig {
            target_language: "zh".to_string(),
            threshold: 0.3,
            script_share: 0.3,
            cooldown_secs: 300,
            idle_secs: 60,
            sample_size: 10,
            timeline_limit: 200,
            pass_size: 100,
            workers: 1,
        },
        storage: StorageConfig {
            database_path: dir.join("archive.db"),
            frontier_path: dir.join("frontier.db"),
            frontier_name: "test".to_string(),
        },
        seeds: SeedConfig::default(),
    }
}

/// Mounts a token endpoint that always hands out `token`
pub async fn mount_token(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "bearer",
            "access_token": token
        })))
        .mount(server)
        .await;
}

pub fn profile(id: u64, handle: &str) -> Value {
    json!({
        "id": id,
        "id_str": id.to_string(),
        "screen_name": handle,
        "protected": false
    })
}

/// A timeline of `total` posts, the first `chinese` of them in Chinese
pub fn timeline(account_id: u64, chinese: usize, total: usize) -> Value {
    let posts: Vec<Value> = (0..total)
        .map(|i| {
            let text = if i < chinese {
                "今天天气很好，我们去公园散步吧"
            } else {
                "What a lovely day for a walk in the park"
            };
            json!({
                "id_str": format!("{}{:03}", account_id, i),
                "full_text": text,
                "user": { "id": account_id }
            })
        })
        .collect();
    Value::Array(posts)
}
