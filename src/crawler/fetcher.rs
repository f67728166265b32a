//! Remote account API client
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client
//! - Bearer token handling (see `token`)
//! - Timeline, profile and follower-ID requests
//! - Error classification into rate limited / not found / other

use crate::config::ApiConfig;
use crate::crawler::token::TokenSource;
use crate::models::{AccountRecord, Candidate, Post, PostBatch};
use crate::{FetchError, FetchResult};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

/// Legacy rate-limit status ("Enhance Your Calm") still sent by some endpoints
const STATUS_ENHANCE_YOUR_CALM: u16 = 420;

/// Read access to the remote social graph
///
/// `FetchError::RateLimited` must be returned for throttling so the crawl can
/// enter its global cooldown; every other failure only affects one candidate.
pub trait AccountApi: Send + Sync {
    /// Fetches up to `limit` most recent posts
    fn fetch_timeline(
        &self,
        candidate: &Candidate,
        limit: u32,
    ) -> impl Future<Output = FetchResult<PostBatch>> + Send;

    /// Fetches the account's profile
    fn fetch_profile(
        &self,
        candidate: &Candidate,
    ) -> impl Future<Output = FetchResult<AccountRecord>> + Send;

    /// Fetches the numeric IDs of the account's followers, in API order
    fn fetch_follower_ids(
        &self,
        candidate: &Candidate,
    ) -> impl Future<Output = FetchResult<Vec<u64>>> + Send;
}

#[derive(Debug, Deserialize)]
struct FollowerIds {
    ids: Vec<u64>,
}

/// Builds the HTTP client shared by token exchange and API calls
///
/// Per-call timeouts are set on each request; this only bounds connecting.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!("langscout/{}", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Maps an HTTP status to the crawl's error taxonomy
pub(crate) fn classify_status(status: StatusCode, context: &str) -> FetchResult<()> {
    if status.is_success() {
        return Ok(());
    }

    if status == StatusCode::TOO_MANY_REQUESTS || status.as_u16() == STATUS_ENHANCE_YOUR_CALM {
        return Err(FetchError::RateLimited);
    }

    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::NotFound(context.to_string()));
    }

    Err(FetchError::Remote(format!("HTTP {} from {}", status.as_u16(), context)))
}

/// Maps a transport failure to the crawl's error taxonomy
pub(crate) fn classify_transport(error: reqwest::Error, context: &str) -> FetchError {
    if error.is_timeout() {
        FetchError::Remote(format!("Request timeout for {}", context))
    } else if error.is_connect() {
        FetchError::Remote(format!("Connection failed for {}", context))
    } else {
        FetchError::Remote(format!("{} failed: {}", context, error))
    }
}

/// HTTP implementation of [`AccountApi`]
pub struct ApiClient {
    http: Client,
    base_url: String,
    request_timeout: Duration,
    token: TokenSource,
}

impl ApiClient {
    /// Creates a client from the API configuration
    ///
    /// # Example
    ///
    /// ```no_run
    /// use langscout::config::ApiConfig;
    /// use langscout::crawler::ApiClient;
    ///
    /// let config = ApiConfig {
    ///     base_url: "https://api.twitter.com".to_string(),
    ///     consumer_key: "key".to_string(),
    ///     consumer_secret: "secret".to_string(),
    ///     request_timeout_secs: 10,
    ///     token_timeout_secs: 3,
    /// };
    ///
    /// let client = ApiClient::new(&config).unwrap();
    /// ```
    pub fn new(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        let http = build_http_client()?;
        let token = TokenSource::new(
            http.clone(),
            format!("{}/oauth2/token", config.base_url),
            config.consumer_key.clone(),
            config.consumer_secret.clone(),
            config.token_timeout(),
        );

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            request_timeout: config.request_timeout(),
            token,
        })
    }

    /// Performs an authenticated GET and decodes the JSON body
    ///
    /// A 401 means the cached token went bad; it is discarded and the call
    /// is retried once with a fresh one.
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> FetchResult<serde_json::Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut retried = false;

        loop {
            let token = self.token.get().await?;

            let response = self
                .http
                .get(&url)
                .bearer_auth(&token)
                .query(query)
                .timeout(self.request_timeout)
                .send()
                .await
                .map_err(|e| classify_transport(e, path))?;

            let status = response.status();
            if status == StatusCode::UNAUTHORIZED && !retried {
                self.token.invalidate(&token).await;
                retried = true;
                continue;
            }

            classify_status(status, path)?;

            return response
                .json()
                .await
                .map_err(|e| FetchError::Remote(format!("Malformed response from {}: {}", path, e)));
        }
    }
}

impl AccountApi for ApiClient {
    async fn fetch_timeline(&self, candidate: &Candidate, limit: u32) -> FetchResult<PostBatch> {
        let (key, value) = candidate.query_param();
        let body = self
            .get_json(
                "/1.1/statuses/user_timeline.json",
                &[
                    ("count", limit.to_string()),
                    (key, value),
                    ("tweet_mode", "extended".to_string()),
                ],
            )
            .await?;

        let serde_json::Value::Array(items) = body else {
            return Err(FetchError::Remote(format!(
                "Timeline for {} is not a list",
                candidate
            )));
        };

        let total = items.len();
        let posts: PostBatch = items.into_iter().filter_map(Post::from_json).collect();
        if posts.len() < total {
            tracing::debug!(
                "Dropped {} unreadable posts from {}",
                total - posts.len(),
                candidate
            );
        }

        Ok(posts)
    }

    async fn fetch_profile(&self, candidate: &Candidate) -> FetchResult<AccountRecord> {
        let (key, value) = candidate.query_param();
        let body = self
            .get_json("/1.1/users/show.json", &[(key, value)])
            .await?;

        AccountRecord::from_json(body)
            .ok_or_else(|| FetchError::Remote(format!("Malformed profile for {}", candidate)))
    }

    async fn fetch_follower_ids(&self, candidate: &Candidate) -> FetchResult<Vec<u64>> {
        let (key, value) = candidate.query_param();
        let body = self
            .get_json("/1.1/followers/ids.json", &[(key, value)])
            .await?;

        let followers: FollowerIds = serde_json::from_value(body).map_err(|e| {
            FetchError::Remote(format!("Malformed follower list for {}: {}", candidate, e))
        })?;

        Ok(followers.ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client().is_ok());
    }

    #[test]
    fn test_classify_status() {
        assert!(classify_status(StatusCode::OK, "x").is_ok());
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, "x"),
            Err(FetchError::RateLimited)
        ));
        assert!(matches!(
            classify_status(StatusCode::from_u16(420).unwrap(), "x"),
            Err(FetchError::RateLimited)
        ));
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, "x"),
            Err(FetchError::NotFound(_))
        ));
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, "x"),
            Err(FetchError::Remote(_))
        ));
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, "x"),
            Err(FetchError::Remote(_))
        ));
    }

    // Request-level behavior is exercised against wiremock in tests/integration
}
