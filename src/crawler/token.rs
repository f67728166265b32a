//! Bearer token acquisition through the client-credentials exchange

use crate::crawler::fetcher::{classify_status, classify_transport};
use crate::{FetchError, FetchResult};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Caches one bearer token and re-acquires it when the API rejects it
///
/// The lock is held across the exchange so concurrent workers never request
/// more than one token at a time.
pub struct TokenSource {
    http: Client,
    token_url: String,
    consumer_key: String,
    consumer_secret: String,
    timeout: Duration,
    cached: Mutex<Option<String>>,
}

impl TokenSource {
    /// Creates a token source for the given exchange endpoint
    pub fn new(
        http: Client,
        token_url: String,
        consumer_key: String,
        consumer_secret: String,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            token_url,
            consumer_key,
            consumer_secret,
            timeout,
            cached: Mutex::new(None),
        }
    }

    /// Returns the cached token, exchanging credentials for a new one if needed
    pub async fn get(&self) -> FetchResult<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        let token = self.exchange().await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    /// Drops the cached token if it is still `stale`
    ///
    /// Another worker may already have replaced it, in which case the newer
    /// token is kept.
    pub async fn invalidate(&self, stale: &str) {
        let mut cached = self.cached.lock().await;
        if cached.as_deref() == Some(stale) {
            tracing::debug!("Discarding rejected bearer token");
            *cached = None;
        }
    }

    async fn exchange(&self) -> FetchResult<String> {
        tracing::debug!("Requesting bearer token from {}", self.token_url);

        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.consumer_key, Some(&self.consumer_secret))
            .form(&[("grant_type", "client_credentials")])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| classify_transport(e, "token exchange"))?;

        classify_status(response.status(), "token exchange")?;

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Remote(format!("malformed token response: {}", e)))?;

        Ok(body.access_token)
    }
}
