use crate::config::settings::HttpSettings;
use crate::rate_limiter::RateLimiter;
use anyhow::{Context, Result};
use reqwest::header::HeaderMap;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// HTTP client with built-in rate limiting, safe to share between tasks
pub struct RateLimitedClient {
    client: Client,
    rate_limiter: RateLimiter,
}

impl RateLimitedClient {
    pub fn new(settings: &HttpSettings, default_headers: HeaderMap) -> Result<Self> {
        let client = Self::build_client(settings, default_headers)?;
        let rate_limiter = RateLimiter::new(settings.rate_limit_ms);

        Ok(Self {
            client,
            rate_limiter,
        })
    }

    pub async fn get(&self, url: &str) -> Result<reqwest::Response> {
        self.rate_limiter.wait().await;
        self.send_get_request(url).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<reqwest::Response> {
        self.rate_limiter.wait().await;
        self.client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send POST request")
    }

    fn build_client(settings: &HttpSettings, default_headers: HeaderMap) -> Result<Client> {
        Client::builder()
            .user_agent(settings.user_agent.as_str())
            .default_headers(default_headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }

    async fn send_get_request(&self, url: &str) -> Result<reqwest::Response> {
        self.client
            .get(url)
            .send()
            .await
            .context("Failed to send GET request")
    }
}
