use anyhow::{Context, Result};
use log::info;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;

use crate::config::settings::SchoolSettings;
use crate::domain::{SchoolCredentials, SchoolDirectory, SchoolUser};
use crate::errors::{fetch_context, parse_context};
use crate::http::RateLimitedClient;

/// School SSO client
pub struct SchoolClient {
    client: RateLimitedClient,
    base_url: String,
}

impl SchoolClient {
    pub fn new(settings: &SchoolSettings) -> Result<Self> {
        let client = RateLimitedClient::new(&settings.http, HeaderMap::new())?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn user_data_url(&self) -> String {
        format!("{}/user/user-data", self.base_url)
    }
}

impl SchoolDirectory for SchoolClient {
    async fn authenticate(&self, credentials: &SchoolCredentials) -> Result<Option<SchoolUser>> {
        let url = self.user_data_url();
        let response = self
            .client
            .post_json(&url, credentials)
            .await
            .with_context(|| fetch_context(&url))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND => {
                info!("School SSO rejected login for {}", credentials.account_id);
                Ok(None)
            }
            status if status.is_success() => {
                let user = response
                    .json::<SchoolUser>()
                    .await
                    .with_context(|| parse_context("school user"))?;
                Ok(Some(user))
            }
            status => anyhow::bail!("School SSO returned status {}", status),
        }
    }
}
