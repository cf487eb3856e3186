use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;

use crate::{
    config::DEFAULT_BASE_URL,
    model::{AqiPayload, Coordinates},
};

use super::AqiProvider;

/// World Air Quality Index project feed (`api.waqi.info`).
#[derive(Debug, Clone)]
pub struct WaqiProvider {
    token: String,
    base_url: String,
    http: Client,
}

impl WaqiProvider {
    pub fn new(token: String) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL.to_string())
    }

    /// `base_url` must end with a slash.
    pub fn with_base_url(token: String, base_url: String) -> Self {
        Self {
            token,
            base_url,
            http: Client::new(),
        }
    }

    fn feed_url(&self, coords: Coordinates) -> String {
        format!("{}feed/geo:{};{}/", self.base_url, coords.latitude, coords.longitude)
    }
}

#[async_trait]
impl AqiProvider for WaqiProvider {
    async fn fetch(&self, coords: Coordinates) -> Result<AqiPayload> {
        let res = self
            .http
            .get(self.feed_url(coords))
            .query(&[("token", self.token.as_str())])
            .send()
            .await
            // The url carries the token; keep it out of error messages and logs.
            .map_err(reqwest::Error::without_url)
            .context("Failed to send request to the WAQI feed")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to read WAQI feed response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "WAQI feed request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        Ok(AqiPayload::from_body(&body))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
