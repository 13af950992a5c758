// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! HTTP client for a running scrape-agent server.

use crate::models::scrape::{ErrorResponse, ScrapeRequest, ScrapeResponse};
use anyhow::{anyhow, Context, Result};
use std::time::Duration;
use url::Url;

/// Long enough to cover the server's own fetch timeout.
const API_TIMEOUT: Duration = Duration::from_secs(60);

pub struct ApiClient {
    base_url: Url,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(mut base_url: Url) -> Result<Self> {
        // `join` replaces the last path segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(API_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { base_url, client })
    }

    fn endpoint(&self) -> Result<Url> {
        self.base_url
            .join("scrape/advanced")
            .context("Invalid API base URL")
    }

    /// POST the request to `/scrape/advanced` and decode the response.
    pub async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResponse> {
        let endpoint = self.endpoint()?;

        let response = self
            .client
            .post(endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    anyhow!(
                        "API connection error. Is the server running at {}? ({e})",
                        self.base_url
                    )
                } else {
                    anyhow!("API request failed: {e}")
                }
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .context("Failed to read API response")?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<ErrorResponse>(&body)
                .map(|error| error.detail)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            return Err(anyhow!("API error (HTTP {}): {}", status.as_u16(), detail));
        }

        serde_json::from_slice(&body).context("Failed to decode API response")
    }
}
