// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::error::ScrapeError;
use crate::models::settings::FetchSettings;
use crate::services::logging::anonymize_url;
use anyhow::{Context, Result};
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, CONTENT_TYPE};
use tracing::{debug, warn};
use url::Url;

/// Bytes of the document searched for a `<meta>` charset declaration.
const META_PRESCAN_LIMIT: usize = 1024;

/// Fetches target pages: one GET per call, no retries.
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// Build a fetcher whose client carries the timeout and identification headers.
    pub fn new(settings: &FetchSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&settings.accept_language)
                .context("Accept-Language is not a valid header value")?,
        );

        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }

    /// Fetch `url` and return the decoded body of a 2xx response.
    pub async fn fetch(&self, url: &Url) -> Result<String, ScrapeError> {
        debug!(url = %anonymize_url(url), "Fetching target page");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| transport_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %anonymize_url(url), status = status.as_u16(), "Target site returned an error status");
            return Err(ScrapeError::UpstreamHttp {
                status: status.as_u16(),
                url: anonymize_url(url),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(url, &e))?;

        Ok(decode_body(&body, content_type.as_deref()))
    }
}

/// Decode a page body. The charset comes from the `Content-Type` header,
/// then a `<meta>` declaration near the top of the document, then UTF-8.
/// A byte order mark overrides all of them.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(charset_param)
        .and_then(encoding_for)
        .or_else(|| meta_charset(body).as_deref().and_then(encoding_for))
        .unwrap_or(UTF_8);

    let (text, _, _) = encoding.decode(body);
    text.into_owned()
}

fn encoding_for(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim_matches(['"', '\'']).as_bytes())
}

fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then_some(value.trim())
    })
}

/// Find `charset=` inside a `<meta>` tag, covering both
/// `<meta charset="...">` and the `http-equiv` content form.
fn meta_charset(body: &[u8]) -> Option<String> {
    let head = &body[..body.len().min(META_PRESCAN_LIMIT)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    let mut rest = head.as_str();
    while let Some(start) = rest.find("<meta") {
        let tag = &rest[start..];
        let tag = &tag[..tag.find('>').unwrap_or(tag.len())];

        if let Some(pos) = tag.find("charset=") {
            let label: String = tag[pos + "charset=".len()..]
                .trim_start_matches(['"', '\'', ' '])
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
                .collect();
            if !label.is_empty() {
                return Some(label);
            }
        }
        rest = &rest[start + "<meta".len()..];
    }
    None
}

fn transport_error(url: &Url, error: &reqwest::Error) -> ScrapeError {
    let kind = if error.is_timeout() {
        "request timed out"
    } else if error.is_connect() {
        "connection failed"
    } else if error.is_body() || error.is_decode() {
        "failed to read response body"
    } else {
        "request failed"
    };

    warn!(url = %anonymize_url(url), error = %error, "{kind}");
    ScrapeError::Transport(format!("{kind}: {error}"))
}
