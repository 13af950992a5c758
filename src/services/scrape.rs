// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::error::ScrapeError;
use crate::models::scrape::{
    no_match_message, MultiScrapeResponse, ResponseStatus, ScrapeJob, ScrapeResponse,
    SelectorJob, SingleScrapeResponse,
};
use crate::models::settings::FetchSettings;
use crate::services::extractor::{all_match_texts, extract_records, first_match_text, Extraction};
use crate::services::fetcher::Fetcher;
use crate::services::logging::anonymize_url;
use anyhow::Result;
use tracing::{info, warn};

/// Runs the fetch → parse → extract pipeline for one request at a time.
///
/// Holds no per-request state; the shared fetcher only carries immutable
/// client configuration.
pub struct ScrapeService {
    fetcher: Fetcher,
}

impl ScrapeService {
    pub fn new(settings: &FetchSettings) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(settings)?,
        })
    }

    /// One record per container matched by `job.containers`.
    pub async fn scrape_records(&self, job: &ScrapeJob) -> Result<ScrapeResponse, ScrapeError> {
        let html = self.fetcher.fetch(&job.url).await?;

        match extract_records(&html, &job.containers, &job.fields) {
            Extraction::Records(data) => {
                info!(
                    url = %anonymize_url(&job.url),
                    containers = data.len(),
                    fields = job.fields.len(),
                    "Extracted records"
                );
                Ok(ScrapeResponse::success(data))
            }
            Extraction::NoContainersMatched => {
                warn!(
                    url = %anonymize_url(&job.url),
                    selector = %job.container_selector,
                    "No containers matched"
                );
                Ok(ScrapeResponse::no_containers(&job.container_selector))
            }
        }
    }

    /// Text of the first element matching the selector; `NotFound` when none does.
    pub async fn scrape_first(&self, job: &SelectorJob) -> Result<SingleScrapeResponse, ScrapeError> {
        let html = self.fetcher.fetch(&job.url).await?;

        let data = first_match_text(&html, &job.selector)
            .ok_or_else(|| ScrapeError::NotFound(no_match_message("element", &job.css_selector)))?;

        Ok(SingleScrapeResponse {
            status: ResponseStatus::Success,
            data,
        })
    }

    /// Texts of every element matching the selector.
    pub async fn scrape_all(&self, job: &SelectorJob) -> Result<MultiScrapeResponse, ScrapeError> {
        let html = self.fetcher.fetch(&job.url).await?;
        let data = all_match_texts(&html, &job.selector);

        if data.is_empty() {
            warn!(
                url = %anonymize_url(&job.url),
                selector = %job.css_selector,
                "No elements matched"
            );
            return Ok(MultiScrapeResponse {
                status: ResponseStatus::Warning,
                message: Some(no_match_message("elements", &job.css_selector)),
                count: 0,
                data,
            });
        }

        info!(url = %anonymize_url(&job.url), matches = data.len(), "Extracted texts");
        Ok(MultiScrapeResponse {
            status: ResponseStatus::Success,
            message: None,
            count: data.len(),
            data,
        })
    }
}
