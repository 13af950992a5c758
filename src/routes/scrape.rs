// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Scrape route handlers.

use crate::models::error::ScrapeError;
use crate::models::scrape::{
    ErrorResponse, FieldDefinition, MultiScrapeResponse, ResponseStatus, ScrapeRequest,
    ScrapeResponse, SelectorRequest, SingleScrapeResponse,
};
use crate::services::scrape::ScrapeService;
use axum::extract::{FromRequest, Request, State};
use axum::{routing::post, Json, Router};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use utoipa::OpenApi;

/// State for scrape routes.
#[derive(Clone)]
pub struct ScrapeState {
    pub scrape_service: Arc<ScrapeService>,
}

impl ScrapeState {
    pub fn new(scrape_service: ScrapeService) -> Self {
        Self {
            scrape_service: Arc::new(scrape_service),
        }
    }
}

/// JSON body extractor that rejects with [`ScrapeError`], so malformed bodies
/// get the same 422 `{detail}` response as every other validation failure.
pub struct ScrapeJson<T>(pub T);

impl<T, S> FromRequest<S> for ScrapeJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ScrapeError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state).await?;
        Ok(ScrapeJson(payload))
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(scrape_handler, scrape_all_handler, scrape_advanced_handler),
    components(schemas(
        ScrapeRequest,
        FieldDefinition,
        ScrapeResponse,
        SelectorRequest,
        SingleScrapeResponse,
        MultiScrapeResponse,
        ResponseStatus,
        ErrorResponse
    )),
    tags((name = "scrape", description = "Selector-driven page extraction"))
)]
pub struct ScrapeApiDoc;

/// Create scrape router with all extraction routes.
pub fn scrape_router() -> Router<ScrapeState> {
    Router::new()
        .route("/scrape", post(scrape_handler))
        .route("/scrape/all", post(scrape_all_handler))
        .route("/scrape/advanced", post(scrape_advanced_handler))
}

/// POST /scrape - Text of the first element matching `css_selector`.
#[utoipa::path(
    post,
    path = "/scrape",
    tag = "scrape",
    request_body = SelectorRequest,
    responses(
        (status = 200, description = "First match found", body = SingleScrapeResponse),
        (status = 400, description = "Target site returned an error status", body = ErrorResponse),
        (status = 404, description = "Selector matched nothing", body = ErrorResponse),
        (status = 422, description = "Malformed body, invalid URL or selector", body = ErrorResponse),
        (status = 500, description = "Target site unreachable", body = ErrorResponse)
    )
)]
pub async fn scrape_handler(
    State(state): State<ScrapeState>,
    ScrapeJson(payload): ScrapeJson<SelectorRequest>,
) -> Result<Json<SingleScrapeResponse>, ScrapeError> {
    let job = payload.normalize()?;
    state.scrape_service.scrape_first(&job).await.map(Json)
}

/// POST /scrape/all - Texts of every element matching `css_selector`.
#[utoipa::path(
    post,
    path = "/scrape/all",
    tag = "scrape",
    request_body = SelectorRequest,
    responses(
        (status = 200, description = "Matches, or a warning when there are none", body = MultiScrapeResponse),
        (status = 400, description = "Target site returned an error status", body = ErrorResponse),
        (status = 422, description = "Malformed body, invalid URL or selector", body = ErrorResponse),
        (status = 500, description = "Target site unreachable", body = ErrorResponse)
    )
)]
pub async fn scrape_all_handler(
    State(state): State<ScrapeState>,
    ScrapeJson(payload): ScrapeJson<SelectorRequest>,
) -> Result<Json<MultiScrapeResponse>, ScrapeError> {
    let job = payload.normalize()?;
    state.scrape_service.scrape_all(&job).await.map(Json)
}

/// POST /scrape/advanced - One record per container, one value per field.
#[utoipa::path(
    post,
    path = "/scrape/advanced",
    tag = "scrape",
    request_body = ScrapeRequest,
    responses(
        (status = 200, description = "Records, or a warning when no container matched", body = ScrapeResponse),
        (status = 400, description = "Target site returned an error status", body = ErrorResponse),
        (status = 422, description = "Malformed body, invalid URL, selector or extraction type", body = ErrorResponse),
        (status = 500, description = "Target site unreachable", body = ErrorResponse)
    )
)]
pub async fn scrape_advanced_handler(
    State(state): State<ScrapeState>,
    ScrapeJson(payload): ScrapeJson<ScrapeRequest>,
) -> Result<Json<ScrapeResponse>, ScrapeError> {
    let job = payload.normalize()?;
    state.scrape_service.scrape_records(&job).await.map(Json)
}
