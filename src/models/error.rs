// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::scrape::ErrorResponse;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Failures that abort a scrape request.
///
/// Per-field misses are not errors: they degrade to `null` in the record.
/// An empty container match is not an error either; see
/// [`Extraction::NoContainersMatched`](crate::services::extractor::Extraction).
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Malformed request: bad URL, empty or invalid selector, unknown extraction type
    #[error("{0}")]
    Validation(String),
    /// DNS, connect, timeout or body read failure while talking to the target site
    #[error("Failed to reach target site: {0}")]
    Transport(String),
    /// Target site answered with a non-success status
    #[error("Target site error: HTTP {status} for url: {url}")]
    UpstreamHttp { status: u16, url: String },
    /// Single-selector lookup matched nothing
    #[error("{0}")]
    NotFound(String),
}

impl ScrapeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ScrapeError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ScrapeError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ScrapeError::UpstreamHttp { .. } => StatusCode::BAD_REQUEST,
            ScrapeError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

/// Unreadable or mistyped request bodies are validation failures like any other.
impl From<JsonRejection> for ScrapeError {
    fn from(rejection: JsonRejection) -> Self {
        ScrapeError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ScrapeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (
            status,
            Json(ErrorResponse {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_422() {
        let err = ScrapeError::Validation("bad".to_string());
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_transport_maps_to_500() {
        let err = ScrapeError::Transport("connection refused".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_upstream_maps_to_400_and_mentions_status() {
        let err = ScrapeError::UpstreamHttp {
            status: 404,
            url: "https://example.com/missing".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "Target site error: HTTP 404 for url: https://example.com/missing"
        );
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ScrapeError::NotFound("nothing".to_string());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_into_response_renders_detail_body() {
        let response = ScrapeError::Transport("request timed out".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            error.detail,
            "Failed to reach target site: request timed out"
        );
    }
}
