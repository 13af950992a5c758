// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Identity route handlers and router construction.
//!
//! This module is `pub` so that integration tests can build a test router directly
//! without starting the full binary.

use crate::models::version::{StatusResponse, VersionResponse};
use crate::routes::{scrape_router, ScrapeApiDoc, ScrapeState};
use axum::{routing::get, Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `SCRAPE_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("SCRAPE_VERSION");

pub const SERVICE_NAME: &str = "Universal Scraper API";

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

pub async fn status_handler() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "Active".to_string(),
        service: format!("{SERVICE_NAME} v{VERSION}"),
    })
}

pub async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        agent: "scrape-agent".to_string(),
        version: VERSION.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the Axum application router.
///
/// CORS is wide open: the API is called directly from browser-hosted dashboards.
pub fn create_router(state: ScrapeState) -> Router {
    Router::new()
        .route("/", get(status_handler))
        .route("/version", get(version_handler))
        .merge(scrape_router().with_state(state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ScrapeApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scrape::ErrorResponse;
    use crate::models::settings::FetchSettings;
    use crate::services::scrape::ScrapeService;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn create_test_app() -> Router {
        let service = ScrapeService::new(&FetchSettings::default()).unwrap();
        create_router(ScrapeState::new(service))
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_status_endpoint_response() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let status: StatusResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(status.status, "Active");
        assert_eq!(status.service, format!("Universal Scraper API v{VERSION}"));
    }

    #[tokio::test]
    async fn test_version_follows_semver_format() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/version").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let version_response: VersionResponse =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(version_response.agent, "scrape-agent");

        // Check semver format: MAJOR.MINOR.PATCH
        let parts: Vec<&str> = version_response.version.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[0].parse::<u32>().is_ok());
        assert!(parts[1].parse::<u32>().is_ok());
        assert!(parts[2].parse::<u32>().is_ok());
    }

    #[tokio::test]
    async fn test_invalid_route_returns_404() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/invalid").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_concurrent_requests_succeed() {
        let app = create_test_app();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let app_clone = app.clone();
                tokio::spawn(async move {
                    let response = app_clone
                        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
                        .await
                        .unwrap();
                    response.status()
                })
            })
            .collect();

        for handle in handles {
            let status = handle.await.unwrap();
            assert_eq!(status, StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected_before_fetch() {
        let app = create_test_app();

        let response = app
            .oneshot(post_json(
                "/scrape/advanced",
                r#"{"url": "not-a-valid-url", "container_selector": ".card", "fields": []}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let error: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(error.detail.contains("Invalid URL"));
    }

    #[tokio::test]
    async fn test_unknown_extraction_type_returns_422() {
        let app = create_test_app();

        let response = app
            .oneshot(post_json(
                "/scrape/advanced",
                r#"{
                    "url": "https://example.com/",
                    "container_selector": ".card",
                    "fields": [{"field_name": "x", "selector": "p", "extraction_type": "html"}]
                }"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let error: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(error.detail.contains("Unknown extraction_type 'html'"));
    }

    #[tokio::test]
    async fn test_missing_required_key_returns_422() {
        let app = create_test_app();

        let response = app
            .oneshot(post_json("/scrape/advanced", r#"{"url": "https://example.com/"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.headers().get("content-type").unwrap(), "application/json");
        let error: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(error.detail.contains("container_selector"), "{}", error.detail);
    }

    #[tokio::test]
    async fn test_malformed_json_returns_422_with_detail() {
        let app = create_test_app();

        let response = app
            .oneshot(post_json("/scrape", "{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.headers().get("content-type").unwrap(), "application/json");
        let error: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(error.detail.contains("Failed to parse the request body as JSON"));
    }

    #[tokio::test]
    async fn test_field_without_selector_returns_422_naming_the_key() {
        let app = create_test_app();

        let response = app
            .oneshot(post_json(
                "/scrape/advanced",
                r#"{
                    "url": "https://example.com/",
                    "container_selector": ".card",
                    "fields": [{"field_name": "title"}]
                }"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let error: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(error.detail.contains("missing field `selector`"), "{}", error.detail);
    }

    #[tokio::test]
    async fn test_missing_content_type_returns_422_with_detail() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/scrape/all")
                    .body(Body::from(r#"{"url": "https://example.com/", "css_selector": "p"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let error: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(error.detail.contains("Content-Type"));
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let doc: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(doc["paths"]["/scrape/advanced"]["post"].is_object());
    }
}
