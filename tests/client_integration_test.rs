// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use scrape_agent::app::create_router;
use scrape_agent::models::builder::RequestBuilder;
use scrape_agent::models::scrape::{FieldDefinition, ResponseStatus};
use scrape_agent::models::settings::FetchSettings;
use scrape_agent::routes::ScrapeState;
use scrape_agent::services::client::ApiClient;
use scrape_agent::services::render::{render, OutputFormat};
use scrape_agent::services::scrape::ScrapeService;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// End-to-end: client -> running server -> mock target site.

const BOOKS_HTML: &str = r#"<html><body>
<article class="product_pod">
  <h3><a href="catalogue/a-light-in-the-attic_1000/index.html" title="A Light in the Attic">A Light in the ...</a></h3>
  <p class="price_color">£51.77</p>
</article>
<article class="product_pod">
  <h3><a href="catalogue/tipping-the-velvet_999/index.html" title="Tipping the Velvet">Tipping the Velvet</a></h3>
  <p class="price_color">£53.74</p>
</article>
</body></html>"#;

/// Start the API on an ephemeral port and return its base URL.
async fn spawn_api() -> Url {
    let service = ScrapeService::new(&FetchSettings::default()).unwrap();
    let app = create_router(ScrapeState::new(service));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Url::parse(&format!("http://{addr}/")).unwrap()
}

#[tokio::test]
async fn test_client_round_trip_renders_csv() {
    let target = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BOOKS_HTML))
        .expect(1)
        .mount(&target)
        .await;

    let builder = RequestBuilder::new(&format!("{}/books", target.uri()), "article.product_pod")
        .with_field(FieldDefinition::text("title", "h3 a"))
        .with_field(FieldDefinition::text("price", ".price_color"));
    // Link text is truncated on the listing page; the title attribute is not
    let builder = builder.replace_field(
        0,
        FieldDefinition {
            attribute: Some("title".to_string()),
            ..FieldDefinition::of_type("title", "h3 a", "attribute")
        },
    );

    let client = ApiClient::new(spawn_api().await).unwrap();
    let response = client.scrape(&builder.build()).await.unwrap();

    assert_eq!(response.status, ResponseStatus::Success);
    assert_eq!(response.count, 2);

    let csv = render(&response, OutputFormat::Csv).unwrap();
    assert_eq!(
        csv,
        "title,price\nA Light in the Attic,£51.77\nTipping the Velvet,£53.74\n"
    );
}

#[tokio::test]
async fn test_client_surfaces_api_error_detail() {
    let target = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&target)
        .await;

    let builder = RequestBuilder::new(&target.uri(), ".card")
        .with_field(FieldDefinition::text("title", "h1"));

    let client = ApiClient::new(spawn_api().await).unwrap();
    let err = client.scrape(&builder.build()).await.unwrap_err();

    let message = err.to_string();
    assert!(message.contains("HTTP 400"), "{message}");
    assert!(message.contains("Target site error"), "{message}");
}

#[tokio::test]
async fn test_client_reports_unreachable_api() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(Url::parse(&format!("http://{addr}/")).unwrap()).unwrap();
    let request = RequestBuilder::new("https://example.com/", ".card").build();

    let err = client.scrape(&request).await.unwrap_err();
    assert!(err.to_string().contains("API connection error"));
}
