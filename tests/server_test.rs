use actix_web::http::header::{self, ContentType};
use actix_web::http::StatusCode;
use actix_web::{test, App};
use async_trait::async_trait;
use httpmock::prelude::*;
use product_scraper::adapters::HttpLauncher;
use product_scraper::app::server;
use product_scraper::config::{AppConfig, Backend};
use product_scraper::core::ProductSource;
use product_scraper::{BatchRunner, ProductId, ProductResult, ProductScraper, ScrapeOutcome};
use serde_json::{json, Value};
use std::sync::Arc;

const SEARCH_RESULTS: &str = include_str!("fixtures/search_results.html");
const PRODUCT_DISCOUNTED: &str = include_str!("fixtures/product_discounted.html");
const A55_PATH: &str = "/ua/products/mobile/samsung-galaxy-a55-8-256gb-navy.html";

fn runner_for(base_url: &str) -> Arc<BatchRunner<ProductScraper<HttpLauncher, AppConfig>>> {
    let mut config = AppConfig::default();
    config.site.base_url = base_url.to_string();
    config.browser.backend = Backend::Http;
    config.browser.navigation_timeout_secs = 5;

    let launcher = HttpLauncher::new(&config.browser).unwrap();
    Arc::new(BatchRunner::new(ProductScraper::new(launcher, config)))
}

fn start_catalog() -> MockServer {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/ua/catalogsearch/result/")
            .query_param("q", "A55");
        then.status(200)
            .header("Content-Type", "text/html; charset=utf-8")
            .body(SEARCH_RESULTS);
    });
    server.mock(|when, then| {
        when.method(GET).path(A55_PATH);
        then.status(200)
            .header("Content-Type", "text/html; charset=utf-8")
            .body(PRODUCT_DISCOUNTED);
    });
    server
}

/// Panics on every product, standing in for a bug inside the batch.
struct PanickingSource;

#[async_trait]
impl ProductSource for PanickingSource {
    async fn scrape(&self, _product_id: &ProductId) -> ScrapeOutcome {
        panic!("extractor bug");
    }
}

#[actix_web::test]
async fn test_scrape_returns_found_products() {
    let catalog = start_catalog();
    let runner = runner_for(&catalog.base_url());
    let app = test::init_service(
        App::new().configure(move |cfg| server::configure(cfg, runner)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/scrape")
        .set_json(json!({"productIds": ["A55", "missing"]}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let results: Vec<ProductResult> = test::read_body_json(resp).await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].product_id.as_str(), "A55");
    assert_eq!(results[0].new_price.as_deref(), Some("15 999 ₴"));
    assert_eq!(results[0].old_price.as_deref(), Some("18 999 ₴"));
}

#[actix_web::test]
async fn test_numeric_ids_are_coerced() {
    let catalog = MockServer::start();
    let search_mock = catalog.mock(|when, then| {
        when.method(GET)
            .path("/ua/catalogsearch/result/")
            .query_param("q", "1001");
        then.status(200).body("<html></html>");
    });
    let runner = runner_for(&catalog.base_url());
    let app = test::init_service(
        App::new().configure(move |cfg| server::configure(cfg, runner)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/scrape")
        .set_json(json!({"productIds": [1001]}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    search_mock.assert();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_nothing_found_is_404() {
    let catalog = MockServer::start();
    let runner = runner_for(&catalog.base_url());
    let app = test::init_service(
        App::new().configure(move |cfg| server::configure(cfg, runner)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/scrape")
        .set_json(json!({"productIds": ["nope-1", "nope-2"]}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn test_empty_id_list_is_404() {
    let runner = runner_for("http://127.0.0.1:1");
    let app = test::init_service(
        App::new().configure(move |cfg| server::configure(cfg, runner)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/scrape")
        .set_json(json!({"productIds": []}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_malformed_requests_are_400() {
    // Unreachable catalog: a 400 must come back before any navigation.
    let runner = runner_for("http://127.0.0.1:1");
    let app = test::init_service(
        App::new().configure(move |cfg| server::configure(cfg, runner)),
    )
    .await;

    let bodies = [
        json!({}),
        json!({"productIds": "A55"}),
        json!({"productIds": {"id": "A55"}}),
        json!({"productIds": ["A55", null]}),
        json!(["A55"]),
    ];

    for body in bodies {
        let req = test::TestRequest::post()
            .uri("/scrape")
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {}", body);
        let error: Value = test::read_body_json(resp).await;
        assert!(error["error"].is_string(), "body: {}", body);
    }
}

#[actix_web::test]
async fn test_invalid_json_is_400() {
    let runner = runner_for("http://127.0.0.1:1");
    let app = test::init_service(
        App::new().configure(move |cfg| server::configure(cfg, runner)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/scrape")
        .insert_header(ContentType::json())
        .set_payload("{\"productIds\": [")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error: Value = test::read_body_json(resp).await;
    assert!(error["error"].is_string());
}

#[actix_web::test]
async fn test_batch_panic_is_500_without_details() {
    let runner = Arc::new(BatchRunner::new(PanickingSource));
    let app = test::init_service(
        App::new().configure(move |cfg| server::configure(cfg, runner)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/scrape")
        .set_json(json!({"productIds": ["A55"]}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error: Value = test::read_body_json(resp).await;
    let message = error["error"].as_str().unwrap();
    assert!(!message.contains("extractor bug"));
}

#[actix_web::test]
async fn test_cross_origin_requests_allowed() {
    let runner = runner_for("http://127.0.0.1:1");
    let app = test::init_service(
        App::new()
            .wrap(server::cors())
            .configure(move |cfg| server::configure(cfg, runner)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header((header::ORIGIN, "https://shop.example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://shop.example.com"
    );
}

#[actix_web::test]
async fn test_health() {
    let runner = runner_for("http://127.0.0.1:1");
    let app = test::init_service(
        App::new().configure(move |cfg| server::configure(cfg, runner)),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"status": "ok"}));
}
