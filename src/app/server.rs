use crate::config::ServerSettings;
use crate::core::batch::BatchRunner;
use crate::core::{ProductId, ProductSource};
use crate::utils::error::{Result, ScrapeError};
use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{error, web, App, HttpRequest, HttpResponse, HttpServer};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

const INVALID_IDS_MESSAGE: &str = "productIds must be an array of product identifiers";
const NOTHING_FOUND_MESSAGE: &str = "No products found or scraping failed";
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorBody {
        error: message.into(),
    })
}

/// Pulls `productIds` out of a request body.
pub fn parse_product_ids(body: &Value) -> Result<Vec<ProductId>> {
    let ids = body
        .get("productIds")
        .and_then(Value::as_array)
        .ok_or_else(|| ScrapeError::InvalidRequestError {
            message: INVALID_IDS_MESSAGE.to_string(),
        })?;

    ids.iter().map(ProductId::try_from).collect()
}

fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> error::Error {
    let message = format!("{}: {}", INVALID_IDS_MESSAGE, err);
    let response = error_response(StatusCode::BAD_REQUEST, message);
    error::InternalError::from_response(err, response).into()
}

async fn scrape<S: ProductSource + 'static>(
    runner: web::Data<BatchRunner<S>>,
    body: web::Json<Value>,
) -> HttpResponse {
    let product_ids = match parse_product_ids(&body) {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!("Rejected scrape request: {}", e);
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    tracing::info!("Scrape request for {} products", product_ids.len());
    let runner = runner.into_inner();

    // A panic inside the batch surfaces as a join error instead of taking
    // the worker down.
    let batch = tokio::spawn(async move { runner.run(&product_ids).await }).await;

    match batch {
        Ok(results) if !results.is_empty() => HttpResponse::Ok().json(results),
        Ok(_) => error_response(StatusCode::NOT_FOUND, NOTHING_FOUND_MESSAGE),
        Err(e) => {
            tracing::error!("Scrape batch aborted: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
        }
    }
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Any origin, any method, any header.
pub fn cors() -> Cors {
    Cors::permissive()
}

/// Registers the routes; shared by `serve` and the tests.
pub fn configure<S: ProductSource + 'static>(
    cfg: &mut web::ServiceConfig,
    runner: Arc<BatchRunner<S>>,
) {
    cfg.app_data(web::Data::from(runner))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/scrape", web::post().to(scrape::<S>))
        .route("/health", web::get().to(health));
}

pub async fn serve<S: ProductSource + 'static>(
    settings: &ServerSettings,
    runner: Arc<BatchRunner<S>>,
) -> Result<()> {
    let address = (settings.host.clone(), settings.port);
    tracing::info!(
        "Server listening on http://{}:{}",
        settings.host,
        settings.port
    );

    HttpServer::new(move || {
        let runner = runner.clone();
        App::new()
            .wrap(cors())
            .configure(move |cfg| configure(cfg, runner))
    })
    .bind(address)?
    .run()
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}
