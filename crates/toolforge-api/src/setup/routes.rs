//! Route configuration and setup

use crate::handlers::{convert, image_tools, pdf_tools, root, utility};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use toolforge_core::Config;
use toolforge_infra::request_id_middleware;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa_rapidoc::RapiDoc;

/// Room for multipart boundaries and text fields on top of the file limit
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    // Server-level concurrency limit to protect against resource exhaustion under extreme load
    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1_024)
        .max(1);

    // Merge accepts several files, so the body limit scales with the per-file limit.
    let body_limit = config
        .max_upload_size_bytes()
        .saturating_mul(2)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    tracing::info!(
        http_concurrency_limit,
        body_limit_bytes = body_limit,
        "HTTP limits configured"
    );

    let app = Router::new()
        .merge(service_routes())
        .merge(convert_routes())
        .merge(pdf_routes())
        .merge(image_routes())
        .merge(utility_routes())
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .merge(RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(DefaultBodyLimit::disable())
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", o))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

fn service_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root::root))
        .route("/health", get(root::health))
}

/// Single-file conversions
fn convert_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/convert/pdf-to-docx", post(convert::pdf_to_docx))
        .route("/pdf-to-docx/", post(convert::legacy_pdf_to_docx))
        .route("/convert/docx-to-pdf", post(convert::docx_to_pdf))
        .route("/convert/pdf-to-image", post(convert::pdf_to_image))
        .route("/convert/image-to-pdf", post(convert::image_to_pdf))
        .route("/convert/ppt-to-pdf", post(convert::ppt_to_pdf))
        .route("/convert/excel-to-pdf", post(convert::excel_to_pdf))
}

fn pdf_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/merge-pdf/", post(pdf_tools::merge_pdf))
        .route("/split-pdf/", post(pdf_tools::split_pdf_handler))
        .route("/compress-pdf/", post(pdf_tools::compress_pdf_handler))
        .route("/extract-text/", post(pdf_tools::extract_text_handler))
}

fn image_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/resize-image/", post(image_tools::resize_image))
        .route("/convert-format/", post(image_tools::convert_image_format))
        .route("/watermark/", post(image_tools::watermark_image))
        .route("/compress-image/", post(image_tools::compress_image))
}

fn utility_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/generate-qr/", post(utility::generate_qr))
        .route("/base64-encode/", post(utility::base64_encode))
        .route("/base64-decode/", post(utility::base64_decode))
        .route("/format-json/", post(utility::format_json))
}
