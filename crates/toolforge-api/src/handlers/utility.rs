//! Text utilities: QR codes, base64, JSON formatting

use axum::{extract::State, response::Response, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use toolforge_core::AppError;
use toolforge_processing::json::{format_json as format_json_text, FormatOutcome};
use toolforge_processing::{encoding, qr};
use utoipa::ToSchema;

use crate::error::{conversion_failed, ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use crate::utils::artifact::{Artifact, MEDIA_TYPE_OCTET_STREAM, MEDIA_TYPE_PNG};
use crate::utils::blocking::run_blocking;
use crate::utils::upload::UploadForm;

#[derive(Debug, Serialize, ToSchema)]
pub struct Base64Response {
    pub base64: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FormatJsonRequest {
    pub json_text: String,
}

/// Either the formatted document or a structured parse error
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum FormatJsonResponse {
    Formatted { formatted: String },
    Invalid { error: String, details: String },
}

#[utoipa::path(
    post,
    path = "/generate-qr/",
    tag = "utility",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "`text`: content to encode"),
    responses(
        (status = 200, description = "qrcode.png", content_type = "image/png"),
        (status = 400, description = "Missing or empty text", body = ErrorResponse)
    )
)]
pub async fn generate_qr(
    State(state): State<Arc<AppState>>,
    form: UploadForm,
) -> Result<Response, HttpAppError> {
    let text = form.require_text("text")?.to_string();

    let png = run_blocking(&state, "QR code", move || qr::generate_png(&text))
        .await?
        .map_err(|e| conversion_failed("QR code", e))?;

    Artifact::memory(png, MEDIA_TYPE_PNG, "qrcode.png")
        .into_response()
        .await
}

#[utoipa::path(
    post,
    path = "/base64-encode/",
    tag = "utility",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "`file` or `text`; the file wins when both are sent"),
    responses(
        (status = 200, description = "Base64 of the input", body = Base64Response),
        (status = 400, description = "No input provided", body = ErrorResponse)
    )
)]
pub async fn base64_encode(
    State(state): State<Arc<AppState>>,
    mut form: UploadForm,
) -> Result<Json<Base64Response>, HttpAppError> {
    let encoded = if let Some(file) = form.file("file") {
        if file.data.len() > state.config.max_upload_size_bytes() {
            return Err(AppError::PayloadTooLarge(format!(
                "{} bytes exceeds max {} bytes",
                file.data.len(),
                state.config.max_upload_size_bytes()
            ))
            .into());
        }
        encoding::encode(&file.data)
    } else if let Some(text) = form.text("text").filter(|t| !t.is_empty()) {
        encoding::encode(text.as_bytes())
    } else {
        return Err(AppError::BadRequest("No input provided".to_string()).into());
    };

    Ok(Json(Base64Response { base64: encoded }))
}

#[utoipa::path(
    post,
    path = "/base64-decode/",
    tag = "utility",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "`encoded`: base64 text"),
    responses(
        (status = 200, description = "decoded.bin", content_type = "application/octet-stream"),
        (status = 400, description = "Missing field or invalid base64", body = ErrorResponse)
    )
)]
pub async fn base64_decode(form: UploadForm) -> Result<Response, HttpAppError> {
    let decoded = encoding::decode(form.require_text("encoded")?)?;

    Artifact::memory(decoded, MEDIA_TYPE_OCTET_STREAM, "decoded.bin")
        .into_response()
        .await
}

#[utoipa::path(
    post,
    path = "/format-json/",
    tag = "utility",
    request_body = FormatJsonRequest,
    responses(
        (status = 200, description = "Formatted JSON, or an error payload for invalid JSON", body = FormatJsonResponse),
        (status = 400, description = "Request body is not {\"json_text\": string}", body = ErrorResponse)
    )
)]
pub async fn format_json(
    ValidatedJson(request): ValidatedJson<FormatJsonRequest>,
) -> Json<FormatJsonResponse> {
    let response = match format_json_text(&request.json_text) {
        FormatOutcome::Formatted(formatted) => FormatJsonResponse::Formatted { formatted },
        FormatOutcome::Invalid(details) => {
            tracing::debug!(details = %details, "Invalid JSON submitted for formatting");
            FormatJsonResponse::Invalid {
                error: "Invalid JSON".to_string(),
                details,
            }
        }
    };
    Json(response)
}
