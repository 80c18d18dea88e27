//! In-memory image tools: resize, format conversion, watermark, compression

use axum::{extract::State, response::Response};
use bytes::Bytes;
use std::sync::Arc;
use toolforge_processing::image::format::convert_format;
use toolforge_processing::image::{
    apply_text_watermark, compress_to_target, resize_exact, TargetFormat, WatermarkOptions,
};
use toolforge_processing::{ConversionResult, InputKind};

use crate::error::{conversion_failed, ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::artifact::{Artifact, MEDIA_TYPE_JPEG};
use crate::utils::blocking::run_blocking;
use crate::utils::upload::UploadForm;

/// Validate the `file` upload as an image and run `job` on its bytes.
async fn process_image<T, F>(
    state: &AppState,
    form: &mut UploadForm,
    label: &'static str,
    job: F,
) -> Result<T, HttpAppError>
where
    F: FnOnce(&[u8]) -> ConversionResult<T> + Send + 'static,
    T: Send + 'static,
{
    let upload = form.require_file("file")?;
    upload.validate(InputKind::Image, state.config.max_upload_size_bytes())?;

    tracing::info!(
        operation = label,
        filename = %upload.filename,
        bytes = upload.data.len(),
        "Processing image"
    );

    let data: Bytes = upload.data;
    run_blocking(state, label, move || job(&data))
        .await?
        .map_err(|e| conversion_failed(label, e))
}

#[utoipa::path(
    post,
    path = "/resize-image/",
    tag = "image",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "`file`: image, `width` and `height` in pixels"),
    responses(
        (status = 200, description = "resized.jpg", content_type = "image/jpeg"),
        (status = 400, description = "Invalid image or dimensions", body = ErrorResponse),
        (status = 500, description = "Resize failed", body = ErrorResponse)
    )
)]
pub async fn resize_image(
    State(state): State<Arc<AppState>>,
    mut form: UploadForm,
) -> Result<Response, HttpAppError> {
    let width = form.require_int("width")?;
    let height = form.require_int("height")?;

    let resized = process_image(&state, &mut form, "Image resize", move |data| {
        resize_exact(data, width, height)
    })
    .await?;

    Artifact::memory(resized, MEDIA_TYPE_JPEG, "resized.jpg")
        .into_response()
        .await
}

#[utoipa::path(
    post,
    path = "/convert-format/",
    tag = "image",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "`file`: image, `format`: jpeg, jpg, png, gif, bmp, webp or tiff"),
    responses(
        (status = 200, description = "converted.{format}"),
        (status = 400, description = "Invalid image or unknown format", body = ErrorResponse),
        (status = 500, description = "Conversion failed", body = ErrorResponse)
    )
)]
pub async fn convert_image_format(
    State(state): State<Arc<AppState>>,
    mut form: UploadForm,
) -> Result<Response, HttpAppError> {
    let format = form.require_text("format")?.trim().to_lowercase();
    let target = TargetFormat::parse(&format)?;

    let converted = process_image(&state, &mut form, "Image format", move |data| {
        convert_format(data, target)
    })
    .await?;

    Artifact::memory(converted, target.media_type(), format!("converted.{}", format))
        .into_response()
        .await
}

#[utoipa::path(
    post,
    path = "/watermark/",
    tag = "image",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "`file`: image, `text`, `opacity` (0-255), `font_size` in pixels"),
    responses(
        (status = 200, description = "watermarked.jpg", content_type = "image/jpeg"),
        (status = 400, description = "Invalid image or parameters", body = ErrorResponse),
        (status = 500, description = "Watermarking failed", body = ErrorResponse)
    )
)]
pub async fn watermark_image(
    State(state): State<Arc<AppState>>,
    mut form: UploadForm,
) -> Result<Response, HttpAppError> {
    let options = WatermarkOptions {
        text: form.require_text("text")?.to_string(),
        opacity: form.require_int("opacity")?,
        font_size: form.require_int("font_size")?,
    };

    let watermarked = process_image(&state, &mut form, "Watermark", move |data| {
        apply_text_watermark(data, &options)
    })
    .await?;

    Artifact::memory(watermarked, MEDIA_TYPE_JPEG, "watermarked.jpg")
        .into_response()
        .await
}

#[utoipa::path(
    post,
    path = "/compress-image/",
    tag = "image",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "`file`: image, `target_size` in KB"),
    responses(
        (status = 200, description = "compressed.jpg", content_type = "image/jpeg"),
        (status = 400, description = "Invalid image or target size", body = ErrorResponse),
        (status = 500, description = "Compression failed", body = ErrorResponse)
    )
)]
pub async fn compress_image(
    State(state): State<Arc<AppState>>,
    mut form: UploadForm,
) -> Result<Response, HttpAppError> {
    let target_size = form.require_int("target_size")?;

    let compressed = process_image(&state, &mut form, "Image compression", move |data| {
        compress_to_target(data, target_size)
    })
    .await?;

    tracing::debug!(
        quality = compressed.quality,
        size_kb = compressed.size_kb(),
        target_kb = target_size,
        "Compressed image"
    );

    Artifact::memory(compressed.data, MEDIA_TYPE_JPEG, "compressed.jpg")
        .into_response()
        .await
}
