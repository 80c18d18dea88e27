//! Single-file conversions (`/convert/*`)

use axum::{extract::State, response::Response};
use std::sync::Arc;
use toolforge_processing::office::{DocxToPdf, PdfToDocx, PresentationToPdf, SpreadsheetToPdf};
use toolforge_processing::pdf::embed::ImageToPdf;
use toolforge_processing::pdf::render::{PdfToImage, RasterFormat};
use toolforge_processing::Converter;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::artifact::{deliver, Delivery, MEDIA_TYPE_DOCX, MEDIA_TYPE_PDF};
use crate::utils::blocking::run_in_workspace;
use crate::utils::upload::UploadForm;

/// Validate the `file` upload for `converter`, stage it in a fresh workspace,
/// convert it on the blocking pool and deliver the verified output.
async fn convert_upload<C>(
    state: &Arc<AppState>,
    mut form: UploadForm,
    converter: C,
    delivery: Delivery,
) -> Result<Response, HttpAppError>
where
    C: Converter + 'static,
{
    let upload = form.require_file("file")?;
    upload.validate(converter.input_kind(), state.config.max_upload_size_bytes())?;

    let workspace = state.workspaces.create().await?;
    let input = workspace.stage(&upload.filename, &upload.data).await?;
    let stem = upload.stem();
    let label = converter.label();

    tracing::info!(
        conversion = label,
        filename = %upload.filename,
        bytes = upload.data.len(),
        "Starting conversion"
    );

    let (workspace, output) = run_in_workspace(state, workspace, label, move |out_dir| {
        let output = converter.convert(&input, out_dir, &stem)?;
        output.verify()?;
        Ok(output)
    })
    .await?;

    deliver(state, workspace, output, delivery).await
}

#[utoipa::path(
    post,
    path = "/convert/pdf-to-docx",
    tag = "convert",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "`file`: PDF document"),
    responses(
        (status = 200, description = "DOCX named after the upload", content_type = "application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        (status = 400, description = "Not a PDF upload", body = ErrorResponse),
        (status = 500, description = "Conversion failed", body = ErrorResponse)
    )
)]
pub async fn pdf_to_docx(
    State(state): State<Arc<AppState>>,
    form: UploadForm,
) -> Result<Response, HttpAppError> {
    convert_upload(&state, form, PdfToDocx, Delivery::single(MEDIA_TYPE_DOCX)).await
}

/// Older path of the PDF → DOCX conversion; always downloads as `converted.docx`.
#[utoipa::path(
    post,
    path = "/pdf-to-docx/",
    tag = "convert",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "`file`: PDF document"),
    responses(
        (status = 200, description = "converted.docx"),
        (status = 400, description = "Not a PDF upload", body = ErrorResponse),
        (status = 500, description = "Conversion failed", body = ErrorResponse)
    )
)]
pub async fn legacy_pdf_to_docx(
    State(state): State<Arc<AppState>>,
    form: UploadForm,
) -> Result<Response, HttpAppError> {
    convert_upload(
        &state,
        form,
        PdfToDocx,
        Delivery::single(MEDIA_TYPE_DOCX).named("converted.docx"),
    )
    .await
}

#[utoipa::path(
    post,
    path = "/convert/docx-to-pdf",
    tag = "convert",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "`file`: DOCX document"),
    responses(
        (status = 200, description = "PDF named after the upload", content_type = "application/pdf"),
        (status = 400, description = "Not a DOCX upload", body = ErrorResponse),
        (status = 500, description = "Conversion failed", body = ErrorResponse)
    )
)]
pub async fn docx_to_pdf(
    State(state): State<Arc<AppState>>,
    form: UploadForm,
) -> Result<Response, HttpAppError> {
    convert_upload(&state, form, DocxToPdf, Delivery::single(MEDIA_TYPE_PDF)).await
}

#[utoipa::path(
    post,
    path = "/convert/pdf-to-image",
    tag = "convert",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "`file`: PDF document, `format`: jpg (default) or png"),
    responses(
        (status = 200, description = "One image for a single page, images.zip otherwise"),
        (status = 400, description = "Not a PDF upload or unknown format", body = ErrorResponse),
        (status = 500, description = "Rendering failed", body = ErrorResponse)
    )
)]
pub async fn pdf_to_image(
    State(state): State<Arc<AppState>>,
    form: UploadForm,
) -> Result<Response, HttpAppError> {
    let format = RasterFormat::parse(form.text("format").unwrap_or(""))?;
    let converter = PdfToImage {
        renderer: state.renderer.clone(),
        format,
    };
    let delivery = Delivery::single(format.media_type()).archive("images.zip");
    convert_upload(&state, form, converter, delivery).await
}

#[utoipa::path(
    post,
    path = "/convert/image-to-pdf",
    tag = "convert",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "`file`: image"),
    responses(
        (status = 200, description = "PDF named after the upload", content_type = "application/pdf"),
        (status = 400, description = "Not an image upload", body = ErrorResponse),
        (status = 500, description = "Conversion failed", body = ErrorResponse)
    )
)]
pub async fn image_to_pdf(
    State(state): State<Arc<AppState>>,
    form: UploadForm,
) -> Result<Response, HttpAppError> {
    convert_upload(&state, form, ImageToPdf, Delivery::single(MEDIA_TYPE_PDF)).await
}

#[utoipa::path(
    post,
    path = "/convert/ppt-to-pdf",
    tag = "convert",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "`file`: PPTX presentation"),
    responses(
        (status = 200, description = "PDF with one page per slide", content_type = "application/pdf"),
        (status = 400, description = "Not a presentation upload", body = ErrorResponse),
        (status = 500, description = "Conversion failed", body = ErrorResponse)
    )
)]
pub async fn ppt_to_pdf(
    State(state): State<Arc<AppState>>,
    form: UploadForm,
) -> Result<Response, HttpAppError> {
    convert_upload(&state, form, PresentationToPdf, Delivery::single(MEDIA_TYPE_PDF)).await
}

#[utoipa::path(
    post,
    path = "/convert/excel-to-pdf",
    tag = "convert",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "`file`: XLSX workbook"),
    responses(
        (status = 200, description = "PDF with one section per sheet", content_type = "application/pdf"),
        (status = 400, description = "Not a spreadsheet upload", body = ErrorResponse),
        (status = 500, description = "Conversion failed", body = ErrorResponse)
    )
)]
pub async fn excel_to_pdf(
    State(state): State<Arc<AppState>>,
    form: UploadForm,
) -> Result<Response, HttpAppError> {
    convert_upload(&state, form, SpreadsheetToPdf, Delivery::single(MEDIA_TYPE_PDF)).await
}
