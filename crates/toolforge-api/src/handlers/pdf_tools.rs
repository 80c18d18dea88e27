//! PDF page tools: merge, split, compress, text extraction

use axum::{extract::State, response::Response, Json};
use serde::Serialize;
use std::sync::Arc;
use toolforge_core::AppError;
use toolforge_processing::pdf::compress::{compress_pdf, CompressionLevel};
use toolforge_processing::pdf::merge::merge_pdfs;
use toolforge_processing::pdf::split::split_pdf;
use toolforge_processing::pdf::text::extract_text;
use toolforge_processing::{ConversionOutput, InputKind};
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::artifact::{deliver, Delivery, MEDIA_TYPE_PDF};
use crate::utils::blocking::run_in_workspace;
use crate::utils::upload::{UploadForm, UploadedFile};

#[derive(Debug, Serialize, ToSchema)]
pub struct ExtractTextResponse {
    pub text: String,
}

async fn stage_pdf(
    state: &AppState,
    form: &mut UploadForm,
) -> Result<(UploadedFile, toolforge_storage::Workspace, std::path::PathBuf), HttpAppError> {
    let upload = form.require_file("file")?;
    upload.validate(InputKind::Pdf, state.config.max_upload_size_bytes())?;

    let workspace = state.workspaces.create().await?;
    let input = workspace.stage(&upload.filename, &upload.data).await?;
    Ok((upload, workspace, input))
}

#[utoipa::path(
    post,
    path = "/merge-pdf/",
    tag = "pdf",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "`files`: two or more PDFs, merged in the order sent"),
    responses(
        (status = 200, description = "merged.pdf", content_type = "application/pdf"),
        (status = 400, description = "Fewer than two PDFs or a non-PDF upload", body = ErrorResponse),
        (status = 500, description = "Merge failed", body = ErrorResponse)
    )
)]
pub async fn merge_pdf(
    State(state): State<Arc<AppState>>,
    mut form: UploadForm,
) -> Result<Response, HttpAppError> {
    let uploads = form.files("files");
    if uploads.len() < 2 {
        return Err(AppError::BadRequest(
            "At least two PDF files are required for merging".to_string(),
        )
        .into());
    }
    for upload in &uploads {
        upload.validate(InputKind::Pdf, state.config.max_upload_size_bytes())?;
    }

    let workspace = state.workspaces.create().await?;
    let mut inputs = Vec::with_capacity(uploads.len());
    for upload in &uploads {
        inputs.push(workspace.stage(&upload.filename, &upload.data).await?);
    }

    tracing::info!(files = inputs.len(), "Merging PDFs");

    let (workspace, output) = run_in_workspace(&state, workspace, "PDF merge", move |dir| {
        let output = dir.join("merged.pdf");
        merge_pdfs(&inputs, &output)?;
        let output = ConversionOutput::Single(output);
        output.verify()?;
        Ok(output)
    })
    .await?;

    deliver(&state, workspace, output, Delivery::single(MEDIA_TYPE_PDF)).await
}

#[utoipa::path(
    post,
    path = "/split-pdf/",
    tag = "pdf",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "`file`: PDF, `pages_per_split`: pages per output file"),
    responses(
        (status = 200, description = "split_pdfs.zip with split_{first_page}.pdf entries", content_type = "application/zip"),
        (status = 400, description = "Invalid upload or pages_per_split", body = ErrorResponse),
        (status = 500, description = "Split failed", body = ErrorResponse)
    )
)]
pub async fn split_pdf_handler(
    State(state): State<Arc<AppState>>,
    mut form: UploadForm,
) -> Result<Response, HttpAppError> {
    let pages_per_split = form.require_int("pages_per_split")?;
    if pages_per_split <= 0 {
        return Err(AppError::InvalidInput(
            "pages_per_split must be greater than 0".to_string(),
        )
        .into());
    }
    let (_, workspace, input) = stage_pdf(&state, &mut form).await?;
    let chunks_dir = workspace.create_subdir("chunks").await?;

    let (workspace, output) = run_in_workspace(&state, workspace, "PDF split", move |_| {
        let output = ConversionOutput::Multiple(split_pdf(&input, pages_per_split, &chunks_dir)?);
        output.verify()?;
        Ok(output)
    })
    .await?;

    deliver(
        &state,
        workspace,
        output,
        Delivery::single(MEDIA_TYPE_PDF).archive("split_pdfs.zip"),
    )
    .await
}

#[utoipa::path(
    post,
    path = "/compress-pdf/",
    tag = "pdf",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "`file`: PDF, `level`: low, medium (default) or high"),
    responses(
        (status = 200, description = "compressed_{filename}", content_type = "application/pdf"),
        (status = 400, description = "Not a PDF upload", body = ErrorResponse),
        (status = 500, description = "Compression failed", body = ErrorResponse)
    )
)]
pub async fn compress_pdf_handler(
    State(state): State<Arc<AppState>>,
    mut form: UploadForm,
) -> Result<Response, HttpAppError> {
    let level = CompressionLevel::parse_lenient(form.text("level").unwrap_or("medium"));
    let (upload, workspace, input) = stage_pdf(&state, &mut form).await?;
    let download_name = format!("compressed_{}", upload.filename);

    let (workspace, output) = run_in_workspace(&state, workspace, "PDF compression", move |dir| {
        let output = dir.join("compressed.pdf");
        let size = compress_pdf(&input, &output, level)?;
        tracing::debug!(level = %level, bytes = size, "Compressed PDF");
        let output = ConversionOutput::Single(output);
        output.verify()?;
        Ok(output)
    })
    .await?;

    deliver(
        &state,
        workspace,
        output,
        Delivery::single(MEDIA_TYPE_PDF).named(download_name),
    )
    .await
}

#[utoipa::path(
    post,
    path = "/extract-text/",
    tag = "pdf",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "`file`: PDF"),
    responses(
        (status = 200, description = "Concatenated page text", body = ExtractTextResponse),
        (status = 400, description = "Not a PDF upload", body = ErrorResponse),
        (status = 500, description = "Extraction failed", body = ErrorResponse)
    )
)]
pub async fn extract_text_handler(
    State(state): State<Arc<AppState>>,
    mut form: UploadForm,
) -> Result<Json<ExtractTextResponse>, HttpAppError> {
    let (_, workspace, input) = stage_pdf(&state, &mut form).await?;

    let (_workspace, text) =
        run_in_workspace(&state, workspace, "PDF text extraction", move |_| {
            extract_text(&input)
        })
        .await?;

    Ok(Json(ExtractTextResponse { text }))
}
