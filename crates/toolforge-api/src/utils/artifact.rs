//! Download responses
//!
//! An artifact is either an in-memory buffer or a file inside a request
//! workspace. File artifacts own their workspace: it is moved into the body
//! stream and deleted once the stream is dropped, which happens after the last
//! chunk is sent or when the client goes away.

use axum::{
    body::Body,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use futures::StreamExt;
use std::path::PathBuf;
use tokio_util::io::ReaderStream;
use toolforge_core::AppError;
use toolforge_processing::ConversionOutput;
use toolforge_storage::Workspace;

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::blocking::run_blocking;

pub const MEDIA_TYPE_PDF: &str = "application/pdf";
pub const MEDIA_TYPE_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MEDIA_TYPE_ZIP: &str = "application/zip";
pub const MEDIA_TYPE_JPEG: &str = "image/jpeg";
pub const MEDIA_TYPE_PNG: &str = "image/png";
pub const MEDIA_TYPE_OCTET_STREAM: &str = "application/octet-stream";

enum ArtifactBody {
    Memory(Bytes),
    File { path: PathBuf, workspace: Workspace },
}

/// A downloadable conversion result
pub struct Artifact {
    body: ArtifactBody,
    media_type: String,
    filename: String,
}

impl Artifact {
    pub fn memory(
        data: impl Into<Bytes>,
        media_type: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            body: ArtifactBody::Memory(data.into()),
            media_type: media_type.into(),
            filename: filename.into(),
        }
    }

    pub fn file(
        workspace: Workspace,
        path: PathBuf,
        media_type: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            body: ArtifactBody::File { path, workspace },
            media_type: media_type.into(),
            filename: filename.into(),
        }
    }

    /// Build the download response. File bodies are streamed from disk.
    pub async fn into_response(self) -> Result<Response, HttpAppError> {
        let (body, length) = match self.body {
            ArtifactBody::Memory(data) => {
                let length = data.len() as u64;
                (Body::from(data), length)
            }
            ArtifactBody::File { path, workspace } => {
                let file = tokio::fs::File::open(&path).await.map_err(|e| {
                    AppError::Internal(format!("Failed to open {}: {}", path.display(), e))
                })?;
                let length = file.metadata().await.map_err(AppError::from)?.len();

                // The closure owns the workspace, so it lives exactly as long as the stream.
                let stream = ReaderStream::new(file).map(move |chunk| {
                    let _workspace = &workspace;
                    chunk
                });
                (Body::from_stream(stream), length)
            }
        };

        let mut response = body.into_response();
        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_str(&self.media_type)
                .unwrap_or_else(|_| HeaderValue::from_static(MEDIA_TYPE_OCTET_STREAM)),
        );
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
        if let Ok(disposition) = HeaderValue::from_str(&content_disposition(&self.filename)) {
            headers.insert(header::CONTENT_DISPOSITION, disposition);
        }

        tracing::debug!(
            filename = %self.filename,
            media_type = %self.media_type,
            bytes = length,
            "Sending artifact"
        );
        Ok(response)
    }
}

pub fn content_disposition(filename: &str) -> String {
    format!("attachment; filename=\"{}\"", filename.replace(['"', '\\'], "_"))
}

/// How a conversion output is offered for download
pub struct Delivery {
    /// Media type of a single output file
    pub media_type: String,
    /// Download name of a single output file; its own file name when unset
    pub filename: Option<String>,
    /// Download name of the zip built from multiple outputs
    pub archive_name: &'static str,
}

impl Delivery {
    pub fn single(media_type: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            filename: None,
            archive_name: "outputs.zip",
        }
    }

    pub fn named(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn archive(mut self, archive_name: &'static str) -> Self {
        self.archive_name = archive_name;
        self
    }
}

/// Turn a verified conversion output into a download. Multiple outputs are
/// zipped inside the workspace first, entries in output order.
pub async fn deliver(
    state: &AppState,
    workspace: Workspace,
    output: ConversionOutput,
    delivery: Delivery,
) -> Result<Response, HttpAppError> {
    match output {
        ConversionOutput::Single(path) => {
            let filename = delivery.filename.unwrap_or_else(|| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("output")
                    .to_string()
            });
            Artifact::file(workspace, path, delivery.media_type, filename)
                .into_response()
                .await
        }
        ConversionOutput::Multiple(paths) => {
            let archive_path = workspace.path().join(delivery.archive_name);
            let target = archive_path.clone();
            run_blocking(state, "archive", move || {
                toolforge_infra::write_zip_archive(&paths, &target)
            })
            .await??;

            Artifact::file(
                workspace,
                archive_path,
                MEDIA_TYPE_ZIP,
                delivery.archive_name,
            )
            .into_response()
            .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition() {
        assert_eq!(
            content_disposition("merged.pdf"),
            "attachment; filename=\"merged.pdf\""
        );
        assert_eq!(
            content_disposition("a\"b.pdf"),
            "attachment; filename=\"a_b.pdf\""
        );
    }

    #[tokio::test]
    async fn test_memory_artifact_headers() {
        let response = Artifact::memory(Bytes::from_static(b"abc"), MEDIA_TYPE_PNG, "qrcode.png")
            .into_response()
            .await
            .unwrap();
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "image/png");
        assert_eq!(headers[header::CONTENT_LENGTH], "3");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"qrcode.png\""
        );
    }
}
