//! Multipart intake for upload handlers

use axum::extract::{FromRequest, Multipart, Request};
use bytes::Bytes;
use std::collections::HashMap;
use std::path::Path;
use toolforge_core::AppError;
use toolforge_processing::{InputKind, UploadValidator, ValidationError};

use crate::error::HttpAppError;

const MAX_FILENAME_LENGTH: usize = 255;
const FALLBACK_FILENAME: &str = "upload";

/// One uploaded file part
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub data: Bytes,
    /// Sanitised client filename
    pub filename: String,
    pub content_type: Option<String>,
}

impl UploadedFile {
    /// Filename without its extension, used to name conversion outputs
    pub fn stem(&self) -> String {
        Path::new(&self.filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(FALLBACK_FILENAME)
            .to_string()
    }

    pub fn validate(&self, kind: InputKind, max_size: usize) -> Result<(), ValidationError> {
        UploadValidator::new(kind, max_size).validate_all(
            &self.filename,
            self.content_type.as_deref(),
            self.data.len(),
        )
    }
}

/// A fully read multipart form: file parts by field name (in arrival order)
/// and text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    files: HashMap<String, Vec<UploadedFile>>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, HttpAppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(|s| s.to_string()).unwrap_or_default();

            match field.file_name().map(sanitize_filename) {
                Some(filename) => {
                    let content_type = field.content_type().map(|s| s.to_string());
                    let data = field.bytes().await?;
                    form.files.entry(name).or_default().push(UploadedFile {
                        data,
                        filename,
                        content_type,
                    });
                }
                None => {
                    let value = field.text().await?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    /// First file sent under `name`, if any
    pub fn file(&mut self, name: &str) -> Option<UploadedFile> {
        let files = self.files.get_mut(name)?;
        if files.is_empty() {
            return None;
        }
        Some(files.remove(0))
    }

    pub fn require_file(&mut self, name: &str) -> Result<UploadedFile, AppError> {
        self.file(name)
            .ok_or_else(|| AppError::InvalidInput(format!("Missing required field: {}", name)))
    }

    /// All files sent under `name`, in the order received
    pub fn files(&mut self, name: &str) -> Vec<UploadedFile> {
        self.files.remove(name).unwrap_or_default()
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.as_str())
    }

    pub fn require_text(&self, name: &str) -> Result<&str, AppError> {
        self.text(name)
            .ok_or_else(|| AppError::InvalidInput(format!("Missing required field: {}", name)))
    }

    /// Optional integer field; present but unparsable is an error
    pub fn int(&self, name: &str) -> Result<Option<i64>, AppError> {
        self.text(name)
            .map(|value| {
                value.trim().parse::<i64>().map_err(|_| {
                    AppError::InvalidInput(format!("Field '{}' must be an integer", name))
                })
            })
            .transpose()
    }

    pub fn require_int(&self, name: &str) -> Result<i64, AppError> {
        self.int(name)?
            .ok_or_else(|| AppError::InvalidInput(format!("Missing required field: {}", name)))
    }
}

impl<S> FromRequest<S> for UploadForm
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state).await?;
        UploadForm::read(multipart).await
    }
}

/// Sanitize a client filename: keep only the base name and replace characters
/// outside `[A-Za-z0-9._-]`, so it is safe in paths and `Content-Disposition`.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();

    let sanitized: String = base
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let sanitized = sanitized.trim_start_matches('.').to_string();
    if sanitized.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        sanitized
    }
}
