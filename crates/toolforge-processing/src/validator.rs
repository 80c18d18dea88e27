use std::fmt;
use std::path::Path;

/// Upload validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid file extension: .{extension} (expected {kind}: {allowed})")]
    InvalidExtension {
        extension: String,
        kind: InputKind,
        allowed: String,
    },

    #[error("Invalid content type: {content_type} (expected {kind})")]
    InvalidContentType {
        content_type: String,
        kind: InputKind,
    },

    #[error("File name has no extension: {0}")]
    MissingExtension(String),

    #[error("Empty file")]
    EmptyFile,
}

/// Kind of file a route accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Pdf,
    Docx,
    Presentation,
    Spreadsheet,
    Image,
}

impl InputKind {
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            InputKind::Pdf => &["pdf"],
            InputKind::Docx => &["docx"],
            InputKind::Presentation => &["ppt", "pptx"],
            InputKind::Spreadsheet => &["xlsx", "xlsm"],
            InputKind::Image => &["jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "tif"],
        }
    }

    pub fn content_types(self) -> &'static [&'static str] {
        match self {
            InputKind::Pdf => &["application/pdf", "application/x-pdf"],
            InputKind::Docx => {
                &["application/vnd.openxmlformats-officedocument.wordprocessingml.document"]
            }
            InputKind::Presentation => &[
                "application/vnd.ms-powerpoint",
                "application/vnd.openxmlformats-officedocument.presentationml.presentation",
            ],
            InputKind::Spreadsheet => &[
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                "application/vnd.ms-excel.sheet.macroenabled.12",
            ],
            InputKind::Image => &[
                "image/jpeg",
                "image/jpg",
                "image/pjpeg",
                "image/png",
                "image/gif",
                "image/bmp",
                "image/x-ms-bmp",
                "image/webp",
                "image/tiff",
            ],
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputKind::Pdf => "PDF",
            InputKind::Docx => "DOCX",
            InputKind::Presentation => "PowerPoint",
            InputKind::Spreadsheet => "Excel",
            InputKind::Image => "image",
        };
        f.write_str(name)
    }
}

/// Generic content types sent by browsers and CLI clients that carry no information
const OPAQUE_CONTENT_TYPES: &[&str] = &["application/octet-stream", "binary/octet-stream"];

/// Validates uploads against one input kind
pub struct UploadValidator {
    kind: InputKind,
    max_file_size: usize,
}

impl UploadValidator {
    pub fn new(kind: InputKind, max_file_size: usize) -> Self {
        Self {
            kind,
            max_file_size,
        }
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate file extension (case insensitive)
    pub fn validate_extension(&self, filename: &str) -> Result<(), ValidationError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ValidationError::MissingExtension(filename.to_string()))?;

        if !self.kind.extensions().contains(&extension.as_str()) {
            return Err(ValidationError::InvalidExtension {
                extension,
                kind: self.kind,
                allowed: self.kind.extensions().join(", "),
            });
        }

        Ok(())
    }

    /// Validate the declared content type. Absent and opaque types are accepted;
    /// the extension check still applies to them.
    pub fn validate_content_type(&self, content_type: Option<&str>) -> Result<(), ValidationError> {
        let Some(content_type) = content_type else {
            return Ok(());
        };

        let normalized = normalize_mime_type(content_type);
        if normalized.is_empty() || OPAQUE_CONTENT_TYPES.contains(&normalized.as_str()) {
            return Ok(());
        }

        if !self.kind.content_types().contains(&normalized.as_str()) {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                kind: self.kind,
            });
        }

        Ok(())
    }

    /// Validate all aspects of an upload
    pub fn validate_all(
        &self,
        filename: &str,
        content_type: Option<&str>,
        file_size: usize,
    ) -> Result<(), ValidationError> {
        self.validate_file_size(file_size)?;
        self.validate_extension(filename)?;
        self.validate_content_type(content_type)?;
        Ok(())
    }
}

/// Lowercase and strip parameters (`; charset=...`) from a MIME type
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}
