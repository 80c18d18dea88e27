use std::path::PathBuf;

/// Errors raised by conversion primitives
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// A caller-supplied parameter is out of range or unknown
    #[error("{0}")]
    InvalidParameter(String),

    #[error("Unsupported input: {0}")]
    Unsupported(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Rendering error: {0}")]
    Render(String),

    #[error("Output file missing or empty: {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ConversionResult<T> = Result<T, ConversionError>;

impl ConversionError {
    /// Whether the failure was caused by the request rather than the converter
    pub fn is_client_error(&self) -> bool {
        matches!(self, ConversionError::InvalidParameter(_))
    }
}

impl From<lopdf::Error> for ConversionError {
    fn from(err: lopdf::Error) -> Self {
        ConversionError::Pdf(err.to_string())
    }
}

impl From<image::ImageError> for ConversionError {
    fn from(err: image::ImageError) -> Self {
        ConversionError::Image(err.to_string())
    }
}

impl From<zip::result::ZipError> for ConversionError {
    fn from(err: zip::result::ZipError) -> Self {
        ConversionError::Document(err.to_string())
    }
}

impl From<quick_xml::Error> for ConversionError {
    fn from(err: quick_xml::Error) -> Self {
        ConversionError::Document(err.to_string())
    }
}
