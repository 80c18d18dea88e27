//! PDF operations
//!
//! - Page-level merge, split and re-save profiles over `lopdf`
//! - Rasterisation through pdfium (render)
//! - Text extraction (text)
//! - Image embedding (embed)
//! - A small text layout engine producing A4 text PDFs (layout)

pub mod compress;
pub mod embed;
pub mod layout;
pub mod merge;
pub mod render;
pub mod split;
pub mod text;

use lopdf::Document;
use std::path::Path;

use crate::error::{ConversionError, ConversionResult};

/// Load a PDF from disk, rejecting files without pages
pub fn load_document(path: &Path) -> ConversionResult<Document> {
    let document = Document::load(path)
        .map_err(|e| ConversionError::Pdf(format!("Failed to read {}: {}", display_name(path), e)))?;

    if document.get_pages().is_empty() {
        return Err(ConversionError::Pdf(format!(
            "{} has no pages",
            display_name(path)
        )));
    }

    Ok(document)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document")
        .to_string()
}
