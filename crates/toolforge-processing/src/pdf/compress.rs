use std::fmt;
use std::path::Path;

use crate::error::ConversionResult;
use crate::pdf::load_document;

/// Optimisation profile applied when re-saving a PDF
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// Deflate streams only
    Low,
    /// Prune unreferenced objects, deflate streams
    #[default]
    Medium,
    /// Prune, drop zero-length streams, deflate and renumber
    High,
}

impl CompressionLevel {
    /// Parse a level name. Unknown names fall back to `Medium`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "low" => CompressionLevel::Low,
            "medium" => CompressionLevel::Medium,
            "high" => CompressionLevel::High,
            other => {
                tracing::warn!(level = %other, "Unknown compression level, using medium");
                CompressionLevel::Medium
            }
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompressionLevel::Low => "low",
            CompressionLevel::Medium => "medium",
            CompressionLevel::High => "high",
        })
    }
}

/// Re-save `input` to `output` with the given profile. Returns the output size.
pub fn compress_pdf(input: &Path, output: &Path, level: CompressionLevel) -> ConversionResult<u64> {
    let mut doc = load_document(input)?;

    match level {
        CompressionLevel::Low => {}
        CompressionLevel::Medium => {
            doc.prune_objects();
        }
        CompressionLevel::High => {
            doc.prune_objects();
            doc.delete_zero_length_streams();
        }
    }

    doc.compress();

    if level == CompressionLevel::High {
        doc.renumber_objects();
    }

    doc.save(output)?;

    let before = std::fs::metadata(input)?.len();
    let after = std::fs::metadata(output)?.len();
    tracing::debug!(%level, before_bytes = before, after_bytes = after, "Compressed PDF");

    Ok(after)
}
