use lopdf::Document;
use std::path::{Path, PathBuf};

use crate::error::{ConversionError, ConversionResult};
use crate::pdf::load_document;

/// Page ranges (1-based, inclusive) of consecutive chunks of `pages_per_split` pages
pub fn chunk_ranges(total_pages: u32, pages_per_split: u32) -> Vec<(u32, u32)> {
    if pages_per_split == 0 {
        return Vec::new();
    }
    (1..=total_pages)
        .step_by(pages_per_split as usize)
        .map(|first| (first, (first + pages_per_split - 1).min(total_pages)))
        .collect()
}

/// Keep only pages `first..=last` of `source`.
pub fn extract_range(source: &Document, first: u32, last: u32) -> Document {
    let mut chunk = source.clone();
    let removed: Vec<u32> = chunk
        .get_pages()
        .keys()
        .copied()
        .filter(|n| *n < first || *n > last)
        .collect();
    if !removed.is_empty() {
        chunk.delete_pages(&removed);
    }
    chunk.prune_objects();
    chunk
}

/// Split the PDF at `input` into files of `pages_per_split` pages inside
/// `out_dir`. Files are named `split_{first_page}.pdf` and returned in page order.
pub fn split_pdf(
    input: &Path,
    pages_per_split: i64,
    out_dir: &Path,
) -> ConversionResult<Vec<PathBuf>> {
    if pages_per_split <= 0 {
        return Err(ConversionError::InvalidParameter(
            "pages_per_split must be greater than 0".to_string(),
        ));
    }

    let source = load_document(input)?;
    let total = source.get_pages().len() as u32;
    let per_split = u32::try_from(pages_per_split).unwrap_or(u32::MAX).min(total.max(1));

    let mut outputs = Vec::new();
    for (first, last) in chunk_ranges(total, per_split) {
        let mut chunk = extract_range(&source, first, last);
        let path = out_dir.join(format!("split_{}.pdf", first));
        chunk.save(&path)?;
        outputs.push(path);
    }

    tracing::debug!(total_pages = total, chunks = outputs.len(), "Split PDF");
    Ok(outputs)
}
