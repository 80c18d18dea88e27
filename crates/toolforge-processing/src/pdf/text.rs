use std::path::Path;

use crate::error::{ConversionError, ConversionResult};

fn read_pdf(input: &Path) -> ConversionResult<Vec<u8>> {
    let bytes = std::fs::read(input)?;
    if !bytes.starts_with(b"%PDF") {
        return Err(ConversionError::Pdf("File is not a PDF".to_string()));
    }
    Ok(bytes)
}

/// Text of every page, concatenated in page order
pub fn extract_text(input: &Path) -> ConversionResult<String> {
    let bytes = read_pdf(input)?;
    pdf_extract::extract_text_from_mem(&bytes)
        .map_err(|e| ConversionError::Pdf(format!("Text extraction failed: {}", e)))
}

/// Text of each page, in page order
pub fn extract_pages(input: &Path) -> ConversionResult<Vec<String>> {
    let bytes = read_pdf(input)?;
    pdf_extract::extract_text_from_mem_by_pages(&bytes)
        .map_err(|e| ConversionError::Pdf(format!("Text extraction failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::merge::tests::sample_pdf;

    #[test]
    fn test_extract_pages() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.pdf");
        sample_pdf("T", 2).save(&input).unwrap();

        let pages = extract_pages(&input).unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("T page 1"));
        assert!(pages[1].contains("T page 2"));

        let text = extract_text(&input).unwrap();
        assert!(text.contains("T page 1") && text.contains("T page 2"));
    }

    #[test]
    fn test_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("fake.pdf");
        std::fs::write(&input, b"not a pdf").unwrap();
        assert!(extract_text(&input).is_err());
    }
}
