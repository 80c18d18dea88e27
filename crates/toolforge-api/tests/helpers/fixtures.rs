//! Test fixtures: PDFs, images, DOCX packages and helpers to inspect outputs.

use image::{ImageFormat, Rgb, RgbImage};
use std::io::{Cursor, Read};
use toolforge_processing::pdf::layout::TextPdfBuilder;

/// Text PDF with one page per entry
pub fn text_pdf(pages: &[&str]) -> Vec<u8> {
    let mut builder = TextPdfBuilder::new();
    for (i, text) in pages.iter().enumerate() {
        if i > 0 {
            builder.new_page();
        }
        builder.paragraph(text);
    }
    let mut doc = builder.build().expect("Failed to build PDF");
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("Failed to save PDF");
    buffer
}

/// PDF whose pages read "{label} page {n}"
pub fn numbered_pdf(label: &str, pages: usize) -> Vec<u8> {
    let texts: Vec<String> = (1..=pages)
        .map(|n| format!("{} page {}", label, n))
        .collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    text_pdf(&refs)
}

pub fn pdf_page_count(data: &[u8]) -> usize {
    lopdf::Document::load_mem(data)
        .expect("Response is not a PDF")
        .get_pages()
        .len()
}

/// Extract the text of a PDF response through the same path the service uses
pub fn pdf_text(data: &[u8]) -> String {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("response.pdf");
    std::fs::write(&path, data).expect("Failed to write PDF");
    toolforge_processing::pdf::text::extract_text(&path).expect("Failed to extract text")
}

/// Gradient image encoded as `format`
pub fn test_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128])
    });
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)
        .expect("Failed to encode image");
    buffer
}

pub fn test_png(width: u32, height: u32) -> Vec<u8> {
    test_image(width, height, ImageFormat::Png)
}

pub fn image_dimensions(data: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory(data).expect("Response is not an image");
    (img.width(), img.height())
}

/// DOCX with one paragraph per entry
pub fn test_docx(paragraphs: &[&str]) -> Vec<u8> {
    use docx_rs::{Docx, Paragraph, Run};

    let docx = paragraphs.iter().fold(Docx::new(), |docx, text| {
        docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)))
    });
    let mut buffer = Vec::new();
    docx.build()
        .pack(Cursor::new(&mut buffer))
        .expect("Failed to pack DOCX");
    buffer
}

/// Entry names of a zip archive, in archive order
pub fn zip_entry_names(data: &[u8]) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).expect("Response is not a zip");
    (0..archive.len())
        .map(|i| {
            archive
                .by_index(i)
                .expect("Unreadable zip entry")
                .name()
                .to_string()
        })
        .collect()
}

pub fn zip_entry(data: &[u8], name: &str) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).expect("Response is not a zip");
    let mut file = archive.by_name(name).expect("Missing zip entry");
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer).expect("Failed to read zip entry");
    buffer
}
