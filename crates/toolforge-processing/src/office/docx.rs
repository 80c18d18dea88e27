use docx_rs::{BreakType, Docx, Paragraph, Run};
use std::fs::File;
use std::path::Path;

use crate::error::{ConversionError, ConversionResult};
use crate::office::ooxml::{self, WORD};
use crate::pdf::layout::TextPdfBuilder;
use crate::pdf::text::extract_pages;
use crate::traits::{ConversionOutput, Converter};
use crate::validator::InputKind;

/// Characters that are not allowed in XML 1.0 documents
fn xml_safe(text: &str) -> String {
    text.chars()
        .filter(|c| matches!(c, '\t' | '\n' | '\r') || *c >= ' ')
        .filter(|c| !matches!(c, '\u{FFFE}' | '\u{FFFF}'))
        .collect()
}

/// Build a DOCX with one paragraph per text line and a page break between pages
pub fn pages_to_docx(pages: &[String]) -> Docx {
    let mut docx = Docx::new();

    for (page_index, page) in pages.iter().enumerate() {
        let mut lines: Vec<&str> = page.trim_end().lines().collect();
        if lines.is_empty() {
            lines.push("");
        }

        for (line_index, line) in lines.iter().enumerate() {
            let mut run = Run::new();
            if page_index > 0 && line_index == 0 {
                run = run.add_break(BreakType::Page);
            }
            run = run.add_text(xml_safe(line));
            docx = docx.add_paragraph(Paragraph::new().add_run(run));
        }
    }

    docx
}

/// PDF → DOCX
pub struct PdfToDocx;

impl Converter for PdfToDocx {
    fn label(&self) -> &'static str {
        "PDF → DOCX"
    }

    fn input_kind(&self) -> InputKind {
        InputKind::Pdf
    }

    fn convert(
        &self,
        input: &Path,
        out_dir: &Path,
        stem: &str,
    ) -> ConversionResult<ConversionOutput> {
        let pages = extract_pages(input)?;
        let output = out_dir.join(format!("{}.docx", stem));

        let file = File::create(&output)?;
        pages_to_docx(&pages)
            .build()
            .pack(file)
            .map_err(|e| ConversionError::Document(format!("Failed to write DOCX: {}", e)))?;

        tracing::debug!(pages = pages.len(), "Converted PDF to DOCX");
        Ok(ConversionOutput::Single(output))
    }
}

/// Paragraph texts of a DOCX body
pub fn docx_paragraphs(input: &Path) -> ConversionResult<Vec<String>> {
    let mut archive = ooxml::open_archive(input)?;
    let xml = ooxml::read_part(&mut archive, "word/document.xml")?;
    ooxml::paragraphs(&xml, WORD)
}

/// DOCX → PDF
pub struct DocxToPdf;

impl Converter for DocxToPdf {
    fn label(&self) -> &'static str {
        "DOCX → PDF"
    }

    fn input_kind(&self) -> InputKind {
        InputKind::Docx
    }

    fn convert(
        &self,
        input: &Path,
        out_dir: &Path,
        stem: &str,
    ) -> ConversionResult<ConversionOutput> {
        let paragraphs = docx_paragraphs(input)?;

        let mut builder = TextPdfBuilder::new();
        for paragraph in &paragraphs {
            for line in paragraph.split('\n') {
                builder.paragraph(line);
            }
        }

        let output = out_dir.join(format!("{}.pdf", stem));
        builder.save(&output)?;

        tracing::debug!(paragraphs = paragraphs.len(), "Converted DOCX to PDF");
        Ok(ConversionOutput::Single(output))
    }
}
