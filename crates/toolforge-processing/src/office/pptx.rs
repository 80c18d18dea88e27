use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{ConversionError, ConversionResult};
use crate::office::ooxml::{self, DRAWING};
use crate::pdf::layout::{FontStyle, TextPdfBuilder};
use crate::traits::{ConversionOutput, Converter};
use crate::validator::InputKind;

/// Compound File Binary signature used by legacy `.ppt`/`.doc`/`.xls` files
const LEGACY_OFFICE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

const SLIDE_HEADING_SIZE: f32 = 16.0;
const SLIDE_HEADING_ADVANCE: f32 = 24.0;

fn is_legacy_office(input: &Path) -> ConversionResult<bool> {
    let mut header = [0u8; 8];
    let mut file = File::open(input)?;
    let mut read = 0;
    while read < header.len() {
        match file.read(&mut header[read..])? {
            0 => break,
            n => read += n,
        }
    }
    Ok(read == header.len() && header == LEGACY_OFFICE_MAGIC)
}

/// Slide number of a `ppt/slides/slideN.xml` part
fn slide_number(part: &str) -> Option<u32> {
    part.strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Slide texts in presentation order, one entry per slide
pub fn slide_texts(input: &Path) -> ConversionResult<Vec<Vec<String>>> {
    let mut archive = ooxml::open_archive(input)?;

    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    if slides.is_empty() {
        return Err(ConversionError::Document(
            "Presentation contains no slides".to_string(),
        ));
    }
    slides.sort_by_key(|(n, _)| *n);

    slides
        .iter()
        .map(|(_, part)| {
            let xml = ooxml::read_part(&mut archive, part)?;
            ooxml::paragraphs(&xml, DRAWING)
        })
        .collect()
}

/// PPT/PPTX → PDF. Each slide gets its own page headed "Slide N".
pub struct PresentationToPdf;

impl Converter for PresentationToPdf {
    fn label(&self) -> &'static str {
        "PPT/PPTX → PDF"
    }

    fn input_kind(&self) -> InputKind {
        InputKind::Presentation
    }

    fn convert(
        &self,
        input: &Path,
        out_dir: &Path,
        stem: &str,
    ) -> ConversionResult<ConversionOutput> {
        if is_legacy_office(input)? {
            return Err(ConversionError::Unsupported(
                "legacy binary .ppt files are not supported, save as .pptx".to_string(),
            ));
        }

        let slides = slide_texts(input)?;

        let mut builder = TextPdfBuilder::new();
        for (index, paragraphs) in slides.iter().enumerate() {
            if index > 0 {
                builder.new_page();
            }
            builder.draw_line(
                &format!("Slide {}", index + 1),
                FontStyle::Bold,
                SLIDE_HEADING_SIZE,
            );
            builder.advance(SLIDE_HEADING_ADVANCE);

            for paragraph in paragraphs {
                for line in paragraph.split('\n') {
                    builder.paragraph(line);
                }
            }
        }

        let output = out_dir.join(format!("{}.pdf", stem));
        builder.save(&output)?;

        tracing::debug!(slides = slides.len(), "Converted presentation to PDF");
        Ok(ConversionOutput::Single(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::office::ooxml::tests::write_package;
    use crate::pdf::merge::tests::page_texts;
    use lopdf::Document;

    fn slide(text: &str) -> String {
        format!(
            r#"<p:sld xmlns:p="p" xmlns:a="a"><p:cSld><p:spTree><p:sp><p:txBody><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#,
            text
        )
    }

    #[test]
    fn test_slide_number() {
        assert_eq!(slide_number("ppt/slides/slide12.xml"), Some(12));
        assert_eq!(slide_number("ppt/slides/_rels/slide1.xml.rels"), None);
        assert_eq!(slide_number("ppt/slideLayouts/slideLayout1.xml"), None);
    }

    #[test]
    fn test_slides_are_ordered_numerically() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("deck.pptx");
        let (s1, s2, s10) = (slide("first"), slide("second"), slide("tenth"));
        write_package(
            &input,
            &[
                ("ppt/slides/slide10.xml", s10.as_str()),
                ("ppt/slides/slide2.xml", s2.as_str()),
                ("ppt/slides/slide1.xml", s1.as_str()),
            ],
        );

        let slides = slide_texts(&input).unwrap();
        assert_eq!(slides, vec![vec!["first"], vec!["second"], vec!["tenth"]]);
    }

    #[test]
    fn test_presentation_to_pdf_one_page_per_slide() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("deck.pptx");
        let (s1, s2) = (slide("Agenda"), slide("Results"));
        write_package(
            &input,
            &[
                ("ppt/slides/slide1.xml", s1.as_str()),
                ("ppt/slides/slide2.xml", s2.as_str()),
            ],
        );

        PresentationToPdf
            .convert(&input, dir.path(), "deck")
            .unwrap()
            .verify()
            .unwrap();

        let doc = Document::load(dir.path().join("deck.pdf")).unwrap();
        let texts = page_texts(&doc);
        assert_eq!(texts.len(), 2);
        assert!(texts[0].contains("Slide 1"));
        assert!(texts[0].contains("Agenda"));
        assert!(texts[1].contains("Slide 2"));
        assert!(texts[1].contains("Results"));
    }

    #[test]
    fn test_presentation_without_slides() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.pptx");
        write_package(&input, &[("ppt/presentation.xml", "<p:presentation/>")]);
        assert!(matches!(
            PresentationToPdf.convert(&input, dir.path(), "empty"),
            Err(ConversionError::Document(_))
        ));
    }

    #[test]
    fn test_legacy_ppt_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("old.ppt");
        let mut data = LEGACY_OFFICE_MAGIC.to_vec();
        data.extend_from_slice(&[0u8; 512]);
        std::fs::write(&input, data).unwrap();
        assert!(matches!(
            PresentationToPdf.convert(&input, dir.path(), "old"),
            Err(ConversionError::Unsupported(_))
        ));
    }
}
