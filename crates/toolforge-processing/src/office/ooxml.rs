//! Paragraph text from WordprocessingML and DrawingML parts

use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

use crate::error::{ConversionError, ConversionResult};

/// Element names of one markup dialect
#[derive(Debug, Clone, Copy)]
pub struct TextMarkup {
    pub paragraph: &'static [u8],
    pub text: &'static [u8],
    pub tab: &'static [u8],
    pub breaks: &'static [&'static [u8]],
}

/// WordprocessingML (`word/document.xml`)
pub const WORD: TextMarkup = TextMarkup {
    paragraph: b"w:p",
    text: b"w:t",
    tab: b"w:tab",
    breaks: &[b"w:br", b"w:cr"],
};

/// DrawingML text bodies (slides, shapes)
pub const DRAWING: TextMarkup = TextMarkup {
    paragraph: b"a:p",
    text: b"a:t",
    tab: b"a:tab",
    breaks: &[b"a:br"],
};

pub fn open_archive(path: &Path) -> ConversionResult<ZipArchive<File>> {
    let file = File::open(path)?;
    ZipArchive::new(file).map_err(|e| {
        ConversionError::Document(format!("Not a valid Office Open XML file: {}", e))
    })
}

/// Read one part of the package as UTF-8 text
pub fn read_part(archive: &mut ZipArchive<File>, name: &str) -> ConversionResult<String> {
    let mut part = archive
        .by_name(name)
        .map_err(|e| ConversionError::Document(format!("Missing {}: {}", name, e)))?;
    let mut content = String::new();
    part.read_to_string(&mut content)?;
    Ok(content)
}

/// Collect paragraph texts in document order. Line breaks inside a paragraph
/// become `\n`, tabs become `\t`.
pub fn paragraphs(xml: &str, markup: TextMarkup) -> ConversionResult<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);
    let mut buf = Vec::new();

    let mut result = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let name = e.name();
                if name.as_ref() == markup.paragraph {
                    if depth == 0 {
                        current.clear();
                    }
                    depth += 1;
                } else if name.as_ref() == markup.text {
                    in_text = true;
                } else if name.as_ref() == markup.tab && depth > 0 {
                    current.push('\t');
                } else if markup.breaks.contains(&name.as_ref()) && depth > 0 {
                    current.push('\n');
                }
            }
            Event::Empty(e) => {
                let name = e.name();
                if name.as_ref() == markup.paragraph && depth == 0 {
                    result.push(String::new());
                } else if name.as_ref() == markup.tab && depth > 0 {
                    current.push('\t');
                } else if markup.breaks.contains(&name.as_ref()) && depth > 0 {
                    current.push('\n');
                }
            }
            Event::Text(e) if in_text && depth > 0 => {
                current.push_str(&e.unescape()?);
            }
            Event::End(e) => {
                let name = e.name();
                if name.as_ref() == markup.text {
                    in_text = false;
                } else if name.as_ref() == markup.paragraph && depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        result.push(std::mem::take(&mut current));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(result)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    /// Write a zip package with the given parts
    pub(crate) fn write_package(path: &Path, parts: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        for (name, content) in parts {
            zip.start_file(*name, FileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_word_paragraphs() {
        let xml = r#"<w:document xmlns:w="x"><w:body>
            <w:p><w:r><w:t>Hello </w:t></w:r><w:r><w:t xml:space="preserve">world &amp; co</w:t></w:r></w:p>
            <w:p/>
            <w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p>
            <w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t>Title</w:t></w:r></w:p>
        </w:body></w:document>"#;
        let paras = paragraphs(xml, WORD).unwrap();
        assert_eq!(paras, vec!["Hello world & co", "", "a\tb\nc", "Title"]);
    }

    #[test]
    fn test_drawing_paragraphs() {
        let xml = r#"<p:sld xmlns:p="p" xmlns:a="a"><p:txBody>
            <a:p><a:r><a:t>Agenda</a:t></a:r></a:p>
            <a:p><a:r><a:t>One</a:t></a:r><a:br/><a:r><a:t>Two</a:t></a:r></a:p>
        </p:txBody></p:sld>"#;
        let paras = paragraphs(xml, DRAWING).unwrap();
        assert_eq!(paras, vec!["Agenda", "One\nTwo"]);
    }

    #[test]
    fn test_missing_part() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.docx");
        write_package(&path, &[("other.xml", "<a/>")]);
        let mut archive = open_archive(&path).unwrap();
        assert!(read_part(&mut archive, "word/document.xml").is_err());
    }
}
