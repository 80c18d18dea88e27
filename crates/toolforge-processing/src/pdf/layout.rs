//! Text-only PDF layout
//!
//! Lines are drawn top-down on A4 pages with the standard Helvetica fonts,
//! starting at the top margin. A new page begins whenever the cursor has
//! dropped below the bottom margin. Text wider than the printable area is
//! wrapped at whitespace (or mid-word when a single word does not fit).

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::path::Path;

use crate::error::ConversionResult;

pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;
pub const MARGIN: f32 = 50.0;
pub const LINE_HEIGHT: f32 = 15.0;
pub const BODY_FONT_SIZE: f32 = 12.0;

/// Helvetica advance widths for U+0020..=U+007E, in 1/1000 em
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];
const DEFAULT_WIDTH: u16 = 556;
const BOLD_WIDTH_FACTOR: f32 = 1.06;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

impl FontStyle {
    fn resource_name(self) -> &'static str {
        match self {
            FontStyle::Regular => "F1",
            FontStyle::Bold => "F2",
        }
    }
}

/// Width of `text` in points
pub fn text_width(text: &str, style: FontStyle, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| {
            let code = c as u32;
            if (0x20..=0x7E).contains(&code) {
                HELVETICA_WIDTHS[(code - 0x20) as usize] as u32
            } else {
                DEFAULT_WIDTH as u32
            }
        })
        .sum();
    let factor = match style {
        FontStyle::Regular => 1.0,
        FontStyle::Bold => BOLD_WIDTH_FACTOR,
    };
    units as f32 * size / 1000.0 * factor
}

/// Split `text` into lines no wider than `max_width`
pub fn wrap_text(text: &str, style: FontStyle, size: f32, max_width: f32) -> Vec<String> {
    let text = text.replace('\t', "    ");
    if text_width(&text, style, size) <= max_width {
        return vec![text];
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if text_width(&candidate, style, size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        // Hard-break words that are wider than a whole line
        for c in word.chars() {
            current.push(c);
            if text_width(&current, style, size) > max_width && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(c);
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    lines
}

/// Encode text for a WinAnsiEncoding Type1 font; unmappable characters become `?`
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            c if (c as u32) < 0x20 => b' ',
            c if (0x20..=0x7E).contains(&(c as u32)) || (0xA0..=0xFF).contains(&(c as u32)) => {
                c as u32 as u8
            }
            _ => b'?',
        })
        .collect()
}

/// Builds a text PDF page by page
pub struct TextPdfBuilder {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: f32,
}

impl Default for TextPdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TextPdfBuilder {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    /// Vertical position of the next line, in points from the page bottom
    pub fn cursor(&self) -> f32 {
        self.y
    }

    pub fn page_count(&self) -> usize {
        self.pages.len() + usize::from(!self.current.is_empty())
    }

    /// Close the current page and move the cursor back to the top margin
    pub fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.y = PAGE_HEIGHT - MARGIN;
    }

    /// Draw one line at the cursor without moving it
    pub fn draw_line(&mut self, text: &str, style: FontStyle, size: f32) {
        self.current.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![style.resource_name().into(), size.into()]),
            Operation::new("Td", vec![MARGIN.into(), self.y.into()]),
            Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(text))]),
            Operation::new("ET", vec![]),
        ]);
    }

    pub fn advance(&mut self, dy: f32) {
        self.y -= dy;
    }

    /// Write `text` as wrapped lines, `line_height` apart, breaking pages as needed.
    /// An empty string still consumes one line.
    pub fn write_wrapped(&mut self, text: &str, style: FontStyle, size: f32, line_height: f32) {
        for line in wrap_text(text, style, size, PAGE_WIDTH - 2.0 * MARGIN) {
            if self.y < MARGIN {
                self.new_page();
            }
            self.draw_line(&line, style, size);
            self.advance(line_height);
        }
    }

    /// Body paragraph: regular 12pt text on 15pt lines
    pub fn paragraph(&mut self, text: &str) {
        self.write_wrapped(text, FontStyle::Regular, BODY_FONT_SIZE, LINE_HEIGHT);
    }

    /// Assemble the document. An empty builder still yields one blank page.
    pub fn build(mut self) -> ConversionResult<Document> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for operations in self.pages {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id: ObjectId = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        Ok(doc)
    }

    pub fn save(self, path: &Path) -> ConversionResult<()> {
        let mut doc = self.build()?;
        doc.save(path)?;
        Ok(())
    }
}
