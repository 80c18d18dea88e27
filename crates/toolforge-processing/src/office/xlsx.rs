use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::path::Path;

use crate::error::{ConversionError, ConversionResult};
use crate::pdf::layout::{FontStyle, TextPdfBuilder, BODY_FONT_SIZE, LINE_HEIGHT};
use crate::traits::{ConversionOutput, Converter};
use crate::validator::InputKind;

const SHEET_HEADING_SIZE: f32 = 14.0;
const SHEET_HEADING_ADVANCE: f32 = 20.0;
const CELL_SEPARATOR: &str = " | ";

/// Render one cell the way spreadsheet users read it: whole numbers without a
/// fractional part, booleans capitalised, empty cells as nothing.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", *f as i64)
        }
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::Error(e) => e.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Each worksheet as its name and its rows of rendered cells
pub fn sheet_rows(input: &Path) -> ConversionResult<Vec<(String, Vec<String>)>> {
    let mut workbook: Xlsx<_> = open_workbook(input)
        .map_err(|e| ConversionError::Document(format!("Failed to open workbook: {}", e)))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name).map_err(|e| {
            ConversionError::Document(format!("Failed to read sheet '{}': {}", name, e))
        })?;
        sheets.push((name, rendered_rows(&range)));
    }

    Ok(sheets)
}

/// Rows counted from A1, so leading empty rows and columns stay in place.
fn rendered_rows(range: &Range<Data>) -> Vec<String> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };
    let leading = vec![String::new(); start_col as usize];
    let blank_row = vec![""; start_col as usize + range.width()].join(CELL_SEPARATOR);

    let mut rows = vec![blank_row; start_row as usize];
    rows.extend(range.rows().map(|row| {
        leading
            .iter()
            .cloned()
            .chain(row.iter().map(cell_text))
            .collect::<Vec<_>>()
            .join(CELL_SEPARATOR)
    }));
    rows
}

/// Excel → PDF. Sheets start on a new page under a bold "Sheet: name" heading.
pub struct SpreadsheetToPdf;

impl Converter for SpreadsheetToPdf {
    fn label(&self) -> &'static str {
        "Excel → PDF"
    }

    fn input_kind(&self) -> InputKind {
        InputKind::Spreadsheet
    }

    fn convert(
        &self,
        input: &Path,
        out_dir: &Path,
        stem: &str,
    ) -> ConversionResult<ConversionOutput> {
        let sheets = sheet_rows(input)?;

        let mut builder = TextPdfBuilder::new();
        for (index, (name, rows)) in sheets.iter().enumerate() {
            if index > 0 {
                builder.new_page();
            }
            builder.write_wrapped(
                &format!("Sheet: {}", name),
                FontStyle::Bold,
                SHEET_HEADING_SIZE,
                SHEET_HEADING_ADVANCE,
            );
            for row in rows {
                builder.write_wrapped(row, FontStyle::Regular, BODY_FONT_SIZE, LINE_HEIGHT);
            }
        }

        let output = out_dir.join(format!("{}.pdf", stem));
        builder.save(&output)?;

        tracing::debug!(sheets = sheets.len(), "Converted spreadsheet to PDF");
        Ok(ConversionOutput::Single(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::office::ooxml::tests::write_package;
    use crate::pdf::merge::tests::page_texts;
    use lopdf::Document;

    const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sales" sheetId="1" r:id="rId1"/><sheet name="Costs" sheetId="2" r:id="rId2"/></sheets></workbook>"#;

    const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/></Relationships>"#;

    const SHARED_STRINGS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="3" uniqueCount="3"><si><t>Region</t></si><si><t>Total</t></si><si><t>North</t></si></sst>"#;

    const SHEET1: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row><row r="2"><c r="A2" t="s"><v>2</v></c><c r="B2"><v>42</v></c></row></sheetData></worksheet>"#;

    const SHEET2: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1"><v>2.5</v></c><c r="B1" t="b"><v>1</v></c></row></sheetData></worksheet>"#;

    fn write_workbook(path: &Path) {
        write_package(
            path,
            &[
                ("xl/workbook.xml", WORKBOOK),
                ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
                ("xl/sharedStrings.xml", SHARED_STRINGS),
                ("xl/worksheets/sheet1.xml", SHEET1),
                ("xl/worksheets/sheet2.xml", SHEET2),
            ],
        );
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::Float(3.0)), "3");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Int(-7)), "-7");
        assert_eq!(cell_text(&Data::Bool(true)), "True");
        assert_eq!(cell_text(&Data::String("x".into())), "x");
    }

    #[test]
    fn test_sheet_rows() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("book.xlsx");
        write_workbook(&input);

        let sheets = sheet_rows(&input).unwrap();
        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].0, "Sales");
        assert_eq!(sheets[0].1, vec!["Region | Total", "North | 42"]);
        assert_eq!(sheets[1].0, "Costs");
        assert_eq!(sheets[1].1, vec!["2.5 | True"]);
    }

    #[test]
    fn test_sheet_rows_keep_leading_blank_cells() {
        const OFFSET_WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Offset" sheetId="1" r:id="rId1"/></sheets></workbook>"#;
        const OFFSET_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/></Relationships>"#;
        const OFFSET_SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="2"><c r="B2" t="s"><v>0</v></c></row><row r="3"><c r="C3"><v>42</v></c></row></sheetData></worksheet>"#;

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("offset.xlsx");
        write_package(
            &input,
            &[
                ("xl/workbook.xml", OFFSET_WORKBOOK),
                ("xl/_rels/workbook.xml.rels", OFFSET_RELS),
                ("xl/sharedStrings.xml", SHARED_STRINGS),
                ("xl/worksheets/sheet1.xml", OFFSET_SHEET),
            ],
        );

        let sheets = sheet_rows(&input).unwrap();
        assert_eq!(sheets[0].0, "Offset");
        assert_eq!(sheets[0].1, vec![" |  | ", " | Region | ", " |  | 42"]);
    }

    #[test]
    fn test_spreadsheet_to_pdf_page_per_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("book.xlsx");
        write_workbook(&input);

        SpreadsheetToPdf
            .convert(&input, dir.path(), "book")
            .unwrap()
            .verify()
            .unwrap();

        let doc = Document::load(dir.path().join("book.pdf")).unwrap();
        let texts = page_texts(&doc);
        assert_eq!(texts.len(), 2);
        assert!(texts[0].contains("Sheet: Sales"));
        assert!(texts[0].contains("North | 42"));
        assert!(texts[1].contains("Sheet: Costs"));
    }

    #[test]
    fn test_invalid_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.xlsx");
        std::fs::write(&input, b"not a zip").unwrap();
        assert!(matches!(
            SpreadsheetToPdf.convert(&input, dir.path(), "bad"),
            Err(ConversionError::Document(_))
        ));
    }
}
