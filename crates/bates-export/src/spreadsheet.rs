//! Minimal SpreadsheetML package: one worksheet named `Index`
//!
//! Text cells are written as inline strings so no shared string table is
//! needed. Page numbers are numeric cells. An empty repair order leaves the
//! cell out entirely.

use crate::error::ExportError;
use crate::HEADERS;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use shared_types::Row;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const SHEET_NAME: &str = "Index";

const COLUMNS: [&str; 3] = ["A", "B", "C"];

const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

enum Cell<'a> {
    Text(&'a str),
    Number(u32),
    Empty,
}

pub fn write_xlsx(rows: &[Row]) -> Result<Vec<u8>, ExportError> {
    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes().to_vec()),
        ("_rels/.rels", ROOT_RELS.as_bytes().to_vec()),
        ("xl/workbook.xml", workbook_xml().into_bytes()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.as_bytes().to_vec()),
        ("xl/worksheets/sheet1.xml", sheet_xml(rows)?),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, body) in parts {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(name, options)?;
        zip.write_all(&body)
            .map_err(|e| ExportError::Spreadsheet(format!("writing {}: {}", name, e)))?;
    }

    Ok(zip.finish()?.into_inner())
}

fn workbook_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        SHEET_NAME
    )
}

/// Worksheet part; cell text is escaped by the writer
fn sheet_xml(rows: &[Row]) -> Result<Vec<u8>, ExportError> {
    let mut writer = Writer::new(Vec::new());

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    writer.write_event(Event::Start(
        BytesStart::new("worksheet").with_attributes([("xmlns", SPREADSHEET_NS)]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("sheetData")))?;

    write_row(&mut writer, 1, &HEADERS.map(Cell::Text))?;

    for (i, row) in rows.iter().enumerate() {
        let repair_order = if row.has_reference() {
            Cell::Text(&row.repair_order_number)
        } else {
            Cell::Empty
        };
        let cells = [
            Cell::Text(&row.bate_number),
            repair_order,
            Cell::Number(row.page_number),
        ];
        // Header occupies row 1
        write_row(&mut writer, i + 2, &cells)?;
    }

    writer.write_event(Event::End(BytesEnd::new("sheetData")))?;
    writer.write_event(Event::End(BytesEnd::new("worksheet")))?;
    Ok(writer.into_inner())
}

fn write_row(
    writer: &mut Writer<Vec<u8>>,
    row_number: usize,
    cells: &[Cell<'_>],
) -> Result<(), ExportError> {
    let row_ref = row_number.to_string();
    writer.write_event(Event::Start(
        BytesStart::new("row").with_attributes([("r", row_ref.as_str())]),
    ))?;

    for (column, cell) in COLUMNS.iter().zip(cells) {
        let reference = format!("{}{}", column, row_number);
        match cell {
            Cell::Text(text) => {
                writer.write_event(Event::Start(BytesStart::new("c").with_attributes([
                    ("r", reference.as_str()),
                    ("t", "inlineStr"),
                ])))?;
                writer.write_event(Event::Start(BytesStart::new("is")))?;
                writer.write_event(Event::Start(
                    BytesStart::new("t").with_attributes([("xml:space", "preserve")]),
                ))?;
                writer.write_event(Event::Text(BytesText::new(text)))?;
                writer.write_event(Event::End(BytesEnd::new("t")))?;
                writer.write_event(Event::End(BytesEnd::new("is")))?;
                writer.write_event(Event::End(BytesEnd::new("c")))?;
            }
            Cell::Number(n) => {
                writer.write_event(Event::Start(
                    BytesStart::new("c").with_attributes([("r", reference.as_str())]),
                ))?;
                writer.write_event(Event::Start(BytesStart::new("v")))?;
                writer.write_event(Event::Text(BytesText::new(&n.to_string())))?;
                writer.write_event(Event::End(BytesEnd::new("v")))?;
                writer.write_event(Event::End(BytesEnd::new("c")))?;
            }
            Cell::Empty => {}
        }
    }

    writer.write_event(Event::End(BytesEnd::new("row")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(page: u32, bate: &str, ro: &str) -> Row {
        Row {
            page_number: page,
            bate_number: bate.to_string(),
            repair_order_number: ro.to_string(),
        }
    }

    fn sheet(rows: &[Row]) -> String {
        String::from_utf8(sheet_xml(rows).unwrap()).unwrap()
    }

    #[test]
    fn test_sheet_xml_layout() {
        let xml = sheet(&[row(1, "AARON00012345", "54321")]);

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));

        assert!(xml.contains(r#"<c r="A1" t="inlineStr"><is><t xml:space="preserve">Bate Number</t></is></c>"#));
        assert!(xml.contains(r#"<c r="C1" t="inlineStr"><is><t xml:space="preserve">Page Number</t></is></c>"#));
        assert!(xml.contains(r#"<c r="A2" t="inlineStr"><is><t xml:space="preserve">AARON00012345</t></is></c>"#));
        assert!(xml.contains(r#"<c r="B2" t="inlineStr"><is><t xml:space="preserve">54321</t></is></c>"#));
        assert!(xml.contains(r#"<c r="C2"><v>1</v></c>"#));
    }

    #[test]
    fn test_empty_reference_omits_cell() {
        let xml = sheet(&[row(4, "AARON00000004", "")]);

        assert!(!xml.contains(r#"r="B2""#));
        assert!(xml.contains(r#"<c r="C2"><v>4</v></c>"#));
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = sheet(&[row(1, "A<&>B", "1\"2")]);
        assert!(xml.contains("A&lt;&amp;&gt;B"));
        assert!(xml.contains("1&quot;2"));
        assert!(!xml.contains("A<&>B"));
    }

    #[test]
    fn test_package_is_zip() {
        let bytes = write_xlsx(&[row(1, "AARON00012345", "54321")]).unwrap();
        assert_eq!(&bytes[0..2], b"PK");
    }
}
