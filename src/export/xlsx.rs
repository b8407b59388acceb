//! XLSX Export Module
//! Writes a DataFrame as a single-sheet workbook.
//!
//! Uses direct ZIP/XML generation: every part of the SpreadsheetML package
//! is written by hand, text cells are inline strings, so no shared-string
//! table is needed.

use crate::data::coerce::{
    date_to_excel_serial, datetime_to_excel_serial, epoch_days_to_date, epoch_millis_to_datetime,
};
use crate::export::ExportError;
use polars::prelude::*;
use std::io::{Cursor, Write};
use ::zip::write::FileOptions;
use ::zip::ZipWriter;

/// Style index of the built-in short date format in `styles.xml`.
const DATE_STYLE: usize = 1;
/// Style index of the built-in date-time format in `styles.xml`.
const DATETIME_STYLE: usize = 2;

/// Excel caps sheet names at 31 characters.
const MAX_SHEET_NAME: usize = 31;

/// A cell value ready to be written.
#[derive(Debug, Clone, PartialEq)]
enum XlsxCell {
    Number(f64),
    Text(String),
    Bool(bool),
    Date(f64),
    DateTime(f64),
}

/// XLSX generator for exporting the employee table
pub struct XlsxGenerator;

impl XlsxGenerator {
    /// Build the workbook in memory.
    pub fn generate_xlsx_bytes(df: &DataFrame, sheet_name: &str) -> Result<Vec<u8>, ExportError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default();

        // 1. Package parts
        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(Self::content_types_xml().as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(Self::rels_xml().as_bytes())?;

        // 2. Workbook and its relationships
        zip.start_file("xl/workbook.xml", options)?;
        zip.write_all(Self::workbook_xml(sheet_name).as_bytes())?;

        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        zip.write_all(Self::workbook_rels_xml().as_bytes())?;

        // 3. Styles (date formats)
        zip.start_file("xl/styles.xml", options)?;
        zip.write_all(Self::styles_xml().as_bytes())?;

        // 4. The sheet itself
        zip.start_file("xl/worksheets/sheet1.xml", options)?;
        zip.write_all(Self::sheet_xml(df)?.as_bytes())?;

        let bytes = zip.finish()?.into_inner();
        tracing::info!(
            rows = df.height(),
            columns = df.width(),
            size = bytes.len(),
            "xlsx export built"
        );
        Ok(bytes)
    }

    fn content_types_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
</Types>"#
    }

    fn rels_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#
    }

    fn workbook_xml(sheet_name: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#,
            escape_xml(&Self::clean_sheet_name(sheet_name))
        )
    }

    fn workbook_rels_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#
    }

    /// Cell formats: 0 general, 1 short date (numFmt 14), 2 date-time (numFmt 22).
    fn styles_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
<fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>
<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
<cellXfs count="3">
<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
<xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
<xf numFmtId="22" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
</cellXfs>
<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>
</styleSheet>"#
    }

    fn sheet_xml(df: &DataFrame) -> Result<String, ExportError> {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
"#,
        );

        // Header row
        xml.push_str(r#"<row r="1">"#);
        for (col_idx, column) in df.get_columns().iter().enumerate() {
            let cell_ref = format!("{}1", column_letter(col_idx));
            push_cell(&mut xml, &cell_ref, &XlsxCell::Text(column.name().to_string()));
        }
        xml.push_str("</row>\n");

        // Data rows
        let columns = df.get_columns();
        for row_idx in 0..df.height() {
            let excel_row = row_idx + 2;
            xml.push_str(&format!(r#"<row r="{}">"#, excel_row));
            for (col_idx, column) in columns.iter().enumerate() {
                let value = column.get(row_idx)?;
                if let Some(cell) = Self::to_cell(&value) {
                    let cell_ref = format!("{}{}", column_letter(col_idx), excel_row);
                    push_cell(&mut xml, &cell_ref, &cell);
                }
            }
            xml.push_str("</row>\n");
        }

        xml.push_str("</sheetData>\n</worksheet>");
        Ok(xml)
    }

    /// Map a polars value to a cell; nulls and non-finite numbers stay empty.
    fn to_cell(value: &AnyValue) -> Option<XlsxCell> {
        let cell = match value {
            AnyValue::Null => return None,
            AnyValue::Boolean(b) => XlsxCell::Bool(*b),
            AnyValue::String(s) => XlsxCell::Text(s.to_string()),
            AnyValue::StringOwned(s) => XlsxCell::Text(s.to_string()),
            AnyValue::Date(days) => {
                XlsxCell::Date(date_to_excel_serial(epoch_days_to_date(*days)?))
            }
            AnyValue::Datetime(v, unit, _) => {
                let millis = match unit {
                    TimeUnit::Nanoseconds => v / 1_000_000,
                    TimeUnit::Microseconds => v / 1_000,
                    TimeUnit::Milliseconds => *v,
                };
                XlsxCell::DateTime(datetime_to_excel_serial(epoch_millis_to_datetime(millis)?))
            }
            other => match numeric_value(other) {
                Some(n) if n.is_finite() => XlsxCell::Number(n),
                Some(_) => return None,
                None => XlsxCell::Text(other.to_string()),
            },
        };
        Some(cell)
    }

    fn clean_sheet_name(name: &str) -> String {
        let cleaned: String = name
            .chars()
            .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
            .take(MAX_SHEET_NAME)
            .collect();
        if cleaned.trim().is_empty() {
            "Sheet1".to_string()
        } else {
            cleaned
        }
    }
}

fn numeric_value(value: &AnyValue) -> Option<f64> {
    match value {
        AnyValue::Int8(v) => Some(f64::from(*v)),
        AnyValue::Int16(v) => Some(f64::from(*v)),
        AnyValue::Int32(v) => Some(f64::from(*v)),
        AnyValue::Int64(v) => Some(*v as f64),
        AnyValue::UInt8(v) => Some(f64::from(*v)),
        AnyValue::UInt16(v) => Some(f64::from(*v)),
        AnyValue::UInt32(v) => Some(f64::from(*v)),
        AnyValue::UInt64(v) => Some(*v as f64),
        AnyValue::Float32(v) => Some(f64::from(*v)),
        AnyValue::Float64(v) => Some(*v),
        _ => None,
    }
}

fn push_cell(xml: &mut String, cell_ref: &str, cell: &XlsxCell) {
    match cell {
        XlsxCell::Number(n) => {
            xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, cell_ref, n));
        }
        XlsxCell::Text(s) => {
            xml.push_str(&format!(
                r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                cell_ref,
                escape_xml(s)
            ));
        }
        XlsxCell::Bool(b) => {
            xml.push_str(&format!(
                r#"<c r="{}" t="b"><v>{}</v></c>"#,
                cell_ref,
                u8::from(*b)
            ));
        }
        XlsxCell::Date(serial) => {
            xml.push_str(&format!(
                r#"<c r="{}" s="{}"><v>{}</v></c>"#,
                cell_ref, DATE_STYLE, serial
            ));
        }
        XlsxCell::DateTime(serial) => {
            xml.push_str(&format!(
                r#"<c r="{}" s="{}"><v>{}</v></c>"#,
                cell_ref, DATETIME_STYLE, serial
            ));
        }
    }
}

/// Spreadsheet column letters: 0 → A, 25 → Z, 26 → AA.
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Escape text for XML content and drop characters XML 1.0 cannot carry.
fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\t' | '\n' | '\r' => escaped.push(c),
            c if (c as u32) < 0x20 => {}
            c => escaped.push(c),
        }
    }
    escaped
}
