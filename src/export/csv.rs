//! CSV Export Module
//! UTF-8, comma separated, header row first, no index column.

use crate::export::ExportError;
use polars::prelude::*;

pub struct CsvExporter;

impl CsvExporter {
    pub fn to_csv_bytes(df: &DataFrame) -> Result<Vec<u8>, ExportError> {
        let mut buf: Vec<u8> = Vec::new();
        let mut frame = df.clone();
        CsvWriter::new(&mut buf)
            .include_header(true)
            .with_separator(b',')
            .finish(&mut frame)?;
        tracing::info!(rows = df.height(), size = buf.len(), "csv export built");
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_comes_first() {
        let df = df!("Nome" => ["Ana", "Bruno"], "Salario Base" => [5000.0, 3000.5]).unwrap();
        let text = String::from_utf8(CsvExporter::to_csv_bytes(&df).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Nome,Salario Base");
        assert!(lines[1].starts_with("Ana,5000"));
        assert_eq!(lines[2], "Bruno,3000.5");
    }

    #[test]
    fn empty_table_keeps_header() {
        let df = df!("Nome" => Vec::<String>::new()).unwrap();
        let text = String::from_utf8(CsvExporter::to_csv_bytes(&df).unwrap()).unwrap();
        assert_eq!(text.trim_end(), "Nome");
    }
}
