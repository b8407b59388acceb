//! Export module - CSV and XLSX downloads of the prepared table

mod csv;
mod xlsx;

pub use csv::CsvExporter;
pub use xlsx::{column_letter, XlsxGenerator};

use polars::prelude::DataFrame;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Download formats offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Xlsx => "Excel",
        }
    }

    /// Serialize `df` in this format. `sheet_name` only matters for XLSX.
    pub fn encode(self, df: &DataFrame, sheet_name: &str) -> Result<Vec<u8>, ExportError> {
        match self {
            ExportFormat::Csv => CsvExporter::to_csv_bytes(df),
            ExportFormat::Xlsx => XlsxGenerator::generate_xlsx_bytes(df, sheet_name),
        }
    }
}
