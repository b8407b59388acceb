//! Spreadsheet Loader Module
//! Reads the first worksheet of a workbook into a polars DataFrame.

use crate::data::coerce::{date_to_epoch_days, datetime_to_epoch_millis, excel_serial_to_datetime};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::{NaiveDateTime, Timelike};
use polars::prelude::*;
use std::collections::HashSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("Workbook has no worksheets")]
    NoSheet,
    #[error("Failed to build table: {0}")]
    Polars(#[from] PolarsError),
}

/// A single worksheet cell, reduced to what column inference cares about.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Empty,
    Bool(bool),
    Number(f64),
    DateTime(NaiveDateTime),
    Text(String),
}

impl Cell {
    fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => Cell::Empty,
            Data::Bool(b) => Cell::Bool(*b),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::DateTime(dt) if dt.is_datetime() => excel_serial_to_datetime(dt.as_f64())
                .map(Cell::DateTime)
                .unwrap_or(Cell::Number(dt.as_f64())),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                Cell::Text(s.clone())
            }
        }
    }

    /// Text form used when a column has to fall back to strings.
    fn render(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Bool(b) => Some(b.to_string()),
            Cell::Number(n) => Some(n.to_string()),
            Cell::DateTime(dt) if is_midnight(dt) => Some(dt.format("%Y-%m-%d").to_string()),
            Cell::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
            Cell::Text(s) => Some(s.clone()),
        }
    }
}

fn is_midnight(dt: &NaiveDateTime) -> bool {
    dt.num_seconds_from_midnight() == 0
}

/// Handles spreadsheet loading, either from disk or from uploaded bytes.
pub struct DataLoader;

impl DataLoader {
    /// Load the first worksheet of the workbook at `path`.
    pub fn load_path(path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        tracing::info!(path = %path.display(), "reading workbook");
        let mut workbook = open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(LoaderError::NoSheet)??;

        Self::range_to_dataframe(&range)
    }

    /// Load the first worksheet of an uploaded workbook.
    pub fn load_bytes(bytes: &[u8]) -> Result<DataFrame, LoaderError> {
        tracing::info!(size = bytes.len(), "reading uploaded workbook");
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(LoaderError::NoSheet)??;

        Self::range_to_dataframe(&range)
    }

    /// Convert a worksheet range to a DataFrame. The first row holds the headers.
    pub fn range_to_dataframe(range: &Range<Data>) -> Result<DataFrame, LoaderError> {
        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            return Ok(DataFrame::empty());
        };

        let headers = Self::unique_headers(
            header_row
                .iter()
                .map(|cell| Cell::from_data(cell).render())
                .collect(),
        );

        let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); headers.len()];
        for row in rows {
            for (idx, column) in cells.iter_mut().enumerate() {
                column.push(row.get(idx).map(Cell::from_data).unwrap_or(Cell::Empty));
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells.iter())
            .map(|(name, column_cells)| Self::build_column(&name, column_cells))
            .collect::<PolarsResult<Vec<Column>>>()?;

        let df = DataFrame::new(columns)?;
        tracing::debug!(rows = df.height(), columns = df.width(), "worksheet converted");
        Ok(df)
    }

    /// Name blank headers `Unnamed: {i}` and suffix repeats with `.1`, `.2`, ...
    fn unique_headers(raw: Vec<Option<String>>) -> Vec<String> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut headers = Vec::with_capacity(raw.len());

        for (idx, header) in raw.into_iter().enumerate() {
            let base = match header {
                Some(h) if !h.trim().is_empty() => h,
                _ => format!("Unnamed: {idx}"),
            };

            let mut candidate = base.clone();
            let mut suffix = 1;
            while seen.contains(&candidate) {
                candidate = format!("{base}.{suffix}");
                suffix += 1;
            }
            seen.insert(candidate.clone());
            headers.push(candidate);
        }

        headers
    }

    /// Pick one dtype for a column from its non-empty cells.
    fn build_column(name: &str, cells: &[Cell]) -> PolarsResult<Column> {
        let filled: Vec<&Cell> = cells.iter().filter(|c| **c != Cell::Empty).collect();
        let name = PlSmallStr::from(name);

        if filled.is_empty() {
            let values: Vec<Option<String>> = vec![None; cells.len()];
            return Ok(Column::new(name, values));
        }

        if filled.iter().all(|c| matches!(c, Cell::Bool(_))) {
            let values: Vec<Option<bool>> = cells
                .iter()
                .map(|c| match c {
                    Cell::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect();
            return Ok(Column::new(name, values));
        }

        if filled.iter().all(|c| matches!(c, Cell::Number(_))) {
            let numbers: Vec<Option<f64>> = cells
                .iter()
                .map(|c| match c {
                    Cell::Number(n) => Some(*n),
                    _ => None,
                })
                .collect();

            let whole = numbers
                .iter()
                .flatten()
                .all(|n| n.fract() == 0.0 && n.abs() < 9.0e15);
            if whole {
                let values: Vec<Option<i64>> =
                    numbers.iter().map(|n| n.map(|v| v as i64)).collect();
                return Ok(Column::new(name, values));
            }
            return Ok(Column::new(name, numbers));
        }

        if filled.iter().all(|c| matches!(c, Cell::DateTime(_))) {
            let datetimes: Vec<Option<NaiveDateTime>> = cells
                .iter()
                .map(|c| match c {
                    Cell::DateTime(dt) => Some(*dt),
                    _ => None,
                })
                .collect();

            if datetimes.iter().flatten().all(is_midnight) {
                let days: Vec<Option<i32>> = datetimes
                    .iter()
                    .map(|dt| dt.map(|d| date_to_epoch_days(d.date())))
                    .collect();
                return Column::new(name, days).cast(&DataType::Date);
            }

            let millis: Vec<Option<i64>> = datetimes
                .iter()
                .map(|dt| dt.map(datetime_to_epoch_millis))
                .collect();
            return Column::new(name, millis)
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None));
        }

        let values: Vec<Option<String>> = cells.iter().map(Cell::render).collect();
        Ok(Column::new(name, values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: Vec<Vec<Data>>) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), value);
            }
        }
        range
    }

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    #[test]
    fn missing_path_is_reported() {
        let err = DataLoader::load_path(Path::new("definitely/not/here.xlsx")).unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
        assert!(err.to_string().contains("here.xlsx"));
    }

    #[test]
    fn garbage_bytes_are_a_spreadsheet_error() {
        let err = DataLoader::load_bytes(b"this is not a workbook").unwrap_err();
        assert!(matches!(err, LoaderError::Spreadsheet(_)));
    }

    #[test]
    fn headers_are_made_unique() {
        let headers = DataLoader::unique_headers(vec![
            Some("Nome".to_string()),
            None,
            Some("Nome".to_string()),
            Some("  ".to_string()),
            Some("Nome".to_string()),
        ]);
        assert_eq!(
            headers,
            vec!["Nome", "Unnamed: 1", "Nome.1", "Unnamed: 3", "Nome.2"]
        );
    }

    #[test]
    fn column_types_are_inferred() {
        let range = sheet(vec![
            vec![text("Nome"), text("Salario Base"), text("Nota"), text("Ativo"), text("Misto")],
            vec![text("Ana"), Data::Float(5000.0), Data::Float(4.5), Data::Bool(true), Data::Float(1.0)],
            vec![text("Bruno"), Data::Int(3000), Data::Empty, Data::Bool(false), text("x")],
        ]);

        let df = DataLoader::range_to_dataframe(&range).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("Nome").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("Salario Base").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("Nota").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("Ativo").unwrap().dtype(), &DataType::Boolean);

        let mixed = df.column("Misto").unwrap();
        assert_eq!(mixed.dtype(), &DataType::String);
        let mixed: Vec<Option<&str>> = mixed.str().unwrap().into_iter().collect();
        assert_eq!(mixed, vec![Some("1"), Some("x")]);
    }

    #[test]
    fn header_only_sheet_has_no_rows() {
        let range = sheet(vec![vec![text("Nome"), text("Cargo")]]);
        let df = DataLoader::range_to_dataframe(&range).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn empty_column_is_all_null_text() {
        let range = sheet(vec![
            vec![text("Nome"), text("Data de Demissao")],
            vec![text("Ana"), Data::Empty],
        ]);
        let df = DataLoader::range_to_dataframe(&range).unwrap();
        let column = df.column("Data de Demissao").unwrap();
        assert_eq!(column.dtype(), &DataType::String);
        assert_eq!(column.null_count(), 1);
    }
}
