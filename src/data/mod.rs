//! Data module - spreadsheet loading, preparation and caching

mod cache;
pub mod coerce;
mod loader;
mod pipeline;
mod processor;
mod schema;

pub use cache::{PreparedCache, SourceKey};
pub use loader::{DataLoader, LoaderError};
pub use pipeline::{load_prepared, DataSource, PipelineError};
pub use processor::{DataProcessor, Diagnostic, PreparationReport, PreparedData, ProcessorError};
pub use schema::ColumnSchema;

use polars::prelude::*;

/// Whether a dtype holds plain numbers.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Display text of a single cell; `None` for nulls.
pub fn cell_text(value: &AnyValue) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(s) => Some(s.to_string()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        other => Some(other.to_string()),
    }
}

/// A column's values as labels, for grouping. Non-text columns are cast.
pub fn column_labels(df: &DataFrame, name: &str) -> Option<Vec<Option<String>>> {
    let column = df.column(name).ok()?;
    let text = column.cast(&DataType::String).ok()?;
    let values = text
        .str()
        .ok()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Some(values)
}

/// A column's values as floats. Values that cannot be read as numbers are `None`.
pub fn column_numbers(df: &DataFrame, name: &str) -> Option<Vec<Option<f64>>> {
    let column = df.column(name).ok()?;
    let numbers = column.cast(&DataType::Float64).ok()?;
    let values = numbers.f64().ok()?.into_iter().collect();
    Some(values)
}
