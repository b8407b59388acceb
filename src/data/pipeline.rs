//! Load → prepare, memoized per source.

use crate::data::{
    ColumnSchema, DataLoader, DataProcessor, LoaderError, PreparedCache, PreparedData,
    ProcessorError, SourceKey,
};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error("Failed to prepare table: {0}")]
    Prepare(#[from] ProcessorError),
}

/// Where the employee spreadsheet comes from.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Bytes of a file picked by the user.
    Upload { file_name: String, bytes: Vec<u8> },
    /// A path typed by the user.
    Path(PathBuf),
}

impl DataSource {
    /// Short label shown next to the row count.
    pub fn origin_label(&self) -> &'static str {
        match self {
            DataSource::Upload { .. } => "Upload",
            DataSource::Path(_) => "Path",
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            DataSource::Upload { file_name, .. } => file_name.clone(),
            DataSource::Path(path) => path.display().to_string(),
        }
    }
}

/// Load and prepare `source`, reusing a cached table for an identical source.
///
/// A missing path fails before the cache is consulted.
pub fn load_prepared(
    source: &DataSource,
    schema: &ColumnSchema,
    today: NaiveDate,
    cache: &mut PreparedCache,
) -> Result<Arc<PreparedData>, PipelineError> {
    match source {
        DataSource::Upload { bytes, .. } => {
            cache.get_or_try_insert::<PipelineError>(SourceKey::for_bytes(bytes), today, || {
                let raw = DataLoader::load_bytes(bytes)?;
                Ok(DataProcessor::prepare_data(raw, schema, today)?)
            })
        }
        DataSource::Path(path) => {
            if !path.exists() {
                return Err(LoaderError::NotFound(path.clone()).into());
            }
            cache.get_or_try_insert::<PipelineError>(SourceKey::for_path(path), today, || {
                let raw = DataLoader::load_path(path)?;
                Ok(DataProcessor::prepare_data(raw, schema, today)?)
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_is_not_cached() {
        let mut cache = PreparedCache::new();
        let source = DataSource::Path(PathBuf::from("no/such/BaseFuncionarios.xlsx"));
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let err = load_prepared(&source, &ColumnSchema::default(), today, &mut cache).unwrap_err();
        assert!(matches!(err, PipelineError::Load(LoaderError::NotFound(_))));
        assert!(cache.is_empty());
    }

    #[test]
    fn labels_name_the_origin() {
        let upload = DataSource::Upload {
            file_name: "base.xlsx".to_string(),
            bytes: Vec::new(),
        };
        assert_eq!(upload.origin_label(), "Upload");
        assert_eq!(upload.display_name(), "base.xlsx");
        assert_eq!(DataSource::Path(PathBuf::from("a.xlsx")).origin_label(), "Path");
    }
}
