//! Read-through cache of prepared tables, keyed by input source.

use crate::data::PreparedData;
use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// Identity of an input source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKey {
    /// A file on disk; the modification time makes an edited file a new key.
    Path {
        path: PathBuf,
        modified: Option<SystemTime>,
    },
    /// Uploaded content, by SHA-256 digest.
    Content(String),
}

impl SourceKey {
    pub fn for_path(path: &Path) -> Self {
        let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok();
        SourceKey::Path {
            path: path.to_path_buf(),
            modified,
        }
    }

    pub fn for_bytes(bytes: &[u8]) -> Self {
        SourceKey::Content(hex::encode(Sha256::digest(bytes)))
    }
}

/// Prepared tables for the current session.
///
/// Derived columns depend on the calendar date, so "today" is part of the key.
/// Failed loads are never stored.
#[derive(Default)]
pub struct PreparedCache {
    entries: HashMap<(SourceKey, NaiveDate), Arc<PreparedData>>,
}

impl PreparedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `key`, or run `load` and remember its result.
    pub fn get_or_try_insert<E>(
        &mut self,
        key: SourceKey,
        today: NaiveDate,
        load: impl FnOnce() -> Result<PreparedData, E>,
    ) -> Result<Arc<PreparedData>, E> {
        let entry_key = (key, today);
        if let Some(hit) = self.entries.get(&entry_key) {
            tracing::debug!(key = ?entry_key.0, "prepared table served from cache");
            return Ok(Arc::clone(hit));
        }

        let prepared = Arc::new(load()?);
        self.entries.insert(entry_key, Arc::clone(&prepared));
        Ok(prepared)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PreparationReport;
    use polars::prelude::DataFrame;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn prepared() -> PreparedData {
        PreparedData {
            frame: DataFrame::empty(),
            report: PreparationReport::default(),
        }
    }

    #[test]
    fn same_key_loads_once() {
        let mut cache = PreparedCache::new();
        let mut calls = 0;

        for _ in 0..3 {
            cache
                .get_or_try_insert::<()>(SourceKey::for_bytes(b"abc"), today(), || {
                    calls += 1;
                    Ok(prepared())
                })
                .unwrap();
        }

        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn different_content_is_a_different_entry() {
        let mut cache = PreparedCache::new();
        cache
            .get_or_try_insert::<()>(SourceKey::for_bytes(b"one"), today(), || Ok(prepared()))
            .unwrap();
        cache
            .get_or_try_insert::<()>(SourceKey::for_bytes(b"two"), today(), || Ok(prepared()))
            .unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn failures_are_not_cached() {
        let mut cache = PreparedCache::new();
        let key = SourceKey::for_bytes(b"broken");

        let first = cache.get_or_try_insert(key.clone(), today(), || Err("boom"));
        assert!(first.is_err());
        assert!(cache.is_empty());

        let second = cache.get_or_try_insert::<&str>(key, today(), || Ok(prepared()));
        assert!(second.is_ok());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn content_keys_are_sha256_hex() {
        let SourceKey::Content(digest) = SourceKey::for_bytes(b"") else {
            panic!("expected a content key");
        };
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
