//! Storage module for persisting fetched documents
//!
//! This module provides the document store consumed by workers:
//! - An in-memory map, the default
//! - A SQLite database when `output.documents-path` is configured

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{DocumentStore, StorageError, StorageResult};

use crate::config::OutputConfig;
use std::path::Path;
use std::sync::Arc;

/// Opens the document store selected by the output configuration
///
/// # Returns
///
/// * `Ok(Arc<dyn DocumentStore>)` - SQLite store if a path is set, otherwise in-memory
/// * `Err(StorageError)` - The database could not be opened
pub fn open_store(config: &OutputConfig) -> StorageResult<Arc<dyn DocumentStore>> {
    match &config.documents_path {
        Some(path) => {
            tracing::info!("Storing documents in {}", path);
            Ok(Arc::new(SqliteStore::new(Path::new(path))?))
        }
        None => {
            tracing::debug!("Storing documents in memory");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_memory_store_by_default() {
        let store = open_store(&OutputConfig::default()).unwrap();
        store.store("a.example/x", "body").unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_open_sqlite_store_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.db");
        let config = OutputConfig {
            documents_path: Some(path.to_string_lossy().into_owned()),
        };

        let store = open_store(&config).unwrap();
        store.store("a.example/x", "body").unwrap();
        assert!(path.exists());
    }
}
