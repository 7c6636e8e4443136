//! In-process document store
//!
//! Bodies live for the duration of the crawl run and are dropped with the store.

use crate::storage::traits::{DocumentStore, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::Mutex;

/// Document store backed by a map from URL to body
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn store(&self, url: &str, body: &str) -> StorageResult<()> {
        let mut documents = self.documents.lock().map_err(|_| StorageError::Poisoned)?;
        documents.insert(url.to_string(), body.to_string());
        Ok(())
    }

    fn get(&self, url: &str) -> StorageResult<Option<String>> {
        let documents = self.documents.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(documents.get(url).cloned())
    }

    fn count(&self) -> StorageResult<u64> {
        let documents = self.documents.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(documents.len() as u64)
    }
}
