//! Storage traits and error types
//!
//! This module defines the trait interface for document stores and
//! associated error types.

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Store lock poisoned")]
    Poisoned,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Persists the raw body of every fetched page
///
/// Implementations are shared by all workers, so they take `&self` and
/// provide their own synchronization. Storing the same URL twice replaces
/// the earlier body.
pub trait DocumentStore: Send + Sync {
    /// Stores a fetched document under its normalized URL
    fn store(&self, url: &str, body: &str) -> StorageResult<()>;

    /// Returns the stored body for a URL, if any
    fn get(&self, url: &str) -> StorageResult<Option<String>>;

    /// Number of stored documents
    fn count(&self) -> StorageResult<u64>;
}
