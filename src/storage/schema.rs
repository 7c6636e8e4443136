//! Database schema definitions
//!
//! This module contains the SQL schema for the document database.

use rusqlite::Connection;

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Raw bodies of fetched pages, keyed by normalized URL
CREATE TABLE IF NOT EXISTS documents (
    url TEXT PRIMARY KEY,
    domain TEXT NOT NULL,
    body TEXT NOT NULL,
    stored_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_domain ON documents(domain);
"#;

/// Initializes the database schema
///
/// Safe to call on an existing database; every statement is `IF NOT EXISTS`.
pub fn initialize_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)
}
