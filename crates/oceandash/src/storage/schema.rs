//! `SQLite` schema definitions for the document store.

use rusqlite::Connection;

use crate::error::Result;

/// Documents of every collection live in one table, tagged by collection name.
///
/// `seq` gives insertion order; `id` is the store-generated identifier
/// handed back to callers.
pub const CREATE_DOCUMENTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS documents (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    collection TEXT NOT NULL,
    body TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// Index serving per-collection listing, newest first.
pub const CREATE_COLLECTION_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection, seq DESC)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_DOCUMENTS_TABLE, CREATE_COLLECTION_INDEX];

/// Create the table and index if they do not exist yet.
///
/// # Errors
///
/// Returns an error if a statement fails.
pub fn initialize(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }
    Ok(())
}
