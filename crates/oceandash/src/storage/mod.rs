//! Document store for oceandash.
//!
//! A small `SQLite`-backed document store. Documents are JSON bodies grouped
//! by collection name, each with a store-generated identifier and insertion
//! timestamps. The store only appends and reads; nothing is updated or deleted.

pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Path reported for in-memory stores.
const MEMORY_PATH: &str = ":memory:";

/// Where a document store lives, parsed from a connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// A private in-memory database.
    Memory,
    /// A database file.
    File(PathBuf),
}

impl StoreLocation {
    /// Parse a connection string.
    ///
    /// Accepts `sqlite::memory:`, `:memory:`, `sqlite://PATH`, `sqlite:PATH`
    /// or a bare file path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDatabaseUrl`] for empty strings and for
    /// URLs with any other scheme.
    pub fn parse(url: &str) -> Result<Self> {
        let trimmed = url.trim();
        let unsupported = || Error::UnsupportedDatabaseUrl {
            url: url.to_string(),
        };

        if trimmed.is_empty() {
            return Err(unsupported());
        }
        if trimmed == MEMORY_PATH || trimmed == "sqlite::memory:" {
            return Ok(Self::Memory);
        }
        if let Some(path) = trimmed
            .strip_prefix("sqlite://")
            .or_else(|| trimmed.strip_prefix("sqlite:"))
        {
            if path.is_empty() {
                return Err(unsupported());
            }
            return Ok(Self::File(PathBuf::from(path)));
        }
        if trimmed.contains("://") {
            return Err(unsupported());
        }
        Ok(Self::File(PathBuf::from(trimmed)))
    }
}

/// A document as read back from the store, body still serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Store-generated identifier.
    pub id: String,
    /// JSON body.
    pub body: String,
    /// Insert time.
    pub created_at: DateTime<Utc>,
    /// Last write time.
    pub updated_at: DateTime<Utc>,
}

/// Document store backed by `SQLite`.
#[derive(Debug)]
pub struct DocumentStore {
    /// Logical database name reported in diagnostics.
    name: String,
    /// Database connection.
    conn: Connection,
}

impl DocumentStore {
    /// Open the store at a parsed location.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn connect(location: &StoreLocation, name: impl Into<String>) -> Result<Self> {
        match location {
            StoreLocation::Memory => Self::open_in_memory(name),
            StoreLocation::File(path) => Self::open(path, name),
        }
    }

    /// Open or create a store at the given path.
    ///
    /// Creates parent directories and the database file if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>, name: impl Into<String>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening document store at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // WAL keeps readers from blocking the single writer
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        schema::initialize(&conn)?;

        info!("Document store opened at {}", path.display());
        Ok(Self {
            name: name.into(),
            conn,
        })
    }

    /// Create an in-memory store.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory(name: impl Into<String>) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(MEMORY_PATH),
            source,
        })?;

        schema::initialize(&conn)?;

        Ok(Self {
            name: name.into(),
            conn,
        })
    }

    /// Logical database name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a document to `collection`, returning its new identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected.
    pub fn insert(&self, collection: &str, body: &str) -> Result<String> {
        let id = Uuid::new_v4().simple().to_string();
        let now = Utc::now().to_rfc3339();

        self.conn.execute(
            r"
            INSERT INTO documents (id, collection, body, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            ",
            params![id, collection, body, now],
        )?;

        debug!(collection, %id, "Inserted document");
        Ok(id)
    }

    /// Most recently inserted documents of `collection`, newest first.
    ///
    /// A plain document-database `find().limit()` hands back the oldest
    /// documents first; listing here favours the latest entries instead.
    /// `None` returns every document.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_recent(&self, collection: &str, limit: Option<usize>) -> Result<Vec<RawDocument>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, body, created_at, updated_at
            FROM documents WHERE collection = ?1
            ORDER BY seq DESC LIMIT ?2
            ",
        )?;

        // SQLite treats a negative LIMIT as unbounded
        let limit_i64 = limit.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX));
        let documents = stmt
            .query_map(params![collection, limit_i64], Self::row_to_document)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(collection, count = documents.len(), "Fetched documents");
        Ok(documents)
    }

    /// Names of collections holding at least one document, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn collection_names(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT collection FROM documents ORDER BY collection")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(names)
    }

    fn row_to_document(row: &rusqlite::Row) -> rusqlite::Result<RawDocument> {
        let id: String = row.get(0)?;
        let body: String = row.get(1)?;
        let created_at: String = row.get(2)?;
        let updated_at: String = row.get(3)?;

        Ok(RawDocument {
            created_at: parse_timestamp(&id, &created_at),
            updated_at: parse_timestamp(&id, &updated_at),
            id,
            body,
        })
    }
}

fn parse_timestamp(id: &str, value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value).map_or_else(
        |_| {
            warn!(%id, value, "Unparseable document timestamp, using epoch");
            DateTime::<Utc>::UNIX_EPOCH
        },
        |dt| dt.with_timezone(&Utc),
    )
}
