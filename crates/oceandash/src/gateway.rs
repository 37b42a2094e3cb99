//! Persistence gateway.
//!
//! [`PersistenceGateway`] is the only path from request handlers to the
//! document store. It is built once at startup and cloned into every handler.
//! Each call is one blocking round trip to the store, run off the async
//! executor. Store identifiers leave the gateway as plain strings.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};
use crate::model::{Document, Stored};
use crate::storage::{DocumentStore, StoreLocation};

/// Most collection names reported by [`PersistenceGateway::diagnostics`].
pub const MAX_DIAGNOSTIC_COLLECTIONS: usize = 10;

/// Longest store error text embedded in diagnostics.
pub const DIAGNOSTIC_MESSAGE_LIMIT: usize = 80;

#[derive(Debug)]
enum StoreHandle {
    /// No connection string was supplied.
    Unconfigured,
    /// A connection string was supplied but opening the store failed.
    Failed(String),
    Ready(Mutex<DocumentStore>),
}

#[derive(Debug)]
struct Inner {
    handle: StoreHandle,
    database_name: String,
    url_set: bool,
}

impl Inner {
    fn store(&self) -> Result<&Mutex<DocumentStore>> {
        match &self.handle {
            StoreHandle::Ready(store) => Ok(store),
            StoreHandle::Unconfigured => {
                Err(Error::store_unavailable("no database url configured"))
            }
            StoreHandle::Failed(reason) => Err(Error::store_unavailable(reason.clone())),
        }
    }
}

/// Uniform insert/query access to the document store.
#[derive(Debug, Clone)]
pub struct PersistenceGateway {
    inner: Arc<Inner>,
}

impl PersistenceGateway {
    /// Connect using the database configuration.
    ///
    /// Never fails: a missing URL or a store that cannot be opened leaves the
    /// gateway in a "not available" state where every insert and query
    /// returns [`Error::StoreUnavailable`].
    #[must_use]
    pub fn connect(config: &DatabaseConfig) -> Self {
        let Some(url) = config.url.as_deref() else {
            warn!("No database url configured, document store not available");
            return Self::with_handle(StoreHandle::Unconfigured, &config.name, false);
        };

        let handle = match StoreLocation::parse(url)
            .and_then(|location| DocumentStore::connect(&location, config.name.clone()))
        {
            Ok(store) => {
                info!(database = %config.name, "Document store connected");
                StoreHandle::Ready(Mutex::new(store))
            }
            Err(err) => {
                error!(error = %err, "Failed to open document store");
                StoreHandle::Failed(err.to_string())
            }
        };
        Self::with_handle(handle, &config.name, true)
    }

    /// Wrap an already opened store.
    #[must_use]
    pub fn from_store(store: DocumentStore) -> Self {
        let name = store.name().to_string();
        Self::with_handle(StoreHandle::Ready(Mutex::new(store)), &name, true)
    }

    /// A gateway with no store behind it.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::with_handle(StoreHandle::Unconfigured, "", false)
    }

    fn with_handle(handle: StoreHandle, database_name: &str, url_set: bool) -> Self {
        Self {
            inner: Arc::new(Inner {
                handle,
                database_name: database_name.to_string(),
                url_set,
            }),
        }
    }

    /// Whether a store is connected.
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self.inner.handle, StoreHandle::Ready(_))
    }

    /// Store a validated entity in its collection, returning the new id.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store is unavailable or rejects the
    /// write.
    pub async fn insert<D: Document>(&self, document: &D) -> Result<String> {
        let body = serde_json::to_string(document)?;
        self.with_store(move |store| store.insert(D::COLLECTION.name(), &body))
            .await
    }

    /// Up to `limit` most recent documents of an entity's collection.
    ///
    /// `None` means no limit.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store is unavailable, the query fails,
    /// or a stored body no longer matches the entity shape.
    pub async fn query<D: Document>(&self, limit: Option<usize>) -> Result<Vec<Stored<D>>> {
        let raw = self
            .with_store(move |store| store.find_recent(D::COLLECTION.name(), limit))
            .await?;

        raw.into_iter()
            .map(|doc| -> Result<Stored<D>> {
                Ok(Stored {
                    document: serde_json::from_str(&doc.body)?,
                    id: doc.id,
                    created_at: doc.created_at,
                    updated_at: doc.updated_at,
                })
            })
            .collect()
    }

    /// Connectivity report for the diagnostic endpoint. Never fails.
    pub async fn diagnostics(&self) -> Diagnostics {
        let inner = Arc::clone(&self.inner);
        match tokio::task::spawn_blocking(move || Diagnostics::collect(&inner)).await {
            Ok(report) => report,
            Err(err) => {
                let mut report = Diagnostics::not_connected();
                report.database = format!("❌ Error: {}", truncate(&err.to_string()));
                report
            }
        }
    }

    async fn with_store<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&DocumentStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let store = inner
                .store()?
                .lock()
                .map_err(|_| Error::internal("document store lock poisoned"))?;
            op(&*store)
        })
        .await
        .map_err(|err| Error::internal(format!("store task failed: {err}")))?
    }
}

/// Store connectivity report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Backend status; always `✅ Running` when this is served.
    pub backend: String,
    /// Store availability summary.
    pub database: String,
    /// `✅ Set` or `❌ Not Set` once a store is attached.
    pub database_url: Option<String>,
    /// Logical database name.
    pub database_name: Option<String>,
    /// Connection status.
    pub connection_status: String,
    /// Up to [`MAX_DIAGNOSTIC_COLLECTIONS`] collection names.
    pub collections: Vec<String>,
}

impl Diagnostics {
    fn not_connected() -> Self {
        Self {
            backend: "✅ Running".to_string(),
            database: "❌ Not Available".to_string(),
            database_url: None,
            database_name: None,
            connection_status: "Not Connected".to_string(),
            collections: Vec::new(),
        }
    }

    fn collect(inner: &Inner) -> Self {
        let mut report = Self::not_connected();

        let store = match &inner.handle {
            StoreHandle::Unconfigured => return report,
            StoreHandle::Failed(reason) => {
                report.database_url = Some("✅ Set".to_string());
                report.database = format!("❌ Error: {}", truncate(reason));
                return report;
            }
            StoreHandle::Ready(store) => store,
        };

        report.database = "✅ Available".to_string();
        let url_state = if inner.url_set { "✅ Set" } else { "❌ Not Set" };
        report.database_url = Some(url_state.to_string());
        report.database_name = Some(inner.database_name.clone());
        report.connection_status = "Connected".to_string();

        let names = store
            .lock()
            .map_err(|_| Error::internal("document store lock poisoned"))
            .and_then(|store| store.collection_names());
        match names {
            Ok(mut names) => {
                names.truncate(MAX_DIAGNOSTIC_COLLECTIONS);
                report.collections = names;
                report.database = "✅ Connected & Working".to_string();
            }
            Err(err) => {
                report.database =
                    format!("⚠️ Connected but Error: {}", truncate(&err.to_string()));
            }
        }
        report
    }
}

fn truncate(message: &str) -> String {
    message.chars().take(DIAGNOSTIC_MESSAGE_LIMIT).collect()
}
