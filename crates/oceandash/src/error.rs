//! Error types for oceandash.
//!
//! This module defines the error types used throughout the crate. Two families
//! matter to API callers: validation failures, which are reported field by field
//! before any store interaction, and storage failures, which carry the store's
//! raw message.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// The main error type for oceandash operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Validation Errors ===
    /// An inbound payload violated its schema.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    // === Storage Errors ===
    /// Failed to open or create the document store.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// No document store is connected.
    #[error("database not available: {reason}")]
    StoreUnavailable {
        /// Why the store is unavailable.
        reason: String,
    },

    /// The configured database URL could not be understood.
    #[error("unsupported database url '{url}': expected sqlite://PATH, sqlite::memory: or a file path")]
    UnsupportedDatabaseUrl {
        /// The rejected URL.
        url: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Server Errors ===
    /// The HTTP listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address we tried to listen on.
        addr: SocketAddr,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The configured listen address is not a valid socket address.
    #[error("invalid listen address '{0}'")]
    ListenAddress(String),

    // === I/O Errors ===
    /// File system or socket operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for oceandash operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a store-unavailable error.
    #[must_use]
    pub fn store_unavailable(reason: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            reason: reason.into(),
        }
    }

    /// Check if this error is a validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error came from the document store.
    #[must_use]
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::DatabaseOpen { .. }
                | Self::DatabaseQuery(_)
                | Self::StoreUnavailable { .. }
                | Self::UnsupportedDatabaseUrl { .. }
                | Self::Json(_)
        )
    }
}

/// How a single field violated its schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required field was absent or null.
    Missing,
    /// The field could not be decoded as its declared type.
    WrongType,
    /// A numeric field fell outside its inclusive range.
    OutOfRange,
}

/// A single field-level schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Name of the offending field.
    pub field: String,
    /// What was wrong with it.
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    /// Human-readable detail, e.g. `greater than 90`.
    pub message: String,
}

impl FieldViolation {
    /// Create a violation.
    #[must_use]
    pub fn new(field: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }

    /// A required field that was absent or null.
    #[must_use]
    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(field, ViolationKind::Missing, "field required")
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every violation found in one payload.
///
/// Never empty when produced by the entity layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Build an error from collected violations.
    #[must_use]
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    /// Build an error for a single field.
    #[must_use]
    pub fn single(field: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self::new(vec![FieldViolation::new(field, kind, message)])
    }

    /// The individual violations.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Whether the named field is among the violations.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.violations.iter().map(ToString::to_string).collect();
        f.write_str(&rendered.join(", "))
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
    }

    #[test]
    fn test_store_unavailable_display() {
        let err = Error::store_unavailable("DATABASE_URL not set");
        assert_eq!(
            err.to_string(),
            "database not available: DATABASE_URL not set"
        );
        assert!(err.is_storage());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
            assert!(err.is_storage());
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_unsupported_url_display() {
        let err = Error::UnsupportedDatabaseUrl {
            url: "mongodb://localhost".to_string(),
        };
        assert!(err.to_string().contains("mongodb://localhost"));
    }

    #[test]
    fn test_field_violation_messages() {
        assert_eq!(
            FieldViolation::missing("name").to_string(),
            "name: field required"
        );
        assert_eq!(
            FieldViolation::new(
                "lat",
                ViolationKind::WrongType,
                "invalid type: string \"north\", expected f64"
            )
            .to_string(),
            "lat: invalid type: string \"north\", expected f64"
        );
        assert_eq!(
            FieldViolation::new("speed", ViolationKind::OutOfRange, "lower than 0").to_string(),
            "speed: lower than 0"
        );
    }

    #[test]
    fn test_validation_error_joins_violations() {
        let err = ValidationError::new(vec![
            FieldViolation::missing("name"),
            FieldViolation::missing("message"),
        ]);
        assert_eq!(err.to_string(), "name: field required, message: field required");
        assert!(err.has_field("message"));
        assert!(!err.has_field("lat"));

        let wrapped: Error = err.into();
        assert!(wrapped.is_validation());
        assert!(!wrapped.is_storage());
    }

    #[test]
    fn test_violation_serializes_with_kind_tag() {
        let violation = FieldViolation::new("heading", ViolationKind::OutOfRange, "greater than 360");
        let json = serde_json::to_value(&violation).unwrap();
        assert_eq!(json["field"], "heading");
        assert_eq!(json["type"], "out_of_range");
        assert_eq!(json["message"], "greater than 360");
    }
}
