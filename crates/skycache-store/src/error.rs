//! Error types for skycache-store.

use std::path::PathBuf;

/// Result type for skycache-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in skycache-store.
///
/// Constraint violations on insert are always reported through their own
/// variants ([`Error::Duplicate`], [`Error::Reference`]) so callers can
/// branch on recoverability.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backing database could not be created or opened.
    #[error("Failed to open store at {path}: {source}")]
    StorageInit {
        path: PathBuf,
        source: rusqlite::Error,
    },

    /// Failed to create database directory.
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A location with this setting already exists.
    #[error("Location '{location_setting}' already exists")]
    Duplicate { location_setting: String },

    /// The weather row references a location that does not exist.
    #[error("Location id {location_id} does not exist")]
    Reference { location_id: i64 },

    /// The store handle has been closed.
    #[error("Store is closed")]
    StoreClosed,

    /// The store handle has not been opened yet.
    #[error("Store is not open")]
    NotOpen,

    /// Input failed validation before reaching the database.
    #[error(transparent)]
    InvalidInput(#[from] skycache_types::ParseError),

    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV export error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Whether the caller can recover by changing its input.
    ///
    /// ```
    /// use skycache_store::Error;
    ///
    /// assert!(Error::Reference { location_id: 7 }.is_recoverable());
    /// assert!(!Error::StoreClosed.is_recoverable());
    /// ```
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Duplicate { .. } | Error::Reference { .. } | Error::InvalidInput(_)
        )
    }
}
