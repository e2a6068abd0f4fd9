//! Storage trait abstraction.

use readtrack_core::Document;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur while reading or writing the persisted document.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// A key-value slot holding the single document of the reading tracker.
///
/// Backends persist the whole document at once; there is no partial update
/// and no locking, so a backend shared by two writers keeps whichever save
/// lands last.
pub trait DocumentStore {
    /// Load the document, or `None` when nothing usable has been stored yet.
    fn load(&self) -> Result<Option<Document>>;

    /// Replace the stored document.
    fn save(&mut self, document: &Document) -> Result<()>;
}
