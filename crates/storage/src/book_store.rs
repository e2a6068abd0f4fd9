//! Checkpoint store: book and checkpoint CRUD over a [`DocumentStore`].
//!
//! Every call loads the full document, applies its change and saves the
//! whole document back before returning. Nothing is cached between calls.
//! This assumes a single writer: two stores sharing one backend can
//! overwrite each other's changes.

use chrono::Utc;
use readtrack_core::{Book, BookId, Checkpoint, CheckpointId, Document, Time, ValidationError};
use serde_json::Value;
use tracing::{debug, info};
use super::{DocumentStore, StorageError};

/// Result type for [`BookStore`] operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors returned by [`BookStore`].
///
/// Absent books and checkpoints are not errors; see the individual methods.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Malformed input
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend could not be read or written
    #[error("Persistence error: {0}")]
    Persistence(#[from] StorageError),
}

/// Owns the persisted books and their checkpoints.
pub struct BookStore<S: DocumentStore> {
    storage: S,
}

impl<S: DocumentStore> BookStore<S> {
    /// Create a store over a persistence backend.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// The underlying backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn load(&self) -> StoreResult<Document> {
        Ok(self.storage.load()?.unwrap_or_default())
    }

    fn save(&mut self, document: &Document) -> StoreResult<()> {
        self.storage.save(document)?;
        Ok(())
    }

    /// All books in persisted order.
    pub fn list_books(&self) -> StoreResult<Vec<Book>> {
        Ok(self.load()?.books)
    }

    /// Look up a book. `None` when it doesn't exist.
    pub fn get_book(&self, id: &BookId) -> StoreResult<Option<Book>> {
        Ok(self.load()?.books.into_iter().find(|b| &b.id == id))
    }

    /// Create a book seeded with a zero-page checkpoint.
    ///
    /// `start_time` backdates the book; it defaults to now.
    pub fn add_book(
        &mut self,
        name: &str,
        total_pages: i64,
        start_time: Option<Time>,
    ) -> StoreResult<Book> {
        let book = Book::new(name, total_pages, start_time.unwrap_or_else(Utc::now))?;

        let mut document = self.load()?;
        document.books.push(book.clone());
        self.save(&document)?;

        info!(book_id = %book.id, name = %book.name, total_pages = book.total_pages, "Added book");
        Ok(book)
    }

    /// Delete a book and all its checkpoints. Absent ids are ignored.
    pub fn delete_book(&mut self, id: &BookId) -> StoreResult<()> {
        let mut document = self.load()?;
        if !document.remove_book(id) {
            debug!(book_id = %id, "Delete skipped, book not found");
            return Ok(());
        }

        self.save(&document)?;
        info!(book_id = %id, "Deleted book");
        Ok(())
    }

    /// Record a checkpoint and restore the book's timestamp order.
    ///
    /// Returns `None` when the book doesn't exist. The page is stored as given;
    /// range checks belong to the caller.
    pub fn add_checkpoint(
        &mut self,
        book_id: &BookId,
        page: i64,
        timestamp: Option<Time>,
        notes: Option<String>,
    ) -> StoreResult<Option<Checkpoint>> {
        let mut document = self.load()?;
        let Some(book) = document.book_mut(book_id) else {
            debug!(book_id = %book_id, "Checkpoint skipped, book not found");
            return Ok(None);
        };

        let checkpoint = Checkpoint::new(page, timestamp.unwrap_or_else(Utc::now), notes);
        book.insert_checkpoint(checkpoint.clone());
        self.save(&document)?;

        info!(
            book_id = %book_id,
            checkpoint_id = %checkpoint.id,
            page = checkpoint.page,
            "Added checkpoint"
        );
        Ok(Some(checkpoint))
    }

    /// Delete a checkpoint. Absent books or checkpoints are ignored.
    pub fn delete_checkpoint(
        &mut self,
        book_id: &BookId,
        checkpoint_id: &CheckpointId,
    ) -> StoreResult<()> {
        let mut document = self.load()?;
        let removed = document
            .book_mut(book_id)
            .is_some_and(|book| book.remove_checkpoint(checkpoint_id));
        if !removed {
            debug!(book_id = %book_id, checkpoint_id = %checkpoint_id, "Delete skipped, checkpoint not found");
            return Ok(());
        }

        self.save(&document)?;
        info!(book_id = %book_id, checkpoint_id = %checkpoint_id, "Deleted checkpoint");
        Ok(())
    }

    /// The full data set, in the persisted shape.
    pub fn export_snapshot(&self) -> StoreResult<Document> {
        self.load()
    }

    /// The full data set as pretty-printed JSON.
    pub fn export_json(&self) -> StoreResult<String> {
        let document = self.export_snapshot()?;
        Ok(serde_json::to_string_pretty(&document).map_err(StorageError::from)?)
    }

    /// Validate a snapshot and replace the entire data set with it.
    ///
    /// Nothing is written when validation fails. Checkpoints of each imported
    /// book are put back in timestamp order.
    pub fn import_snapshot(&mut self, snapshot: &Value) -> StoreResult<Document> {
        let mut document = Document::from_value(snapshot)?;
        for book in document.books.iter_mut().filter(|b| !b.is_sorted()) {
            debug!(book_id = %book.id, "Reordering imported checkpoints");
            book.sort_checkpoints();
        }

        self.save(&document)?;
        info!(books = document.books.len(), "Imported snapshot");
        Ok(document)
    }

    /// Parse and import a JSON snapshot.
    pub fn import_json(&mut self, json: &str) -> StoreResult<Document> {
        let snapshot: Value = serde_json::from_str(json)
            .map_err(|err| ValidationError::new(format!("Invalid format: {}", err)))?;
        self.import_snapshot(&snapshot)
    }
}
