//! In-memory storage implementation.

use readtrack_core::Document;
use super::{DocumentStore, Result};

/// Keeps the document in process memory. Used by tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    document: Option<Document>,
    saves: usize,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with a document.
    pub fn with_document(document: Document) -> Self {
        Self {
            document: Some(document),
            saves: 0,
        }
    }

    /// Number of saves performed so far.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl DocumentStore for MemoryStorage {
    fn load(&self) -> Result<Option<Document>> {
        Ok(self.document.clone())
    }

    fn save(&mut self, document: &Document) -> Result<()> {
        self.document = Some(document.clone());
        self.saves += 1;
        Ok(())
    }
}
