//! Book model - a title being read and its page checkpoints.

use serde::{Deserialize, Serialize};
use crate::error::ValidationError;
use crate::id::{BookId, CheckpointId};
use crate::Time;

/// A book being tracked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier
    pub id: BookId,

    /// Display name
    pub name: String,

    /// Number of pages, fixed at creation
    pub total_pages: u32,

    /// When reading started
    pub created_at: Time,

    /// Progress observations, ascending by timestamp
    pub checkpoints: Vec<Checkpoint>,
}

impl Book {
    /// Create a new book seeded with a zero-page checkpoint at `created_at`.
    ///
    /// Fails when `name` is blank or `total_pages` is not a positive integer
    /// that fits the model.
    pub fn new(
        name: impl Into<String>,
        total_pages: i64,
        created_at: Time,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::new("Book name must not be empty"));
        }

        let total_pages = u32::try_from(total_pages)
            .ok()
            .filter(|pages| *pages > 0)
            .ok_or_else(|| {
                ValidationError::new(format!(
                    "Total pages must be a positive integer, got {}",
                    total_pages
                ))
            })?;

        Ok(Self {
            id: BookId::generate(),
            name,
            total_pages,
            created_at,
            checkpoints: vec![Checkpoint::new(0, created_at, None)],
        })
    }

    /// Insert a checkpoint and restore timestamp order.
    pub fn insert_checkpoint(&mut self, checkpoint: Checkpoint) {
        self.checkpoints.push(checkpoint);
        self.sort_checkpoints();
    }

    /// Remove every checkpoint with the given id. Returns whether anything was removed.
    pub fn remove_checkpoint(&mut self, id: &CheckpointId) -> bool {
        let before = self.checkpoints.len();
        self.checkpoints.retain(|cp| &cp.id != id);
        self.checkpoints.len() != before
    }

    /// Find a checkpoint by id.
    pub fn checkpoint(&self, id: &CheckpointId) -> Option<&Checkpoint> {
        self.checkpoints.iter().find(|cp| &cp.id == id)
    }

    /// Stable sort by timestamp; checkpoints sharing a timestamp keep insertion order.
    pub fn sort_checkpoints(&mut self) {
        self.checkpoints.sort_by_key(|cp| cp.timestamp);
    }

    /// Whether checkpoints are in ascending timestamp order.
    pub fn is_sorted(&self) -> bool {
        self.checkpoints
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp)
    }
}

/// A timestamped observation of the page reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Unique identifier within the book
    pub id: CheckpointId,

    /// Page reached; not range-checked
    pub page: i64,

    /// When the page was reached
    pub timestamp: Time,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Checkpoint {
    /// Create a checkpoint with a fresh id. Empty notes are dropped.
    pub fn new(page: i64, timestamp: Time, notes: Option<String>) -> Self {
        Self {
            id: CheckpointId::generate(),
            page,
            timestamp,
            notes: notes.filter(|n| !n.is_empty()),
        }
    }
}
