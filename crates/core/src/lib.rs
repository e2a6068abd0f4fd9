//! Reading tracker core data models.
//!
//! This crate defines the books and checkpoints that the store persists and
//! the estimator reads, plus the validation applied to untrusted snapshots.

#![warn(missing_docs)]

// Core identities
mod id;

// Entities
mod book;
mod document;

// Errors
mod error;

// Re-exports
pub use id::*;

pub use book::{Book, Checkpoint};
pub use document::Document;
pub use error::ValidationError;

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
