//! Storage abstraction and the checkpoint store for the reading tracker.
//!
//! This crate provides a trait for persisting the single tracker document,
//! a JSON file and an in-memory implementation of it, and [`BookStore`], which
//! implements book and checkpoint operations on top of any backend.

#![warn(missing_docs)]

pub mod trait_;
#[cfg(feature = "json")]
pub mod json_storage;
pub mod memory_storage;
pub mod book_store;

pub use trait_::{DocumentStore, StorageError, Result};
#[cfg(feature = "json")]
pub use json_storage::JsonStorage;
pub use memory_storage::MemoryStorage;
pub use book_store::{BookStore, StoreError, StoreResult};
