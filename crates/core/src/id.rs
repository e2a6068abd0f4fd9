//! Unique identifiers for reading tracker entities.
//!
//! Identifiers are opaque strings on the wire so that documents produced by
//! older exports (`book_1700000000000`, ...) import verbatim. Freshly generated
//! identifiers come from a process-wide monotonic ULID generator, which keeps
//! them distinct even when several are issued within the same millisecond.

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, OnceLock};
use ulid::{Generator, Ulid};

fn next_ulid() -> Ulid {
    static GENERATOR: OnceLock<Mutex<Generator>> = OnceLock::new();

    let generator = GENERATOR.get_or_init(|| Mutex::new(Generator::new()));
    // A poisoned lock still guards a usable generator.
    let mut generator = generator
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    // Overflow only happens after 2^80 ids in one millisecond; a random ULID
    // is still unique for all practical purposes.
    generator.generate().unwrap_or_else(|_| Ulid::new())
}

/// Unique identifier for a Book
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    /// Generate a new BookId
    pub fn generate() -> Self {
        Self(format!("book_{}", next_ulid()))
    }

    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::generate()
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for BookId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for BookId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Unique identifier for a Checkpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckpointId(String);

impl CheckpointId {
    /// Generate a new CheckpointId
    pub fn generate() -> Self {
        Self(format!("cp_{}", next_ulid()))
    }

    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CheckpointId {
    fn default() -> Self {
        Self::generate()
    }
}

impl std::fmt::Display for CheckpointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for CheckpointId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for CheckpointId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
