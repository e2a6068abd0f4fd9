//! JSON file storage implementation.
//!
//! Keeps the whole document in one pretty-printed JSON file. Writes go to a
//! sibling `.tmp` file first and are renamed into place.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use readtrack_core::Document;
use serde_json::Value;
use tracing::{debug, warn};
use super::{DocumentStore, Result};

/// File-based JSON storage backend.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    /// Create storage backed by `path`. Nothing is touched on disk until the
    /// first save, which also creates missing parent directories.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Location of the document file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl DocumentStore for JsonStorage {
    fn load(&self) -> Result<Option<Document>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No document stored yet");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        // Content that isn't JSON, or has no `books` array, is treated as an
        // empty data set rather than locking the user out; the next save
        // replaces it.
        let value: Value = match serde_json::from_str(&json) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "Stored document is unreadable, starting empty"
                );
                return Ok(None);
            }
        };
        if !value.get("books").is_some_and(Value::is_array) {
            warn!(path = %self.path.display(), "Stored document has no books array, starting empty");
            return Ok(None);
        }

        // A malformed entry inside a real document must not wipe the rest.
        let document = serde_json::from_value(value)?;
        Ok(Some(document))
    }

    fn save(&mut self, document: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(document)?;
        let temp = self.temp_path();
        fs::write(&temp, json.as_bytes())?;
        fs::rename(&temp, &self.path)?;

        debug!(
            path = %self.path.display(),
            books = document.books.len(),
            "Saved document"
        );
        Ok(())
    }
}
