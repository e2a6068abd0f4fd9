//! Document model - the whole persisted data set.
//!
//! The same shape is written to storage, produced by export and accepted by
//! import. Import goes through [`Document::from_value`], which applies the
//! entry checks on the raw JSON before decoding into typed books.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use crate::book::Book;
use crate::error::ValidationError;
use crate::id::BookId;

/// Every book and its checkpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Books in persisted order
    pub books: Vec<Book>,
}

impl Document {
    /// An empty data set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a book by id.
    pub fn book(&self, id: &BookId) -> Option<&Book> {
        self.books.iter().find(|b| &b.id == id)
    }

    /// Find a book by id for modification.
    pub fn book_mut(&mut self, id: &BookId) -> Option<&mut Book> {
        self.books.iter_mut().find(|b| &b.id == id)
    }

    /// Remove every book with the given id. Returns whether anything was removed.
    pub fn remove_book(&mut self, id: &BookId) -> bool {
        let before = self.books.len();
        self.books.retain(|b| &b.id != id);
        self.books.len() != before
    }

    /// Validate and decode an untrusted snapshot.
    ///
    /// All entries are checked before any is decoded, so the first entry
    /// missing `id`, `name`, `totalPages` or a `checkpoints` array is the one
    /// reported even if an earlier entry would fail to decode.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let entries = value
            .get("books")
            .and_then(Value::as_array)
            .ok_or_else(ValidationError::missing_books_array)?;

        for entry in entries {
            let complete = is_truthy(entry.get("id"))
                && is_truthy(entry.get("name"))
                && is_truthy(entry.get("totalPages"))
                && entry.get("checkpoints").is_some_and(Value::is_array);
            if !complete {
                return Err(ValidationError::invalid_book_entry(&entry_label(entry)));
            }
        }

        let books = entries
            .iter()
            .map(|entry| {
                Book::deserialize(entry).map_err(|err| {
                    let label = entry_label(entry);
                    debug!(book = %label, error = %err, "Rejected book entry");
                    ValidationError::invalid_book_entry(&label)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { books })
    }
}

/// JSON truthiness: missing, `null`, `false`, `0` and `""` are falsy.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// The name, else the id, else `unknown`.
fn entry_label(entry: &Value) -> String {
    [entry.get("name"), entry.get("id")]
        .into_iter()
        .find(|v| is_truthy(*v))
        .flatten()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(value: Value) -> String {
        Document::from_value(&value).unwrap_err().message().to_string()
    }

    #[test]
    fn test_missing_books_array() {
        assert_eq!(message(json!({})), "Invalid format: missing books array");
        assert_eq!(message(json!({"books": {}})), "Invalid format: missing books array");
        assert_eq!(message(json!([])), "Invalid format: missing books array");
        assert_eq!(message(json!(null)), "Invalid format: missing books array");
    }

    #[test]
    fn test_incomplete_entry_is_named() {
        assert_eq!(
            message(json!({"books": [{"id": "b1", "name": "X"}]})),
            "Invalid book entry: X"
        );
        assert_eq!(
            message(json!({"books": [{"id": "b1", "totalPages": 10, "checkpoints": []}]})),
            "Invalid book entry: b1"
        );
        assert_eq!(message(json!({"books": [{}]})), "Invalid book entry: unknown");
        assert_eq!(message(json!({"books": [null]})), "Invalid book entry: unknown");
    }

    #[test]
    fn test_zero_total_pages_is_falsy() {
        let doc = json!({"books": [{
            "id": "b1", "name": "X", "totalPages": 0,
            "createdAt": "2024-01-01T00:00:00Z", "checkpoints": []
        }]});
        assert_eq!(message(doc), "Invalid book entry: X");
    }

    #[test]
    fn test_checkpoints_must_be_array() {
        let doc = json!({"books": [{
            "id": "b1", "name": "X", "totalPages": 10, "checkpoints": {}
        }]});
        assert_eq!(message(doc), "Invalid book entry: X");
    }

    #[test]
    fn test_entry_checks_run_before_decoding() {
        // First entry is complete but undecodable, second is incomplete.
        let doc = json!({"books": [
            {"id": "b1", "name": "First", "totalPages": 10, "checkpoints": []},
            {"id": "b2", "name": "Second"}
        ]});
        assert_eq!(message(doc), "Invalid book entry: Second");
    }

    #[test]
    fn test_undecodable_entry_is_named() {
        let doc = json!({"books": [{
            "id": "b1", "name": "X", "totalPages": "many",
            "createdAt": "2024-01-01T00:00:00Z", "checkpoints": []
        }]});
        assert_eq!(message(doc), "Invalid book entry: X");
    }

    #[test]
    fn test_valid_snapshot_decodes() {
        let doc = json!({"books": [{
            "id": "book_1700000000000",
            "name": "Dune",
            "totalPages": 412,
            "createdAt": "2024-03-01T08:00:00.000Z",
            "checkpoints": [
                {"id": "cp_1", "page": 0, "timestamp": "2024-03-01T08:00:00.000Z"},
                {"id": "cp_2", "page": 40, "timestamp": "2024-03-01T10:00:00.000Z", "notes": "ch. 2"}
            ]
        }]});

        let doc = Document::from_value(&doc).unwrap();
        assert_eq!(doc.books.len(), 1);

        let book = doc.book(&BookId::new("book_1700000000000")).unwrap();
        assert_eq!(book.total_pages, 412);
        assert_eq!(book.checkpoints[1].notes.as_deref(), Some("ch. 2"));
    }

    #[test]
    fn test_empty_books_is_valid() {
        let doc = Document::from_value(&json!({"books": []})).unwrap();
        assert!(doc.books.is_empty());
    }
}
