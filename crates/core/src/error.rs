//! Validation errors for malformed input.

/// Input rejected by a book constructor or by snapshot import.
///
/// The message is meant to be shown to a person as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    /// Create a validation error with a free-form message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The snapshot has no `books` array.
    pub fn missing_books_array() -> Self {
        Self::new("Invalid format: missing books array")
    }

    /// A book entry in a snapshot is incomplete or malformed.
    pub fn invalid_book_entry(label: &str) -> Self {
        Self::new(format!("Invalid book entry: {}", label))
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
