//! Store error types.

use thiserror::Error;

/// Errors that can occur during store operations.
///
/// A read that finds nothing is not an error; it returns `Ok(None)` or an
/// empty list. `NotFound` is only produced by writes addressed at a missing id.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Duplicate entity or unique key.
    #[error("{entity_type} already exists: {key}")]
    AlreadyExists {
        entity_type: &'static str,
        key: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema setup failed.
    #[error("Migration error: {0}")]
    Migration(String),

    /// A stored row could not be converted back into an entity.
    #[error("Corrupt {table} record {id}: {reason}")]
    CorruptRecord {
        table: &'static str,
        id: String,
        reason: String,
    },
}

impl StoreError {
    /// Creates a not found error.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Creates an already exists error.
    pub fn already_exists(entity_type: &'static str, key: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity_type,
            key: key.into(),
        }
    }

    /// Creates a corrupt record error.
    pub fn corrupt(table: &'static str, id: impl Into<String>, reason: impl ToString) -> Self {
        Self::CorruptRecord {
            table,
            id: id.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true for writes addressed at a missing id.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
