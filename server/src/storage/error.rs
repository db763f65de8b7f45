use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("{entity_type} already exists: {id}")]
    AlreadyExists { entity_type: &'static str, id: Uuid },

    #[error("{column} is {len} characters long, at most {max} allowed")]
    ValueTooLong {
        column: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
