//! Error handling utilities for repositories

use likebot_core::{ChatId, DomainError, Snowflake};
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

pub fn chat_not_found(id: ChatId) -> DomainError {
    DomainError::ChatNotFound(id)
}

pub fn message_id_not_found(id: Snowflake) -> DomainError {
    DomainError::MessageIdNotFound(id)
}
