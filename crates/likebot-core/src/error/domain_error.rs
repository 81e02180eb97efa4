//! Domain errors - every failure the engine, parser and flow can report

use thiserror::Error;

use crate::value_objects::{ChatId, MessageRef, Snowflake};

/// Domain layer errors
///
/// These are returned as values; callers decide what the user sees.
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Message not tracked: {0}")]
    MessageNotFound(MessageRef),

    #[error("Message not tracked: id {0}")]
    MessageIdNotFound(Snowflake),

    #[error("Chat not found: {0}")]
    ChatNotFound(ChatId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Not a single emoji: {0:?}")]
    InvalidReaction(String),

    #[error("Too many reactions: at most {max} distinct buttons")]
    CapacityExceeded { max: usize },

    #[error("Nothing left to repost after removing the force mark")]
    EmptyAfterStrip,

    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Delivery Errors
    // =========================================================================
    #[error("Remote message is gone: {0}")]
    StaleEditConflict(MessageRef),

    #[error("Notification failed: {0}")]
    NotificationTimeout(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Stable error code for logs and transport mapping
    pub fn code(&self) -> &'static str {
        match self {
            Self::MessageNotFound(_) | Self::MessageIdNotFound(_) => "UNKNOWN_MESSAGE",
            Self::ChatNotFound(_) => "UNKNOWN_CHAT",
            Self::InvalidReaction(_) => "INVALID_REACTION",
            Self::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            Self::EmptyAfterStrip => "EMPTY_AFTER_STRIP",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::StaleEditConflict(_) => "STALE_EDIT_CONFLICT",
            Self::NotificationTimeout(_) => "NOTIFICATION_TIMEOUT",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::MessageNotFound(_) | Self::MessageIdNotFound(_) | Self::ChatNotFound(_)
        )
    }

    /// Errors caused by what the user sent, worth telling them about
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::InvalidReaction(_)
                | Self::CapacityExceeded { .. }
                | Self::EmptyAfterStrip
                | Self::ValidationError(_)
        )
    }

    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::DatabaseError(_) | Self::CacheError(_) | Self::InternalError(_)
        )
    }
}
