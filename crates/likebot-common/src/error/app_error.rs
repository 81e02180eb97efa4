//! Application error types
//!
//! Unified error handling at the edge where replies are written.

use likebot_core::DomainError;
use std::fmt;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Resource errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    // Redis errors
    #[error("Cache error: {0}")]
    Cache(String),

    // Transport errors
    #[error("Notification error: {0}")]
    Notification(String),

    // Internal errors
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Get error code for logs
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Notification(_) => "NOTIFICATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Text shown to the user who caused the error.
    ///
    /// `None` means the error is handled silently and only logged.
    #[must_use]
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::Domain(e) => domain_user_message(e),
            Self::Validation(_) => Some("Something is wrong with that input."),
            Self::NotFound(_) | Self::Notification(_) => None,
            Self::Database(_) | Self::Cache(_) | Self::Internal(_) | Self::Config(_) => {
                Some("Something went wrong, try again later.")
            }
        }
    }

    /// Check if the error is caused by infrastructure rather than input
    #[must_use]
    pub fn is_infrastructure(&self) -> bool {
        match self {
            Self::Database(_) | Self::Cache(_) | Self::Internal(_) | Self::Config(_) => true,
            Self::Domain(e) => e.is_infrastructure(),
            _ => false,
        }
    }

    /// Create a not found error for a resource type
    #[must_use]
    pub fn not_found(resource: impl fmt::Display) -> Self {
        Self::NotFound(resource.to_string())
    }

    /// Create a validation error
    #[must_use]
    pub fn validation(msg: impl fmt::Display) -> Self {
        Self::Validation(msg.to_string())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Reply text for a domain error, `None` when it is only logged
#[must_use]
pub fn domain_user_message(err: &DomainError) -> Option<&'static str> {
    match err {
        DomainError::InvalidReaction(_) => Some("Please send a single emoji."),
        DomainError::CapacityExceeded { .. } => Some("Too many reactions on this message."),
        DomainError::EmptyAfterStrip => Some("Cannot repost an empty message."),
        DomainError::MessageIdNotFound(_) => Some("That message is gone, nothing to react to."),
        DomainError::ValidationError(_) => Some("Something is wrong with that input."),
        DomainError::MessageNotFound(_)
        | DomainError::ChatNotFound(_)
        | DomainError::StaleEditConflict(_)
        | DomainError::NotificationTimeout(_) => None,
        DomainError::DatabaseError(_) | DomainError::CacheError(_) | DomainError::InternalError(_) => {
            Some("Something went wrong, try again later.")
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
