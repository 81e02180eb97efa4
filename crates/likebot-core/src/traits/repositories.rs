//! Repository traits (ports) - the storage the domain relies on
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use std::time::Duration;

use async_trait::async_trait;

use crate::entities::{
    ButtonSet, Chat, ChatProfile, ContentKind, ConversationState, Message, Reaction,
    ReactionResult, User, UserProfile,
};
use crate::error::DomainError;
use crate::value_objects::{ChatId, MessageRef, Snowflake, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn find_by_ref(&self, message_ref: &MessageRef) -> RepoResult<Option<Message>>;

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>>;

    /// Track a message together with its initial zero-count buttons
    async fn create(&self, message: &Message, buttons: &[String]) -> RepoResult<()>;

    /// Forget a message; its buttons and reactions go with it.
    /// Returns whether a record existed.
    async fn delete_by_ref(&self, message_ref: &MessageRef) -> RepoResult<bool>;
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert or refresh a user from its transport profile
    async fn upsert(&self, profile: &UserProfile) -> RepoResult<User>;

    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;
}

// ============================================================================
// Chat Repository
// ============================================================================

#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Insert or refresh a chat profile. New chats get `default_buttons`;
    /// existing chats keep their settings.
    async fn upsert_profile(
        &self,
        profile: &ChatProfile,
        default_buttons: &[String],
    ) -> RepoResult<Chat>;

    async fn find_by_id(&self, id: ChatId) -> RepoResult<Option<Chat>>;

    /// Replace the reposting settings of an existing chat
    async fn update_settings(
        &self,
        id: ChatId,
        allowed_types: &[ContentKind],
        buttons: &[String],
    ) -> RepoResult<Chat>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Current counters of a message, in display order
    async fn buttons(&self, message_id: Snowflake) -> RepoResult<ButtonSet>;

    async fn find(&self, message_id: Snowflake, user_id: UserId) -> RepoResult<Option<Reaction>>;

    async fn find_by_message(&self, message_id: Snowflake) -> RepoResult<Vec<Reaction>>;

    /// Toggle `label` for `user_id` as one atomic unit of storage.
    ///
    /// Adds, removes or moves the user's reaction and adjusts the counters.
    /// A label not yet on the message is appended unless the message already
    /// has `max_distinct` buttons, in which case nothing changes and
    /// `CapacityExceeded` is returned.
    async fn toggle(
        &self,
        message_id: Snowflake,
        user_id: UserId,
        label: &str,
        max_distinct: usize,
    ) -> RepoResult<ReactionResult>;

    /// Remove every reaction on a message and zero its counters
    async fn delete_all(&self, message_id: Snowflake) -> RepoResult<u64>;
}

// ============================================================================
// Conversation Store
// ============================================================================

/// Ephemeral per-user flow state. A read after the TTL elapsed returns `None`.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn get(&self, user_id: UserId) -> RepoResult<Option<ConversationState>>;

    async fn set(&self, user_id: UserId, state: &ConversationState, ttl: Duration)
        -> RepoResult<()>;

    async fn clear(&self, user_id: UserId) -> RepoResult<()>;
}

// ============================================================================
// Admin Directory
// ============================================================================

/// Lookup of chat administrators, answered by the transport
#[async_trait]
pub trait AdminDirectory: Send + Sync {
    async fn admin_ids(&self, chat_id: ChatId) -> RepoResult<Vec<UserId>>;
}
