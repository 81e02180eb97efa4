//! Conversation state in Redis, one JSON value per user with `SET EX`.

use std::time::Duration;

use async_trait::async_trait;
use likebot_core::{ConversationState, ConversationStore, RepoResult, UserId};
use tracing::instrument;

use crate::pool::RedisPool;

/// Key prefix for conversation state
pub const CONVERSATION_PREFIX: &str = "conversation:";

/// Redis-backed [`ConversationStore`]
#[derive(Clone)]
pub struct RedisConversationStore {
    pool: RedisPool,
}

impl RedisConversationStore {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    fn key(user_id: UserId) -> String {
        format!("{CONVERSATION_PREFIX}{user_id}")
    }

    /// Whole seconds for `EX`, rounding sub-second remainders up
    fn ttl_seconds(ttl: Duration) -> u64 {
        ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0)
    }
}

#[async_trait]
impl ConversationStore for RedisConversationStore {
    #[instrument(skip(self))]
    async fn get(&self, user_id: UserId) -> RepoResult<Option<ConversationState>> {
        Ok(self.pool.get_value(&Self::key(user_id)).await?)
    }

    #[instrument(skip(self, state), fields(flow = ?state.state))]
    async fn set(
        &self,
        user_id: UserId,
        state: &ConversationState,
        ttl: Duration,
    ) -> RepoResult<()> {
        let key = Self::key(user_id);
        let seconds = Self::ttl_seconds(ttl);
        if seconds == 0 {
            self.pool.delete(&key).await?;
            return Ok(());
        }

        self.pool.set(&key, state, Some(seconds)).await?;
        tracing::debug!(user_id, ttl_secs = seconds, "Stored conversation state");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear(&self, user_id: UserId) -> RepoResult<()> {
        self.pool.delete(&Self::key(user_id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_generation() {
        assert_eq!(RedisConversationStore::key(42), "conversation:42");
    }

    #[test]
    fn test_ttl_rounds_up() {
        assert_eq!(RedisConversationStore::ttl_seconds(Duration::ZERO), 0);
        assert_eq!(RedisConversationStore::ttl_seconds(Duration::from_millis(10)), 1);
        assert_eq!(RedisConversationStore::ttl_seconds(Duration::from_secs(3600)), 3600);
    }
}
