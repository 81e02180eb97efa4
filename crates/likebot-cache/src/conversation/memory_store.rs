//! Conversation state kept in process

use std::time::{Duration, Instant};

use async_trait::async_trait;
use likebot_core::{ConversationState, ConversationStore, RepoResult, UserId};
use moka::future::Cache;
use moka::Expiry;

/// Upper bound on users with a flow in progress
const MAX_CONVERSATIONS: u64 = 100_000;

#[derive(Debug, Clone)]
struct Entry {
    state: ConversationState,
    ttl: Duration,
}

/// Every write restarts the clock with the TTL it was given
struct PerEntryTtl;

impl Expiry<UserId, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _user_id: &UserId,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _user_id: &UserId,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-process [`ConversationStore`] with a TTL per entry
#[derive(Clone)]
pub struct MemoryConversationStore {
    entries: Cache<UserId, Entry>,
}

impl MemoryConversationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(MAX_CONVERSATIONS)
    }

    #[must_use]
    pub fn with_capacity(max_capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { entries }
    }

    /// Number of live entries once pending evictions have run
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryConversationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryConversationStore")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn get(&self, user_id: UserId) -> RepoResult<Option<ConversationState>> {
        Ok(self.entries.get(&user_id).await.map(|entry| entry.state))
    }

    async fn set(
        &self,
        user_id: UserId,
        state: &ConversationState,
        ttl: Duration,
    ) -> RepoResult<()> {
        if ttl.is_zero() {
            self.entries.invalidate(&user_id).await;
            return Ok(());
        }
        let entry = Entry {
            state: state.clone(),
            ttl,
        };
        self.entries.insert(user_id, entry).await;
        Ok(())
    }

    async fn clear(&self, user_id: UserId) -> RepoResult<()> {
        self.entries.invalidate(&user_id).await;
        Ok(())
    }
}
