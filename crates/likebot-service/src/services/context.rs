//! Service context - dependency container for services
//!
//! Holds the storage ports, the conversation store, the admin lookup and the
//! shared in-process state (lock table, admin cache, id generator).

use std::sync::Arc;

use likebot_cache::{MemoryConversationStore, TtlCache};
use likebot_common::BotConfig;
use likebot_core::{
    build, AdminDirectory, ButtonSet, ChatId, ChatRepository, ConversationStore, KeyboardOptions,
    Layout, MessageRepository, ReactionRepository, Snowflake, SnowflakeGenerator, UserId,
    UserRepository,
};
use likebot_db::MemoryStore;

use super::error::{ServiceError, ServiceResult};
use super::locks::RefLocks;

/// Service context containing all dependencies
///
/// Cheap to clone; clones share every store, the lock table and the caches.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    chat_repo: Arc<dyn ChatRepository>,
    message_repo: Arc<dyn MessageRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,

    // Ephemeral state
    conversations: Arc<dyn ConversationStore>,
    ref_locks: Arc<RefLocks>,

    // Admin lookup
    admins: Arc<dyn AdminDirectory>,
    admin_cache: Arc<TtlCache<ChatId, Vec<UserId>>>,

    snowflake_generator: Arc<SnowflakeGenerator>,
    settings: Arc<BotConfig>,
    bot_id: UserId,
}

impl ServiceContext {
    /// Context over in-process stores, for tests and database-less runs
    pub fn in_memory(settings: BotConfig, admins: Arc<dyn AdminDirectory>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let admin_cache = TtlCache::new(settings.admin_cache_ttl());
        Self {
            user_repo: store.clone(),
            chat_repo: store.clone(),
            message_repo: store.clone(),
            reaction_repo: store,
            conversations: Arc::new(MemoryConversationStore::new()),
            ref_locks: Arc::new(RefLocks::new()),
            admins,
            admin_cache: Arc::new(admin_cache),
            snowflake_generator: Arc::new(SnowflakeGenerator::default()),
            settings: Arc::new(settings),
            bot_id: 0,
        }
    }

    /// Same context, acting as the bot account `bot_id`
    #[must_use]
    pub fn with_bot_id(mut self, bot_id: UserId) -> Self {
        self.bot_id = bot_id;
        self
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn chat_repo(&self) -> &dyn ChatRepository {
        self.chat_repo.as_ref()
    }

    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    // === Ephemeral state ===

    /// Get the per-user conversation store
    pub fn conversations(&self) -> &dyn ConversationStore {
        self.conversations.as_ref()
    }

    pub fn ref_locks(&self) -> &RefLocks {
        &self.ref_locks
    }

    // === Admins ===

    pub fn admins(&self) -> &dyn AdminDirectory {
        self.admins.as_ref()
    }

    pub fn admin_cache(&self) -> &TtlCache<ChatId, Vec<UserId>> {
        &self.admin_cache
    }

    // === Settings ===

    pub fn settings(&self) -> &BotConfig {
        &self.settings
    }

    /// Account id of the bot itself
    pub fn bot_id(&self) -> UserId {
        self.bot_id
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }

    /// Keyboard with live counts
    pub fn keyboard(&self, buttons: &ButtonSet) -> Layout {
        build(
            buttons,
            KeyboardOptions::counted(self.settings.max_buttons_per_row),
        )
    }

    /// Keyboard with bare labels, for previews
    pub fn blank_keyboard(&self, buttons: &ButtonSet) -> Layout {
        build(
            buttons,
            KeyboardOptions::blank(self.settings.max_buttons_per_row),
        )
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("ref_locks", &self.ref_locks.len())
            .field("settings", &self.settings)
            .field("bot_id", &self.bot_id)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    chat_repo: Option<Arc<dyn ChatRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    conversations: Option<Arc<dyn ConversationStore>>,
    admins: Option<Arc<dyn AdminDirectory>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    settings: Option<BotConfig>,
    bot_id: UserId,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn chat_repo(mut self, repo: Arc<dyn ChatRepository>) -> Self {
        self.chat_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn conversations(mut self, store: Arc<dyn ConversationStore>) -> Self {
        self.conversations = Some(store);
        self
    }

    pub fn admins(mut self, admins: Arc<dyn AdminDirectory>) -> Self {
        self.admins = Some(admins);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn settings(mut self, settings: BotConfig) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn bot_id(mut self, bot_id: UserId) -> Self {
        self.bot_id = bot_id;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let settings = self.settings.unwrap_or_default();
        let admin_cache = TtlCache::new(settings.admin_cache_ttl());

        Ok(ServiceContext {
            user_repo: self.user_repo.ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            chat_repo: self.chat_repo.ok_or_else(|| ServiceError::validation("chat_repo is required"))?,
            message_repo: self.message_repo.ok_or_else(|| ServiceError::validation("message_repo is required"))?,
            reaction_repo: self.reaction_repo.ok_or_else(|| ServiceError::validation("reaction_repo is required"))?,
            conversations: self.conversations.ok_or_else(|| ServiceError::validation("conversations is required"))?,
            ref_locks: Arc::new(RefLocks::new()),
            admins: self.admins.ok_or_else(|| ServiceError::validation("admins is required"))?,
            admin_cache: Arc::new(admin_cache),
            snowflake_generator: self.snowflake_generator.unwrap_or_default(),
            settings: Arc::new(settings),
            bot_id: self.bot_id,
        })
    }
}
