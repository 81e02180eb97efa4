//! # likebot-cache
//!
//! Short-lived state of the bot.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Conversation State**: Per-user flow state with expiry, in Redis or in process
//! - **TTL Cache**: Bounded in-process memo on moka with a time-to-live
//!
//! ## Example
//!
//! ```ignore
//! use likebot_cache::{RedisPool, RedisPoolConfig, RedisConversationStore};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let store = RedisConversationStore::new(pool);
//!
//! store.set(user_id, &ConversationState::awaiting_buttons(draft), ttl).await?;
//! ```

pub mod conversation;
pub mod pool;
pub mod ttl_cache;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

// Re-export conversation stores
pub use conversation::{MemoryConversationStore, RedisConversationStore, CONVERSATION_PREFIX};

pub use ttl_cache::TtlCache;
