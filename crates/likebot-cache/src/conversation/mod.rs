//! Conversation state stores
//!
//! Both stores enforce expiry themselves: a read after the TTL returns `None`.

mod memory_store;
mod redis_store;

pub use memory_store::MemoryConversationStore;
pub use redis_store::{RedisConversationStore, CONVERSATION_PREFIX};
