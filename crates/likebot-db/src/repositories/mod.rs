//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in likebot-core.

mod chat;
mod error;
mod message;
mod reaction;
mod user;

pub use chat::PgChatRepository;
pub use message::PgMessageRepository;
pub use reaction::PgReactionRepository;
pub use user::PgUserRepository;
