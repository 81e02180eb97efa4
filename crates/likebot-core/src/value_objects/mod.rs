//! Value objects - identifiers and validated values

mod emoji;
mod message_ref;
mod snowflake;

pub use emoji::{validate_reaction_label, MAX_LABEL_BYTES};
pub use message_ref::MessageRef;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};

/// Identifier of a chat user as assigned by the messaging platform
pub type UserId = i64;

/// Identifier of a chat (group, channel or private chat)
pub type ChatId = i64;
