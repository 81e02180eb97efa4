//! # likebot-core
//!
//! Domain layer of the reaction bot: tracked messages, their button sets and
//! per-user reactions, the directive parser for posting marks, the keyboard
//! builder and the storage ports implemented by the infrastructure crates.
//! This crate has no dependency on a database, cache or transport.

pub mod directive;
pub mod entities;
pub mod error;
pub mod keyboard;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use directive::{parse, parse_post, Directive, DirectiveError, ForceLevel, PostBody};
pub use entities::{
    plan_reaction, Button, ButtonSet, Chat, ChatKind, ChatProfile, ContentKind,
    ConversationState, FlowState, Message, Reaction, ReactionOutcome, ReactionPlan,
    ReactionResult, User, UserProfile,
};
pub use error::DomainError;
pub use keyboard::{build, CallbackToken, KeyCell, KeyboardOptions, Layout, NOOP_TOKEN};
pub use traits::{
    AdminDirectory, ChatRepository, ConversationStore, MessageRepository, ReactionRepository,
    RepoResult, UserRepository,
};
pub use value_objects::{
    validate_reaction_label, ChatId, MessageRef, Snowflake, SnowflakeGenerator,
    SnowflakeParseError, UserId,
};
