//! Database models - SQLx-compatible structs for PostgreSQL tables

mod chat;
mod message;
mod reaction;
mod user;

pub use chat::ChatModel;
pub use message::{ButtonModel, MessageModel};
pub use reaction::ReactionModel;
pub use user::UserModel;
