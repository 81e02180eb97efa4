//! Entity to model mappers
//!
//! - `From<Model> for Entity` / `TryFrom` where a row can be malformed
//! - `*Insert` structs: Prepare entity data for database operations

mod chat;
mod message;
mod reaction;
mod user;

pub use chat::content_kinds_to_strings;
pub use message::{button_set, MessageInsert};
