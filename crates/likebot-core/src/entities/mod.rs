//! Domain entities - core business objects

mod button;
mod chat;
mod conversation;
mod message;
mod reaction;
mod user;

pub use button::{Button, ButtonSet};
pub use chat::{Chat, ChatKind, ChatProfile, ContentKind};
pub use conversation::{ConversationState, FlowState};
pub use message::Message;
pub use reaction::{plan_reaction, Reaction, ReactionOutcome, ReactionPlan, ReactionResult};
pub use user::{User, UserProfile};
