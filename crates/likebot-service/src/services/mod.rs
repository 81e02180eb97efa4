//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] and orchestrates the
//! domain operations over the storage ports.

pub mod admin;
pub mod chat;
pub mod context;
pub mod error;
pub mod locks;
pub mod message;
pub mod publish;
pub mod reaction;
pub mod repost;

// Re-export all services for convenience
pub use admin::AdminService;
pub use chat::ChatService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use locks::{RefGuard, RefLocks};
pub use message::MessageService;
pub use publish::{parse_button_list, Draft, Preview, PublishService, Published, ReactionReply};
pub use reaction::ReactionService;
pub use repost::{ForwardOrigin, GroupPost, RepostMode, RepostPlan, RepostService};
