//! # likebot-service
//!
//! Application layer of the reaction bot: the services that run the reaction
//! engine and the posting flows over the storage ports, and the dispatcher
//! that routes inbound transport events to them and delivers the resulting
//! effects.

pub mod bootstrap;
pub mod dispatch;
pub mod services;

pub use dispatch::{
    Delivery, DeliveryReport, Dispatcher, Effect, EventKind, InboundEvent, Notifier, NotifyError,
    NOOP_CACHE_SECS, PUBLISH_QUERY, REACT_PAYLOAD,
};
pub use services::{
    AdminService, ChatService, Draft, ForwardOrigin, GroupPost, MessageService, Preview,
    PublishService, Published, ReactionReply, ReactionService, RepostMode, RepostPlan,
    RepostService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};
