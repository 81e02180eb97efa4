//! Outbound effects and the port that delivers them

use async_trait::async_trait;

use likebot_core::{ChatId, Layout, MessageRef};

use crate::services::{Preview, RepostPlan};

/// Something the transport should do on the bot's behalf
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    AnswerCallback {
        query_id: String,
        text: Option<String>,
        /// Seconds the client may cache the answer
        cache_time: u32,
    },
    EditKeyboard {
        message_ref: MessageRef,
        layout: Layout,
    },
    Reply {
        chat_id: ChatId,
        reply_to: Option<i64>,
        text: String,
        layout: Option<Layout>,
    },
    Repost(RepostPlan),
    AnswerInline {
        query_id: String,
        preview: Preview,
    },
}

impl Effect {
    pub fn reply(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self::Reply {
            chat_id,
            reply_to: None,
            text: text.into(),
            layout: None,
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::AnswerCallback { .. } => "answer_callback",
            Self::EditKeyboard { .. } => "edit_keyboard",
            Self::Reply { .. } => "reply",
            Self::Repost(_) => "repost",
            Self::AnswerInline { .. } => "answer_inline",
        }
    }
}

/// Successful delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Done,
    /// A new message was sent; its address on the platform
    Posted(MessageRef),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    /// The message to edit no longer exists remotely
    #[error("Message is gone: {0}")]
    MessageGone(MessageRef),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Transport side of effect delivery
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, effect: &Effect) -> Result<Delivery, NotifyError>;
}
